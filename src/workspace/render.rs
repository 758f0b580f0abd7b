use super::core::{StrokeChange, Workspace, parse_color};
use crate::background::BackgroundImage;
use crate::draw::{CanvasScene, Page, WHITE, render_canvas};
use crate::input::Viewport;
use log::{debug, warn};
use std::collections::{BTreeSet, HashMap};
use std::time::Instant;
use thiserror::Error;

/// Errors that can occur while rasterising a page.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Surface size {0}x{1} is empty")]
    EmptySurface(i32, i32),

    #[error("Cairo error: {0}")]
    Cairo(#[from] cairo::Error),

    #[error("Failed to encode PNG: {0}")]
    Png(String),
}

impl Workspace {
    /// Animation-frame tick.
    ///
    /// Applies the pending gesture update, advances erase fades, fires a due
    /// autosave, and returns `true` when the canvas must be repainted.
    pub fn frame(&mut self, now: Instant) -> bool {
        if self.closed {
            return false;
        }
        self.observe(now);

        if self.gesture.flush(&mut self.viewport) {
            self.dirty.mark();
        }

        if self.fades.is_active() {
            let removed: BTreeSet<String> = self.fades.sweep(now).into_iter().collect();
            if !removed.is_empty() {
                debug!("Fade finished for {} stroke(s)", removed.len());
                self.page_mut().strokes.retain(|stroke| !removed.contains(&stroke.id));
            }
            self.fade_alphas = self.fades.alphas(now);
            self.dirty.mark();
        }

        if self.autosave.take_due(now) {
            self.save_now();
        }

        self.dirty.take_frame()
    }

    /// Repaints the live canvas, including interaction overlays.
    pub fn render(&self, ctx: &cairo::Context) {
        let page = self.active_page();
        let scene = CanvasScene {
            width: self.surface_width as f64,
            height: self.surface_height as f64,
            viewport: self.viewport,
            background_color: self.background_color(),
            background_image: self.background.as_ref(),
            strokes: &page.strokes,
            fading: &self.fade_alphas,
            erase_preview: &self.erase_preview,
            preview_opacity: self.preview_opacity,
            live_stroke: self.live_stroke.as_ref(),
            lasso: self.lasso.as_deref(),
            selection: self.selection.as_ref(),
        };
        render_canvas(ctx, &scene);
    }

    /// Encodes the live canvas as PNG at the current surface size.
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        encode_png(self.surface_width, self.surface_height, |ctx| self.render(ctx))
    }

    /// The change recorded by the latest autosave, if the host has not taken it yet.
    pub fn take_stroke_change(&mut self) -> Option<StrokeChange> {
        self.pending_change.take()
    }

    /// Raster of the active page content (no overlays, unzoomed) for change notifications.
    pub(super) fn page_png(&self) -> Option<Vec<u8>> {
        if self.surface_width <= 0 || self.surface_height <= 0 {
            return None;
        }
        let mut page = self.active_page().clone();
        page.strokes.retain(|stroke| !self.fades.is_fading(&stroke.id));
        match render_page_png(&page, self.background.as_ref(), self.surface_width, self.surface_height) {
            Ok(png) => Some(png),
            Err(err) => {
                warn!("Failed to rasterise page {}: {}", page.id, err);
                None
            }
        }
    }
}

/// Renders a stored page, unzoomed, into a PNG of `width` x `height`.
pub fn render_page_png(
    page: &Page,
    background: Option<&BackgroundImage>,
    width: i32,
    height: i32,
) -> Result<Vec<u8>, ExportError> {
    let fading = HashMap::new();
    let preview = BTreeSet::new();
    let scene = CanvasScene {
        width: width as f64,
        height: height as f64,
        viewport: Viewport::IDENTITY,
        background_color: parse_color(&page.background_color).unwrap_or(WHITE),
        background_image: background,
        strokes: &page.strokes,
        fading: &fading,
        erase_preview: &preview,
        preview_opacity: 1.0,
        live_stroke: None,
        lasso: None,
        selection: None,
    };
    encode_png(width, height, |ctx| render_canvas(ctx, &scene))
}

fn encode_png(width: i32, height: i32, paint: impl FnOnce(&cairo::Context)) -> Result<Vec<u8>, ExportError> {
    if width <= 0 || height <= 0 {
        return Err(ExportError::EmptySurface(width, height));
    }
    let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height)?;
    {
        let ctx = cairo::Context::new(&surface)?;
        paint(&ctx);
    }
    surface.flush();

    let mut png = Vec::new();
    surface
        .write_to_png(&mut png)
        .map_err(|err| ExportError::Png(err.to_string()))?;
    Ok(png)
}
