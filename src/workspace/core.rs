//! Workspace state and note/page management.

use super::fade::FadeTracker;
use crate::background::{BackgroundDecoder, BackgroundImage, PngFileDecoder};
use crate::config::Config;
use crate::draw::{Color, DirtyTracker, Note, Page, Point, Stroke, WHITE};
use crate::history::HistoryManager;
use crate::input::{
    GestureController, GestureSettings, InputProfile, SelectionState, Tool, ToolSession, ToolSettings, Viewport,
    ViewportLimits,
};
use crate::session::{AutosaveTimer, NoteStore};
use crate::util;
use log::{debug, info, warn};
use std::collections::{BTreeSet, HashMap};
use std::time::{Duration, Instant};

/// Lifecycle of the active page with respect to persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// No page is loaded (after close)
    Idle,
    /// Strokes in memory, nothing waiting to be saved
    Loaded,
    /// An edit is waiting for the autosave deadline
    Dirty,
}

/// Snapshot handed to the host after each autosave.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeChange {
    pub note_id: String,
    pub page_id: String,
    pub strokes: Vec<Stroke>,
    /// PNG raster of the page, when the surface size is known
    pub png: Option<Vec<u8>>,
}

/// Owns the notes and wires input, tools, history, rendering and autosave together.
///
/// The host forwards pointer and wheel events, calls [`frame`](Self::frame) on
/// every animation frame, and repaints with [`render`](Self::render) whenever
/// `frame` reports that the canvas changed.
pub struct Workspace {
    pub(super) notes: Vec<Note>,
    pub(super) active_note: usize,
    pub(super) settings: ToolSettings,
    pub(super) tool: Tool,
    pub(super) session: Option<ToolSession>,
    /// Stroke being captured by the pen or highlighter
    pub(super) live_stroke: Option<Stroke>,
    pub(super) lasso: Option<Vec<Point>>,
    pub(super) selection: Option<SelectionState>,
    pub(super) erase_preview: BTreeSet<String>,
    /// Set once the current erase gesture has recorded its history snapshot
    pub(super) erase_recorded: bool,
    pub(super) viewport: Viewport,
    pub(super) gesture: GestureController,
    pub(super) history: HistoryManager,
    pub(super) fades: FadeTracker,
    pub(super) fade_alphas: HashMap<String, f64>,
    pub(super) preview_opacity: f64,
    pub(super) dirty: DirtyTracker,
    pub(super) autosave: AutosaveTimer,
    autosave_config: crate::config::AutosaveConfig,
    pub(super) store: Box<dyn NoteStore>,
    /// Cleared when loading failed, so a broken file is never overwritten
    pub(super) persistence_enabled: bool,
    pub(super) decoder: Box<dyn BackgroundDecoder>,
    pub(super) background: Option<BackgroundImage>,
    pub(super) page_state: PageState,
    pub(super) surface_width: i32,
    pub(super) surface_height: i32,
    /// Latest time reported by the host
    pub(super) clock: Instant,
    pub(super) pending_change: Option<StrokeChange>,
    pub(super) closed: bool,
}

impl Workspace {
    /// Creates a workspace and loads the notes from `store`.
    ///
    /// A store that fails to load is logged and left untouched: editing
    /// continues in memory on a fresh note and nothing is saved.
    pub fn new(config: &Config, store: Box<dyn NoteStore>, profile: InputProfile) -> Self {
        let (mut notes, persistence_enabled) = match store.load() {
            Ok(notes) => (notes, true),
            Err(err) => {
                warn!("Failed to load notes, continuing in memory without saving: {err:#}");
                (Vec::new(), false)
            }
        };
        for note in &mut notes {
            note.normalize();
        }
        if notes.is_empty() {
            notes.push(Note::new("Untitled"));
        }

        let limits = ViewportLimits::from(&config.viewport);
        let mut workspace = Self {
            notes,
            active_note: 0,
            settings: ToolSettings::from(config),
            tool: Tool::default(),
            session: None,
            live_stroke: None,
            lasso: None,
            selection: None,
            erase_preview: BTreeSet::new(),
            erase_recorded: false,
            viewport: Viewport::IDENTITY,
            gesture: GestureController::new(GestureSettings::from(config), limits, profile),
            history: HistoryManager::new(config.history.max_depth),
            fades: FadeTracker::new(Duration::from_millis(config.eraser.fade_ms)),
            fade_alphas: HashMap::new(),
            preview_opacity: config.eraser.preview_opacity,
            dirty: DirtyTracker::new(),
            autosave: AutosaveTimer::from_config(&config.autosave, profile.mobile),
            autosave_config: config.autosave.clone(),
            store,
            persistence_enabled,
            decoder: Box::new(PngFileDecoder),
            background: None,
            page_state: PageState::Idle,
            surface_width: 0,
            surface_height: 0,
            clock: Instant::now(),
            pending_change: None,
            closed: false,
        };
        workspace.activate_page();
        workspace
    }

    /// Replaces the background image decoder and reloads the active background.
    pub fn set_background_decoder(&mut self, decoder: Box<dyn BackgroundDecoder>) {
        self.decoder = decoder;
        self.load_background();
        self.dirty.mark();
    }

    /// Updates the device capabilities (pen priority, mobile autosave delay).
    pub fn set_input_profile(&mut self, profile: InputProfile) {
        self.gesture.set_profile(profile);
        self.autosave = AutosaveTimer::from_config(&self.autosave_config, profile.mobile);
    }

    /// Sets the canvas size in device pixels.
    pub fn set_surface_size(&mut self, width: i32, height: i32) {
        self.surface_width = width.max(0);
        self.surface_height = height.max(0);
        self.dirty.mark();
    }

    /// Sets the client position of the canvas container's top-left corner.
    pub fn set_container_origin(&mut self, origin: Point) {
        self.gesture.set_origin(origin);
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn active_note(&self) -> &Note {
        &self.notes[self.active_note]
    }

    pub fn active_page(&self) -> &Page {
        let note = self.active_note();
        &note.pages[note.current_page_index]
    }

    pub fn active_page_index(&self) -> usize {
        self.active_note().current_page_index
    }

    /// Strokes of the active page in draw order, including ones still fading out.
    pub fn strokes(&self) -> &[Stroke] {
        &self.active_page().strokes
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn selection(&self) -> Option<&SelectionState> {
        self.selection.as_ref()
    }

    pub fn live_stroke(&self) -> Option<&Stroke> {
        self.live_stroke.as_ref()
    }

    pub fn page_state(&self) -> PageState {
        self.page_state
    }

    /// Whether a repaint is waiting for the next frame.
    pub fn needs_repaint(&self) -> bool {
        self.dirty.is_dirty()
    }

    pub fn has_pending_autosave(&self) -> bool {
        self.autosave.is_pending()
    }

    pub(super) fn page_mut(&mut self) -> &mut Page {
        let note = &mut self.notes[self.active_note];
        let index = note.current_page_index;
        &mut note.pages[index]
    }

    pub(super) fn page_id(&self) -> String {
        self.active_page().id.clone()
    }

    pub(super) fn observe(&mut self, now: Instant) {
        if now > self.clock {
            self.clock = now;
        }
    }

    /// Strokes that count as the page's content: everything not fading out.
    pub(super) fn committed_strokes(&self) -> Vec<Stroke> {
        self.strokes()
            .iter()
            .filter(|stroke| !self.fades.is_fading(&stroke.id))
            .cloned()
            .collect()
    }

    /// Records the pre-mutation state of the active page.
    pub(super) fn record_history(&mut self) {
        let page_id = self.page_id();
        let current = self.committed_strokes();
        self.history.push_snapshot(&page_id, &current);
    }

    /// Marks the page content changed: repaint and (re)schedule the autosave.
    pub(super) fn mark_changed(&mut self) {
        self.notes[self.active_note].touch();
        self.dirty.mark();
        self.autosave.schedule(self.clock);
        self.page_state = PageState::Dirty;
    }

    /// Drops any half-finished tool interaction without committing it.
    pub(super) fn cancel_interaction(&mut self) {
        if self.session.take().is_some() {
            debug!("Discarding in-progress {} interaction", self.tool.as_str());
        }
        self.live_stroke = None;
        self.lasso = None;
        self.erase_preview.clear();
        self.erase_recorded = false;
        if let Some(selection) = self.selection.as_mut() {
            selection.drag_delta = None;
        }
        self.dirty.mark();
    }

    /// Splices out every stroke still fading.
    pub(super) fn finish_fades(&mut self) {
        let removed: BTreeSet<String> = self.fades.drain().into_iter().collect();
        self.fade_alphas.clear();
        if !removed.is_empty() {
            self.page_mut().strokes.retain(|stroke| !removed.contains(&stroke.id));
            self.dirty.mark();
        }
    }

    /// Resets per-page interaction state after the active page changed.
    pub(super) fn activate_page(&mut self) {
        self.cancel_interaction();
        self.selection = None;
        self.viewport = Viewport::IDENTITY;
        self.gesture.reset();
        self.load_background();
        self.page_state = PageState::Loaded;
        self.dirty.mark();
        debug!(
            "Active page {} of note {} ({} strokes)",
            self.active_page_index(),
            self.active_note().id,
            self.strokes().len()
        );
    }

    pub(super) fn load_background(&mut self) {
        self.background = None;
        let Some(reference) = self.active_page().background_image.clone() else {
            return;
        };
        match self.decoder.decode(&reference) {
            Ok(image) => {
                debug!("Loaded background {} ({}x{})", reference, image.width, image.height);
                self.background = Some(image);
            }
            Err(err) => warn!("Failed to load background image {}: {}", reference, err),
        }
    }

    /// Leaves the active page: finishes fades and saves pending edits.
    fn leave_page(&mut self) {
        self.finish_fades();
        self.flush_autosave();
    }

    /// Switches to page `index` of the active note.
    pub fn switch_page(&mut self, index: usize) -> bool {
        if index >= self.active_note().pages.len() {
            warn!("Cannot switch to page {}: note has {} page(s)", index, self.active_note().pages.len());
            return false;
        }
        if index == self.active_page_index() {
            return true;
        }
        self.leave_page();
        self.notes[self.active_note].current_page_index = index;
        self.activate_page();
        true
    }

    /// Inserts a blank page after the current one and switches to it.
    pub fn add_page(&mut self) -> usize {
        self.leave_page();
        let note = &mut self.notes[self.active_note];
        let index = note.current_page_index + 1;
        note.pages.insert(index, Page::new());
        note.current_page_index = index;
        self.activate_page();
        self.mark_changed();
        index
    }

    /// Deletes page `index`. The last remaining page cannot be deleted.
    pub fn delete_page(&mut self, index: usize) -> bool {
        let page_count = self.active_note().pages.len();
        if index >= page_count || page_count <= 1 {
            warn!("Refusing to delete page {} of {}", index, page_count);
            return false;
        }
        self.finish_fades();
        let note = &mut self.notes[self.active_note];
        let removed = note.pages.remove(index);
        if note.current_page_index > index || note.current_page_index >= note.pages.len() {
            note.current_page_index = note.current_page_index.saturating_sub(1);
        }
        self.history.forget(&removed.id);
        info!("Deleted page {} ({} strokes)", removed.id, removed.strokes.len());
        self.activate_page();
        self.mark_changed();
        true
    }

    /// Makes the note with `note_id` active.
    pub fn open_note(&mut self, note_id: &str) -> bool {
        let Some(index) = self.notes.iter().position(|note| note.id == note_id) else {
            warn!("No note with id {note_id}");
            return false;
        };
        if index == self.active_note {
            return true;
        }
        self.leave_page();
        self.active_note = index;
        self.activate_page();
        true
    }

    /// Creates a note with one blank page, makes it active and returns its id.
    pub fn create_note(&mut self, title: impl Into<String>) -> String {
        self.leave_page();
        let note = Note::new(title);
        let id = note.id.clone();
        self.notes.push(note);
        self.active_note = self.notes.len() - 1;
        self.activate_page();
        self.mark_changed();
        id
    }

    /// Sets the active page's background color (`#rrggbb` or a color name).
    pub fn set_background_color(&mut self, color: &str) -> bool {
        let Some(parsed) = parse_color(color) else {
            warn!("Ignoring invalid background color '{color}'");
            return false;
        };
        self.page_mut().background_color = parsed.to_hex();
        self.mark_changed();
        true
    }

    /// Sets or clears the active page's background image reference.
    pub fn set_background_image(&mut self, reference: Option<String>) {
        self.page_mut().background_image = reference;
        self.load_background();
        self.mark_changed();
    }

    pub(super) fn background_color(&self) -> Color {
        parse_color(&self.active_page().background_color).unwrap_or(WHITE)
    }

    /// Notes as they should be persisted: fading strokes are already gone.
    pub(super) fn persisted_notes(&self) -> Vec<Note> {
        let mut notes = self.notes.clone();
        if self.fades.is_active() {
            let note = &mut notes[self.active_note];
            let index = note.current_page_index;
            note.pages[index].strokes.retain(|stroke| !self.fades.is_fading(&stroke.id));
        }
        notes
    }

    /// Saves immediately and queues a [`StrokeChange`] for the host.
    pub(super) fn save_now(&mut self) {
        self.page_state = PageState::Loaded;
        self.pending_change = Some(StrokeChange {
            note_id: self.active_note().id.clone(),
            page_id: self.page_id(),
            strokes: self.committed_strokes(),
            png: self.page_png(),
        });

        if !self.persistence_enabled {
            debug!("Persistence disabled; keeping changes in memory");
            return;
        }
        let notes = self.persisted_notes();
        if let Err(err) = self.store.save(&notes) {
            warn!("Autosave failed, continuing in memory: {err:#}");
        }
    }

    /// Runs a pending autosave right away.
    pub(super) fn flush_autosave(&mut self) {
        if self.autosave.take_pending() {
            self.save_now();
        }
    }

    /// Flushes pending edits when the host is hidden or backgrounded.
    pub fn visibility_hidden(&mut self) {
        self.flush_autosave();
    }

    /// Final save and teardown. Further frames never repaint.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.cancel_interaction();
        self.finish_fades();
        self.flush_autosave();
        self.autosave.cancel();
        self.dirty.cancel();
        self.page_state = PageState::Idle;
        self.closed = true;
        info!("Workspace closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.close();
    }
}

/// Parses `#rrggbb`-style hex or a palette name.
pub(super) fn parse_color(raw: &str) -> Option<Color> {
    Color::from_hex(raw).or_else(|| util::name_to_color(raw))
}
