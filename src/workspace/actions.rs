use super::core::{Workspace, parse_color};
use crate::draw::{Point, Stroke};
use crate::input::{Tool, Viewport};
use log::{debug, info, warn};

impl Workspace {
    /// Reverts the last action on the active page.
    pub fn undo(&mut self) -> bool {
        self.cancel_interaction();
        let page_id = self.page_id();
        let current = self.committed_strokes();
        let Some(restored) = self.history.undo(&page_id, &current) else {
            return false;
        };
        self.restore_strokes(restored);
        true
    }

    /// Re-applies the last undone action on the active page.
    pub fn redo(&mut self) -> bool {
        self.cancel_interaction();
        let page_id = self.page_id();
        let current = self.committed_strokes();
        let Some(restored) = self.history.redo(&page_id, &current) else {
            return false;
        };
        self.restore_strokes(restored);
        true
    }

    fn restore_strokes(&mut self, strokes: Vec<Stroke>) {
        self.fades.clear();
        self.fade_alphas.clear();
        self.selection = None;
        self.page_mut().strokes = strokes;
        self.mark_changed();
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo(&self.active_page().id)
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo(&self.active_page().id)
    }

    /// Activates `tool`, discarding any unfinished interaction.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool == self.tool {
            return;
        }
        self.cancel_interaction();
        if tool != Tool::Selector {
            self.selection = None;
        }
        debug!("Tool changed: {} -> {}", self.tool.as_str(), tool.as_str());
        self.tool = tool;
        self.dirty.mark();
    }

    /// Activates a tool by name (`pen`, `highlighter`, `eraser`, `selector`/`lasso`).
    pub fn set_tool_by_name(&mut self, name: &str) -> bool {
        match Tool::from_name(name) {
            Some(tool) => {
                self.set_tool(tool);
                true
            }
            None => {
                warn!("Unknown tool '{name}'");
                false
            }
        }
    }

    /// Sets the active tool's color.
    ///
    /// With the selector active and strokes selected, recolors the selection.
    pub fn set_color(&mut self, color: &str) -> bool {
        let Some(parsed) = parse_color(color) else {
            warn!("Ignoring invalid color '{color}'");
            return false;
        };
        if self.tool == Tool::Selector && self.selection.is_some() {
            return self.recolor_selection(color);
        }
        self.settings.set_color(self.tool, parsed.to_hex())
    }

    pub fn set_size(&mut self, size: f64) -> bool {
        self.settings.set_size(self.tool, size)
    }

    pub fn set_opacity(&mut self, opacity: f64) -> bool {
        self.settings.set_opacity(self.tool, opacity)
    }

    /// Changes the color of every selected stroke as one undoable action.
    pub fn recolor_selection(&mut self, color: &str) -> bool {
        let Some(parsed) = parse_color(color) else {
            warn!("Ignoring invalid color '{color}'");
            return false;
        };
        let Some(ids) = self.selection.as_ref().map(|selection| selection.stroke_ids.clone()) else {
            return false;
        };
        if ids.is_empty() {
            return false;
        }

        let hex = parsed.to_hex();
        self.record_history();
        for stroke in self.page_mut().strokes.iter_mut() {
            if ids.contains(&stroke.id) {
                stroke.color = hex.clone();
            }
        }
        info!("Recolored {} stroke(s) to {}", ids.len(), hex);
        self.mark_changed();
        true
    }

    /// Removes every selected stroke as one undoable action.
    pub fn delete_selection(&mut self) -> bool {
        let Some(selection) = self.selection.take() else {
            return false;
        };
        self.cancel_interaction();
        self.record_history();
        self.page_mut()
            .strokes
            .retain(|stroke| !selection.stroke_ids.contains(&stroke.id));
        info!("Deleted {} selected stroke(s)", selection.stroke_ids.len());
        self.mark_changed();
        true
    }

    /// Removes every stroke from the active page as one undoable action.
    pub fn clear_page(&mut self) -> bool {
        self.cancel_interaction();
        self.finish_fades();
        if self.strokes().is_empty() {
            return false;
        }
        self.selection = None;
        self.record_history();
        self.page_mut().strokes.clear();
        self.mark_changed();
        true
    }

    /// Zooms in one step around the canvas centre.
    pub fn zoom_in(&mut self) {
        let next = self.viewport.zoom_in(self.canvas_center(), self.gesture.limits());
        self.set_viewport(next);
    }

    /// Zooms out one step around the canvas centre, snapping back at rest scale.
    pub fn zoom_out(&mut self) {
        let next = self.viewport.zoom_out(self.canvas_center(), self.gesture.limits());
        self.set_viewport(next);
    }

    pub fn reset_zoom(&mut self) {
        self.set_viewport(Viewport::IDENTITY);
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, next: Viewport) {
        if next != self.viewport {
            self.viewport = next;
            self.dirty.mark();
        }
    }

    fn canvas_center(&self) -> Point {
        Point::new(self.surface_width as f64 / 2.0, self.surface_height as f64 / 2.0)
    }
}
