//! Page and note containers for persisted stroke data.

use super::stroke::{Stroke, new_stroke_id};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Default page background.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Layout hint for hosts; the drawing core does not interpret it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    #[default]
    Vertical,
    Horizontal,
    Square,
}

/// A single drawing surface.
///
/// Strokes are stored in draw order (first = bottom, last = top).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub strokes: Vec<Stroke>,
    #[serde(default = "default_background")]
    pub background_color: String,
    #[serde(default)]
    pub page_size: PageSize,
    /// Path or URL of an image drawn under the strokes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

impl Page {
    /// Creates an empty white page.
    pub fn new() -> Self {
        Self {
            id: new_stroke_id(),
            strokes: Vec::new(),
            background_color: default_background(),
            page_size: PageSize::default(),
            background_image: None,
        }
    }
}

/// A notebook made of pages.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub pages: Vec<Page>,
    #[serde(default)]
    pub current_page_index: usize,
    #[serde(default)]
    pub title: String,
    /// RFC 3339 creation time
    #[serde(default)]
    pub created_at: String,
    /// RFC 3339 time of the last committed change
    #[serde(default)]
    pub updated_at: String,
}

impl Note {
    /// Creates a note with a single blank page.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: new_stroke_id(),
            pages: vec![Page::new()],
            current_page_index: 0,
            title: title.into(),
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// Restores the note invariants after loading untrusted data.
    ///
    /// A note always owns at least one page and `current_page_index` always
    /// addresses one of them.
    pub fn normalize(&mut self) {
        if self.pages.is_empty() {
            log::warn!("Note {} has no pages; adding a blank page", self.id);
            self.pages.push(Page::new());
        }
        if self.current_page_index >= self.pages.len() {
            log::warn!(
                "Note {} current page {} out of range; clamping to {}",
                self.id,
                self.current_page_index,
                self.pages.len() - 1
            );
            self.current_page_index = self.pages.len() - 1;
        }
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.pages.get(self.current_page_index)
    }

    pub fn current_page_mut(&mut self) -> Option<&mut Page> {
        self.pages.get_mut(self.current_page_index)
    }

    /// Index of the page with the given id.
    pub fn page_index(&self, page_id: &str) -> Option<usize> {
        self.pages.iter().position(|page| page.id == page_id)
    }

    /// Refreshes `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }

    /// Total number of strokes across all pages.
    pub fn stroke_count(&self) -> usize {
        self.pages.iter().map(|page| page.strokes.len()).sum()
    }
}

fn default_background() -> String {
    DEFAULT_BACKGROUND.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw::{Point, StrokeTool};

    #[test]
    fn normalize_clamps_page_index_and_adds_page() {
        let mut note = Note::new("Scratch");
        note.current_page_index = 7;
        note.normalize();
        assert_eq!(note.current_page_index, 0);

        note.pages.clear();
        note.normalize();
        assert_eq!(note.pages.len(), 1);
        assert_eq!(note.current_page_index, 0);
    }

    #[test]
    fn note_round_trips_through_json() {
        let mut note = Note::new("Lecture");
        let mut stroke = Stroke::new(StrokeTool::Highlighter, "#ffff00", 20.0, Some(0.4));
        stroke.points.push(Point::new(1.0, 2.0));
        note.pages[0].strokes.push(stroke);
        note.pages.push(Page {
            page_size: PageSize::Square,
            background_image: Some("file:///tmp/bg.png".to_string()),
            ..Page::new()
        });

        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"currentPageIndex\":0"));
        assert!(json.contains("\"pageSize\":\"square\""));

        let parsed: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, note);
    }

    #[test]
    fn missing_fields_use_defaults() {
        let parsed: Note = serde_json::from_str(r#"{"id":"n1","pages":[{"id":"p1"}]}"#).unwrap();
        assert_eq!(parsed.pages[0].background_color, DEFAULT_BACKGROUND);
        assert_eq!(parsed.pages[0].page_size, PageSize::Vertical);
        assert!(parsed.pages[0].strokes.is_empty());
    }
}
