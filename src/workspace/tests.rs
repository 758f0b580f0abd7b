use super::*;
use crate::config::Config;
use crate::draw::{Note, Point, Stroke, StrokeTool};
use crate::input::{InputProfile, PointerEvent, Tool, ToolEvent, WheelEvent};
use crate::session::{MemoryNoteStore, NoteStore};
use anyhow::{Result, anyhow};
use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

fn create_test_workspace() -> (Workspace, MemoryNoteStore) {
    let store = MemoryNoteStore::new();
    let workspace = Workspace::new(&Config::default(), Box::new(store.clone()), InputProfile::desktop());
    (workspace, store)
}

fn at(start: Instant, millis: u64) -> Instant {
    start + Duration::from_millis(millis)
}

/// Drags the pen through `points` and lifts it at the last one.
fn draw(workspace: &mut Workspace, points: &[(f64, f64)], now: Instant) {
    let (x, y) = points[0];
    workspace.pointer_down(&PointerEvent::pen(x, y), now);
    for &(x, y) in &points[1..] {
        workspace.pointer_move(&PointerEvent::pen(x, y), now);
    }
    let (x, y) = points[points.len() - 1];
    workspace.pointer_up(&PointerEvent::pen(x, y), now);
}

fn undo_depth(workspace: &Workspace) -> usize {
    workspace
        .history
        .buffer(&workspace.active_page().id)
        .map_or(0, |buffer| buffer.undo_depth())
}

fn xs(stroke: &Stroke) -> Vec<f64> {
    stroke.points.iter().map(|p| p.x).collect()
}

#[test]
fn pen_stroke_commits_and_undo_redo_round_trip() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();

    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)], now);

    assert_eq!(workspace.strokes().len(), 1);
    let stroke = &workspace.strokes()[0];
    assert_eq!(stroke.color, "#000000");
    assert_eq!(stroke.size, 4.0);
    assert_eq!(xs(stroke), vec![0.0, 5.0, 10.0, 15.0, 20.0]);
    assert!(workspace.live_stroke().is_none());
    assert!(workspace.can_undo());
    assert!(!workspace.can_redo());

    assert!(workspace.undo());
    assert!(workspace.strokes().is_empty());
    assert!(workspace.can_redo());
    assert!(!workspace.undo());

    assert!(workspace.redo());
    assert_eq!(workspace.strokes().len(), 1);
}

#[test]
fn new_commit_after_undo_clears_redo() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);
    draw(&mut workspace, &[(0.0, 20.0), (10.0, 20.0)], now);

    assert!(workspace.undo());
    assert!(workspace.undo());
    assert!(workspace.strokes().is_empty());
    assert!(workspace.redo());
    assert!(workspace.redo());
    assert_eq!(workspace.strokes().len(), 2);

    assert!(workspace.undo());
    draw(&mut workspace, &[(0.0, 40.0), (10.0, 40.0)], now);
    assert!(!workspace.can_redo());
    assert!(!workspace.redo());
}

#[test]
fn empty_commit_is_never_appended() {
    let (mut workspace, _store) = create_test_workspace();
    let empty = Stroke::new(StrokeTool::Pen, "#000000", 4.0, None);
    workspace.apply_tool_event(ToolEvent::StrokeCommitted(empty), Instant::now());
    assert!(workspace.strokes().is_empty());
    assert!(!workspace.can_undo());
}

#[test]
fn live_stroke_is_visible_before_commit() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();
    workspace.pointer_down(&PointerEvent::pen(0.0, 0.0), now);
    workspace.pointer_move(&PointerEvent::pen(4.0, 0.0), now);

    let live = workspace.live_stroke().unwrap();
    assert_eq!(live.points.len(), 2);
    assert!(workspace.strokes().is_empty());

    workspace.set_tool(Tool::Highlighter);
    assert!(workspace.live_stroke().is_none());
    workspace.pointer_up(&PointerEvent::pen(4.0, 0.0), now);
    assert!(workspace.strokes().is_empty());
}

#[test]
fn selection_drag_bakes_delta_with_single_snapshot() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);
    draw(&mut workspace, &[(0.0, 20.0), (10.0, 20.0)], now);
    draw(&mut workspace, &[(100.0, 100.0), (110.0, 100.0)], now);
    let before: Vec<Stroke> = workspace.strokes().to_vec();
    assert_eq!(undo_depth(&workspace), 3);

    workspace.set_tool(Tool::Selector);
    draw(
        &mut workspace,
        &[(-5.0, -5.0), (60.0, -5.0), (60.0, 60.0), (-5.0, 60.0)],
        now,
    );
    let selection = workspace.selection().unwrap();
    assert_eq!(selection.stroke_ids.len(), 2);
    assert!(selection.stroke_ids.contains(&before[0].id));
    assert!(selection.stroke_ids.contains(&before[1].id));

    draw(
        &mut workspace,
        &[(5.0, 10.0), (8.0, 12.0), (12.0, 15.0), (15.0, 17.0)],
        now,
    );

    assert_eq!(undo_depth(&workspace), 4);
    let after = workspace.strokes();
    for index in 0..2 {
        for (moved, original) in after[index].points.iter().zip(&before[index].points) {
            assert_eq!(*moved, Point::new(original.x + 10.0, original.y + 7.0));
        }
    }
    assert_eq!(after[2], before[2]);

    let selection = workspace.selection().unwrap();
    assert_eq!(selection.drag_delta, None);
    assert_eq!(selection.bounding_box.origin(), Point::new(10.0, 7.0));

    assert!(workspace.undo());
    assert_eq!(workspace.strokes(), before.as_slice());
}

#[test]
fn lasso_outside_selection_starts_over() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);
    workspace.set_tool(Tool::Selector);
    draw(&mut workspace, &[(-5.0, -5.0), (20.0, -5.0), (20.0, 5.0), (-5.0, 5.0)], now);
    assert!(workspace.selection().is_some());

    draw(&mut workspace, &[(200.0, 200.0), (210.0, 200.0), (210.0, 210.0)], now);
    assert!(workspace.selection().is_none());
    assert_eq!(undo_depth(&workspace), 1);
}

#[test]
fn eraser_fades_then_splices_with_one_snapshot_per_gesture() {
    let (mut workspace, _store) = create_test_workspace();
    let start = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], start);
    draw(&mut workspace, &[(0.0, 20.0), (10.0, 20.0)], start);

    workspace.set_tool(Tool::Eraser);
    workspace.pointer_down(&PointerEvent::pen(5.0, 0.0), at(start, 10));
    workspace.pointer_move(&PointerEvent::pen(5.0, 20.0), at(start, 20));
    workspace.pointer_up(&PointerEvent::pen(5.0, 20.0), at(start, 30));

    assert_eq!(undo_depth(&workspace), 3);
    assert_eq!(workspace.strokes().len(), 2, "strokes stay while fading");
    assert!(workspace.committed_strokes().is_empty());

    assert!(workspace.frame(at(start, 100)));
    assert_eq!(workspace.strokes().len(), 2);
    let alpha = workspace.fade_alphas.values().copied().fold(0.0, f64::max);
    assert!(alpha > 0.0 && alpha < 1.0);

    workspace.frame(at(start, 400));
    assert!(workspace.strokes().is_empty());

    assert!(workspace.undo());
    assert_eq!(workspace.strokes().len(), 2);
}

#[test]
fn undo_during_fade_restores_strokes() {
    let (mut workspace, _store) = create_test_workspace();
    let start = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], start);
    workspace.set_tool(Tool::Eraser);
    workspace.pointer_down(&PointerEvent::pen(5.0, 0.0), start);
    workspace.pointer_up(&PointerEvent::pen(5.0, 0.0), start);

    assert!(workspace.undo());
    workspace.frame(at(start, 1_000));
    assert_eq!(workspace.strokes().len(), 1);
    assert!(workspace.can_redo());
}

#[test]
fn zero_fade_removes_immediately() {
    let mut config = Config::default();
    config.eraser.fade_ms = 0;
    let mut workspace = Workspace::new(&config, Box::new(MemoryNoteStore::new()), InputProfile::desktop());
    let now = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);

    workspace.set_tool(Tool::Eraser);
    workspace.pointer_down(&PointerEvent::pen(5.0, 3.0), now);
    assert!(workspace.strokes().is_empty());
}

#[test]
fn autosave_is_debounced() {
    let (mut workspace, store) = create_test_workspace();
    let start = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], start);
    assert_eq!(workspace.page_state(), PageState::Dirty);

    draw(&mut workspace, &[(0.0, 20.0), (10.0, 20.0)], at(start, 300));
    workspace.frame(at(start, 600));
    assert_eq!(store.save_count(), 0, "second edit pushed the deadline back");

    workspace.frame(at(start, 900));
    assert_eq!(store.save_count(), 1);
    assert_eq!(workspace.page_state(), PageState::Loaded);
    assert_eq!(store.notes()[0].pages[0].strokes.len(), 2);

    let change = workspace.take_stroke_change().unwrap();
    assert_eq!(change.strokes.len(), 2);
    assert_eq!(change.page_id, workspace.active_page().id);
    assert!(change.png.is_none());
    assert!(workspace.take_stroke_change().is_none());
}

#[test]
fn mobile_profile_uses_longer_autosave_delay() {
    let store = MemoryNoteStore::new();
    let mut workspace = Workspace::new(&Config::default(), Box::new(store.clone()), InputProfile::stylus_tablet());
    let start = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], start);

    workspace.frame(at(start, 1_000));
    assert_eq!(store.save_count(), 0);
    workspace.frame(at(start, 2_500));
    assert_eq!(store.save_count(), 1);
}

#[test]
fn stroke_change_carries_png_when_sized() {
    let (mut workspace, _store) = create_test_workspace();
    workspace.set_surface_size(64, 48);
    let start = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], start);
    workspace.frame(at(start, 1_000));

    let png = workspace.take_stroke_change().unwrap().png.unwrap();
    assert_eq!(&png[..4], &[0x89, b'P', b'N', b'G']);
}

#[test]
fn page_switch_flushes_pending_edits() {
    let (mut workspace, store) = create_test_workspace();
    let now = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);

    let index = workspace.add_page();
    assert_eq!(index, 1);
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.notes()[0].pages[0].strokes.len(), 1);
    assert!(workspace.strokes().is_empty());
    assert!(!workspace.can_undo(), "history is per page");

    assert!(workspace.switch_page(0));
    assert_eq!(store.notes()[0].pages.len(), 2);
    assert!(workspace.can_undo());
    assert!(!workspace.switch_page(5));
}

#[test]
fn switching_pages_finishes_fades_before_saving() {
    let (mut workspace, store) = create_test_workspace();
    let now = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);
    workspace.add_page();
    workspace.switch_page(0);

    workspace.set_tool(Tool::Eraser);
    workspace.pointer_down(&PointerEvent::pen(5.0, 0.0), now);
    workspace.pointer_up(&PointerEvent::pen(5.0, 0.0), now);
    workspace.switch_page(1);

    assert!(store.notes()[0].pages[0].strokes.is_empty());
    assert!(workspace.notes()[0].pages[0].strokes.is_empty());
}

#[test]
fn delete_page_keeps_at_least_one() {
    let (mut workspace, _store) = create_test_workspace();
    assert!(!workspace.delete_page(0));
    workspace.add_page();
    workspace.add_page();
    assert_eq!(workspace.active_note().pages.len(), 3);
    assert_eq!(workspace.active_page_index(), 2);

    assert!(workspace.delete_page(2));
    assert_eq!(workspace.active_page_index(), 1);
    assert!(workspace.delete_page(0));
    assert_eq!(workspace.active_page_index(), 0);
    assert!(!workspace.delete_page(0));
}

#[test]
fn notes_can_be_created_and_reopened() {
    let (mut workspace, store) = create_test_workspace();
    let now = Instant::now();
    let first = workspace.active_note().id.clone();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);

    let second = workspace.create_note("Second");
    assert_eq!(workspace.active_note().id, second);
    assert!(workspace.strokes().is_empty());
    assert_eq!(store.notes().len(), 1, "flushed before the new note existed");

    assert!(workspace.open_note(&first));
    assert_eq!(workspace.strokes().len(), 1);
    assert_eq!(store.notes().len(), 2);
    assert!(!workspace.open_note("missing"));
}

#[test]
fn existing_notes_are_loaded_from_store() {
    let mut note = Note::new("Saved");
    let mut stroke = Stroke::new(StrokeTool::Pen, "#ff0000", 2.0, None);
    stroke.points.push(Point::new(1.0, 1.0));
    note.pages[0].strokes.push(stroke);
    note.current_page_index = 9;

    let store = MemoryNoteStore::with_notes(vec![note]);
    let workspace = Workspace::new(&Config::default(), Box::new(store), InputProfile::desktop());
    assert_eq!(workspace.notes().len(), 1);
    assert_eq!(workspace.active_page_index(), 0);
    assert_eq!(workspace.strokes().len(), 1);
}

#[test]
fn drop_performs_final_save() {
    let (mut workspace, store) = create_test_workspace();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], Instant::now());
    assert_eq!(store.save_count(), 0);
    drop(workspace);
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.notes()[0].pages[0].strokes.len(), 1);
}

#[test]
fn close_saves_once_and_stops_rendering() {
    let (mut workspace, store) = create_test_workspace();
    let now = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);
    workspace.close();
    assert_eq!(store.save_count(), 1);
    assert!(workspace.is_closed());
    assert_eq!(workspace.page_state(), PageState::Idle);
    assert!(!workspace.frame(at(now, 5_000)));

    drop(workspace);
    assert_eq!(store.save_count(), 1);
}

#[test]
fn visibility_hidden_flushes_autosave() {
    let (mut workspace, store) = create_test_workspace();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], Instant::now());
    workspace.visibility_hidden();
    assert_eq!(store.save_count(), 1);
    assert!(!workspace.has_pending_autosave());
    workspace.visibility_hidden();
    assert_eq!(store.save_count(), 1);
}

#[test]
fn failed_save_keeps_session_alive() {
    let (mut workspace, store) = create_test_workspace();
    store.set_fail_saves(true);
    let start = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], start);
    workspace.frame(at(start, 1_000));

    assert_eq!(store.save_count(), 0);
    assert_eq!(workspace.page_state(), PageState::Loaded);
    draw(&mut workspace, &[(0.0, 20.0), (10.0, 20.0)], at(start, 1_100));
    assert_eq!(workspace.strokes().len(), 2);

    store.set_fail_saves(false);
    workspace.frame(at(start, 2_000));
    assert_eq!(store.notes()[0].pages[0].strokes.len(), 2);
}

struct BrokenStore {
    saves: Rc<Cell<usize>>,
}

impl NoteStore for BrokenStore {
    fn load(&self) -> Result<Vec<Note>> {
        Err(anyhow!("corrupt notes file"))
    }

    fn save(&mut self, _notes: &[Note]) -> Result<()> {
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

/// Hands notes back exactly as stored, without normalising them.
struct RawStore {
    notes: Vec<Note>,
}

impl NoteStore for RawStore {
    fn load(&self) -> Result<Vec<Note>> {
        Ok(self.notes.clone())
    }

    fn save(&mut self, notes: &[Note]) -> Result<()> {
        self.notes = notes.to_vec();
        Ok(())
    }
}

#[test]
fn loaded_notes_are_normalized() {
    let mut out_of_range = Note::new("Out of range");
    out_of_range.current_page_index = 3;
    let mut pageless = Note::new("Pageless");
    pageless.pages.clear();

    let store = RawStore {
        notes: vec![out_of_range, pageless],
    };
    let mut workspace = Workspace::new(&Config::default(), Box::new(store), InputProfile::desktop());
    assert_eq!(workspace.active_page_index(), 0);
    assert!(workspace.strokes().is_empty());

    let pageless_id = workspace.notes()[1].id.clone();
    assert!(workspace.open_note(&pageless_id));
    assert_eq!(workspace.active_note().pages.len(), 1);
    assert_eq!(workspace.active_page_index(), 0);
}

#[test]
fn failed_load_never_overwrites_store() {
    let saves = Rc::new(Cell::new(0));
    let store = BrokenStore { saves: saves.clone() };
    let mut workspace = Workspace::new(&Config::default(), Box::new(store), InputProfile::desktop());
    assert_eq!(workspace.notes().len(), 1);

    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], Instant::now());
    workspace.close();
    assert_eq!(saves.get(), 0);
    assert!(workspace.take_stroke_change().is_some());
}

#[test]
fn second_touch_cancels_drawing() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();
    workspace.pointer_down(&PointerEvent::touch(1, 0.0, 0.0), now);
    workspace.pointer_move(&PointerEvent::touch(1, 10.0, 0.0), now);
    assert!(workspace.live_stroke().is_some());

    workspace.pointer_down(&PointerEvent::touch(2, 100.0, 0.0), now);
    assert!(workspace.live_stroke().is_none());
    workspace.pointer_up(&PointerEvent::touch(1, 10.0, 0.0), now);
    workspace.pointer_up(&PointerEvent::touch(2, 100.0, 0.0), now);
    assert!(workspace.strokes().is_empty());
    assert!(!workspace.can_undo());
}

#[test]
fn pinch_updates_apply_on_frame() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();
    workspace.frame(now);

    workspace.pointer_down(&PointerEvent::touch(1, 100.0, 100.0), now);
    workspace.pointer_down(&PointerEvent::touch(2, 200.0, 100.0), now);
    workspace.pointer_move(&PointerEvent::touch(2, 300.0, 100.0), now);
    assert_eq!(workspace.viewport().scale, 1.0, "update waits for the frame");

    assert!(workspace.frame(now));
    assert!((workspace.viewport().scale - 2.0).abs() < 1e-9);
    assert!(workspace.strokes().is_empty());
}

#[test]
fn wheel_and_zoom_buttons() {
    let (mut workspace, _store) = create_test_workspace();
    workspace.set_surface_size(200, 100);

    assert!(workspace.wheel(&WheelEvent::new(50.0, 50.0, -100.0)));
    assert!(workspace.viewport().scale > 1.0);
    workspace.reset_zoom();
    assert_eq!(workspace.viewport(), crate::input::Viewport::IDENTITY);

    workspace.zoom_in();
    let viewport = workspace.viewport();
    assert!((viewport.scale - 1.2).abs() < 1e-9);
    let center = viewport.local_to_model(Point::new(100.0, 50.0));
    assert!((center.x - 100.0).abs() < 1e-9 && (center.y - 50.0).abs() < 1e-9);

    workspace.zoom_out();
    let viewport = workspace.viewport();
    assert!((viewport.scale - 1.0).abs() < 1e-9);
    assert!(viewport.offset_x.abs() < 1e-9 && viewport.offset_y.abs() < 1e-9);
}

#[test]
fn drawing_maps_through_zoomed_viewport() {
    let (mut workspace, _store) = create_test_workspace();
    workspace.set_surface_size(200, 200);
    workspace.zoom_in();
    let viewport = workspace.viewport();

    draw(&mut workspace, &[(100.0, 100.0), (110.0, 100.0)], Instant::now());
    let first = workspace.strokes()[0].points[0];
    let expected = viewport.local_to_model(Point::new(100.0, 100.0));
    assert!((first.x - expected.x).abs() < 1e-9 && (first.y - expected.y).abs() < 1e-9);
}

#[test]
fn selector_color_recolors_selection() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);
    draw(&mut workspace, &[(100.0, 100.0), (110.0, 100.0)], now);

    workspace.set_tool(Tool::Selector);
    draw(&mut workspace, &[(-5.0, -5.0), (20.0, -5.0), (20.0, 5.0), (-5.0, 5.0)], now);
    assert!(!workspace.set_color("not-a-color"));
    assert!(workspace.set_color("red"));

    assert_eq!(workspace.strokes()[0].color, "#ff0000");
    assert_eq!(workspace.strokes()[1].color, "#000000");
    assert_eq!(workspace.settings().pen_color, "#000000");
    assert_eq!(undo_depth(&workspace), 3);

    assert!(workspace.delete_selection());
    assert_eq!(workspace.strokes().len(), 1);
    assert!(workspace.undo());
    assert_eq!(workspace.strokes().len(), 2);
}

#[test]
fn tool_setters_follow_active_tool() {
    let (mut workspace, _store) = create_test_workspace();
    assert!(workspace.set_color("#1e88e5"));
    assert_eq!(workspace.settings().pen_color, "#1e88e5");
    assert!(workspace.set_size(8.0));
    assert_eq!(workspace.settings().pen_size, 8.0);
    assert!(!workspace.set_opacity(0.5));

    assert!(workspace.set_tool_by_name("highlighter"));
    assert!(workspace.set_opacity(0.5));
    assert_eq!(workspace.settings().highlighter_opacity, 0.5);
    assert!(!workspace.set_tool_by_name("brush"));
    assert_eq!(workspace.tool(), Tool::Highlighter);
}

#[test]
fn clear_page_is_undoable() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();
    assert!(!workspace.clear_page());
    draw(&mut workspace, &[(0.0, 0.0), (10.0, 0.0)], now);
    draw(&mut workspace, &[(0.0, 20.0), (10.0, 20.0)], now);

    assert!(workspace.clear_page());
    assert!(workspace.strokes().is_empty());
    assert!(workspace.undo());
    assert_eq!(workspace.strokes().len(), 2);
}

#[test]
fn background_color_is_validated() {
    let (mut workspace, _store) = create_test_workspace();
    assert!(!workspace.set_background_color("paper"));
    assert!(workspace.set_background_color("#fdf6e3"));
    assert_eq!(workspace.active_page().background_color, "#fdf6e3");
    assert!(workspace.has_pending_autosave());
}

#[test]
fn missing_background_image_is_ignored() {
    let (mut workspace, _store) = create_test_workspace();
    workspace.set_background_image(Some("/nonexistent/penmark-bg.png".to_string()));
    assert!(workspace.background.is_none());
    workspace.set_surface_size(32, 32);
    assert!(workspace.export_png().is_ok());
}

#[test]
fn repaints_coalesce_per_frame() {
    let (mut workspace, _store) = create_test_workspace();
    let now = Instant::now();
    assert!(workspace.frame(now));
    assert!(!workspace.frame(now));

    workspace.pointer_down(&PointerEvent::pen(0.0, 0.0), now);
    workspace.pointer_move(&PointerEvent::pen(5.0, 0.0), now);
    workspace.pointer_move(&PointerEvent::pen(10.0, 0.0), now);
    assert!(workspace.needs_repaint());
    assert!(workspace.frame(now));
    assert!(!workspace.frame(now));
}

#[test]
fn export_requires_surface_size() {
    let (mut workspace, _store) = create_test_workspace();
    assert!(matches!(workspace.export_png(), Err(ExportError::EmptySurface(0, 0))));

    workspace.set_surface_size(40, 30);
    let png = workspace.export_png().unwrap();
    assert_eq!(&png[1..4], b"PNG");
}
