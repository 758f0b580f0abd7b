use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local};
use clap::{ArgAction, Parser};
use penmark::background::{BackgroundDecoder, PngFileDecoder};
use penmark::config::Config;
use penmark::draw::PageSize;
use penmark::session::{self, JsonNoteStore, NoteStore, StoreOptions};
use penmark::workspace::render_page_png;

#[derive(Parser, Debug)]
#[command(name = "penmark")]
#[command(
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("PENMARK_GIT_HASH"), ")"),
    about = "Freehand ink engine for note-taking"
)]
struct Cli {
    /// Print a summary of the notes store
    #[arg(long, action = ArgAction::SetTrue)]
    inspect: bool,

    /// Remove the notes file, its backup and lock
    #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["inspect", "render"])]
    clear: bool,

    /// Rasterise a page of the note with this id to PNG
    #[arg(long, value_name = "NOTE_ID", requires = "output")]
    render: Option<String>,

    /// Page index to render (defaults to the note's current page)
    #[arg(long, value_name = "N", requires = "render")]
    page: Option<usize>,

    /// Destination PNG file for --render
    #[arg(long, short = 'o', value_name = "FILE", requires = "render")]
    output: Option<PathBuf>,

    /// Raster width in pixels
    #[arg(long, value_name = "W", requires = "render")]
    width: Option<i32>,

    /// Raster height in pixels
    #[arg(long, value_name = "H", requires = "render")]
    height: Option<i32>,

    /// Notes directory or notes.json file (defaults to the configured store)
    #[arg(long, value_name = "PATH")]
    store: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.clear {
        let options = resolve_store(cli.store.as_deref())?;
        let outcome = session::clear_store(&options)?;
        println!("Notes store: {}", options.base_dir.display());
        println!("  notes file removed:  {}", yes_no(outcome.removed_notes));
        println!("  backup removed:      {}", yes_no(outcome.removed_backup));
        println!("  lock file removed:   {}", yes_no(outcome.removed_lock));
    } else if cli.inspect || cli.render.is_some() {
        let options = resolve_store(cli.store.as_deref())?;
        if cli.inspect {
            print_inspection(&options)?;
        }
        if let Some(note_id) = cli.render.as_deref() {
            let output = cli
                .output
                .as_deref()
                .ok_or_else(|| anyhow!("--render requires --output"))?;
            render_note(&options, note_id, cli.page, cli.width, cli.height, output)?;
        }
    } else {
        // No flags: show usage
        println!("penmark: Freehand ink engine for note-taking");
        println!();
        println!("Usage:");
        println!("  penmark --inspect                          Summarise the notes store");
        println!("  penmark --render NOTE_ID --output FILE     Render a page to PNG");
        println!("          [--page N] [--width W --height H]");
        println!("  penmark --clear                            Delete the stored notes");
        println!("  penmark --help                             Show help");
        println!();
        println!("Add --store PATH to any command to use another notes directory.");
        println!("Set RUST_LOG=debug for verbose logging.");
    }

    Ok(())
}

fn resolve_store(explicit: Option<&Path>) -> Result<StoreOptions> {
    if let Some(path) = explicit {
        return Ok(StoreOptions::for_path(path));
    }
    let config = Config::load()?;
    let config_dir = Config::config_dir()?;
    session::options_from_config(&config.storage, &config_dir)
}

fn print_inspection(options: &StoreOptions) -> Result<()> {
    let inspection = session::inspect_store(options)?;

    println!("Notes file: {}", inspection.notes_path.display());
    if !inspection.exists {
        println!("  (not created yet)");
        return Ok(());
    }
    if let Some(size) = inspection.size_bytes {
        println!("  size:          {size} bytes");
    }
    if let Some(modified) = inspection.modified {
        let modified: DateTime<Local> = modified.into();
        println!("  modified:      {}", modified.format("%Y-%m-%d %H:%M:%S"));
    }
    if let Some(saved) = &inspection.last_modified {
        println!("  last saved:    {saved}");
    }
    println!("  compressed:    {}", yes_no(inspection.compressed));
    if let Some(counts) = inspection.counts {
        println!("  notes:         {}", counts.notes);
        println!("  pages:         {}", counts.pages);
        println!("  strokes:       {}", counts.strokes);
    }

    println!("Backup file: {}", inspection.backup_path.display());
    match inspection.backup_size_bytes {
        Some(size) if inspection.backup_exists => println!("  size:          {size} bytes"),
        _ => println!("  (none)"),
    }
    Ok(())
}

fn render_note(
    options: &StoreOptions,
    note_id: &str,
    page: Option<usize>,
    width: Option<i32>,
    height: Option<i32>,
    output: &Path,
) -> Result<()> {
    let store = JsonNoteStore::new(options.clone());
    let notes = store.load()?;
    let note = notes
        .iter()
        .find(|note| note.id == note_id)
        .ok_or_else(|| anyhow!("No note with id {note_id} in {}", options.notes_file_path().display()))?;

    let index = page.unwrap_or(note.current_page_index);
    let page = note
        .pages
        .get(index)
        .ok_or_else(|| anyhow!("Note {note_id} has {} page(s); page {index} does not exist", note.pages.len()))?;

    let (default_width, default_height) = raster_size(page.page_size);
    let width = width.unwrap_or(default_width);
    let height = height.unwrap_or(default_height);

    let background = page
        .background_image
        .as_deref()
        .and_then(|reference| match PngFileDecoder.decode(reference) {
            Ok(image) => Some(image),
            Err(err) => {
                log::warn!("Rendering without background {reference}: {err}");
                None
            }
        });

    let png = render_page_png(page, background.as_ref(), width, height)
        .with_context(|| format!("Failed to render page {index} of note {note_id}"))?;
    fs::write(output, &png).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Rendered page {index} of \"{}\" ({} strokes) to {} ({width}x{height})",
        note.title,
        page.strokes.len(),
        output.display()
    );
    Ok(())
}

/// Raster size for a page layout when none is given on the command line.
fn raster_size(size: PageSize) -> (i32, i32) {
    match size {
        PageSize::Vertical => (794, 1123),
        PageSize::Horizontal => (1123, 794),
        PageSize::Square => (1000, 1000),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}
