use super::options::StoreOptions;
use super::store::{self, LockKind};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Result of clearing on-disk note data.
#[derive(Debug, Clone, Copy)]
pub struct ClearOutcome {
    pub removed_notes: bool,
    pub removed_backup: bool,
    pub removed_lock: bool,
}

/// Summary information about the notes file, for CLI reporting.
#[derive(Debug, Clone)]
pub struct StoreInspection {
    pub notes_path: PathBuf,
    pub exists: bool,
    pub size_bytes: Option<u64>,
    pub modified: Option<SystemTime>,
    pub backup_path: PathBuf,
    pub backup_exists: bool,
    pub backup_size_bytes: Option<u64>,
    pub counts: Option<NoteCounts>,
    pub compressed: bool,
    pub last_modified: Option<String>,
}

/// Totals across the stored notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteCounts {
    pub notes: usize,
    pub pages: usize,
    pub strokes: usize,
}

/// Remove persisted note files (notes, backup, and lock).
pub fn clear_store(options: &StoreOptions) -> Result<ClearOutcome> {
    Ok(ClearOutcome {
        removed_notes: remove_file_if_exists(&options.notes_file_path())?,
        removed_backup: remove_file_if_exists(&options.backup_file_path())?,
        removed_lock: remove_file_if_exists(&options.lock_file_path())?,
    })
}

/// Inspect the notes file without modifying it.
pub fn inspect_store(options: &StoreOptions) -> Result<StoreInspection> {
    let notes_path = options.notes_file_path();
    let metadata = fs::metadata(&notes_path).ok();
    let exists = metadata.is_some();
    let size_bytes = metadata.as_ref().map(|m| m.len());
    let modified = metadata.as_ref().and_then(|m| m.modified().ok());

    let backup_path = options.backup_file_path();
    let backup_meta = fs::metadata(&backup_path).ok();

    let mut counts = None;
    let mut compressed = false;
    let mut last_modified = None;

    if exists {
        let loaded = store::with_lock(&options.lock_file_path(), LockKind::Shared, || {
            store::load_notes_inner(&notes_path)
        })
        .with_context(|| format!("failed to inspect notes file {}", notes_path.display()))?;

        counts = Some(NoteCounts {
            notes: loaded.notes.len(),
            pages: loaded.notes.iter().map(|note| note.pages.len()).sum(),
            strokes: loaded.notes.iter().map(|note| note.stroke_count()).sum(),
        });
        compressed = loaded.compressed;
        last_modified = Some(loaded.last_modified);
    }

    Ok(StoreInspection {
        notes_path,
        exists,
        size_bytes,
        modified,
        backup_path,
        backup_exists: backup_meta.is_some(),
        backup_size_bytes: backup_meta.as_ref().map(|m| m.len()),
        counts,
        compressed,
        last_modified,
    })
}

fn remove_file_if_exists(path: &Path) -> Result<bool> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("failed to remove {}", path.display()))?;
        Ok(true)
    } else {
        Ok(false)
    }
}
