use super::options::{CompressionMode, StoreOptions};
use crate::draw::Note;
use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use flate2::{Compression, bufread::GzDecoder, write::GzEncoder};
use fs2::FileExt;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fs::{self, File, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::rc::Rc;

const CURRENT_VERSION: u32 = 1;

/// Loads and saves the full note collection.
///
/// The workspace treats saves as fire-and-forget: failures are logged and the
/// editing session carries on in memory.
pub trait NoteStore {
    fn load(&self) -> Result<Vec<Note>>;

    fn save(&mut self, notes: &[Note]) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotesFile {
    version: u32,
    last_modified: String,
    #[serde(default)]
    notes: Vec<Note>,
}

/// Contents of a notes file plus details about how it was stored.
pub struct LoadedNotes {
    pub notes: Vec<Note>,
    pub compressed: bool,
    pub last_modified: String,
}

/// File-backed store writing a single JSON (optionally gzip) document.
#[derive(Debug, Clone)]
pub struct JsonNoteStore {
    options: StoreOptions,
}

impl JsonNoteStore {
    pub fn new(options: StoreOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StoreOptions {
        &self.options
    }
}

impl NoteStore for JsonNoteStore {
    fn load(&self) -> Result<Vec<Note>> {
        let notes_path = self.options.notes_file_path();
        if !notes_path.exists() {
            debug!("No notes file present at {}, starting empty", notes_path.display());
            return Ok(Vec::new());
        }

        let metadata = fs::metadata(&notes_path)
            .with_context(|| format!("failed to stat notes file {}", notes_path.display()))?;
        if metadata.len() > self.options.max_file_size_bytes {
            return Err(anyhow!(
                "notes file {} is {} bytes which exceeds the configured limit ({} bytes)",
                notes_path.display(),
                metadata.len(),
                self.options.max_file_size_bytes
            ));
        }

        let loaded = with_lock(&self.options.lock_file_path(), LockKind::Shared, || {
            load_notes_inner(&notes_path)
        })?;

        info!(
            "Loaded {} note(s) from {} (compressed={})",
            loaded.notes.len(),
            notes_path.display(),
            loaded.compressed
        );
        Ok(loaded.notes)
    }

    fn save(&mut self, notes: &[Note]) -> Result<()> {
        fs::create_dir_all(&self.options.base_dir).with_context(|| {
            format!("failed to create notes directory {}", self.options.base_dir.display())
        })?;

        with_lock(&self.options.lock_file_path(), LockKind::Exclusive, || {
            save_notes_inner(notes, &self.options)
        })
    }
}

#[derive(Clone, Copy)]
pub(crate) enum LockKind {
    Shared,
    Exclusive,
}

/// Runs `f` while holding the store's advisory lock.
pub(crate) fn with_lock<T>(lock_path: &Path, kind: LockKind, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let lock_file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(lock_path)
        .with_context(|| format!("failed to open notes lock file {}", lock_path.display()))?;
    match kind {
        LockKind::Shared => lock_file
            .lock_shared()
            .with_context(|| format!("failed to acquire shared lock {}", lock_path.display()))?,
        LockKind::Exclusive => lock_file
            .lock_exclusive()
            .with_context(|| format!("failed to lock notes file {}", lock_path.display()))?,
    }

    let result = f();

    lock_file
        .unlock()
        .unwrap_or_else(|err| warn!("failed to unlock notes file {}: {}", lock_path.display(), err));

    result
}

fn save_notes_inner(notes: &[Note], options: &StoreOptions) -> Result<()> {
    let notes_path = options.notes_file_path();
    let backup_path = options.backup_file_path();

    let file_payload = NotesFile {
        version: CURRENT_VERSION,
        last_modified: Utc::now().to_rfc3339(),
        notes: notes.to_vec(),
    };

    let mut json_bytes = serde_json::to_vec_pretty(&file_payload).context("failed to serialise notes payload")?;

    if json_bytes.len() as u64 > options.max_file_size_bytes {
        return Err(anyhow!(
            "notes data size {} bytes exceeds the configured limit of {} bytes",
            json_bytes.len(),
            options.max_file_size_bytes
        ));
    }

    let should_compress = match options.compression {
        CompressionMode::Off => false,
        CompressionMode::On => true,
        CompressionMode::Auto => (json_bytes.len() as u64) >= options.auto_compress_threshold_bytes,
    };

    if should_compress {
        json_bytes = compress_bytes(&json_bytes)?;
    }

    let tmp_path = temp_path(&notes_path);
    {
        let mut tmp_file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
            .with_context(|| format!("failed to open temporary notes file {}", tmp_path.display()))?;
        tmp_file.write_all(&json_bytes).context("failed to write notes payload")?;
        tmp_file.sync_all().context("failed to sync temporary notes file")?;
    }

    if notes_path.exists() {
        if options.backup_retention > 0 {
            if backup_path.exists() {
                fs::remove_file(&backup_path).ok();
            }
            fs::rename(&notes_path, &backup_path).with_context(|| {
                format!(
                    "failed to rotate previous notes file {} -> {}",
                    notes_path.display(),
                    backup_path.display()
                )
            })?;
        } else {
            fs::remove_file(&notes_path).ok();
        }
    }

    fs::rename(&tmp_path, &notes_path).with_context(|| {
        format!(
            "failed to move temporary notes file {} -> {}",
            tmp_path.display(),
            notes_path.display()
        )
    })?;

    info!(
        "Saved {} note(s) to {} ({} bytes, compression={})",
        notes.len(),
        notes_path.display(),
        json_bytes.len(),
        should_compress
    );

    Ok(())
}

pub(crate) fn load_notes_inner(notes_path: &Path) -> Result<LoadedNotes> {
    let mut file_bytes = Vec::new();
    {
        let mut file = File::open(notes_path)
            .with_context(|| format!("failed to open notes file {}", notes_path.display()))?;
        file.read_to_end(&mut file_bytes).context("failed to read notes file")?;
    }

    let compressed = is_gzip(&file_bytes);
    let decompressed = if compressed {
        let mut decoder = GzDecoder::new(&file_bytes[..]);
        let mut out = Vec::new();
        decoder.read_to_end(&mut out).context("failed to decompress notes file")?;
        out
    } else {
        file_bytes
    };

    let notes_file: NotesFile = serde_json::from_slice(&decompressed).context("failed to parse notes json")?;
    if notes_file.version > CURRENT_VERSION {
        warn!(
            "Notes file {} has version {} (newer than {}); reading what is understood",
            notes_path.display(),
            notes_file.version,
            CURRENT_VERSION
        );
    }

    let mut notes = notes_file.notes;
    for note in &mut notes {
        note.normalize();
    }

    Ok(LoadedNotes {
        notes,
        compressed,
        last_modified: notes_file.last_modified,
    })
}

fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).context("failed to compress notes payload")?;
    encoder.finish().context("failed to finalise compressed notes payload")
}

pub(crate) fn is_gzip(bytes: &[u8]) -> bool {
    bytes.len() > 2 && bytes[0] == 0x1f && bytes[1] == 0x8b
}

fn temp_path(target: &Path) -> PathBuf {
    let mut candidate = target.with_extension("json.tmp");
    let mut counter = 0u32;
    while candidate.exists() {
        counter += 1;
        candidate = target.with_extension(format!("json.tmp{}", counter));
    }
    candidate
}

#[derive(Debug, Default)]
struct MemoryState {
    notes: Vec<Note>,
    saves: usize,
    fail_saves: bool,
}

/// In-memory store for hosts without a filesystem and for tests.
///
/// Clones share the same contents, so a host can keep a handle after giving
/// the store to a workspace.
#[derive(Debug, Clone, Default)]
pub struct MemoryNoteStore {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notes(notes: Vec<Note>) -> Self {
        let store = Self::new();
        store.state.borrow_mut().notes = notes;
        store
    }

    /// Last saved collection.
    pub fn notes(&self) -> Vec<Note> {
        self.state.borrow().notes.clone()
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.state.borrow().saves
    }

    /// Makes subsequent saves fail, simulating a full disk or quota error.
    pub fn set_fail_saves(&self, fail: bool) {
        self.state.borrow_mut().fail_saves = fail;
    }
}

impl NoteStore for MemoryNoteStore {
    fn load(&self) -> Result<Vec<Note>> {
        let mut notes = self.state.borrow().notes.clone();
        for note in &mut notes {
            note.normalize();
        }
        Ok(notes)
    }

    fn save(&mut self, notes: &[Note]) -> Result<()> {
        let mut state = self.state.borrow_mut();
        if state.fail_saves {
            return Err(anyhow!("in-memory store rejected the save"));
        }
        state.notes = notes.to_vec();
        state.saves += 1;
        Ok(())
    }
}
