use crate::config::{StorageCompression, StorageConfig, StorageMode};
use anyhow::{Result, anyhow};
use std::path::{Path, PathBuf};

pub const DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES: u64 = 100 * 1024; // 100 KiB

const NOTES_FILE_STEM: &str = "notes";

/// Compression preference for the notes file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// Always write plain JSON.
    Off,
    /// Always write gzip-compressed JSON.
    On,
    /// Write gzip when payload exceeds the configured threshold.
    Auto,
}

/// Runtime options for the file-backed note store.
#[derive(Debug, Clone)]
pub struct StoreOptions {
    pub base_dir: PathBuf,
    pub max_file_size_bytes: u64,
    pub compression: CompressionMode,
    pub auto_compress_threshold_bytes: u64,
    pub backup_retention: usize,
}

impl StoreOptions {
    /// Options with default limits rooted at `base_dir`.
    pub fn new(base_dir: PathBuf) -> Self {
        Self {
            base_dir,
            max_file_size_bytes: 10 * 1024 * 1024,
            compression: CompressionMode::Auto,
            auto_compress_threshold_bytes: DEFAULT_AUTO_COMPRESS_THRESHOLD_BYTES,
            backup_retention: 1,
        }
    }

    /// Options for a store file given directly (e.g. `--store` on the CLI).
    ///
    /// `path` may name the notes file itself or its directory.
    pub fn for_path(path: &Path) -> Self {
        if path.extension().is_some_and(|ext| ext == "json") {
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            Self::new(base_dir)
        } else {
            Self::new(path.to_path_buf())
        }
    }

    pub fn notes_file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{NOTES_FILE_STEM}.json"))
    }

    pub fn backup_file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{NOTES_FILE_STEM}.json.bak"))
    }

    pub fn lock_file_path(&self) -> PathBuf {
        self.base_dir.join(format!("{NOTES_FILE_STEM}.lock"))
    }
}

/// Build runtime store options from configuration values.
pub fn options_from_config(storage_cfg: &StorageConfig, config_dir: &Path) -> Result<StoreOptions> {
    let base_dir = match storage_cfg.storage {
        StorageMode::Auto => {
            let root = dirs::data_dir().unwrap_or_else(|| config_dir.to_path_buf());
            root.join("penmark")
        }
        StorageMode::Config => config_dir.to_path_buf(),
        StorageMode::Custom => {
            let raw = storage_cfg
                .custom_directory
                .as_ref()
                .ok_or_else(|| anyhow!("storage.custom_directory must be set when storage = \"custom\""))?;
            let expanded = expand_tilde(raw);
            if expanded.as_os_str().is_empty() {
                return Err(anyhow!("storage.custom_directory resolved to an empty path"));
            }
            expanded
        }
    };

    let mut options = StoreOptions::new(base_dir);
    options.max_file_size_bytes = storage_cfg.max_file_size_mb.saturating_mul(1024 * 1024).max(1);
    options.auto_compress_threshold_bytes = storage_cfg.auto_compress_threshold_kb.saturating_mul(1024).max(1);
    options.compression = match storage_cfg.compress {
        StorageCompression::Auto => CompressionMode::Auto,
        StorageCompression::On => CompressionMode::On,
        StorageCompression::Off => CompressionMode::Off,
    };
    options.backup_retention = storage_cfg.backup_retention;

    Ok(options)
}

fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(stripped);
    }
    PathBuf::from(path)
}
