//! Background image decoding.
//!
//! Pages may reference an image drawn under their strokes. Resolving that
//! reference into pixels is delegated to a [`BackgroundDecoder`]; a failed
//! decode is logged by the caller and the page renders without a background.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use log::debug;
use thiserror::Error;
use url::Url;

/// A decoded background ready to be painted.
pub struct BackgroundImage {
    pub width: i32,
    pub height: i32,
    pub surface: cairo::ImageSurface,
}

impl BackgroundImage {
    /// Wraps an already decoded surface.
    pub fn from_surface(surface: cairo::ImageSurface) -> Self {
        Self {
            width: surface.width(),
            height: surface.height(),
            surface,
        }
    }
}

impl std::fmt::Debug for BackgroundImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Errors that can occur while resolving a background reference.
#[derive(Debug, Error)]
pub enum BackgroundError {
    #[error("Unsupported background reference: {0}")]
    UnsupportedReference(String),

    #[error("Failed to open background image: {0}")]
    Open(#[from] std::io::Error),

    #[error("Failed to decode background image: {0}")]
    Decode(String),

    #[error("Background image has no pixels")]
    Empty,
}

/// Resolves a page's background reference into a drawable image.
pub trait BackgroundDecoder {
    fn decode(&self, reference: &str) -> Result<BackgroundImage, BackgroundError>;
}

/// Decodes PNG files referenced by plain path or `file://` URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngFileDecoder;

impl PngFileDecoder {
    fn resolve(reference: &str) -> Result<PathBuf, BackgroundError> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(BackgroundError::UnsupportedReference(String::new()));
        }

        match Url::parse(reference) {
            Ok(url) if url.scheme() == "file" => url
                .to_file_path()
                .map_err(|_| BackgroundError::UnsupportedReference(reference.to_string())),
            // Single-letter schemes are Windows drive letters, not URLs.
            Ok(url) if url.scheme().len() > 1 => {
                Err(BackgroundError::UnsupportedReference(format!("{}: URL", url.scheme())))
            }
            _ => Ok(PathBuf::from(reference)),
        }
    }
}

impl BackgroundDecoder for PngFileDecoder {
    fn decode(&self, reference: &str) -> Result<BackgroundImage, BackgroundError> {
        let path = Self::resolve(reference)?;
        debug!("Decoding background image {}", path.display());

        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);
        let surface =
            cairo::ImageSurface::create_from_png(&mut reader).map_err(|err| BackgroundError::Decode(err.to_string()))?;

        if surface.width() <= 0 || surface.height() <= 0 {
            return Err(BackgroundError::Empty);
        }
        Ok(BackgroundImage::from_surface(surface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(path: &std::path::Path, width: i32, height: i32) {
        let surface = cairo::ImageSurface::create(cairo::Format::ARgb32, width, height).unwrap();
        {
            let ctx = cairo::Context::new(&surface).unwrap();
            ctx.set_source_rgb(0.2, 0.4, 0.6);
            ctx.paint().unwrap();
        }
        let mut file = File::create(path).unwrap();
        surface.write_to_png(&mut file).unwrap();
    }

    #[test]
    fn decodes_plain_paths_and_file_urls() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("paper.png");
        write_png(&path, 40, 30);

        let image = PngFileDecoder.decode(path.to_str().unwrap()).unwrap();
        assert_eq!((image.width, image.height), (40, 30));

        let url = Url::from_file_path(&path).unwrap();
        let image = PngFileDecoder.decode(url.as_str()).unwrap();
        assert_eq!(image.width, 40);
    }

    #[test]
    fn rejects_data_urls_and_missing_files() {
        let err = PngFileDecoder.decode("data:image/png;base64,AAAA").unwrap_err();
        assert!(matches!(err, BackgroundError::UnsupportedReference(_)));

        let err = PngFileDecoder.decode("https://example.com/bg.png").unwrap_err();
        assert!(matches!(err, BackgroundError::UnsupportedReference(_)));

        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("missing.png");
        let err = PngFileDecoder.decode(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, BackgroundError::Open(_)));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("broken.png");
        std::fs::write(&path, b"not a png").unwrap();
        let err = PngFileDecoder.decode(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, BackgroundError::Decode(_)));
    }
}
