//! Input validation: check a user-supplied path before the parser sees it.
//!
//! ## Why validate magic bytes here?
//!
//! The file dialog filters on `*.pdf`, but nothing stops a user from
//! picking a renamed text file or a truncated download. Checking the
//! `%PDF` magic up front turns that mistake into a precise
//! [`ConvertError::NotAPdf`] instead of an opaque parse failure later.

use crate::error::ConvertError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate a local source path: it must exist, be readable, and start
/// with the PDF magic bytes.
///
/// Returns the path unchanged so call sites can chain on it.
pub fn validate_source(path: &Path) -> Result<PathBuf, ConvertError> {
    if !path.exists() {
        return Err(ConvertError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(path) {
        Ok(mut f) => {
            // Verify PDF magic bytes. A file shorter than the magic is let
            // through; the parser reports it as corrupt with more context.
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(ConvertError::NotAPdf {
                    path: path.to_path_buf(),
                    magic,
                });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(ConvertError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(_) => {
            return Err(ConvertError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
    }

    debug!("Validated source PDF: {}", path.display());
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_found() {
        let err = validate_source(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, ConvertError::FileNotFound { .. }));
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"hello, this is text").unwrap();

        let err = validate_source(&path).unwrap_err();
        match err {
            ConvertError::NotAPdf { magic, .. } => assert_eq!(&magic, b"hell"),
            other => panic!("expected NotAPdf, got {other:?}"),
        }
    }

    #[test]
    fn pdf_magic_passes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ok.pdf");
        std::fs::write(&path, b"%PDF-1.5\n%\xE2\xE3\xCF\xD3\n").unwrap();

        assert_eq!(validate_source(&path).unwrap(), path);
    }

    #[test]
    fn short_file_passes_magic_check() {
        // Shorter than the magic: deferred to the parser.
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiny.pdf");
        std::fs::write(&path, b"%P").unwrap();

        assert!(validate_source(&path).is_ok());
    }
}
