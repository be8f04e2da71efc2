//! JSON document read/write primitives.
//!
//! # Responsibility
//! - Read documents with corruption recovery.
//! - Replace documents atomically so readers never see a half-written file.
//!
//! # Invariants
//! - Writes go to a temp file in the target directory, are flushed to disk
//!   and then renamed over the target.
//! - Output is pretty-printed JSON with 4-space indentation.

use super::{RepoError, RepoResult};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Outcome of reading one document from disk.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentRead<T> {
    /// File exists and decoded successfully.
    Loaded(T),
    /// File does not exist or is empty.
    Missing,
    /// File exists but could not be read or decoded.
    Corrupted,
}

impl<T> DocumentRead<T> {
    /// Returns the loaded value or `None` for missing/corrupted documents.
    pub fn loaded(self) -> Option<T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Missing | Self::Corrupted => None,
        }
    }
}

/// Reads and decodes one JSON document.
///
/// Never fails: unreadable or malformed content is reported as
/// `DocumentRead::Corrupted` and logged.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> DocumentRead<T> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => return DocumentRead::Missing,
        Err(err) => {
            warn!(
                "event=document_read module=repo status=corrupted path={} error={}",
                path.display(),
                err
            );
            return DocumentRead::Corrupted;
        }
    };

    if content.trim().is_empty() {
        return DocumentRead::Missing;
    }

    match serde_json::from_str(&content) {
        Ok(value) => DocumentRead::Loaded(value),
        Err(err) => {
            warn!(
                "event=document_read module=repo status=corrupted path={} error={}",
                path.display(),
                err
            );
            DocumentRead::Corrupted
        }
    }
}

/// Reads one document, falling back to `T::default()` when missing or corrupted.
pub fn read_document_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    read_document(path).loaded().unwrap_or_default()
}

/// Encodes `value` and atomically replaces the document at `path`.
///
/// Parent directories are created when absent.
///
/// # Errors
/// - `RepoError::Io` when the directory, temp file, flush or rename fails.
/// - `RepoError::Serialize` when `value` cannot be encoded.
pub fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> RepoResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| io_error(dir, source))?;

    let mut temp = NamedTempFile::new_in(dir).map_err(|source| io_error(dir, source))?;
    {
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut temp, formatter);
        value
            .serialize(&mut serializer)
            .map_err(|source| RepoError::Serialize {
                path: path.to_path_buf(),
                source,
            })?;
    }
    temp.write_all(b"\n")
        .and_then(|()| temp.as_file().sync_all())
        .map_err(|source| io_error(path, source))?;

    temp.persist(path)
        .map_err(|err| io_error(path, err.error))?;

    debug!(
        "event=document_write module=repo status=ok path={}",
        path.display()
    );
    Ok(())
}

fn io_error(path: &Path, source: std::io::Error) -> RepoError {
    RepoError::Io {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::{read_document, read_document_or_default, write_document, DocumentRead};
    use crate::repo::RepoError;
    use std::collections::BTreeMap;
    use std::fs;

    #[test]
    fn missing_and_empty_files_read_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(read_document::<Vec<String>>(&path), DocumentRead::Missing);

        fs::write(&path, "  \n").unwrap();
        assert_eq!(read_document::<Vec<String>>(&path), DocumentRead::Missing);
    }

    #[test]
    fn malformed_file_reads_as_corrupted_and_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "[\"half").unwrap();

        assert_eq!(read_document::<Vec<String>>(&path), DocumentRead::Corrupted);
        assert!(read_document_or_default::<Vec<String>>(&path).is_empty());
    }

    #[test]
    fn write_creates_parent_dirs_and_uses_four_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        write_document(&path, &vec!["a".to_string(), "b".to_string()]).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert_eq!(raw, "[\n    \"a\",\n    \"b\"\n]\n");
        assert_eq!(
            read_document::<Vec<String>>(&path),
            DocumentRead::Loaded(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn write_replaces_existing_document_without_leftover_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write_document(&path, &1u32).unwrap();
        write_document(&path, &2u32).unwrap();

        assert_eq!(read_document::<u32>(&path), DocumentRead::Loaded(2));
        let entries = fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn failed_write_leaves_previous_bytes_and_no_temp_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        write_document(&path, &vec!["kept".to_string()]).unwrap();
        let before = fs::read(&path).unwrap();

        let mut unencodable = BTreeMap::new();
        unencodable.insert((1u8, 2u8), 3u8);
        let err = write_document(&path, &unencodable).unwrap_err();
        assert!(matches!(err, RepoError::Serialize { .. }));

        assert_eq!(fs::read(&path).unwrap(), before);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
