//! JSON file store

use crate::StorageError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How `load_or_default` obtained its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Parsed from the file
    Loaded,
    /// No file; a default was created
    Missing,
    /// The file did not hold a valid record; it was replaced with a default
    Corrupt(String),
}

/// A value persisted as a whole-file JSON document.
///
/// Saves overwrite the file in place; there is no locking or atomic rename.
pub struct JsonStore<T> {
    path: PathBuf,
    _record: PhantomData<fn() -> T>,
}

impl<T> JsonStore<T>
where
    T: Serialize + DeserializeOwned + Default,
{
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file
    pub fn load(&self) -> Result<T, StorageError> {
        let bytes = std::fs::read(&self.path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                StorageError::NotFound
            } else {
                self.io_error(e)
            }
        })?;

        serde_json::from_slice(&bytes).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// Load the record, or start over with the default one.
    ///
    /// A missing or unparsable file is logged and replaced on disk with the
    /// default value. Other I/O failures propagate.
    pub fn load_or_default(&self) -> Result<(T, LoadOutcome), StorageError> {
        let outcome = match self.load() {
            Ok(value) => {
                info!("Loaded record from {}", self.path.display());
                return Ok((value, LoadOutcome::Loaded));
            }
            Err(StorageError::NotFound) => {
                warn!(
                    "Record file {} does not exist, creating a new one",
                    self.path.display()
                );
                LoadOutcome::Missing
            }
            Err(StorageError::SerializationError(reason)) => {
                warn!(
                    "Record file {} is not a valid record ({}), creating a new one",
                    self.path.display(),
                    reason
                );
                LoadOutcome::Corrupt(reason)
            }
            Err(e) => return Err(e),
        };

        let value = T::default();
        self.save(&value)?;
        Ok((value, outcome))
    }

    /// Overwrite the file, creating parent directories as needed
    pub fn save(&self, value: &T) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let mut buf = Vec::with_capacity(512);
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value
            .serialize(&mut ser)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        std::fs::write(&self.path, &buf).map_err(|e| self.io_error(e))?;
        debug!("Saved record to {} ({} bytes)", self.path.display(), buf.len());
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct Counter {
        seconds: f64,
        active: bool,
    }

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("storage-{}", uuid::Uuid::new_v4()))
            .join("records")
            .join(name)
    }

    fn cleanup(path: &Path) {
        if let Some(root) = path.parent().and_then(Path::parent) {
            let _ = std::fs::remove_dir_all(root);
        }
    }

    #[test]
    fn test_missing_file_creates_default() {
        let path = scratch_path("counter.json");
        let store = JsonStore::<Counter>::new(&path);

        let (value, outcome) = store.load_or_default().unwrap();
        assert_eq!(value, Counter::default());
        assert_eq!(outcome, LoadOutcome::Missing);
        // written immediately, parent directories included
        assert_eq!(store.load().unwrap(), Counter::default());
        cleanup(&path);
    }

    #[test]
    fn test_save_and_reload() {
        let path = scratch_path("counter.json");
        let store = JsonStore::<Counter>::new(&path);
        let value = Counter {
            seconds: 12.5,
            active: true,
        };

        store.save(&value).unwrap();
        let (loaded, outcome) = store.load_or_default().unwrap();
        assert_eq!(loaded, value);
        assert_eq!(outcome, LoadOutcome::Loaded);
        cleanup(&path);
    }

    #[test]
    fn test_pretty_printed_with_four_spaces() {
        let path = scratch_path("counter.json");
        let store = JsonStore::<Counter>::new(&path);
        store.save(&Counter::default()).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    \"seconds\": 0.0"));
        cleanup(&path);
    }

    #[test]
    fn test_corrupt_files_replaced() {
        let cases = [
            "{not json",
            "",
            "[1, 2, 3]",
            r#"{"seconds": 1.0}"#,
            r#"{"seconds": 1.0, "active": true, "extra": 1}"#,
            r#"{"seconds": "many", "active": true}"#,
        ];

        for case in cases {
            let path = scratch_path("counter.json");
            let store = JsonStore::<Counter>::new(&path);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, case).unwrap();

            let (value, outcome) = store.load_or_default().unwrap();
            assert_eq!(value, Counter::default(), "case {:?}", case);
            assert!(matches!(outcome, LoadOutcome::Corrupt(_)), "case {:?}", case);
            assert_eq!(store.load().unwrap(), Counter::default());
            cleanup(&path);
        }
    }

    #[test]
    fn test_invalid_utf8_is_corrupt() {
        let path = scratch_path("counter.json");
        let store = JsonStore::<Counter>::new(&path);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        let (_, outcome) = store.load_or_default().unwrap();
        assert!(matches!(outcome, LoadOutcome::Corrupt(_)));
        cleanup(&path);
    }

    #[test]
    fn test_directory_path_propagates() {
        let path = scratch_path("as-dir");
        std::fs::create_dir_all(&path).unwrap();
        let store = JsonStore::<Counter>::new(&path);

        assert!(matches!(
            store.load_or_default(),
            Err(StorageError::Io { .. })
        ));
        cleanup(&path);
    }
}
