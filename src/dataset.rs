use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::info;

use crate::models::OrderRecord;

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("inventory dataset missing at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("inventory dataset at {path} is not a valid JSON array of records: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory inventory dataset.
///
/// Loaded once at startup and shared read-only for the lifetime of the
/// process; the serving path never writes back.
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<OrderRecord>,
}

impl Dataset {
    /// Read a JSON array of order records from `path`.
    ///
    /// Failure here is a startup precondition violation, not a per-request
    /// error: callers are expected to abort rather than serve.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let records: Vec<OrderRecord> =
            serde_json::from_str(&raw).map_err(|source| DatasetError::Parse {
                path: path.display().to_string(),
                source,
            })?;

        info!(records = records.len(), path = %path.display(), "inventory dataset loaded");
        Ok(Self { records })
    }

    pub fn from_records(records: Vec<OrderRecord>) -> Self {
        Self { records }
    }

    /// First record whose `item_id` matches the input exactly
    /// (case-sensitive). Duplicate ids resolve to the earliest entry.
    pub fn find(&self, item_id: &str) -> Option<&OrderRecord> {
        self.records.iter().find(|record| record.item_id == item_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_dataset(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write dataset");
        file
    }

    #[test]
    fn loads_records_and_finds_by_exact_id() {
        let file = write_dataset(
            r#"[
                {"item_id": "a-1", "item_name": "Paracetamol"},
                {"item_id": "b-2", "item_name": "Ibuprofen"}
            ]"#,
        );

        let dataset = Dataset::load(file.path()).expect("load dataset");
        assert_eq!(dataset.len(), 2);
        assert_eq!(
            dataset.find("b-2").and_then(|r| r.item_name.as_deref()),
            Some("Ibuprofen")
        );
        assert!(dataset.find("B-2").is_none(), "lookup is case-sensitive");
        assert!(dataset.find("c-3").is_none());
    }

    #[test]
    fn duplicate_ids_resolve_to_first_entry() {
        let file = write_dataset(
            r#"[
                {"item_id": "dup", "item_name": "first"},
                {"item_id": "dup", "item_name": "second"}
            ]"#,
        );

        let dataset = Dataset::load(file.path()).expect("load dataset");
        assert_eq!(
            dataset.find("dup").and_then(|r| r.item_name.as_deref()),
            Some("first")
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Dataset::load("definitely/not/here.json").unwrap_err();
        assert_matches!(err, DatasetError::Io { .. });
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let file = write_dataset("{\"not\": \"an array\"");
        let err = Dataset::load(file.path()).unwrap_err();
        assert_matches!(err, DatasetError::Parse { .. });
    }
}
