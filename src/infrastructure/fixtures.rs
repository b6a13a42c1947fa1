//! JSON fixture loading

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::{info, warn};

use crate::domain::record::{into_record, Record};
use crate::domain::{DomainError, EntityKind};

/// Fixture file for `kind` under `dir`: `<dir>/<collection>/db.json`
pub fn fixture_path(dir: &Path, kind: EntityKind) -> PathBuf {
    dir.join(kind.collection()).join("db.json")
}

/// Reads the `collection` array from a fixture file.
///
/// A missing file yields `Ok(None)`. Entries that are not JSON objects are
/// skipped.
pub async fn load_fixture(
    path: &Path,
    collection: &str,
) -> Result<Option<Vec<Record>>, DomainError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!(path = %path.display(), "Fixture file not found, serving an empty collection");
            return Ok(None);
        }
        Err(e) => {
            return Err(DomainError::configuration(format!(
                "Failed to read fixture '{}': {}",
                path.display(),
                e
            )));
        }
    };

    let mut document: Value = serde_json::from_slice(&bytes).map_err(|e| {
        DomainError::configuration(format!(
            "Failed to parse fixture '{}': {}",
            path.display(),
            e
        ))
    })?;

    let entries = match document.get_mut(collection).map(Value::take) {
        Some(Value::Array(entries)) => entries,
        _ => {
            return Err(DomainError::configuration(format!(
                "Fixture '{}' has no '{}' array",
                path.display(),
                collection
            )));
        }
    };

    let total = entries.len();
    let records: Vec<Record> = entries.into_iter().filter_map(into_record).collect();

    if records.len() < total {
        warn!(
            path = %path.display(),
            skipped = total - records.len(),
            "Skipped fixture entries that are not objects"
        );
    }

    info!(path = %path.display(), collection, items = records.len(), "Fixture loaded");
    Ok(Some(records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    async fn write_temp(contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("fixture-{}.json", Uuid::new_v4()));
        fs::write(&path, contents).await.unwrap();
        path
    }

    #[test]
    fn test_fixture_path() {
        let path = fixture_path(Path::new("/data"), EntityKind::Posts);
        assert_eq!(path, PathBuf::from("/data/posts/db.json"));
    }

    #[tokio::test]
    async fn test_load_fixture_reads_collection() {
        let path = write_temp(r#"{"users": [{"id": 1, "name": "Alice"}, {"id": 2}]}"#).await;

        let records = load_fixture(&path, "users").await.unwrap().unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["name"], "Alice");
        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let path = std::env::temp_dir().join(format!("missing-{}.json", Uuid::new_v4()));

        assert!(load_fixture(&path, "users").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_file_is_configuration_error() {
        let path = write_temp("{not json").await;

        let result = load_fixture(&path, "users").await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_missing_collection_is_configuration_error() {
        let path = write_temp(r#"{"threads": []}"#).await;

        let result = load_fixture(&path, "posts").await;

        assert!(matches!(result, Err(DomainError::Configuration { .. })));
        fs::remove_file(&path).await.ok();
    }

    #[tokio::test]
    async fn test_non_object_entries_are_skipped() {
        let path = write_temp(r#"{"posts": [{"id": 1}, 5, "x", {"id": 2}]}"#).await;

        let records = load_fixture(&path, "posts").await.unwrap().unwrap();

        assert_eq!(records.len(), 2);
        fs::remove_file(&path).await.ok();
    }
}
