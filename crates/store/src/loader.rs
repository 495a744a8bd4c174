//! Provisioning: read a JSON segment dataset and bulk-load it into a store.

use std::path::Path;
use tracing::info;

use planner_core::error::{PlannerError, PlannerResult};
use planner_core::types::LoadReport;

use crate::store::SegmentStore;

/// Read a dataset file into its top-level entries. The file must hold a
/// JSON array; a file-level parse failure is fatal, per-entry problems
/// are handled during the load.
pub fn read_dataset(path: &Path) -> PlannerResult<Vec<serde_json::Value>> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PlannerError::Dataset(format!("cannot read {}: {e}", path.display()))
    })?;
    let entries: Vec<serde_json::Value> = serde_json::from_str(&text).map_err(|e| {
        PlannerError::Dataset(format!("cannot parse {}: {e}", path.display()))
    })?;
    Ok(entries)
}

/// Load the dataset at `path` into `store`, replacing its contents.
pub fn provision(path: &Path, store: &SegmentStore) -> PlannerResult<LoadReport> {
    let entries = read_dataset(path)?;
    info!(
        entries = entries.len(),
        dataset = %path.display(),
        "Provisioning segment store"
    );
    store.load(&entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_read_dataset_requires_json_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("segments.json");
        std::fs::write(&path, "{ \"not\": \"an array\" }").unwrap();
        let err = read_dataset(&path).unwrap_err();
        assert!(matches!(err, PlannerError::Dataset(_)));
    }

    #[test]
    fn test_read_dataset_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_dataset(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, PlannerError::Dataset(_)));
    }

    #[test]
    fn test_provision_loads_entries() {
        let dir = TempDir::new().unwrap();
        let dataset = dir.path().join("segments.json");
        std::fs::write(
            &dataset,
            serde_json::to_string(&json!([
                { "name": "A", "segmentId": "seg-a" },
                { "name": "B", "segmentId": "seg-b" }
            ]))
            .unwrap(),
        )
        .unwrap();

        let store = SegmentStore::new(dir.path().join("segments.db"));
        let report = provision(&dataset, &store).unwrap();
        assert_eq!(report.inserted, 2);
        assert_eq!(report.total, 2);
    }
}
