use std::collections::HashMap;
use tracing::info;

use crate::models::{DataKind, Dataset};

/// Uploaded datasets for one session, at most one per record kind.
///
/// An upload replaces whatever was held for its kind; datasets are never
/// merged. Kinds without an upload fall back to the data source.
#[derive(Debug, Default)]
pub struct DatasetStore {
    uploads: HashMap<DataKind, Dataset>,
}

impl DatasetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dataset previously held for the same kind, if any.
    pub fn replace(&mut self, dataset: Dataset) -> Option<Dataset> {
        let kind = dataset.kind();
        info!(kind = %kind, records = dataset.len(), "Replacing uploaded dataset");
        self.uploads.insert(kind, dataset)
    }

    pub fn clear(&mut self, kind: DataKind) -> Option<Dataset> {
        let removed = self.uploads.remove(&kind);
        if removed.is_some() {
            info!(kind = %kind, "Cleared uploaded dataset");
        }
        removed
    }

    pub fn get(&self, kind: DataKind) -> Option<&Dataset> {
        self.uploads.get(&kind)
    }

    pub fn is_using_upload(&self, kind: DataKind) -> bool {
        self.uploads.contains_key(&kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock_data;

    #[test]
    fn test_replace_is_wholesale() {
        let mut store = DatasetStore::new();
        assert!(store.replace(mock_data::dataset(DataKind::Traffic)).is_none());

        let previous = store.replace(Dataset::Traffic(mock_data::traffic()[..1].to_vec()));
        assert_eq!(previous.map(|d| d.len()), Some(5));
        assert_eq!(store.get(DataKind::Traffic).map(|d| d.len()), Some(1));
    }

    #[test]
    fn test_clear_only_touches_one_kind() {
        let mut store = DatasetStore::new();
        store.replace(mock_data::dataset(DataKind::Traffic));
        store.replace(mock_data::dataset(DataKind::Weather));

        assert!(store.clear(DataKind::Traffic).is_some());
        assert!(!store.is_using_upload(DataKind::Traffic));
        assert!(store.is_using_upload(DataKind::Weather));
        assert!(store.clear(DataKind::Traffic).is_none());
    }
}
