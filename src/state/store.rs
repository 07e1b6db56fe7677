use std::collections::HashSet;
use std::path::Path;

use tracing::info;

use super::data::{FacilityId, FacilityKind, FacilityRecord};
use crate::error::{AppError, Result};

/// Dataset bundled with the binary, used when no dataset path is configured
const BUNDLED_DATASET: &str = include_str!("../../assets/facilities.json");

/// Aggregate counts shown in the sidebar header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Statistics {
    pub total: usize,
    pub hospitals: usize,
    pub emergency: usize,
}

/// The immutable facility dataset.
/// Order is preserved exactly as supplied; the list panel renders in this order.
#[derive(Debug, Clone)]
pub struct FacilityStore {
    records: Vec<FacilityRecord>,
}

impl FacilityStore {
    /// Build a store, rejecting duplicate ids
    pub fn new(records: Vec<FacilityRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id) {
                return Err(AppError::DuplicateId(record.id));
            }
        }

        Ok(Self { records })
    }

    /// Parse a JSON array of facility records
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<FacilityRecord> = serde_json::from_str(json)?;
        Self::new(records)
    }

    /// Load the dataset from `path`, or the bundled dataset when `None`
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let store = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| AppError::DatasetRead {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_json(&json)?
            }
            None => Self::from_json(BUNDLED_DATASET)?,
        };

        info!(
            facilities = store.len(),
            source = %path.map(|p| p.display().to_string()).unwrap_or_else(|| "bundled".to_string()),
            "facility dataset loaded"
        );

        Ok(store)
    }

    pub fn records(&self) -> &[FacilityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id. Unknown ids yield `None`, never an error.
    pub fn get(&self, id: FacilityId) -> Option<&FacilityRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    pub fn statistics(&self) -> Statistics {
        Statistics {
            total: self.records.len(),
            hospitals: self
                .records
                .iter()
                .filter(|record| record.kind == FacilityKind::Hospital)
                .count(),
            emergency: self.records.iter().filter(|record| record.has_emergency).count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures;

    #[test]
    fn test_bundled_dataset_loads() {
        let store = FacilityStore::load(None).unwrap();
        assert!(!store.is_empty());
        assert!(store.records().iter().all(|r| !r.name.is_empty()));
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut records = fixtures::sample();
        records.push(fixtures::facility(1, "Copy", FacilityKind::Clinic));

        let err = FacilityStore::new(records).unwrap_err();
        assert!(matches!(err, AppError::DuplicateId(1)));
    }

    #[test]
    fn test_get_unknown_id_is_none() {
        let store = FacilityStore::new(fixtures::sample()).unwrap();
        assert!(store.get(2).is_some());
        assert!(store.get(999).is_none());
    }

    #[test]
    fn test_statistics() {
        let store = FacilityStore::new(fixtures::sample()).unwrap();
        let stats = store.statistics();

        assert_eq!(stats.total, 4);
        assert_eq!(stats.hospitals, 2);
        assert_eq!(stats.emergency, 2);
    }

    #[test]
    fn test_missing_dataset_file() {
        let err = FacilityStore::load(Some(Path::new("/nonexistent/facilities.json"))).unwrap_err();
        assert!(matches!(err, AppError::DatasetRead { .. }));
    }
}
