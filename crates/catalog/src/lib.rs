//! Content provider: the immutable catalog of spring records.

use std::{collections::HashSet, fs, path::Path, sync::Arc};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::{HotspotId, SpringId, SpringRecord};
use thiserror::Error;
use tracing::info;

mod builtin;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("catalog contains no records")]
    Empty,
    #[error("duplicate spring record id {0}")]
    DuplicateRecord(SpringId),
    #[error("record {record} declares hotspot {hotspot} more than once")]
    DuplicateHotspot { record: SpringId, hotspot: HotspotId },
    #[error("hotspot {hotspot} of record {record} is outside the 0-100 viewport range")]
    PositionOutOfRange { record: SpringId, hotspot: HotspotId },
}

#[derive(Deserialize)]
struct CatalogFile {
    springs: Vec<SpringRecord>,
}

/// Records are handed out as shared, read-only `Arc`s and never change after load.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<Arc<SpringRecord>>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            records: builtin::records().into_iter().map(Arc::new).collect(),
        }
    }

    pub fn from_records(records: Vec<SpringRecord>) -> Result<Self, CatalogError> {
        validate(&records)?;
        Ok(Self {
            records: records.into_iter().map(Arc::new).collect(),
        })
    }

    /// Parses a `{"springs": [...]}` document.
    pub fn from_json_str(raw: &str) -> anyhow::Result<Self> {
        let file: CatalogFile =
            serde_json::from_str(raw).context("failed to parse catalog json")?;
        Ok(Self::from_records(file.springs)?)
    }

    pub fn load_json(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read catalog file '{}'", path.display()))?;
        let catalog = Self::from_json_str(&raw)
            .with_context(|| format!("invalid catalog file '{}'", path.display()))?;
        info!(
            path = %path.display(),
            records = catalog.len(),
            "catalog: loaded from file"
        );
        Ok(catalog)
    }

    pub fn get(&self, id: &SpringId) -> Option<Arc<SpringRecord>> {
        self.records
            .iter()
            .find(|record| &record.id == id)
            .map(Arc::clone)
    }

    pub fn records(&self) -> &[Arc<SpringRecord>] {
        &self.records
    }

    pub fn ids(&self) -> impl Iterator<Item = &SpringId> {
        self.records.iter().map(|record| &record.id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn validate(records: &[SpringRecord]) -> Result<(), CatalogError> {
    if records.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut record_ids = HashSet::new();
    for record in records {
        if !record_ids.insert(&record.id) {
            return Err(CatalogError::DuplicateRecord(record.id.clone()));
        }

        let mut hotspot_ids = HashSet::new();
        for hotspot in &record.hotspots {
            if !hotspot_ids.insert(&hotspot.id) {
                return Err(CatalogError::DuplicateHotspot {
                    record: record.id.clone(),
                    hotspot: hotspot.id.clone(),
                });
            }
            if !hotspot.position.is_normalized() {
                return Err(CatalogError::PositionOutOfRange {
                    record: record.id.clone(),
                    hotspot: hotspot.id.clone(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
