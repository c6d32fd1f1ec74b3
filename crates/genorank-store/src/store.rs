//! Store handle and table management.
//!
//! One `Store` holds every table for a run behind a single lock. Writers
//! replace tables wholesale; the scoring components only ever read.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use genorank_common::{Candidate, EvidenceRow, Gene, Layer, ScoredGene};

use crate::error::{Result, StoreError};

/// All tables for one run.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub genes: Vec<Gene>,
    /// One evidence table per layer. A layer absent from the map means the
    /// upstream source produced no table at all, distinct from an empty
    /// table, and is surfaced by the auditor as a schema warning.
    pub evidence: HashMap<Layer, Vec<EvidenceRow>>,
    pub scored: Vec<ScoredGene>,
    pub candidates: Vec<Candidate>,
}

/// Main store handle. Cheap to share via `Arc`; repositories wrap it.
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    pub(crate) fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    /// Row counts per table.
    pub fn stats(&self) -> Result<StoreStats> {
        let tables = self.read()?;
        Ok(StoreStats {
            genes: tables.genes.len() as u64,
            evidence_layers: tables.evidence.len() as u64,
            evidence_rows: tables.evidence.values().map(|t| t.len() as u64).sum(),
            scored: tables.scored.len() as u64,
            candidates: tables.candidates.len() as u64,
        })
    }
}

/// Store statistics.
#[derive(Debug, Clone, Default)]
pub struct StoreStats {
    pub genes: u64,
    pub evidence_layers: u64,
    pub evidence_rows: u64,
    pub scored: u64,
    pub candidates: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store_stats() {
        let store = Store::new();
        let stats = store.stats().unwrap();
        assert_eq!(stats.genes, 0);
        assert_eq!(stats.evidence_layers, 0);
        assert_eq!(stats.scored, 0);
    }
}
