//! Gene-universe and evidence-table repository.
//!
//! The universe and the per-layer evidence tables are written once by the
//! external reader before scoring starts, then read-only for the rest of
//! the run.

use std::sync::Arc;

use genorank_common::{EvidenceRow, Gene, Layer};
use tracing::debug;

use crate::error::Result;
use crate::store::Store;

/// Repository for the gene universe and per-layer evidence tables.
#[derive(Clone)]
pub struct EvidenceRepository {
    store: Arc<Store>,
}

impl EvidenceRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Replace the gene universe.
    pub fn replace_universe(&self, genes: Vec<Gene>) -> Result<()> {
        debug!(rows = genes.len(), "replacing gene universe");
        self.store.write()?.genes = genes;
        Ok(())
    }

    /// The full gene universe, in load order.
    pub fn universe(&self) -> Result<Vec<Gene>> {
        Ok(self.store.read()?.genes.clone())
    }

    /// Replace one layer's evidence table.
    pub fn replace_layer(&self, layer: Layer, rows: Vec<EvidenceRow>) -> Result<()> {
        debug!(%layer, rows = rows.len(), "replacing evidence table");
        self.store.write()?.evidence.insert(layer, rows);
        Ok(())
    }

    /// Whether a layer table exists at all (empty still counts).
    pub fn has_layer(&self, layer: Layer) -> Result<bool> {
        Ok(self.store.read()?.evidence.contains_key(&layer))
    }

    /// One layer's evidence rows; `None` when the table is missing.
    pub fn layer(&self, layer: Layer) -> Result<Option<Vec<EvidenceRow>>> {
        Ok(self.store.read()?.evidence.get(&layer).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_universe_roundtrip() {
        let repo = EvidenceRepository::new(Arc::new(Store::new()));
        repo.replace_universe(vec![
            Gene::new("ENSG01", Some("KRAS")),
            Gene::new("ENSG02", None),
        ])
        .unwrap();

        let universe = repo.universe().unwrap();
        assert_eq!(universe.len(), 2);
        assert_eq!(universe[0].gene_id, "ENSG01");
        assert_eq!(universe[1].gene_symbol, None);
    }

    #[test]
    fn test_missing_layer_is_none_not_empty() {
        let repo = EvidenceRepository::new(Arc::new(Store::new()));
        repo.replace_layer(Layer::MutationFrequency, vec![]).unwrap();

        assert!(repo.has_layer(Layer::MutationFrequency).unwrap());
        assert!(!repo.has_layer(Layer::CrisprDependency).unwrap());
        assert_eq!(repo.layer(Layer::MutationFrequency).unwrap(), Some(vec![]));
        assert_eq!(repo.layer(Layer::CrisprDependency).unwrap(), None);
    }

    #[test]
    fn test_replace_layer_overwrites() {
        let repo = EvidenceRepository::new(Arc::new(Store::new()));
        repo.replace_layer(
            Layer::PathwayProximity,
            vec![EvidenceRow { gene_id: "ENSG01".into(), layer_score: Some(0.2) }],
        )
        .unwrap();
        repo.replace_layer(
            Layer::PathwayProximity,
            vec![EvidenceRow { gene_id: "ENSG02".into(), layer_score: None }],
        )
        .unwrap();

        let rows = repo.layer(Layer::PathwayProximity).unwrap().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].gene_id, "ENSG02");
    }
}
