//! Trait for evidence data access.
//!
//! Abstracts over where the per-layer evidence tables come from, so the
//! joiner can consume a store-backed run or an in-memory fixture without
//! caring which.

use std::collections::HashMap;
use std::sync::Arc;

use genorank_common::{EvidenceRow, Layer};
use genorank_store::{EvidenceRepository, Store};

/// Access to the per-layer evidence tables.
///
/// Implementations can use:
/// - the run's tabular store (production)
/// - hardcoded fixtures (testing)
pub trait EvidenceProvider: Send + Sync {
    /// All rows of one layer's table.
    ///
    /// Returns `None` when the layer table is missing entirely: an
    /// upstream schema problem, not an empty table.
    fn layer_rows(&self, layer: Layer) -> Option<Vec<EvidenceRow>>;

    /// Whether the layer table exists at all.
    fn has_layer(&self, layer: Layer) -> bool {
        self.layer_rows(layer).is_some()
    }
}

// ── Store-backed implementation ──────────────────────────────────────────────

/// Production provider reading the run's store.
#[derive(Clone)]
pub struct StoreEvidenceProvider {
    evidence: EvidenceRepository,
}

impl StoreEvidenceProvider {
    pub fn new(store: Arc<Store>) -> Self {
        Self { evidence: EvidenceRepository::new(store) }
    }
}

impl EvidenceProvider for StoreEvidenceProvider {
    fn layer_rows(&self, layer: Layer) -> Option<Vec<EvidenceRow>> {
        // A lock error here means the store itself is gone; treat as a
        // missing table rather than poisoning every read-only observer.
        self.evidence.layer(layer).ok().flatten()
    }
}

// ── Mock implementation for testing ──────────────────────────────────────────

/// Mock provider with hardcoded rows for unit tests.
pub struct MockEvidenceProvider {
    tables: HashMap<Layer, Vec<EvidenceRow>>,
}

impl MockEvidenceProvider {
    pub fn new() -> Self {
        Self { tables: HashMap::new() }
    }

    /// Add one evidence row; creates the layer table on first use.
    pub fn with(mut self, layer: Layer, gene_id: &str, score: Option<f64>) -> Self {
        self.tables
            .entry(layer)
            .or_default()
            .push(EvidenceRow { gene_id: gene_id.to_string(), layer_score: score });
        self
    }

    /// Add a layer with an empty table (present but no rows).
    pub fn with_empty_layer(mut self, layer: Layer) -> Self {
        self.tables.entry(layer).or_default();
        self
    }
}

impl Default for MockEvidenceProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl EvidenceProvider for MockEvidenceProvider {
    fn layer_rows(&self, layer: Layer) -> Option<Vec<EvidenceRow>> {
        self.tables.get(&layer).cloned()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
