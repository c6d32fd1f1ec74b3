//! Tiered candidate repository and export.
//!
//! Holds the final candidate relation (post-tiering, EXCLUDED rows already
//! dropped) and renders it for downstream reporting. Export order is the
//! table order, which the classifier fixes to (composite desc, gene_id
//! asc), so identical runs export byte-identical files.

use std::path::Path;
use std::sync::Arc;

use genorank_common::{Candidate, Layer};
use tracing::info;

use crate::error::Result;
use crate::scores::fmt_opt;
use crate::store::Store;

/// Repository for the final tiered candidate relation.
#[derive(Clone)]
pub struct CandidateRepository {
    store: Arc<Store>,
}

impl CandidateRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Replace the candidate table (one full rewrite per run).
    pub fn replace_all(&self, rows: Vec<Candidate>) -> Result<()> {
        info!(rows = rows.len(), "replacing candidate table");
        self.store.write()?.candidates = rows;
        Ok(())
    }

    /// All candidates, in table order.
    pub fn all(&self) -> Result<Vec<Candidate>> {
        Ok(self.store.read()?.candidates.clone())
    }

    pub fn count(&self) -> Result<u64> {
        Ok(self.store.read()?.candidates.len() as u64)
    }

    /// Render the candidate table as CSV with a fixed column order.
    pub fn to_csv(&self) -> Result<String> {
        let rows = self.store.read()?;
        let mut wtr = csv::Writer::from_writer(vec![]);

        let mut header = vec![
            "gene_id".to_string(),
            "gene_symbol".to_string(),
            "composite_score".to_string(),
            "confidence_tier".to_string(),
            "evidence_count".to_string(),
        ];
        header.extend(Layer::ALL.iter().map(|l| l.as_str().to_string()));
        wtr.write_record(&header)?;

        for c in &rows.candidates {
            let mut record = vec![
                c.gene_id.clone(),
                c.gene_symbol.clone().unwrap_or_default(),
                c.composite_score.to_string(),
                c.tier.as_str().to_string(),
                c.evidence_count.to_string(),
            ];
            for score in c.scores.as_array() {
                record.push(fmt_opt(score));
            }
            wtr.write_record(&record)?;
        }

        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Render the candidate table as a JSON array.
    pub fn to_json(&self) -> Result<String> {
        let rows = self.store.read()?;
        Ok(serde_json::to_string_pretty(&rows.candidates)?)
    }

    /// Write the CSV rendering to a file.
    pub fn export_csv(&self, path: impl AsRef<Path>) -> Result<()> {
        let csv = self.to_csv()?;
        std::fs::write(path.as_ref(), csv)?;
        info!(path = %path.as_ref().display(), "exported candidate table");
        Ok(())
    }
}
