//! Scored-gene table repository.
//!
//! The scorer replaces this table wholesale once per run; the auditor,
//! validator, and tier classifier only read it.

use std::sync::Arc;

use genorank_common::{Layer, ScoredGene};
use tracing::debug;

use crate::error::Result;
use crate::store::Store;

/// Repository for the wide scored-gene relation.
#[derive(Clone)]
pub struct ScoredGeneRepository {
    store: Arc<Store>,
}

impl ScoredGeneRepository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Replace the scored table (one full rewrite per run).
    pub fn replace_all(&self, rows: Vec<ScoredGene>) -> Result<()> {
        debug!(rows = rows.len(), "replacing scored-gene table");
        self.store.write()?.scored = rows;
        Ok(())
    }

    /// All scored genes, in table order.
    pub fn all(&self) -> Result<Vec<ScoredGene>> {
        Ok(self.store.read()?.scored.clone())
    }

    pub fn count(&self) -> Result<u64> {
        Ok(self.store.read()?.scored.len() as u64)
    }

    /// Render the table as CSV with a fixed column order. Identical table
    /// contents produce byte-identical output.
    pub fn to_csv(&self) -> Result<String> {
        let rows = self.store.read()?;
        let mut wtr = csv::Writer::from_writer(vec![]);

        let mut header = vec!["gene_id".to_string(), "gene_symbol".to_string()];
        header.extend(Layer::ALL.iter().map(|l| l.as_str().to_string()));
        header.extend(
            ["evidence_count", "available_weight", "composite_score", "quality_flag"]
                .map(String::from),
        );
        wtr.write_record(&header)?;

        for gene in &rows.scored {
            let mut record = vec![
                gene.gene_id.clone(),
                gene.gene_symbol.clone().unwrap_or_default(),
            ];
            for score in gene.scores.as_array() {
                record.push(fmt_opt(score));
            }
            record.push(gene.evidence_count.to_string());
            record.push(gene.available_weight.to_string());
            record.push(fmt_opt(gene.composite_score));
            record.push(gene.quality_flag.as_str().to_string());
            wtr.write_record(&record)?;
        }

        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

pub(crate) fn fmt_opt(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use genorank_common::{LayerScores, QualityFlag};

    fn scored(gene_id: &str, composite: Option<f64>) -> ScoredGene {
        ScoredGene {
            gene_id: gene_id.to_string(),
            gene_symbol: None,
            scores: LayerScores::default(),
            evidence_count: 0,
            available_weight: 0.0,
            composite_score: composite,
            quality_flag: QualityFlag::NoEvidence,
            contributions: LayerScores::default(),
        }
    }

    #[test]
    fn test_replace_and_read_back() {
        let repo = ScoredGeneRepository::new(Arc::new(Store::new()));
        repo.replace_all(vec![scored("ENSG01", Some(0.5)), scored("ENSG02", None)])
            .unwrap();
        assert_eq!(repo.count().unwrap(), 2);
        assert_eq!(repo.all().unwrap()[1].composite_score, None);
    }

    #[test]
    fn test_csv_null_is_empty_cell_not_zero() {
        let repo = ScoredGeneRepository::new(Arc::new(Store::new()));
        repo.replace_all(vec![scored("ENSG01", None)]).unwrap();

        let csv = repo.to_csv().unwrap();
        let data_line = csv.lines().nth(1).unwrap();
        // composite_score cell is empty, not "0"
        assert!(data_line.ends_with(",,no_evidence"));
    }

    #[test]
    fn test_csv_deterministic() {
        let repo = ScoredGeneRepository::new(Arc::new(Store::new()));
        repo.replace_all(vec![scored("ENSG01", Some(0.125)), scored("ENSG02", Some(0.75))])
            .unwrap();
        assert_eq!(repo.to_csv().unwrap(), repo.to_csv().unwrap());
    }
}
