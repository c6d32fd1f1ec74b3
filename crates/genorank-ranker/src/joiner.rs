//! Evidence joiner: gene universe × N evidence layers.
//!
//! The join is a full outer join on `gene_id` from the universe side:
//! every universe gene yields exactly one row, and absence in a layer
//! stays `None`. An inner join here would silently shrink the universe to
//! the intersection of all layers' coverage.

use std::collections::{HashMap, HashSet};

use genorank_common::{Gene, Layer, LayerScores};
use tracing::{debug, warn};

use crate::provider::EvidenceProvider;

/// One gene after joining: all layer slots filled or `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinedGene {
    pub gene_id: String,
    pub gene_symbol: Option<String>,
    pub scores: LayerScores,
    /// Count of populated layers.
    pub evidence_count: u32,
}

/// Join result: one row per universe gene plus accumulated data warnings.
#[derive(Debug, Clone)]
pub struct JoinOutcome {
    pub rows: Vec<JoinedGene>,
    /// Orphan and duplicate evidence rows; folded into the QC report.
    pub warnings: Vec<String>,
}

/// Outer-join the universe against every available layer table.
///
/// Duplicate `(layer, gene_id)` rows resolve last-write-wins; evidence for
/// genes outside the universe is ignored. Both are warned, never fatal.
/// Missing layer tables are skipped here; the auditor reports them.
pub fn join_evidence(universe: &[Gene], provider: &dyn EvidenceProvider) -> JoinOutcome {
    let universe_ids: HashSet<&str> = universe.iter().map(|g| g.gene_id.as_str()).collect();
    let mut warnings = Vec::new();

    let mut by_layer: HashMap<Layer, HashMap<String, Option<f64>>> = HashMap::new();
    for layer in Layer::ALL {
        let Some(rows) = provider.layer_rows(layer) else {
            continue;
        };
        let table = by_layer.entry(layer).or_default();
        for row in rows {
            if !universe_ids.contains(row.gene_id.as_str()) {
                warnings.push(format!(
                    "layer '{layer}': evidence for unknown gene '{}' ignored",
                    row.gene_id
                ));
                continue;
            }
            if table.insert(row.gene_id.clone(), row.layer_score).is_some() {
                warnings.push(format!(
                    "layer '{layer}': duplicate evidence for gene '{}', keeping the last row",
                    row.gene_id
                ));
            }
        }
    }

    let rows: Vec<JoinedGene> = universe
        .iter()
        .map(|gene| {
            let mut scores = LayerScores::default();
            for layer in Layer::ALL {
                let score = by_layer
                    .get(&layer)
                    .and_then(|table| table.get(gene.gene_id.as_str()).copied())
                    .flatten();
                scores.set(layer, score);
            }
            let evidence_count = scores.populated();
            JoinedGene {
                gene_id: gene.gene_id.clone(),
                gene_symbol: gene.gene_symbol.clone(),
                scores,
                evidence_count,
            }
        })
        .collect();

    for w in &warnings {
        warn!("{w}");
    }
    debug!(genes = rows.len(), warnings = warnings.len(), "evidence join complete");

    JoinOutcome { rows, warnings }
}

// ── Tests ────────────────────────────────────────────────────────────────────
