//! Composite score computation.
//!
//! The composite is a weighted average restricted to the layers that
//! actually have data:
//!
//! ```text
//! available_weight = Σ w_i          over populated layers
//! composite        = Σ s_i · w_i / available_weight
//! ```
//!
//! Missing layers are left out of both sums rather than substituted with
//! 0, which would systematically penalise under-studied genes. A gene with
//! no populated layer scores `None`, never 0.0.

use genorank_common::{LayerScores, LayerWeights, QualityFlag, Result, ScoredGene};
use tracing::debug;

use crate::joiner::JoinedGene;

/// Score a single joined gene. Pure; assumes validated weights.
pub fn score_gene(joined: &JoinedGene, weights: &LayerWeights) -> ScoredGene {
    let scores = joined.scores.as_array();
    let weight_arr = weights.as_array();

    let mut available_weight = 0.0;
    let mut weighted_sum = 0.0;
    let mut contributions = LayerScores::default();

    for ((layer, score), w) in genorank_common::Layer::ALL
        .iter()
        .zip(scores.iter())
        .zip(weight_arr.iter())
    {
        if let Some(s) = score {
            available_weight += w;
            weighted_sum += s * w;
            contributions.set(*layer, Some(s * w));
        }
    }

    let composite_score = if available_weight > 0.0 {
        Some(weighted_sum / available_weight)
    } else {
        None
    };

    ScoredGene {
        gene_id: joined.gene_id.clone(),
        gene_symbol: joined.gene_symbol.clone(),
        scores: joined.scores.clone(),
        evidence_count: joined.evidence_count,
        available_weight,
        composite_score,
        quality_flag: QualityFlag::from_evidence_count(joined.evidence_count),
        contributions,
    }
}

/// Score every joined gene.
///
/// Fails fast on an invalid weight vector before touching any row; a bad
/// configuration is never a per-row error.
pub fn compute_scores(joined: &[JoinedGene], weights: &LayerWeights) -> Result<Vec<ScoredGene>> {
    weights.validate()?;
    let scored: Vec<ScoredGene> = joined.iter().map(|g| score_gene(g, weights)).collect();
    debug!(genes = scored.len(), "composite scoring complete");
    Ok(scored)
}

// ── Tests ────────────────────────────────────────────────────────────────────
