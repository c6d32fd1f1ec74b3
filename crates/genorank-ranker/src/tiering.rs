//! Confidence tier classification and the final candidate table.
//!
//! Deterministic ordered cascade, first match wins: HIGH is checked
//! before MEDIUM, so a gene with a high score but thin evidence falls
//! through to whichever tier its evidence supports.

use genorank_common::{Candidate, ConfidenceTier, ScoredGene, TierThresholds};
use tracing::debug;

/// Map one (composite_score, evidence_count) pair to a tier.
pub fn classify_tier(
    composite_score: Option<f64>,
    evidence_count: u32,
    thresholds: &TierThresholds,
) -> ConfidenceTier {
    let Some(score) = composite_score else {
        return ConfidenceTier::Excluded;
    };

    if score >= thresholds.high_min_score && evidence_count >= thresholds.high_min_evidence {
        return ConfidenceTier::High;
    }

    if score >= thresholds.medium_min_score && evidence_count >= thresholds.medium_min_evidence {
        return ConfidenceTier::Medium;
    }

    if score >= thresholds.low_min_score {
        return ConfidenceTier::Low;
    }

    ConfidenceTier::Excluded
}

/// Build the final candidate table: classify every scored gene, drop
/// EXCLUDED rows, and sort by composite score descending with gene_id
/// ascending as tie-break for deterministic, diffable output.
pub fn build_candidates(scored: &[ScoredGene], thresholds: &TierThresholds) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = scored
        .iter()
        .filter_map(|gene| {
            let tier = classify_tier(gene.composite_score, gene.evidence_count, thresholds);
            if tier == ConfidenceTier::Excluded {
                return None;
            }
            // classify_tier only passes genes with a present composite
            let composite_score = gene.composite_score?;
            Some(Candidate {
                gene_id: gene.gene_id.clone(),
                gene_symbol: gene.gene_symbol.clone(),
                composite_score,
                tier,
                evidence_count: gene.evidence_count,
                scores: gene.scores.clone(),
            })
        })
        .collect();

    candidates.sort_by(|a, b| {
        b.composite_score
            .partial_cmp(&a.composite_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.gene_id.cmp(&b.gene_id))
    });

    debug!(
        kept = candidates.len(),
        dropped = scored.len() - candidates.len(),
        "tier classification complete"
    );

    candidates
}

// ── Tests ────────────────────────────────────────────────────────────────────
