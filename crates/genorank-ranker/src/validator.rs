//! Control validation: does the scorer discriminate?
//!
//! Uses a curated known-positive gene list (versioned independently of
//! this pipeline) and checks where those genes land in the composite-score
//! distribution. Must run over the FULL scored table, before known genes
//! are excluded from the candidate list. Run it after exclusion and the
//! knowns simply aren't there, which reports `total_known_genes == 0`
//! rather than a silently-wrong pass.

use chrono::{DateTime, Utc};
use genorank_common::{KnownPositive, ScoredGene};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::stats;

/// Median known-gene percentile required to pass.
pub const PASS_MEDIAN_PERCENTILE: f64 = 0.75;

/// Percentile at or above which a known gene counts as top-quartile.
pub const TOP_QUARTILE_PERCENTILE: f64 = 0.75;

// ── Result types ─────────────────────────────────────────────────────────────

/// Where one known-positive gene landed.
#[derive(Debug, Clone, Serialize)]
pub struct KnownGeneRank {
    pub gene_id: String,
    pub gene_symbol: Option<String>,
    /// `None` when the gene is absent from the scored table.
    pub composite_score: Option<f64>,
    /// `None` when the gene is absent or scored null (unrankable).
    pub percentile: Option<f64>,
}

/// Pipeline gate produced once per run. Advisory: a failed validation
/// marks the run untrustworthy, it does not abort it.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    /// Median percentile of the rankable known genes; `None` when none rank.
    pub median_percentile: Option<f64>,
    /// Known genes at or above the top quartile.
    pub top_quartile_count: u64,
    pub total_known_genes: u64,
    /// Knowns that were present and non-null, hence rankable.
    pub ranked_known_genes: u64,
    pub passed: bool,
    pub knowns: Vec<KnownGeneRank>,
    pub warnings: Vec<String>,
}

// ── Validator ────────────────────────────────────────────────────────────────

/// Rank every known positive within the full composite-score distribution.
///
/// Percentile rank = fraction of the non-null population at or below the
/// value (ties share the top of their group, see [`stats::percentile_ranks`]).
/// Null composites are excluded from the population; knowns that scored
/// null or are missing entirely are reported but cannot rank.
pub fn run_validation(scored: &[ScoredGene], knowns: &[KnownPositive]) -> ValidationResult {
    let mut warnings = Vec::new();

    // Percentile of every non-null composite, keyed by gene id
    let population: Vec<(&str, f64)> = scored
        .iter()
        .filter_map(|g| g.composite_score.map(|c| (g.gene_id.as_str(), c)))
        .collect();
    let values: Vec<f64> = population.iter().map(|(_, c)| *c).collect();
    let ranks = stats::percentile_ranks(&values);
    let percentile_by_gene: std::collections::HashMap<&str, f64> = population
        .iter()
        .zip(&ranks)
        .map(|((gene_id, _), pct)| (*gene_id, *pct))
        .collect();

    let mut known_ranks = Vec::with_capacity(knowns.len());
    for known in knowns {
        let scored_row = scored.iter().find(|g| g.gene_id == known.gene_id);
        let composite_score = scored_row.and_then(|g| g.composite_score);
        let percentile = percentile_by_gene.get(known.gene_id.as_str()).copied();

        match (scored_row, composite_score) {
            (None, _) => warnings.push(format!(
                "known positive '{}' not present in the scored table",
                known.gene_id
            )),
            (Some(_), None) => warnings.push(format!(
                "known positive '{}' has no evidence and cannot be ranked",
                known.gene_id
            )),
            _ => {}
        }

        known_ranks.push(KnownGeneRank {
            gene_id: known.gene_id.clone(),
            gene_symbol: known.gene_symbol.clone(),
            composite_score,
            percentile,
        });
    }

    let ranked: Vec<f64> = known_ranks.iter().filter_map(|k| k.percentile).collect();
    let median_percentile = stats::median(&ranked);
    let top_quartile_count =
        ranked.iter().filter(|&&p| p >= TOP_QUARTILE_PERCENTILE).count() as u64;
    let passed = median_percentile.is_some_and(|m| m >= PASS_MEDIAN_PERCENTILE);

    for w in &warnings {
        warn!("validation: {w}");
    }
    info!(
        total_known = knowns.len(),
        ranked = ranked.len(),
        median = ?median_percentile,
        passed,
        "control validation complete"
    );

    ValidationResult {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        median_percentile,
        top_quartile_count,
        total_known_genes: knowns.len() as u64,
        ranked_known_genes: ranked.len() as u64,
        passed,
        knowns: known_ranks,
        warnings,
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
