//! End-to-end scoring pipeline.
//!
//! Orchestrates the full flow for one scoring run:
//!   1. Validate the scoring configuration (fatal before any row)
//!   2. Outer-join the gene universe against every evidence layer
//!   3. Compute NULL-aware composite scores
//!   4. Rewrite the scored-gene table
//!   5. Run the quality audit and the control validation, both read-only
//!      observers of the scored table, in either order
//!   6. Drop known positives from the candidate pool (they are controls,
//!      not discoveries), classify tiers, rewrite the candidate table
//!
//! Data-quality problems accumulate into the QC report; only a bad
//! configuration aborts the run.

use std::collections::HashSet;
use std::sync::Arc;

use genorank_common::{KnownPositive, Result, ScoredGene, ScoringConfig};
use genorank_store::{CandidateRepository, EvidenceRepository, ScoredGeneRepository, Store};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::audit::{run_audit, QCReport};
use crate::joiner::join_evidence;
use crate::provider::StoreEvidenceProvider;
use crate::scorer::compute_scores;
use crate::tiering::build_candidates;
use crate::validator::{run_validation, ValidationResult};

// ── Job config ───────────────────────────────────────────────────────────────

/// Parameters for a single scoring run.
#[derive(Debug, Clone)]
pub struct ScoringJob {
    pub config: ScoringConfig,
    /// Curated control genes for the discrimination check.
    pub known_positives: Vec<KnownPositive>,
    /// Drop the controls from the final candidate list. Validation always
    /// runs before this exclusion, on the full scored table.
    pub exclude_known_positives: bool,
}

impl Default for ScoringJob {
    fn default() -> Self {
        Self {
            config: ScoringConfig::default(),
            known_positives: vec![],
            exclude_known_positives: true,
        }
    }
}

// ── Result summary ───────────────────────────────────────────────────────────

/// Summary of one scoring run, returned to the orchestrator.
#[derive(Debug, Clone, Serialize)]
pub struct ScoringRunSummary {
    pub run_id: Uuid,
    pub genes_total: u64,
    /// Genes with a non-null composite score.
    pub genes_scored: u64,
    pub candidates_high: u64,
    pub candidates_medium: u64,
    pub candidates_low: u64,
    pub qc: QCReport,
    pub validation: ValidationResult,
    pub duration_ms: u64,
}

// ── Pipeline orchestrator ────────────────────────────────────────────────────

/// Run the end-to-end scoring pipeline against a loaded store.
///
/// Expects the gene universe and evidence tables to be in place; rewrites
/// the scored-gene and candidate tables. Idempotent: identical store
/// contents and config produce identical tables.
pub fn run_scoring(job: &ScoringJob, store: Arc<Store>) -> Result<ScoringRunSummary> {
    // Configuration errors are fatal before any row is touched
    job.config.validate()?;

    let run_id = Uuid::new_v4();
    let t0 = std::time::Instant::now();

    let evidence = EvidenceRepository::new(store.clone());
    let universe = evidence.universe()?;
    info!(%run_id, genes = universe.len(), "starting scoring run");

    let provider = StoreEvidenceProvider::new(store.clone());
    let join = join_evidence(&universe, &provider);
    let scored = compute_scores(&join.rows, &job.config.weights)?;
    ScoredGeneRepository::new(store.clone()).replace_all(scored.clone())?;

    // Read-only observers over the now-immutable scored table. The
    // validator must see the full table, before control genes are
    // excluded from the candidate pool below.
    let mut qc = run_audit(&scored, &provider);
    qc.merge_warnings(join.warnings);
    let validation = run_validation(&scored, &job.known_positives);

    let candidate_pool = candidate_pool(&scored, job);
    let candidates = build_candidates(&candidate_pool, &job.config.tiers);
    CandidateRepository::new(store).replace_all(candidates.clone())?;

    let tier_count = |tier| candidates.iter().filter(|c| c.tier == tier).count() as u64;
    let summary = ScoringRunSummary {
        run_id,
        genes_total: universe.len() as u64,
        genes_scored: scored.iter().filter(|g| g.composite_score.is_some()).count() as u64,
        candidates_high: tier_count(genorank_common::ConfidenceTier::High),
        candidates_medium: tier_count(genorank_common::ConfidenceTier::Medium),
        candidates_low: tier_count(genorank_common::ConfidenceTier::Low),
        qc,
        validation,
        duration_ms: t0.elapsed().as_millis() as u64,
    };

    info!(
        %run_id,
        scored = summary.genes_scored,
        high = summary.candidates_high,
        medium = summary.candidates_medium,
        low = summary.candidates_low,
        validation_passed = summary.validation.passed,
        qc_errors = summary.qc.errors.len(),
        "scoring run complete"
    );

    Ok(summary)
}

fn candidate_pool(scored: &[ScoredGene], job: &ScoringJob) -> Vec<ScoredGene> {
    if !job.exclude_known_positives {
        return scored.to_vec();
    }
    let known_ids: HashSet<&str> =
        job.known_positives.iter().map(|k| k.gene_id.as_str()).collect();
    scored
        .iter()
        .filter(|g| !known_ids.contains(g.gene_id.as_str()))
        .cloned()
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────
