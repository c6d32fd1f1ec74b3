//! Quality auditor: data-quality diagnostics over the scored table.
//!
//! Three independent checks per layer: missingness, distribution shape,
//! robust outlier detection. The policy is "report, never repair": no
//! imputation, no clamping, no dropped rows. Every finding lands in the
//! report and nothing else changes.

use chrono::{DateTime, Utc};
use genorank_common::{Layer, ScoredGene};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::provider::EvidenceProvider;
use crate::stats;

/// Missingness rate above which a layer is warned / errored.
pub const MISSING_WARN_RATE: f64 = 0.5;
pub const MISSING_ERROR_RATE: f64 = 0.8;

/// Std-dev below which a layer has no discriminative variation.
pub const MIN_DISCRIMINATIVE_STD: f64 = 0.01;

/// Robust outlier threshold, in MADs from the layer median.
pub const OUTLIER_MAD_FACTOR: f64 = 3.0;

// ── Report types ─────────────────────────────────────────────────────────────

/// Summary statistics over one layer's non-null values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DistributionStats {
    pub count: u64,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// Per-layer audit findings.
#[derive(Debug, Clone, Serialize)]
pub struct LayerAudit {
    pub layer: Layer,
    /// Whether the upstream table existed at all.
    pub table_present: bool,
    /// Fraction of scored genes with no value in this layer.
    pub missing_rate: f64,
    pub distribution: DistributionStats,
    /// Gene ids flagged by the 3×MAD check, in table order.
    pub outliers: Vec<String>,
}

/// One audit report per run. Advisory: downstream consumers decide whether
/// to trust the run, nothing here blocks or mutates.
#[derive(Debug, Clone, Serialize)]
pub struct QCReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub layers: Vec<LayerAudit>,
    pub warnings: Vec<String>,
    pub errors: Vec<String>,
}

impl QCReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Fold in warnings accumulated by another stage (e.g. the joiner).
    pub fn merge_warnings(&mut self, warnings: Vec<String>) {
        self.warnings.extend(warnings);
    }
}

// ── Auditor ──────────────────────────────────────────────────────────────────

/// Audit the scored table. Read-only; runs after scoring, independently of
/// the control validator.
pub fn run_audit(scored: &[ScoredGene], provider: &dyn EvidenceProvider) -> QCReport {
    let mut report = QCReport {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        layers: Vec::with_capacity(Layer::COUNT),
        warnings: Vec::new(),
        errors: Vec::new(),
    };

    if scored.is_empty() {
        report.warnings.push("scored table is empty; audit is vacuous".to_string());
    }

    for layer in Layer::ALL {
        let audit = audit_layer(layer, scored, provider, &mut report);
        report.layers.push(audit);
    }

    for w in &report.warnings {
        warn!("qc: {w}");
    }
    for e in &report.errors {
        warn!("qc error: {e}");
    }
    info!(
        layers = report.layers.len(),
        warnings = report.warnings.len(),
        errors = report.errors.len(),
        "quality audit complete"
    );

    report
}

fn audit_layer(
    layer: Layer,
    scored: &[ScoredGene],
    provider: &dyn EvidenceProvider,
    report: &mut QCReport,
) -> LayerAudit {
    let table_present = provider.has_layer(layer);
    if !table_present {
        report
            .warnings
            .push(format!("layer '{layer}': evidence table missing upstream"));
    }

    // Non-null values with their gene ids, in table order
    let values: Vec<(&str, f64)> = scored
        .iter()
        .filter_map(|g| g.scores.get(layer).map(|v| (g.gene_id.as_str(), v)))
        .collect();
    let raw: Vec<f64> = values.iter().map(|(_, v)| *v).collect();

    let missing_rate = missing_rate(scored.len(), raw.len());
    if missing_rate > MISSING_ERROR_RATE {
        report.errors.push(format!(
            "layer '{layer}': {:.1}% of genes have no data",
            missing_rate * 100.0
        ));
    } else if missing_rate > MISSING_WARN_RATE {
        report.warnings.push(format!(
            "layer '{layer}': {:.1}% of genes have no data",
            missing_rate * 100.0
        ));
    }

    let distribution = distribution_stats(&raw);
    if let Some(std) = distribution.std {
        if std < MIN_DISCRIMINATIVE_STD {
            report.warnings.push(format!(
                "layer '{layer}': std {std:.4}, no discriminative variation, \
                 likely an upstream normalisation bug"
            ));
        }
    }
    for (gene_id, v) in &values {
        if !(0.0..=1.0).contains(v) {
            report.errors.push(format!(
                "layer '{layer}': score {v} for gene '{gene_id}' outside [0, 1]"
            ));
        }
    }

    let outliers = flag_outliers(&values);

    LayerAudit { layer, table_present, missing_rate, distribution, outliers }
}

fn missing_rate(total: usize, present: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (total - present) as f64 / total as f64
}

fn distribution_stats(values: &[f64]) -> DistributionStats {
    DistributionStats {
        count: values.len() as u64,
        mean: stats::mean(values),
        median: stats::median(values),
        std: stats::std_dev(values),
        min: values.iter().copied().reduce(f64::min),
        max: values.iter().copied().reduce(f64::max),
    }
}

/// Flag genes more than 3 MADs from the layer median.
///
/// Median/MAD rather than mean/std: genomic distributions are often
/// skewed, and a single extreme value inflates the std enough to mask
/// itself. MAD of exactly 0 means the layer is degenerate (caught by the
/// distribution check) and the test is skipped entirely.
fn flag_outliers(values: &[(&str, f64)]) -> Vec<String> {
    let raw: Vec<f64> = values.iter().map(|(_, v)| *v).collect();
    let (Some(med), Some(mad)) = (stats::median(&raw), stats::mad(&raw)) else {
        return vec![];
    };
    if mad == 0.0 {
        return vec![];
    }

    values
        .iter()
        .filter(|(_, v)| (v - med).abs() > OUTLIER_MAD_FACTOR * mad)
        .map(|(gene_id, _)| gene_id.to_string())
        .collect()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockEvidenceProvider;
    use genorank_common::{LayerScores, QualityFlag};

    fn scored_with_layer(values: &[Option<f64>], layer: Layer) -> Vec<ScoredGene> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| {
                let mut scores = LayerScores::default();
                scores.set(layer, *v);
                ScoredGene {
                    gene_id: format!("ENSG{i:04}"),
                    gene_symbol: None,
                    evidence_count: scores.populated(),
                    available_weight: 0.0,
                    composite_score: *v,
                    quality_flag: QualityFlag::from_evidence_count(scores.populated()),
                    contributions: LayerScores::default(),
                    scores,
                }
            })
            .collect()
    }

    fn provider_with_all_layers() -> MockEvidenceProvider {
        Layer::ALL
            .iter()
            .fold(MockEvidenceProvider::new(), |p, l| p.with_empty_layer(*l))
    }

    fn layer_audit(report: &QCReport, layer: Layer) -> &LayerAudit {
        report.layers.iter().find(|a| a.layer == layer).unwrap()
    }

    #[test]
    fn test_missingness_thresholds() {
        let layer = Layer::CrisprDependency;
        let provider = provider_with_all_layers();

        // 95% missing → error
        let mut values = vec![None; 19];
        values.push(Some(0.5));
        let report = run_audit(&scored_with_layer(&values, layer), &provider);
        assert!(report.errors.iter().any(|e| e.contains("crispr_dependency")));

        // 60% missing → warning, no error
        let mut values = vec![None; 12];
        values.extend(vec![Some(0.5); 8]);
        let report = run_audit(&scored_with_layer(&values, layer), &provider);
        assert!(!report.errors.iter().any(|e| e.contains("crispr_dependency")));
        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("crispr_dependency") && w.contains("no data")));

        // 30% missing → neither
        let mut values = vec![None; 6];
        values.extend(vec![Some(0.5); 14]);
        let report = run_audit(&scored_with_layer(&values, layer), &provider);
        assert!(!report.errors.iter().any(|e| e.contains("crispr_dependency")));
        assert!(!report
            .warnings
            .iter()
            .any(|w| w.contains("crispr_dependency") && w.contains("no data")));
    }

    #[test]
    fn test_missing_table_is_schema_warning_plus_full_missingness() {
        let layer = Layer::PathwayProximity;
        let scored = scored_with_layer(&[None, None, None], layer);
        let report = run_audit(&scored, &MockEvidenceProvider::new());

        let audit = layer_audit(&report, layer);
        assert!(!audit.table_present);
        assert_eq!(audit.missing_rate, 1.0);
        assert!(report.warnings.iter().any(|w| w.contains("table missing")));
        // 100% missing also trips the error-level missingness check
        assert!(report.errors.iter().any(|e| e.contains("pathway_proximity")));
    }

    #[test]
    fn test_zero_variance_layer_warned() {
        let layer = Layer::MutationFrequency;
        let scored = scored_with_layer(&vec![Some(0.42); 50], layer);
        let report = run_audit(&scored, &provider_with_all_layers());

        assert!(report
            .warnings
            .iter()
            .any(|w| w.contains("mutation_frequency") && w.contains("variation")));
    }

    #[test]
    fn test_out_of_range_value_is_error_and_never_clamped() {
        let layer = Layer::ExpressionSpecificity;
        let scored = scored_with_layer(&[Some(0.5), Some(1.7), Some(0.3)], layer);
        let report = run_audit(&scored, &provider_with_all_layers());

        assert!(report.errors.iter().any(|e| e.contains("1.7") && e.contains("outside")));
        // The value itself is untouched in the table
        assert_eq!(scored[1].scores.get(layer), Some(1.7));
    }

    #[test]
    fn test_single_extreme_value_flagged_by_mad() {
        let layer = Layer::LiteratureEvidence;
        // 100 values clustered near 0.5, one wild row at 50.0
        let mut values: Vec<Option<f64>> =
            (0..100).map(|i| Some(0.45 + (i % 10) as f64 * 0.01)).collect();
        values.push(Some(50.0));
        let scored = scored_with_layer(&values, layer);

        let report = run_audit(&scored, &provider_with_all_layers());
        let audit = layer_audit(&report, layer);
        assert_eq!(audit.outliers, vec!["ENSG0100".to_string()]);
    }

    #[test]
    fn test_constant_layer_mad_zero_skips_outlier_check() {
        let layer = Layer::CrisprDependency;
        // 99 identical values and one deviant: MAD is 0, so no flags at all
        let mut values = vec![Some(0.5); 99];
        values.push(Some(0.7));
        let scored = scored_with_layer(&values, layer);

        let report = run_audit(&scored, &provider_with_all_layers());
        assert!(layer_audit(&report, layer).outliers.is_empty());
    }

    #[test]
    fn test_audit_mutates_nothing() {
        let layer = Layer::CrisprDependency;
        let scored = scored_with_layer(&[Some(0.1), Some(5.0), None], layer);
        let before = scored.clone();
        let _ = run_audit(&scored, &provider_with_all_layers());
        assert_eq!(scored, before);
    }

    #[test]
    fn test_distribution_stats_values() {
        let layer = Layer::PathwayProximity;
        let scored = scored_with_layer(&[Some(0.2), Some(0.4), Some(0.9)], layer);
        let report = run_audit(&scored, &provider_with_all_layers());

        let dist = &layer_audit(&report, layer).distribution;
        assert_eq!(dist.count, 3);
        assert!((dist.mean.unwrap() - 0.5).abs() < 1e-12);
        assert_eq!(dist.median, Some(0.4));
        assert_eq!(dist.min, Some(0.2));
        assert_eq!(dist.max, Some(0.9));
    }
}
