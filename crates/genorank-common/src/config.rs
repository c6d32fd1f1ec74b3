//! Scoring configuration: per-layer weights and tier thresholds.
//!
//! Weights are externally configured (YAML/JSON), validated once at load.
//! An invalid weight vector is a configuration error and aborts before any
//! row is processed; it is never silently renormalised.

use serde::{Deserialize, Serialize};

use crate::entities::Layer;
use crate::error::{GenorankError, Result};

/// Tolerance on the weight-sum invariant.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

// ── Layer weights ─────────────────────────────────────────────────────────────

/// One weight per evidence layer, each in [0,1], summing to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    #[serde(default = "default_crispr_weight")]
    pub crispr_dependency: f64,
    #[serde(default = "default_mutation_weight")]
    pub mutation_frequency: f64,
    #[serde(default = "default_expression_weight")]
    pub expression_specificity: f64,
    #[serde(default = "default_literature_weight")]
    pub literature_evidence: f64,
    #[serde(default = "default_pathway_weight")]
    pub pathway_proximity: f64,
}

fn default_crispr_weight() -> f64 { 0.30 }
fn default_mutation_weight() -> f64 { 0.25 }
fn default_expression_weight() -> f64 { 0.20 }
fn default_literature_weight() -> f64 { 0.15 }
fn default_pathway_weight() -> f64 { 0.10 }

impl Default for LayerWeights {
    fn default() -> Self {
        Self {
            crispr_dependency: default_crispr_weight(),
            mutation_frequency: default_mutation_weight(),
            expression_specificity: default_expression_weight(),
            literature_evidence: default_literature_weight(),
            pathway_proximity: default_pathway_weight(),
        }
    }
}

impl LayerWeights {
    pub fn as_array(&self) -> [f64; Layer::COUNT] {
        [
            self.crispr_dependency,
            self.mutation_frequency,
            self.expression_specificity,
            self.literature_evidence,
            self.pathway_proximity,
        ]
    }

    pub fn get(&self, layer: Layer) -> f64 {
        match layer {
            Layer::CrisprDependency => self.crispr_dependency,
            Layer::MutationFrequency => self.mutation_frequency,
            Layer::ExpressionSpecificity => self.expression_specificity,
            Layer::LiteratureEvidence => self.literature_evidence,
            Layer::PathwayProximity => self.pathway_proximity,
        }
    }

    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Hard precondition: every weight in [0,1] and the sum within
    /// `WEIGHT_SUM_TOLERANCE` of 1.0.
    pub fn validate(&self) -> Result<()> {
        for layer in Layer::ALL {
            let w = self.get(layer);
            if !(0.0..=1.0).contains(&w) || !w.is_finite() {
                return Err(GenorankError::Config(format!(
                    "weight for layer '{layer}' is {w}, must be in [0, 1]"
                )));
            }
        }
        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(GenorankError::Config(format!(
                "layer weights sum to {sum}, must sum to 1.0 ± {WEIGHT_SUM_TOLERANCE}"
            )));
        }
        Ok(())
    }
}

// ── Tier thresholds ───────────────────────────────────────────────────────────

/// Thresholds for the tier cascade. Defaults are the production values;
/// the cascade itself (order, first-match-wins) lives in the ranker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TierThresholds {
    #[serde(default = "default_high_score")]
    pub high_min_score: f64,
    #[serde(default = "default_high_count")]
    pub high_min_evidence: u32,
    #[serde(default = "default_medium_score")]
    pub medium_min_score: f64,
    #[serde(default = "default_medium_count")]
    pub medium_min_evidence: u32,
    #[serde(default = "default_low_score")]
    pub low_min_score: f64,
}

fn default_high_score() -> f64 { 0.7 }
fn default_high_count() -> u32 { 3 }
fn default_medium_score() -> f64 { 0.4 }
fn default_medium_count() -> u32 { 2 }
fn default_low_score() -> f64 { 0.2 }

impl Default for TierThresholds {
    fn default() -> Self {
        Self {
            high_min_score: default_high_score(),
            high_min_evidence: default_high_count(),
            medium_min_score: default_medium_score(),
            medium_min_evidence: default_medium_count(),
            low_min_score: default_low_score(),
        }
    }
}

// ── Scoring config ────────────────────────────────────────────────────────────

/// Complete configuration for one scoring run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default)]
    pub weights: LayerWeights,
    #[serde(default)]
    pub tiers: TierThresholds,
}

impl ScoringConfig {
    /// Load from YAML file.
    pub fn from_yaml(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from JSON file.
    pub fn from_json(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Validate load-time invariants. Called once before scoring.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        for (name, v) in [
            ("high_min_score", self.tiers.high_min_score),
            ("medium_min_score", self.tiers.medium_min_score),
            ("low_min_score", self.tiers.low_min_score),
        ] {
            if !(0.0..=1.0).contains(&v) || !v.is_finite() {
                return Err(GenorankError::Config(format!(
                    "tier threshold '{name}' is {v}, must be in [0, 1]"
                )));
            }
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
