//! Core row types for the scoring pipeline.
//!
//! Evidence is modelled with one typed field per layer rather than a
//! dynamic map, so the weight-vector invariant stays checkable at compile
//! time and a layer cannot appear twice.

use serde::{Deserialize, Serialize};

// ── Evidence layers ───────────────────────────────────────────────────────────

/// The five independent evidence layers feeding the composite score.
///
/// Each corresponds to one upstream retrieval source; retrieval and
/// normalisation to [0,1] happen outside this subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// CRISPR essentiality (DepMap CERES, normalised upstream)
    CrisprDependency,
    /// Mutation recurrence across tumours (COSMIC/cBioPortal)
    MutationFrequency,
    /// Tumour vs. normal expression specificity (TCGA/GTEx)
    ExpressionSpecificity,
    /// Text-mined literature support
    LiteratureEvidence,
    /// Proximity to known disease pathways (Reactome)
    PathwayProximity,
}

impl Layer {
    pub const ALL: [Layer; 5] = [
        Layer::CrisprDependency,
        Layer::MutationFrequency,
        Layer::ExpressionSpecificity,
        Layer::LiteratureEvidence,
        Layer::PathwayProximity,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            Layer::CrisprDependency => "crispr_dependency",
            Layer::MutationFrequency => "mutation_frequency",
            Layer::ExpressionSpecificity => "expression_specificity",
            Layer::LiteratureEvidence => "literature_evidence",
            Layer::PathwayProximity => "pathway_proximity",
        }
    }
}

impl std::fmt::Display for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Genes and evidence rows ───────────────────────────────────────────────────

/// One gene in the universe. Built once by the external universe builder;
/// immutable during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gene {
    /// Stable unique key (e.g. Ensembl gene id).
    pub gene_id: String,
    /// Display symbol; may be absent for unannotated genes.
    pub gene_symbol: Option<String>,
}

impl Gene {
    pub fn new(gene_id: impl Into<String>, gene_symbol: Option<&str>) -> Self {
        Self {
            gene_id: gene_id.into(),
            gene_symbol: gene_symbol.map(str::to_string),
        }
    }
}

/// One evidence observation for one gene in one layer.
///
/// `layer_score` is `None` when the layer has no data for the gene.
/// "Unknown" is distinct from 0.0 and must never be conflated with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRow {
    pub gene_id: String,
    pub layer_score: Option<f64>,
}

/// Per-layer score slots for one gene, all nullable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayerScores {
    pub crispr_dependency: Option<f64>,
    pub mutation_frequency: Option<f64>,
    pub expression_specificity: Option<f64>,
    pub literature_evidence: Option<f64>,
    pub pathway_proximity: Option<f64>,
}

impl LayerScores {
    pub fn as_array(&self) -> [Option<f64>; Layer::COUNT] {
        [
            self.crispr_dependency,
            self.mutation_frequency,
            self.expression_specificity,
            self.literature_evidence,
            self.pathway_proximity,
        ]
    }

    pub fn get(&self, layer: Layer) -> Option<f64> {
        match layer {
            Layer::CrisprDependency => self.crispr_dependency,
            Layer::MutationFrequency => self.mutation_frequency,
            Layer::ExpressionSpecificity => self.expression_specificity,
            Layer::LiteratureEvidence => self.literature_evidence,
            Layer::PathwayProximity => self.pathway_proximity,
        }
    }

    pub fn set(&mut self, layer: Layer, score: Option<f64>) {
        match layer {
            Layer::CrisprDependency => self.crispr_dependency = score,
            Layer::MutationFrequency => self.mutation_frequency = score,
            Layer::ExpressionSpecificity => self.expression_specificity = score,
            Layer::LiteratureEvidence => self.literature_evidence = score,
            Layer::PathwayProximity => self.pathway_proximity = score,
        }
    }

    /// Number of layers carrying a score.
    pub fn populated(&self) -> u32 {
        self.as_array().iter().filter(|s| s.is_some()).count() as u32
    }
}

// ── Scored output ─────────────────────────────────────────────────────────────

/// Evidence-breadth label, derived only from how many layers had data.
/// Never fed back into the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityFlag {
    SufficientEvidence,
    ModerateEvidence,
    SparseEvidence,
    NoEvidence,
}

impl QualityFlag {
    /// Breadth thresholds: ≥4 sufficient, ≥2 moderate, ≥1 sparse, 0 none.
    pub fn from_evidence_count(count: u32) -> Self {
        if count >= 4 {
            QualityFlag::SufficientEvidence
        } else if count >= 2 {
            QualityFlag::ModerateEvidence
        } else if count >= 1 {
            QualityFlag::SparseEvidence
        } else {
            QualityFlag::NoEvidence
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            QualityFlag::SufficientEvidence => "sufficient_evidence",
            QualityFlag::ModerateEvidence => "moderate_evidence",
            QualityFlag::SparseEvidence => "sparse_evidence",
            QualityFlag::NoEvidence => "no_evidence",
        }
    }
}

/// One gene after composite scoring: the wide row exposed to reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredGene {
    pub gene_id: String,
    pub gene_symbol: Option<String>,
    /// Per-layer scores as joined; absence stays `None`.
    pub scores: LayerScores,
    /// Count of populated layers.
    pub evidence_count: u32,
    /// Sum of weights over populated layers.
    pub available_weight: f64,
    /// NULL-aware weighted average; `None` iff no layer had data.
    pub composite_score: Option<f64>,
    pub quality_flag: QualityFlag,
    /// score × weight per populated layer. Explainability only; never
    /// re-aggregated downstream.
    pub contributions: LayerScores,
}

// ── Control genes ─────────────────────────────────────────────────────────────

/// A curated known-positive gene, versioned independently of this
/// pipeline. Used only to validate that the scorer discriminates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KnownPositive {
    pub gene_id: String,
    pub gene_symbol: Option<String>,
    /// Provenance of the curation (e.g. "OMIM", "panel_v3").
    pub source: String,
    /// Curator-assigned confidence in [0,1].
    pub confidence: f64,
}

// ── Tiered candidates ─────────────────────────────────────────────────────────

/// Ordinal confidence bucket for the final candidate list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
    /// Below every tier threshold; dropped from the final table.
    Excluded,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "HIGH",
            ConfidenceTier::Medium => "MEDIUM",
            ConfidenceTier::Low => "LOW",
            ConfidenceTier::Excluded => "EXCLUDED",
        }
    }
}

/// One row of the final tiered candidate relation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub gene_id: String,
    pub gene_symbol: Option<String>,
    pub composite_score: f64,
    pub tier: ConfidenceTier,
    pub evidence_count: u32,
    pub scores: LayerScores,
}

// ── Tests ─────────────────────────────────────────────────────────────────────
