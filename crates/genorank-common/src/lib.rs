//! genorank-common — Shared types, errors, and configuration used across all genorank crates.

pub mod config;
pub mod entities;
pub mod error;

// Re-export commonly used types
pub use config::{LayerWeights, ScoringConfig, TierThresholds};
pub use entities::{
    Candidate, ConfidenceTier, EvidenceRow, Gene, KnownPositive, Layer, LayerScores,
    QualityFlag, ScoredGene,
};
pub use error::{GenorankError, Result};
