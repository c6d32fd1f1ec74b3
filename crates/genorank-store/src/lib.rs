//! genorank Store Layer
//!
//! In-memory, single-writer tabular store for one scoring run: the gene
//! universe, one evidence table per layer, and the two output relations
//! (scored genes, tiered candidates). Output tables are replaced wholesale
//! once per run; there are no incremental updates.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use genorank_store::{Store, EvidenceRepository};
//! use genorank_common::{Gene, Layer, EvidenceRow};
//!
//! let store = Arc::new(Store::new());
//! let evidence = EvidenceRepository::new(store.clone());
//! evidence.replace_universe(vec![Gene::new("ENSG01", Some("KRAS"))]).unwrap();
//! evidence.replace_layer(Layer::CrisprDependency, vec![
//!     EvidenceRow { gene_id: "ENSG01".into(), layer_score: Some(0.9) },
//! ]).unwrap();
//! ```

pub mod candidates;
pub mod error;
pub mod evidence;
pub mod scores;
pub mod store;

pub use candidates::CandidateRepository;
pub use error::{Result, StoreError};
pub use evidence::EvidenceRepository;
pub use scores::ScoredGeneRepository;
pub use store::{Store, StoreStats};
