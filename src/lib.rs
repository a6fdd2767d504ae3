//! Extraction toolkit for pre-built gene co-expression network databases.
//!
//! Networks and ontologies are opaque, pre-built datasets living under a
//! database root (see [`store`]); this crate only reads them. The three
//! binaries shipped with the crate extract cluster-level GO enrichment,
//! pairwise co-expression scores, and raw expression/cluster tables.

pub mod export;
pub mod network;
pub mod ontology;
pub mod store;

pub use store::StoreError;
