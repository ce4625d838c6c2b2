//! # neotax core
//!
//! NCBI taxonomy records, taxdump parsing, batched loading and lineage resolution.
//!
//! Storage is abstracted behind [`TaxonomyStore`]; the Neo4j implementation lives in
//! `neotax-graph`, and [`MemoryStore`] keeps the same graph layout in memory.

pub mod error;
pub mod lineage;
pub mod loader;
pub mod memory;
pub mod store;
pub mod taxon;

pub use error::{TaxonomyError, TaxonomyResult};
pub use lineage::{FullLineageOptions, LineageResolver, LineageRow, RankSpec, DEFAULT_RANKS};
pub use loader::{BulkLoader, LoadReport, DEFAULT_BATCH_SIZE};
pub use memory::MemoryStore;
pub use store::{ParentEdge, PurgeReport, TaxonomyCounts, TaxonomyStore};
pub use taxon::{TaxonName, TaxonNode, ROOT_TAX_ID};
