//! # neotax graph
//!
//! Neo4j storage for the NCBI taxonomy.
//!
//! Graph layout:
//!
//! ```cypher
//! (:TaxNode {tax_id, rank, hidden_flag})-[:PARENT]->(:TaxNode)
//! (:TaxNode)-[:SCIENTIFIC_NAME | :SYNONYM | ...]->(:TaxName {key, name_txt, unique_name})
//! ```
//!
//! [`GraphClient`] implements [`neotax_core::TaxonomyStore`], so the core loader and lineage
//! resolver run against it unchanged.

pub mod client;
pub mod queries;
pub mod schema;
mod store;

pub use client::{GraphClient, GraphConfig};
