//! Cypher queries over the taxonomy graph.

pub mod lineage;
pub mod load;
pub mod purge;
