//! The storage contract the loader and the resolver are written against.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::TaxonomyResult;
use crate::lineage::LineageRow;
use crate::taxon::{TaxonName, TaxonNode};

/// A `(parent)-[:PARENT]->(child)` relationship to create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParentEdge {
    pub tax_id: i64,
    pub parent_tax_id: i64,
}

/// Number of nodes removed by a purge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub tax_nodes: usize,
    pub tax_names: usize,
}

/// Number of taxonomy nodes currently stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaxonomyCounts {
    pub tax_nodes: usize,
    pub tax_names: usize,
}

/// A graph store holding `TaxNode`/`TaxName` nodes.
///
/// Every write method commits its batch atomically.
#[async_trait]
pub trait TaxonomyStore: Send + Sync {
    /// Create the uniqueness constraints and indexes. Safe to call repeatedly.
    async fn ensure_schema(&self) -> TaxonomyResult<()>;

    /// Insert a batch of nodes. Fails with `DuplicateNode` if any tax id is already stored.
    async fn insert_nodes(&self, nodes: &[TaxonNode]) -> TaxonomyResult<usize>;

    /// Create parent relationships, returning how many were created.
    /// Edges whose endpoints are not stored are skipped.
    async fn link_parents(&self, edges: &[ParentEdge]) -> TaxonomyResult<usize>;

    /// Insert (merge) a batch of names and link them to their nodes,
    /// returning how many name relationships exist for the batch.
    async fn insert_names(&self, names: &[TaxonName]) -> TaxonomyResult<usize>;

    /// Every ancestor of `tax_id` that has a scientific name, paired with the taxon's own
    /// scientific name and rank, ordered by distance (nearest first).
    /// With `abbreviated`, hidden ancestors are left out.
    async fn ancestor_chain(&self, tax_id: i64, abbreviated: bool) -> TaxonomyResult<Vec<LineageRow>>;

    /// Delete every TaxNode and TaxName together with their relationships.
    async fn purge(&self) -> TaxonomyResult<PurgeReport>;

    async fn counts(&self) -> TaxonomyResult<TaxonomyCounts>;
}
