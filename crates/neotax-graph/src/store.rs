//! [`TaxonomyStore`] backed by Neo4j.

use async_trait::async_trait;

use neotax_core::{
    LineageRow, ParentEdge, PurgeReport, TaxonName, TaxonNode, TaxonomyCounts, TaxonomyResult,
    TaxonomyStore,
};

use crate::queries::{lineage, load, purge};
use crate::{schema, GraphClient};

#[async_trait]
impl TaxonomyStore for GraphClient {
    async fn ensure_schema(&self) -> TaxonomyResult<()> {
        schema::initialize_schema(self).await
    }

    async fn insert_nodes(&self, nodes: &[TaxonNode]) -> TaxonomyResult<usize> {
        load::insert_nodes(self, nodes).await
    }

    async fn link_parents(&self, edges: &[ParentEdge]) -> TaxonomyResult<usize> {
        load::link_parents(self, edges).await
    }

    async fn insert_names(&self, names: &[TaxonName]) -> TaxonomyResult<usize> {
        load::insert_names(self, names).await
    }

    async fn ancestor_chain(&self, tax_id: i64, abbreviated: bool) -> TaxonomyResult<Vec<LineageRow>> {
        lineage::ancestor_chain(self, tax_id, abbreviated).await
    }

    async fn purge(&self) -> TaxonomyResult<PurgeReport> {
        purge::purge(self).await
    }

    async fn counts(&self) -> TaxonomyResult<TaxonomyCounts> {
        purge::counts(self).await
    }
}
