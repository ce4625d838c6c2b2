//! Ancestor-chain traversal.
//!
//! Walks `(:TaxNode)<-[:PARENT*]-(:TaxNode)` from a taxon up to the root and returns one row per
//! ancestor that has a scientific name, nearest ancestor first.

use neo4rs::{Query, Row};

use neotax_core::{LineageRow, TaxonomyError, TaxonomyResult};

use crate::GraphClient;

const ANCESTOR_CHAIN: &str = "
    MATCH (organism:TaxNode {tax_id: $tax_id})-[:SCIENTIFIC_NAME]->(specie:TaxName)
    MATCH chain = (organism)<-[:PARENT*]-(parent:TaxNode)
    WHERE $abbreviated = false OR parent.hidden_flag = false
    MATCH (parent)-[:SCIENTIFIC_NAME]->(parent_name:TaxName)
    RETURN specie.name_txt AS self_name,
           organism.rank AS self_rank,
           parent.rank AS parent_rank,
           parent_name.name_txt AS parent_name,
           parent.tax_id AS parent_tax_id,
           length(chain) AS distance
    ORDER BY distance";

/// Fetch the ancestor chain of `tax_id`, optionally without hidden ancestors.
pub async fn ancestor_chain(
    client: &GraphClient,
    tax_id: i64,
    abbreviated: bool,
) -> TaxonomyResult<Vec<LineageRow>> {
    let query = Query::new(ANCESTOR_CHAIN.to_string())
        .param("tax_id", tax_id)
        .param("abbreviated", abbreviated);

    client.query(query).await?.iter().map(lineage_row).collect()
}

fn lineage_row(row: &Row) -> TaxonomyResult<LineageRow> {
    Ok(LineageRow {
        self_name: field(row, "self_name")?,
        self_rank: field(row, "self_rank")?,
        parent_rank: field(row, "parent_rank")?,
        parent_name: field(row, "parent_name")?,
        parent_tax_id: field(row, "parent_tax_id")?,
        distance: field(row, "distance")?,
    })
}

fn field<T: serde::de::DeserializeOwned>(row: &Row, name: &str) -> TaxonomyResult<T> {
    row.get(name)
        .map_err(|e| TaxonomyError::Store(format!("Failed to get field '{name}': {e:?}")))
}
