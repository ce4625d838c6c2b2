//! Batched writes of taxonomy nodes, parent relationships and names.
//!
//! Each batch is sent as a single `UNWIND` statement (one per relationship type for names) inside
//! its own transaction.

use std::collections::{BTreeMap, HashMap};

use neo4rs::{BoltType, Query, Txn};
use tracing::debug;

use neotax_core::{ParentEdge, TaxonName, TaxonNode, TaxonomyError, TaxonomyResult};

use crate::client::{collect_rows, driver_error, finish};
use crate::schema::{PARENT, TAX_NODE};
use crate::GraphClient;

type BoltMap = HashMap<String, BoltType>;

fn node_to_map(node: &TaxonNode) -> BoltMap {
    let mut m = BoltMap::new();
    m.insert("tax_id".to_string(), node.tax_id.into());
    m.insert("rank".to_string(), node.rank.clone().into());
    m.insert("hidden_flag".to_string(), node.hidden_flag.into());
    m
}

fn edge_to_map(edge: &ParentEdge) -> BoltMap {
    let mut m = BoltMap::new();
    m.insert("tax_id".to_string(), edge.tax_id.into());
    m.insert("parent_tax_id".to_string(), edge.parent_tax_id.into());
    m
}

fn name_to_map(name: &TaxonName) -> BoltMap {
    let mut m = BoltMap::new();
    m.insert("tax_id".to_string(), name.tax_id.into());
    m.insert("key".to_string(), name.key().into());
    m.insert("name_txt".to_string(), name.name_txt.clone().into());
    m.insert("unique_name".to_string(), name.unique_name.clone().into());
    m
}

/// Return the first of `tax_ids` already stored as a TaxNode.
async fn first_existing(client: &GraphClient, tax_ids: Vec<i64>) -> TaxonomyResult<Option<i64>> {
    let query = Query::new(format!(
        "MATCH (n:{TAX_NODE}) WHERE n.tax_id IN $tax_ids
         RETURN n.tax_id AS tax_id
         LIMIT 1"
    ))
    .param("tax_ids", tax_ids);

    client.query_scalar(query, "tax_id").await
}

/// Create a batch of TaxNode nodes in one transaction.
pub async fn insert_nodes(client: &GraphClient, nodes: &[TaxonNode]) -> TaxonomyResult<usize> {
    if nodes.is_empty() {
        return Ok(0);
    }

    let tax_ids: Vec<i64> = nodes.iter().map(|n| n.tax_id).collect();
    if let Some(tax_id) = first_existing(client, tax_ids).await? {
        return Err(TaxonomyError::DuplicateNode(tax_id));
    }

    let batch: Vec<BoltMap> = nodes.iter().map(node_to_map).collect();
    let query = Query::new(format!(
        "UNWIND $nodes AS node
         CREATE (:{TAX_NODE} {{tax_id: node.tax_id, rank: node.rank, hidden_flag: node.hidden_flag}})"
    ))
    .param("nodes", batch);

    let mut txn = client.begin().await?;
    let outcome = txn
        .run(query)
        .await
        .map(|_| nodes.len())
        .map_err(|e| driver_error("Failed to insert TaxNode batch", e));

    finish(txn, outcome).await
}

/// Create `(parent)-[:PARENT]->(child)` for each edge whose endpoints exist.
pub async fn link_parents(client: &GraphClient, edges: &[ParentEdge]) -> TaxonomyResult<usize> {
    if edges.is_empty() {
        return Ok(0);
    }

    let batch: Vec<BoltMap> = edges.iter().map(edge_to_map).collect();
    let query = Query::new(format!(
        "UNWIND $edges AS edge
         MATCH (child:{TAX_NODE} {{tax_id: edge.tax_id}})
         MATCH (parent:{TAX_NODE} {{tax_id: edge.parent_tax_id}})
         WHERE child <> parent
         CREATE (parent)-[:{PARENT}]->(child)
         RETURN count(*) AS created"
    ))
    .param("edges", batch);

    let created: i64 = client.query_scalar(query, "created").await?.unwrap_or(0);
    if created < edges.len() as i64 {
        debug!(
            requested = edges.len(),
            created, "Some parent relationships had no matching nodes"
        );
    }
    Ok(created as usize)
}

/// Merge a batch of TaxName nodes and link each to its TaxNode, in one transaction.
pub async fn insert_names(client: &GraphClient, names: &[TaxonName]) -> TaxonomyResult<usize> {
    if names.is_empty() {
        return Ok(0);
    }

    // Relationship types cannot be parameters: one statement per name class.
    let mut by_relationship: BTreeMap<String, Vec<BoltMap>> = BTreeMap::new();
    for name in names {
        by_relationship
            .entry(name.relationship_type())
            .or_default()
            .push(name_to_map(name));
    }

    let mut txn = client.begin().await?;

    let mut outcome = Ok(0);
    for (relationship, batch) in by_relationship {
        let query = Query::new(format!(
            "UNWIND $names AS name
             MERGE (n:TaxName {{key: name.key}})
             ON CREATE SET n.name_txt = name.name_txt, n.unique_name = name.unique_name
             WITH n, name
             MATCH (t:{TAX_NODE} {{tax_id: name.tax_id}})
             MERGE (t)-[:{relationship}]->(n)
             RETURN count(*) AS linked"
        ))
        .param("names", batch);

        match linked_count(&mut txn, query).await {
            Ok(linked) => {
                outcome = outcome.map(|total| total + linked);
            }
            Err(e) => {
                outcome = Err(e);
                break;
            }
        }
    }

    finish(txn, outcome).await
}

async fn linked_count(txn: &mut Txn, query: Query) -> TaxonomyResult<usize> {
    let mut linked = 0;
    for row in collect_rows(txn, query).await? {
        let count: i64 = row
            .get("linked")
            .map_err(|e| TaxonomyError::Store(format!("Failed to get field 'linked': {e:?}")))?;
        linked += count as usize;
    }
    Ok(linked)
}
