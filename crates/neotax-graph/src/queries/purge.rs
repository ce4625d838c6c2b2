//! Removal and counting of taxonomy nodes.

use neo4rs::Query;
use tracing::{debug, info};

use neotax_core::{PurgeReport, TaxonomyCounts, TaxonomyResult};

use crate::schema::{TAX_NAME, TAX_NODE};
use crate::GraphClient;

/// Nodes removed per statement; keeps each delete transaction small.
const DELETE_CHUNK: i64 = 1000;

/// Delete every node with `label` (and its relationships) in chunks, returning the total.
async fn delete_label(client: &GraphClient, label: &str) -> TaxonomyResult<usize> {
    let mut deleted = 0;
    loop {
        let query = Query::new(format!(
            "MATCH (n:{label})
             WITH n LIMIT $chunk
             DETACH DELETE n
             RETURN count(*) AS deleted"
        ))
        .param("chunk", DELETE_CHUNK);

        let count: i64 = client.query_scalar(query, "deleted").await?.unwrap_or(0);
        if count == 0 {
            return Ok(deleted);
        }
        deleted += count as usize;
        debug!(label, deleted, "Nodes deleted");
    }
}

/// Remove all TaxNode and TaxName nodes together with their relationships.
pub async fn purge(client: &GraphClient) -> TaxonomyResult<PurgeReport> {
    let tax_nodes = delete_label(client, TAX_NODE).await?;
    let tax_names = delete_label(client, TAX_NAME).await?;
    info!(tax_nodes, tax_names, "Taxonomy removed");

    Ok(PurgeReport { tax_nodes, tax_names })
}

async fn count_label(client: &GraphClient, label: &str) -> TaxonomyResult<usize> {
    let query = Query::new(format!("MATCH (n:{label}) RETURN count(n) AS count"));
    let count: i64 = client.query_scalar(query, "count").await?.unwrap_or(0);
    Ok(count as usize)
}

/// Count the loaded TaxNode and TaxName nodes.
pub async fn counts(client: &GraphClient) -> TaxonomyResult<TaxonomyCounts> {
    Ok(TaxonomyCounts {
        tax_nodes: count_label(client, TAX_NODE).await?,
        tax_names: count_label(client, TAX_NAME).await?,
    })
}
