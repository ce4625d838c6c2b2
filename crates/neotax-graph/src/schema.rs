//! Neo4j schema initialization (constraints and indexes).

use neo4rs::Query;
use tracing::{debug, info};

use neotax_core::TaxonomyResult;

use crate::GraphClient;

/// Label of taxonomy nodes (one per `nodes.dmp` record).
pub const TAX_NODE: &str = "TaxNode";
/// Label of name nodes (one per distinct `names.dmp` key).
pub const TAX_NAME: &str = "TaxName";
/// Relationship from a parent TaxNode to each of its children.
pub const PARENT: &str = "PARENT";

/// Cypher statements for schema initialization.
const SCHEMA_STATEMENTS: &[&str] = &[
    // Uniqueness constraints
    "CREATE CONSTRAINT tax_node_tax_id IF NOT EXISTS FOR (n:TaxNode) REQUIRE n.tax_id IS UNIQUE",
    "CREATE CONSTRAINT tax_name_key IF NOT EXISTS FOR (n:TaxName) REQUIRE n.key IS UNIQUE",
    // Lookup indexes
    "CREATE INDEX tax_name_name_txt IF NOT EXISTS FOR (n:TaxName) ON (n.name_txt)",
];

/// Create the taxonomy constraints and indexes.
///
/// Every statement uses `IF NOT EXISTS`, so this runs before each load.
pub async fn initialize_schema(client: &GraphClient) -> TaxonomyResult<()> {
    for (position, statement) in SCHEMA_STATEMENTS.iter().enumerate() {
        debug!(position, statement, "Applying schema statement");
        client.execute(Query::new(statement.to_string())).await?;
    }

    info!(statements = SCHEMA_STATEMENTS.len(), "Taxonomy schema ready");
    Ok(())
}
