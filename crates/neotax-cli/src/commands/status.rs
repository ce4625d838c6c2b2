//! Status command - what is loaded in the configured database.

use anyhow::Result;
use colored::Colorize;

use neotax_core::TaxonomyStore;
use neotax_graph::{GraphClient, GraphConfig};

pub async fn execute(config: GraphConfig) -> Result<()> {
    let client = GraphClient::connect_with(config).await?;
    let counts = client.counts().await?;

    println!("{}", "Taxonomy Status".bold());
    println!("{}", "─".repeat(40));
    println!("  Database: {}", client.config().uri().dimmed());
    println!("  Taxa:     {}", counts.tax_nodes.to_string().cyan());
    println!("  Names:    {}", counts.tax_names.to_string().cyan());
    if counts.tax_nodes == 0 {
        println!("  {}", "No taxonomy loaded. Run 'neotax load' first.".yellow());
    }
    println!("{}", "─".repeat(40));

    Ok(())
}
