//! Load command - bulk import of a taxonomy dump.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use dialoguer::Confirm;
use tracing::info;

use neotax_core::{BulkLoader, TaxonomyStore, DEFAULT_BATCH_SIZE};
use neotax_graph::{GraphClient, GraphConfig};

use crate::output;

#[derive(Args)]
pub struct LoadArgs {
    /// Path to nodes.dmp
    #[arg(long)]
    pub nodes: PathBuf,

    /// Path to names.dmp
    #[arg(long)]
    pub names: PathBuf,

    /// Delete every loaded taxon and name before loading
    #[arg(long = "drop_all", alias = "drop-all")]
    pub drop_all: bool,

    /// Skip the --drop_all confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Stop after this many records of each file
    #[arg(long)]
    pub limit: Option<usize>,

    /// Records per transaction
    #[arg(long = "batch_size", alias = "batch-size", default_value_t = DEFAULT_BATCH_SIZE)]
    pub batch_size: usize,
}

pub async fn execute(args: LoadArgs, config: GraphConfig) -> Result<()> {
    for path in [&args.nodes, &args.names] {
        anyhow::ensure!(path.is_file(), "File not found: {}", path.display());
    }

    let client = GraphClient::connect_with(config).await?;

    if args.drop_all {
        if !args.yes && !confirm_drop()? {
            println!("{}", "Aborted, nothing was changed.".yellow());
            return Ok(());
        }
        let spinner = output::create_spinner("Removing existing taxonomy...");
        let purged = client.purge().await;
        spinner.finish_and_clear();
        let purged = purged?;
        println!(
            "  {} Removed {} taxa and {} names",
            "✓".green(),
            purged.tax_nodes,
            purged.tax_names
        );
    }

    let loader = BulkLoader::new(&client)
        .with_batch_size(args.batch_size)
        .with_limit(args.limit);

    println!("{}", "Loading taxonomy...".bold());

    let spinner = output::create_spinner(&format!("Loading {}", args.nodes.display()));
    let nodes = loader.load_nodes(&args.nodes).await;
    spinner.finish_and_clear();
    let nodes = nodes.with_context(|| format!("Failed to load {}", args.nodes.display()))?;
    output::print_load_report("Nodes", &nodes);

    let spinner = output::create_spinner(&format!("Loading {}", args.names.display()));
    let names = loader.load_names(&args.names).await;
    spinner.finish_and_clear();
    let names = names.with_context(|| format!("Failed to load {}", args.names.display()))?;
    output::print_load_report("Names", &names);

    info!(nodes = nodes.records, names = names.records, "Load complete");
    println!("\n{}", "Load complete.".green().bold());
    Ok(())
}

fn confirm_drop() -> Result<bool> {
    Confirm::new()
        .with_prompt("Delete every TaxNode and TaxName in the database?")
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;

    #[test]
    fn test_load_defaults() {
        let cli = Cli::try_parse_from([
            "neotax", "load", "--nodes", "nodes.dmp", "--names", "names.dmp",
        ])
        .unwrap();
        let Commands::Load(args) = cli.command else {
            panic!("expected load");
        };
        assert_eq!(args.batch_size, DEFAULT_BATCH_SIZE);
        assert_eq!(args.limit, None);
        assert!(!args.drop_all);
    }

    #[test]
    fn test_load_underscore_flags() {
        let cli = Cli::try_parse_from([
            "neotax",
            "load",
            "--nodes",
            "nodes.dmp",
            "--names",
            "names.dmp",
            "--drop_all",
            "--batch_size",
            "50",
            "--limit",
            "200",
        ])
        .unwrap();
        let Commands::Load(args) = cli.command else {
            panic!("expected load");
        };
        assert!(args.drop_all);
        assert_eq!(args.batch_size, 50);
        assert_eq!(args.limit, Some(200));
    }

    #[test]
    fn test_load_requires_both_files() {
        assert!(Cli::try_parse_from(["neotax", "load", "--nodes", "nodes.dmp"]).is_err());
    }
}
