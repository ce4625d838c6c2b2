//! CLI command definitions and handlers.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod connection;
pub mod lineage;
pub mod load;
pub mod status;

use connection::ConnectionArgs;

/// Load the NCBI taxonomy into Neo4j and resolve lineages
#[derive(Parser)]
#[command(name = "neotax")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// TOML file with a [neo4j] table of connection settings
    #[arg(long, global = true, env = "NEOTAX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Also write logs to this file
    #[arg(long = "log-file", alias = "log_file", global = true)]
    pub log_file: Option<PathBuf>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load nodes.dmp and names.dmp into Neo4j
    Load(load::LoadArgs),

    /// Print the lineage of one or more taxa
    Lineage(lineage::LineageArgs),

    /// Show how many taxonomy nodes are loaded
    Status,
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let config = self.connection.resolve(self.config.as_deref())?;

        match self.command {
            Commands::Load(args) => load::execute(args, config).await,
            Commands::Lineage(args) => lineage::execute(args, config).await,
            Commands::Status => status::execute(config).await,
        }
    }
}
