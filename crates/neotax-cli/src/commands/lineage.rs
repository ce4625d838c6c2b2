//! Lineage command - resolve and print lineages, one line per taxon.

use anyhow::Result;
use clap::Args;
use tracing::error;

use neotax_core::{
    FullLineageOptions, LineageResolver, RankSpec, TaxonomyError, TaxonomyStore,
};
use neotax_graph::{GraphClient, GraphConfig};

use crate::output;

#[derive(Args)]
pub struct LineageArgs {
    /// NCBI taxonomy ids
    #[arg(required = true, num_args = 1..)]
    pub tax_ids: Vec<i64>,

    /// Print every ancestor instead of the selected ranks
    #[arg(long)]
    pub full: bool,

    /// With --full, skip ancestors flagged hidden
    #[arg(long, requires = "full")]
    pub abbreviated: bool,

    /// With --full, leave out the root taxon
    #[arg(long = "no_root", alias = "no-root", requires = "full")]
    pub no_root: bool,

    /// Comma-separated ranks; the first uppercase letter of each is its prefix
    /// [default: superKingdom,Phylum,Class,Order,Family,Genus,Species]
    #[arg(long, value_delimiter = ',', conflicts_with = "full")]
    pub ranks: Option<Vec<String>>,
}

/// What to print for each taxon.
enum Mode {
    Ranks(Vec<RankSpec>),
    Full(FullLineageOptions),
}

impl LineageArgs {
    fn mode(&self) -> Result<Mode> {
        if self.full {
            return Ok(Mode::Full(FullLineageOptions {
                abbreviated: self.abbreviated,
                include_root: !self.no_root,
            }));
        }
        let ranks = match &self.ranks {
            Some(labels) => RankSpec::parse_all(labels)?,
            None => RankSpec::defaults(),
        };
        Ok(Mode::Ranks(ranks))
    }
}

pub async fn execute(args: LineageArgs, config: GraphConfig) -> Result<()> {
    // Validate the ranks before touching the database.
    let mode = args.mode()?;
    let client = GraphClient::connect_with(config).await?;
    print_lineages(&client, &args.tax_ids, &mode).await
}

async fn print_lineages<S: TaxonomyStore + ?Sized>(
    store: &S,
    tax_ids: &[i64],
    mode: &Mode,
) -> Result<()> {
    for line in lineage_lines(store, tax_ids, mode).await? {
        println!("{line}");
    }
    Ok(())
}

/// One output line per resolved id. Unknown ids are logged and skipped.
async fn lineage_lines<S: TaxonomyStore + ?Sized>(
    store: &S,
    tax_ids: &[i64],
    mode: &Mode,
) -> Result<Vec<String>> {
    let resolver = LineageResolver::new(store);
    let mut lines = Vec::with_capacity(tax_ids.len());

    for &tax_id in tax_ids {
        let lineage = match mode {
            Mode::Ranks(ranks) => resolver.resolve_rank_lineage(tax_id, ranks).await,
            Mode::Full(options) => resolver.resolve_full_lineage_with(tax_id, *options).await,
        };
        match lineage {
            Ok(names) => lines.push(output::format_lineage_line(tax_id, &names)),
            Err(TaxonomyError::NoLineageFound(_)) => {
                error!(tax_id, "No lineage found");
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{Cli, Commands};
    use clap::Parser;
    use neotax_core::{MemoryStore, ParentEdge, TaxonName, TaxonNode};

    fn parse(argv: &[&str]) -> LineageArgs {
        let cli = Cli::try_parse_from(argv).unwrap();
        let Commands::Lineage(args) = cli.command else {
            panic!("expected lineage");
        };
        args
    }

    fn node(tax_id: i64, parent_tax_id: i64, rank: &str) -> TaxonNode {
        TaxonNode {
            tax_id,
            parent_tax_id,
            rank: rank.to_string(),
            hidden_flag: false,
        }
    }

    fn scientific(tax_id: i64, name: &str) -> TaxonName {
        TaxonName {
            tax_id,
            name_txt: name.to_string(),
            unique_name: String::new(),
            name_class: "scientific name".to_string(),
        }
    }

    async fn small_tree() -> MemoryStore {
        let store = MemoryStore::new();
        store
            .insert_nodes(&[node(1, 1, "no rank"), node(2, 1, "superkingdom"), node(561, 2, "genus")])
            .await
            .unwrap();
        store
            .link_parents(&[
                ParentEdge { tax_id: 2, parent_tax_id: 1 },
                ParentEdge { tax_id: 561, parent_tax_id: 2 },
            ])
            .await
            .unwrap();
        store
            .insert_names(&[
                scientific(1, "root"),
                scientific(2, "Bacteria"),
                scientific(561, "Escherichia"),
            ])
            .await
            .unwrap();
        store
    }

    #[test]
    fn test_default_ranks() {
        let args = parse(&["neotax", "lineage", "562", "511145"]);
        assert_eq!(args.tax_ids, vec![562, 511145]);
        let Mode::Ranks(ranks) = args.mode().unwrap() else {
            panic!("expected rank mode");
        };
        assert_eq!(ranks, RankSpec::defaults());
    }

    #[test]
    fn test_custom_ranks() {
        let args = parse(&["neotax", "lineage", "562", "--ranks", "Genus,Species"]);
        let Mode::Ranks(ranks) = args.mode().unwrap() else {
            panic!("expected rank mode");
        };
        assert_eq!(ranks.len(), 2);
        assert_eq!(ranks[0].prefix, 'g');
    }

    #[test]
    fn test_invalid_rank_is_rejected() {
        let args = parse(&["neotax", "lineage", "562", "--ranks", "genus"]);
        assert!(args.mode().is_err());
    }

    #[test]
    fn test_full_flags() {
        let args = parse(&["neotax", "lineage", "562", "--full", "--abbreviated", "--no_root"]);
        let Mode::Full(options) = args.mode().unwrap() else {
            panic!("expected full mode");
        };
        assert!(options.abbreviated);
        assert!(!options.include_root);
    }

    #[test]
    fn test_flag_combinations() {
        assert!(Cli::try_parse_from(["neotax", "lineage"]).is_err());
        assert!(Cli::try_parse_from(["neotax", "lineage", "562", "--abbreviated"]).is_err());
        assert!(
            Cli::try_parse_from(["neotax", "lineage", "562", "--full", "--ranks", "Genus"]).is_err()
        );
    }

    #[tokio::test]
    async fn test_unknown_ids_produce_no_line() {
        let store = small_tree().await;
        let mode = Mode::Ranks(RankSpec::parse_all(&["superKingdom", "Genus"]).unwrap());

        let lines = lineage_lines(&store, &[561, 424242, 2], &mode).await.unwrap();
        assert_eq!(
            lines,
            vec!["561\tk__Bacteria;g__Escherichia", "2\tk__Bacteria;g__"]
        );
    }

    #[tokio::test]
    async fn test_full_mode_lines() {
        let store = small_tree().await;
        let mode = Mode::Full(FullLineageOptions {
            abbreviated: false,
            include_root: false,
        });

        let lines = lineage_lines(&store, &[561], &mode).await.unwrap();
        assert_eq!(lines, vec!["561\tBacteria;Escherichia"]);
    }
}
