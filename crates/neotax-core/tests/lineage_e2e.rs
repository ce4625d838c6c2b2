//! Load the Escherichia coli fixture and resolve lineages end to end.

use std::path::PathBuf;

use neotax_core::{
    BulkLoader, FullLineageOptions, LineageResolver, MemoryStore, RankSpec, TaxonomyError,
    TaxonomyStore,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

async fn loaded_store() -> MemoryStore {
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store).with_batch_size(3);
    loader.load_nodes(fixture("test_nodes.dmp")).await.unwrap();
    loader.load_names(fixture("test_names.dmp")).await.unwrap();
    store
}

#[tokio::test]
async fn test_load_reports() {
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store).with_batch_size(4);

    let nodes = loader.load_nodes(fixture("test_nodes.dmp")).await.unwrap();
    assert_eq!(nodes.records, 10);
    assert_eq!(nodes.relationships, 9);

    let names = loader.load_names(fixture("test_names.dmp")).await.unwrap();
    assert_eq!(names.records, 16);
    assert_eq!(names.relationships, 16);

    let counts = store.counts().await.unwrap();
    assert_eq!(counts.tax_nodes, 10);
    assert_eq!(counts.tax_names, 16);
    assert_eq!(
        store.name_relationships(562).await,
        vec!["COMMON_NAME", "SCIENTIFIC_NAME", "SYNONYM"]
    );
}

#[tokio::test]
async fn test_rank_lineage_escherichia_coli() {
    let store = loaded_store().await;
    let resolver = LineageResolver::new(&store);

    let lineage = resolver
        .resolve_rank_lineage(562, &RankSpec::defaults())
        .await
        .unwrap();
    assert_eq!(
        lineage,
        vec![
            "k__Bacteria",
            "p__Proteobacteria",
            "c__Gammaproteobacteria",
            "o__Enterobacterales",
            "f__Enterobacteriaceae",
            "g__Escherichia",
            "s__coli",
        ]
    );
}

#[tokio::test]
async fn test_rank_lineage_below_species_keeps_binomial() {
    let store = loaded_store().await;
    let resolver = LineageResolver::new(&store);

    let ranks = RankSpec::parse_all(&["Genus", "Species"]).unwrap();
    let lineage = resolver.resolve_rank_lineage(83333, &ranks).await.unwrap();
    assert_eq!(lineage, vec!["g__Escherichia", "s__Escherichia coli"]);
}

#[tokio::test]
async fn test_rank_lineage_length_matches_request() {
    let store = loaded_store().await;
    let resolver = LineageResolver::new(&store);

    let ranks = RankSpec::parse_all(&["Kingdom", "Phylum", "subGenus", "Tribe"]).unwrap();
    let lineage = resolver.resolve_rank_lineage(543, &ranks).await.unwrap();
    assert_eq!(lineage, vec!["k__", "p__Proteobacteria", "g__", "t__"]);
}

#[tokio::test]
async fn test_full_lineage() {
    let store = loaded_store().await;
    let resolver = LineageResolver::new(&store);

    let lineage = resolver.resolve_full_lineage(562, false).await.unwrap();
    assert_eq!(
        lineage,
        vec![
            "root",
            "cellular organisms",
            "Bacteria",
            "Proteobacteria",
            "Gammaproteobacteria",
            "Enterobacterales",
            "Enterobacteriaceae",
            "Escherichia",
            "Escherichia coli",
        ]
    );
    assert!(lineage.windows(2).all(|pair| pair[0] != pair[1]));
}

#[tokio::test]
async fn test_abbreviated_lineage_skips_hidden_nodes() {
    let store = loaded_store().await;
    let resolver = LineageResolver::new(&store);

    let lineage = resolver.resolve_full_lineage(562, true).await.unwrap();
    assert!(!lineage.contains(&"cellular organisms".to_string()));
    assert_eq!(lineage.first().map(String::as_str), Some("root"));
    assert_eq!(lineage.last().map(String::as_str), Some("Escherichia coli"));

    // The taxon keeps its own name even though it is flagged hidden.
    let strain = resolver.resolve_full_lineage(83333, true).await.unwrap();
    assert_eq!(strain.last().map(String::as_str), Some("Escherichia coli K-12"));
    assert!(!strain.contains(&"Escherichia coli".to_string()));
}

#[tokio::test]
async fn test_full_lineage_without_root() {
    let store = loaded_store().await;
    let resolver = LineageResolver::new(&store);

    let options = FullLineageOptions {
        abbreviated: false,
        include_root: false,
    };
    let lineage = resolver.resolve_full_lineage_with(1224, options).await.unwrap();
    assert_eq!(lineage, vec!["cellular organisms", "Bacteria", "Proteobacteria"]);
}

#[tokio::test]
async fn test_unknown_taxon() {
    let store = loaded_store().await;
    let resolver = LineageResolver::new(&store);

    let err = resolver
        .resolve_rank_lineage(999999999, &RankSpec::defaults())
        .await
        .unwrap_err();
    assert!(matches!(err, TaxonomyError::NoLineageFound(999999999)));

    let err = resolver.resolve_full_lineage(999999999, false).await.unwrap_err();
    assert!(matches!(err, TaxonomyError::NoLineageFound(999999999)));
}

#[tokio::test]
async fn test_lookups_are_idempotent() {
    let store = loaded_store().await;
    let resolver = LineageResolver::new(&store);
    let ranks = RankSpec::defaults();

    let first = resolver.resolve_rank_lineage(562, &ranks).await.unwrap();
    let second = resolver.resolve_rank_lineage(562, &ranks).await.unwrap();
    assert_eq!(first, second);

    let first = resolver.resolve_full_lineage(562, true).await.unwrap();
    let second = resolver.resolve_full_lineage(562, true).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_loading_nodes_twice_fails() {
    let store = MemoryStore::new();
    let loader = BulkLoader::new(&store);
    loader.load_nodes(fixture("test_nodes.dmp")).await.unwrap();

    let err = loader.load_nodes(fixture("test_nodes.dmp")).await.unwrap_err();
    assert!(matches!(err, TaxonomyError::DuplicateNode(1)));
}

#[tokio::test]
async fn test_reload_after_purge() {
    let store = loaded_store().await;
    store.purge().await.unwrap();

    let loader = BulkLoader::new(&store);
    loader.load_nodes(fixture("test_nodes.dmp")).await.unwrap();
    loader.load_names(fixture("test_names.dmp")).await.unwrap();

    let lineage = LineageResolver::new(&store)
        .resolve_rank_lineage(562, &RankSpec::defaults())
        .await
        .unwrap();
    assert_eq!(lineage.last().map(String::as_str), Some("s__coli"));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let store = MemoryStore::new();
    let err = BulkLoader::new(&store)
        .load_nodes(fixture("does_not_exist.dmp"))
        .await
        .unwrap_err();
    assert!(matches!(err, TaxonomyError::Io(_)));
}
