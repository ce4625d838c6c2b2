//! In-memory [`TaxonomyStore`], mirroring the graph layout used in Neo4j.
//!
//! Meant for tests and dry runs; nothing is persisted.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::lineage::LineageRow;
use crate::store::{ParentEdge, PurgeReport, TaxonomyCounts, TaxonomyStore};
use crate::taxon::{relationship_type, TaxonName, TaxonNode, SCIENTIFIC_NAME};

#[derive(Default)]
struct Graph {
    schema_ready: bool,
    nodes: BTreeMap<i64, TaxonNode>,
    /// child -> parent
    parents: HashMap<i64, i64>,
    names: BTreeMap<String, TaxonName>,
    /// tax_id -> (relationship type, name key)
    name_links: BTreeMap<i64, BTreeSet<(String, String)>>,
}

impl Graph {
    fn scientific_name(&self, tax_id: i64) -> Option<&str> {
        let scientific = relationship_type(SCIENTIFIC_NAME);
        self.name_links
            .get(&tax_id)?
            .iter()
            .find(|(rel, _)| *rel == scientific)
            .and_then(|(_, key)| self.names.get(key))
            .map(|name| name.name_txt.as_str())
    }
}

#[derive(Default)]
pub struct MemoryStore {
    graph: RwLock<Graph>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `ensure_schema` has been called since creation.
    pub async fn has_schema(&self) -> bool {
        self.graph.read().await.schema_ready
    }

    /// Relationship types linking `tax_id` to its names, sorted.
    pub async fn name_relationships(&self, tax_id: i64) -> Vec<String> {
        let graph = self.graph.read().await;
        graph
            .name_links
            .get(&tax_id)
            .map(|links| links.iter().map(|(rel, _)| rel.clone()).collect())
            .unwrap_or_default()
    }

    pub async fn parent_of(&self, tax_id: i64) -> Option<i64> {
        self.graph.read().await.parents.get(&tax_id).copied()
    }
}

#[async_trait]
impl TaxonomyStore for MemoryStore {
    async fn ensure_schema(&self) -> TaxonomyResult<()> {
        self.graph.write().await.schema_ready = true;
        Ok(())
    }

    async fn insert_nodes(&self, nodes: &[TaxonNode]) -> TaxonomyResult<usize> {
        let mut graph = self.graph.write().await;

        let mut batch = HashSet::with_capacity(nodes.len());
        for node in nodes {
            if graph.nodes.contains_key(&node.tax_id) || !batch.insert(node.tax_id) {
                return Err(TaxonomyError::DuplicateNode(node.tax_id));
            }
        }

        for node in nodes {
            graph.nodes.insert(node.tax_id, node.clone());
        }
        Ok(nodes.len())
    }

    async fn link_parents(&self, edges: &[ParentEdge]) -> TaxonomyResult<usize> {
        let mut graph = self.graph.write().await;
        let mut created = 0;

        for edge in edges {
            if edge.tax_id == edge.parent_tax_id
                || !graph.nodes.contains_key(&edge.tax_id)
                || !graph.nodes.contains_key(&edge.parent_tax_id)
            {
                continue;
            }
            if graph.parents.insert(edge.tax_id, edge.parent_tax_id).is_none() {
                created += 1;
            }
        }
        Ok(created)
    }

    async fn insert_names(&self, names: &[TaxonName]) -> TaxonomyResult<usize> {
        let mut graph = self.graph.write().await;
        let mut linked = 0;

        for name in names {
            let key = name.key();
            graph.names.entry(key.clone()).or_insert_with(|| name.clone());

            if graph.nodes.contains_key(&name.tax_id) {
                graph
                    .name_links
                    .entry(name.tax_id)
                    .or_default()
                    .insert((name.relationship_type(), key));
                linked += 1;
            }
        }
        Ok(linked)
    }

    async fn ancestor_chain(&self, tax_id: i64, abbreviated: bool) -> TaxonomyResult<Vec<LineageRow>> {
        let graph = self.graph.read().await;

        let (Some(node), Some(self_name)) = (graph.nodes.get(&tax_id), graph.scientific_name(tax_id))
        else {
            return Ok(Vec::new());
        };

        let mut rows = Vec::new();
        let mut visited = HashSet::from([tax_id]);
        let mut current = tax_id;
        let mut distance = 0;

        while let Some(&parent_id) = graph.parents.get(&current) {
            if !visited.insert(parent_id) {
                break;
            }
            distance += 1;
            current = parent_id;

            let Some(parent) = graph.nodes.get(&parent_id) else {
                break;
            };
            if abbreviated && parent.hidden_flag {
                continue;
            }
            if let Some(parent_name) = graph.scientific_name(parent_id) {
                rows.push(LineageRow {
                    self_name: self_name.to_string(),
                    self_rank: node.rank.clone(),
                    parent_rank: parent.rank.clone(),
                    parent_name: parent_name.to_string(),
                    parent_tax_id: parent_id,
                    distance,
                });
            }
        }

        Ok(rows)
    }

    async fn purge(&self) -> TaxonomyResult<PurgeReport> {
        let mut graph = self.graph.write().await;
        let report = PurgeReport {
            tax_nodes: graph.nodes.len(),
            tax_names: graph.names.len(),
        };

        graph.nodes.clear();
        graph.parents.clear();
        graph.names.clear();
        graph.name_links.clear();
        Ok(report)
    }

    async fn counts(&self) -> TaxonomyResult<TaxonomyCounts> {
        let graph = self.graph.read().await;
        Ok(TaxonomyCounts {
            tax_nodes: graph.nodes.len(),
            tax_names: graph.names.len(),
        })
    }
}
