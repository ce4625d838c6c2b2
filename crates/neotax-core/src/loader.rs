//! Batched loading of `nodes.dmp` and `names.dmp` into a [`TaxonomyStore`].
//!
//! Nodes are inserted first, one committed batch at a time, and the parent relationships are
//! created afterwards once every node of the file exists. A crash mid-load leaves the committed
//! batches in place.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::store::{ParentEdge, TaxonomyStore};
use crate::taxon::{records, TaxonName, TaxonNode};

/// Records per committed batch.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// What a load produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub records: usize,
    pub relationships: usize,
}

pub struct BulkLoader<'a, S: TaxonomyStore + ?Sized> {
    store: &'a S,
    batch_size: usize,
    limit: Option<usize>,
}

impl<'a, S: TaxonomyStore + ?Sized> BulkLoader<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
            limit: None,
        }
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Stop after `limit` records of each file.
    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub async fn load_nodes(&self, path: impl AsRef<Path>) -> TaxonomyResult<LoadReport> {
        let file = File::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "Loading nodes");
        self.load_nodes_from(BufReader::new(file)).await
    }

    pub async fn load_nodes_from<R: BufRead>(&self, reader: R) -> TaxonomyResult<LoadReport> {
        self.store.ensure_schema().await?;

        let mut report = LoadReport::default();
        let mut seen = HashSet::new();
        let mut edges = Vec::new();
        let mut batch: Vec<TaxonNode> = Vec::with_capacity(self.batch_size);

        info!("Adding nodes...");
        for record in records::<TaxonNode, _>(reader).take(self.limit.unwrap_or(usize::MAX)) {
            let node = record?;
            if !seen.insert(node.tax_id) {
                return Err(TaxonomyError::DuplicateNode(node.tax_id));
            }

            if node.is_root() {
                warn!(tax_id = node.tax_id, "Ignoring self relationship of root node");
            } else {
                edges.push(ParentEdge {
                    tax_id: node.tax_id,
                    parent_tax_id: node.parent_tax_id,
                });
            }

            batch.push(node);
            if batch.len() == self.batch_size {
                report.records += self.store.insert_nodes(&batch).await?;
                debug!(nodes = report.records, "Nodes added");
                batch.clear();
            }
        }
        if !batch.is_empty() {
            report.records += self.store.insert_nodes(&batch).await?;
            debug!(nodes = report.records, "Nodes added");
        }
        if let Some(limit) = self.limit.filter(|l| report.records >= *l) {
            info!(limit, "Node limit reached");
        }

        info!("Adding relationships...");
        for chunk in edges.chunks(self.batch_size) {
            report.relationships += self.store.link_parents(chunk).await?;
            debug!(relationships = report.relationships, "Parent relationships processed");
        }

        info!(
            nodes = report.records,
            relationships = report.relationships,
            "Loading nodes completed"
        );
        Ok(report)
    }

    pub async fn load_names(&self, path: impl AsRef<Path>) -> TaxonomyResult<LoadReport> {
        let file = File::open(path.as_ref())?;
        info!(path = %path.as_ref().display(), "Loading names");
        self.load_names_from(BufReader::new(file)).await
    }

    pub async fn load_names_from<R: BufRead>(&self, reader: R) -> TaxonomyResult<LoadReport> {
        self.store.ensure_schema().await?;

        let mut report = LoadReport::default();
        let mut batch: Vec<TaxonName> = Vec::with_capacity(self.batch_size);

        info!("Adding names...");
        for record in records::<TaxonName, _>(reader).take(self.limit.unwrap_or(usize::MAX)) {
            batch.push(record?);
            if batch.len() == self.batch_size {
                report.relationships += self.store.insert_names(&batch).await?;
                report.records += batch.len();
                debug!(names = report.records, "Names added");
                batch.clear();
            }
        }
        if !batch.is_empty() {
            report.relationships += self.store.insert_names(&batch).await?;
            report.records += batch.len();
            debug!(names = report.records, "Names added");
        }

        info!(
            names = report.records,
            relationships = report.relationships,
            "Loading names completed"
        );
        Ok(report)
    }
}
