//! Lineage reconstruction from an ancestor-chain traversal.
//!
//! The store returns one [`LineageRow`] per ancestor edge, each carrying the queried taxon's own
//! name and rank. Rows are re-sorted by distance here before use, so a closer ancestor always
//! takes a rank slot before a farther one, whatever order the store produced.

pub mod rank;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{TaxonomyError, TaxonomyResult};
use crate::store::TaxonomyStore;
use crate::taxon::ROOT_TAX_ID;

pub use rank::{RankSpec, DEFAULT_RANKS};

/// One `(self, ancestor)` pair of the ancestor-chain query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineageRow {
    pub self_name: String,
    pub self_rank: String,
    pub parent_rank: String,
    pub parent_name: String,
    pub parent_tax_id: i64,
    /// PARENT hops from the queried taxon; 1 for the direct parent.
    pub distance: i64,
}

/// Options for [`LineageResolver::resolve_full_lineage_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FullLineageOptions {
    /// Skip ancestors flagged hidden.
    pub abbreviated: bool,
    pub include_root: bool,
}

impl Default for FullLineageOptions {
    fn default() -> Self {
        Self {
            abbreviated: false,
            include_root: true,
        }
    }
}

/// Build the prefixed rank lineage of `tax_id` from its ancestor rows.
pub fn rank_lineage(
    tax_id: i64,
    ranks: &[RankSpec],
    mut rows: Vec<LineageRow>,
) -> TaxonomyResult<Vec<String>> {
    if rows.is_empty() {
        return Err(TaxonomyError::NoLineageFound(tax_id));
    }
    rows.sort_by_key(|row| row.distance);

    let mut slots: Vec<Option<String>> = vec![None; ranks.len()];
    let slot_of = |rank: &str| ranks.iter().position(|r| r.rank == rank);

    let own = &rows[0];
    if let Some(idx) = slot_of(&own.self_rank) {
        let name = if own.self_rank == "species" {
            own.self_name.split_whitespace().last().unwrap_or(own.self_name.as_str())
        } else {
            own.self_name.as_str()
        };
        slots[idx] = Some(name.to_string());
    }

    for row in &rows {
        if let Some(idx) = slot_of(&row.parent_rank) {
            if slots[idx].is_none() {
                slots[idx] = Some(row.parent_name.clone());
            }
        }
    }

    Ok(ranks
        .iter()
        .zip(slots)
        .map(|(rank, slot)| match slot {
            Some(name) => rank.render(&name),
            None => rank.placeholder(),
        })
        .collect())
}

/// Build the root-first name chain of `tax_id` from its ancestor rows.
pub fn full_lineage(
    tax_id: i64,
    mut rows: Vec<LineageRow>,
    include_root: bool,
) -> TaxonomyResult<Vec<String>> {
    if rows.is_empty() {
        return Err(TaxonomyError::NoLineageFound(tax_id));
    }
    rows.sort_by_key(|row| row.distance);

    let mut lineage = Vec::with_capacity(rows.len() + 1);
    lineage.push(rows[0].self_name.clone());
    for row in rows.iter().filter(|row| include_root || row.parent_tax_id != ROOT_TAX_ID) {
        lineage.push(row.parent_name.clone());
    }
    lineage.reverse();

    Ok(lineage)
}

/// Read-only lineage queries over a [`TaxonomyStore`].
pub struct LineageResolver<'a, S: TaxonomyStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: TaxonomyStore + ?Sized> LineageResolver<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// One `"<prefix>__<name>"` entry per requested rank, `"<prefix>__"` when unresolved.
    pub async fn resolve_rank_lineage(
        &self,
        tax_id: i64,
        ranks: &[RankSpec],
    ) -> TaxonomyResult<Vec<String>> {
        let rows = self.store.ancestor_chain(tax_id, false).await?;
        debug!(tax_id, rows = rows.len(), "Fetched ancestor chain");
        rank_lineage(tax_id, ranks, rows)
    }

    /// Every ancestor name from the root down to the taxon itself.
    pub async fn resolve_full_lineage(
        &self,
        tax_id: i64,
        abbreviated: bool,
    ) -> TaxonomyResult<Vec<String>> {
        self.resolve_full_lineage_with(
            tax_id,
            FullLineageOptions {
                abbreviated,
                ..Default::default()
            },
        )
        .await
    }

    pub async fn resolve_full_lineage_with(
        &self,
        tax_id: i64,
        options: FullLineageOptions,
    ) -> TaxonomyResult<Vec<String>> {
        let rows = self.store.ancestor_chain(tax_id, options.abbreviated).await?;
        debug!(tax_id, rows = rows.len(), abbreviated = options.abbreviated, "Fetched ancestor chain");
        full_lineage(tax_id, rows, options.include_root)
    }
}
