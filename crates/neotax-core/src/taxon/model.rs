//! Taxonomy record models.

use serde::{Deserialize, Serialize};

/// Tax id of the root of the NCBI taxonomy tree.
pub const ROOT_TAX_ID: i64 = 1;

/// Name class carried by exactly one name per taxon.
pub const SCIENTIFIC_NAME: &str = "scientific name";

/// A single record of `nodes.dmp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonNode {
    pub tax_id: i64,
    pub parent_tax_id: i64,
    pub rank: String,
    /// Set when NCBI suppresses this node in abbreviated lineages.
    pub hidden_flag: bool,
}

impl TaxonNode {
    /// The root points at itself; every other node has a real parent.
    pub fn is_root(&self) -> bool {
        self.tax_id == self.parent_tax_id
    }
}

/// A single record of `names.dmp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonName {
    pub tax_id: i64,
    pub name_txt: String,
    /// Unique variant of the name, empty when `name_txt` is already unique.
    pub unique_name: String,
    pub name_class: String,
}

impl TaxonName {
    /// Key identifying a name node: tax id plus the unique variant of the name.
    pub fn key(&self) -> String {
        let name = if self.unique_name.is_empty() {
            &self.name_txt
        } else {
            &self.unique_name
        };
        format!("{}:{}", self.tax_id, name)
    }

    /// Relationship type linking a node to this name (`"genbank common name"` -> `GENBANK_COMMON_NAME`).
    pub fn relationship_type(&self) -> String {
        relationship_type(&self.name_class)
    }

    pub fn is_scientific(&self) -> bool {
        self.name_class == SCIENTIFIC_NAME
    }
}

/// Build a relationship type from a name class.
///
/// Whitespace becomes `_`, anything outside `[A-Za-z0-9_]` is dropped, the result is upper-cased.
/// Relationship types cannot be query parameters, so this doubles as the injection guard.
/// A class with nothing usable left falls back to `NAME`.
pub fn relationship_type(name_class: &str) -> String {
    let rel: String = name_class
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_whitespace() {
                Some('_')
            } else if c.is_ascii_alphanumeric() || c == '_' {
                Some(c.to_ascii_uppercase())
            } else {
                None
            }
        })
        .collect();

    if rel.is_empty() {
        "NAME".to_string()
    } else {
        rel
    }
}
