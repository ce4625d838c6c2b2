//! Rank labels and their one-letter prefixes.

use serde::Serialize;

use crate::error::{TaxonomyError, TaxonomyResult};

/// Rank labels used when none are requested explicitly.
pub const DEFAULT_RANKS: &[&str] = &[
    "superKingdom",
    "Phylum",
    "Class",
    "Order",
    "Family",
    "Genus",
    "Species",
];

/// A requested rank: the rank name as stored in the graph plus its output prefix.
///
/// The prefix is the first uppercase letter of the label, lower-cased, so `"superKingdom"`
/// matches rank `superkingdom` and renders as `k__Bacteria`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankSpec {
    pub rank: String,
    pub prefix: char,
}

impl RankSpec {
    pub fn parse(label: &str) -> TaxonomyResult<Self> {
        let capital = label
            .chars()
            .find(|c| c.is_uppercase())
            .ok_or_else(|| TaxonomyError::InvalidRankSpec(label.to_string()))?;

        Ok(Self {
            rank: label.to_lowercase(),
            prefix: capital.to_lowercase().next().unwrap_or(capital),
        })
    }

    /// Parse a list of labels, failing on the first invalid one.
    pub fn parse_all<S: AsRef<str>>(labels: &[S]) -> TaxonomyResult<Vec<Self>> {
        labels.iter().map(|l| Self::parse(l.as_ref())).collect()
    }

    pub fn defaults() -> Vec<Self> {
        Self::parse_all(DEFAULT_RANKS).unwrap_or_default()
    }

    /// The unresolved slot value, e.g. `"k__"`.
    pub fn placeholder(&self) -> String {
        format!("{}__", self.prefix)
    }

    pub fn render(&self, name: &str) -> String {
        format!("{}__{}", self.prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_from_embedded_capital() {
        let spec = RankSpec::parse("superKingdom").unwrap();
        assert_eq!(spec.prefix, 'k');
        assert_eq!(spec.rank, "superkingdom");
    }

    #[test]
    fn test_prefix_from_leading_capital() {
        assert_eq!(RankSpec::parse("Phylum").unwrap().prefix, 'p');
        assert_eq!(RankSpec::parse("Species").unwrap().prefix, 's');
    }

    #[test]
    fn test_no_capital_is_an_error() {
        match RankSpec::parse("phylum") {
            Err(TaxonomyError::InvalidRankSpec(label)) => assert_eq!(label, "phylum"),
            other => panic!("unexpected result: {other:?}"),
        }
        assert!(RankSpec::parse_all(&["Phylum", "class"]).is_err());
    }

    #[test]
    fn test_defaults() {
        let prefixes: String = RankSpec::defaults().iter().map(|r| r.prefix).collect();
        assert_eq!(prefixes, "kpcofgs");
    }

    #[test]
    fn test_render_and_placeholder() {
        let genus = RankSpec::parse("Genus").unwrap();
        assert_eq!(genus.placeholder(), "g__");
        assert_eq!(genus.render("Escherichia"), "g__Escherichia");
    }
}
