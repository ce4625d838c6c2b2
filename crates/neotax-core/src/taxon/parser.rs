//! Parser for NCBI taxdump `.dmp` files.
//!
//! Rows are `|`-separated with surrounding tabs and a trailing `\t|`:
//!
//! ```text
//! 562	|	561	|	species	|	EC	|	0	|	1	|	11	|	1	|	0	|	1	|	1	|	0	|		|
//! ```
//!
//! Each record kind declares the column counts it accepts and maps its fields to column indexes;
//! [`parse_record`] does the splitting and validation for all of them.

use std::io::BufRead;

use crate::error::{TaxonomyError, TaxonomyResult};
use super::model::{TaxonName, TaxonNode};

/// A named column position inside a dump row.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub name: &'static str,
    pub index: usize,
}

impl Column {
    pub const fn new(name: &'static str, index: usize) -> Self {
        Self { name, index }
    }
}

/// Shape of a dump file: its name (for error messages) and the column counts it may have.
#[derive(Debug, Clone, Copy)]
pub struct DumpLayout {
    pub file: &'static str,
    pub widths: &'static [usize],
}

/// Column table of `nodes.dmp`.
pub mod nodes_columns {
    use super::Column;

    pub const TAX_ID: Column = Column::new("tax_id", 0);
    pub const PARENT_TAX_ID: Column = Column::new("parent_tax_id", 1);
    pub const RANK: Column = Column::new("rank", 2);
    pub const HIDDEN_FLAG: Column = Column::new("hidden_flag", 10);
}

/// Column table of `names.dmp`.
pub mod names_columns {
    use super::Column;

    pub const TAX_ID: Column = Column::new("tax_id", 0);
    pub const NAME_TXT: Column = Column::new("name_txt", 1);
    pub const UNIQUE_NAME: Column = Column::new("unique_name", 2);
    pub const NAME_CLASS: Column = Column::new("name_class", 3);
}

/// A record kind that can be built from one dump row.
pub trait DumpRecord: Sized {
    const LAYOUT: DumpLayout;

    fn from_row(row: &DumpRow<'_>) -> TaxonomyResult<Self>;
}

/// One split row, with typed accessors that report the offending column on failure.
#[derive(Debug)]
pub struct DumpRow<'a> {
    file: &'static str,
    line: usize,
    fields: Vec<&'a str>,
}

impl<'a> DumpRow<'a> {
    pub fn text(&self, column: Column) -> &'a str {
        self.fields[column.index]
    }

    pub fn integer(&self, column: Column) -> TaxonomyResult<i64> {
        let value = self.text(column);
        value.parse().map_err(|_| {
            TaxonomyError::malformed(
                self.file,
                self.line,
                format!("{} is not an integer: '{}'", column.name, value),
            )
        })
    }

    pub fn flag(&self, column: Column) -> TaxonomyResult<bool> {
        match self.text(column) {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(TaxonomyError::malformed(
                self.file,
                self.line,
                format!("{} is not a 0/1 flag: '{}'", column.name, other),
            )),
        }
    }
}

impl DumpRecord for TaxonNode {
    // 13 columns in the classic dump, 18 since genetic-code columns were appended.
    const LAYOUT: DumpLayout = DumpLayout {
        file: "nodes.dmp",
        widths: &[13, 18],
    };

    fn from_row(row: &DumpRow<'_>) -> TaxonomyResult<Self> {
        Ok(Self {
            tax_id: row.integer(nodes_columns::TAX_ID)?,
            parent_tax_id: row.integer(nodes_columns::PARENT_TAX_ID)?,
            rank: row.text(nodes_columns::RANK).to_string(),
            hidden_flag: row.flag(nodes_columns::HIDDEN_FLAG)?,
        })
    }
}

impl DumpRecord for TaxonName {
    const LAYOUT: DumpLayout = DumpLayout {
        file: "names.dmp",
        widths: &[4],
    };

    fn from_row(row: &DumpRow<'_>) -> TaxonomyResult<Self> {
        Ok(Self {
            tax_id: row.integer(names_columns::TAX_ID)?,
            name_txt: row.text(names_columns::NAME_TXT).to_string(),
            unique_name: row.text(names_columns::UNIQUE_NAME).to_string(),
            name_class: row.text(names_columns::NAME_CLASS).to_string(),
        })
    }
}

/// Split a dump line into trimmed fields, dropping the empty field after the trailing `|`.
pub fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim_end_matches(['\n', '\r']);
    let mut fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if line.trim_end().ends_with('|') {
        fields.pop();
    }
    fields
}

/// Parse one dump line into a record. `line_no` is 1-based.
pub fn parse_record<T: DumpRecord>(line: &str, line_no: usize) -> TaxonomyResult<T> {
    let layout = T::LAYOUT;
    let fields = split_fields(line);

    if !layout.widths.contains(&fields.len()) {
        return Err(TaxonomyError::malformed(
            layout.file,
            line_no,
            format!(
                "expected {} columns, got {}",
                layout
                    .widths
                    .iter()
                    .map(|w| w.to_string())
                    .collect::<Vec<_>>()
                    .join(" or "),
                fields.len()
            ),
        ));
    }

    T::from_row(&DumpRow {
        file: layout.file,
        line: line_no,
        fields,
    })
}

/// Iterate over the records of a dump, skipping blank lines.
pub fn records<T, R>(reader: R) -> impl Iterator<Item = TaxonomyResult<T>>
where
    T: DumpRecord,
    R: BufRead,
{
    reader
        .lines()
        .enumerate()
        .filter_map(|(i, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some(parse_record::<T>(&line, i + 1)),
            Err(e) => Some(Err(TaxonomyError::Io(e))),
        })
}
