//! NCBI taxonomy records and the taxdump parser.

pub mod model;
pub mod parser;

pub use model::{relationship_type, TaxonName, TaxonNode, ROOT_TAX_ID, SCIENTIFIC_NAME};
pub use parser::{parse_record, records, DumpRecord};
