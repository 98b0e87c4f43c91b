//! Storage formats: CSV import/export and markdown export.

pub mod csv;
pub mod md;

pub use csv::{parse_csv, write_csv};
pub use md::write_markdown;
