//! Raw extract ingestion.
//!
//! Locates the five source extracts in an input directory and loads each one
//! into an all-string Polars DataFrame.

pub mod discovery;
pub mod error;
pub mod table;

pub use discovery::{RawInputs, discover_raw_inputs, list_csv_files};
pub use error::{IngestError, Result};
pub use table::{read_csv_table, read_raw_table};
