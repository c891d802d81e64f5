#![forbid(unsafe_code)]
//! zipview-io: concrete tabular sources and row sinks.
//!
//! - `memory`: columnar in-memory tables (tests, benches, composition demos).
//! - `readers::csv`: CSV files streamed through the `csv` crate, one reader per
//!   cursor, parsing only the columns a cursor asked for.
//! - `writers`: drain a cursor into NDJSON or CSV.
//!
//! Everything here implements the contracts from `zipview-core` and knows
//! nothing about zipping.

pub mod error;
pub mod memory;
pub mod readers;
pub mod writers;

pub use error::{Error, Result};
pub use memory::{ChainConsolidator, MemoryTable};
pub use readers::csv::{infer_schema, CsvTable};
pub use writers::{drain, CsvWriter, JsonlWriter, RowSink};
