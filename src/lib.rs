#![forbid(unsafe_code)]
//! zipview: present N tabular sources as one table by position.
//!
//! Row `k` of a zip view is row `k` of every input, concatenated left to
//! right; the view ends with its shortest input. This crate only re-exports
//! the workspace members:
//!
//! - [`zipview_core`]: schema, cursor and source contracts, scalars, row ids, config.
//! - [`zipview_zip`]: the zip view, its composed schema and lock-step cursor.
//! - [`zipview_io`]: in-memory and CSV sources, NDJSON and CSV sinks.

pub use zipview_core;
pub use zipview_io;
pub use zipview_zip;

pub use zipview_core::prelude::*;
pub use zipview_zip::{create, ZipView};
