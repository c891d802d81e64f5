#![forbid(unsafe_code)]
//! zipview-core: shared vocabulary for the zipview workspace.
//!
//! This crate defines the three capability contracts every tabular source
//! satisfies (`RowSchema`, `RowCursor`, `TabularSource`) plus the plain data
//! types flowing through them (schemas, scalars, row ids, config).
//!
//! No I/O and no logging live here; concrete sources are in `zipview-io` and
//! the zip view itself is in `zipview-zip`.

pub mod config;
pub mod cursor;
pub mod error;
pub mod id;
pub mod prelude;
pub mod schema;
pub mod source;
pub mod types;

pub use error::{Error, Result};
