//! Convenient re-exports for downstream crates.

pub use crate::config::{CsvOptions, ZipConfig};
pub use crate::cursor::{getter, ColumnValue, CursorState, RowCursor, ValueGetter};
pub use crate::error::{Error, Result};
pub use crate::id::RowId;
pub use crate::schema::{DataType, Field, RowSchema, Schema, SchemaRef};
pub use crate::source::{ColumnPredicate, Consolidator, CursorSet, TabularSource};
pub use crate::types::{Column, RowBatch, Scalar};
