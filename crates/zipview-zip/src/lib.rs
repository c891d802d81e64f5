#![forbid(unsafe_code)]
//! zipview-zip: positional zip of N tabular sources.
//!
//! Layout:
//! - `locator`: global column index <-> (source, local) via an offset table.
//! - `compose`: the composed schema, all lookups routed through the locator.
//! - `predicate`: splitting one column-interest predicate per source.
//! - `row_count`: min over sources, unknown if any source is unknown.
//! - `cursor`: the lock-step cursor.
//! - `view`: the `TabularSource` tying it together, and `create`.
//!
//! Everything is synchronous. A view and its composed schema are immutable
//! and can be shared across threads; each cursor is single-owner.

pub mod compose;
pub mod cursor;
pub mod locator;
pub mod metrics;
pub mod predicate;
pub mod row_count;
pub mod view;

pub use compose::{ColumnInfo, ComposedSchema};
pub use cursor::ZipCursor;
pub use locator::ColumnLocator;
pub use predicate::{split_predicate, ActiveColumnSet};
pub use row_count::composed_row_count;
pub use view::{create, ZipView};
