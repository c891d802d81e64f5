//! The `TabularSource` contract: a schema, a row count, and cursor factories.
//!
//! Sources are shared behind `Arc<dyn TabularSource>` and never mutated by
//! consumers. Cursors own whatever they need (they hold `Arc`s, not borrows),
//! so a cursor can outlive the call that opened it.

use crate::cursor::RowCursor;
use crate::error::{Error, Result};
use crate::schema::SchemaRef;

/// Column-interest predicate over a source's column indices.
pub type ColumnPredicate<'a> = &'a dyn Fn(usize) -> bool;

/// Predicate requesting every column.
pub fn all_columns(_col: usize) -> bool {
    true
}

/// Predicate requesting no column (opens an inert cursor).
pub fn no_columns(_col: usize) -> bool {
    false
}

/// Merges the cursors of a `CursorSet` back into one cursor.
pub trait Consolidator: Send {
    fn consolidate(&self, cursors: Vec<Box<dyn RowCursor>>) -> Result<Box<dyn RowCursor>>;
}

/// Result of `TabularSource::open_cursor_set`.
pub struct CursorSet {
    pub cursors: Vec<Box<dyn RowCursor>>,
    pub consolidator: Option<Box<dyn Consolidator>>,
}

impl CursorSet {
    pub fn single(cursor: Box<dyn RowCursor>) -> Self {
        Self {
            cursors: vec![cursor],
            consolidator: None,
        }
    }

    pub fn len(&self) -> usize {
        self.cursors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cursors.is_empty()
    }

    /// Collapse the set into one cursor: a lone cursor is returned as is,
    /// several cursors go through the consolidator.
    pub fn into_single(mut self) -> Result<Box<dyn RowCursor>> {
        if self.cursors.len() == 1 {
            if let Some(cursor) = self.cursors.pop() {
                return Ok(cursor);
            }
        }
        match self.consolidator {
            Some(consolidator) if !self.cursors.is_empty() => {
                consolidator.consolidate(self.cursors)
            }
            Some(_) => Err(Error::InvalidArgument("empty cursor set".into())),
            None => Err(Error::InvalidArgument(format!(
                "cursor set of {} cursors has no consolidator",
                self.cursors.len()
            ))),
        }
    }
}

/// Provider of rows addressable by column index.
pub trait TabularSource: Send + Sync {
    fn schema(&self) -> SchemaRef;

    /// Number of rows if known. Sources may refuse to compute an expensive
    /// count unless `allow_expensive` is set, returning `Ok(None)`.
    fn row_count(&self, allow_expensive: bool) -> Result<Option<u64>>;

    /// Open a cursor that materializes only columns accepted by `predicate`.
    fn open_cursor(&self, predicate: ColumnPredicate<'_>) -> Result<Box<dyn RowCursor>>;

    /// Open up to `requested` cursors over disjoint row ranges. Sources
    /// without partition support return a single cursor and no consolidator.
    fn open_cursor_set(
        &self,
        predicate: ColumnPredicate<'_>,
        requested: usize,
    ) -> Result<CursorSet> {
        let _ = requested;
        Ok(CursorSet::single(self.open_cursor(predicate)?))
    }
}
