//! The zip view: N sources presented as one table, row `k` of the view being
//! row `k` of every source, truncated to the shortest source.
//!
//! The view is itself a `TabularSource`, so views nest.

use std::sync::Arc;

use zipview_core::cursor::RowCursor;
use zipview_core::error::{Error, Result};
use zipview_core::schema::{RowSchema, SchemaRef};
use zipview_core::source::{ColumnPredicate, CursorSet, TabularSource};

use crate::compose::ComposedSchema;
use crate::cursor::ZipCursor;
use crate::metrics;
use crate::predicate::{split_predicate, ActiveColumnSet};
use crate::row_count::composed_row_count;

/// Zip `sources` positionally.
///
/// A single source is returned unchanged (the same `Arc`); an empty list is
/// an invalid argument.
pub fn create(mut sources: Vec<Arc<dyn TabularSource>>) -> Result<Arc<dyn TabularSource>> {
    match sources.len() {
        0 => Err(Error::InvalidArgument(
            "zip requires at least one source".into(),
        )),
        1 => sources
            .pop()
            .ok_or_else(|| Error::Invariant("source list emptied under us".into())),
        _ => Ok(Arc::new(ZipView::try_new(sources)?)),
    }
}

pub struct ZipView {
    sources: Vec<Arc<dyn TabularSource>>,
    schema: Arc<ComposedSchema>,
}

impl ZipView {
    /// Compose the schemas of `sources` eagerly. Unlike [`create`], a single
    /// source is wrapped rather than passed through.
    pub fn try_new(sources: Vec<Arc<dyn TabularSource>>) -> Result<Self> {
        if sources.is_empty() {
            return Err(Error::InvalidArgument(
                "zip requires at least one source".into(),
            ));
        }
        let schema = ComposedSchema::compose(sources.iter().map(|s| s.schema()).collect())?;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sources = sources.len(),
            columns = schema.column_count(),
            "zip view composed"
        );

        Ok(Self {
            sources,
            schema: Arc::new(schema),
        })
    }

    pub fn sources(&self) -> &[Arc<dyn TabularSource>] {
        &self.sources
    }

    pub fn composed_schema(&self) -> &Arc<ComposedSchema> {
        &self.schema
    }

    /// Open the synchronized cursor with its concrete type.
    pub fn open_zip_cursor(&self, predicate: ColumnPredicate<'_>) -> Result<ZipCursor> {
        let active = Arc::new(ActiveColumnSet::from_predicate(
            predicate,
            self.schema.column_count(),
        ));
        let global = |col: usize| active.contains(col);
        let locator = self.schema.locator();
        let split = split_predicate(&global, locator);

        let mut cursors: Vec<Box<dyn RowCursor>> = Vec::with_capacity(self.sources.len());
        let mut inert = 0usize;
        for (i, (source, local)) in self.sources.iter().zip(split.iter()).enumerate() {
            if active.is_source_inert(locator, i)? {
                inert += 1;
            }
            match source.open_cursor(local) {
                Ok(cursor) => cursors.push(cursor),
                Err(e) => {
                    while let Some(mut opened) = cursors.pop() {
                        opened.dispose();
                    }
                    return Err(e);
                }
            }
        }

        metrics::cursor_opened(self.sources.len(), active.active_count(), inert);

        ZipCursor::with_active_set(Arc::clone(&self.schema), cursors, Arc::clone(&active))
    }
}

impl TabularSource for ZipView {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn row_count(&self, allow_expensive: bool) -> Result<Option<u64>> {
        composed_row_count(&self.sources, allow_expensive)
    }

    fn open_cursor(&self, predicate: ColumnPredicate<'_>) -> Result<Box<dyn RowCursor>> {
        Ok(Box::new(self.open_zip_cursor(predicate)?))
    }

    /// Always a single cursor with no consolidator: a partitioned zip would
    /// need every source to split at the same row boundaries, which the
    /// source contract does not promise. `requested` is ignored.
    fn open_cursor_set(
        &self,
        predicate: ColumnPredicate<'_>,
        requested: usize,
    ) -> Result<CursorSet> {
        metrics::cursor_set_requested(requested);
        Ok(CursorSet::single(self.open_cursor(predicate)?))
    }
}

#[cfg(test)]
mod tests {
    use zipview_core::cursor::{getter, CursorState};
    use zipview_core::schema::{DataType, Field, Schema};
    use zipview_core::source::{all_columns, no_columns};
    use zipview_core::types::{Column, RowBatch, Scalar};
    use zipview_io::MemoryTable;

    use super::*;

    fn ints(name: &str, values: &[i64]) -> Arc<dyn TabularSource> {
        let schema = Schema::new(vec![Field::new(name, DataType::Int64, false)]);
        let batch = RowBatch::try_new(vec![Column::new(
            name,
            values.iter().map(|&v| Scalar::I64(v)).collect(),
        )])
        .unwrap();
        Arc::new(MemoryTable::try_new(schema, batch).unwrap())
    }

    #[test]
    fn create_rejects_empty() {
        assert!(matches!(create(vec![]), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn create_passes_single_source_through() {
        let only = ints("a", &[1, 2]);
        let out = create(vec![Arc::clone(&only)]).unwrap();
        assert!(Arc::ptr_eq(&only, &out));
    }

    #[test]
    fn zips_rows_positionally() {
        let view = create(vec![ints("a", &[1, 2, 3]), ints("b", &[10, 20])]).unwrap();
        assert_eq!(view.schema().column_count(), 2);
        assert_eq!(view.row_count(false).unwrap(), Some(2));

        let mut cursor = view.open_cursor(&all_columns).unwrap();
        let a = getter::<i64, _>(cursor.as_ref(), 0).unwrap();
        let b = getter::<i64, _>(cursor.as_ref(), 1).unwrap();
        let mut rows = vec![];
        while cursor.advance().unwrap() {
            rows.push((a.get(cursor.as_ref()).unwrap(), b.get(cursor.as_ref()).unwrap()));
        }
        assert_eq!(rows, vec![(1, 10), (2, 20)]);
        assert_eq!(cursor.state(), CursorState::Done);
    }

    #[test]
    fn inert_source_still_bounds_length() {
        let view = ZipView::try_new(vec![ints("a", &[1, 2, 3, 4]), ints("b", &[0, 0])]).unwrap();
        let only_a = |c: usize| c == 0;
        let mut cursor = view.open_zip_cursor(&only_a).unwrap();
        assert!(!cursor.is_column_active(1).unwrap());
        let mut n = 0;
        while cursor.advance().unwrap() {
            n += 1;
        }
        assert_eq!(n, 2);
    }

    #[test]
    fn no_columns_at_all() {
        let view = create(vec![ints("a", &[1, 2, 3]), ints("b", &[1, 2, 3])]).unwrap();
        let mut cursor = view.open_cursor(&no_columns).unwrap();
        assert!(cursor.advance_many(3).unwrap());
        assert_eq!(cursor.row_id().unwrap().low(), 2);
        assert!(!cursor.advance().unwrap());
    }

    #[test]
    fn cursor_set_is_always_single() {
        let view = create(vec![ints("a", &[1, 2, 3]), ints("b", &[4, 5, 6])]).unwrap();
        let set = view.open_cursor_set(&all_columns, 8).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.consolidator.is_none());
        let mut cursor = set.into_single().unwrap();
        assert!(cursor.advance().unwrap());
    }

    #[test]
    fn single_source_view_still_wraps() {
        let view = ZipView::try_new(vec![ints("a", &[7])]).unwrap();
        let mut cursor = view.open_cursor(&all_columns).unwrap();
        assert!(cursor.advance().unwrap());
        assert_eq!(cursor.value(0).unwrap(), &Scalar::I64(7));
        assert!(!cursor.advance().unwrap());
    }
}
