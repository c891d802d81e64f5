//! Composed row count: the shortest source decides.

use std::sync::Arc;

use zipview_core::error::Result;
use zipview_core::source::TabularSource;

/// Minimum of the source row counts, or `None` as soon as one source cannot
/// say. Sources are queried in order with the same `allow_expensive` flag
/// and the scan stops at the first unknown.
pub fn composed_row_count(
    sources: &[Arc<dyn TabularSource>],
    allow_expensive: bool,
) -> Result<Option<u64>> {
    let mut min: Option<u64> = None;
    for source in sources {
        match source.row_count(allow_expensive)? {
            None => return Ok(None),
            Some(n) => min = Some(min.map_or(n, |m| m.min(n))),
        }
    }
    Ok(min)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use zipview_core::cursor::RowCursor;
    use zipview_core::error::Error;
    use zipview_core::schema::{Schema, SchemaRef};
    use zipview_core::source::ColumnPredicate;

    use super::*;

    /// Source that only answers row-count queries.
    struct Counted {
        rows: Option<u64>,
        only_if_expensive: bool,
        queries: AtomicUsize,
    }

    impl Counted {
        fn new(rows: Option<u64>) -> Arc<Self> {
            Arc::new(Self {
                rows,
                only_if_expensive: false,
                queries: AtomicUsize::new(0),
            })
        }
    }

    impl TabularSource for Counted {
        fn schema(&self) -> SchemaRef {
            Arc::new(Schema::empty())
        }

        fn row_count(&self, allow_expensive: bool) -> Result<Option<u64>> {
            self.queries.fetch_add(1, Ordering::SeqCst);
            if self.only_if_expensive && !allow_expensive {
                return Ok(None);
            }
            Ok(self.rows)
        }

        fn open_cursor(&self, _predicate: ColumnPredicate<'_>) -> Result<Box<dyn RowCursor>> {
            Err(Error::Invariant("row-count fixture has no rows".into()))
        }
    }

    fn as_sources(v: &[Arc<Counted>]) -> Vec<Arc<dyn TabularSource>> {
        v.iter()
            .map(|s| Arc::clone(s) as Arc<dyn TabularSource>)
            .collect()
    }

    #[test]
    fn minimum_for_every_order() {
        let orders = [[5, 7, 3], [5, 3, 7], [7, 5, 3], [7, 3, 5], [3, 5, 7], [3, 7, 5]];
        for order in orders {
            let sources: Vec<_> = order.iter().map(|&n| Counted::new(Some(n))).collect();
            assert_eq!(
                composed_row_count(&as_sources(&sources), false).unwrap(),
                Some(3)
            );
        }
    }

    #[test]
    fn unknown_short_circuits() {
        let sources = vec![
            Counted::new(Some(4)),
            Counted::new(None),
            Counted::new(Some(1)),
        ];
        assert_eq!(composed_row_count(&as_sources(&sources), false).unwrap(), None);
        assert_eq!(sources[2].queries.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn expensive_flag_is_forwarded() {
        let lazy = Arc::new(Counted {
            rows: Some(2),
            only_if_expensive: true,
            queries: AtomicUsize::new(0),
        });
        let sources = vec![Counted::new(Some(9)), lazy];
        let sources = as_sources(&sources);
        assert_eq!(composed_row_count(&sources, false).unwrap(), None);
        assert_eq!(composed_row_count(&sources, true).unwrap(), Some(2));
    }

    #[test]
    fn empty_source_bounds_everything() {
        let sources = vec![Counted::new(Some(0)), Counted::new(Some(10))];
        assert_eq!(
            composed_row_count(&as_sources(&sources), true).unwrap(),
            Some(0)
        );
    }
}
