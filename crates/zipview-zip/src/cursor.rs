//! Synchronized cursor: N source cursors driven in lock-step.
//!
//! Each composed step advances every source cursor once, in source order.
//! The first source that cannot advance ends the composed cursor, which is
//! what limits the view to the shortest source without knowing any row
//! count up front. Sources earlier in the order have already stepped by then;
//! that is never observable because a `Done` cursor serves no rows.

use std::sync::Arc;

use zipview_core::cursor::{check_advance_count, CursorState, RowCursor};
use zipview_core::error::{Error, Result};
use zipview_core::id::RowId;
use zipview_core::schema::{RowSchema, SchemaRef};
use zipview_core::source::ColumnPredicate;
use zipview_core::types::Scalar;

use crate::compose::ComposedSchema;
use crate::predicate::ActiveColumnSet;

pub struct ZipCursor {
    schema: Arc<ComposedSchema>,
    active: Arc<ActiveColumnSet>,
    /// Source-aligned; disposal pops from the back.
    cursors: Vec<Box<dyn RowCursor>>,
    state: CursorState,
    position: Option<u64>,
    disposed: bool,
}

impl ZipCursor {
    /// Wrap already-opened source cursors, computing the active set from
    /// `predicate`.
    pub fn new(
        schema: Arc<ComposedSchema>,
        cursors: Vec<Box<dyn RowCursor>>,
        predicate: ColumnPredicate<'_>,
    ) -> Result<Self> {
        let active = ActiveColumnSet::from_predicate(predicate, schema.column_count());
        Self::with_active_set(schema, cursors, Arc::new(active))
    }

    /// Wrap already-opened source cursors with a precomputed active set.
    pub fn with_active_set(
        schema: Arc<ComposedSchema>,
        cursors: Vec<Box<dyn RowCursor>>,
        active: Arc<ActiveColumnSet>,
    ) -> Result<Self> {
        if cursors.len() != schema.source_count() {
            return Err(Error::InvalidArgument(format!(
                "expected {} source cursors, got {}",
                schema.source_count(),
                cursors.len()
            )));
        }
        if active.len() != schema.column_count() {
            return Err(Error::InvalidArgument(format!(
                "active column set covers {} columns, schema has {}",
                active.len(),
                schema.column_count()
            )));
        }
        Ok(Self {
            schema,
            active,
            cursors,
            state: CursorState::NotStarted,
            position: None,
            disposed: false,
        })
    }

    pub fn composed_schema(&self) -> &Arc<ComposedSchema> {
        &self.schema
    }

    pub fn active_columns(&self) -> &ActiveColumnSet {
        &self.active
    }

    fn ensure_active(&self, what: &str) -> Result<()> {
        if self.state != CursorState::Active {
            return Err(Error::Invariant(format!(
                "{what} requested while cursor is {:?}",
                self.state
            )));
        }
        Ok(())
    }

    /// `stopped` is the source that ran out or failed.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn finish(&mut self, stopped: usize) {
        #[cfg(feature = "tracing")]
        tracing::trace!(
            stopped_source = stopped,
            rows = self.position.map_or(0, |p| p + 1),
            "zip cursor done"
        );
        self.state = CursorState::Done;
    }

    fn step<F>(&mut self, count: u64, mut step_one: F) -> Result<bool>
    where
        F: FnMut(&mut Box<dyn RowCursor>) -> Result<bool>,
    {
        if self.state == CursorState::Done {
            return Ok(false);
        }
        // Sources before a failing one have already moved, so an error ends
        // the cursor just like exhaustion does.
        let mut stopped = None;
        for (i, cursor) in self.cursors.iter_mut().enumerate() {
            match step_one(cursor) {
                Ok(true) => {}
                outcome => {
                    stopped = Some((i, outcome));
                    break;
                }
            }
        }
        if let Some((i, outcome)) = stopped {
            self.finish(i);
            return outcome.map(|_| false);
        }
        self.position = Some(match self.position {
            None => count - 1,
            Some(p) => p + count,
        });
        self.state = CursorState::Active;
        Ok(true)
    }
}

impl RowCursor for ZipCursor {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn position(&self) -> Option<u64> {
        match self.state {
            CursorState::Active => self.position,
            _ => None,
        }
    }

    fn advance(&mut self) -> Result<bool> {
        self.step(1, |c| c.advance())
    }

    fn advance_many(&mut self, count: u64) -> Result<bool> {
        check_advance_count(count)?;
        self.step(count, |c| c.advance_many(count))
    }

    fn is_column_active(&self, col: usize) -> Result<bool> {
        self.schema.locator().locate(col)?;
        Ok(self.active.contains(col))
    }

    /// Delegates to the owning source cursor; the value is borrowed from it.
    fn value(&self, col: usize) -> Result<&Scalar> {
        let (source, local) = self.schema.locator().locate(col)?;
        self.ensure_active("value")?;
        self.cursors[source].value(local)
    }

    /// Position-derived id; source ids are never consulted.
    fn row_id(&self) -> Result<RowId> {
        self.ensure_active("row id")?;
        let position = self
            .position
            .ok_or_else(|| Error::Invariant("active cursor without a position".into()))?;
        Ok(RowId::from_position(position))
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        while let Some(mut cursor) = self.cursors.pop() {
            cursor.dispose();
        }
        self.state = CursorState::Done;
        #[cfg(feature = "tracing")]
        tracing::trace!("zip cursor disposed");
    }
}

impl Drop for ZipCursor {
    fn drop(&mut self) {
        self.dispose();
    }
}
