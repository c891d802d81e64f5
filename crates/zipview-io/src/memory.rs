//! In-memory columnar tables.
//!
//! Data lives in an `Arc<RowBatch>` so cursors share it with the table
//! instead of copying. Unlike the zip view, a memory table can honor a
//! cursor-set request: it splits its rows into contiguous ranges and hands
//! back a [`ChainConsolidator`] that reads them in order.

use std::sync::Arc;

use zipview_core::cursor::{check_advance_count, CursorState, RowCursor};
use zipview_core::error::{Error, Result};
use zipview_core::id::RowId;
use zipview_core::schema::{RowSchema, Schema, SchemaRef};
use zipview_core::source::{ColumnPredicate, Consolidator, CursorSet, TabularSource};
use zipview_core::types::{RowBatch, Scalar};

#[derive(Debug, Clone)]
pub struct MemoryTable {
    schema: Arc<Schema>,
    data: Arc<RowBatch>,
    tag: u64,
}

impl MemoryTable {
    /// Pair `schema` with `batch`, checking column count and value types.
    pub fn try_new(schema: Schema, batch: RowBatch) -> Result<Self> {
        if schema.fields.len() != batch.num_columns() {
            return Err(Error::Schema(format!(
                "schema has {} fields, batch has {} columns",
                schema.fields.len(),
                batch.num_columns()
            )));
        }
        let rows = batch.num_rows();
        for (field, column) in schema.fields.iter().zip(&batch.columns) {
            if column.len() != rows {
                return Err(Error::Schema(format!(
                    "column '{}' has {} rows, expected {rows}",
                    column.name,
                    column.len()
                )));
            }
            for value in &column.values {
                match value.data_type() {
                    None if !field.nullable => {
                        return Err(Error::Schema(format!(
                            "null in non-nullable column '{}'",
                            field.name
                        )))
                    }
                    Some(t) if t != field.data_type => {
                        return Err(Error::Schema(format!(
                            "column '{}' declared {} but holds {t}",
                            field.name, field.data_type
                        )))
                    }
                    _ => {}
                }
            }
        }
        Ok(Self {
            schema: Arc::new(schema),
            data: Arc::new(batch),
            tag: 0,
        })
    }

    /// Set the high word of the row ids this table's cursors hand out.
    pub fn with_tag(mut self, tag: u64) -> Self {
        self.tag = tag;
        self
    }

    pub fn num_rows(&self) -> usize {
        self.data.num_rows()
    }

    fn cursor_over(&self, predicate: ColumnPredicate<'_>, start: usize, end: usize) -> MemoryCursor {
        MemoryCursor {
            schema: self.schema.clone(),
            data: Arc::clone(&self.data),
            active: (0..self.schema.column_count()).map(predicate).collect(),
            start,
            end,
            row: None,
            state: CursorState::NotStarted,
            tag: self.tag,
        }
    }
}

impl TabularSource for MemoryTable {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn row_count(&self, _allow_expensive: bool) -> Result<Option<u64>> {
        Ok(Some(self.num_rows() as u64))
    }

    fn open_cursor(&self, predicate: ColumnPredicate<'_>) -> Result<Box<dyn RowCursor>> {
        Ok(Box::new(self.cursor_over(predicate, 0, self.num_rows())))
    }

    /// Splits rows into at most `requested` contiguous, non-empty ranges.
    fn open_cursor_set(
        &self,
        predicate: ColumnPredicate<'_>,
        requested: usize,
    ) -> Result<CursorSet> {
        let rows = self.num_rows();
        let parts = requested.clamp(1, rows.max(1));
        if parts == 1 {
            return Ok(CursorSet::single(self.open_cursor(predicate)?));
        }
        let chunk = rows.div_ceil(parts);
        let cursors = (0..rows)
            .step_by(chunk)
            .map(|start| {
                Box::new(self.cursor_over(predicate, start, (start + chunk).min(rows)))
                    as Box<dyn RowCursor>
            })
            .collect();
        Ok(CursorSet {
            cursors,
            consolidator: Some(Box::new(ChainConsolidator)),
        })
    }
}

/// Cursor over the row range `start..end` of a memory table.
pub struct MemoryCursor {
    schema: SchemaRef,
    data: Arc<RowBatch>,
    active: Vec<bool>,
    start: usize,
    end: usize,
    row: Option<usize>,
    state: CursorState,
    tag: u64,
}

impl RowCursor for MemoryCursor {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn state(&self) -> CursorState {
        self.state
    }

    fn position(&self) -> Option<u64> {
        match self.state {
            CursorState::Active => self.row.map(|r| (r - self.start) as u64),
            _ => None,
        }
    }

    fn advance(&mut self) -> Result<bool> {
        self.advance_many(1)
    }

    fn advance_many(&mut self, count: u64) -> Result<bool> {
        check_advance_count(count)?;
        if self.state == CursorState::Done {
            return Ok(false);
        }
        let next = match self.row {
            None => (self.start as u64).checked_add(count - 1),
            Some(r) => (r as u64).checked_add(count),
        };
        match next {
            Some(n) if n < self.end as u64 => {
                self.row = Some(n as usize);
                self.state = CursorState::Active;
                Ok(true)
            }
            _ => {
                self.row = None;
                self.state = CursorState::Done;
                Ok(false)
            }
        }
    }

    fn is_column_active(&self, col: usize) -> Result<bool> {
        self.active
            .get(col)
            .copied()
            .ok_or_else(|| Error::column_out_of_range(col, self.active.len()))
    }

    fn value(&self, col: usize) -> Result<&Scalar> {
        if !self.is_column_active(col)? {
            return Err(Error::InactiveColumn(col));
        }
        match (self.state, self.row) {
            (CursorState::Active, Some(row)) => Ok(&self.data.columns[col].values[row]),
            _ => Err(Error::Invariant(format!(
                "value requested while cursor is {:?}",
                self.state
            ))),
        }
    }

    fn row_id(&self) -> Result<RowId> {
        match (self.state, self.row) {
            (CursorState::Active, Some(row)) => Ok(RowId::new(self.tag, row as u64)),
            _ => Err(Error::Invariant(format!(
                "row id requested while cursor is {:?}",
                self.state
            ))),
        }
    }

    fn dispose(&mut self) {
        self.state = CursorState::Done;
        self.row = None;
    }
}

/// Reads a cursor set's cursors one after another, in set order.
pub struct ChainConsolidator;

impl Consolidator for ChainConsolidator {
    fn consolidate(&self, cursors: Vec<Box<dyn RowCursor>>) -> Result<Box<dyn RowCursor>> {
        let schema = cursors
            .first()
            .map(|c| c.schema())
            .ok_or_else(|| Error::InvalidArgument("nothing to consolidate".into()))?;
        Ok(Box::new(ChainCursor {
            schema,
            cursors,
            current: 0,
            position: None,
            state: CursorState::NotStarted,
        }))
    }
}

struct ChainCursor {
    schema: SchemaRef,
    cursors: Vec<Box<dyn RowCursor>>,
    current: usize,
    position: Option<u64>,
    state: CursorState,
}

impl ChainCursor {
    fn active_cursor(&self, what: &str) -> Result<&dyn RowCursor> {
        match (self.state, self.cursors.get(self.current)) {
            (CursorState::Active, Some(cursor)) => Ok(cursor.as_ref()),
            _ => Err(Error::Invariant(format!(
                "{what} requested while cursor is {:?}",
                self.state
            ))),
        }
    }
}

impl RowCursor for ChainCursor {
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
        if self.state == CursorState::Done {
            return Ok(false);
        }
        while let Some(cursor) = self.cursors.get_mut(self.current) {
            if cursor.advance()? {
                self.position = Some(self.position.map_or(0, |p| p + 1));
                self.state = CursorState::Active;
                return Ok(true);
            }
            self.current += 1;
        }
        self.state = CursorState::Done;
        Ok(false)
    }

    fn advance_many(&mut self, count: u64) -> Result<bool> {
        check_advance_count(count)?;
        for _ in 0..count {
            if !self.advance()? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn is_column_active(&self, col: usize) -> Result<bool> {
        match self.cursors.first() {
            Some(cursor) => cursor.is_column_active(col),
            None => Err(Error::column_out_of_range(col, 0)),
        }
    }

    fn value(&self, col: usize) -> Result<&Scalar> {
        self.active_cursor("value")?.value(col)
    }

    fn row_id(&self) -> Result<RowId> {
        self.active_cursor("row id")?.row_id()
    }

    fn dispose(&mut self) {
        while let Some(mut cursor) = self.cursors.pop() {
            cursor.dispose();
        }
        self.state = CursorState::Done;
    }
}

impl Drop for ChainCursor {
    fn drop(&mut self) {
        self.dispose();
    }
}
