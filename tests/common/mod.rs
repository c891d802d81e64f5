//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use zipview_core::cursor::{check_advance_count, CursorState, RowCursor};
use zipview_core::error::{Error, Result};
use zipview_core::id::RowId;
use zipview_core::schema::{DataType, Field, RowSchema, Schema, SchemaRef};
use zipview_core::source::{ColumnPredicate, TabularSource};
use zipview_core::types::{Column, RowBatch, Scalar};
use zipview_io::MemoryTable;

/// One-column Int64 table.
pub fn int_table(name: &str, values: &[i64]) -> Arc<dyn TabularSource> {
    let schema = Schema::new(vec![Field::new(name, DataType::Int64, false)]);
    let batch = RowBatch::try_new(vec![Column::new(
        name,
        values.iter().map(|&v| Scalar::I64(v)).collect(),
    )])
    .unwrap();
    Arc::new(MemoryTable::try_new(schema, batch).unwrap())
}

/// Int64 table with `names.len()` columns and `rows` rows; cell `(r, c)`
/// holds `r * 100 + c`.
pub fn wide_table(names: &[&str], rows: usize) -> Arc<dyn TabularSource> {
    let schema = Schema::new(
        names
            .iter()
            .map(|n| Field::new(*n, DataType::Int64, false))
            .collect(),
    );
    let columns = names
        .iter()
        .enumerate()
        .map(|(c, n)| Column::new(*n, (0..rows).map(|r| Scalar::I64((r * 100 + c) as i64)).collect()))
        .collect();
    Arc::new(MemoryTable::try_new(schema, RowBatch::try_new(columns).unwrap()).unwrap())
}

/// What a [`RecordingSource`] saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Open { source: &'static str, active: Vec<usize> },
    Advance { source: &'static str },
    Dispose { source: &'static str },
}

pub type Journal = Arc<Mutex<Vec<Event>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn events(journal: &Journal) -> Vec<Event> {
    journal.lock().unwrap().clone()
}

/// Int64 source that logs every open, advance and dispose into a shared
/// journal. `count_known = false` makes it report an unknown row count.
pub struct RecordingSource {
    label: &'static str,
    schema: Arc<Schema>,
    rows: u64,
    count_known: bool,
    journal: Journal,
}

impl RecordingSource {
    pub fn new(label: &'static str, columns: &[&str], rows: u64, journal: &Journal) -> Self {
        let schema = Schema::new(
            columns
                .iter()
                .map(|n| Field::new(*n, DataType::Int64, false))
                .collect(),
        );
        Self {
            label,
            schema: Arc::new(schema),
            rows,
            count_known: true,
            journal: Arc::clone(journal),
        }
    }

    pub fn unknown_count(mut self) -> Self {
        self.count_known = false;
        self
    }

    pub fn shared(self) -> Arc<dyn TabularSource> {
        Arc::new(self)
    }
}

impl TabularSource for RecordingSource {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    fn row_count(&self, _allow_expensive: bool) -> Result<Option<u64>> {
        Ok(self.count_known.then_some(self.rows))
    }

    fn open_cursor(&self, predicate: ColumnPredicate<'_>) -> Result<Box<dyn RowCursor>> {
        let active: Vec<usize> = (0..self.schema.column_count()).filter(|&c| predicate(c)).collect();
        self.journal.lock().unwrap().push(Event::Open {
            source: self.label,
            active: active.clone(),
        });
        Ok(Box::new(RecordingCursor {
            label: self.label,
            schema: self.schema.clone(),
            rows: self.rows,
            active,
            position: None,
            state: CursorState::NotStarted,
            current: Vec::new(),
            disposed: false,
            journal: Arc::clone(&self.journal),
        }))
    }
}

pub struct RecordingCursor {
    label: &'static str,
    schema: Arc<Schema>,
    rows: u64,
    active: Vec<usize>,
    position: Option<u64>,
    state: CursorState,
    current: Vec<Scalar>,
    disposed: bool,
    journal: Journal,
}

impl RecordingCursor {
    fn next_position(&self) -> u64 {
        self.position.map_or(0, |p| p + 1)
    }
}

impl RowCursor for RecordingCursor {
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
        self.journal
            .lock()
            .unwrap()
            .push(Event::Advance { source: self.label });
        let next = self.next_position();
        if next >= self.rows {
            self.state = CursorState::Done;
            self.current.clear();
            return Ok(false);
        }
        self.position = Some(next);
        self.state = CursorState::Active;
        self.current = (0..self.schema.column_count())
            .map(|c| Scalar::I64(next as i64 * 100 + c as i64))
            .collect();
        Ok(true)
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
        if col >= self.schema.column_count() {
            return Err(Error::column_out_of_range(col, self.schema.column_count()));
        }
        Ok(self.active.contains(&col))
    }

    fn value(&self, col: usize) -> Result<&Scalar> {
        if !self.is_column_active(col)? {
            return Err(Error::InactiveColumn(col));
        }
        self.current
            .get(col)
            .ok_or_else(|| Error::Invariant("no current row".into()))
    }

    fn row_id(&self) -> Result<RowId> {
        self.position()
            .map(RowId::from_position)
            .ok_or_else(|| Error::Invariant("no current row".into()))
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.journal
            .lock()
            .unwrap()
            .push(Event::Dispose { source: self.label });
    }
}

impl Drop for RecordingCursor {
    fn drop(&mut self) {
        self.dispose();
    }
}

pub fn disposals(journal: &Journal) -> Vec<&'static str> {
    events(journal)
        .into_iter()
        .filter_map(|e| match e {
            Event::Dispose { source } => Some(source),
            _ => None,
        })
        .collect()
}

pub fn advances(journal: &Journal) -> Vec<&'static str> {
    events(journal)
        .into_iter()
        .filter_map(|e| match e {
            Event::Advance { source } => Some(source),
            _ => None,
        })
        .collect()
}
