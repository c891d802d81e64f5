//! CSV-backed tabular source.
//!
//! Each cursor opens its own `csv::Reader` on the file, so cursors are
//! independent and nothing is cached between them. Only columns in the
//! cursor's active set are parsed; skipped rows (via `advance_many`) are read
//! but not parsed at all.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use csv::{Reader, ReaderBuilder, StringRecord};

use zipview_core::config::CsvOptions;
use zipview_core::cursor::{check_advance_count, CursorState, RowCursor};
use zipview_core::error::{Error as CoreError, Result as CoreResult};
use zipview_core::id::RowId;
use zipview_core::schema::{DataType, Field, RowSchema, Schema, SchemaRef};
use zipview_core::source::{ColumnPredicate, TabularSource};
use zipview_core::types::Scalar;

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct CsvTable {
    path: PathBuf,
    schema: Arc<Schema>,
    options: CsvOptions,
}

impl CsvTable {
    /// Open `path`, inferring the schema from the header and the first
    /// `options.infer_rows` records.
    pub fn open(path: impl AsRef<Path>, options: CsvOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut reader = reader_for(&path, options)?;
        let schema = infer_schema(&mut reader, options)?;
        Ok(Self {
            path,
            schema: Arc::new(schema),
            options,
        })
    }

    /// Open `path` with an explicit schema; the file is not read until a
    /// cursor is opened.
    pub fn with_schema(path: impl AsRef<Path>, schema: Schema, options: CsvOptions) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            schema: Arc::new(schema),
            options,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn csv_schema(&self) -> &Schema {
        &self.schema
    }

    fn count_records(&self) -> Result<u64> {
        let mut reader = reader_for(&self.path, self.options)?;
        let mut record = StringRecord::new();
        let mut n = 0u64;
        while reader.read_record(&mut record)? {
            n += 1;
        }
        Ok(n)
    }
}

impl TabularSource for CsvTable {
    fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    /// Unknown unless `allow_expensive`, which costs a full pass over the file.
    fn row_count(&self, allow_expensive: bool) -> CoreResult<Option<u64>> {
        if !allow_expensive {
            return Ok(None);
        }
        Ok(Some(self.count_records()?))
    }

    fn open_cursor(&self, predicate: ColumnPredicate<'_>) -> CoreResult<Box<dyn RowCursor>> {
        let reader = reader_for(&self.path, self.options)?;
        let width = self.schema.column_count();
        Ok(Box::new(CsvCursor {
            schema: self.schema.clone(),
            types: self.schema.fields.iter().map(|f| f.data_type).collect(),
            active: (0..width).map(predicate).collect(),
            reader: Some(reader),
            record: StringRecord::new(),
            values: vec![Scalar::Null; width],
            line: 0,
            position: None,
            state: CursorState::NotStarted,
        }))
    }
}

fn reader_for(path: &Path, options: CsvOptions) -> Result<Reader<File>> {
    Ok(ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(options.has_headers)
        .from_path(path)?)
}

/// Infer a schema from a reader positioned at the start of the file.
///
/// Each column takes the narrowest of Int64, Float64, Boolean, Utf8 that
/// fits every sampled non-empty value; empty fields are nulls. Without a
/// header row columns are named `column_0`, `column_1`, ...
pub fn infer_schema<R: std::io::Read>(reader: &mut Reader<R>, options: CsvOptions) -> Result<Schema> {
    let mut names: Vec<String> = if options.has_headers {
        reader.headers()?.iter().map(|h| h.to_string()).collect()
    } else {
        Vec::new()
    };
    let mut kinds: Vec<Option<DataType>> = vec![None; names.len()];
    let mut nullable = vec![false; names.len()];

    let mut record = StringRecord::new();
    let mut sampled = 0usize;
    while sampled < options.infer_rows && reader.read_record(&mut record)? {
        sampled += 1;
        if record.len() > names.len() {
            for i in names.len()..record.len() {
                names.push(format!("column_{i}"));
            }
            kinds.resize(record.len(), None);
            nullable.resize(record.len(), sampled > 1);
        }
        for (i, raw) in record.iter().enumerate() {
            if raw.is_empty() {
                nullable[i] = true;
                continue;
            }
            kinds[i] = Some(widen(kinds[i], sniff(raw)));
        }
    }

    Ok(Schema::new(
        names
            .into_iter()
            .zip(kinds)
            .zip(nullable)
            .map(|((name, kind), nullable)| {
                Field::new(name, kind.unwrap_or(DataType::Utf8), nullable || kind.is_none())
            })
            .collect(),
    ))
}

fn sniff(raw: &str) -> DataType {
    if raw.parse::<i64>().is_ok() {
        DataType::Int64
    } else if raw.parse::<f64>().is_ok() {
        DataType::Float64
    } else if parse_bool(raw).is_some() {
        DataType::Boolean
    } else {
        DataType::Utf8
    }
}

fn widen(current: Option<DataType>, seen: DataType) -> DataType {
    use DataType::*;
    match (current, seen) {
        (None, t) => t,
        (Some(a), b) if a == b => a,
        (Some(Int64), Float64) | (Some(Float64), Int64) => Float64,
        _ => Utf8,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    if raw.eq_ignore_ascii_case("true") {
        Some(true)
    } else if raw.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Parse one CSV field as `data_type`; the empty string is null.
pub fn parse_field(raw: &str, data_type: DataType) -> Result<Scalar> {
    if raw.is_empty() {
        return Ok(Scalar::Null);
    }
    let bad = || Error::Parse(format!("cannot parse '{raw}' as {data_type}"));
    Ok(match data_type {
        DataType::Boolean => Scalar::Bool(parse_bool(raw).ok_or_else(bad)?),
        DataType::Int32 => Scalar::I32(raw.parse().map_err(|_| bad())?),
        DataType::Int64 => Scalar::I64(raw.parse().map_err(|_| bad())?),
        DataType::Float32 => Scalar::F32(raw.parse().map_err(|_| bad())?),
        DataType::Float64 => Scalar::F64(raw.parse().map_err(|_| bad())?),
        DataType::Utf8 => Scalar::Str(raw.to_string()),
        DataType::Binary => Scalar::Bin(raw.as_bytes().to_vec()),
    })
}

pub struct CsvCursor {
    schema: SchemaRef,
    types: Vec<DataType>,
    active: Vec<bool>,
    /// `None` once disposed.
    reader: Option<Reader<File>>,
    record: StringRecord,
    values: Vec<Scalar>,
    line: u64,
    position: Option<u64>,
    state: CursorState,
}

impl CsvCursor {
    fn read_next(&mut self) -> Result<bool> {
        match self.reader.as_mut() {
            Some(reader) => Ok(reader.read_record(&mut self.record)?),
            None => Ok(false),
        }
    }

    fn parse_active(&mut self) -> Result<()> {
        for (col, value) in self.values.iter_mut().enumerate() {
            if self.active[col] {
                *value = parse_field(self.record.get(col).unwrap_or(""), self.types[col])?;
            }
        }
        self.line = self.record.position().map_or(0, |p| p.line());
        Ok(())
    }

    fn step(&mut self, count: u64) -> Result<bool> {
        if self.state == CursorState::Done {
            return Ok(false);
        }
        for _ in 0..count {
            if !self.read_next()? {
                self.state = CursorState::Done;
                return Ok(false);
            }
        }
        self.parse_active()?;
        self.position = Some(self.position.map_or(count - 1, |p| p + count));
        self.state = CursorState::Active;
        Ok(true)
    }

    fn ensure_active(&self, what: &str) -> CoreResult<()> {
        if self.state != CursorState::Active {
            return Err(CoreError::Invariant(format!(
                "{what} requested while cursor is {:?}",
                self.state
            )));
        }
        Ok(())
    }
}

impl RowCursor for CsvCursor {
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

    fn advance(&mut self) -> CoreResult<bool> {
        Ok(self.step(1)?)
    }

    fn advance_many(&mut self, count: u64) -> CoreResult<bool> {
        check_advance_count(count)?;
        Ok(self.step(count)?)
    }

    fn is_column_active(&self, col: usize) -> CoreResult<bool> {
        self.active
            .get(col)
            .copied()
            .ok_or_else(|| CoreError::column_out_of_range(col, self.active.len()))
    }

    fn value(&self, col: usize) -> CoreResult<&Scalar> {
        if !self.is_column_active(col)? {
            return Err(CoreError::InactiveColumn(col));
        }
        self.ensure_active("value")?;
        Ok(&self.values[col])
    }

    /// Line number of the record in the file.
    fn row_id(&self) -> CoreResult<RowId> {
        self.ensure_active("row id")?;
        Ok(RowId::new(0, self.line))
    }

    fn dispose(&mut self) {
        self.reader = None;
        self.state = CursorState::Done;
    }
}
