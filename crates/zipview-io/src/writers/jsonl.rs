//! Streaming NDJSON writer.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};

use zipview_core::cursor::RowCursor;
use zipview_core::schema::RowSchema;
use zipview_core::types::Scalar;

use super::{output_names, RowSink};
use crate::error::Result;

pub struct JsonlWriter<W: Write> {
    writer: BufWriter<W>,
    // (cursor column, output key); keys are unique even if names are not
    columns: Vec<(usize, String)>,
}

impl JsonlWriter<File> {
    pub fn to_path(path: &str, schema: &dyn RowSchema, columns: &[usize]) -> Result<Self> {
        let f = File::create(path)?;
        Self::to_writer(f, schema, columns)
    }
}

impl<W: Write> JsonlWriter<W> {
    pub fn to_writer(writer: W, schema: &dyn RowSchema, columns: &[usize]) -> Result<Self> {
        let names = output_names(schema, columns)?;
        Ok(Self {
            writer: BufWriter::new(writer),
            columns: columns.iter().copied().zip(names).collect(),
        })
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

impl<W: Write> RowSink for JsonlWriter<W> {
    /// One JSON object per row, keys in sorted order.
    fn write_row(&mut self, cursor: &dyn RowCursor) -> Result<()> {
        let mut obj = BTreeMap::new();
        for (col, name) in &self.columns {
            obj.insert(name.as_str(), scalar_to_json(cursor.value(*col)?));
        }
        let line = serde_json::to_string(&obj)?;
        writeln!(self.writer, "{}", line)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn scalar_to_json(v: &Scalar) -> serde_json::Value {
    use Scalar::*;
    match v {
        Null => serde_json::Value::Null,
        Bool(b) => serde_json::Value::Bool(*b),
        I32(i) => serde_json::Value::from(*i),
        I64(i) => serde_json::Value::from(*i),
        F32(f) => serde_json::Value::from(*f as f64),
        F64(f) => serde_json::Value::from(*f),
        Str(s) => serde_json::Value::String(s.clone()),
        Bin(b) => serde_json::Value::String(format!("[binary {} bytes]", b.len())),
    }
}
