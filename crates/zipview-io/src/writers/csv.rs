//! CSV writer.

use std::io::Write;

use zipview_core::cursor::RowCursor;
use zipview_core::schema::RowSchema;
use zipview_core::types::Scalar;

use super::{output_names, RowSink};
use crate::error::Result;

pub struct CsvWriter<W: Write> {
    writer: ::csv::Writer<W>,
    columns: Vec<usize>,
}

impl<W: Write> CsvWriter<W> {
    /// Writes the header row immediately.
    pub fn to_writer(
        writer: W,
        delimiter: u8,
        schema: &dyn RowSchema,
        columns: &[usize],
    ) -> Result<Self> {
        let mut writer = ::csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        writer.write_record(output_names(schema, columns)?)?;
        Ok(Self {
            writer,
            columns: columns.to_vec(),
        })
    }

    pub fn into_inner(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|e| e.into_error().into())
    }
}

impl<W: Write> RowSink for CsvWriter<W> {
    fn write_row(&mut self, cursor: &dyn RowCursor) -> Result<()> {
        for &col in &self.columns {
            self.writer.write_field(scalar_to_field(cursor.value(col)?))?;
        }
        self.writer.write_record(None::<&[u8]>)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

fn scalar_to_field(v: &Scalar) -> String {
    use Scalar::*;
    match v {
        Null => String::new(),
        Bool(b) => b.to_string(),
        I32(i) => i.to_string(),
        I64(i) => i.to_string(),
        F32(f) => f.to_string(),
        F64(f) => f.to_string(),
        Str(s) => s.clone(),
        Bin(b) => String::from_utf8_lossy(b).into_owned(),
    }
}
