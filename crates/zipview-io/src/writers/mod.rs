//! Row sinks: write the current row of a cursor somewhere.

pub mod csv;
pub mod jsonl;

pub use self::csv::CsvWriter;
pub use self::jsonl::JsonlWriter;

use zipview_core::cursor::RowCursor;
use zipview_core::schema::RowSchema;

use crate::error::Result;

pub trait RowSink {
    /// Write the cursor's current row.
    fn write_row(&mut self, cursor: &dyn RowCursor) -> Result<()>;

    /// Flush buffered output.
    fn finish(&mut self) -> Result<()>;
}

/// Advance `cursor` until it is exhausted (or `limit` rows were written),
/// writing every row to `sink`. Returns the number of rows written.
pub fn drain(
    cursor: &mut dyn RowCursor,
    sink: &mut dyn RowSink,
    limit: Option<u64>,
) -> Result<u64> {
    let mut written = 0u64;
    while limit.map_or(true, |l| written < l) && cursor.advance()? {
        sink.write_row(cursor)?;
        written += 1;
    }
    sink.finish()?;
    Ok(written)
}

/// Output names for `columns`, made unique with a numeric suffix when the
/// schema carries duplicates (`id`, `id_1`, ...).
pub(crate) fn output_names(schema: &dyn RowSchema, columns: &[usize]) -> Result<Vec<String>> {
    let mut names: Vec<String> = Vec::with_capacity(columns.len());
    for &col in columns {
        let base = schema.column_name(col)?;
        let mut name = base.to_string();
        let mut n = 0;
        while names.contains(&name) {
            n += 1;
            name = format!("{base}_{n}");
        }
        names.push(name);
    }
    Ok(names)
}
