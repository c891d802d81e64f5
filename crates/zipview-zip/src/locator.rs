//! Global <-> (source, local) column addressing.
//!
//! The locator keeps a cumulative offset table of length `N + 1`:
//! `offsets[0] = 0`, `offsets[i + 1] = offsets[i] + width(i)`. Source `i`
//! owns the global range `offsets[i]..offsets[i + 1]`.

use zipview_core::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLocator {
    offsets: Vec<usize>,
}

impl ColumnLocator {
    /// Build from per-source column counts, in source order.
    pub fn new(widths: impl IntoIterator<Item = usize>) -> Self {
        let widths = widths.into_iter();
        let mut offsets = Vec::with_capacity(widths.size_hint().0 + 1);
        offsets.push(0);
        let mut acc = 0usize;
        for w in widths {
            acc += w;
            offsets.push(acc);
        }
        Self { offsets }
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    pub fn source_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of global columns.
    pub fn column_count(&self) -> usize {
        self.offsets[self.offsets.len() - 1]
    }

    /// First global index owned by `source`.
    pub fn offset(&self, source: usize) -> Result<usize> {
        self.check_source(source)?;
        Ok(self.offsets[source])
    }

    /// Number of columns owned by `source`.
    pub fn width(&self, source: usize) -> Result<usize> {
        self.check_source(source)?;
        Ok(self.offsets[source + 1] - self.offsets[source])
    }

    /// Map a global column to `(source, local)`.
    pub fn locate(&self, global: usize) -> Result<(usize, usize)> {
        let total = self.column_count();
        if global >= total {
            return Err(Error::column_out_of_range(global, total));
        }
        // Greatest offset <= global. Zero-width sources share their offset
        // with the next source, so an exact hit resolves to the last source
        // starting there, which is the only one that owns columns.
        let source = match self.offsets.binary_search(&global) {
            Ok(hit) => hit + self.offsets[hit + 1..].partition_point(|&o| o == global),
            Err(insert) => insert - 1,
        };
        Ok((source, global - self.offsets[source]))
    }

    /// Map `(source, local)` back to a global column.
    pub fn to_global(&self, source: usize, local: usize) -> Result<usize> {
        let width = self.width(source)?;
        if local >= width {
            return Err(Error::column_out_of_range(local, width));
        }
        Ok(self.offsets[source] + local)
    }

    fn check_source(&self, source: usize) -> Result<()> {
        let count = self.source_count();
        if source >= count {
            return Err(Error::SourceOutOfRange {
                index: source,
                count,
            });
        }
        Ok(())
    }
}
