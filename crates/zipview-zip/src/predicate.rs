//! Column-interest pushdown: one global predicate -> N source predicates.

use zipview_core::error::Result;
use zipview_core::source::ColumnPredicate;

use crate::locator::ColumnLocator;

/// Per-source predicates: predicate `i` answers for source `i`'s local
/// columns by asking the global predicate about `local + offsets[i]`.
///
/// No attempt is made to notice that a source predicate is always false;
/// callers use [`ActiveColumnSet::is_source_inert`] for that.
pub fn split_predicate<'a>(
    predicate: ColumnPredicate<'a>,
    locator: &ColumnLocator,
) -> Vec<impl Fn(usize) -> bool + 'a> {
    locator.offsets()[..locator.source_count()]
        .iter()
        .map(|&offset| move |local: usize| predicate(local + offset))
        .collect()
}

/// Snapshot of which global columns a cursor was opened for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveColumnSet {
    bits: Vec<bool>,
}

impl ActiveColumnSet {
    /// Evaluate `predicate` once per global column.
    pub fn from_predicate(predicate: ColumnPredicate<'_>, column_count: usize) -> Self {
        Self {
            bits: (0..column_count).map(predicate).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Caller has range-checked `col`.
    pub fn contains(&self, col: usize) -> bool {
        self.bits.get(col).copied().unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    /// True when none of `source`'s columns are requested, i.e. the source
    /// only has to track position and exhaustion.
    pub fn is_source_inert(&self, locator: &ColumnLocator, source: usize) -> Result<bool> {
        let start = locator.offset(source)?;
        let end = start + locator.width(source)?;
        Ok(!self.bits[start..end].iter().any(|&b| b))
    }
}
