//! Strongly-typed identifiers.
//!
//! Cursors hand out `RowId`s rather than raw integers so that wide ids from
//! different sources cannot be confused with plain row positions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 128-bit row identity: a high and a low 64-bit word.
///
/// Position-derived ids (see [`RowId::from_position`]) keep the high word at
/// zero and store the zero-based row position in the low word. Sources with
/// their own id scheme may use the high word freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RowId {
    hi: u64,
    lo: u64,
}

impl RowId {
    pub const fn new(hi: u64, lo: u64) -> Self {
        Self { hi, lo }
    }

    pub const fn from_position(position: u64) -> Self {
        Self { hi: 0, lo: position }
    }

    pub const fn high(self) -> u64 {
        self.hi
    }

    pub const fn low(self) -> u64 {
        self.lo
    }

    pub const fn as_u128(self) -> u128 {
        ((self.hi as u128) << 64) | self.lo as u128
    }
}

impl From<u128> for RowId {
    fn from(v: u128) -> Self {
        Self {
            hi: (v >> 64) as u64,
            lo: v as u64,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RowId({:016x}{:016x})", self.hi, self.lo)
    }
}
