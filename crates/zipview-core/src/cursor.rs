//! Row cursor contract and typed value access.
//!
//! A cursor is forward-only and single-pass. It starts *before* the first
//! row; each successful `advance` makes the next row current. Values of the
//! current row are borrowed from the cursor, never copied out by the
//! contract itself.

use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::id::RowId;
use crate::schema::{DataType, SchemaRef};
use crate::types::Scalar;

/// Lifecycle of a cursor. Transitions only move forward:
/// `NotStarted -> Active -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CursorState {
    NotStarted,
    Active,
    Done,
}

/// Forward-only iterator over the rows of a tabular source.
///
/// Invariants:
/// - `value` and `row_id` are only valid in `CursorState::Active`.
/// - Reading a column the cursor was not opened for is governed by the
///   implementation (sources reject it with `Error::InactiveColumn`).
/// - `dispose` is idempotent. Cursors that own other cursors (the zip and
///   chain cursors) dispose them on `Drop`; leaf cursors release what they
///   hold when dropped.
pub trait RowCursor: Send {
    /// Schema of the table this cursor iterates.
    fn schema(&self) -> SchemaRef;

    fn state(&self) -> CursorState;

    /// Zero-based index of the current row, `None` unless `Active`.
    fn position(&self) -> Option<u64>;

    /// Step to the next row. Returns `false` once the cursor is exhausted.
    fn advance(&mut self) -> Result<bool>;

    /// Skip `count - 1` rows and step onto the next one. `count` must be at
    /// least 1; `advance_many(1)` is `advance()`.
    fn advance_many(&mut self, count: u64) -> Result<bool>;

    /// Whether the cursor was opened with interest in `col`.
    fn is_column_active(&self, col: usize) -> Result<bool>;

    /// Value of `col` in the current row.
    fn value(&self, col: usize) -> Result<&Scalar>;

    /// Identity of the current row.
    fn row_id(&self) -> Result<RowId>;

    /// Release everything the cursor holds. Safe to call more than once.
    fn dispose(&mut self);
}

/// Shared argument check for `advance_many` implementations.
pub fn check_advance_count(count: u64) -> Result<()> {
    if count == 0 {
        return Err(Error::InvalidArgument(
            "advance_many requires a count of at least 1".into(),
        ));
    }
    Ok(())
}

/// Rust types that can be read out of a `Scalar`.
pub trait ColumnValue: Sized {
    const TYPE_NAME: &'static str;

    /// Whether a column of `data_type` can be read as `Self`.
    fn accepts(data_type: DataType) -> bool;

    fn from_scalar(scalar: &Scalar) -> Option<Self>;
}

macro_rules! column_value {
    ($ty:ty, $dt:ident, $variant:ident) => {
        impl ColumnValue for $ty {
            const TYPE_NAME: &'static str = stringify!($dt);

            fn accepts(data_type: DataType) -> bool {
                data_type == DataType::$dt
            }

            fn from_scalar(scalar: &Scalar) -> Option<Self> {
                match scalar {
                    Scalar::$variant(v) => Some(v.clone()),
                    _ => None,
                }
            }
        }
    };
}

column_value!(bool, Boolean, Bool);
column_value!(i32, Int32, I32);
column_value!(i64, Int64, I64);
column_value!(f32, Float32, F32);
column_value!(f64, Float64, F64);
column_value!(String, Utf8, Str);
column_value!(Vec<u8>, Binary, Bin);

impl<T: ColumnValue> ColumnValue for Option<T> {
    const TYPE_NAME: &'static str = T::TYPE_NAME;

    fn accepts(data_type: DataType) -> bool {
        T::accepts(data_type)
    }

    fn from_scalar(scalar: &Scalar) -> Option<Self> {
        match scalar {
            Scalar::Null => Some(None),
            other => T::from_scalar(other).map(Some),
        }
    }
}

/// Typed accessor for one column, bound to a column index.
///
/// The getter holds no borrow of the cursor, so the cursor can keep
/// advancing between reads.
#[derive(Debug, Clone, Copy)]
pub struct ValueGetter<T> {
    column: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ColumnValue> ValueGetter<T> {
    pub fn column(&self) -> usize {
        self.column
    }

    /// Read the current row's value through `cursor`.
    pub fn get<C: RowCursor + ?Sized>(&self, cursor: &C) -> Result<T> {
        let scalar = cursor.value(self.column)?;
        T::from_scalar(scalar).ok_or_else(|| Error::TypeMismatch {
            column: self.column,
            expected: T::TYPE_NAME,
            found: scalar.type_name().to_string(),
        })
    }
}

/// Build a typed getter for `col`, checking range and declared type.
pub fn getter<T: ColumnValue, C: RowCursor + ?Sized>(
    cursor: &C,
    col: usize,
) -> Result<ValueGetter<T>> {
    let schema = cursor.schema();
    let data_type = schema.column_type(col)?;
    if !T::accepts(data_type) {
        return Err(Error::TypeMismatch {
            column: col,
            expected: T::TYPE_NAME,
            found: data_type.name().to_string(),
        });
    }
    Ok(ValueGetter {
        column: col,
        _marker: PhantomData,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_reads_null() {
        assert_eq!(<Option<i64>>::from_scalar(&Scalar::Null), Some(None));
        assert_eq!(<Option<i64>>::from_scalar(&Scalar::I64(3)), Some(Some(3)));
        assert_eq!(i64::from_scalar(&Scalar::Null), None);
    }

    #[test]
    fn strict_type_acceptance() {
        assert!(i64::accepts(DataType::Int64));
        assert!(!i64::accepts(DataType::Int32));
        assert!(String::accepts(DataType::Utf8));
        assert!(<Option<f64>>::accepts(DataType::Float64));
    }

    #[test]
    fn zero_advance_count_is_invalid() {
        assert!(matches!(
            check_advance_count(0),
            Err(Error::InvalidArgument(_))
        ));
        assert!(check_advance_count(1).is_ok());
    }
}
