//! Logical schema types plus the `RowSchema` contract.
//!
//! `Schema` is the plain, serializable schema used by concrete sources. The
//! zip view exposes its own composed schema through the same `RowSchema`
//! trait, so consumers never need to know which one they are looking at.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    Binary,
}

impl DataType {
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Boolean => "Boolean",
            DataType::Int32 => "Int32",
            DataType::Int64 => "Int64",
            DataType::Float32 => "Float32",
            DataType::Float64 => "Float64",
            DataType::Utf8 => "Utf8",
            DataType::Binary => "Binary",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
    /// Free-form column annotations keyed by kind (e.g. "description").
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Scalar>,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, kind: impl Into<String>, value: Scalar) -> Self {
        self.metadata.insert(kind.into(), value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn empty() -> Self {
        Self { fields: vec![] }
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Parse a schema from its JSON form (`{"fields": [...]}`).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn checked_field(&self, col: usize) -> Result<&Field> {
        self.fields
            .get(col)
            .ok_or_else(|| Error::column_out_of_range(col, self.fields.len()))
    }
}

/// Shared, immutable handle to any schema implementation.
pub type SchemaRef = Arc<dyn RowSchema>;

/// Read-only column namespace of a tabular source.
///
/// Every column lookup is by zero-based index and fails with
/// `Error::ColumnOutOfRange` outside `0..column_count()`.
pub trait RowSchema: fmt::Debug + Send + Sync {
    fn column_count(&self) -> usize;

    fn column_name(&self, col: usize) -> Result<&str>;

    fn column_type(&self, col: usize) -> Result<DataType>;

    /// Resolve a column by name. When a namespace holds duplicate names the
    /// implementation decides which one wins and must document it.
    fn find_column(&self, name: &str) -> Option<usize>;

    /// Metadata kinds attached to a column, in a stable order.
    fn metadata_kinds(&self, col: usize) -> Result<Vec<String>>;

    /// Metadata value of `kind` for a column, `None` when absent.
    fn metadata(&self, kind: &str, col: usize) -> Result<Option<Scalar>>;
}

impl RowSchema for Schema {
    fn column_count(&self) -> usize {
        self.fields.len()
    }

    fn column_name(&self, col: usize) -> Result<&str> {
        Ok(self.checked_field(col)?.name.as_str())
    }

    fn column_type(&self, col: usize) -> Result<DataType> {
        Ok(self.checked_field(col)?.data_type)
    }

    /// First column with a matching name.
    fn find_column(&self, name: &str) -> Option<usize> {
        self.index_of(name)
    }

    fn metadata_kinds(&self, col: usize) -> Result<Vec<String>> {
        Ok(self.checked_field(col)?.metadata.keys().cloned().collect())
    }

    fn metadata(&self, kind: &str, col: usize) -> Result<Option<Scalar>> {
        Ok(self.checked_field(col)?.metadata.get(kind).cloned())
    }
}
