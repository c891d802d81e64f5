//! Composed schema over N source schemas.
//!
//! Nothing is copied: every per-column lookup is routed through the
//! `ColumnLocator` to the owning source schema. The schema is built once
//! and shared by `Arc` between the view and all of its cursors.

use serde::Serialize;

use zipview_core::error::{Error, Result};
use zipview_core::schema::{DataType, RowSchema, SchemaRef};
use zipview_core::types::Scalar;

use crate::locator::ColumnLocator;

#[derive(Debug)]
pub struct ComposedSchema {
    schemas: Vec<SchemaRef>,
    locator: ColumnLocator,
}

/// One row of a composed schema's layout, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnInfo {
    pub index: usize,
    pub name: String,
    pub data_type: DataType,
    pub source: usize,
    pub local: usize,
}

impl ComposedSchema {
    /// Compose `schemas` in order. Fails on an empty list.
    pub fn compose(schemas: Vec<SchemaRef>) -> Result<Self> {
        if schemas.is_empty() {
            return Err(Error::InvalidArgument(
                "cannot compose an empty list of schemas".into(),
            ));
        }
        let locator = ColumnLocator::new(schemas.iter().map(|s| s.column_count()));
        Ok(Self { schemas, locator })
    }

    pub fn locator(&self) -> &ColumnLocator {
        &self.locator
    }

    pub fn source_count(&self) -> usize {
        self.schemas.len()
    }

    pub fn source_schema(&self, source: usize) -> Result<&SchemaRef> {
        self.schemas.get(source).ok_or(Error::SourceOutOfRange {
            index: source,
            count: self.schemas.len(),
        })
    }

    /// Every global column with the source it comes from.
    pub fn columns(&self) -> Result<Vec<ColumnInfo>> {
        (0..self.column_count())
            .map(|index| {
                let (source, local) = self.locator.locate(index)?;
                let schema = &self.schemas[source];
                Ok(ColumnInfo {
                    index,
                    name: schema.column_name(local)?.to_string(),
                    data_type: schema.column_type(local)?,
                    source,
                    local,
                })
            })
            .collect()
    }

    fn resolve(&self, col: usize) -> Result<(&SchemaRef, usize)> {
        let (source, local) = self.locator.locate(col)?;
        Ok((&self.schemas[source], local))
    }
}

impl RowSchema for ComposedSchema {
    fn column_count(&self) -> usize {
        self.locator.column_count()
    }

    fn column_name(&self, col: usize) -> Result<&str> {
        let (schema, local) = self.resolve(col)?;
        schema.column_name(local)
    }

    fn column_type(&self, col: usize) -> Result<DataType> {
        let (schema, local) = self.resolve(col)?;
        schema.column_type(local)
    }

    /// Duplicate names across sources are legal. Sources are searched last to
    /// first, so a later source's column shadows an earlier one.
    fn find_column(&self, name: &str) -> Option<usize> {
        self.schemas
            .iter()
            .enumerate()
            .rev()
            .find_map(|(source, schema)| {
                let local = schema.find_column(name)?;
                self.locator.to_global(source, local).ok()
            })
    }

    fn metadata_kinds(&self, col: usize) -> Result<Vec<String>> {
        let (schema, local) = self.resolve(col)?;
        schema.metadata_kinds(local)
    }

    fn metadata(&self, kind: &str, col: usize) -> Result<Option<Scalar>> {
        let (schema, local) = self.resolve(col)?;
        schema.metadata(kind, local)
    }
}
