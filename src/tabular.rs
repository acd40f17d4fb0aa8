#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Labelled columns and tables produced by the tabular library.

use std::fmt;

use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::value::{DType, Value, ValueError, list_repr};

/// Infers the dtype the tabular library would pick for a column.
pub(crate) fn infer_dtype(values: &[Value]) -> DType {
    if values.is_empty() {
        return DType::Object;
    }
    if values.iter().all(|v| matches!(v, Value::Bool(_))) {
        return DType::Bool;
    }
    if values.iter().all(|v| matches!(v, Value::Int(_))) {
        return DType::Int64;
    }
    if values
        .iter()
        .all(|v| matches!(v, Value::Int(_) | Value::Float(_)))
    {
        return DType::Float64;
    }
    if let Some(Value::Scalar(first)) = values.first()
        && values
            .iter()
            .all(|v| matches!(v, Value::Scalar(s) if s.dtype() == first.dtype()))
    {
        return first.dtype();
    }
    DType::Object
}

/// The default index: integer labels `0..len`.
fn range_index(len: usize) -> Vec<Value> {
    (0..len as i64).map(Value::Int).collect()
}

/// A one-dimensional labelled column.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Optional series name.
    name:   Option<String>,
    /// Element dtype.
    dtype:  DType,
    /// Row labels, one per value.
    index:  Vec<Value>,
    /// The values.
    values: Vec<Value>,
}

impl Series {
    /// Creates an unnamed series with a range index and an inferred dtype.
    pub fn new(values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        Self {
            name: None,
            dtype: infer_dtype(&values),
            index: range_index(values.len()),
            values,
        }
    }

    /// Returns the series with the given name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Returns the series with an explicit dtype.
    pub fn with_dtype(mut self, dtype: DType) -> Self {
        self.dtype = dtype;
        self
    }

    /// Returns the series with explicit row labels.
    pub fn with_index(
        mut self,
        index: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Result<Self, ValueError> {
        let index: Vec<Value> = index.into_iter().map(Into::into).collect();
        if index.len() != self.values.len() {
            return Err(ValueError::Shape(format!(
                "Length of values ({}) does not match length of index ({})",
                self.values.len(),
                index.len()
            )));
        }
        self.index = index;
        Ok(self)
    }

    /// Returns the name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the dtype.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the row labels.
    pub fn index(&self) -> &[Value] {
        &self.index
    }

    /// Returns the values.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the rows at `positions`, in that order, keeping their labels.
    /// Positions past the end are skipped.
    pub fn take(&self, positions: &[usize]) -> Series {
        let (index, values) = positions
            .iter()
            .filter_map(|&p| Some((self.index.get(p)?.clone(), self.values.get(p)?.clone())))
            .unzip();
        Series {
            name: self.name.clone(),
            dtype: self.dtype,
            index,
            values,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if the series has no rows.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "Series([], dtype: {})", self.dtype);
        }

        let labels: Vec<String> = self.index.iter().map(ToString::to_string).collect();
        let values: Vec<String> = self.values.iter().map(ToString::to_string).collect();
        let label_width = labels.iter().map(String::len).max().unwrap_or(0);
        let value_width = values.iter().map(String::len).max().unwrap_or(0);

        for (label, value) in labels.iter().zip(&values) {
            writeln!(f, "{label:<label_width$}    {value:>value_width$}")?;
        }
        match &self.name {
            Some(name) => write!(f, "Name: {name}, dtype: {}", self.dtype),
            None => write!(f, "dtype: {}", self.dtype),
        }
    }
}

/// A table of named columns sharing one row index.
#[derive(Debug, Clone, PartialEq)]
pub struct DataFrame {
    /// Row labels.
    index:   Vec<Value>,
    /// Columns in display order; each is named after its label.
    columns: Vec<Series>,
}

impl DataFrame {
    /// Creates a frame from `(label, values)` pairs with a range index.
    pub fn new<S, V>(columns: impl IntoIterator<Item = (S, Vec<V>)>) -> Result<Self, ValueError>
    where
        S: Into<String>,
        V: Into<Value>,
    {
        let columns: Vec<Series> = columns
            .into_iter()
            .map(|(name, values)| Series::new(values).with_name(name))
            .collect();

        let rows = columns.first().map_or(0, Series::len);
        if let Some(bad) = columns.iter().find(|c| c.len() != rows) {
            return Err(ValueError::Shape(format!(
                "column {:?} has {} rows but the frame has {rows}",
                bad.name().unwrap_or_default(),
                bad.len()
            )));
        }
        if let Some(dup) = columns.iter().map(Series::name).duplicates().next() {
            return Err(ValueError::Shape(format!(
                "duplicate column label {:?}",
                dup.unwrap_or_default()
            )));
        }

        Ok(Self {
            index: range_index(rows),
            columns,
        })
    }

    /// Returns the frame with explicit row labels.
    pub fn with_index(
        mut self,
        index: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Result<Self, ValueError> {
        let index: Vec<Value> = index.into_iter().map(Into::into).collect();
        if index.len() != self.index.len() {
            return Err(ValueError::Shape(format!(
                "Length mismatch: Expected axis has {} elements, new values have {} elements",
                self.index.len(),
                index.len()
            )));
        }
        for column in &mut self.columns {
            column.index = index.clone();
        }
        self.index = index;
        Ok(self)
    }

    /// Returns `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.columns.len())
    }

    /// Returns the row labels.
    pub fn index(&self) -> &[Value] {
        &self.index
    }

    /// Returns the columns in display order.
    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    /// Returns the column labels in display order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns
            .iter()
            .map(|c| c.name().unwrap_or_default())
            .collect()
    }

    /// Looks up a column by label.
    pub fn column(&self, name: &str) -> Option<&Series> {
        self.columns.iter().find(|c| c.name() == Some(name))
    }
}

impl fmt::Display for DataFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() || self.index.is_empty() {
            let names: Vec<Value> = self.column_names().into_iter().map(Value::from).collect();
            return write!(
                f,
                "Empty DataFrame\nColumns: {}\nIndex: {}",
                list_repr(&names),
                list_repr(&self.index)
            );
        }

        let mut builder = Builder::default();
        builder.push_record(
            std::iter::once(String::new()).chain(self.column_names().into_iter().map(String::from)),
        );
        for (row, label) in self.index.iter().enumerate() {
            builder.push_record(
                std::iter::once(label.to_string())
                    .chain(self.columns.iter().map(|c| c.values[row].to_string())),
            );
        }

        let mut table = builder.build();
        table.with(Style::blank());
        write!(f, "{table}")
    }
}
