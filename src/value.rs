#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Values exposed by an executed notebook.
//!
//! A notebook namespace holds arbitrary objects; the checker only needs to
//! tell a closed set of kinds apart, print them the way the notebook would,
//! and compare them with the notebook language's equality rules.

use std::{collections::BTreeMap, fmt};

use itertools::Itertools;
use serde_json::Value as Json;
use thiserror::Error;

use crate::tabular::{DataFrame, Series};

/// Errors raised while building values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueError {
    /// A tagged JSON object used a `$type` this crate does not know.
    #[error("unknown value tag `{0}`")]
    UnknownTag(String),
    /// A dtype name could not be recognised.
    #[error("unknown dtype `{0}`")]
    UnknownDType(String),
    /// A tagged JSON object is missing a required field.
    #[error("`{tag}` value is missing the `{field}` field")]
    MissingField {
        /// The `$type` of the object.
        tag:   String,
        /// The missing field.
        field: &'static str,
    },
    /// Index, values or columns have incompatible lengths.
    #[error("{0}")]
    Shape(String),
    /// The scalar payload does not fit the requested dtype.
    #[error("a {dtype} scalar cannot hold {value}")]
    InvalidScalar {
        /// The requested dtype.
        dtype: DType,
        /// The offending payload, rendered.
        value: String,
    },
}

/// Element types known to the numeric and tabular libraries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// Boolean.
    Bool,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit float.
    Float32,
    /// 64-bit float.
    Float64,
    /// Arbitrary objects (strings, mixed columns).
    Object,
}

impl DType {
    /// Returns the dtype name as the libraries print it.
    pub fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::UInt8 => "uint8",
            DType::UInt16 => "uint16",
            DType::UInt32 => "uint32",
            DType::UInt64 => "uint64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Object => "object",
        }
    }

    /// Parses a dtype name. Accepts the scalar spelling `bool_` as well.
    pub fn parse(name: &str) -> Result<Self, ValueError> {
        let dtype = match name.trim().trim_start_matches("numpy.") {
            "bool" | "bool_" => DType::Bool,
            "int8" => DType::Int8,
            "int16" => DType::Int16,
            "int32" => DType::Int32,
            "int64" => DType::Int64,
            "uint8" => DType::UInt8,
            "uint16" => DType::UInt16,
            "uint32" => DType::UInt32,
            "uint64" => DType::UInt64,
            "float32" => DType::Float32,
            "float64" => DType::Float64,
            "object" => DType::Object,
            _ => return Err(ValueError::UnknownDType(name.to_string())),
        };
        Ok(dtype)
    }

    /// True for the floating point dtypes.
    pub fn is_float(self) -> bool {
        matches!(self, DType::Float32 | DType::Float64)
    }

    /// True for the signed and unsigned integer dtypes.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            DType::Int8
                | DType::Int16
                | DType::Int32
                | DType::Int64
                | DType::UInt8
                | DType::UInt16
                | DType::UInt32
                | DType::UInt64
        )
    }

    /// Name of the boxed scalar class for this dtype, without module.
    fn scalar_class(self) -> &'static str {
        match self {
            DType::Bool => "bool_",
            other => other.name(),
        }
    }

    /// Fully qualified name of the boxed scalar class for this dtype.
    fn scalar_qualified(self) -> &'static str {
        match self {
            DType::Bool => "numpy.bool_",
            DType::Int8 => "numpy.int8",
            DType::Int16 => "numpy.int16",
            DType::Int32 => "numpy.int32",
            DType::Int64 => "numpy.int64",
            DType::UInt8 => "numpy.uint8",
            DType::UInt16 => "numpy.uint16",
            DType::UInt32 => "numpy.uint32",
            DType::UInt64 => "numpy.uint64",
            DType::Float32 => "numpy.float32",
            DType::Float64 => "numpy.float64",
            DType::Object => "numpy.object_",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A numeric payload shared by native numbers and boxed scalars.
#[derive(Debug, Clone, Copy)]
pub enum Number {
    /// Boolean, which counts as the integers 0 and 1.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Floating point.
    Float(f64),
}

impl Number {
    /// Widens the number to `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Number::Bool(b) => f64::from(u8::from(b)),
            Number::Int(i) => i as f64,
            Number::Float(x) => x,
        }
    }

    /// True if this is a float payload.
    pub fn is_float(self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// Equality across number kinds: `1 == 1.0 == True`, `nan != nan`.
    pub fn loose_eq(self, other: Number) -> bool {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a == b,
            (Number::Bool(a), Number::Bool(b)) => a == b,
            (Number::Float(a), Number::Float(b)) => a == b,
            (Number::Float(x), n) | (n, Number::Float(x)) => int_eq_float(n.as_i64(), x),
            (a, b) => a.as_i64() == b.as_i64(),
        }
    }

    /// The integer value of a bool or int payload; floats truncate.
    fn as_i64(self) -> i64 {
        match self {
            Number::Bool(b) => i64::from(b),
            Number::Int(i) => i,
            Number::Float(x) => x as i64,
        }
    }
}

/// Exact int/float equality, without rounding the int through `f64`.
fn int_eq_float(i: i64, x: f64) -> bool {
    // 2^63 is exactly representable; anything at or above it overflows i64.
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    x.fract() == 0.0 && (-LIMIT..LIMIT).contains(&x) && x as i64 == i
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Bool(true) => f.write_str("True"),
            Number::Bool(false) => f.write_str("False"),
            Number::Int(i) => write!(f, "{i}"),
            Number::Float(x) => f.write_str(&format_float(*x)),
        }
    }
}

/// A boxed scalar from the numeric library, e.g. an `int64` read out of an
/// array. It compares equal to the native number with the same value.
#[derive(Debug, Clone, Copy)]
pub struct NumericScalar {
    /// The scalar's dtype.
    dtype: DType,
    /// The scalar's value, normalized to the dtype's kind.
    value: Number,
}

impl NumericScalar {
    /// Creates a scalar, coercing integers into float dtypes and rejecting
    /// payloads the dtype cannot represent.
    pub fn new(dtype: DType, value: Number) -> Result<Self, ValueError> {
        let value = match (dtype, value) {
            (DType::Bool, Number::Bool(b)) => Number::Bool(b),
            (d, Number::Int(i)) if d.is_integer() => Number::Int(i),
            (d, n) if d.is_float() => Number::Float(n.as_f64()),
            (dtype, value) => {
                return Err(ValueError::InvalidScalar {
                    dtype,
                    value: value.to_string(),
                });
            }
        };
        Ok(Self { dtype, value })
    }

    /// An `int64` scalar.
    pub fn int64(value: i64) -> Self {
        Self {
            dtype: DType::Int64,
            value: Number::Int(value),
        }
    }

    /// A `float64` scalar.
    pub fn float64(value: f64) -> Self {
        Self {
            dtype: DType::Float64,
            value: Number::Float(value),
        }
    }

    /// A boolean scalar.
    pub fn bool_(value: bool) -> Self {
        Self {
            dtype: DType::Bool,
            value: Number::Bool(value),
        }
    }

    /// Returns the dtype.
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Returns the value.
    pub fn value(&self) -> Number {
        self.value
    }
}

/// A value bound to a notebook variable.
#[derive(Debug, Clone)]
pub enum Value {
    /// The `None` singleton.
    None,
    /// A native boolean.
    Bool(bool),
    /// A native integer.
    Int(i64),
    /// A native float.
    Float(f64),
    /// A string.
    Str(String),
    /// A boxed numeric-library scalar.
    Scalar(NumericScalar),
    /// A list.
    List(Vec<Value>),
    /// A tuple.
    Tuple(Vec<Value>),
    /// A string-keyed dictionary.
    Dict(BTreeMap<String, Value>),
    /// A labelled one-dimensional column.
    Series(Series),
    /// A table of labelled columns.
    Frame(DataFrame),
}

impl Value {
    /// Short class name, e.g. `int`, `int64`, `Series`.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::Scalar(s) => s.dtype.scalar_class(),
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Series(_) => "Series",
            Value::Frame(_) => "DataFrame",
        }
    }

    /// Fully qualified class name, e.g. `numpy.int64`,
    /// `pandas.core.series.Series`.
    pub fn qualified_type_name(&self) -> &'static str {
        match self {
            Value::Scalar(s) => s.dtype.scalar_qualified(),
            Value::Series(_) => "pandas.core.series.Series",
            Value::Frame(_) => "pandas.core.frame.DataFrame",
            other => other.type_name(),
        }
    }

    /// True for boxed numeric-library scalars.
    pub fn is_numeric_scalar(&self) -> bool {
        matches!(self, Value::Scalar(_))
    }

    /// True for native floats and float-dtype scalars.
    pub fn is_float(&self) -> bool {
        match self {
            Value::Float(_) => true,
            Value::Scalar(s) => s.dtype.is_float(),
            _ => false,
        }
    }

    /// Returns the numeric payload of booleans, numbers and scalars.
    pub fn as_number(&self) -> Option<Number> {
        match self {
            Value::Bool(b) => Some(Number::Bool(*b)),
            Value::Int(i) => Some(Number::Int(*i)),
            Value::Float(x) => Some(Number::Float(*x)),
            Value::Scalar(s) => Some(s.value),
            _ => None,
        }
    }

    /// True for float NaN and for `None`, which tabular columns treat as a
    /// missing value.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::None => true,
            other => other.as_number().is_some_and(|n| n.as_f64().is_nan()),
        }
    }

    /// Instance-of test against the class of `expected`. Booleans are
    /// integers; every other kind must match exactly.
    pub fn is_instance_of(&self, expected: &Value) -> bool {
        match (self, expected) {
            (Value::Bool(_), Value::Int(_)) => true,
            (Value::Scalar(a), Value::Scalar(b)) => a.dtype == b.dtype,
            (a, b) => std::mem::discriminant(a) == std::mem::discriminant(b),
        }
    }

    /// Renders the value the way it appears inside a container.
    pub fn repr(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Bool(b) => Number::Bool(*b).to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(x) => format_float(*x),
            Value::Str(s) => quote(s),
            Value::Scalar(s) => s.value.to_string(),
            Value::List(items) => list_repr(items),
            Value::Tuple(items) if items.len() == 1 => format!("({},)", items[0].repr()),
            Value::Tuple(items) => format!("({})", items.iter().map(Value::repr).join(", ")),
            Value::Dict(map) => format!(
                "{{{}}}",
                map.iter()
                    .map(|(k, v)| format!("{}: {}", quote(k), v.repr()))
                    .join(", ")
            ),
            Value::Series(s) => s.to_string(),
            Value::Frame(df) => df.to_string(),
        }
    }

    /// Builds a value from JSON. Objects carrying a `$type` key encode the
    /// kinds plain JSON cannot express (tuples, scalars, series, frames).
    pub fn from_json(json: &Json) -> Result<Value, ValueError> {
        let value = match json {
            Json::Null => Value::None,
            Json::Bool(b) => Value::Bool(*b),
            Json::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Json::String(s) => Value::Str(s.clone()),
            Json::Array(items) => Value::List(values_from_json(items)?),
            Json::Object(map) => match map.get("$type") {
                Some(Json::String(tag)) => tagged_from_json(tag, map)?,
                Some(other) => return Err(ValueError::UnknownTag(other.to_string())),
                None => Value::Dict(
                    map.iter()
                        .map(|(k, v)| Ok((k.clone(), Value::from_json(v)?)))
                        .collect::<Result<_, ValueError>>()?,
                ),
            },
        };
        Ok(value)
    }
}

/// Converts a JSON array into values.
fn values_from_json(items: &[Json]) -> Result<Vec<Value>, ValueError> {
    items.iter().map(Value::from_json).collect()
}

/// Looks up a required field of a tagged object.
fn field<'a>(
    tag: &str,
    map: &'a serde_json::Map<String, Json>,
    name: &'static str,
) -> Result<&'a Json, ValueError> {
    map.get(name).ok_or_else(|| ValueError::MissingField {
        tag:   tag.to_string(),
        field: name,
    })
}

/// Looks up a required array field of a tagged object.
fn array_field(
    tag: &str,
    map: &serde_json::Map<String, Json>,
    name: &'static str,
) -> Result<Vec<Value>, ValueError> {
    match field(tag, map, name)? {
        Json::Array(items) => values_from_json(items),
        other => Err(ValueError::Shape(format!("`{tag}.{name}` must be an array, got {other}"))),
    }
}

/// Decodes a `$type`-tagged JSON object.
fn tagged_from_json(tag: &str, map: &serde_json::Map<String, Json>) -> Result<Value, ValueError> {
    match tag {
        "tuple" => Ok(Value::Tuple(array_field(tag, map, "items")?)),
        "numpy" => {
            let dtype = match field(tag, map, "dtype")? {
                Json::String(s) => DType::parse(s)?,
                other => return Err(ValueError::UnknownDType(other.to_string())),
            };
            let raw = field(tag, map, "value")?;
            let number = Value::from_json(raw)?
                .as_number()
                .ok_or_else(|| ValueError::InvalidScalar {
                    dtype,
                    value: raw.to_string(),
                })?;
            Ok(Value::Scalar(NumericScalar::new(dtype, number)?))
        }
        "series" => {
            let values = array_field(tag, map, "values")?;
            let mut series = Series::new(values);
            if let Some(Json::String(name)) = map.get("name") {
                series = series.with_name(name.clone());
            }
            if let Some(Json::String(dtype)) = map.get("dtype") {
                series = series.with_dtype(DType::parse(dtype)?);
            }
            if map.contains_key("index") {
                series = series.with_index(array_field(tag, map, "index")?)?;
            }
            Ok(Value::Series(series))
        }
        "frame" => {
            let columns = match field(tag, map, "columns")? {
                Json::Object(cols) => cols
                    .iter()
                    .map(|(name, col)| match col {
                        Json::Array(items) => Ok((name.clone(), values_from_json(items)?)),
                        other => Err(ValueError::Shape(format!(
                            "column `{name}` must be an array, got {other}"
                        ))),
                    })
                    .collect::<Result<Vec<_>, _>>()?,
                other => {
                    return Err(ValueError::Shape(format!(
                        "`frame.columns` must be an object, got {other}"
                    )));
                }
            };
            let mut frame = DataFrame::new(columns)?;
            if map.contains_key("index") {
                frame = frame.with_index(array_field(tag, map, "index")?)?;
            }
            Ok(Value::Frame(frame))
        }
        other => Err(ValueError::UnknownTag(other.to_string())),
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        if let (Some(a), Some(b)) = (self.as_number(), other.as_number()) {
            return a.loose_eq(b);
        }
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => a == b,
            (Value::Series(a), Value::Series(b)) => a == b,
            (Value::Frame(a), Value::Frame(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            other => f.write_str(&other.repr()),
        }
    }
}

/// Formats a float with the notebook's shortest round-trip spelling.
pub fn format_float(x: f64) -> String {
    if x.is_nan() {
        "nan".to_string()
    } else if x.is_infinite() {
        String::from(if x > 0.0 { "inf" } else { "-inf" })
    } else if x != 0.0 && (x.abs() < 1e-4 || x.abs() >= 1e16) {
        exponent_form(x)
    } else if x == x.trunc() {
        format!("{x:.1}")
    } else {
        format!("{x}")
    }
}

/// Scientific notation with a signed, two-digit exponent: `1e-07`, `1.5e+20`.
fn exponent_form(x: f64) -> String {
    let raw = format!("{x:e}");
    match raw.split_once('e') {
        Some((mantissa, exp)) => {
            let (sign, digits) = match exp.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exp),
            };
            format!("{mantissa}e{sign}{digits:0>2}")
        }
        None => raw,
    }
}

/// Renders a slice as a list literal.
pub fn list_repr(items: &[Value]) -> String {
    format!("[{}]", items.iter().map(Value::repr).join(", "))
}

/// Quotes a string the way the notebook's `repr` does.
fn quote(s: &str) -> String {
    let escaped = s
        .replace('\\', "\\\\")
        .replace('\n', "\\n")
        .replace('\t', "\\t");
    if escaped.contains('\'') && !escaped.contains('"') {
        format!("\"{escaped}\"")
    } else {
        format!("'{}'", escaped.replace('\'', "\\'"))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<NumericScalar> for Value {
    fn from(value: NumericScalar) -> Self {
        Value::Scalar(value)
    }
}

impl From<Series> for Value {
    fn from(value: Series) -> Self {
        Value::Series(value)
    }
}

impl From<DataFrame> for Value {
    fn from(value: DataFrame) -> Self {
        Value::Frame(value)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::None, Into::into)
    }
}
