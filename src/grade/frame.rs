#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Row- and index-aware equality for series and frames.

use std::{borrow::Cow, cmp::Ordering};

use itertools::Itertools;
use thiserror::Error;

use crate::{
    tabular::{DataFrame, Series, infer_dtype},
    value::{Value, format_float, list_repr},
};

/// Options understood by a tabular comparator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TabularOptions {
    /// Compare dtypes.
    pub check_dtype: bool,
    /// Compare series names.
    pub check_names: bool,
    /// Compare row labels.
    pub check_index: bool,
    /// Compare float values exactly instead of within `rtol`/`atol`.
    pub check_exact: bool,
    /// Relative tolerance.
    pub rtol:        f64,
    /// Absolute tolerance.
    pub atol:        f64,
    /// Ignore column order in frames.
    pub check_like:  bool,
}

impl Default for TabularOptions {
    fn default() -> Self {
        Self {
            check_dtype: true,
            check_names: true,
            check_index: true,
            check_exact: false,
            rtol:        1e-5,
            atol:        1e-8,
            check_like:  false,
        }
    }
}

/// A mismatch reported by a tabular comparator. The message is shown to the
/// student unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{message}")]
pub struct TabularMismatch {
    /// The object (variable) being compared.
    obj:     String,
    /// The comparator's diagnostic.
    message: String,
}

impl TabularMismatch {
    /// Creates a mismatch for `obj`.
    pub fn new(obj: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            obj:     obj.into(),
            message: message.into(),
        }
    }

    /// The object (variable) being compared.
    pub fn obj(&self) -> &str {
        &self.obj
    }

    /// The comparator's diagnostic.
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Equality assertions for tabular values.
pub trait TabularComparator: Send + Sync {
    /// Returns an error describing the first difference between two series.
    fn assert_series_equal(
        &self,
        left: &Series,
        right: &Series,
        obj: &str,
        options: &TabularOptions,
    ) -> Result<(), TabularMismatch>;

    /// Returns an error describing the first difference between two frames.
    fn assert_frame_equal(
        &self,
        left: &DataFrame,
        right: &DataFrame,
        obj: &str,
        options: &TabularOptions,
    ) -> Result<(), TabularMismatch>;
}

/// Comparator reproducing the tabular library's own assertion messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct PandasStyleComparator;

/// Rounds a percentage the way the library prints it.
fn percent(diff: usize, total: usize) -> String {
    let pct = diff as f64 * 100.0 / total.max(1) as f64;
    format_float((pct * 1e5).round() / 1e5)
}

/// True if two cells are equal under `options`.
fn cells_match(left: &Value, right: &Value, options: &TabularOptions) -> bool {
    if left.is_missing() && right.is_missing() {
        return true;
    }
    if !options.check_exact
        && let (Some(l), Some(r)) = (left.as_number(), right.as_number())
        && (l.is_float() || r.is_float())
    {
        let (l, r) = (l.as_f64(), r.as_f64());
        if l.is_infinite() || r.is_infinite() {
            return l == r;
        }
        return (l - r).abs() <= options.atol + options.rtol * r.abs();
    }
    left == right
}

/// Compares two label sequences of equal length.
fn labels_mismatch(
    obj: &str,
    what: &str,
    left: &[Value],
    right: &[Value],
) -> Option<TabularMismatch> {
    let diff = left.iter().zip(right).filter(|(l, r)| l != r).count();
    if diff == 0 && left.len() == right.len() {
        return None;
    }

    let total = left.len().max(right.len());
    let diff = diff + total - left.len().min(right.len());
    Some(TabularMismatch::new(
        obj,
        format!(
            "{obj}.{what} are different\n\n{obj}.{what} values are different ({} %)\n[left]:  \
             Index({}, dtype='{}')\n[right]: Index({}, dtype='{}')",
            percent(diff, total),
            list_repr(left),
            infer_dtype(left),
            list_repr(right),
            infer_dtype(right)
        ),
    ))
}

/// Total order on labels: numbers first by value, then everything else by
/// its repr.
fn label_order(a: &Value, b: &Value) -> Ordering {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => x.as_f64().total_cmp(&y.as_f64()),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.repr().cmp(&b.repr()),
    }
}

/// Labels sorted with [`label_order`].
fn sorted_labels(labels: &[Value]) -> Vec<Value> {
    labels.iter().cloned().sorted_by(label_order).collect()
}

/// Formats an optional series name.
fn name_repr(name: Option<&str>) -> String {
    Value::from(name).repr()
}

impl TabularComparator for PandasStyleComparator {
    fn assert_series_equal(
        &self,
        left: &Series,
        right: &Series,
        obj: &str,
        options: &TabularOptions,
    ) -> Result<(), TabularMismatch> {
        if left.len() != right.len() {
            return Err(TabularMismatch::new(
                obj,
                format!(
                    "{obj} are different\n\n{obj} length are different\n[left]:  {}, {}\n[right]: \
                     {}, {}",
                    left.len(),
                    list_repr(left.index()),
                    right.len(),
                    list_repr(right.index())
                ),
            ));
        }

        if options.check_dtype && left.dtype() != right.dtype() {
            return Err(TabularMismatch::new(
                obj,
                format!(
                    "Attributes of {obj} are different\n\nAttribute \"dtype\" are \
                     different\n[left]:  {}\n[right]: {}",
                    left.dtype(),
                    right.dtype()
                ),
            ));
        }

        if options.check_names && left.name() != right.name() {
            return Err(TabularMismatch::new(
                obj,
                format!(
                    "Attributes of {obj} are different\n\nAttribute \"name\" are \
                     different\n[left]:  {}\n[right]: {}",
                    name_repr(left.name()),
                    name_repr(right.name())
                ),
            ));
        }

        if options.check_index
            && let Some(mismatch) = labels_mismatch(obj, "index", left.index(), right.index())
        {
            return Err(mismatch);
        }

        let differing = left
            .values()
            .iter()
            .zip(right.values())
            .positions(|(l, r)| !cells_match(l, r, options))
            .collect_vec();
        if differing.is_empty() {
            return Ok(());
        }

        let pick = |items: &[Value]| -> Vec<Value> {
            differing.iter().map(|&i| items[i].clone()).collect()
        };
        Err(TabularMismatch::new(
            obj,
            format!(
                "{obj} values are different ({} %)\n[index]: {}\n[left]:  {}\n[right]: {}",
                percent(differing.len(), left.len()),
                list_repr(&pick(right.index())),
                list_repr(&pick(left.values())),
                list_repr(&pick(right.values()))
            ),
        ))
    }

    fn assert_frame_equal(
        &self,
        left: &DataFrame,
        right: &DataFrame,
        obj: &str,
        options: &TabularOptions,
    ) -> Result<(), TabularMismatch> {
        if left.shape() != right.shape() {
            let (lr, lc) = left.shape();
            let (rr, rc) = right.shape();
            return Err(TabularMismatch::new(
                obj,
                format!(
                    "{obj} are different\n\n{obj} shape mismatch\n[left]:  ({lr}, {lc})\n[right]: \
                     ({rr}, {rc})"
                ),
            ));
        }

        let mut left_names = left.column_names();
        let mut right_names = right.column_names();
        if options.check_like {
            left_names.sort_unstable();
            right_names.sort_unstable();
        }
        let as_labels = |names: &[&str]| -> Vec<Value> {
            names.iter().map(|&n| Value::from(n)).collect()
        };
        if let Some(mismatch) =
            labels_mismatch(obj, "columns", &as_labels(&left_names), &as_labels(&right_names))
        {
            return Err(mismatch);
        }

        if options.check_index {
            let mismatch = if options.check_like {
                labels_mismatch(
                    obj,
                    "index",
                    &sorted_labels(left.index()),
                    &sorted_labels(right.index()),
                )
            } else {
                labels_mismatch(obj, "index", left.index(), right.index())
            };
            if let Some(mismatch) = mismatch {
                return Err(mismatch);
            }
        }

        // Under `check_like`, rows of `left` are taken in the order of
        // `right`'s labels. If any label is missing, rows stay positional.
        let row_order: Option<Vec<usize>> = if options.check_like {
            right
                .index()
                .iter()
                .map(|label| left.index().iter().position(|l| l == label))
                .collect()
        } else {
            None
        };

        for (position, expected) in right.columns().iter().enumerate() {
            let label = expected.name().unwrap_or_default();
            let found = if options.check_like {
                left.column(label)
            } else {
                left.columns().get(position)
            };
            let Some(found) = found else {
                continue;
            };
            let found = match &row_order {
                Some(order) => Cow::Owned(found.take(order)),
                None => Cow::Borrowed(found),
            };

            let column_obj = format!("{obj}.iloc[:, {position}] (column name=\"{label}\")");
            self.assert_series_equal(&found, expected, &column_obj, options)
                .map_err(|e| TabularMismatch::new(obj, e.message))?;
        }

        Ok(())
    }
}
