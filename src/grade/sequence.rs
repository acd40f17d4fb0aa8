#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Equality for ordered sequences with diagnostics that stay readable for
//! long sequences.

use super::error::CheckFailure;
use crate::value::{Value, list_repr};

/// Checks that `found` equals `expected`, element by element.
///
/// * Different lengths fail straight away, reporting both lengths.
/// * Sequences shorter than `threshold` are compared whole and, on mismatch,
///   both are printed in full.
/// * Longer sequences are scanned from index 0 and only the first differing
///   index and its two elements are reported.
pub fn assert_list_equality(
    found: &[Value],
    expected: &[Value],
    name: &str,
    threshold: usize,
) -> Result<(), CheckFailure> {
    if found.len() != expected.len() {
        return Err(CheckFailure::LengthMismatch {
            name:     name.to_string(),
            found:    found.len(),
            expected: expected.len(),
        });
    }

    if expected.len() < threshold {
        if found == expected {
            return Ok(());
        }
        return Err(CheckFailure::ListMismatch {
            name:     name.to_string(),
            found:    list_repr(found),
            expected: list_repr(expected),
        });
    }

    match first_divergence(found, expected) {
        None => Ok(()),
        Some(index) => Err(CheckFailure::ElementMismatch {
            name: name.to_string(),
            index,
            found: found[index].to_string(),
            expected: expected[index].to_string(),
        }),
    }
}

/// Lowest index at which two equal-length sequences differ.
pub fn first_divergence(found: &[Value], expected: &[Value]) -> Option<usize> {
    found.iter().zip(expected).position(|(f, e)| f != e)
}
