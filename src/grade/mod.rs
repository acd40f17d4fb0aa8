#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Answer checks for notebook variables.

/// Presence, type and value checks.
pub mod checks;
/// Failure taxonomy and diagnostics.
pub mod error;
/// Series and frame comparison.
pub mod frame;
/// Per-variable comparison options.
pub mod options;
/// Case outcomes and suite reports.
pub mod results;
/// Ordered-sequence equality.
pub mod sequence;
/// Case generation and the in-process harness.
pub mod suite;

pub use checks::{AnswerChecker, assert_present, assert_type, missing_variables, types_conform};
pub use error::CheckFailure;
pub use frame::{PandasStyleComparator, TabularComparator, TabularMismatch, TabularOptions};
pub use options::{CompareOptions, ExpectedVars, Tolerance};
pub use results::{CaseResult, CaseStatus, CheckOutcome, SuiteReport};
pub use sequence::assert_list_equality;
pub use suite::{
    SharedNamespace, Suite, TestCase, make_answer_equality_test, make_code_cells_test,
    make_variable_names_test,
};
