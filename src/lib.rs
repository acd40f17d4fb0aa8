//! # nbcheck
//!
//! Answer checks for autograding data-science notebooks. A student's executed
//! notebook and the reference solution each expose their variables through a
//! [`notebook::Namespace`]; for every expected variable the crate generates an
//! independent case that checks the variable exists, has the right type, and
//! holds the right value, with diagnostics written for the student.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Checker configuration read from the environment
pub mod config;
/// For all things related to checking answers
pub mod grade;
/// Namespaces and the cells that populate them
pub mod notebook;
/// Series and data frames
pub mod tabular;
/// The values notebook variables can hold
pub mod value;

use anyhow::{Context, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, util::SubscriberInitExt};

pub use grade::{
    AnswerChecker, CheckFailure, CheckOutcome, CompareOptions, ExpectedVars, Suite, SuiteReport,
    TestCase,
};
pub use notebook::{MapNamespace, Namespace};
pub use value::Value;

/// Installs the global tracing subscriber. The level comes from `RUST_LOG`
/// and defaults to `info`.
pub fn init_tracing() -> Result<()> {
    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_target(false);
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .try_init()
        .context("A global tracing subscriber is already installed")
}
