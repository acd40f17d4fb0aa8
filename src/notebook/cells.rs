#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use anyhow::{Context, Result};
use itertools::Itertools;
use serde::Serialize;

use super::namespace::MapNamespace;

/// One executable code cell of a notebook.
pub trait Cell: Send + Sync {
    /// The cell's source code.
    fn source(&self) -> &str;

    /// Executes the cell against `namespace`.
    fn run(&self, namespace: &mut MapNamespace) -> Result<()>;
}

/// A cell whose behaviour is a closure.
pub struct FnCell<F> {
    /// The cell's source code, kept for error reports.
    source: String,
    /// What running the cell does.
    body:   F,
}

impl<F> FnCell<F>
where
    F: Fn(&mut MapNamespace) -> Result<()> + Send + Sync,
{
    /// Creates a cell from its source and behaviour.
    pub fn new(source: impl Into<String>, body: F) -> Self {
        Self {
            source: source.into(),
            body,
        }
    }

    /// Boxes the cell for use in a cell list.
    pub fn boxed(self) -> Box<dyn Cell>
    where
        F: 'static,
    {
        Box::new(self)
    }
}

impl<F> Cell for FnCell<F>
where
    F: Fn(&mut MapNamespace) -> Result<()> + Send + Sync,
{
    fn source(&self) -> &str {
        &self.source
    }

    fn run(&self, namespace: &mut MapNamespace) -> Result<()> {
        (self.body)(namespace)
    }
}

/// Looks up the cells of a notebook by assignment or file identifier.
pub trait NotebookProvider {
    /// Returns the code cells of notebook `id`, in execution order.
    fn cells(&self, id: &str) -> Result<Vec<Box<dyn Cell>>>;
}

/// A cell that raised while running.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellFailure {
    /// Zero-based position of the cell.
    index:  usize,
    /// The cell's source code.
    source: String,
    /// The error the cell raised.
    error:  String,
}

impl CellFailure {
    /// Zero-based position of the cell.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The cell's source code.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The error the cell raised.
    pub fn error(&self) -> &str {
        &self.error
    }
}

/// The namespace left behind after running a notebook, plus the cells that
/// failed along the way.
#[derive(Debug, Clone, Default)]
pub struct LoadedNotebook {
    /// Variables bound by the cells that ran.
    namespace:    MapNamespace,
    /// Cells that raised, in execution order.
    failed_cells: Vec<CellFailure>,
}

impl LoadedNotebook {
    /// Variables bound by the cells that ran.
    pub fn namespace(&self) -> &MapNamespace {
        &self.namespace
    }

    /// Consumes the notebook, returning its namespace.
    pub fn into_namespace(self) -> MapNamespace {
        self.namespace
    }

    /// Cells that raised, in execution order.
    pub fn failed_cells(&self) -> &[CellFailure] {
        &self.failed_cells
    }

    /// Student-facing report listing the source of every failing cell, or
    /// `None` when all cells ran.
    pub fn error_cells_report(&self) -> Option<String> {
        if self.failed_cells.is_empty() {
            return None;
        }

        let separator = format!("{}\n", "-".repeat(50));
        let error_cells = self.failed_cells.iter().map(|c| c.source.as_str()).join(&separator);

        Some(format!(
            "\nISSUE FOUND: Some of your cells didn't have valid code,\neither because of a \
             mistake in this code or because of an\nearlier error that this code relies \
             on.\n\nYou should re-run all the Code cells in your notebook to\nhelp you debug \
             the issue. Here is the problematic code,\neach cell separated by a line of \
             hyphens:\n\n{error_cells}\n"
        ))
    }
}

/// Runs `cells` in order against a fresh namespace. A failing cell is
/// recorded and execution continues with the next one, so later cells can
/// still bind their variables.
pub fn run_cells(cells: &[Box<dyn Cell>]) -> LoadedNotebook {
    let mut loaded = LoadedNotebook::default();

    for (index, cell) in cells.iter().enumerate() {
        if let Err(e) = cell.run(&mut loaded.namespace) {
            tracing::warn!("Cell {index} raised: {e:#}");
            loaded.failed_cells.push(CellFailure {
                index,
                source: cell.source().to_string(),
                error: format!("{e:#}"),
            });
        }
    }

    tracing::debug!(
        "Ran {} cells, {} failed, {} variables bound",
        cells.len(),
        loaded.failed_cells.len(),
        loaded.namespace.len()
    );
    loaded
}

/// Fetches notebook `id` from `provider` and runs every cell, suppressing
/// cell errors. Only a failure to fetch the notebook is an error.
pub fn load_code(provider: &dyn NotebookProvider, id: &str) -> Result<LoadedNotebook> {
    let cells = provider
        .cells(id)
        .with_context(|| format!("Could not load the cells of notebook `{id}`"))?;
    Ok(run_cells(&cells))
}
