#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Namespaces produced by executing notebooks, and the seam through which
//! notebooks are fetched and run.

/// Executable cells and the namespace provider.
pub mod cells;
/// Named-attribute containers.
pub mod namespace;

pub use cells::{Cell, CellFailure, FnCell, LoadedNotebook, NotebookProvider, load_code, run_cells};
pub use namespace::{MapNamespace, Namespace};
