//! Notebook domain models.
//!
//! # Core Concepts
//!
//! - [`Cell`]: One unit of notebook content as the composer sees it: cell type,
//!   source lines, kernel label and whether its output should be reported.
//! - [`Tag`]: Report tag derived from a cell's type and output visibility.
//!   Never stored, always computed when the cell is serialized.
//! - [`Notebook`]: The nbformat 4.2 document written to disk, including the
//!   fixed SoS kernel metadata block.

mod cell;
mod notebook;

pub use cell::*;
pub use notebook::*;
