//! Jupyter notebook summaries for DSC result databases.
//!
//! [`NotebookComposer`] assembles markdown and code cells into an nbformat 4.2
//! document for the SoS kernel. The [`summary`] and [`query`] modules build
//! complete notebooks on top of it, and [`writer`] persists them, optionally
//! executing them first.

pub mod composer;
pub mod config;
pub mod error;
pub mod models;
pub mod query;
pub mod store;
pub mod summary;
pub mod templates;
pub mod writer;

pub use composer::{CellOptions, NotebookComposer};
pub use error::{NotebookError, Result};
pub use store::Store;
