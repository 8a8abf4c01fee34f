//! Incremental notebook builder.
//!
//! Cells are appended in order with [`NotebookComposer::add`] and the whole
//! document is serialized once by [`NotebookComposer::finalize`]. Finalizing
//! again returns the cached text, and adding after that is an error.

use crate::error::{NotebookError, Result};
use crate::models::*;

/// How a cell should be rendered: its type, kernel and output visibility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellOptions {
    pub cell_type: CellType,
    pub kernel: String,
    pub show_output: bool,
}

impl Default for CellOptions {
    fn default() -> Self {
        Self {
            cell_type: CellType::Markdown,
            kernel: DEFAULT_KERNEL.to_string(),
            show_output: true,
        }
    }
}

impl CellOptions {
    pub fn markdown() -> Self {
        Self::default()
    }

    pub fn code() -> Self {
        Self {
            cell_type: CellType::Code,
            ..Self::default()
        }
    }

    pub fn kernel(mut self, kernel: impl Into<String>) -> Self {
        self.kernel = kernel.into();
        self
    }

    /// Keep the cell's output out of the rendered report.
    pub fn hidden(mut self) -> Self {
        self.show_output = false;
        self
    }
}

#[derive(Debug, Default)]
pub struct NotebookComposer {
    cells: Vec<Cell>,
    finalized: Option<String>,
}

impl NotebookComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a cell built from `content`.
    ///
    /// Content is trimmed and split into lines. Blank content is rejected with
    /// [`NotebookError::EmptyCell`], and any add after [`finalize`](Self::finalize)
    /// with [`NotebookError::AlreadyFinalized`].
    pub fn add(&mut self, content: &str, options: CellOptions) -> Result<()> {
        if self.finalized.is_some() {
            return Err(NotebookError::AlreadyFinalized);
        }

        let cell = Cell::new(
            content,
            options.cell_type,
            options.kernel,
            options.show_output,
        )
        .ok_or(NotebookError::EmptyCell)?;

        self.cells.push(cell);
        Ok(())
    }

    pub fn add_markdown(&mut self, content: &str) -> Result<()> {
        self.add(content, CellOptions::markdown())
    }

    pub fn add_code(&mut self, content: &str) -> Result<()> {
        self.add(content, CellOptions::code())
    }

    /// Serialize the document. The first call renders and caches the text;
    /// later calls return the same text unchanged.
    pub fn finalize(&mut self) -> Result<String> {
        if let Some(ref text) = self.finalized {
            return Ok(text.clone());
        }

        let notebook = Notebook::new(self.cells.iter().map(NotebookCell::from).collect());
        let text = to_notebook_json(&notebook)?;
        tracing::debug!("Finalized notebook with {} cells", self.cells.len());

        self.finalized = Some(text.clone());
        Ok(text)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.is_some()
    }
}
