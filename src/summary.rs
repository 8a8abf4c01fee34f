//! Database summary notebook.
//!
//! Lists every pipeline and module in a result store, then gives each one a
//! section with a preview cell that reads from the store at execution time.

use std::path::Path;

use crate::composer::{CellOptions, NotebookComposer};
use crate::error::Result;
use crate::store::{display_pipeline, Store};
use crate::templates::{bullet_list, preview, py_str, title_cell, DEFAULT_LIMIT};
use crate::writer::{expand_home, write_notebook, Executor};

pub const DEFAULT_TITLE: &str = "Database Summary";

#[derive(Debug, Clone)]
pub struct SummaryOptions {
    pub title: String,
    /// Paragraphs shown under the title.
    pub description: Vec<String>,
    /// Row limit for preview cells.
    pub limit: i64,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: Vec::new(),
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Compose the summary notebook for `store`, loaded from `source`.
pub fn compose_summary(store: &Store, source: &Path, options: &SummaryOptions) -> Result<String> {
    let pipelines = store.pipelines()?;
    let modules = store.modules();
    let mut nb = NotebookComposer::new();

    nb.add_markdown(&title_cell(&options.title, source, &options.description))?;

    let pipeline_names = pipelines
        .iter()
        .flat_map(|group| group.members.iter().map(|m| display_pipeline(m)));
    nb.add_markdown(&format!("Pipelines:\n\n{}", bullet_list(pipeline_names)))?;
    nb.add_markdown(&format!("Modules:\n\n{}", bullet_list(&modules)))?;

    nb.add(&setup_code(source), CellOptions::code().hidden())?;

    nb.add_markdown("## Pipelines")?;
    for group in &pipelines {
        for member in &group.members {
            nb.add_markdown(&format!("### pipeline ``{}``", display_pipeline(member)))?;
            let expr = format!("data[{}][{}]", py_str(&group.key), py_str(member));
            nb.add_code(&preview(&expr, options.limit))?;
        }
    }

    nb.add_markdown("## Modules")?;
    for module in &modules {
        nb.add_markdown(&format!("### module `{}`", module))?;
        let expr = format!("data[{}]", py_str(module));
        nb.add_code(&preview(&expr, options.limit))?;
    }

    tracing::debug!(
        "Composed summary of {} pipeline groups and {} modules",
        pipelines.len(),
        modules.len()
    );
    nb.finalize()
}

/// Build the summary notebook for the store at `source` and write it to
/// `output`. A pre-rendered HTML page in the store is written next to the
/// source file, only once the notebook itself has been written.
pub fn write_summary_notebook(
    source: &Path,
    output: &Path,
    options: &SummaryOptions,
    executor: Option<&dyn Executor>,
) -> Result<()> {
    let source = expand_home(source);
    let store = Store::load(&source)?;
    let text = compose_summary(&store, &source, options)?;

    write_notebook(&text, output, executor)?;

    if let Some(html) = store.html() {
        let html_path = source.with_extension("html");
        std::fs::write(&html_path, html)?;
        tracing::info!("Wrote HTML page to {}", html_path.display());
    }

    Ok(())
}

/// Code that reloads the store inside the notebook kernel.
fn setup_code(source: &Path) -> String {
    format!(
        "import json\nwith open({}) as f:\n    data = json.load(f)",
        py_str(&source.to_string_lossy())
    )
}
