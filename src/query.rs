//! Query result notebook.
//!
//! The result workbook holds one sheet per query, plus a merged sheet first
//! when there is more than one query. Each query gets a section showing its
//! SQL text and a preview of its sheet.

use std::path::{Path, PathBuf};

use crate::composer::{CellOptions, NotebookComposer};
use crate::error::{NotebookError, Result};
use crate::templates::{preview, py_str, title_cell, DEFAULT_LIMIT};
use crate::writer::{expand_home, write_notebook, Executor};

pub const DEFAULT_TITLE: &str = "Query Results";

#[derive(Debug, Clone)]
pub struct QueryOptions {
    pub title: String,
    pub description: Vec<String>,
    /// Kernel to switch to after the previews, e.g. `R` or `Python3`.
    pub language: Option<String>,
    /// Script files inlined as cells in `language` after the switch.
    pub addons: Vec<PathBuf>,
    pub limit: i64,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            description: Vec::new(),
            language: None,
            addons: Vec::new(),
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Compose the notebook for the query workbook at `source`.
///
/// Every add-on path is checked before anything is composed; the first
/// missing one fails with [`NotebookError::MissingAddon`].
pub fn compose_query(source: &Path, queries: &[String], options: &QueryOptions) -> Result<String> {
    let addons = resolve_addons(&options.addons)?;
    let mut nb = NotebookComposer::new();

    nb.add_markdown(&title_cell(&options.title, source, &options.description))?;
    nb.add(&setup_code(source), CellOptions::code().hidden())?;

    let merged = queries.len() > 1;
    if merged {
        nb.add_markdown("## Merged")?;
        nb.add_code(&preview("info[0]", options.limit))?;
    }

    for (i, query) in queries.iter().enumerate() {
        let sheet = if merged { i + 1 } else { 0 };
        if merged {
            nb.add_markdown(&format!("## Pipeline {}", i + 1))?;
        } else {
            nb.add_markdown("## Merged")?;
        }
        nb.add(
            &format!("```sql\n{}\n```", query),
            CellOptions::markdown().hidden(),
        )?;
        nb.add_code(&preview(&format!("info[{}]", sheet), options.limit))?;
    }

    match options.language.as_deref() {
        Some(language) => {
            nb.add(
                &language_switch(language, source),
                CellOptions::code().hidden(),
            )?;
            for (path, script) in &addons {
                if script.trim().is_empty() {
                    tracing::warn!("Skipping empty add-on {}", path.display());
                    continue;
                }
                tracing::debug!("Inlining add-on {}", path.display());
                nb.add(script, CellOptions::code().kernel(language).hidden())?;
            }
        }
        None if !addons.is_empty() => {
            tracing::warn!(
                "Ignoring {} add-on file(s) because no language was given",
                addons.len()
            );
        }
        None => {}
    }

    nb.finalize()
}

/// Build the query notebook and write it to `output`. Nothing is written
/// if composing fails.
pub fn write_query_notebook(
    source: &Path,
    queries: &[String],
    output: &Path,
    options: &QueryOptions,
    executor: Option<&dyn Executor>,
) -> Result<()> {
    let text = compose_query(&expand_home(source), queries, options)?;
    write_notebook(&text, output, executor)
}

/// Expand and read every add-on script, failing on the first missing file.
fn resolve_addons(addons: &[PathBuf]) -> Result<Vec<(PathBuf, String)>> {
    let paths: Vec<PathBuf> = addons.iter().map(|p| expand_home(p)).collect();
    if let Some(missing) = paths.iter().find(|p| !p.is_file()) {
        return Err(NotebookError::MissingAddon(missing.clone()));
    }

    paths
        .into_iter()
        .map(|path| {
            let script = std::fs::read_to_string(&path)?;
            Ok((path, script))
        })
        .collect()
}

/// Code loading every sheet of the workbook into `info`.
fn setup_code(source: &Path) -> String {
    format!(
        "import pandas as pd\nxls = pd.ExcelFile({})\ninfo = [xls.parse(x) for x in xls.sheet_names]",
        py_str(&source.to_string_lossy())
    )
}

fn language_switch(language: &str, source: &Path) -> String {
    if language == "R" {
        format!(
            "%use R\ninfo <- readxl::read_excel({})",
            py_str(&source.to_string_lossy())
        )
    } else {
        format!("%use {}\n%get info", language)
    }
}
