use serde::{Deserialize, Serialize};

/// Kernel label used for cells that do not name one.
pub const DEFAULT_KERNEL: &str = "SoS";

/// The kind of a notebook cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    #[default]
    Markdown,
    Code,
}

impl CellType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "markdown",
            Self::Code => "code",
        }
    }
}

/// Report tag attached to a cell's metadata.
///
/// - `ReportOutput`: a code cell whose output belongs in the report
/// - `HideOutput`: a markdown cell hidden from the report
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tag {
    ReportOutput,
    HideOutput,
}

impl Tag {
    /// Derive the tag for a cell. Only two of the four combinations carry one.
    pub fn for_cell(cell_type: CellType, show_output: bool) -> Option<Self> {
        match (cell_type, show_output) {
            (CellType::Code, true) => Some(Self::ReportOutput),
            (CellType::Markdown, false) => Some(Self::HideOutput),
            (CellType::Code, false) | (CellType::Markdown, true) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReportOutput => "report_output",
            Self::HideOutput => "hide_output",
        }
    }
}

/// A cell accumulated by the composer.
///
/// `source` is never empty. Every line but the last keeps its `\n` terminator,
/// matching the list-of-lines form nbformat uses for multi-line sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub cell_type: CellType,
    pub source: Vec<String>,
    pub kernel: String,
    pub show_output: bool,
}

impl Cell {
    /// Build a cell from raw content. Returns `None` when the content is
    /// empty once surrounding whitespace is trimmed.
    pub fn new(
        content: &str,
        cell_type: CellType,
        kernel: impl Into<String>,
        show_output: bool,
    ) -> Option<Self> {
        let source = split_source(content)?;
        Some(Self {
            cell_type,
            source,
            kernel: kernel.into(),
            show_output,
        })
    }

    pub fn tag(&self) -> Option<Tag> {
        Tag::for_cell(self.cell_type, self.show_output)
    }

    /// The source lines joined back into a single string.
    pub fn text(&self) -> String {
        self.source.concat()
    }
}

/// Trim `content` and split it into terminated lines, the last one bare.
pub fn split_source(content: &str) -> Option<Vec<String>> {
    let trimmed = content.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut lines: Vec<String> = trimmed.lines().map(|line| format!("{}\n", line)).collect();
    if let Some(last) = lines.last_mut() {
        last.pop();
    }
    Some(lines)
}
