use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Cell, Tag};
use crate::error::{NotebookError, Result};

pub const NBFORMAT: u32 = 4;
pub const NBFORMAT_MINOR: u32 = 2;

/// An nbformat 4 notebook document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notebook {
    pub cells: Vec<NotebookCell>,
    pub metadata: NotebookMetadata,
    pub nbformat: u32,
    pub nbformat_minor: u32,
}

impl Notebook {
    /// Wrap serialized cells with the fixed SoS document footer.
    pub fn new(cells: Vec<NotebookCell>) -> Self {
        Self {
            cells,
            metadata: NotebookMetadata::sos(),
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
        }
    }
}

/// A cell as it appears in the notebook JSON.
///
/// Code cells carry an empty `outputs` list and a null `execution_count` to
/// mark them as not yet executed. Markdown cells have neither field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "cell_type", rename_all = "snake_case")]
pub enum NotebookCell {
    Markdown {
        metadata: CellMetadata,
        source: Vec<String>,
    },
    Code {
        execution_count: Option<u32>,
        metadata: CellMetadata,
        outputs: Vec<Value>,
        source: Vec<String>,
    },
}

impl NotebookCell {
    pub fn source(&self) -> &[String] {
        match self {
            Self::Markdown { source, .. } | Self::Code { source, .. } => source,
        }
    }
}

impl From<&Cell> for NotebookCell {
    fn from(cell: &Cell) -> Self {
        let metadata = CellMetadata {
            collapsed: false,
            kernel: cell.kernel.clone(),
            scrolled: true,
            tags: cell.tag().into_iter().collect(),
        };
        let source = cell.source.clone();

        match cell.cell_type {
            super::CellType::Markdown => Self::Markdown { metadata, source },
            super::CellType::Code => Self::Code {
                execution_count: None,
                metadata,
                outputs: Vec::new(),
                source,
            },
        }
    }
}

/// Per-cell metadata understood by the SoS notebook frontend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CellMetadata {
    pub collapsed: bool,
    pub kernel: String,
    pub scrolled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotebookMetadata {
    pub kernelspec: KernelSpec,
    pub language_info: LanguageInfo,
    pub sos: SosMetadata,
}

impl NotebookMetadata {
    pub fn sos() -> Self {
        Self {
            kernelspec: KernelSpec {
                display_name: "SoS".to_string(),
                language: "sos".to_string(),
                name: "sos".to_string(),
            },
            language_info: LanguageInfo {
                codemirror_mode: "sos".to_string(),
                file_extension: ".sos".to_string(),
                mimetype: "text/x-sos".to_string(),
                name: "sos".to_string(),
                nbconvert_exporter: "sos_notebook.converter.SoS_Exporter".to_string(),
                pygments_lexer: "sos".to_string(),
            },
            sos: SosMetadata {
                default_kernel: "SoS".to_string(),
                kernels: vec![
                    SosKernel::new("Python3", "python3", "Python3", "#FFE771"),
                    SosKernel::new("R", "ir", "R", "#DCDCDA"),
                    SosKernel::new("SoS", "sos", "", ""),
                ],
                panel: SosPanel {
                    displayed: true,
                    height: 0,
                    style: "side".to_string(),
                },
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct KernelSpec {
    pub display_name: String,
    pub language: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageInfo {
    pub codemirror_mode: String,
    pub file_extension: String,
    pub mimetype: String,
    pub name: String,
    pub nbconvert_exporter: String,
    pub pygments_lexer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SosMetadata {
    pub default_kernel: String,
    pub kernels: Vec<SosKernel>,
    pub panel: SosPanel,
}

/// One row of the SoS kernel table: name, kernel, language, color.
///
/// Serialized as a four element array, as the SoS frontend expects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SosKernel(pub String, pub String, pub String, pub String);

impl SosKernel {
    fn new(name: &str, kernel: &str, language: &str, color: &str) -> Self {
        Self(
            name.to_string(),
            kernel.to_string(),
            language.to_string(),
            color.to_string(),
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SosPanel {
    pub displayed: bool,
    pub height: u32,
    pub style: String,
}

/// Serialize with the one-space indentation nbformat uses on disk.
pub fn to_notebook_json<T: Serialize>(value: &T) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b" ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| NotebookError::InvalidNotebook(e.to_string()))
}
