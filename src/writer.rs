//! Persisting notebooks, optionally executing them first.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use serde_json::Value;

use crate::error::{NotebookError, Result};
use crate::models::{to_notebook_json, NBFORMAT};

/// Per-cell execution timeout, in seconds.
pub const EXECUTION_TIMEOUT_SECS: u64 = 600;
/// Kernel the execution engine starts.
pub const EXECUTION_KERNEL: &str = "SoS";

/// Runs a notebook and returns the executed document.
pub trait Executor {
    fn execute(&self, notebook: &str) -> Result<String>;
}

/// Executes notebooks with `jupyter nbconvert`, piping the document through
/// stdin and stdout.
#[derive(Debug, Clone)]
pub struct NbconvertExecutor {
    program: String,
    timeout_secs: u64,
    kernel_name: String,
}

impl NbconvertExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            timeout_secs: EXECUTION_TIMEOUT_SECS,
            kernel_name: EXECUTION_KERNEL.to_string(),
        }
    }

    /// Arguments passed to the jupyter program.
    pub fn args(&self) -> Vec<String> {
        vec![
            "nbconvert".to_string(),
            "--to".to_string(),
            "notebook".to_string(),
            "--execute".to_string(),
            "--stdin".to_string(),
            "--stdout".to_string(),
            format!("--ExecutePreprocessor.timeout={}", self.timeout_secs),
            format!("--ExecutePreprocessor.kernel_name={}", self.kernel_name),
        ]
    }
}

impl Default for NbconvertExecutor {
    fn default() -> Self {
        Self::new("jupyter")
    }
}

impl Executor for NbconvertExecutor {
    fn execute(&self, notebook: &str) -> Result<String> {
        tracing::info!(
            "Executing notebook with {} (kernel {}, timeout {}s)",
            self.program,
            self.kernel_name,
            self.timeout_secs
        );

        let mut child = Command::new(&self.program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                NotebookError::Execution(format!("failed to start {}: {}", self.program, e))
            })?;

        {
            let stdin = child
                .stdin
                .as_mut()
                .ok_or_else(|| NotebookError::Execution("stdin not captured".to_string()))?;
            stdin.write_all(notebook.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(NotebookError::Execution(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Validate `text` as an nbformat 4 notebook, run it through `executor` when
/// given, and write it to `output`.
pub fn write_notebook(text: &str, output: &Path, executor: Option<&dyn Executor>) -> Result<()> {
    validate(text)?;

    let document = match executor {
        Some(executor) => {
            let executed = executor.execute(text)?;
            validate(&executed)?
        }
        None => serde_json::from_str(text)?,
    };

    let output = expand_home(output);
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let mut rendered = to_notebook_json(&document)?;
    rendered.push('\n');
    std::fs::write(&output, rendered)?;

    tracing::info!("Wrote notebook to {}", output.display());
    Ok(())
}

fn validate(text: &str) -> Result<Value> {
    let value: Value = serde_json::from_str(text)?;

    match value.get("nbformat").and_then(Value::as_u64) {
        Some(version) if version == u64::from(NBFORMAT) => {}
        Some(version) => {
            return Err(NotebookError::InvalidNotebook(format!(
                "unsupported nbformat version {}",
                version
            )))
        }
        None => {
            return Err(NotebookError::InvalidNotebook(
                "missing nbformat version".to_string(),
            ))
        }
    }

    if !value.get("cells").map_or(false, Value::is_array) {
        return Err(NotebookError::InvalidNotebook(
            "missing cells array".to_string(),
        ));
    }

    Ok(value)
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };

    match dirs::home_dir() {
        Some(home) => home.join(rest),
        None => path.to_path_buf(),
    }
}
