//! Text shared by the summary and query notebooks.

use std::path::Path;

/// Default row limit for preview directives. Negative means no limit.
pub const DEFAULT_LIMIT: i64 = -1;

/// Introductory text placed under the notebook title.
pub fn home_doc(source: &Path, description: &[String]) -> String {
    let name = source
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();

    format!(
        "\nThis page displays contents of database `{0}.db` generated by [this DSC]({0}.html).\n\n{1}\n",
        name,
        description.join("\n\n")
    )
}

pub fn title_cell(title: &str, source: &Path, description: &[String]) -> String {
    format!("# {}\n{}", title, home_doc(source, description))
}

/// SoS magic that renders `expr` as a data preview.
pub fn preview(expr: &str, limit: i64) -> String {
    format!("%preview -n {} --limit {}", expr, limit)
}

/// Quote `s` as a single-quoted Python string literal.
pub fn py_str(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_ascii_control() => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}

pub fn bullet_list<I, S>(items: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| format!("* {}", item.as_ref()))
        .collect::<Vec<_>>()
        .join("\n")
}
