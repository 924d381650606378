//! Output formatters for CLI commands.
//!
//! Command summaries and listings are rendered as JSON, plain text, or
//! colored human-readable output.

use anyhow::Result;
use colored::Colorize;
use embedfs_core::cli::OutputFormat;
use serde::Serialize;

/// Format data according to the specified output format.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Examples
///
/// ```
/// use embedfs_cli::formatters::format_output;
/// use embedfs_core::cli::OutputFormat;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Summary {
///     files: usize,
/// }
///
/// let output = format_output(&Summary { files: 3 }, OutputFormat::Json)?;
/// assert!(output.contains("\"files\": 3"));
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn format_output<T: Serialize>(data: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => json::format(data),
        OutputFormat::Text => text::format(data),
        OutputFormat::Pretty => pretty::format(data),
    }
}

/// JSON output formatting.
pub mod json {
    use super::{Result, Serialize};

    /// Format data as pretty-printed JSON.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(data)?)
    }
}

/// Plain text output formatting.
pub mod text {
    use super::{Result, Serialize};
    use serde_json::Value;

    /// Format data as `key: value` lines.
    ///
    /// Nested objects are flattened with dotted keys and array items are
    /// indexed, so the output stays greppable.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        let mut lines = Vec::new();
        flatten("", &value, &mut lines);
        Ok(lines.join("\n"))
    }

    fn flatten(prefix: &str, value: &Value, lines: &mut Vec<String>) {
        let key = |child: &str| {
            if prefix.is_empty() {
                child.to_string()
            } else {
                format!("{prefix}.{child}")
            }
        };

        match value {
            Value::Object(map) => {
                for (name, child) in map {
                    flatten(&key(name), child, lines);
                }
            }
            Value::Array(items) => {
                for (index, child) in items.iter().enumerate() {
                    flatten(&key(&index.to_string()), child, lines);
                }
            }
            Value::String(s) => lines.push(format!("{prefix}: {s}")),
            Value::Null => lines.push(format!("{prefix}: -")),
            other => lines.push(format!("{prefix}: {other}")),
        }
    }
}

/// Pretty (human-readable) output formatting.
pub mod pretty {
    use super::{Colorize, Result, Serialize};

    /// Format data as colorized, human-readable output.
    pub fn format<T: Serialize>(data: &T) -> Result<String> {
        let value = serde_json::to_value(data)?;
        Ok(format_value(&value, 0))
    }

    /// Recursively format a JSON value with colors and indentation.
    fn format_value(value: &serde_json::Value, indent: usize) -> String {
        use serde_json::Value;

        let indent_str = "  ".repeat(indent);
        let next_indent_str = "  ".repeat(indent + 1);

        match value {
            Value::Null => "null".dimmed().to_string(),
            Value::Bool(b) => b.to_string().yellow().to_string(),
            Value::Number(n) => n.to_string().cyan().to_string(),
            Value::String(s) => format!("\"{}\"", s.green()),
            Value::Array(arr) if arr.is_empty() => "[]".to_string(),
            Value::Array(arr) => {
                let items: Vec<String> = arr
                    .iter()
                    .map(|item| format!("{next_indent_str}{}", format_value(item, indent + 1)))
                    .collect();
                format!("[\n{}\n{indent_str}]", items.join(",\n"))
            }
            Value::Object(obj) if obj.is_empty() => "{}".to_string(),
            Value::Object(obj) => {
                let entries: Vec<String> = obj
                    .iter()
                    .map(|(key, val)| {
                        format!(
                            "{next_indent_str}\"{}\": {}",
                            key.blue().bold(),
                            format_value(val, indent + 1)
                        )
                    })
                    .collect();
                format!("{{\n{}\n{indent_str}}}", entries.join(",\n"))
            }
        }
    }
}
