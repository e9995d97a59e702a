//! Front matter extraction
//!
//! Template sources may open with a `---` fenced YAML block. The `layout` key
//! selects a layout template (resolved under the `includes` option directory)
//! that the page body is spliced into; everything else is carried as page
//! metadata.
//!
//! The returned body keeps the original line numbering by replacing the front
//! matter lines with blanks, so parser diagnostics still point at the right
//! line of the source file.

use std::path::Path;

use serde_yaml_ng::Value;

use crate::error::{PugError, PugResult};

/// A source file split into metadata and template body.
#[derive(Debug, Clone)]
pub struct Page {
    /// Parsed front matter, empty mapping when the file has none.
    pub data: Value,
    /// Layout template name from the `layout` key, if any.
    pub layout: Option<String>,
    /// Template body, line numbering preserved.
    pub body: String,
}

/// Split `source` into front matter and body.
pub fn extract(source: &str, file: &Path) -> PugResult<Page> {
    let Some(rest) = strip_fence(source) else {
        return Ok(Page {
            data: Value::Null,
            layout: None,
            body: source.to_string(),
        });
    };

    let mut yaml_lines = 0usize;
    let mut yaml = String::new();
    let mut body = None;
    for line in rest.lines() {
        if line.trim_end() == "---" {
            // Skip past the YAML block and this closing fence.
            body = Some(
                rest.lines()
                    .skip(yaml_lines + 1)
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
            break;
        }
        yaml.push_str(line);
        yaml.push('\n');
        yaml_lines += 1;
    }
    let Some(body) = body else {
        return Err(PugError::InvalidFrontmatter {
            file: file.to_path_buf(),
            message: "missing closing '---'".to_string(),
        });
    };

    let data: Value =
        serde_yaml_ng::from_str(&yaml).map_err(|e| PugError::InvalidFrontmatter {
            file: file.to_path_buf(),
            message: e.to_string(),
        })?;
    let layout = data
        .get("layout")
        .and_then(Value::as_str)
        .map(str::to_string);

    // Pad so body line numbers match the original file: one line for each
    // fence plus the YAML block itself.
    let padding = "\n".repeat(yaml_lines + 2);
    Ok(Page {
        data,
        layout,
        body: format!("{padding}{body}"),
    })
}

fn strip_fence(source: &str) -> Option<&str> {
    source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
}
