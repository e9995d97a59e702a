//! Compile options and the `-O` parse cascade
//!
//! The `-O/--obj` argument is interpreted as, in order: a file to load, inline
//! JSON, inline YAML, and finally a loose JavaScript-style object literal.
//! The first interpretation that yields a mapping wins; when all fail the
//! accumulated diagnostics of every attempt are reported together.
//!
//! The resulting mapping is kept opaque (`serde_json::Map`) so a live reload
//! can merge new keys over old ones without dropping keys the reload omits;
//! [`CompileOptions`] is the typed view handed to the compiler.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{PugError, PugResult};

/// Recognized compile options. Unknown keys in the `-O` mapping are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CompileOptions {
    /// Path used to resolve relative includes
    pub filename: Option<PathBuf>,
    /// Emit debug metadata in client-mode output (disable for smaller functions)
    pub compile_debug: bool,
    /// Compile a client-side template function instead of rendering
    pub client: bool,
    /// Human-readable output formatting
    pub pretty: bool,
    /// Root directory for absolute-style includes
    pub basedir: Option<PathBuf>,
    /// Doctype fallback when the template does not declare one
    pub doctype: Option<String>,
    /// Explicit client-mode function name
    pub name: Option<String>,
    /// Directory holding front-matter layouts
    pub includes: Option<PathBuf>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            filename: None,
            compile_debug: true,
            client: false,
            pretty: false,
            basedir: None,
            doctype: None,
            name: None,
            includes: None,
        }
    }
}

impl CompileOptions {
    /// Build the typed view from the opaque option mapping.
    pub fn from_map(map: &Map<String, Value>) -> PugResult<Self> {
        serde_json::from_value(Value::Object(map.clone())).map_err(|e| PugError::Options {
            input: Value::Object(map.clone()).to_string(),
            attempts: e.to_string(),
        })
    }
}

/// Merge `incoming` over `current`: new keys overwrite, keys absent from
/// `incoming` retain their prior values.
pub fn merge(current: &mut Map<String, Value>, incoming: Map<String, Value>) {
    for (key, value) in incoming {
        current.insert(key, value);
    }
}

/// Parse the `-O` argument through the interpretation cascade.
pub fn parse_obj(input: &str) -> PugResult<Map<String, Value>> {
    let mut attempts = String::new();

    match fs::read_to_string(Path::new(input)) {
        Ok(contents) => match parse_inline(&contents) {
            Ok(map) => return Ok(map),
            Err(detail) => {
                attempts.push_str(&format!("file {input}:\n{detail}"));
            }
        },
        Err(e) => {
            attempts.push_str(&format!("file {input}: {e}\n"));
        }
    }

    match parse_inline(input) {
        Ok(map) => Ok(map),
        Err(detail) => {
            attempts.push_str(&detail);
            Err(PugError::Options {
                input: input.to_string(),
                attempts,
            })
        }
    }
}

/// Inline attempts: JSON, then YAML, then a loose object literal.
fn parse_inline(text: &str) -> Result<Map<String, Value>, String> {
    let mut detail = String::new();

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(_) => detail.push_str("JSON: not an object\n"),
        Err(e) => detail.push_str(&format!("JSON: {e}\n")),
    }

    match serde_yaml_ng::from_str::<Value>(text) {
        Ok(Value::Object(map)) => return Ok(map),
        Ok(_) => detail.push_str("YAML: not a mapping\n"),
        Err(e) => detail.push_str(&format!("YAML: {e}\n")),
    }

    let loosened = loosen(text);
    match serde_json::from_str::<Value>(&loosened) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => {
            detail.push_str("literal: not an object\n");
            Err(detail)
        }
        Err(e) => {
            detail.push_str(&format!("literal: {e}\n"));
            Err(detail)
        }
    }
}

/// Rewrite a JavaScript-style object literal into JSON: strips wrapping
/// parentheses, double-quotes bare keys, and converts single-quoted strings.
fn loosen(text: &str) -> String {
    let mut s = text.trim();
    while s.starts_with('(') && s.ends_with(')') {
        s = s[1..s.len() - 1].trim();
    }

    let mut out = String::with_capacity(s.len() + 8);
    let mut chars = s.char_indices().peekable();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => {
                out.push('"');
                for (_, c) in chars.by_ref() {
                    out.push(c);
                    if c == '"' {
                        break;
                    }
                }
            }
            '\'' => {
                out.push('"');
                let mut escaped = false;
                for (_, c) in chars.by_ref() {
                    if escaped {
                        if c != '\'' {
                            out.push('\\');
                        }
                        out.push(c);
                        escaped = false;
                    } else if c == '\\' {
                        escaped = true;
                    } else if c == '\'' {
                        break;
                    } else if c == '"' {
                        out.push_str("\\\"");
                    } else {
                        out.push(c);
                    }
                }
                out.push('"');
            }
            c if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
                let start = i;
                let mut end = i + c.len_utf8();
                while let Some(&(j, c)) = chars.peek() {
                    if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                        end = j + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
                let word = &s[start..end];
                let next_meaningful = s[end..].chars().find(|c| !c.is_whitespace());
                if next_meaningful == Some(':') && !matches!(word, "true" | "false" | "null") {
                    out.push('"');
                    out.push_str(word);
                    out.push('"');
                } else {
                    out.push_str(word);
                }
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_inline_json() {
        let map = parse_obj(r#"{"doctype": "html"}"#).unwrap();
        assert_eq!(map["doctype"], "html");
    }

    #[test]
    fn test_inline_yaml() {
        let map = parse_obj("doctype: html\npretty: true").unwrap();
        assert_eq!(map["doctype"], "html");
        assert_eq!(map["pretty"], true);
    }

    #[test]
    fn test_inline_js_literal() {
        let map = parse_obj("{doctype: 'html', pretty: true}").unwrap();
        assert_eq!(map["doctype"], "html");
        assert_eq!(map["pretty"], true);
    }

    #[test]
    fn test_parenthesized_literal() {
        let map = parse_obj("({name: 'fooTemplate'})").unwrap();
        assert_eq!(map["name"], "fooTemplate");
    }

    #[test]
    fn test_file_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("options.json");
        fs::write(&path, r#"{"doctype": "strict"}"#).unwrap();

        let map = parse_obj(path.to_str().unwrap()).unwrap();
        assert_eq!(map["doctype"], "strict");
    }

    #[test]
    fn test_file_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("options.yaml");
        fs::write(&path, "basedir: /srv/views\n").unwrap();

        let map = parse_obj(path.to_str().unwrap()).unwrap();
        assert_eq!(map["basedir"], "/srv/views");
    }

    #[test]
    fn test_all_attempts_fail_accumulates_diagnostics() {
        let err = parse_obj("{]").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("JSON:"), "missing JSON attempt: {msg}");
        assert!(msg.contains("YAML:"), "missing YAML attempt: {msg}");
        assert!(msg.contains("literal:"), "missing literal attempt: {msg}");
    }

    #[test]
    fn test_scalar_input_is_rejected() {
        // YAML would happily parse a bare word as a string scalar; the
        // cascade must insist on a mapping.
        assert!(parse_obj("just-a-word").is_err());
    }

    #[test]
    fn test_from_map_camel_case_keys() {
        let map = parse_obj(r#"{"compileDebug": false, "client": true}"#).unwrap();
        let opts = CompileOptions::from_map(&map).unwrap();
        assert!(!opts.compile_debug);
        assert!(opts.client);
    }

    #[test]
    fn test_from_map_ignores_unknown_keys() {
        let map = parse_obj(r#"{"doctype": "html", "somethingElse": 1}"#).unwrap();
        let opts = CompileOptions::from_map(&map).unwrap();
        assert_eq!(opts.doctype.as_deref(), Some("html"));
    }

    #[test]
    fn test_compile_debug_defaults_on() {
        assert!(CompileOptions::default().compile_debug);
    }

    #[test]
    fn test_merge_overwrites_and_retains() {
        let mut current = parse_obj(r#"{"doctype": "html", "pretty": true}"#).unwrap();
        let incoming = parse_obj(r#"{"doctype": "strict"}"#).unwrap();

        merge(&mut current, incoming);

        assert_eq!(current["doctype"], "strict");
        assert_eq!(current["pretty"], true);
    }
}
