//! Template source parser
//!
//! Line-oriented, indentation-nested. Produces the node tree consumed by the
//! HTML renderer; `include` lines become [`Node::Include`] placeholders that
//! the compiler front end expands against the filesystem.

use std::path::Path;

use crate::error::{PugError, PugResult};

/// One parsed template node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// `doctype html`
    Doctype(String),
    /// An element, possibly with shorthand id/classes and children
    Tag(Tag),
    /// Escaped text (`| text` or inline tag text)
    Text(String),
    /// Unescaped text spliced from a non-template include
    RawText(String),
    /// Buffered comment (`// text`), emitted as an HTML comment
    Comment(String),
    /// `include path` placeholder, resolved by the compiler front end
    Include { spec: String, line: usize },
    /// `block name`; substitution point for layout wrapping
    Block { name: String, children: Vec<Node> },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tag {
    pub name: String,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attrs: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<Node>,
}

struct Line<'a> {
    indent: usize,
    content: &'a str,
    number: usize,
}

/// Parse a template source into its node tree.
pub fn parse(source: &str, file: &Path) -> PugResult<Vec<Node>> {
    let lines: Vec<Line> = source
        .lines()
        .enumerate()
        .filter_map(|(i, raw)| {
            let content = raw.trim_start();
            if content.is_empty() {
                return None;
            }
            Some(Line {
                indent: raw.len() - content.len(),
                content: content.trim_end(),
                number: i + 1,
            })
        })
        .collect();

    let mut pos = 0;
    let nodes = parse_siblings(&lines, &mut pos, 0, file)?;
    debug_assert_eq!(pos, lines.len());
    Ok(nodes)
}

/// Parse consecutive lines at exactly `indent`, recursing into deeper lines
/// as children of the node that precedes them.
fn parse_siblings(
    lines: &[Line],
    pos: &mut usize,
    indent: usize,
    file: &Path,
) -> PugResult<Vec<Node>> {
    let mut nodes = Vec::new();
    while *pos < lines.len() {
        let line = &lines[*pos];
        if line.indent < indent {
            break;
        }
        if line.indent > indent {
            return Err(PugError::Syntax {
                file: file.to_path_buf(),
                line: line.number,
                message: "unexpected indentation".to_string(),
            });
        }
        *pos += 1;

        // Unbuffered comment: swallow the line and anything nested under it.
        if line.content.starts_with("//-") {
            skip_deeper(lines, pos, indent);
            continue;
        }

        let mut node = parse_line(line, file)?;
        if *pos < lines.len() && lines[*pos].indent > indent {
            let child_indent = lines[*pos].indent;
            match &mut node {
                Node::Tag(tag) => {
                    tag.children = parse_siblings(lines, pos, child_indent, file)?;
                }
                Node::Block { children, .. } => {
                    *children = parse_siblings(lines, pos, child_indent, file)?;
                }
                Node::Comment(text) => {
                    // Nested lines join the comment body verbatim.
                    while *pos < lines.len() && lines[*pos].indent > indent {
                        text.push('\n');
                        text.push_str(lines[*pos].content);
                        *pos += 1;
                    }
                }
                _ => {
                    return Err(PugError::Syntax {
                        file: file.to_path_buf(),
                        line: lines[*pos].number,
                        message: format!("line {} cannot have children", line.number),
                    });
                }
            }
        }
        nodes.push(node);
    }
    Ok(nodes)
}

fn skip_deeper(lines: &[Line], pos: &mut usize, indent: usize) {
    while *pos < lines.len() && lines[*pos].indent > indent {
        *pos += 1;
    }
}

fn parse_line(line: &Line, file: &Path) -> PugResult<Node> {
    let content = line.content;

    if let Some(text) = content.strip_prefix('|') {
        return Ok(Node::Text(text.strip_prefix(' ').unwrap_or(text).to_string()));
    }
    if let Some(text) = content.strip_prefix("//") {
        return Ok(Node::Comment(text.trim_start().to_string()));
    }
    if content == "doctype" {
        return Ok(Node::Doctype("html".to_string()));
    }
    if let Some(value) = content.strip_prefix("doctype ") {
        return Ok(Node::Doctype(value.trim().to_string()));
    }
    if let Some(spec) = content.strip_prefix("include ") {
        return Ok(Node::Include {
            spec: spec.trim().to_string(),
            line: line.number,
        });
    }
    if content == "block" || content.starts_with("block ") {
        let name = content["block".len()..].trim();
        return Ok(Node::Block {
            name: if name.is_empty() {
                "content".to_string()
            } else {
                name.to_string()
            },
            children: Vec::new(),
        });
    }

    parse_tag(content, line.number, file).map(Node::Tag)
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

fn take_while(s: &str, pred: impl Fn(char) -> bool) -> (&str, &str) {
    let end = s
        .char_indices()
        .find(|&(_, c)| !pred(c))
        .map(|(i, _)| i)
        .unwrap_or(s.len());
    (&s[..end], &s[end..])
}

fn parse_tag(content: &str, number: usize, file: &Path) -> PugResult<Tag> {
    let syntax = |message: String| PugError::Syntax {
        file: file.to_path_buf(),
        line: number,
        message,
    };

    let (name, mut rest) = take_while(content, is_name_char);
    let mut tag = Tag {
        // Leading `.class` or `#id` implies a div.
        name: if name.is_empty() { "div".to_string() } else { name.to_string() },
        ..Tag::default()
    };
    if name.is_empty() && !rest.starts_with('.') && !rest.starts_with('#') {
        return Err(syntax(format!("unexpected text {content:?}")));
    }

    loop {
        if let Some(after) = rest.strip_prefix('.') {
            let (class, tail) = take_while(after, is_name_char);
            if class.is_empty() {
                return Err(syntax("expected class name after '.'".to_string()));
            }
            tag.classes.push(class.to_string());
            rest = tail;
        } else if let Some(after) = rest.strip_prefix('#') {
            let (id, tail) = take_while(after, is_name_char);
            if id.is_empty() {
                return Err(syntax("expected id after '#'".to_string()));
            }
            tag.id = Some(id.to_string());
            rest = tail;
        } else {
            break;
        }
    }

    if let Some(after) = rest.strip_prefix('(') {
        let close = after
            .find(')')
            .ok_or_else(|| syntax("unterminated attribute list".to_string()))?;
        tag.attrs = parse_attrs(&after[..close]).map_err(syntax)?;
        rest = &after[close + 1..];
    }

    match rest.strip_prefix(' ') {
        Some(text) if !text.is_empty() => tag.text = Some(text.to_string()),
        _ if rest.is_empty() => {}
        _ => return Err(syntax(format!("unexpected text {rest:?}"))),
    }
    Ok(tag)
}

/// Attribute list body: `key="value"` pairs separated by commas or spaces;
/// a bare key is a boolean attribute.
fn parse_attrs(body: &str) -> Result<Vec<(String, String)>, String> {
    let mut attrs = Vec::new();
    let mut rest = body.trim_start();
    while !rest.is_empty() {
        let (key, tail) = take_while(rest, |c| is_name_char(c) || c == ':');
        if key.is_empty() {
            return Err(format!("expected attribute name at {rest:?}"));
        }
        rest = tail.trim_start();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            let quote = after
                .chars()
                .next()
                .filter(|&c| c == '"' || c == '\'')
                .ok_or_else(|| format!("expected quoted value for attribute {key}"))?;
            let value_end = after[1..]
                .find(quote)
                .ok_or_else(|| format!("unterminated value for attribute {key}"))?;
            attrs.push((key.to_string(), after[1..1 + value_end].to_string()));
            rest = &after[value_end + 2..];
        } else {
            attrs.push((key.to_string(), key.to_string()));
        }
        rest = rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace());
    }
    Ok(attrs)
}
