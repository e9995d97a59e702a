//! Template compiler
//!
//! `compile` takes one source text plus options and produces a [`Compiled`]
//! template: the expanded node tree and the list of file paths read while
//! expanding it (includes and layouts). That dependency list is what watch
//! mode feeds into the registry so edits to any transitively included file
//! re-trigger the owning entry point.

pub mod html;
pub mod parse;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PugError, PugResult};
use crate::matter;
use crate::options::CompileOptions;
use crate::paths::normalize;
use parse::Node;

/// A compiled template plus every file it read transitively.
#[derive(Debug, Clone)]
pub struct Compiled {
    nodes: Vec<Node>,
    pub dependencies: Vec<PathBuf>,
}

impl Compiled {
    /// Document mode: the final rendered markup.
    pub fn render(&self, opts: &CompileOptions) -> String {
        html::render_html(&self.nodes, opts)
    }

    /// Client mode: the serialized template-generator source.
    pub fn client_source(&self, opts: &CompileOptions) -> String {
        html::client_source(&self.nodes, opts)
    }
}

/// Compile `source`, resolving includes relative to `opts.filename`.
pub fn compile(source: &str, opts: &CompileOptions) -> PugResult<Compiled> {
    let file = opts
        .filename
        .clone()
        .unwrap_or_else(|| PathBuf::from("<stdin>"));

    let page = matter::extract(source, &file)?;
    let mut dependencies = Vec::new();
    let mut visiting = vec![normalize(&file)];

    let nodes = parse::parse(&page.body, &file)?;
    let mut nodes = expand_includes(nodes, &file, opts, &mut dependencies, &mut visiting)?;

    if let Some(layout) = &page.layout {
        nodes = wrap_in_layout(nodes, layout, &file, opts, &mut dependencies, &mut visiting)?;
    }

    Ok(Compiled {
        nodes,
        dependencies,
    })
}

fn is_template_path(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("pug") | Some("jade")
    )
}

/// Replace every `include` placeholder with the parsed-and-expanded content
/// of its target, recording each target as a dependency. Non-template targets
/// are spliced in verbatim.
fn expand_includes(
    nodes: Vec<Node>,
    file: &Path,
    opts: &CompileOptions,
    dependencies: &mut Vec<PathBuf>,
    visiting: &mut Vec<PathBuf>,
) -> PugResult<Vec<Node>> {
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        match node {
            Node::Include { spec, line } => {
                let resolved = resolve_include(&spec, file, line, opts)?;
                let key = normalize(&resolved);
                if visiting.contains(&key) {
                    return Err(PugError::CircularInclude {
                        file: file.to_path_buf(),
                        line,
                        include: resolved,
                    });
                }
                if !dependencies.contains(&resolved) {
                    dependencies.push(resolved.clone());
                }
                let text = fs::read_to_string(&resolved).map_err(|e| PugError::Read {
                    path: resolved.clone(),
                    source: e,
                })?;
                if is_template_path(&resolved) {
                    visiting.push(key);
                    let sub = parse::parse(&text, &resolved)?;
                    let sub = expand_includes(sub, &resolved, opts, dependencies, visiting)?;
                    visiting.pop();
                    out.extend(sub);
                } else {
                    out.push(Node::RawText(text.trim_end().to_string()));
                }
            }
            Node::Tag(mut tag) => {
                tag.children =
                    expand_includes(tag.children, file, opts, dependencies, visiting)?;
                out.push(Node::Tag(tag));
            }
            Node::Block { name, children } => {
                let children = expand_includes(children, file, opts, dependencies, visiting)?;
                out.push(Node::Block { name, children });
            }
            other => out.push(other),
        }
    }
    Ok(out)
}

fn resolve_include(
    spec: &str,
    file: &Path,
    line: usize,
    opts: &CompileOptions,
) -> PugResult<PathBuf> {
    let candidate = if let Some(rooted) = spec.strip_prefix('/') {
        let Some(basedir) = &opts.basedir else {
            return Err(PugError::MissingBasedir {
                file: file.to_path_buf(),
                line,
            });
        };
        basedir.join(rooted)
    } else {
        file.parent().unwrap_or(Path::new(".")).join(spec)
    };

    if candidate.extension().is_some() {
        if candidate.exists() {
            return Ok(candidate);
        }
    } else {
        for ext in ["pug", "jade"] {
            let with_ext = candidate.with_extension(ext);
            if with_ext.exists() {
                return Ok(with_ext);
            }
        }
        if candidate.exists() {
            return Ok(candidate);
        }
    }
    Err(PugError::IncludeNotFound {
        file: file.to_path_buf(),
        line,
        include: candidate,
    })
}

/// Load the layout named by front matter and splice the page's nodes into its
/// `block content`. Falls back to appending when the layout has no block.
fn wrap_in_layout(
    page_nodes: Vec<Node>,
    layout: &str,
    file: &Path,
    opts: &CompileOptions,
    dependencies: &mut Vec<PathBuf>,
    visiting: &mut Vec<PathBuf>,
) -> PugResult<Vec<Node>> {
    let dir = opts
        .includes
        .clone()
        .unwrap_or_else(|| file.parent().unwrap_or(Path::new(".")).to_path_buf());
    let candidate = dir.join(layout);
    let resolved = if candidate.extension().is_some() && candidate.exists() {
        candidate
    } else {
        ["pug", "jade"]
            .iter()
            .map(|ext| candidate.with_extension(ext))
            .find(|p| p.exists())
            .ok_or_else(|| PugError::LayoutNotFound {
                file: file.to_path_buf(),
                layout: candidate.clone(),
            })?
    };

    if !dependencies.contains(&resolved) {
        dependencies.push(resolved.clone());
    }
    let text = fs::read_to_string(&resolved).map_err(|e| PugError::Read {
        path: resolved.clone(),
        source: e,
    })?;
    let nodes = parse::parse(&text, &resolved)?;
    visiting.push(normalize(&resolved));
    let mut nodes = expand_includes(nodes, &resolved, opts, dependencies, visiting)?;
    visiting.pop();

    let mut replacement = Some(page_nodes);
    substitute_block(&mut nodes, "content", &mut replacement);
    if let Some(leftover) = replacement.take() {
        nodes.extend(leftover);
    }
    Ok(nodes)
}

fn substitute_block(nodes: &mut [Node], target: &str, replacement: &mut Option<Vec<Node>>) {
    for node in nodes.iter_mut() {
        if replacement.is_none() {
            return;
        }
        match node {
            Node::Block { name, children } if name == target => {
                *children = replacement.take().unwrap_or_default();
                return;
            }
            Node::Block { children, .. } => substitute_block(children, target, replacement),
            Node::Tag(tag) => substitute_block(&mut tag.children, target, replacement),
            _ => {}
        }
    }
}
