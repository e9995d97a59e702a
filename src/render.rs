//! Render dispatcher
//!
//! Decides what to do with one filesystem entry: compile it, skip it, or
//! recurse into it. Template sources are files ending in `.pug`/`.jade`
//! whose basename does not start with `_` and that sit under no `_`-prefixed
//! directory. Directory recursion pins the recursion root to the first
//! directory encountered, so nested output paths stay relative to the
//! directory the user named rather than their immediate parent.
//!
//! In watch mode the dispatcher also feeds the watch registry: the entry
//! file registers itself, and every dependency the compiler reports is
//! registered against it after a successful compile. Dependency sets may
//! change between compiles; registration is idempotent so unchanged graphs
//! stay quiet.

use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::compiler::compile;
use crate::console::Console;
use crate::emit::emit;
use crate::error::{PugError, PugResult};
use crate::options::CompileOptions;
use crate::paths::{output_extension, resolve_output};
use crate::watcher::WatchRegistry;

/// Render configuration that is CLI-owned rather than compiler-owned.
#[derive(Debug, Clone, Default)]
pub struct RenderSettings {
    /// Output root directory (`-o/--out`)
    pub out_dir: Option<PathBuf>,
    /// Output extension override (`-E/--extension`), may be empty
    pub extension: Option<String>,
    /// Derive client-mode function names from filenames
    pub name_after_file: bool,
}

pub struct Renderer {
    pub options: CompileOptions,
    pub settings: RenderSettings,
    pub console: Console,
}

impl Renderer {
    /// Render one path: a template file compiles, a directory recurses, and
    /// everything else is silently skipped. Pass a registry to enable watch
    /// registration; child errors are fatal without one and recovered with
    /// one (watch mode must outlive any single bad compile).
    pub fn render(
        &self,
        path: &Path,
        root: Option<&Path>,
        mut registry: Option<&mut WatchRegistry>,
    ) -> PugResult<()> {
        let metadata = fs::metadata(path).map_err(|e| PugError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        if metadata.is_file() {
            if is_source(path) && !is_ignored(path) {
                self.render_template(path, root, registry)?;
            }
            return Ok(());
        }

        if metadata.is_dir() {
            let mut children: Vec<PathBuf> = fs::read_dir(path)
                .map_err(|e| PugError::Read {
                    path: path.to_path_buf(),
                    source: e,
                })?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .collect();
            children.sort();

            let root = root.unwrap_or(path);
            for child in children {
                match registry.as_deref_mut() {
                    Some(reg) => self.try_render(&child, Some(root), Some(reg)),
                    None => self.render(&child, Some(root), None)?,
                }
            }
        }
        Ok(())
    }

    /// Fault-tolerant variant used by watch mode: any error is written to
    /// stderr and swallowed so the watch loop continues unaffected.
    pub fn try_render(
        &self,
        path: &Path,
        root: Option<&Path>,
        registry: Option<&mut WatchRegistry>,
    ) {
        if let Err(e) = self.render(path, root, registry) {
            eprintln!("{e}\u{7}");
        }
    }

    fn render_template(
        &self,
        path: &Path,
        root: Option<&Path>,
        mut registry: Option<&mut WatchRegistry>,
    ) -> PugResult<()> {
        // Self-registration: editing the entry file rebuilds it.
        if let Some(reg) = registry.as_deref_mut() {
            reg.register(path, None, root)?;
        }

        let mut opts = self.options.clone();
        opts.filename = Some(path.to_path_buf());
        if self.settings.name_after_file && opts.name.is_none() {
            opts.name = Some(template_name(path));
        }

        let source = fs::read_to_string(path).map_err(|e| PugError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let compiled = compile(&source, &opts)?;

        if let Some(reg) = registry.as_deref_mut() {
            for dep in &compiled.dependencies {
                reg.register(dep, Some(path), root)?;
            }
        }

        let extension = output_extension(self.settings.extension.as_deref(), opts.client);
        let dest = resolve_output(path, root, self.settings.out_dir.as_deref(), &extension);
        let output = if opts.client {
            compiled.client_source(&opts)
        } else {
            compiled.render(&opts)
        };
        emit(&dest, &output, &self.console)
    }
}

/// Does this path name a compilable template source?
pub fn is_source(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("pug") | Some("jade")
    )
}

/// Ignored when the basename, or any path segment, starts with `_`.
pub fn is_ignored(path: &Path) -> bool {
    path.components().any(|c| match c {
        Component::Normal(name) => name.to_string_lossy().starts_with('_'),
        _ => false,
    })
}

/// Client-mode function name derived from a file path: camelCased basename
/// plus a `Template` suffix.
pub fn template_name(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let mut name = String::with_capacity(stem.len() + 8);
    let mut upper_next = false;
    for c in stem.chars() {
        if c.is_ascii_alphanumeric() {
            if upper_next && !name.is_empty() {
                name.extend(c.to_uppercase());
            } else {
                name.push(c);
            }
            upper_next = false;
        } else {
            upper_next = true;
        }
    }
    name.push_str("Template");
    name
}
