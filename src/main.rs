//! pugc CLI - batch and watch-mode Pug template compiler
//!
//! Usage: pugc [options] [dir|file ...]
//!
//! With paths: render each file, recursing into directories. With no paths:
//! compile standard input to standard output. With `--watch`: keep running,
//! re-rendering the affected entry points whenever a template, one of its
//! includes, or the `-O` options file changes.

mod cli;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::SystemTime;

use anyhow::Result;
use clap::Parser;
use serde_json::{json, Map, Value};

use pugc::options::{merge, parse_obj, CompileOptions};
use pugc::watcher::{MonitorBackend, PollBackend, WatchRegistry, POLL_INTERVAL};
use pugc::{compile, normalize, Console, Renderer, RenderSettings};

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let console = Console::new(cli.silent);

    let mut blob = match &cli.obj {
        Some(obj) => parse_obj(obj)?,
        None => Map::new(),
    };
    overlay_flags(&mut blob, &cli);
    let options = CompileOptions::from_map(&blob)?;

    if cli.files.is_empty() {
        return compile_stdin(&options);
    }

    let renderer = Renderer {
        options,
        settings: RenderSettings {
            out_dir: cli.out.clone(),
            extension: cli.extension.clone(),
            name_after_file: cli.name_after_file,
        },
        console,
    };

    console.log("");

    if cli.watch {
        watch(&cli, blob, renderer, console)
    } else {
        for file in &cli.files {
            renderer.render(file, None, None)?;
        }
        Ok(())
    }
}

/// Fold command-line flags into the option mapping. Value-carrying flags
/// overwrite only when given; `--no-debug` always decides `compileDebug`,
/// matching the original tool.
fn overlay_flags(blob: &mut Map<String, Value>, cli: &Cli) {
    if let Some(path) = &cli.path {
        blob.insert("filename".to_string(), json!(path));
    }
    blob.insert("compileDebug".to_string(), json!(!cli.no_debug));
    if cli.client {
        blob.insert("client".to_string(), json!(true));
    }
    if cli.pretty {
        blob.insert("pretty".to_string(), json!(true));
    }
    if let Some(basedir) = &cli.basedir {
        blob.insert("basedir".to_string(), json!(basedir));
    }
    if let Some(doctype) = &cli.doctype {
        blob.insert("doctype".to_string(), json!(doctype));
    }
    if let Some(name) = &cli.name {
        blob.insert("name".to_string(), json!(name));
    }
}

/// Compile standard input as one anonymous template and write the result to
/// standard output. Watch mode never applies here.
fn compile_stdin(options: &CompileOptions) -> Result<()> {
    let mut source = String::new();
    io::stdin().read_to_string(&mut source)?;

    let compiled = compile(&source, options)?;
    let output = if options.client {
        compiled.client_source(options)
    } else {
        compiled.render(options)
    };
    io::stdout().write_all(output.as_bytes())?;
    Ok(())
}

/// The watch loop: seed the initial render pass with the fault-tolerant
/// wrapper, then resolve monitor ticks into rebuilds until interrupted.
fn watch(
    cli: &Cli,
    mut blob: Map<String, Value>,
    mut renderer: Renderer,
    console: Console,
) -> Result<()> {
    // Interrupt is the only shutdown path; no graceful drain.
    ctrlc::set_handler(|| std::process::exit(1))?;

    let (tx, rx) = channel();
    let mut backend = PollBackend::new(tx, POLL_INTERVAL)?;

    // Watch the options file itself when -O named a real file; its changes
    // reload the options and re-render everything.
    let config_path = cli
        .obj
        .as_deref()
        .map(Path::new)
        .filter(|p| p.is_file())
        .map(|p| normalize(p));
    if let Some(cfg) = &config_path {
        backend.monitor(cfg)?;
        console.log(format!("  watching {}", cfg.display()));
    }
    let mut config_seen: Option<SystemTime> = config_path
        .as_ref()
        .and_then(|p| fs::metadata(p).and_then(|m| m.modified()).ok());

    let mut registry = WatchRegistry::new(Box::new(backend), console);
    for file in &cli.files {
        renderer.try_render(file, None, Some(&mut registry));
    }

    while let Ok(tick) = rx.recv() {
        if config_path.as_deref() == Some(tick.path.as_path()) {
            let Some(mtime) = tick.mtime else { continue };
            if config_seen == Some(mtime) {
                continue;
            }
            config_seen = Some(mtime);
            console.log(format!("  {} changed", tick.path.display()));

            match parse_obj(cli.obj.as_deref().unwrap_or_default()) {
                Ok(incoming) => {
                    // New keys overwrite, keys the reload omits are retained.
                    merge(&mut blob, incoming);
                    match CompileOptions::from_map(&blob) {
                        Ok(options) => renderer.options = options,
                        Err(e) => eprintln!("{e}"),
                    }
                }
                Err(e) => eprintln!("{e}"),
            }
            for (base, root) in registry.bases() {
                renderer.try_render(&base, root.as_deref(), Some(&mut registry));
            }
            continue;
        }

        for (base, root) in registry.dirty_bases(&tick) {
            renderer.try_render(&base, root.as_deref(), Some(&mut registry));
        }
    }
    Ok(())
}
