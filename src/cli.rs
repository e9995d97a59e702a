//! Command-line surface
//!
//! Flat flag set plus positional paths; no paths means compile standard
//! input to standard output.

use std::path::PathBuf;

use clap::Parser;

const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (pug subset compiler)");

const AFTER_HELP: &str = "\
Examples:

  # Render all files in the `templates` directory:
  $ pugc templates

  # Create {foo,bar}.html:
  $ pugc foo.pug bar.pug

  # Using standard input and output streams:
  $ pugc < my.pug > my.html
  $ echo 'h1 Pug!' | pugc

  # Render all files in `foo` and `bar` directories to `/tmp`:
  $ pugc foo bar --out /tmp

  # Specify options through a string:
  $ pugc -O '{\"doctype\": \"html\"}' foo.pug
  # or, using JavaScript instead of JSON
  $ pugc -O \"{doctype: 'html'}\" foo.pug

  # Specify options through a file:
  $ echo '{\"doctype\": \"html\"}' > options.json
  $ pugc -O options.json foo.pug
";

/// pugc - compile Pug templates to HTML or client-side functions
#[derive(Parser, Debug)]
#[command(name = "pugc")]
#[command(version = VERSION, about, after_help = AFTER_HELP)]
pub struct Cli {
    /// JSON/JavaScript/YAML options object or file
    #[arg(short = 'O', long = "obj", value_name = "str|path")]
    pub obj: Option<String>,

    /// Output the rendered HTML or compiled JavaScript to <dir>
    #[arg(short = 'o', long = "out", value_name = "dir")]
    pub out: Option<PathBuf>,

    /// Filename used to resolve includes
    #[arg(short = 'p', long = "path", value_name = "path")]
    pub path: Option<PathBuf>,

    /// Path used as root directory to resolve absolute includes
    #[arg(short = 'b', long = "basedir", value_name = "path")]
    pub basedir: Option<PathBuf>,

    /// Compile pretty HTML output
    #[arg(short = 'P', long = "pretty")]
    pub pretty: bool,

    /// Compile function for client-side
    #[arg(short = 'c', long = "client")]
    pub client: bool,

    /// The name of the compiled template (requires --client)
    #[arg(short = 'n', long = "name", value_name = "str", requires = "client")]
    pub name: Option<String>,

    /// Compile without debugging (smaller functions)
    #[arg(short = 'D', long = "no-debug")]
    pub no_debug: bool,

    /// Watch files for changes and automatically re-render
    #[arg(short = 'w', long = "watch")]
    pub watch: bool,

    /// Specify the output file extension
    #[arg(short = 'E', long = "extension", value_name = "ext")]
    pub extension: Option<String>,

    /// Do not output logs
    #[arg(short = 's', long = "silent")]
    pub silent: bool,

    /// Name the template after the last section of the file path
    /// (requires --client, overridden by --name)
    #[arg(long = "name-after-file", requires = "client")]
    pub name_after_file: bool,

    /// Specify the doctype on the command line (useful if it is not
    /// specified by the template)
    #[arg(long = "doctype", value_name = "str")]
    pub doctype: Option<String>,

    /// Deprecated: hierarchy preservation is the default; kept for
    /// backward compatibility and ignored
    #[arg(long = "hierarchy", hide = true)]
    pub hierarchy: bool,

    /// Files or directories to compile
    #[arg(value_name = "dir|file")]
    pub files: Vec<PathBuf>,
}
