//! pugc - batch and watch-mode compiler for Pug templates
//!
//! pugc walks a file tree, compiles each template source into rendered HTML
//! (or a client-side template function), and in watch mode keeps a reverse
//! dependency index live so that editing any transitively included file
//! recompiles exactly the entry points that depend on it.

pub mod compiler;
pub mod console;
pub mod emit;
pub mod error;
pub mod matter;
pub mod options;
pub mod paths;
pub mod render;
pub mod watcher;

// Re-exports for convenience
pub use compiler::{compile, Compiled};
pub use console::Console;
pub use error::{PugError, PugResult};
pub use options::{merge, parse_obj, CompileOptions};
pub use paths::{normalize, output_extension, resolve_output};
pub use render::{Renderer, RenderSettings};
pub use watcher::{MonitorBackend, MonitorTick, PollBackend, WatchRegistry, POLL_INTERVAL};
