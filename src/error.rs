//! Error types for pugc
//!
//! Library errors use `thiserror`; the binary boundary wraps them in `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for pugc operations
pub type PugResult<T> = Result<T, PugError>;

/// Main error type for pugc operations
#[derive(Error, Debug)]
pub enum PugError {
    /// Malformed template source
    #[error("{file}:{line}: {message}")]
    Syntax {
        file: PathBuf,
        line: usize,
        message: String,
    },

    /// An `include` target could not be resolved
    #[error("{file}:{line}: include not found: {include}")]
    IncludeNotFound {
        file: PathBuf,
        line: usize,
        include: PathBuf,
    },

    /// Include chain loops back onto a file that is still being expanded
    #[error("{file}:{line}: circular include of {include}")]
    CircularInclude {
        file: PathBuf,
        line: usize,
        include: PathBuf,
    },

    /// Absolute-style include used without the `basedir` option
    #[error("{file}:{line}: the basedir option is required to use includes with absolute paths")]
    MissingBasedir { file: PathBuf, line: usize },

    /// Invalid front matter YAML
    #[error("invalid front matter in {file}: {message}")]
    InvalidFrontmatter { file: PathBuf, message: String },

    /// A `layout` named in front matter does not exist
    #[error("{file}: layout not found: {layout}")]
    LayoutNotFound { file: PathBuf, layout: PathBuf },

    /// Every interpretation of the `-O` argument failed; `attempts` carries
    /// the accumulated diagnostics of each parse in order.
    #[error("unable to parse options from {input:?}\n{attempts}")]
    Options { input: String, attempts: String },

    /// A path could not be read or statted
    #[error("{path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Low-level file monitor error
    #[error("watch error: {0}")]
    Watch(#[from] notify::Error),
}
