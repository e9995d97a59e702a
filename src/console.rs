//! Console logging gated by `--silent`
//!
//! The original tool logs two-space-indented progress lines (`rendered`,
//! `watching`) to stdout and errors to stderr. Everything on stdout goes
//! through [`Console`] so `--silent` can turn it off in one place.

use std::fmt::Display;

/// Stdout logger handle. Cheap to copy into whoever needs to log.
#[derive(Debug, Clone, Copy, Default)]
pub struct Console {
    silent: bool,
}

impl Console {
    pub fn new(silent: bool) -> Self {
        Self { silent }
    }

    /// Print one progress line unless silenced.
    pub fn log(&self, message: impl Display) {
        if !self.silent {
            println!("{message}");
        }
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }
}
