//! File emitter
//!
//! Writes compiled output to its destination, creating missing ancestor
//! directories first, and logs one `rendered <path>` line per file.

use std::fs;
use std::path::Path;

use crate::console::Console;
use crate::error::PugResult;
use crate::paths::normalize;

/// Write `content` to `dest`, replacing any existing file.
pub fn emit(dest: &Path, content: &str, console: &Console) -> PugResult<()> {
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(dest, content)?;
    console.log(format!("  rendered {}", normalize(dest).display()));
    Ok(())
}
