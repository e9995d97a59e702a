//! Output path resolution
//!
//! Pure path arithmetic: extension swapping, hierarchy preservation under an
//! output directory, and lexical normalization. Nothing in here touches the
//! filesystem.

use std::path::{Component, Path, PathBuf};

/// Pick the output file extension (without a leading dot).
///
/// An explicit override wins, including the empty string for extension-less
/// output. Otherwise client mode emits `js` and document mode emits `html`.
pub fn output_extension(explicit: Option<&str>, client: bool) -> String {
    match explicit {
        Some(ext) => ext.trim_start_matches('.').to_string(),
        None if client => "js".to_string(),
        None => "html".to_string(),
    }
}

/// Compute the destination path for a compiled source file.
///
/// - No output directory: the source path with its extension swapped, in place.
/// - Output directory and a recursion root: the part of the source path below
///   `root` is preserved under `out_dir`, so `pugc foo --out /tmp` produces
///   `/tmp/<foo's children>` rather than `/tmp/foo/<children>`.
/// - Output directory without a root: flattens to the basename.
pub fn resolve_output(
    source: &Path,
    root: Option<&Path>,
    out_dir: Option<&Path>,
    extension: &str,
) -> PathBuf {
    let swapped = if extension.is_empty() {
        source.with_extension("")
    } else {
        source.with_extension(extension)
    };

    let Some(out_dir) = out_dir else {
        return swapped;
    };

    let tail = match root {
        Some(root) => swapped
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| basename_of(&swapped)),
        None => basename_of(&swapped),
    };
    out_dir.join(tail)
}

fn basename_of(path: &Path) -> PathBuf {
    path.file_name().map(PathBuf::from).unwrap_or_default()
}

/// Lexically normalize a path: drop `.` segments and fold `..` onto the
/// previous segment where possible. Used to key the watch registry so the
/// same file registered under different spellings dedupes to one monitor.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop =
                    matches!(out.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}
