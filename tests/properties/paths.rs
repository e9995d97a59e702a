//! Property tests for output path resolution and normalization.

use std::path::{Path, PathBuf};

use proptest::prelude::*;

use pugc::{normalize, output_extension, resolve_output};

fn path_segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9._-]{1,12}").unwrap()
}

fn relative_path() -> impl Strategy<Value = String> {
    proptest::collection::vec(path_segment(), 1..=4).prop_map(|segments| segments.join("/"))
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: `normalize` never panics on arbitrary input.
    #[test]
    fn property_normalize_never_panics(
        s in "(?s).{0,256}"
    ) {
        let _ = normalize(Path::new(&s));
    }

    /// PROPERTY: `normalize` is idempotent.
    #[test]
    fn property_normalize_is_idempotent(
        s in "[A-Za-z0-9./_-]{0,64}"
    ) {
        let once = normalize(Path::new(&s));
        prop_assert_eq!(normalize(&once), once.clone());
    }

    /// PROPERTY: the chosen extension never carries a leading dot.
    #[test]
    fn property_output_extension_has_no_leading_dot(
        ext in proptest::option::of("[.A-Za-z0-9]{0,8}"),
        client in any::<bool>()
    ) {
        let picked = output_extension(ext.as_deref(), client);
        prop_assert!(!picked.starts_with('.'), "{picked}");
    }

    /// PROPERTY: with an output directory, the destination always lands
    /// under that directory.
    #[test]
    fn property_out_dir_contains_destination(
        rel in relative_path(),
        client in any::<bool>()
    ) {
        let source = PathBuf::from(format!("{rel}.pug"));
        let out_dir = Path::new("dist");
        let extension = output_extension(None, client);
        let dest = resolve_output(&source, None, Some(out_dir), &extension);
        prop_assert!(dest.starts_with(out_dir), "{}", dest.display());
    }

    /// PROPERTY: hierarchy below the recursion root survives extension
    /// swapping under an output directory.
    #[test]
    fn property_hierarchy_below_root_is_preserved(
        rel in relative_path()
    ) {
        let root = Path::new("views");
        let source = root.join(format!("{rel}.pug"));
        let dest = resolve_output(&source, Some(root), Some(Path::new("dist")), "html");
        prop_assert_eq!(dest, PathBuf::from("dist").join(format!("{rel}.html")));
    }
}
