//! Property tests for source filtering and client function naming.

use std::path::PathBuf;

use proptest::prelude::*;

use pugc::render::{is_ignored, template_name};

fn path_segment() -> impl Strategy<Value = String> {
    proptest::string::string_regex("[A-Za-z0-9_.-]{1,12}").unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: a path is ignored exactly when some segment starts with `_`.
    #[test]
    fn property_ignored_iff_underscore_segment(
        segments in proptest::collection::vec(path_segment(), 1..=5)
    ) {
        let expected = segments.iter().any(|s| s.starts_with('_'));
        let path: PathBuf = segments.iter().collect();
        prop_assert_eq!(is_ignored(&path), expected, "{}", path.display());
    }

    /// PROPERTY: derived template names end in `Template` and are valid
    /// JavaScript identifier material (ASCII alphanumerics only).
    #[test]
    fn property_template_name_shape(
        stem in "[A-Za-z0-9 _.-]{1,24}"
    ) {
        let name = template_name(&PathBuf::from(format!("{stem}.pug")));
        prop_assert!(name.ends_with("Template"), "{name}");
        prop_assert!(name.chars().all(|c| c.is_ascii_alphanumeric()), "{name}");
    }

    /// PROPERTY: `template_name` never panics, even on extension-less or
    /// unusual paths.
    #[test]
    fn property_template_name_never_panics(
        s in "(?s).{0,64}"
    ) {
        let _ = template_name(&PathBuf::from(&s));
    }
}
