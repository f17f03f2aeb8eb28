//! Property-based tests for tree path normalization.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::path::{validate_segment, TreePath};
    use proptest::prelude::*;

    // ============================================================================
    // TreePath::parse property tests
    // ============================================================================

    proptest! {
        /// Property: parsing is idempotent through Display
        #[test]
        fn parse_display_roundtrip_is_stable(input in "[a-z./]{0,40}") {
            let once = TreePath::parse(&input);
            let twice = TreePath::parse(&once.to_string());
            prop_assert_eq!(once, twice);
        }

        /// Property: parsing is deterministic (same input = same output)
        #[test]
        fn parse_is_deterministic(input in ".*") {
            prop_assert_eq!(TreePath::parse(&input), TreePath::parse(&input));
        }

        /// Property: the display form is always absolute and has no empty
        /// or dot segments
        #[test]
        fn display_is_canonical(input in "[a-z./]{0,40}") {
            let shown = TreePath::parse(&input).to_string();
            prop_assert!(shown.starts_with('/'));
            if shown != "/" {
                prop_assert!(!shown.ends_with('/'));
                for segment in shown[1..].split('/') {
                    prop_assert!(!segment.is_empty());
                    prop_assert!(segment != "." && segment != "..");
                }
            }
        }
    }

    // ============================================================================
    // join / parent property tests
    // ============================================================================

    proptest! {
        /// Property: joining a valid name then taking the parent returns the original
        #[test]
        fn join_then_parent_is_identity(
            base in "(/[a-z]{1,6}){0,4}",
            name in "[a-z][a-z0-9_-]{0,10}",
        ) {
            let base = TreePath::parse(&base);
            let child = base.join(&name).unwrap();
            prop_assert_eq!(child.parent(), Some(base.clone()));
            prop_assert_eq!(child.name(), Some(name.as_str()));
            prop_assert!(child.starts_with(&base));
            prop_assert_eq!(child.depth(), base.depth() + 1);
        }

        /// Property: a child path is exactly parent display + "/" + name
        #[test]
        fn child_display_is_parent_plus_name(
            base in "(/[a-z]{1,6}){0,4}",
            name in "[a-z]{1,8}",
        ) {
            let base = TreePath::parse(&base);
            let child = base.join(&name).unwrap();
            let expected = if base.is_root() {
                format!("/{}", name)
            } else {
                format!("{}/{}", base, name)
            };
            prop_assert_eq!(child.to_string(), expected);
        }

        /// Property: names with a separator are never valid segments
        #[test]
        fn names_with_separator_are_rejected(a in "[a-z]{0,5}", b in "[a-z]{0,5}") {
            let name = format!("{}/{}", a, b);
            prop_assert!(validate_segment(&name).is_err());
        }
    }
}
