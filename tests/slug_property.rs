//! Property tests for the slug functions.

use babil::slug::{generate_slug, is_valid_slug};
use proptest::prelude::*;

proptest! {
    /// Whatever goes in, the output only ever contains lowercase ASCII
    /// alphanumerics separated by single interior hyphens.
    #[test]
    fn generated_slugs_are_url_safe(input in ".{0,80}") {
        let slug = generate_slug(&input);
        prop_assert!(slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'));
        prop_assert!(!slug.starts_with('-'));
        prop_assert!(!slug.ends_with('-'));
        prop_assert!(!slug.contains("--"));
    }

    /// Slugifying a slug changes nothing.
    #[test]
    fn generate_slug_is_idempotent(input in "[a-zA-Z0-9 ğüşıöçİĞÜŞÖÇ'!-]{0,60}") {
        let once = generate_slug(&input);
        prop_assert_eq!(generate_slug(&once), once);
    }

    /// Every non-empty generated slug of reasonable length passes the
    /// client-slug validator.
    #[test]
    fn generated_slugs_validate(input in "[a-zA-Z0-9 ]{1,80}") {
        let slug = generate_slug(&input);
        prop_assert!(slug.is_empty() || is_valid_slug(&slug));
    }
}
