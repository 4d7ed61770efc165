//! Slug derivation and text helpers.
//!
//! Slugs are derived from titles/names by folding Turkish diacritics,
//! lowercasing, and collapsing every non-alphanumeric run into a single
//! hyphen. Reading time and excerpts are computed from translation content.

/// Average reading speed used for `reading_time`.
const WORDS_PER_MINUTE: usize = 200;

/// Maximum slug length accepted by `is_valid_slug`.
const MAX_SLUG_LEN: usize = 100;

fn fold_char(c: char) -> Option<char> {
    match c {
        'ğ' | 'Ğ' => Some('g'),
        'ü' | 'Ü' => Some('u'),
        'ş' | 'Ş' => Some('s'),
        'ı' | 'İ' => Some('i'),
        'ö' | 'Ö' => Some('o'),
        'ç' | 'Ç' => Some('c'),
        _ => {
            let lower = c.to_ascii_lowercase();
            lower.is_ascii_alphanumeric().then_some(lower)
        }
    }
}

/// Derive a URL-safe slug from free text.
///
/// Turkish characters are folded to their ASCII equivalents, everything is
/// lowercased, and runs of other characters become single hyphens. Leading
/// and trailing hyphens never appear in the output.
pub fn generate_slug(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut gap = false;
    for c in text.chars() {
        match fold_char(c) {
            Some(folded) => {
                if gap && !slug.is_empty() {
                    slug.push('-');
                }
                gap = false;
                slug.push(folded);
            }
            None => gap = true,
        }
    }
    slug
}

/// Check a client-provided slug: lowercase alphanumerics and hyphens only.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && slug.len() <= MAX_SLUG_LEN
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Estimated reading time in minutes, never below one.
pub fn reading_time(content: &str) -> i32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as i32
}

/// Extract a plain-text excerpt from (possibly HTML) content.
///
/// Tags are stripped, then the text is truncated to `max_length` characters
/// with a trailing ellipsis when anything was cut off.
pub fn extract_excerpt(content: &str, max_length: usize) -> String {
    let mut plain = String::with_capacity(content.len());
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => plain.push(c),
            _ => {}
        }
    }
    let plain = plain.trim();
    if plain.chars().count() <= max_length {
        return plain.to_string();
    }
    let cut: String = plain.chars().take(max_length).collect();
    format!("{}...", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_generate_slug_basic() {
        assert_eq!(generate_slug("Hello World"), "hello-world");
        assert_eq!(generate_slug("Tech"), "tech");
    }

    #[test]
    fn test_generate_slug_turkish_folding() {
        assert_eq!(generate_slug("Merhaba Dünya"), "merhaba-dunya");
        assert_eq!(generate_slug("İstanbul'da Yaşam"), "istanbul-da-yasam");
        assert_eq!(generate_slug("Çılgın Göçmen Kuşlar"), "cilgin-gocmen-kuslar");
    }

    #[test]
    fn test_generate_slug_collapses_separators() {
        assert_eq!(generate_slug("  a -- b  "), "a-b");
        assert_eq!(generate_slug("!!!"), "");
    }

    #[test]
    fn test_is_valid_slug() {
        assert!(is_valid_slug("hello-world-42"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("Hello"));
        assert!(!is_valid_slug("a b"));
        assert!(!is_valid_slug(&"a".repeat(101)));
    }

    #[test]
    fn test_reading_time() {
        assert_eq!(reading_time(""), 1);
        assert_eq!(reading_time("one two three"), 1);
        let long = "word ".repeat(401);
        assert_eq!(reading_time(&long), 3);
    }

    #[test]
    fn test_extract_excerpt_strips_tags() {
        assert_eq!(
            extract_excerpt("<p>Hello <b>world</b></p>", 160),
            "Hello world"
        );
    }

    #[test]
    fn test_extract_excerpt_truncates() {
        let text = "a".repeat(200);
        let excerpt = extract_excerpt(&text, 160);
        assert!(excerpt.ends_with("..."));
        assert_eq!(excerpt.chars().count(), 163);
    }
}
