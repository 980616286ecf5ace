//! Case-insensitive keyword matching on subject lines.

use std::ops::Range;

/// Finds the first case-insensitive occurrence of `needle` in `haystack`.
///
/// Returns the byte range of the match in `haystack`.
pub fn find_ignore_case(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return Some(0..0);
    }

    'outer: for (start, _) in haystack.char_indices() {
        let mut rest = haystack[start..].char_indices();
        let mut end = start;
        for n in needle.chars() {
            match rest.next() {
                Some((offset, h)) if chars_eq_ignore_case(h, n) => {
                    end = start + offset + h.len_utf8();
                }
                _ => continue 'outer,
            }
        }
        return Some(start..end);
    }
    None
}

/// Returns true if `haystack` contains `needle`, ignoring case.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    find_ignore_case(haystack, needle).is_some()
}

/// Index of the first keyword (in list order) that occurs in `text`.
pub fn first_keyword(text: &str, keywords: &[&str]) -> Option<usize> {
    keywords
        .iter()
        .position(|keyword| contains_ignore_case(text, keyword))
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

/// Uppercases the first character of each space-separated word and
/// lowercases the rest.
pub fn capitalize_words(s: &str) -> String {
    s.split(' ')
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_find_ignore_case() {
        assert_eq!(find_ignore_case("BREAKING NEWS: x", "Breaking News"), Some(0..13));
        assert_eq!(find_ignore_case("Your daily climate brief", "Climate"), Some(11..18));
        assert_eq!(find_ignore_case("Weekend Reading", "Climate"), None);
    }

    #[test]
    fn test_find_ignore_case_non_ascii_haystack() {
        let subject = "Café — the morning: hi";
        let range = find_ignore_case(subject, "The Morning").unwrap();
        assert_eq!(&subject[range], "the morning");
    }

    #[test]
    fn test_find_needle_longer_than_haystack() {
        assert_eq!(find_ignore_case("The", "The Morning"), None);
    }

    #[test]
    fn test_first_keyword_uses_list_order() {
        let keywords = ["The Morning", "Breaking News"];
        // Both occur; list order wins over position in the text.
        assert_eq!(first_keyword("Breaking News from The Morning", &keywords), Some(0));
        assert_eq!(first_keyword("breaking news", &keywords), Some(1));
        assert_eq!(first_keyword("nothing", &keywords), None);
    }

    #[test]
    fn test_capitalize_words() {
        assert_eq!(capitalize_words("The Morning"), "The Morning");
        assert_eq!(capitalize_words("BREAKING NEWS"), "Breaking News");
        assert_eq!(capitalize_words("the  evening"), "The Evening");
    }
}
