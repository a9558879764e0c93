//! Search match ranges within node names

use std::ops::Range;

use regex::RegexBuilder;

/// Byte ranges of case-insensitive, non-overlapping occurrences of `query`
/// in `name`. The query is matched literally.
pub fn highlight_ranges(name: &str, query: &str) -> Vec<Range<usize>> {
    if query.is_empty() {
        return Vec::new();
    }
    let Ok(pattern) = RegexBuilder::new(&regex::escape(query))
        .case_insensitive(true)
        .build()
    else {
        return Vec::new();
    };
    pattern.find_iter(name).map(|m| m.range()).collect()
}

/// Split `name` into `(text, is_match)` segments covering it in order.
pub fn split_highlighted<'a>(name: &'a str, ranges: &[Range<usize>]) -> Vec<(&'a str, bool)> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    for range in ranges {
        if range.start > cursor {
            segments.push((&name[cursor..range.start], false));
        }
        segments.push((&name[range.clone()], true));
        cursor = range.end;
    }
    if cursor < name.len() {
        segments.push((&name[cursor..], false));
    }
    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges_ignore_case() {
        assert_eq!(highlight_ranges("ReadMe.md", "readme"), vec![0..6]);
        assert_eq!(highlight_ranges("layout_LAYOUT", "Layout"), vec![0..6, 7..13]);
    }

    #[test]
    fn test_query_is_literal() {
        assert_eq!(highlight_ranges("a.b", "."), vec![1..2]);
        assert_eq!(highlight_ranges("main.rs", "(.*)"), Vec::<Range<usize>>::new());
        assert_eq!(highlight_ranges("f(.*).rs", "(.*)"), vec![1..5]);
    }

    #[test]
    fn test_empty_query() {
        assert!(highlight_ranges("main.rs", "").is_empty());
    }

    #[test]
    fn test_split_covers_name() {
        let name = "src_layout_src";
        let segments = split_highlighted(name, &highlight_ranges(name, "src"));
        assert_eq!(
            segments,
            vec![("src", true), ("_layout_", false), ("src", true)]
        );
        assert_eq!(split_highlighted("plain", &[]), vec![("plain", false)]);
    }
}
