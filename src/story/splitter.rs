//! Three-way split of a generated story.
//!
//! Part 1 is the first non-blank line, part 2 the second, part 3 every
//! remaining non-blank line joined with `\n`. Missing parts are empty.

/// Number of parts a story is split into.
pub const STORY_PART_COUNT: usize = 3;

/// The three parts of a story, in order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StoryParts {
    /// First non-blank line.
    pub first: String,
    /// Second non-blank line.
    pub second: String,
    /// Remaining non-blank lines.
    pub rest: String,
}

impl StoryParts {
    /// Parts in file order.
    #[must_use]
    pub fn as_array(&self) -> [&str; STORY_PART_COUNT] {
        [&self.first, &self.second, &self.rest]
    }

    /// Whether every part is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.as_array().iter().all(|part| part.is_empty())
    }
}

/// Split completion text into [`StoryParts`].
///
/// Lines are kept verbatim apart from a trailing `\r`; blank lines are dropped.
#[must_use]
pub fn split_story(completion: &str) -> StoryParts {
    let mut lines = completion.lines().filter(|line| !line.trim().is_empty());

    let first = lines.next().unwrap_or_default().to_string();
    let second = lines.next().unwrap_or_default().to_string();
    let rest = lines.collect::<Vec<_>>().join("\n");

    StoryParts {
        first,
        second,
        rest,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_paragraphs() {
        let parts = split_story("Part one.\n\nPart two.\n\nPart three.");
        assert_eq!(parts.first, "Part one.");
        assert_eq!(parts.second, "Part two.");
        assert_eq!(parts.rest, "Part three.");
    }

    #[test]
    fn test_remainder_keeps_line_order() {
        let parts = split_story("a\nb\nc\n  \nd\ne\n");
        assert_eq!(parts.as_array(), ["a", "b", "c\nd\ne"]);
    }

    #[test]
    fn test_fewer_than_three_lines_yields_empty_parts() {
        let parts = split_story("only one line");
        assert_eq!(parts.as_array(), ["only one line", "", ""]);

        let parts = split_story("one\n\t\ntwo");
        assert_eq!(parts.as_array(), ["one", "two", ""]);
    }

    #[test]
    fn test_blank_completion() {
        let parts = split_story(" \n\n\t\n");
        assert!(parts.is_empty());
        assert_eq!(parts, StoryParts::default());
    }

    #[test]
    fn test_crlf_lines() {
        let parts = split_story("**Part 1:** Hello\r\n\r\n**Part 2:** World\r\n");
        assert_eq!(parts.first, "**Part 1:** Hello");
        assert_eq!(parts.second, "**Part 2:** World");
        assert!(parts.rest.is_empty());
    }

    #[test]
    fn test_lines_are_not_trimmed() {
        let parts = split_story("  indented\nplain");
        assert_eq!(parts.first, "  indented");
    }
}
