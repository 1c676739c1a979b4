// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Delimited text blocks shared by geometry and plan files
//!
//! A block is a begin marker line, free text, and an end marker line.
//! Replacing its contents keeps the markers and everything outside them.

/// Opening marker of a description block
pub const DESCRIPTION_BEGIN: &str = "BEGIN DESCRIPTION:";

/// Closing marker of a description block
pub const DESCRIPTION_END: &str = "END DESCRIPTION:";

/// Split replacement content into lines; empty content is one blank line
pub fn content_lines(content: &str) -> Vec<String> {
    let lines: Vec<String> = content.lines().map(str::to_string).collect();
    if lines.is_empty() {
        vec![String::new()]
    } else {
        lines
    }
}

/// Positions of the first `begin` marker and the first `end` marker after it.
/// `text` yields an item's line text, or `None` for items that are not lines.
pub fn find_block<T>(
    items: &[T],
    text: impl Fn(&T) -> Option<&str>,
    begin: &str,
    end: &str,
) -> Option<(usize, usize)> {
    let start = items
        .iter()
        .position(|item| text(item).is_some_and(|t| t.trim() == begin))?;
    let stop = items[start + 1..]
        .iter()
        .position(|item| text(item).is_some_and(|t| t.trim() == end))?;
    Some((start, start + 1 + stop))
}

/// Replace the lines strictly between `begin` and `end` with `content`.
///
/// Without a complete block one is appended, preceded by a blank spacer line
/// unless the last item already is one.
pub fn splice_block<T>(
    items: &mut Vec<T>,
    text: impl Fn(&T) -> Option<&str>,
    make: impl Fn(String) -> T,
    begin: &str,
    end: &str,
    content: &str,
) {
    let lines = content_lines(content);

    match find_block(items, &text, begin, end) {
        Some((start, stop)) => {
            items.splice(start + 1..stop, lines.into_iter().map(&make));
        }
        None => {
            if items.last().is_some_and(|item| text(item) != Some("")) {
                items.push(make(String::new()));
            }
            items.push(make(begin.to_string()));
            items.extend(lines.into_iter().map(&make));
            items.push(make(end.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splice(lines: &[&str], content: &str) -> Vec<String> {
        let mut items: Vec<String> = lines.iter().map(|s| s.to_string()).collect();
        splice_block(
            &mut items,
            |s| Some(s.as_str()),
            |s| s,
            DESCRIPTION_BEGIN,
            DESCRIPTION_END,
            content,
        );
        items
    }

    #[test]
    fn test_replaces_between_markers() {
        let out = splice(
            &["Plan Title=x", "BEGIN DESCRIPTION:", "old 1", "old 2", "END DESCRIPTION:", "tail"],
            "new",
        );
        assert_eq!(
            out,
            vec!["Plan Title=x", "BEGIN DESCRIPTION:", "new", "END DESCRIPTION:", "tail"]
        );
    }

    #[test]
    fn test_empty_content_leaves_blank_line() {
        let out = splice(&["BEGIN DESCRIPTION:", "old", "END DESCRIPTION:"], "");
        assert_eq!(out, vec!["BEGIN DESCRIPTION:", "", "END DESCRIPTION:"]);
    }

    #[test]
    fn test_appends_with_spacer() {
        let out = splice(&["Plan Title=x"], "a\nb");
        assert_eq!(
            out,
            vec!["Plan Title=x", "", "BEGIN DESCRIPTION:", "a", "b", "END DESCRIPTION:"]
        );
    }

    #[test]
    fn test_appends_without_double_spacer() {
        let out = splice(&["Plan Title=x", ""], "a");
        assert_eq!(out, vec!["Plan Title=x", "", "BEGIN DESCRIPTION:", "a", "END DESCRIPTION:"]);
        assert_eq!(splice(&[], "a"), vec!["BEGIN DESCRIPTION:", "a", "END DESCRIPTION:"]);
    }

    #[test]
    fn test_end_before_begin_is_not_a_block() {
        let lines = ["END DESCRIPTION:", "BEGIN DESCRIPTION:"];
        assert_eq!(find_block(&lines, |s| Some(*s), DESCRIPTION_BEGIN, DESCRIPTION_END), None);
    }
}
