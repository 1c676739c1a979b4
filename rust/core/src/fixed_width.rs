// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fixed-width column codec
//!
//! Numeric data blocks carry no delimiters: every value occupies exactly
//! `width` characters, usually right-justified. Decoding slices and trims,
//! encoding pads back. Values wider than their column are written whole and
//! reported, never truncated.

use smallvec::SmallVec;

/// Tokens decoded from one line. Data lines hold at most 10 columns.
pub type Tokens<'a> = SmallVec<[&'a str; 10]>;

/// Padding side used when encoding a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Justify {
    Left,
    #[default]
    Right,
}

/// Split `line` into consecutive `width`-character chunks, trimmed.
/// Empty trailing chunks are dropped; empty interior chunks are kept.
pub fn decode(line: &str, width: usize) -> Tokens<'_> {
    let mut tokens = Tokens::new();
    if width == 0 {
        return tokens;
    }

    let mut rest = line;
    while !rest.is_empty() {
        let split = if rest.is_ascii() {
            width.min(rest.len())
        } else {
            rest.char_indices()
                .nth(width)
                .map(|(i, _)| i)
                .unwrap_or(rest.len())
        };
        let (chunk, tail) = rest.split_at(split);
        tokens.push(chunk.trim());
        rest = tail;
    }

    while tokens.last().is_some_and(|t| t.is_empty()) {
        tokens.pop();
    }
    tokens
}

/// Whether `token` fits in a `width`-character column
#[inline]
pub fn fits(token: &str, width: usize) -> bool {
    token.chars().count() <= width
}

/// Append `token` padded to `width` characters
pub fn pad_into(out: &mut String, token: &str, width: usize, justify: Justify) {
    let len = token.chars().count();
    if len > width {
        tracing::warn!(token, width, "value exceeds its fixed-width column");
        out.push_str(token);
        return;
    }

    let fill = width - len;
    match justify {
        Justify::Left => {
            out.push_str(token);
            out.extend(std::iter::repeat(' ').take(fill));
        }
        Justify::Right => {
            out.extend(std::iter::repeat(' ').take(fill));
            out.push_str(token);
        }
    }
}

/// Pad a single token
pub fn pad(token: &str, width: usize, justify: Justify) -> String {
    let mut out = String::with_capacity(width.max(token.len()));
    pad_into(&mut out, token, width, justify);
    out
}

/// Pad every token and concatenate with no separator
pub fn encode<S: AsRef<str>>(tokens: &[S], width: usize, justify: Justify) -> String {
    let mut out = String::with_capacity(tokens.len() * width);
    for token in tokens {
        pad_into(&mut out, token.as_ref(), width, justify);
    }
    out
}

/// Encode tokens as lines of at most `per_line` columns
pub fn encode_lines<S: AsRef<str>>(
    tokens: &[S],
    per_line: usize,
    width: usize,
    justify: Justify,
) -> Vec<String> {
    tokens
        .chunks(per_line.max(1))
        .map(|row| encode(row, width, justify))
        .collect()
}
