use serde::{Deserialize, Serialize};

use crate::blocks::matching_blocks;
use crate::opcodes::{opcodes_from_blocks, OpTag, Opcode};

/// One token of an aligned side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignedToken {
    pub text: String,
    /// Part of a block shared with the other side.
    pub matched: bool,
}

impl AlignedToken {
    pub fn is_newline(&self) -> bool {
        self.text == "\n"
    }
}

/// Both token sequences in full, each token flagged as matched or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alignment {
    pub left: Vec<AlignedToken>,
    pub right: Vec<AlignedToken>,
    pub opcodes: Vec<Opcode>,
}

impl Alignment {
    /// Matched tokens over all tokens on both sides; 0 when both are empty.
    pub fn match_ratio(&self) -> f32 {
        let total = self.left.len() + self.right.len();
        if total == 0 {
            return 0.0;
        }
        let matched = self
            .left
            .iter()
            .chain(&self.right)
            .filter(|t| t.matched)
            .count();
        matched as f32 / total as f32
    }
}

/// Align two token sequences by text.
///
/// Alignment never fails. Each side keeps every input token in order, so
/// concatenating a side's texts reproduces its input.
pub fn align_tokens<T: AsRef<str>>(a: &[T], b: &[T]) -> Alignment {
    let a_text: Vec<&str> = a.iter().map(AsRef::as_ref).collect();
    let b_text: Vec<&str> = b.iter().map(AsRef::as_ref).collect();

    let blocks = matching_blocks(&a_text, &b_text);
    let opcodes = opcodes_from_blocks(&blocks, a_text.len(), b_text.len());

    let mut left: Vec<AlignedToken> = a_text.iter().map(|t| unmatched(t)).collect();
    let mut right: Vec<AlignedToken> = b_text.iter().map(|t| unmatched(t)).collect();
    for op in opcodes.iter().filter(|op| op.tag == OpTag::Equal) {
        for token in &mut left[op.a_start..op.a_end] {
            token.matched = true;
        }
        for token in &mut right[op.b_start..op.b_end] {
            token.matched = true;
        }
    }

    Alignment {
        left,
        right,
        opcodes,
    }
}

fn unmatched(text: &str) -> AlignedToken {
    AlignedToken {
        text: text.to_string(),
        matched: false,
    }
}

/// Prefix of `side` that stops just before its `max_lines`-th newline token.
///
/// A display cap only; the full side is untouched. `max_lines == 0` yields
/// an empty excerpt.
pub fn excerpt(side: &[AlignedToken], max_lines: usize) -> &[AlignedToken] {
    if max_lines == 0 {
        return &[];
    }
    let mut newlines = 0;
    for (idx, token) in side.iter().enumerate() {
        if token.is_newline() {
            newlines += 1;
            if newlines == max_lines {
                return &side[..idx];
            }
        }
    }
    side
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingest::Language;
    use tokenize::tokenize_source;

    fn tokens(src: &str) -> Vec<tokenize::Token> {
        tokenize_source(src, Language::Py).tokens
    }

    fn side_text(side: &[AlignedToken]) -> String {
        side.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn identical_files_are_fully_matched() {
        let t = tokens("def f(x):\n    return x * 2");
        let alignment = align_tokens(&t, &t);
        assert!(alignment.left.iter().all(|t| t.matched));
        assert!(alignment.right.iter().all(|t| t.matched));
        assert_eq!(alignment.match_ratio(), 1.0);
    }

    #[test]
    fn sides_reproduce_their_inputs() {
        let a = tokens("total = 0\nfor v in values:\n    total += v");
        let b = tokens("s = 0\nfor item in values:\n    s += item\nprint(s)");
        let alignment = align_tokens(&a, &b);
        assert_eq!(side_text(&alignment.left), tokenize::reconstruct(&a));
        assert_eq!(side_text(&alignment.right), tokenize::reconstruct(&b));
        let ratio = alignment.match_ratio();
        assert!(ratio > 0.0 && ratio < 1.0);
    }

    #[test]
    fn renamed_identifier_is_unmatched() {
        let alignment = align_tokens(&["x", " ", "=", " ", "1"], &["y", " ", "=", " ", "1"]);
        let flags: Vec<_> = alignment.left.iter().map(|t| t.matched).collect();
        assert_eq!(flags, vec![false, true, true, true, true]);
    }

    #[test]
    fn empty_sides_align_to_nothing() {
        let empty: Vec<&str> = Vec::new();
        let alignment = align_tokens(&empty, &["a"]);
        assert!(alignment.left.is_empty());
        assert_eq!(alignment.right, vec![unmatched("a")]);
        assert_eq!(alignment.match_ratio(), 0.0);

        let both = align_tokens(&empty, &empty);
        assert_eq!(both.match_ratio(), 0.0);
    }

    #[test]
    fn excerpt_stops_before_nth_newline() {
        let side: Vec<AlignedToken> = ["a", "\n", "b", "\n", "c", "\n", "d"]
            .iter()
            .map(|t| unmatched(t))
            .collect();
        assert_eq!(side_text(excerpt(&side, 2)), "a\nb");
        assert_eq!(side_text(excerpt(&side, 3)), "a\nb\nc");
        assert_eq!(side_text(excerpt(&side, 50)), "a\nb\nc\nd");
        assert!(excerpt(&side, 0).is_empty());
    }

    #[test]
    fn excerpt_keeps_at_most_fifty_lines() {
        let src: String = (0..80).map(|i| format!("x{i} = {i}\n")).collect();
        let t = tokens(&src);
        let alignment = align_tokens(&t, &t);
        let cut = excerpt(&alignment.left, 50);
        assert_eq!(cut.iter().filter(|t| t.is_newline()).count(), 49);
    }

    fn module_source(lines: usize, edited_every: usize) -> String {
        (0..lines)
            .map(|i| {
                if edited_every > 0 && i % edited_every == edited_every / 2 {
                    format!("    renamed_{i} = helper({i}, values)\n")
                } else {
                    format!("    total_{i} = total_{i} + values[{i}] * 2\n")
                }
            })
            .collect()
    }

    #[test]
    fn large_identical_files_are_fully_matched() {
        let t = tokens(&module_source(600, 0));
        assert!(t.len() > 10_000);
        let alignment = align_tokens(&t, &t);
        assert_eq!(alignment.match_ratio(), 1.0);
        assert_eq!(alignment.opcodes.len(), 1);
    }

    #[test]
    fn large_near_copy_is_mostly_matched() {
        let original = tokens(&module_source(600, 0));
        let edited = tokens(&module_source(600, 20));
        let alignment = align_tokens(&original, &edited);

        assert!(alignment.match_ratio() > 0.9, "{}", alignment.match_ratio());
        assert!(alignment.match_ratio() < 1.0);
        assert_eq!(side_text(&alignment.left), tokenize::reconstruct(&original));
        assert_eq!(side_text(&alignment.right), tokenize::reconstruct(&edited));
        // An edited line never shows up as matched.
        let renamed = alignment.right.iter().find(|t| t.text == "renamed_10");
        assert_eq!(renamed.map(|t| t.matched), Some(false));
    }
}
