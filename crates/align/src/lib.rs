//! codesim alignment engine.
//!
//! Marks which tokens of two files belong to shared runs, for display next
//! to a similarity score. Matching is greedy: take the longest common run,
//! then recurse on what lies before and after it. That is fast and good at
//! finding copied blocks, but it is not an optimal alignment.
//!
//! ```
//! use align::{align_tokens, HighlightStyle};
//!
//! let a = ["x", " ", "=", " ", "1"];
//! let b = ["y", " ", "=", " ", "1"];
//! let alignment = align_tokens(&a, &b);
//! assert_eq!(alignment.match_ratio(), 0.8);
//!
//! let style = HighlightStyle::plain("[", "]");
//! assert_eq!(style.render(&alignment.left), "x[ = 1]");
//! ```

mod alignment;
mod blocks;
mod markup;
mod opcodes;

pub use crate::alignment::{align_tokens, excerpt, AlignedToken, Alignment};
pub use crate::blocks::{matching_blocks, matching_blocks_with, MatchBlock, MatchOptions};
pub use crate::markup::{HighlightStyle, DEFAULT_MAX_LINES};
pub use crate::opcodes::{opcodes, opcodes_from_blocks, OpTag, Opcode};
