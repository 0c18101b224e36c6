use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::blocks::{matching_blocks, MatchBlock};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpTag {
    /// Both spans hold the same elements.
    Equal,
    /// The spans differ; either may be empty.
    Different,
}

/// `a[a_start..a_end]` against `b[b_start..b_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opcode {
    pub tag: OpTag,
    pub a_start: usize,
    pub a_end: usize,
    pub b_start: usize,
    pub b_end: usize,
}

/// Contiguous spans covering both sequences from start to end.
pub fn opcodes<T: Eq + Hash>(a: &[T], b: &[T]) -> Vec<Opcode> {
    opcodes_from_blocks(&matching_blocks(a, b), a.len(), b.len())
}

/// Build opcodes from already-computed blocks of sequences of length
/// `a_len` and `b_len`.
pub fn opcodes_from_blocks(blocks: &[MatchBlock], a_len: usize, b_len: usize) -> Vec<Opcode> {
    let mut ops = Vec::with_capacity(blocks.len() * 2 + 1);
    let (mut i, mut j) = (0, 0);

    for block in blocks {
        if i < block.a || j < block.b {
            ops.push(Opcode {
                tag: OpTag::Different,
                a_start: i,
                a_end: block.a,
                b_start: j,
                b_end: block.b,
            });
        }
        ops.push(Opcode {
            tag: OpTag::Equal,
            a_start: block.a,
            a_end: block.a + block.size,
            b_start: block.b,
            b_end: block.b + block.size,
        });
        i = block.a + block.size;
        j = block.b + block.size;
    }

    if i < a_len || j < b_len {
        ops.push(Opcode {
            tag: OpTag::Different,
            a_start: i,
            a_end: a_len,
            b_start: j,
            b_end: b_len,
        });
    }

    ops
}
