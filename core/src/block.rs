//! Correspondence units: algorithm-local [`BlockMatch`] runs and the
//! externally meaningful [`BlockPair`].
//!
//! A finished alignment is a collection of `BlockPair`s that, sorted by
//! `a_start`, exactly tiles `[0, line_count_a)` and, sorted by `b_start`,
//! exactly tiles `[0, line_count_b)`. Copy pairs are the one exception on the
//! A side: a copy re-reads A lines that another pair already covers, so its A
//! span is a reference, not coverage, and is excluded from the A tiling.
//! [`validate_tiling`] enforces all of this; a violation is an algorithm bug
//! and surfaces as [`DiffError::Internal`].

use std::fmt::Write as _;

use crate::report::DiffError;

/// Classification of a pair, crossed with the orthogonal move/copy flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Corresponding lines are byte-identical.
    ExactMatch,
    /// Corresponding lines are identical after whitespace normalization.
    NormalizedMatch,
    /// No correspondence: insert (`a_len == 0`), delete (`b_len == 0`), or
    /// replace (both positive).
    Mismatch,
}

/// An intermediate matched run in whatever index space the producing
/// algorithm used (usually offsets into a filtered line subsequence). Must be
/// mapped to absolute line numbers before promotion to a [`BlockPair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct BlockMatch {
    pub a: u32,
    pub b: u32,
    pub len: u32,
}

/// A matched or mismatched run in absolute 0-based line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BlockPair {
    pub a_start: u32,
    pub a_len: u32,
    pub b_start: u32,
    pub b_len: u32,
    pub kind: MatchKind,
    /// The block sits at a different relative position in the two files.
    pub is_move: bool,
    /// The block's A lines are also covered by another pair; B-side only for
    /// tiling purposes.
    pub is_copy: bool,
}

impl BlockPair {
    pub(crate) fn exact(a_start: u32, b_start: u32, len: u32) -> BlockPair {
        debug_assert!(len > 0, "matches cover at least one line");
        BlockPair {
            a_start,
            a_len: len,
            b_start,
            b_len: len,
            kind: MatchKind::ExactMatch,
            is_move: false,
            is_copy: false,
        }
    }

    pub(crate) fn normalized(a_start: u32, b_start: u32, len: u32) -> BlockPair {
        debug_assert!(len > 0, "matches cover at least one line");
        BlockPair {
            kind: MatchKind::NormalizedMatch,
            ..BlockPair::exact(a_start, b_start, len)
        }
    }

    pub(crate) fn mismatch(a_start: u32, a_len: u32, b_start: u32, b_len: u32) -> BlockPair {
        debug_assert!(a_len > 0 || b_len > 0, "empty mismatch has no meaning");
        BlockPair {
            a_start,
            a_len,
            b_start,
            b_len,
            kind: MatchKind::Mismatch,
            is_move: false,
            is_copy: false,
        }
    }

    pub(crate) fn moved(self) -> BlockPair {
        BlockPair {
            is_move: true,
            ..self
        }
    }

    pub(crate) fn copied(self) -> BlockPair {
        BlockPair {
            is_move: true,
            is_copy: true,
            ..self
        }
    }

    pub fn a_end(&self) -> u32 {
        self.a_start + self.a_len
    }

    pub fn b_end(&self) -> u32 {
        self.b_start + self.b_len
    }

    /// True when this pair represents a real difference between the files.
    pub fn is_difference(&self) -> bool {
        self.kind != MatchKind::ExactMatch || self.is_move
    }

    /// Pairs that keep their relative position in both files. These form the
    /// monotone skeleton the gap finder walks.
    pub(crate) fn is_in_order(&self) -> bool {
        !self.is_move && !self.is_copy
    }
}

/// Checks the tiling invariant: B is exactly partitioned by all pairs, A by
/// the non-copy pairs. Returns the offending state as a fatal internal error.
pub(crate) fn validate_tiling(
    pairs: &[BlockPair],
    line_count_a: u32,
    line_count_b: u32,
) -> Result<(), DiffError> {
    validate_side(
        pairs,
        line_count_a,
        "A",
        |p| (!p.is_copy).then_some((p.a_start, p.a_len)),
    )?;
    validate_side(pairs, line_count_b, "B", |p| Some((p.b_start, p.b_len)))?;
    Ok(())
}

fn validate_side(
    pairs: &[BlockPair],
    line_count: u32,
    side: &str,
    span: impl Fn(&BlockPair) -> Option<(u32, u32)>,
) -> Result<(), DiffError> {
    let mut spans: Vec<(u32, u32)> = pairs.iter().filter_map(&span).collect();
    spans.sort_unstable();

    let mut cursor = 0u32;
    for (start, len) in spans {
        if start < cursor {
            return Err(internal_tiling_error(
                pairs,
                format!("overlapping pairs on side {side} at line {start} (cursor {cursor})"),
            ));
        }
        if start > cursor {
            return Err(internal_tiling_error(
                pairs,
                format!("uncovered lines [{cursor}, {start}) on side {side}"),
            ));
        }
        cursor = start + len;
    }

    if cursor != line_count {
        return Err(internal_tiling_error(
            pairs,
            format!("uncovered tail [{cursor}, {line_count}) on side {side}"),
        ));
    }

    Ok(())
}

fn internal_tiling_error(pairs: &[BlockPair], message: String) -> DiffError {
    DiffError::Internal {
        message,
        pairs_dump: dump_pairs(pairs),
    }
}

/// One-line-per-pair dump attached to internal errors so a bug report carries
/// the state that violated the invariant.
pub(crate) fn dump_pairs(pairs: &[BlockPair]) -> String {
    let mut out = String::new();
    for pair in pairs {
        let _ = writeln!(
            out,
            "a=[{}, {}) b=[{}, {}) {:?}{}{}",
            pair.a_start,
            pair.a_end(),
            pair.b_start,
            pair.b_end(),
            pair.kind,
            if pair.is_move { " move" } else { "" },
            if pair.is_copy { " copy" } else { "" },
        );
    }
    out
}

/// Coalesces 1:1 index pairs (sorted, strictly increasing on both sides) into
/// maximal contiguous runs.
pub(crate) fn runs_from_index_pairs(pairs: &[(u32, u32)]) -> Vec<BlockMatch> {
    let mut runs = Vec::new();
    let mut iter = pairs.iter().copied();
    let Some((mut run_a, mut run_b)) = iter.next() else {
        return runs;
    };
    let mut run_len = 1u32;

    for (a, b) in iter {
        if a == run_a + run_len && b == run_b + run_len {
            run_len += 1;
        } else {
            runs.push(BlockMatch {
                a: run_a,
                b: run_b,
                len: run_len,
            });
            run_a = a;
            run_b = b;
            run_len = 1;
        }
    }

    runs.push(BlockMatch {
        a: run_a,
        b: run_b,
        len: run_len,
    });
    runs
}
