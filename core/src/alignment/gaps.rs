//! Uncovered-span computation and mismatch gap filling.
//!
//! A gap is a span of lines in one file not yet covered by any BlockPair.
//! Gaps are paired positionally by walking the monotone skeleton: the
//! in-order (non-move, non-copy) pairs partition both files into windows,
//! and the uncovered intervals inside corresponding windows belong together.
//! After all matching phases, every remaining gap becomes one or more
//! Mismatch pairs so that both files end up exactly partitioned; leaving a
//! line of B uncovered after that is a fatal internal error, never a silent
//! drop.

use crate::block::{BlockPair, dump_pairs};
use crate::range::FileRange;
use crate::report::DiffError;
use crate::source::FileId;

/// Which file's coverage is being inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    A,
    B,
}

fn covered_spans(pairs: &[BlockPair], side: Side) -> Vec<(u32, u32)> {
    let mut spans: Vec<(u32, u32)> = pairs
        .iter()
        .filter_map(|p| match side {
            // A copy's A span is a reference into already-covered lines.
            Side::A => (!p.is_copy && p.a_len > 0).then_some((p.a_start, p.a_len)),
            Side::B => (p.b_len > 0).then_some((p.b_start, p.b_len)),
        })
        .collect();
    spans.sort_unstable();
    spans
}

/// Maximal uncovered intervals `(start, len)` of one side, in order.
pub(crate) fn uncovered(pairs: &[BlockPair], line_count: u32, side: Side) -> Vec<(u32, u32)> {
    let mut holes = Vec::new();
    let mut cursor = 0u32;
    for (start, len) in covered_spans(pairs, side) {
        debug_assert!(start >= cursor, "pairs must not overlap mid-phase");
        if start > cursor {
            holes.push((cursor, start - cursor));
        }
        cursor = cursor.max(start + len);
    }
    if cursor < line_count {
        holes.push((cursor, line_count - cursor));
    }
    holes
}

/// Uncovered intervals of one side as ranges of the given file.
pub(crate) fn uncovered_ranges(
    pairs: &[BlockPair],
    file: FileId,
    line_count: u32,
    side: Side,
) -> Vec<FileRange> {
    uncovered(pairs, line_count, side)
        .into_iter()
        .map(|(start, len)| FileRange::new(file, start, len))
        .collect()
}

/// Converts every remaining gap into Mismatch pairs, then verifies that no
/// line of either file is left unaccounted for.
pub(crate) fn fill_gaps(
    pairs: &mut Vec<BlockPair>,
    line_count_a: u32,
    line_count_b: u32,
) -> Result<(), DiffError> {
    let fills = plan_fills(pairs, line_count_a, line_count_b);
    pairs.extend(fills);

    let uncovered_b = uncovered(pairs, line_count_b, Side::B);
    if !uncovered_b.is_empty() {
        return Err(DiffError::Internal {
            message: format!("gap fill left B lines uncovered: {uncovered_b:?}"),
            pairs_dump: dump_pairs(pairs),
        });
    }
    let uncovered_a = uncovered(pairs, line_count_a, Side::A);
    if !uncovered_a.is_empty() {
        return Err(DiffError::Internal {
            message: format!("gap fill left A lines uncovered: {uncovered_a:?}"),
            pairs_dump: dump_pairs(pairs),
        });
    }
    Ok(())
}

fn plan_fills(pairs: &[BlockPair], line_count_a: u32, line_count_b: u32) -> Vec<BlockPair> {
    let mut skeleton: Vec<&BlockPair> = pairs.iter().filter(|p| p.is_in_order()).collect();
    skeleton.sort_by_key(|p| (p.a_start, p.b_start));
    debug_assert!(
        skeleton
            .windows(2)
            .all(|w| w[0].b_end() <= w[1].b_start),
        "in-order pairs must be monotone in B"
    );

    let holes_a = uncovered(pairs, line_count_a, Side::A);
    let holes_b = uncovered(pairs, line_count_b, Side::B);

    let mut fills = Vec::new();
    let mut ia = 0usize;
    let mut ib = 0usize;

    // One extra iteration with a virtual end-of-file skeleton pair.
    for window_idx in 0..=skeleton.len() {
        let (window_a_end, window_b_end) = skeleton
            .get(window_idx)
            .map(|p| (p.a_start, p.b_start))
            .unwrap_or((line_count_a, line_count_b));

        let mut window_holes_a = Vec::new();
        while ia < holes_a.len() && holes_a[ia].0 < window_a_end {
            window_holes_a.push(holes_a[ia]);
            ia += 1;
        }
        let mut window_holes_b = Vec::new();
        while ib < holes_b.len() && holes_b[ib].0 < window_b_end {
            window_holes_b.push(holes_b[ib]);
            ib += 1;
        }

        let shared = window_holes_a.len().min(window_holes_b.len());
        let mut b_cursor = window_b_end;
        for k in 0..shared {
            let (a_start, a_len) = window_holes_a[k];
            let (b_start, b_len) = window_holes_b[k];
            fills.push(BlockPair::mismatch(a_start, a_len, b_start, b_len));
            b_cursor = b_start + b_len;
        }
        // Leftover A holes are deletions anchored at the last consumed B
        // position; leftover B holes are insertions at the window's A end.
        for &(a_start, a_len) in &window_holes_a[shared..] {
            fills.push(BlockPair::mismatch(a_start, a_len, b_cursor.min(window_b_end), 0));
        }
        for &(b_start, b_len) in &window_holes_b[shared..] {
            fills.push(BlockPair::mismatch(window_a_end, 0, b_start, b_len));
        }
    }

    fills
}
