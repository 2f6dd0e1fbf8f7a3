//! Splitting mixed matches and combining adjacent pairs.
//!
//! Matching runs at hash granularity, so a pair recorded as a normalized
//! match may line-by-line be a mix of exact and normalized-only equalities.
//! Before final output every normalized pair is re-scanned and split into
//! maximal homogeneous runs. Afterwards, adjacent pairs sharing the same
//! classification and contiguous indices on both sides are merged; the merge
//! runs once sorted by A and once sorted by B to catch all adjacencies.

use crate::block::{BlockPair, MatchKind};
use crate::source::{FileArena, FileId};

/// Splits every normalized-match pair into runs that are homogeneously exact
/// or homogeneously normalized.
pub(crate) fn split_mixed_pairs(
    arena: &FileArena,
    file_a: FileId,
    file_b: FileId,
    pairs: &mut Vec<BlockPair>,
) {
    let fa = arena.file(file_a);
    let fb = arena.file(file_b);

    let mut result = Vec::with_capacity(pairs.len());
    for pair in pairs.drain(..) {
        if pair.kind != MatchKind::NormalizedMatch {
            result.push(pair);
            continue;
        }

        debug_assert_eq!(pair.a_len, pair.b_len, "matches are 1:1");
        let mut run_start = 0u32;
        let mut run_exact =
            fa.line(pair.a_start).full_hash == fb.line(pair.b_start).full_hash;
        for offset in 1..=pair.a_len {
            let exact = offset < pair.a_len
                && fa.line(pair.a_start + offset).full_hash
                    == fb.line(pair.b_start + offset).full_hash;
            if offset < pair.a_len && exact == run_exact {
                continue;
            }
            let run = BlockPair {
                a_start: pair.a_start + run_start,
                a_len: offset - run_start,
                b_start: pair.b_start + run_start,
                b_len: offset - run_start,
                kind: if run_exact {
                    MatchKind::ExactMatch
                } else {
                    MatchKind::NormalizedMatch
                },
                ..pair
            };
            result.push(run);
            run_start = offset;
            run_exact = exact;
        }
    }

    *pairs = result;
}

/// Merges adjacent same-class pairs, first in A order then in B order.
pub(crate) fn combine_adjacent(pairs: &mut Vec<BlockPair>) {
    merge_sorted_by(pairs, |p| (p.a_start, p.b_start));
    merge_sorted_by(pairs, |p| (p.b_start, p.a_start));
    pairs.sort_by_key(|p| (p.a_start, p.b_start));
}

fn merge_sorted_by(pairs: &mut Vec<BlockPair>, key: impl Fn(&BlockPair) -> (u32, u32)) {
    pairs.sort_by_key(|p| key(p));

    let mut merged: Vec<BlockPair> = Vec::with_capacity(pairs.len());
    for pair in pairs.drain(..) {
        if let Some(last) = merged.last_mut()
            && can_merge(last, &pair)
        {
            last.a_len += pair.a_len;
            last.b_len += pair.b_len;
        } else {
            merged.push(pair);
        }
    }

    *pairs = merged;
}

fn can_merge(left: &BlockPair, right: &BlockPair) -> bool {
    left.kind == right.kind
        && left.is_move == right.is_move
        && left.is_copy == right.is_copy
        && left.a_end() == right.a_start
        && left.b_end() == right.b_start
}
