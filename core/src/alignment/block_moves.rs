//! Block-match extraction strategies for move detection.
//!
//! Two complementary strategies over a pair of line slices:
//!
//! - **Tichy maximal block matching**: for the next unmatched position in B,
//!   find the longest run of B starting there that matches some contiguous
//!   run anywhere in A, emit it, advance past it in B, repeat. Matches are
//!   disjoint in B but may overlap in A. O(n*m) worst case; inputs are gap
//!   slices, not whole files.
//! - **Patience-style unique-line LCS with growth**: anchor on lines whose
//!   hash occurs equally rarely on both sides (starting from unique,
//!   widening the rarity cap when too few anchors exist), keep the longest
//!   chain preserving relative order via patience piles, then grow each
//!   anchor backward and forward while adjacent lines still hash-equal.
//!
//! Both return [`BlockMatch`]es in slice-local index space.

use rustc_hash::FxHashMap;

use crate::block::BlockMatch;
use crate::config::DifferencerConfig;
use crate::range::{HashKind, align_hash};
use crate::source::Line;

/// Tichy maximal block matching of `b` against `a`.
pub(crate) fn tichy_matches(
    a: &[Line],
    b: &[Line],
    kind: HashKind,
    min_len: u32,
) -> Vec<BlockMatch> {
    let mut positions: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
    for (idx, line) in a.iter().enumerate() {
        positions
            .entry(align_hash(line, kind))
            .or_default()
            .push(idx as u32);
    }

    let mut matches = Vec::new();
    let mut b_pos = 0usize;
    while b_pos < b.len() {
        let hash = align_hash(&b[b_pos], kind);
        let mut best: Option<BlockMatch> = None;

        for &a_start in positions.get(&hash).map(Vec::as_slice).unwrap_or(&[]) {
            let mut len = 0usize;
            while a_start as usize + len < a.len()
                && b_pos + len < b.len()
                && align_hash(&a[a_start as usize + len], kind)
                    == align_hash(&b[b_pos + len], kind)
            {
                len += 1;
            }
            // Strictly-longer keeps the earliest A start on equal lengths.
            if best.as_ref().is_none_or(|m| len as u32 > m.len) {
                best = Some(BlockMatch {
                    a: a_start,
                    b: b_pos as u32,
                    len: len as u32,
                });
            }
        }

        match best {
            Some(m) if m.len >= min_len => {
                b_pos += m.len as usize;
                matches.push(m);
            }
            _ => b_pos += 1,
        }
    }

    matches
}

/// Patience-style anchoring with block growth.
pub(crate) fn patience_matches(
    a: &[Line],
    b: &[Line],
    kind: HashKind,
    config: &DifferencerConfig,
) -> Vec<BlockMatch> {
    let anchors = rare_anchors(a, b, kind, config);
    if anchors.is_empty() {
        return Vec::new();
    }

    let chain = longest_ordered_chain(anchors);
    grow_anchors(a, b, kind, &chain)
}

/// Pairs the k-th occurrence in A with the k-th in B for every hash that is
/// equally rare on both sides, widening the rarity cap until enough anchors
/// exist or the cap is exhausted.
fn rare_anchors(
    a: &[Line],
    b: &[Line],
    kind: HashKind,
    config: &DifferencerConfig,
) -> Vec<(u32, u32)> {
    let mut positions_a: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
    for (idx, line) in a.iter().enumerate() {
        positions_a
            .entry(align_hash(line, kind))
            .or_default()
            .push(idx as u32);
    }
    let mut positions_b: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
    for (idx, line) in b.iter().enumerate() {
        positions_b
            .entry(align_hash(line, kind))
            .or_default()
            .push(idx as u32);
    }

    let mut cap = config.patience_initial_rarity;
    loop {
        // Walk B in order so anchor output is deterministic.
        let mut anchors = Vec::new();
        let mut seen: FxHashMap<u32, usize> = FxHashMap::default();
        for (b_idx, line) in b.iter().enumerate() {
            let hash = align_hash(line, kind);
            let occurrence = {
                let counter = seen.entry(hash).or_insert(0);
                let current = *counter;
                *counter += 1;
                current
            };
            let Some(in_a) = positions_a.get(&hash) else {
                continue;
            };
            let Some(in_b) = positions_b.get(&hash) else {
                continue;
            };
            if in_a.len() != in_b.len() || in_a.len() as u32 > cap {
                continue;
            }
            anchors.push((in_a[occurrence], b_idx as u32));
        }

        if anchors.len() >= 2 || cap >= config.patience_max_rarity {
            return anchors;
        }
        cap += 1;
    }
}

/// Longest chain of anchors increasing in both coordinates: patience piles
/// with backpointers over the A positions of B-ordered anchors, ties broken
/// by first-found placement.
fn longest_ordered_chain(mut anchors: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    anchors.sort_by_key(|&(_, b)| b);

    let mut piles: Vec<usize> = Vec::new();
    let mut predecessors: Vec<Option<usize>> = vec![None; anchors.len()];

    for (idx, &(a, _)) in anchors.iter().enumerate() {
        let pos = piles
            .binary_search_by_key(&a, |&pile_idx| anchors[pile_idx].0)
            .unwrap_or_else(|insert_pos| insert_pos);

        if pos > 0 {
            predecessors[idx] = Some(piles[pos - 1]);
        }
        if pos == piles.len() {
            piles.push(idx);
        } else {
            piles[pos] = idx;
        }
    }

    let Some(&last) = piles.last() else {
        return Vec::new();
    };

    let mut chain = Vec::new();
    let mut current = last;
    loop {
        chain.push(anchors[current]);
        match predecessors[current] {
            Some(prev) => current = prev,
            None => break,
        }
    }
    chain.reverse();
    chain
}

/// Grows each chained anchor into a block while neighbors hash-equal, never
/// crossing the previous grown block or the next anchor.
fn grow_anchors(a: &[Line], b: &[Line], kind: HashKind, chain: &[(u32, u32)]) -> Vec<BlockMatch> {
    let mut blocks: Vec<BlockMatch> = Vec::new();

    for (idx, &(anchor_a, anchor_b)) in chain.iter().enumerate() {
        let (floor_a, floor_b) = blocks
            .last()
            .map(|m| (m.a + m.len, m.b + m.len))
            .unwrap_or((0, 0));
        let (ceil_a, ceil_b) = chain
            .get(idx + 1)
            .map(|&(na, nb)| (na, nb))
            .unwrap_or((a.len() as u32, b.len() as u32));

        if anchor_a < floor_a || anchor_b < floor_b {
            // Swallowed by the previous block's forward growth.
            continue;
        }

        let mut start_a = anchor_a;
        let mut start_b = anchor_b;
        while start_a > floor_a
            && start_b > floor_b
            && align_hash(&a[(start_a - 1) as usize], kind)
                == align_hash(&b[(start_b - 1) as usize], kind)
        {
            start_a -= 1;
            start_b -= 1;
        }

        let mut end_a = anchor_a + 1;
        let mut end_b = anchor_b + 1;
        while end_a < ceil_a
            && end_b < ceil_b
            && align_hash(&a[end_a as usize], kind) == align_hash(&b[end_b as usize], kind)
        {
            end_a += 1;
            end_b += 1;
        }

        let block = BlockMatch {
            a: start_a,
            b: start_b,
            len: end_a - start_a,
        };

        // Merge with the previous block when growth made them contiguous.
        if let Some(prev) = blocks.last_mut()
            && prev.a + prev.len == block.a
            && prev.b + prev.len == block.b
        {
            prev.len += block.len;
        } else {
            blocks.push(block);
        }
    }

    blocks
}
