//! Move and copy acceptance.
//!
//! Move detection pairs unmatched gaps of A against unmatched gaps of B.
//! Every gap pair is scored by the weighted LCS over its rare lines; a gap
//! of A accepts the single B gap that matches it, or the best-scoring one
//! when several do. Accepting a candidate changes what is uncovered, which
//! can change another gap's rarity, so the phase re-runs until it reaches a
//! fixpoint (bounded by `max_move_iterations`).
//!
//! Copy detection runs after moves settle: a remaining B gap is matched
//! against the *entire* file A, since copied lines need not come from an
//! unmatched region. A copy is kept only when its matched extent in A stays
//! within `max_copy_extent_ratio` times its extent in B, which rejects
//! "matches" scattered coincidentally across unrelated low-rarity lines.

use crate::block::{BlockMatch, BlockPair, runs_from_index_pairs};
use crate::config::{DifferencerConfig, MoveStrategy};
use crate::range::{FileRange, FileRangePair};
use crate::source::{FileArena, FileId};

use super::block_moves::{patience_matches, tichy_matches};
use super::gaps::{Side, uncovered_ranges};
use super::rare_lines::{alignment_hash_kind, rare_in_range, select_rare_lines};
use super::weighted_lcs::align_line_indices;

/// Runs move detection to a fixpoint. Returns `false` (with a warning) when
/// the iteration bound was hit before the fixpoint.
pub(crate) fn detect_moves(
    arena: &FileArena,
    file_a: FileId,
    file_b: FileId,
    pairs: &mut Vec<BlockPair>,
    config: &DifferencerConfig,
    warnings: &mut Vec<String>,
) -> bool {
    let line_count_a = arena.file(file_a).line_count();
    let line_count_b = arena.file(file_b).line_count();

    for _ in 0..config.max_move_iterations {
        let round = run_move_round(
            arena,
            file_a,
            file_b,
            pairs,
            line_count_a,
            line_count_b,
            config,
        );
        if !round.accepted_any && !round.saw_multiple_candidates {
            return true;
        }
    }

    warnings.push(format!(
        "move detection stopped after {} rounds without reaching a fixpoint",
        config.max_move_iterations
    ));
    false
}

struct MoveRound {
    accepted_any: bool,
    saw_multiple_candidates: bool,
}

struct MoveCandidate {
    gap_b: usize,
    matches: Vec<(u32, u32)>,
    matched_lines: u32,
    extent_a: u32,
    extent_b: u32,
    first_a: u32,
}

fn run_move_round(
    arena: &FileArena,
    file_a: FileId,
    file_b: FileId,
    pairs: &mut Vec<BlockPair>,
    line_count_a: u32,
    line_count_b: u32,
    config: &DifferencerConfig,
) -> MoveRound {
    let gaps_a: Vec<FileRange> = uncovered_ranges(pairs, file_a, line_count_a, Side::A)
        .into_iter()
        .filter(|gap| rare_in_range(arena, *gap, config).len() as u32 >= config.min_move_rare_lines)
        .collect();
    let gaps_b: Vec<FileRange> = uncovered_ranges(pairs, file_b, line_count_b, Side::B)
        .into_iter()
        .filter(|gap| rare_in_range(arena, *gap, config).len() as u32 >= config.min_move_rare_lines)
        .collect();

    let mut round = MoveRound {
        accepted_any: false,
        saw_multiple_candidates: false,
    };
    let mut claimed_b = vec![false; gaps_b.len()];

    for gap_a in &gaps_a {
        let mut candidates: Vec<MoveCandidate> = Vec::new();

        for (b_idx, gap_b) in gaps_b.iter().enumerate() {
            if claimed_b[b_idx] {
                continue;
            }
            let range_pair = FileRangePair::new(*gap_a, *gap_b);
            let rare = select_rare_lines(arena, &range_pair, config);
            if rare.is_empty() {
                continue;
            }
            let matches = align_line_indices(arena, file_a, file_b, &rare.a, &rare.b, config);
            let Some((&(first_a, first_b), &(last_a, last_b))) =
                matches.first().zip(matches.last())
            else {
                continue;
            };

            candidates.push(MoveCandidate {
                gap_b: b_idx,
                matched_lines: matches.len() as u32,
                extent_a: last_a - first_a + 1,
                extent_b: last_b - first_b + 1,
                first_a,
                matches,
            });
        }

        if candidates.is_empty() {
            continue;
        }
        if candidates.len() > 1 {
            round.saw_multiple_candidates = true;
        }

        let best = candidates
            .into_iter()
            .min_by_key(|c| {
                (
                    u32::MAX - c.matched_lines,
                    c.extent_a,
                    c.extent_b,
                    c.first_a,
                )
            })
            .expect("candidates is non-empty");

        let gap_b = gaps_b[best.gap_b];
        claimed_b[best.gap_b] = true;
        pairs.extend(extract_move_pairs(arena, *gap_a, gap_b, &best.matches, config));
        round.accepted_any = true;

        if round.saw_multiple_candidates {
            // Coverage changed under a contested choice: recompute gaps and
            // rarity from scratch before judging the remaining gaps.
            break;
        }
    }

    round
}

/// Turns an accepted gap pair into move BlockPairs using the configured
/// extraction strategy, falling back to the scoring LCS runs when the
/// strategy finds nothing.
fn extract_move_pairs(
    arena: &FileArena,
    gap_a: FileRange,
    gap_b: FileRange,
    lcs_matches: &[(u32, u32)],
    config: &DifferencerConfig,
) -> Vec<BlockPair> {
    let kind = alignment_hash_kind(config);
    let a_lines = arena.range_lines(gap_a);
    let b_lines = arena.range_lines(gap_b);

    let local = match config.move_strategy {
        MoveStrategy::Patience => patience_matches(a_lines, b_lines, kind, config),
        MoveStrategy::Tichy => tichy_matches(a_lines, b_lines, kind, 1),
    };

    let mut blocks: Vec<BlockMatch> = local
        .into_iter()
        .map(|m| BlockMatch {
            a: gap_a.start + m.a,
            b: gap_b.start + m.b,
            len: m.len,
        })
        .collect();
    if blocks.is_empty() {
        blocks = runs_from_index_pairs(lcs_matches);
    }

    // Tichy matches may overlap in A; moves must tile, so keep a greedy
    // A-disjoint subset (B-disjointness holds by construction).
    let mut kept: Vec<BlockMatch> = Vec::new();
    for block in blocks {
        let overlaps = kept
            .iter()
            .any(|k| block.a < k.a + k.len && k.a < block.a + block.len);
        if !overlaps {
            kept.push(block);
        }
    }

    kept.into_iter()
        .map(|block| classify_block(arena, gap_a.file, gap_b.file, block).moved())
        .collect()
}

/// Builds an exact or normalized pair for a hash-matched block by checking
/// whether every line also matches on the full hash.
pub(crate) fn classify_block(
    arena: &FileArena,
    file_a: FileId,
    file_b: FileId,
    block: BlockMatch,
) -> BlockPair {
    let fa = arena.file(file_a);
    let fb = arena.file(file_b);
    let all_exact = (0..block.len)
        .all(|k| fa.line(block.a + k).full_hash == fb.line(block.b + k).full_hash);
    if all_exact {
        BlockPair::exact(block.a, block.b, block.len)
    } else {
        BlockPair::normalized(block.a, block.b, block.len)
    }
}

/// Matches remaining B gaps against the whole of A, emitting copy pairs.
pub(crate) fn detect_copies(
    arena: &FileArena,
    file_a: FileId,
    file_b: FileId,
    pairs: &mut Vec<BlockPair>,
    config: &DifferencerConfig,
) {
    let line_count_b = arena.file(file_b).line_count();
    let kind = alignment_hash_kind(config);
    let whole_a = FileRange::whole(arena, file_a);
    let a_lines = arena.range_lines(whole_a);

    let gaps_b = uncovered_ranges(pairs, file_b, line_count_b, Side::B);
    let mut copies = Vec::new();

    for gap_b in gaps_b {
        if (rare_in_range(arena, gap_b, config).len() as u32) < config.min_move_rare_lines {
            continue;
        }
        let b_lines = arena.range_lines(gap_b);
        let matches = tichy_matches(a_lines, b_lines, kind, 1);
        if matches.is_empty() {
            continue;
        }

        let min_a = matches.iter().map(|m| m.a).min().unwrap_or(0);
        let max_a = matches.iter().map(|m| m.a + m.len).max().unwrap_or(0);
        let min_b = matches.iter().map(|m| m.b).min().unwrap_or(0);
        let max_b = matches.iter().map(|m| m.b + m.len).max().unwrap_or(0);
        if max_a - min_a > config.max_copy_extent_ratio * (max_b - min_b) {
            continue;
        }

        for m in matches {
            let block = BlockMatch {
                a: m.a,
                b: gap_b.start + m.b,
                len: m.len,
            };
            copies.push(classify_block(arena, file_a, file_b, block).copied());
        }
    }

    pairs.extend(copies);
}
