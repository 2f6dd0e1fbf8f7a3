//! The phased alignment pipeline.
//!
//! 1. Match common ends (with backoff) over the whole file pair.
//! 2. Weighted-LCS-align the remaining middle on rare lines, then re-run
//!    common-ends matching on the newly exposed sub-gaps.
//! 3. Iterate move detection to a fixpoint.
//! 4. Run copy detection once.
//! 5. Split mixed normalized matches into homogeneous runs.
//! 6. Fill every remaining gap with explicit mismatch pairs.
//! 7. Combine adjacent same-class pairs, sorted by A then by B.
//!
//! The finished pairs must tile both files; [`crate::block::validate_tiling`]
//! runs before anything is returned and turns a violation into a fatal
//! internal error carrying the offending state.

use crate::alignment::{combine, common_ends, gaps, move_policy, rare_lines, weighted_lcs};
use crate::block::{self, BlockPair, runs_from_index_pairs};
use crate::config::DifferencerConfig;
use crate::range::{FileRange, FileRangePair, HashKind};
use crate::report::{Alignment, DiffError, DiffSummary};
use crate::source::{FileArena, FileId};

pub(crate) fn diff_files(
    arena: &FileArena,
    file_a: FileId,
    file_b: FileId,
    config: &DifferencerConfig,
) -> Result<Alignment, DiffError> {
    config.validate()?;

    let line_count_a = arena.file(file_a).line_count();
    let line_count_b = arena.file(file_b).line_count();

    let mut pairs: Vec<BlockPair> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();
    let mut complete = true;

    let whole = FileRangePair::new(
        FileRange::whole(arena, file_a),
        FileRange::whole(arena, file_b),
    );

    let middle = match_ends_into(arena, whole, config, &mut pairs);

    if !middle.is_empty() {
        align_middle(arena, file_a, file_b, middle, config, &mut pairs);
    }

    if config.detect_moves {
        complete &=
            move_policy::detect_moves(arena, file_a, file_b, &mut pairs, config, &mut warnings);
        move_policy::detect_copies(arena, file_a, file_b, &mut pairs, config);
    }

    combine::split_mixed_pairs(arena, file_a, file_b, &mut pairs);

    gaps::fill_gaps(&mut pairs, line_count_a, line_count_b)?;

    combine::combine_adjacent(&mut pairs);

    block::validate_tiling(&pairs, line_count_a, line_count_b)?;

    let summary = DiffSummary {
        complete,
        warnings,
        pair_count: pairs.len(),
    };
    Ok(Alignment { pairs, summary })
}

/// Runs the configured end-matching passes on a range pair, collecting the
/// produced pairs and returning the unmatched middle.
fn match_ends_into(
    arena: &FileArena,
    pair: FileRangePair,
    config: &DifferencerConfig,
    pairs: &mut Vec<BlockPair>,
) -> FileRangePair {
    let mut middle = pair;

    if config.match_ends && middle.common_limit() > 0 {
        let ends = common_ends::match_common_ends(arena, middle, HashKind::Full, config);
        pairs.extend(ends.prefix);
        pairs.extend(ends.suffix);
        middle = ends.middle;
    }

    if config.match_normalized_ends && middle.common_limit() > 0 {
        let ends = common_ends::match_common_ends(arena, middle, HashKind::Normalized, config);
        pairs.extend(ends.prefix);
        pairs.extend(ends.suffix);
        middle = ends.middle;
    }

    middle
}

/// Phase 2: anchor the middle on rare lines via the weighted LCS, then give
/// the sub-gaps between anchors another end-matching pass.
fn align_middle(
    arena: &FileArena,
    file_a: FileId,
    file_b: FileId,
    middle: FileRangePair,
    config: &DifferencerConfig,
    pairs: &mut Vec<BlockPair>,
) {
    if middle.a.is_empty() || middle.b.is_empty() {
        return;
    }

    let (candidates_a, candidates_b) = if config.align_rare_lines {
        let rare = rare_lines::select_rare_lines(arena, &middle, config);
        (rare.a, rare.b)
    } else {
        (
            (middle.a.start..middle.a.end()).collect(),
            (middle.b.start..middle.b.end()).collect(),
        )
    };
    if candidates_a.is_empty() || candidates_b.is_empty() {
        return;
    }

    let matches = weighted_lcs::align_line_indices(
        arena,
        file_a,
        file_b,
        &candidates_a,
        &candidates_b,
        config,
    );
    if matches.is_empty() {
        return;
    }

    for run in runs_from_index_pairs(&matches) {
        pairs.push(move_policy::classify_block(arena, file_a, file_b, run));
    }

    subgap_common_ends(arena, file_a, file_b, config, pairs);
}

/// Walks the windows between in-order pairs and end-matches each one. A
/// single pass suffices: the sub-gaps a match leaves behind start and end at
/// lines that just failed to match.
fn subgap_common_ends(
    arena: &FileArena,
    file_a: FileId,
    file_b: FileId,
    config: &DifferencerConfig,
    pairs: &mut Vec<BlockPair>,
) {
    if !config.match_ends && !config.match_normalized_ends {
        return;
    }

    let line_count_a = arena.file(file_a).line_count();
    let line_count_b = arena.file(file_b).line_count();

    let mut skeleton: Vec<BlockPair> = pairs.iter().filter(|p| p.is_in_order()).copied().collect();
    skeleton.sort_by_key(|p| (p.a_start, p.b_start));

    let mut new_pairs = Vec::new();
    let mut prev_a = 0u32;
    let mut prev_b = 0u32;

    for idx in 0..=skeleton.len() {
        let (next_a, next_b) = skeleton
            .get(idx)
            .map(|p| (p.a_start, p.b_start))
            .unwrap_or((line_count_a, line_count_b));

        let window = FileRangePair::new(
            FileRange::new(file_a, prev_a, next_a - prev_a),
            FileRange::new(file_b, prev_b, next_b - prev_b),
        );
        if !window.a.is_empty() && !window.b.is_empty() {
            match_ends_into(arena, window, config, &mut new_pairs);
        }

        if let Some(p) = skeleton.get(idx) {
            prev_a = p.a_end();
            prev_b = p.b_end();
        }
    }

    pairs.extend(new_pairs);
}
