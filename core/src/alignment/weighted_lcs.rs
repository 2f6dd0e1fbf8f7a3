//! Weighted longest-common-subsequence alignment.
//!
//! A maximum-weight common subsequence over a fractional similarity function:
//! exact-hash equality scores 1.0, normalized-only equality scores the
//! configured `lcs_normalized_similarity`, anything else 0 (no match).
//! O(n*m) time and space; callers invoke it on rare-line-filtered
//! subsequences, not whole files.
//!
//! Backtracking prefers moving up (advancing A) over moving left (advancing
//! B) over taking the diagonal, applied uniformly so ties resolve the same
//! way on every run.

use crate::config::DifferencerConfig;
use crate::source::{FileArena, FileId, Line};

/// Computes the maximum-weight common subsequence of two abstract sequences.
/// Returns matched index pairs, strictly increasing on both sides.
pub(crate) fn weighted_lcs(
    n: usize,
    m: usize,
    sim: impl Fn(usize, usize) -> f64,
) -> Vec<(u32, u32)> {
    if n == 0 || m == 0 {
        return Vec::new();
    }

    let width = m + 1;
    let mut table = vec![0.0f64; (n + 1) * width];
    for i in 0..n {
        for j in 0..m {
            let skip_a = table[i * width + (j + 1)];
            let skip_b = table[(i + 1) * width + j];
            let mut best = skip_a.max(skip_b);
            let s = sim(i, j);
            if s > 0.0 {
                best = best.max(table[i * width + j] + s);
            }
            table[(i + 1) * width + (j + 1)] = best;
        }
    }

    let mut matches = Vec::new();
    let mut i = n;
    let mut j = m;
    while i > 0 && j > 0 {
        let here = table[i * width + j];
        if here == table[(i - 1) * width + j] {
            i -= 1;
        } else if here == table[i * width + (j - 1)] {
            j -= 1;
        } else {
            matches.push(((i - 1) as u32, (j - 1) as u32));
            i -= 1;
            j -= 1;
        }
    }

    matches.reverse();
    matches
}

/// Similarity of two lines under the configured alignment policy.
pub(crate) fn line_similarity(a: &Line, b: &Line, config: &DifferencerConfig) -> f64 {
    if a.full_hash == b.full_hash {
        1.0
    } else if config.align_normalized_lines && a.normalized_hash == b.normalized_hash {
        config.lcs_normalized_similarity
    } else {
        0.0
    }
}

/// Aligns two candidate subsequences given as absolute line indices; returns
/// matched absolute index pairs.
pub(crate) fn align_line_indices(
    arena: &FileArena,
    file_a: FileId,
    file_b: FileId,
    a_indices: &[u32],
    b_indices: &[u32],
    config: &DifferencerConfig,
) -> Vec<(u32, u32)> {
    let fa = arena.file(file_a);
    let fb = arena.file(file_b);
    let sim = |i: usize, j: usize| {
        line_similarity(fa.line(a_indices[i]), fb.line(b_indices[j]), config)
    };

    weighted_lcs(a_indices.len(), b_indices.len(), sim)
        .into_iter()
        .map(|(i, j)| (a_indices[i as usize], b_indices[j as usize]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashSeed;
    use crate::source::{FileArena, SourceFile};

    fn sim_from<'a>(table: &'a [&'a [f64]]) -> impl Fn(usize, usize) -> f64 + 'a {
        |i, j| table[i][j]
    }

    #[test]
    fn empty_sequences_match_nothing() {
        assert!(weighted_lcs(0, 5, |_, _| 1.0).is_empty());
        assert!(weighted_lcs(5, 0, |_, _| 1.0).is_empty());
    }

    #[test]
    fn full_equality_matches_everything() {
        let matches = weighted_lcs(3, 3, |i, j| if i == j { 1.0 } else { 0.0 });
        assert_eq!(matches, vec![(0, 0), (1, 1), (2, 2)]);
    }

    #[test]
    fn picks_the_heavier_of_two_crossing_matches() {
        // (0,1) and (1,0) cross; only one can be kept. Weight decides.
        let weights: &[&[f64]] = &[&[0.0, 0.4], &[1.0, 0.0]];
        let matches = weighted_lcs(2, 2, sim_from(weights));
        assert_eq!(matches, vec![(1, 0)]);
    }

    #[test]
    fn fractional_pair_beats_nothing_but_not_a_full_pair() {
        // A fractional match on (0,0) plus full on (1,1) beats full on (1,0).
        let weights: &[&[f64]] = &[&[0.5, 0.0], &[1.0, 1.0]];
        let matches = weighted_lcs(2, 2, sim_from(weights));
        assert_eq!(matches, vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn matches_are_strictly_increasing_on_both_sides() {
        let matches = weighted_lcs(4, 4, |i, j| if (i + j) % 2 == 0 { 1.0 } else { 0.0 });
        for win in matches.windows(2) {
            assert!(win[0].0 < win[1].0);
            assert!(win[0].1 < win[1].1);
        }
    }

    #[test]
    fn line_similarity_grades_exact_normalized_none() {
        let seed = HashSeed::from_u64(5);
        let mut arena = FileArena::new();
        let a = arena.add(
            SourceFile::from_bytes("a", b"same\n  tabbed\nonly_a\n".to_vec(), seed).unwrap(),
        );
        let b = arena.add(
            SourceFile::from_bytes("b", b"same\n\ttabbed\nonly_b\n".to_vec(), seed).unwrap(),
        );
        let config = DifferencerConfig::default();
        let fa = arena.file(a);
        let fb = arena.file(b);

        assert_eq!(line_similarity(fa.line(0), fb.line(0), &config), 1.0);
        assert_eq!(
            line_similarity(fa.line(1), fb.line(1), &config),
            config.lcs_normalized_similarity
        );
        assert_eq!(line_similarity(fa.line(2), fb.line(2), &config), 0.0);
    }

    #[test]
    fn align_line_indices_returns_absolute_positions() {
        let seed = HashSeed::from_u64(6);
        let mut arena = FileArena::new();
        let a = arena.add(
            SourceFile::from_bytes("a", b"pad\nanchor_one\npad\nanchor_two\n".to_vec(), seed)
                .unwrap(),
        );
        let b = arena.add(
            SourceFile::from_bytes("b", b"anchor_one\npad\npad\nanchor_two\n".to_vec(), seed)
                .unwrap(),
        );
        let config = DifferencerConfig::default();
        let matches = align_line_indices(&arena, a, b, &[1, 3], &[0, 3], &config);
        assert_eq!(matches, vec![(1, 0), (3, 3)]);
    }
}
