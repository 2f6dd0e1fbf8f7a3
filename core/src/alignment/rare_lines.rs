//! Rare-line candidate selection.
//!
//! Lines whose hash occurs rarely enough in the region under consideration
//! are trustworthy alignment anchors; everything else (braces, blanks,
//! boilerplate) is noise the LCS must not see. Selection is scoped to a range
//! pair: a hash qualifies when its occurrence count in each range is within
//! `[1, max_rare_occurrences]`, with optionally equal counts on both sides.
//! Lines flagged probably-common, or too frequent in the whole file, never
//! qualify no matter how rare they are in range.

use crate::config::DifferencerConfig;
use crate::range::{FileRange, FileRangePair, HashIndex, HashKind, align_hash};
use crate::source::FileArena;

/// Range-order-preserving candidate subsequences, as absolute line indices.
/// Both sides empty means nothing more can be aligned in this region.
#[derive(Debug, Default)]
pub(crate) struct RareLines {
    pub a: Vec<u32>,
    pub b: Vec<u32>,
}

impl RareLines {
    pub(crate) fn is_empty(&self) -> bool {
        self.a.is_empty() || self.b.is_empty()
    }
}

pub(crate) fn alignment_hash_kind(config: &DifferencerConfig) -> HashKind {
    if config.align_normalized_lines {
        HashKind::Normalized
    } else {
        HashKind::Full
    }
}

/// Selects the rare-line subsequences of a range pair.
pub(crate) fn select_rare_lines(
    arena: &FileArena,
    pair: &FileRangePair,
    config: &DifferencerConfig,
) -> RareLines {
    let kind = alignment_hash_kind(config);
    let index_a = HashIndex::build(arena, pair.a, kind);
    let index_b = HashIndex::build(arena, pair.b, kind);

    let qualifies = |hash: u32| -> bool {
        let count_a = index_a.occurrences(hash);
        let count_b = index_b.occurrences(hash);
        if count_a == 0 || count_b == 0 {
            return false;
        }
        if count_a > config.max_rare_occurrences || count_b > config.max_rare_occurrences {
            return false;
        }
        !(config.require_same_rarity && count_a != count_b)
    };

    let select_side = |range: FileRange| -> Vec<u32> {
        arena
            .range_lines(range)
            .iter()
            .enumerate()
            .filter(|(_, line)| {
                !line.probably_common
                    && (line.normalized_occurrences as u32) <= config.max_file_occurrences
                    && qualifies(align_hash(line, kind))
            })
            .map(|(offset, _)| range.start + offset as u32)
            .collect()
    };

    RareLines {
        a: select_side(pair.a),
        b: select_side(pair.b),
    }
}

/// Absolute indices of the lines in one range that are rare within it.
/// Used to decide whether a gap is substantial enough for move detection.
pub(crate) fn rare_in_range(
    arena: &FileArena,
    range: FileRange,
    config: &DifferencerConfig,
) -> Vec<u32> {
    let kind = alignment_hash_kind(config);
    let index = HashIndex::build(arena, range, kind);

    arena
        .range_lines(range)
        .iter()
        .enumerate()
        .filter(|(_, line)| {
            !line.probably_common
                && (line.normalized_occurrences as u32) <= config.max_file_occurrences
                && index.occurrences(align_hash(line, kind)) <= config.max_rare_occurrences
        })
        .map(|(offset, _)| range.start + offset as u32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashSeed;
    use crate::source::{FileArena, FileId, SourceFile};

    fn arena_pair(a: &str, b: &str) -> (FileArena, FileId, FileId) {
        let seed = HashSeed::from_u64(23);
        let mut arena = FileArena::new();
        let fa = arena.add(SourceFile::from_bytes("a", a.as_bytes().to_vec(), seed).unwrap());
        let fb = arena.add(SourceFile::from_bytes("b", b.as_bytes().to_vec(), seed).unwrap());
        (arena, fa, fb)
    }

    fn whole_pair(arena: &FileArena, a: FileId, b: FileId) -> FileRangePair {
        FileRangePair::new(FileRange::whole(arena, a), FileRange::whole(arena, b))
    }

    #[test]
    fn unique_lines_are_selected_on_both_sides() {
        let (arena, a, b) = arena_pair(
            "first_unique\nsecond_unique\n",
            "second_unique\nfirst_unique\n",
        );
        let pair = whole_pair(&arena, a, b);
        let rare = select_rare_lines(&arena, &pair, &DifferencerConfig::default());
        assert_eq!(rare.a, vec![0, 1]);
        assert_eq!(rare.b, vec![0, 1]);
    }

    #[test]
    fn blank_and_brace_lines_never_qualify() {
        let (arena, a, b) = arena_pair("\n}\nunique_payload\n", "\n}\nunique_payload\n");
        let pair = whole_pair(&arena, a, b);
        let rare = select_rare_lines(&arena, &pair, &DifferencerConfig::default());
        assert_eq!(rare.a, vec![2]);
        assert_eq!(rare.b, vec![2]);
    }

    #[test]
    fn hash_absent_on_one_side_does_not_qualify() {
        let (arena, a, b) = arena_pair("only_in_a\nshared_line\n", "shared_line\nonly_in_b\n");
        let pair = whole_pair(&arena, a, b);
        let rare = select_rare_lines(&arena, &pair, &DifferencerConfig::default());
        assert_eq!(rare.a, vec![1]);
        assert_eq!(rare.b, vec![0]);
    }

    #[test]
    fn repeated_lines_exceeding_cap_are_excluded() {
        let (arena, a, b) = arena_pair(
            "dup_line\ndup_line\nanchor_line\n",
            "dup_line\ndup_line\nanchor_line\n",
        );
        let pair = whole_pair(&arena, a, b);
        let rare = select_rare_lines(&arena, &pair, &DifferencerConfig::default());
        // max_rare_occurrences = 1: the duplicated line is out.
        assert_eq!(rare.a, vec![2]);

        let config = DifferencerConfig::builder()
            .max_rare_occurrences(2)
            .build()
            .unwrap();
        let rare = select_rare_lines(&arena, &pair, &config);
        assert_eq!(rare.a, vec![0, 1, 2]);
    }

    #[test]
    fn same_rarity_requirement_filters_uneven_counts() {
        let (arena, a, b) = arena_pair("twice\ntwice\n", "twice\n");
        let pair = whole_pair(&arena, a, b);
        let config = DifferencerConfig::builder()
            .max_rare_occurrences(2)
            .build()
            .unwrap();
        let rare = select_rare_lines(&arena, &pair, &config);
        assert!(rare.is_empty());

        let config = DifferencerConfig::builder()
            .max_rare_occurrences(2)
            .require_same_rarity(false)
            .build()
            .unwrap();
        let rare = select_rare_lines(&arena, &pair, &config);
        assert_eq!(rare.a, vec![0, 1]);
        assert_eq!(rare.b, vec![0]);
    }

    #[test]
    fn rare_in_range_is_scoped_to_the_range() {
        let (arena, a, _) = arena_pair("rep\nrep\nrep\nlone_line\n", "x\n");
        let config = DifferencerConfig::default();
        let whole = FileRange::whole(&arena, a);
        assert_eq!(rare_in_range(&arena, whole, &config), vec![3]);
        // Inside a narrower range the repeated line becomes unique.
        let sub = FileRange::new(a, 2, 2);
        assert_eq!(rare_in_range(&arena, sub, &config), vec![2, 3]);
    }
}
