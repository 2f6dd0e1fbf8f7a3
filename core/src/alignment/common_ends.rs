//! Greedy matching of the common prefix and suffix of a range pair.
//!
//! Finds the longest run at the start where corresponding lines hash equal
//! (exact or normalized, per call), symmetrically for the end, and produces
//! at most one prefix and one suffix pair. Prefix and suffix searches never
//! overlap: together they consume at most `min(len_a, len_b)` lines.
//!
//! When a non-empty middle gap remains, backoff gives boundary lines back:
//! trailing prefix lines and leading suffix lines that are blank, brace-like,
//! or otherwise too common are shed so that, e.g., a stray `}` is not glued
//! to the wrong neighboring function after an insertion. Backoff only
//! shrinks matches and only touches lines adjacent to the gap.

use crate::block::BlockPair;
use crate::config::DifferencerConfig;
use crate::range::{FileRangePair, HashKind, align_hash};
use crate::source::{FileArena, Line};

#[derive(Debug)]
pub(crate) struct CommonEnds {
    pub prefix: Option<BlockPair>,
    pub suffix: Option<BlockPair>,
    /// What remains between the matched ends. Empty on an "all lines equal"
    /// call; unchanged from the input when nothing matched.
    pub middle: FileRangePair,
}

/// Matches the common ends of `pair` on the given hash kind, then applies
/// backoff against the remaining gap.
pub(crate) fn match_common_ends(
    arena: &FileArena,
    pair: FileRangePair,
    kind: HashKind,
    config: &DifferencerConfig,
) -> CommonEnds {
    let a_lines = arena.range_lines(pair.a);
    let b_lines = arena.range_lines(pair.b);
    let limit = pair.common_limit() as usize;

    let mut prefix_len = 0usize;
    while prefix_len < limit
        && align_hash(&a_lines[prefix_len], kind) == align_hash(&b_lines[prefix_len], kind)
    {
        prefix_len += 1;
    }

    let suffix_limit = limit - prefix_len;
    let mut suffix_len = 0usize;
    while suffix_len < suffix_limit
        && align_hash(&a_lines[a_lines.len() - 1 - suffix_len], kind)
            == align_hash(&b_lines[b_lines.len() - 1 - suffix_len], kind)
    {
        suffix_len += 1;
    }

    let mut ends = Ends {
        prefix_len: prefix_len as u32,
        suffix_len: suffix_len as u32,
    };

    back_off_common_boundaries(a_lines, b_lines, &mut ends, config);

    build_result(pair, kind, ends)
}

struct Ends {
    prefix_len: u32,
    suffix_len: u32,
}

fn back_off_common_boundaries(
    a_lines: &[Line],
    b_lines: &[Line],
    ends: &mut Ends,
    config: &DifferencerConfig,
) {
    let gap_a = a_lines.len() as u32 - ends.prefix_len - ends.suffix_len;
    let gap_b = b_lines.len() as u32 - ends.prefix_len - ends.suffix_len;
    if gap_a == 0 && gap_b == 0 {
        return;
    }

    while ends.prefix_len > 0 {
        let idx = (ends.prefix_len - 1) as usize;
        if !is_backoff_common(&a_lines[idx], &b_lines[idx], config) {
            break;
        }
        ends.prefix_len -= 1;
    }

    while ends.suffix_len > 0 {
        let a_idx = a_lines.len() - ends.suffix_len as usize;
        let b_idx = b_lines.len() - ends.suffix_len as usize;
        if !is_backoff_common(&a_lines[a_idx], &b_lines[b_idx], config) {
            break;
        }
        ends.suffix_len -= 1;
    }
}

fn is_backoff_common(a: &Line, b: &Line, config: &DifferencerConfig) -> bool {
    let cap = config.common_ends_backoff_occurrences;
    a.probably_common
        || b.probably_common
        || a.normalized_occurrences as u32 > cap
        || b.normalized_occurrences as u32 > cap
}

fn build_result(pair: FileRangePair, kind: HashKind, ends: Ends) -> CommonEnds {
    let kind_pair = |a_start: u32, b_start: u32, len: u32| match kind {
        HashKind::Full => BlockPair::exact(a_start, b_start, len),
        HashKind::Normalized => BlockPair::normalized(a_start, b_start, len),
    };

    let prefix = (ends.prefix_len > 0)
        .then(|| kind_pair(pair.a.start, pair.b.start, ends.prefix_len));
    let suffix = (ends.suffix_len > 0).then(|| {
        kind_pair(
            pair.a.end() - ends.suffix_len,
            pair.b.end() - ends.suffix_len,
            ends.suffix_len,
        )
    });

    let middle = FileRangePair::new(
        pair.a.shrink_front(ends.prefix_len).shrink_back(ends.suffix_len),
        pair.b.shrink_front(ends.prefix_len).shrink_back(ends.suffix_len),
    );

    CommonEnds {
        prefix,
        suffix,
        middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashing::HashSeed;
    use crate::range::FileRange;
    use crate::source::{FileArena, FileId, SourceFile};

    fn arena_pair(a: &str, b: &str) -> (FileArena, FileId, FileId) {
        let seed = HashSeed::from_u64(11);
        let mut arena = FileArena::new();
        let fa = arena.add(SourceFile::from_bytes("a", a.as_bytes().to_vec(), seed).unwrap());
        let fb = arena.add(SourceFile::from_bytes("b", b.as_bytes().to_vec(), seed).unwrap());
        (arena, fa, fb)
    }

    fn whole_pair(arena: &FileArena, a: FileId, b: FileId) -> FileRangePair {
        FileRangePair::new(FileRange::whole(arena, a), FileRange::whole(arena, b))
    }

    #[test]
    fn identical_files_yield_one_covering_pair() {
        let (arena, a, b) = arena_pair("one\ntwo\nthree\n", "one\ntwo\nthree\n");
        let config = DifferencerConfig::default();
        let ends = match_common_ends(&arena, whole_pair(&arena, a, b), HashKind::Full, &config);

        let prefix = ends.prefix.expect("prefix pair");
        assert_eq!((prefix.a_start, prefix.a_len), (0, 3));
        assert!(ends.suffix.is_none());
        assert!(ends.middle.is_empty());
    }

    #[test]
    fn prefix_and_suffix_bracket_a_change() {
        let (arena, a, b) = arena_pair(
            "intro_alpha\nmid_old\noutro_omega\n",
            "intro_alpha\nmid_new\noutro_omega\n",
        );
        let config = DifferencerConfig::default();
        let ends = match_common_ends(&arena, whole_pair(&arena, a, b), HashKind::Full, &config);

        assert_eq!(ends.prefix.unwrap().a_len, 1);
        let suffix = ends.suffix.unwrap();
        assert_eq!((suffix.a_start, suffix.b_start, suffix.a_len), (2, 2, 1));
        assert_eq!(ends.middle.a.start, 1);
        assert_eq!(ends.middle.a.len, 1);
        assert_eq!(ends.middle.b.len, 1);
    }

    #[test]
    fn no_match_returns_ranges_unchanged() {
        let (arena, a, b) = arena_pair("aaa_line\n", "zzz_line\n");
        let config = DifferencerConfig::default();
        let pair = whole_pair(&arena, a, b);
        let ends = match_common_ends(&arena, pair, HashKind::Full, &config);

        assert!(ends.prefix.is_none());
        assert!(ends.suffix.is_none());
        assert_eq!(ends.middle, pair);
    }

    #[test]
    fn prefix_and_suffix_never_overlap() {
        // B repeats A's only line; prefix takes it, suffix must not.
        let (arena, a, b) = arena_pair("same_line\n", "same_line\nsame_line\n");
        let config = DifferencerConfig::default();
        let ends = match_common_ends(&arena, whole_pair(&arena, a, b), HashKind::Full, &config);

        let total = ends.prefix.map_or(0, |p| p.a_len) + ends.suffix.map_or(0, |p| p.a_len);
        assert_eq!(total, 1);
    }

    #[test]
    fn normalized_mode_matches_reindented_lines() {
        let (arena, a, b) = arena_pair("  value += 1;\n", "\tvalue += 1;\n");
        let config = DifferencerConfig::default();
        let ends =
            match_common_ends(&arena, whole_pair(&arena, a, b), HashKind::Normalized, &config);

        let prefix = ends.prefix.expect("normalized prefix");
        assert_eq!(prefix.a_len, 1);
        assert_eq!(prefix.kind, crate::block::MatchKind::NormalizedMatch);
    }

    #[test]
    fn backoff_sheds_trailing_brace_before_a_gap() {
        // The `}` belongs to the old function but would otherwise glue to the
        // inserted one.
        let (arena, a, b) = arena_pair(
            "fn first_fn() {\n  body_one();\n}\n",
            "fn first_fn() {\n  body_one();\n}\nfn second_fn() {\n  body_two();\n}\n",
        );
        let config = DifferencerConfig::default();
        let ends = match_common_ends(&arena, whole_pair(&arena, a, b), HashKind::Full, &config);

        // Prefix stops before the common `}`; the brace is left to the gap.
        assert_eq!(ends.prefix.unwrap().a_len, 2);
        assert!(ends.middle.a.contains(2));
    }

    #[test]
    fn backoff_does_not_fire_without_a_gap() {
        let (arena, a, b) = arena_pair("alpha\n}\n", "alpha\n}\n");
        let config = DifferencerConfig::default();
        let ends = match_common_ends(&arena, whole_pair(&arena, a, b), HashKind::Full, &config);

        assert_eq!(ends.prefix.unwrap().a_len, 2);
        assert!(ends.middle.is_empty());
    }
}
