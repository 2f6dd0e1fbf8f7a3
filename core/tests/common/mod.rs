//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use text_diff::{Alignment, BlockPair, DiffSession, DifferencerConfig, FileId};

pub fn session_pair(a: &str, b: &str) -> (DiffSession, FileId, FileId) {
    let mut session = DiffSession::new();
    let fa = session
        .add_file("a", a.as_bytes().to_vec())
        .expect("file a should load");
    let fb = session
        .add_file("b", b.as_bytes().to_vec())
        .expect("file b should load");
    (session, fa, fb)
}

pub fn diff_texts(a: &str, b: &str, config: &DifferencerConfig) -> Alignment {
    let (session, fa, fb) = session_pair(a, b);
    session.diff(fa, fb, config).expect("diff should succeed")
}

/// Re-derives the tiling invariant from scratch: every line of A covered by
/// exactly one non-copy pair, every line of B by exactly one pair.
pub fn assert_tiling(alignment: &Alignment, line_count_a: u32, line_count_b: u32) {
    let mut covered_a = vec![0u32; line_count_a as usize];
    let mut covered_b = vec![0u32; line_count_b as usize];

    for pair in &alignment.pairs {
        if !pair.is_copy {
            for idx in pair.a_start..pair.a_end() {
                covered_a[idx as usize] += 1;
            }
        }
        for idx in pair.b_start..pair.b_end() {
            covered_b[idx as usize] += 1;
        }
    }

    for (idx, &count) in covered_a.iter().enumerate() {
        assert_eq!(count, 1, "A line {idx} covered {count} times: {:?}", alignment.pairs);
    }
    for (idx, &count) in covered_b.iter().enumerate() {
        assert_eq!(count, 1, "B line {idx} covered {count} times: {:?}", alignment.pairs);
    }
}

pub fn sorted_by_a(pairs: &[BlockPair]) -> bool {
    pairs.windows(2).all(|w| w[0].a_start <= w[1].a_start)
}

/// Builds a numbered synthetic file: `line_000`, `line_001`, ...
pub fn numbered_lines(range: std::ops::Range<u32>) -> String {
    range.map(|i| format!("line_{i:03}\n")).collect()
}
