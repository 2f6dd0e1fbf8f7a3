//! End-to-end checks of the core alignment guarantees: tiling, identity,
//! single edits, insertions, deletions.

mod common;

use common::{assert_tiling, diff_texts, numbered_lines, sorted_by_a};
use text_diff::{DifferencerConfig, MatchKind};

#[test]
fn identity_produces_one_exact_pair() {
    let text = numbered_lines(0..40);
    let alignment = diff_texts(&text, &text, &DifferencerConfig::default());

    assert_eq!(alignment.pairs.len(), 1);
    let pair = alignment.pairs[0];
    assert_eq!(pair.kind, MatchKind::ExactMatch);
    assert!(!pair.is_move);
    assert_eq!((pair.a_start, pair.a_len, pair.b_start, pair.b_len), (0, 40, 0, 40));
    assert_tiling(&alignment, 40, 40);
}

#[test]
fn single_line_edit_in_the_middle() {
    let a = numbered_lines(0..20);
    let b = a.replace("line_010\n", "edited_line\n");
    let alignment = diff_texts(&a, &b, &DifferencerConfig::default());

    assert_tiling(&alignment, 20, 20);
    assert_eq!(alignment.pairs.len(), 3);
    assert_eq!(alignment.pairs[0].a_len, 10);
    let mid = alignment.pairs[1];
    assert_eq!(mid.kind, MatchKind::Mismatch);
    assert_eq!((mid.a_start, mid.a_len, mid.b_start, mid.b_len), (10, 1, 10, 1));
    assert_eq!(alignment.pairs[2].a_len, 9);
}

#[test]
fn pure_insertion_keeps_a_side_empty() {
    let a = numbered_lines(0..12);
    let inserted = "added_alpha\nadded_beta\nadded_gamma\n";
    let mut b = numbered_lines(0..6);
    b.push_str(inserted);
    b.push_str(&numbered_lines(6..12));

    let alignment = diff_texts(&a, &b, &DifferencerConfig::default());
    assert_tiling(&alignment, 12, 15);

    let insert = alignment
        .pairs
        .iter()
        .find(|p| p.kind == MatchKind::Mismatch)
        .expect("insertion mismatch");
    assert_eq!((insert.a_start, insert.a_len), (6, 0));
    assert_eq!((insert.b_start, insert.b_len), (6, 3));
}

#[test]
fn pure_deletion_keeps_b_side_empty() {
    let a = numbered_lines(0..12);
    let mut b = numbered_lines(0..4);
    b.push_str(&numbered_lines(8..12));

    let alignment = diff_texts(&a, &b, &DifferencerConfig::default());
    assert_tiling(&alignment, 12, 8);

    let delete = alignment
        .pairs
        .iter()
        .find(|p| p.kind == MatchKind::Mismatch)
        .expect("deletion mismatch");
    assert_eq!((delete.a_start, delete.a_len), (4, 4));
    assert_eq!(delete.b_len, 0);
}

#[test]
fn replacement_pairs_both_sides() {
    let a = format!("{}old_impl_one\nold_impl_two\n{}", numbered_lines(0..5), numbered_lines(5..10));
    let b = format!(
        "{}new_impl_one\nnew_impl_two\nnew_impl_three\n{}",
        numbered_lines(0..5),
        numbered_lines(5..10)
    );
    let alignment = diff_texts(&a, &b, &DifferencerConfig::default());
    assert_tiling(&alignment, 12, 13);

    let replace = alignment
        .pairs
        .iter()
        .find(|p| p.kind == MatchKind::Mismatch)
        .expect("replacement mismatch");
    assert_eq!((replace.a_len, replace.b_len), (2, 3));
}

#[test]
fn output_is_ordered_by_a() {
    let a = numbered_lines(0..30);
    let mut b = numbered_lines(10..20);
    b.push_str(&numbered_lines(0..10));
    b.push_str(&numbered_lines(20..30));

    let alignment = diff_texts(&a, &b, &DifferencerConfig::default());
    assert_tiling(&alignment, 30, 30);
    assert!(sorted_by_a(&alignment.pairs), "pairs: {:?}", alignment.pairs);
}

#[test]
fn missing_trailing_newline_still_tiles() {
    let a = "alpha\nbeta\ngamma";
    let b = "alpha\nbeta\ngamma\n";
    let alignment = diff_texts(a, b, &DifferencerConfig::default());
    assert_tiling(&alignment, 3, 3);
    // The final lines differ in raw bytes but normalize identically.
    assert!(
        alignment
            .pairs
            .iter()
            .any(|p| p.kind == MatchKind::NormalizedMatch)
    );
}

#[test]
fn whitespace_reindentation_is_normalized_not_mismatched() {
    let a = "fn demo() {\n    call_site(1);\n    call_site(2);\n}\n";
    let b = "fn demo() {\n\tcall_site(1);\n\tcall_site(2);\n}\n";
    let alignment = diff_texts(a, b, &DifferencerConfig::default());
    assert_tiling(&alignment, 4, 4);

    let normalized_lines: u32 = alignment
        .pairs
        .iter()
        .filter(|p| p.kind == MatchKind::NormalizedMatch)
        .map(|p| p.a_len)
        .sum();
    assert_eq!(normalized_lines, 2);
    assert!(
        !alignment
            .pairs
            .iter()
            .any(|p| p.kind == MatchKind::Mismatch)
    );
}

#[test]
fn summary_reflects_completion_and_pair_count() {
    let a = numbered_lines(0..10);
    let alignment = diff_texts(&a, &a, &DifferencerConfig::default());
    assert!(alignment.summary.complete);
    assert!(alignment.summary.warnings.is_empty());
    assert_eq!(alignment.summary.pair_count, alignment.pairs.len());
}
