//! JSON serialization of a finished alignment.

use std::io::Write;

use serde::Serialize;

use crate::report::Alignment;

/// Top-level JSON document: the two input names plus the alignment itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonReport<'a> {
    pub file_a: &'a str,
    pub file_b: &'a str,
    #[serde(flatten)]
    pub alignment: &'a Alignment,
}

pub fn serialize_alignment(
    alignment: &Alignment,
    file_a: &str,
    file_b: &str,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        file_a,
        file_b,
        alignment,
    })
}

pub fn write_json_report(
    writer: &mut impl Write,
    alignment: &Alignment,
    file_a: &str,
    file_b: &str,
) -> std::io::Result<()> {
    let json = serialize_alignment(alignment, file_a, file_b)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{json}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockPair;
    use crate::report::DiffSummary;

    fn sample() -> Alignment {
        Alignment {
            pairs: vec![BlockPair::exact(0, 0, 2), BlockPair::mismatch(2, 1, 2, 1)],
            summary: DiffSummary {
                complete: true,
                warnings: Vec::new(),
                pair_count: 2,
            },
        }
    }

    #[test]
    fn report_serializes_names_and_pairs() {
        let json = serialize_alignment(&sample(), "old.rs", "new.rs").unwrap();
        assert!(json.contains("\"file_a\": \"old.rs\""));
        assert!(json.contains("\"exact_match\""));
        assert!(json.contains("\"mismatch\""));
    }

    #[test]
    fn report_round_trips_the_alignment() {
        let json = serialize_alignment(&sample(), "a", "b").unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let back: Alignment = serde_json::from_value(value.clone()).unwrap();
        assert_eq!(back, sample());
        assert_eq!(value["summary"]["pair_count"], 2);
    }

    #[test]
    fn writer_output_ends_with_newline() {
        let mut buf = Vec::new();
        write_json_report(&mut buf, &sample(), "a", "b").unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));
    }
}
