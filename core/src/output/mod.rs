pub(crate) mod json;

pub use json::{JsonReport, serialize_alignment, write_json_report};
