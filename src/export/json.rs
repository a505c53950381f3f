//! JSON export.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Paper, QuestionRecord};

/// JSON output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Pretty-printed JSON with indentation
    #[default]
    Pretty,
    /// Compact JSON without extra whitespace
    Compact,
}

/// Serialize a whole paper: metadata, questions, totals, figures and stats.
pub fn to_json(paper: &Paper, format: JsonFormat) -> Result<String> {
    serialize(paper, format)
}

/// Serialize only the question array.
pub fn records_to_json(records: &[QuestionRecord], format: JsonFormat) -> Result<String> {
    serialize(records, format)
}

/// Read a question array written by [`records_to_json`].
pub fn records_from_json(json: &str) -> Result<Vec<QuestionRecord>> {
    serde_json::from_str(json).map_err(|e| Error::Export(format!("JSON parse error: {}", e)))
}

fn serialize<T: Serialize + ?Sized>(value: &T, format: JsonFormat) -> Result<String> {
    let result = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(value),
        JsonFormat::Compact => serde_json::to_string(value),
    };

    result.map_err(|e| Error::Export(format!("JSON serialization error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::QuestionLabel;

    fn records() -> Vec<QuestionRecord> {
        let mut first = QuestionRecord::new(QuestionLabel::question(1), 1, 0.0);
        first.text = "What is X? continued.".to_string();
        first.marks = Some(5);
        let mut second = QuestionRecord::new(QuestionLabel::question(2), 1, 2.0);
        second.text = "What is Y?".to_string();
        vec![first, second]
    }

    #[test]
    fn test_records_to_json_compact() {
        let json = records_to_json(&records(), JsonFormat::Compact).unwrap();
        assert!(!json.contains('\n'));
        assert!(json.contains(r#""number":"1","text":"What is X? continued.","marks":5"#));
        assert!(json.contains(r#""marks":null"#));
        assert!(!json.contains("figures"));
    }

    #[test]
    fn test_records_json_reads_back() {
        let records = records();
        let json = records_to_json(&records, JsonFormat::Pretty).unwrap();
        assert!(json.contains('\n'));
        assert_eq!(records_from_json(&json).unwrap(), records);
    }

    #[test]
    fn test_paper_to_json() {
        let mut paper = Paper::new();
        paper.questions = records();
        paper.totals.insert(1, 5);
        let json = to_json(&paper, JsonFormat::Pretty).unwrap();
        assert!(json.contains("\"questions\""));
        assert!(json.contains("\"totals\""));
        assert!(json.contains("\"stats\""));
    }
}
