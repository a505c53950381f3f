//! CSV export.
//!
//! Columns are `number,page,marks,text,figures`. Absent marks are an empty
//! field and figure ids are joined with `;`.

use std::io::Write;

use crate::error::Result;
use crate::model::QuestionRecord;

/// CSV header row.
pub const CSV_HEADER: [&str; 5] = ["number", "page", "marks", "text", "figures"];

/// Write records as CSV, header first.
pub fn write_csv<W: Write>(mut writer: W, records: &[QuestionRecord]) -> Result<()> {
    writeln!(writer, "{}", CSV_HEADER.join(","))?;

    for record in records {
        let marks = record.marks.map(|m| m.to_string()).unwrap_or_default();
        let figures = record.figures.join(";");
        writeln!(
            writer,
            "{},{},{},{},{}",
            escape_csv(&record.number),
            record.page,
            marks,
            escape_csv(&record.text),
            escape_csv(&figures)
        )?;
    }

    writer.flush()?;
    Ok(())
}

/// Render records as a CSV string.
pub fn to_csv(records: &[QuestionRecord]) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(&mut buf, records)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Quote a field when it holds a delimiter, quote or line break.
fn escape_csv(field: &str) -> std::borrow::Cow<'_, str> {
    if field.contains(&[',', '"', '\r', '\n'][..]) {
        format!("\"{}\"", field.replace('"', "\"\"")).into()
    } else {
        field.into()
    }
}
