//! CSV rendering of submissions and registrations for offline review.

use crate::records::{EventRegistration, Submission};
use crate::validation::FormData;

/// A record that can be flattened into one CSV row.
pub trait ExportRow {
    /// Fixed columns that precede the data keys.
    fn leading_headers() -> &'static [&'static str];
    fn leading_values(&self) -> Vec<String>;
    fn data(&self) -> &FormData;
}

impl ExportRow for Submission {
    fn leading_headers() -> &'static [&'static str] {
        &["id", "formType", "status", "createdAt", "notes"]
    }

    fn leading_values(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.form_type.clone(),
            self.status.as_str().to_string(),
            self.created_at.clone(),
            self.notes.clone().unwrap_or_default(),
        ]
    }

    fn data(&self) -> &FormData {
        &self.data
    }
}

impl ExportRow for EventRegistration {
    fn leading_headers() -> &'static [&'static str] {
        &["id", "eventId", "status", "createdAt", "notes"]
    }

    fn leading_values(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.event_id.to_string(),
            self.status.as_str().to_string(),
            self.created_at.clone(),
            self.notes.clone().unwrap_or_default(),
        ]
    }

    fn data(&self) -> &FormData {
        &self.data
    }
}

/// Renders `rows` as CSV with CRLF line endings.
///
/// Data columns appear in the order their keys are first seen across the
/// rows; a row without a key leaves that cell empty.
pub fn to_csv<R: ExportRow>(rows: &[R]) -> String {
    let mut keys: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.data().keys() {
            if !keys.contains(&key.as_str()) {
                keys.push(key);
            }
        }
    }

    let mut out = String::new();
    push_line(
        &mut out,
        R::leading_headers().iter().copied().chain(keys.iter().copied()),
    );

    for row in rows {
        let leading = row.leading_values();
        let data = row.data();
        let cells = leading
            .iter()
            .map(String::as_str)
            .chain(keys.iter().map(|key| data.get(*key).map_or("", String::as_str)));
        push_line(&mut out, cells);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>) {
    for (index, cell) in cells.enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&quote(cell));
    }
    out.push_str("\r\n");
}

/// Quotes a cell when it contains a comma, quote or line break, doubling
/// embedded quotes.
pub fn quote(cell: &str) -> String {
    if cell.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SubmissionStatus;
    use pretty_assertions::assert_eq;

    fn submission(id: i64, pairs: &[(&str, &str)]) -> Submission {
        Submission {
            id,
            form_type: "contact".to_string(),
            data: pairs
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
                .collect(),
            status: SubmissionStatus::New,
            notes: None,
            created_at: "2025-01-01 10:00:00".to_string(),
            updated_at: "2025-01-01 10:00:00".to_string(),
        }
    }

    #[test]
    fn quoting_follows_rfc4180() {
        assert_eq!(quote("plain"), "plain");
        assert_eq!(quote("a,b"), "\"a,b\"");
        assert_eq!(quote("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote("two\nlines"), "\"two\nlines\"");
    }

    #[test]
    fn columns_are_the_union_of_data_keys() {
        let rows = vec![
            submission(2, &[("name", "Ann"), ("email", "ann@x.org")]),
            submission(1, &[("name", "Bo, Jr."), ("phone", "555-1234")]),
        ];
        let csv = to_csv(&rows);
        let lines: Vec<&str> = csv.split("\r\n").collect();
        assert_eq!(lines[0], "id,formType,status,createdAt,notes,email,name,phone");
        assert_eq!(lines[1], "2,contact,new,2025-01-01 10:00:00,,ann@x.org,Ann,");
        assert_eq!(lines[2], "1,contact,new,2025-01-01 10:00:00,,,\"Bo, Jr.\",555-1234");
        assert_eq!(lines[3], "");
    }

    #[test]
    fn empty_export_is_just_the_header() {
        let csv = to_csv::<Submission>(&[]);
        assert_eq!(csv, "id,formType,status,createdAt,notes\r\n");
    }
}
