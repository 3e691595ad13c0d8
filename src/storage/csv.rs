//! CSV line codec
//!
//! A deliberately small dialect:
//! - fields are separated by `,`
//! - a `"` toggles quoted mode, inside which `,` is literal
//! - `""` inside a quoted field stands for one `"`
//! - every parsed field is trimmed of surrounding whitespace
//!
//! Parsing never fails. An unterminated quote runs to the end of the line
//! and whatever was accumulated is flushed as the last field.

/// Splits one record into its fields
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());

    fields
}

/// Joins fields into one record, quoting where needed
pub fn format_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote_field(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

fn quote_field(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Groups physical lines into logical records
///
/// A quoted field may span lines, so lines are joined (with `\n`) while a
/// quote is open. A quote that never closes before end of input is a stray:
/// its line becomes a record on its own and the lines after it are split
/// normally. Blank lines outside a record are dropped.
pub fn split_records(text: &str) -> Vec<String> {
    let lines: Vec<&str> = text.lines().collect();
    let mut records = Vec::new();
    let mut start = 0;

    while start < lines.len() {
        let first = lines[start];
        if first.trim().is_empty() {
            start += 1;
            continue;
        }

        let mut record = first.to_string();
        let mut end = start + 1;
        while has_open_quote(&record) && end < lines.len() {
            record.push('\n');
            record.push_str(lines[end]);
            end += 1;
        }

        if has_open_quote(&record) {
            records.push(first.to_string());
            start += 1;
        } else {
            records.push(record);
            start = end;
        }
    }

    records
}

fn has_open_quote(record: &str) -> bool {
    record.chars().filter(|&c| c == '"').count() % 2 == 1
}
