use std::path::Path;

use serde_json::Value;

use crate::errors::PipelineError;

/// Raw `(input, output)` pair produced by a format reader, before id
/// assignment.
pub type RawPair = (String, String);

/// Supported raw input formats, selected by a pure mapping from the
/// lowercased filename suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordFormat {
    /// JSON array of objects carrying `input`/`output` string fields.
    ArrayOfObjects,
    /// Header-delimited columnar text (CSV).
    Columnar,
    /// Line-oriented text; input and output split on the first tab.
    Lines,
}

impl RecordFormat {
    /// Select a format for `path` by suffix: `.json`, `.csv`, `.txt`/`.text`.
    pub fn for_path(path: &Path) -> Result<Self, PipelineError> {
        let suffix = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match suffix.as_str() {
            "json" => Ok(Self::ArrayOfObjects),
            "csv" => Ok(Self::Columnar),
            "txt" | "text" => Ok(Self::Lines),
            _ => Err(PipelineError::UnsupportedFormat {
                suffix,
                path: path.display().to_string(),
            }),
        }
    }

    /// Decode raw bytes into ordered `(input, output)` pairs.
    ///
    /// Never reorders: the i-th pair corresponds to the i-th row of the
    /// underlying file.
    pub fn read(&self, bytes: &[u8]) -> Result<Vec<RawPair>, PipelineError> {
        match self {
            Self::ArrayOfObjects => read_array_of_objects(bytes),
            Self::Columnar => read_columnar(utf8(bytes)?),
            Self::Lines => Ok(read_lines(utf8(bytes)?)),
        }
    }
}

fn utf8(bytes: &[u8]) -> Result<&str, PipelineError> {
    std::str::from_utf8(bytes).map_err(|err| PipelineError::MalformedRecord {
        index: 0,
        reason: format!("input is not valid UTF-8: {err}"),
    })
}

fn read_array_of_objects(bytes: &[u8]) -> Result<Vec<RawPair>, PipelineError> {
    let rows: Vec<Value> =
        serde_json::from_slice(bytes).map_err(|err| PipelineError::MalformedRecord {
            index: 0,
            reason: format!("input does not parse as a JSON array: {err}"),
        })?;
    let mut pairs = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let object = row
            .as_object()
            .ok_or_else(|| PipelineError::MalformedRecord {
                index,
                reason: "expected a JSON object".to_string(),
            })?;
        let input = required_string_field(object, "input", index)?;
        let output = required_string_field(object, "output", index)?;
        pairs.push((input, output));
    }
    Ok(pairs)
}

fn required_string_field(
    object: &serde_json::Map<String, Value>,
    field: &str,
    index: usize,
) -> Result<String, PipelineError> {
    match object.get(field) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(PipelineError::MalformedRecord {
            index,
            reason: format!("field '{field}' must be a string"),
        }),
        None => Err(PipelineError::MalformedRecord {
            index,
            reason: format!("missing required field '{field}'"),
        }),
    }
}

/// Columnar reader. The first row is a header; `input`/`output` columns are
/// matched case-insensitively, and an absent one falls back to its
/// positional column (0 for input, 1 for output). The fallback is a firm
/// contract relied on by existing artifacts.
fn read_columnar(text: &str) -> Result<Vec<RawPair>, PipelineError> {
    let mut lines = text.lines();
    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };
    let header = split_columns(header_line);
    let input_col = find_column(&header, "input").unwrap_or(0);
    let output_col = find_column(&header, "output").unwrap_or(1);
    let needed = input_col.max(output_col) + 1;

    let mut pairs = Vec::new();
    for (index, line) in lines.filter(|line| !line.is_empty()).enumerate() {
        let columns = split_columns(line);
        if columns.len() < needed {
            return Err(PipelineError::MalformedRecord {
                index,
                reason: format!("row has {} columns, needs at least {needed}", columns.len()),
            });
        }
        pairs.push((columns[input_col].clone(), columns[output_col].clone()));
    }
    Ok(pairs)
}

fn find_column(header: &[String], name: &str) -> Option<usize> {
    header
        .iter()
        .position(|entry| entry.eq_ignore_ascii_case(name))
}

/// Split one CSV line into fields, honoring double-quoted fields and `""`
/// escapes.
fn split_columns(line: &str) -> Vec<String> {
    let mut columns = Vec::new();
    let mut field = String::new();
    let mut quoted = false;
    let mut chars = line.chars().peekable();
    while let Some(ch) = chars.next() {
        if quoted {
            if ch == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    field.push('"');
                } else {
                    quoted = false;
                }
            } else {
                field.push(ch);
            }
        } else {
            match ch {
                '"' if field.is_empty() => quoted = true,
                ',' => columns.push(std::mem::take(&mut field)),
                _ => field.push(ch),
            }
        }
    }
    columns.push(field);
    columns
}

/// Line reader: split each line on the first tab only; a line without a tab
/// becomes an input with an empty output. The trailing newline does not
/// produce a spurious final record.
fn read_lines(text: &str) -> Vec<RawPair> {
    text.lines()
        .map(|line| match line.split_once('\t') {
            Some((input, output)) => (input.to_string(), output.to_string()),
            None => (line.to_string(), String::new()),
        })
        .collect()
}
