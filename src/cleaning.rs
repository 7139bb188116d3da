use std::collections::HashSet;

use crate::data::Record;

/// Drop records whose input or output is empty after trimming whitespace.
/// Order of survivors is preserved.
pub fn remove_empty(records: Vec<Record>) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| !record.input.trim().is_empty() && !record.output.trim().is_empty())
        .collect()
}

/// Drop records whose exact, untrimmed `(input, output)` pair was already
/// seen earlier in the sequence. The first occurrence wins and keeps its id.
pub fn remove_duplicates(records: Vec<Record>) -> Vec<Record> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert((record.input.clone(), record.output.clone())))
        .collect()
}

/// Cleaning stage: presence and exact-pair identity checks only. Length and
/// content-quality judgments belong to [`crate::filtering`].
pub fn clean(records: Vec<Record>, remove_dups: bool) -> Vec<Record> {
    let records = remove_empty(records);
    if remove_dups {
        remove_duplicates(records)
    } else {
        records
    }
}
