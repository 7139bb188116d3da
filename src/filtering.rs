use crate::cleaning;
use crate::config::BuildConfig;
use crate::data::Record;

/// Drop records where input or output has fewer than `min_length`
/// characters. A `min_length` of zero is a no-op.
pub fn filter_by_min_length(records: Vec<Record>, min_length: usize) -> Vec<Record> {
    if min_length == 0 {
        return records;
    }
    records
        .into_iter()
        .filter(|record| {
            record.input.chars().count() >= min_length
                && record.output.chars().count() >= min_length
        })
        .collect()
}

/// True when any single character repeats more than `max_repeat` times
/// consecutively. This is a run-length check, not a total count.
pub fn has_excessive_repeat(text: &str, max_repeat: usize) -> bool {
    if max_repeat < 1 {
        return false;
    }
    let mut previous = None;
    let mut run = 0usize;
    for ch in text.chars() {
        if previous == Some(ch) {
            run += 1;
        } else {
            previous = Some(ch);
            run = 1;
        }
        if run > max_repeat {
            return true;
        }
    }
    false
}

/// Drop records where input or output contains an excessive consecutive
/// character repeat.
pub fn filter_noise(records: Vec<Record>, max_repeat: usize) -> Vec<Record> {
    records
        .into_iter()
        .filter(|record| {
            !has_excessive_repeat(&record.input, max_repeat)
                && !has_excessive_repeat(&record.output, max_repeat)
        })
        .collect()
}

/// Cleaning followed by the configured filters, in fixed order: empty-record
/// removal, optional dedup, length floor, optional noise filter. Pure with
/// respect to its arguments; identical inputs yield an identical sequence.
pub fn clean_and_filter(records: Vec<Record>, config: &BuildConfig) -> Vec<Record> {
    let records = cleaning::clean(records, config.remove_duplicates());
    let records = filter_by_min_length(records, config.min_length());
    if config.filter_noise() {
        filter_noise(records, config.noise_max_repeat())
    } else {
        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, input: &str, output: &str) -> Record {
        Record {
            id: id.to_string(),
            input: input.to_string(),
            output: output.to_string(),
            source: "test".to_string(),
        }
    }

    #[test]
    fn min_length_boundary_keeps_exact_matches() {
        let records = vec![
            record("0", "exactly10!", "also ten!!"),
            record("1", "only nine", "long enough"),
        ];
        let result = filter_by_min_length(records, 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "0");
    }

    #[test]
    fn min_length_zero_is_a_no_op() {
        let records = vec![record("0", "a", "b")];
        assert_eq!(filter_by_min_length(records, 0).len(), 1);
    }

    #[test]
    fn min_length_counts_characters_not_bytes() {
        let records = vec![record("0", "ééééé", "ooooo")];
        assert_eq!(filter_by_min_length(records, 5).len(), 1);
    }

    #[test]
    fn excessive_repeat_is_a_consecutive_run_check() {
        assert!(has_excessive_repeat(&"a".repeat(11), 10));
        assert!(!has_excessive_repeat(&"a".repeat(10), 10));
        // Eleven total but never more than ten in a row.
        assert!(!has_excessive_repeat(&format!("{}b{}", "a".repeat(6), "a".repeat(5)), 10));
        assert!(!has_excessive_repeat("", 10));
        assert!(!has_excessive_repeat("anything", 0));
    }

    #[test]
    fn noise_filter_checks_both_fields() {
        let records = vec![
            record("0", &"a".repeat(11), "fine"),
            record("1", "fine", &"b".repeat(11)),
            record("2", &"a".repeat(10), &"b".repeat(10)),
        ];
        let result = filter_noise(records, 10);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }
}
