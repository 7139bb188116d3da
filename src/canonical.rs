use sha2::{Digest, Sha256};

use crate::data::Record;
use crate::errors::PipelineError;
use crate::types::HexDigest;

/// Canonical single-line encoding of one record: a JSON object with keys in
/// byte-order lexicographic order (`id`, `input`, `output`, `source`).
/// Two equal records always encode to identical bytes, regardless of how
/// they were constructed in memory.
pub fn canonical_line(record: &Record) -> Result<String, PipelineError> {
    Ok(serde_json::to_string(record)?)
}

/// Serialize records to the canonical byte stream: one canonical line per
/// record in sequence order, UTF-8, each newline-terminated, with no
/// trailing blank line beyond the last record.
pub fn serialize_records(records: &[Record]) -> Result<Vec<u8>, PipelineError> {
    let mut stream = Vec::new();
    for record in records {
        stream.extend_from_slice(canonical_line(record)?.as_bytes());
        stream.push(b'\n');
    }
    Ok(stream)
}

/// SHA-256 hex digest of an exact byte stream.
pub fn digest_bytes(bytes: &[u8]) -> HexDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 hex digest over the canonical byte stream of `records`.
///
/// The sole identity proof for a dataset version: same ordered sequence,
/// same digest, across processes and machines. Depends on nothing but the
/// record bytes themselves.
pub fn dataset_digest(records: &[Record]) -> Result<HexDigest, PipelineError> {
    Ok(digest_bytes(&serialize_records(records)?))
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
    fn canonical_line_emits_lexicographic_keys() {
        let line = canonical_line(&record("t_0", "in", "out")).unwrap();
        assert_eq!(
            line,
            r#"{"id":"t_0","input":"in","output":"out","source":"test"}"#
        );
    }

    #[test]
    fn canonical_line_preserves_non_ascii_text() {
        let line = canonical_line(&record("t_0", "héllo", "wörld")).unwrap();
        assert!(line.contains("héllo"));
        assert!(line.contains("wörld"));
    }

    #[test]
    fn stream_is_newline_terminated_without_trailing_blank() {
        let records = vec![record("t_0", "a", "b"), record("t_1", "c", "d")];
        let stream = serialize_records(&records).unwrap();
        let text = String::from_utf8(stream).unwrap();
        assert!(text.ends_with('\n'));
        assert!(!text.ends_with("\n\n"));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn digest_matches_hash_of_serialized_stream() {
        let records = vec![record("t_0", "a", "b")];
        let stream = serialize_records(&records).unwrap();
        assert_eq!(dataset_digest(&records).unwrap(), digest_bytes(&stream));
    }

    #[test]
    fn digest_is_sensitive_to_field_changes_and_order() {
        let baseline = vec![record("t_0", "a", "b"), record("t_1", "c", "d")];
        let digest = dataset_digest(&baseline).unwrap();
        assert_eq!(digest.len(), 64);

        let mut changed = baseline.clone();
        changed[1].output = "D".to_string();
        assert_ne!(dataset_digest(&changed).unwrap(), digest);

        let reordered = vec![baseline[1].clone(), baseline[0].clone()];
        assert_ne!(dataset_digest(&reordered).unwrap(), digest);

        assert_eq!(dataset_digest(&baseline).unwrap(), digest);
    }

    #[test]
    fn empty_sequence_hashes_the_empty_stream() {
        assert_eq!(dataset_digest(&[]).unwrap(), digest_bytes(b""));
    }
}
