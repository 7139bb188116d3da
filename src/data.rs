use serde::{Deserialize, Serialize};

use crate::types::{RecordId, SourceId};

/// Normalized four-field unit of training/evaluation data.
///
/// Records are immutable values: cleaning and filtering passes produce new
/// sequences rather than mutating in place. Fields are declared in byte-order
/// lexicographic key order; the canonical serialization in
/// [`crate::canonical`] relies on this.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Per-run identifier, `<source>_<ordinal>` with a zero-based ordinal
    /// assigned at ingestion and never reassigned by later stages.
    pub id: RecordId,
    /// Prompt-side text.
    pub input: String,
    /// Response-side text.
    pub output: String,
    /// Label of the raw source this record was ingested from.
    pub source: SourceId,
}

impl Record {
    /// Build a record with the canonical `<source>_<ordinal>` id.
    pub fn new(
        source: impl Into<SourceId>,
        ordinal: usize,
        input: impl Into<String>,
        output: impl Into<String>,
    ) -> Self {
        let source = source.into();
        Self {
            id: format!("{source}_{ordinal}"),
            input: input.into(),
            output: output.into(),
            source,
        }
    }
}
