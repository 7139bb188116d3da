/// Per-run record identifier assigned during ingestion.
/// Example: `support_0`, `support_1`
pub type RecordId = String;
/// Label for the raw source a build ingests from.
/// Examples: `support`, `faq_exports`
pub type SourceId = String;
/// Caller-chosen name of a dataset version; unique key in the artifact store.
/// Example: `support_v1`
pub type VersionName = String;
/// Externally supplied identifier for a model artifact.
/// Example: `support_model_v1`
pub type ModelVersion = String;
/// Lowercase hex-encoded SHA-256 digest.
/// Example: `9f86d081884c7d659a2feaa0c55ad015a3bf4f1b2b0b822cd15d6c15b0f00a08`
pub type HexDigest = String;
