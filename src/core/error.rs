use thiserror::Error;

/// Errors that can occur while loading configuration or exporting documents.
///
/// Invalid company codes and cost centers are not errors: they are reported
/// as [`DiagnosticMessage`](super::DiagnosticMessage)s and resolution goes on.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum KontierungError {
    /// Settings could not be read or deserialized.
    #[error("configuration error: {0}")]
    Config(String),

    /// Export preconditions were not met.
    #[error("export error: {0}")]
    Export(String),
}

impl From<serde_json::Error> for KontierungError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}
