//! Store error types.

use std::path::PathBuf;

/// Errors from a storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot could not be (de)serialized
    #[error("snapshot serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Snapshot violates a uniqueness constraint
    #[error("corrupt snapshot: {0}")]
    Corrupt(String),

    /// No more ids can be assigned in a table
    #[error("id space exhausted for {0}")]
    IdsExhausted(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::Io {
            path: PathBuf::from("/tmp/fares.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "I/O error on /tmp/fares.json: gone");

        let err = StoreError::Corrupt("duplicate station name Tokyo".into());
        assert_eq!(
            err.to_string(),
            "corrupt snapshot: duplicate station name Tokyo"
        );

        let err = StoreError::IdsExhausted("stations");
        assert_eq!(err.to_string(), "id space exhausted for stations");
    }
}
