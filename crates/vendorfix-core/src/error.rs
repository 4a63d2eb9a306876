use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PatchError {
    /// Reading, probing or writing an existing target failed. Fatal for the batch.
    #[error("I/O error on {path:?} ({description}): {source}")]
    Io {
        path: PathBuf,
        description: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid pattern in '{description}': {source}")]
    InvalidPattern {
        description: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid descriptor #{index} '{description}': {reason}")]
    InvalidDescriptor {
        index: usize,
        description: String,
        reason: String,
    },

    #[error("Failed to parse manifest: {0}")]
    Manifest(#[from] toml::de::Error),

    #[error("Failed to read manifest {path:?}: {source}")]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write progress output: {0}")]
    Output(#[source] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_io_error_display_names_path_and_descriptor() {
        let err = PatchError::Io {
            path: PathBuf::from("vendor/a.php"),
            description: "null safety".to_string(),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("vendor/a.php"));
        assert!(msg.contains("null safety"));
        assert!(msg.contains("denied"));
    }
}
