use std::path::PathBuf;
use thiserror::Error;

/// Failure to obtain policy records. Rendering never starts when one occurs.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("invalid file pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to resolve file pattern: {0}")]
    Glob(#[from] glob::GlobError),

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[cfg(feature = "cluster")]
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[cfg(feature = "cluster")]
    #[error("cluster request failed: {0}")]
    Cluster(#[from] kube::Error),

    #[cfg(feature = "cluster")]
    #[error("failed to convert cluster object: {0}")]
    Convert(#[from] serde_json::Error),

    #[error("cluster access is not available in this build")]
    ClusterUnavailable,
}
