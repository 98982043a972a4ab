use cancel_this::Cancelled;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons why a [`MorphConfig`](crate::morph::MorphConfig) cannot be used for reconstruction.
///
/// These are always reported before any tree operation runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("tree depth must be positive")]
    ZeroDepth,
    #[error("tree depth {depth} exceeds the supported maximum of {max}")]
    DepthTooLarge { depth: usize, max: usize },
    #[error("candidate depth K={past_depth} exceeds tree depth D={depth}")]
    PastDepthExceedsDepth { past_depth: usize, depth: usize },
    #[error("rounding precision {precision} exceeds the supported maximum of {max} digits")]
    PrecisionTooLarge { precision: u32, max: u32 },
    #[error("tree has depth {actual}, but the configuration expects depth {expected}")]
    DepthMismatch { expected: usize, actual: usize },
}

/// Any failure of the reconstruction pipeline that is surfaced to the caller.
#[derive(Debug, Error)]
pub enum ReconstructionError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("reconstruction cancelled: {0}")]
    Cancelled(Cancelled),
    #[error("I/O error on `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<Cancelled> for ReconstructionError {
    fn from(value: Cancelled) -> Self {
        ReconstructionError::Cancelled(value)
    }
}
