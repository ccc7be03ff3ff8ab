//! Table construction options.

use crate::error::{ZTableError, ZTableResult};
use serde::{Deserialize, Serialize};

/// Bucket size used when none (or a non-positive one) is given.
pub const DEFAULT_BUCKET_SIZE: usize = 30;

/// Options recognised by [`ZTable::new`](crate::ZTable::new).
///
/// `bucket_size` controls how many contiguous leaves sit under one boundary
/// node of the search tree. It trades descent depth against refinement-scan
/// length and never changes query results. Zero or negative values fall back
/// to [`DEFAULT_BUCKET_SIZE`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ZTableOptions {
    pub bucket_size: i64,
}

impl ZTableOptions {
    pub fn with_bucket_size(bucket_size: i64) -> Self {
        Self { bucket_size }
    }

    /// Parse options from TOML text, e.g. `bucket_size = 10`.
    pub fn from_toml_str(input: &str) -> ZTableResult<Self> {
        toml::from_str(input).map_err(|e| ZTableError::Config(e.to_string()))
    }

    /// Render options as TOML text accepted by [`from_toml_str`](Self::from_toml_str).
    pub fn to_toml_string(&self) -> ZTableResult<String> {
        toml::to_string(self).map_err(|e| ZTableError::Config(e.to_string()))
    }

    /// The bucket size actually used to build the tree.
    pub fn effective_bucket_size(&self) -> usize {
        if self.bucket_size <= 0 {
            if self.bucket_size < 0 {
                tracing::warn!(
                    "Negative bucket size {}, using default {}",
                    self.bucket_size,
                    DEFAULT_BUCKET_SIZE
                );
            }
            return DEFAULT_BUCKET_SIZE;
        }
        usize::try_from(self.bucket_size).unwrap_or(DEFAULT_BUCKET_SIZE)
    }
}
