use kn_core::{Bucket, Error, Result, ResultStorage};
use std::sync::Arc;
use std::time::Duration;

pub mod backends;

pub use backends::*;

/// Time-to-live per bucket kind. Yesterday's listing no longer changes, so it
/// is kept far longer than today's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub today: Duration,
    pub yesterday: Duration,
    pub latest: Duration,
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            today: Duration::from_secs(10 * 60),
            yesterday: Duration::from_secs(24 * 60 * 60),
            latest: Duration::from_secs(5 * 60),
        }
    }
}

impl TtlPolicy {
    pub fn ttl_for(&self, bucket: Bucket) -> Duration {
        match bucket {
            Bucket::Today => self.today,
            Bucket::Yesterday => self.yesterday,
            Bucket::Latest { .. } => self.latest,
        }
    }
}

/// Names accepted by [`create_storage`].
pub const BACKENDS: &[&str] = &["memory"];

/// Builds the named backend. Unknown names are a startup error.
pub async fn create_storage(kind: &str) -> Result<Arc<dyn ResultStorage>> {
    match kind.trim().to_lowercase().as_str() {
        "memory" => Ok(Arc::new(MemoryStorage::new())),
        other => Err(Error::Config(format!(
            "Unknown storage backend {:?}, expected one of: {}",
            other,
            BACKENDS.join(", ")
        ))),
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, TtlPolicy};
}
