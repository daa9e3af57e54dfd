use async_trait::async_trait;
use std::time::Duration;

use crate::error::Result;

/// One text-to-image provider in the fallback chain.
///
/// `attempt` is a single shot: implementations must not retry internally.
/// The returned bytes are the raw image body.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    fn name(&self) -> &str;

    fn timeout(&self) -> Duration;

    async fn attempt(&self, prompt: &str, timeout: Duration) -> Result<Vec<u8>>;
}
