use crate::{error::Result, models::LogoRecord};
use async_trait::async_trait;

/// Document store holding generated logos under `users/<owner>/logos/<key>`.
#[async_trait]
pub trait LogoStore: Send + Sync {
    fn name(&self) -> &str;

    async fn save(&self, owner_id: &str, key: &str, record: &LogoRecord) -> Result<()>;
}
