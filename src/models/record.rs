use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::GeneratedImage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogoRecord {
    pub image: GeneratedImage,
    pub title: String,
    #[serde(rename = "desc")]
    pub description: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl LogoRecord {
    pub fn new(image: GeneratedImage, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            image,
            title: title.into(),
            description: description.into(),
            created_at: Utc::now(),
        }
    }

    /// Document key under the owner's collection: creation time in epoch
    /// millis followed by `suffix`, which must be unique per write.
    pub fn key(&self, suffix: &str) -> String {
        format!("{}-{}", self.created_at.timestamp_millis(), suffix)
    }
}
