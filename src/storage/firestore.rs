use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::{Client, Url};
use serde_json::{json, Value};

use crate::{
    config::FirestoreConfig,
    error::{LogoError, Result},
    models::LogoRecord,
    storage::traits::LogoStore,
};

/// Cloud Firestore through its REST API; one PATCH per saved logo.
pub struct FirestoreLogoStore {
    client: Client,
    base_url: String,
    project_id: String,
    api_key: Option<String>,
    auth_token: Option<String>,
}

impl FirestoreLogoStore {
    pub fn new(config: FirestoreConfig) -> Result<Self> {
        let project_id = config
            .project_id
            .ok_or_else(|| LogoError::ConfigError("Firestore project id is required".into()))?;

        if config.api_key.is_none() && config.auth_token.is_none() {
            log::warn!("Firestore store configured without API key or auth token");
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.base_url,
            project_id,
            api_key: config.api_key,
            auth_token: config.auth_token,
        })
    }

    fn document_url(&self, owner_id: &str, key: &str) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| LogoError::ConfigError(format!("invalid Firestore URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| LogoError::ConfigError("Firestore URL cannot be a base".into()))?
            .pop_if_empty()
            .extend([
                "projects",
                self.project_id.as_str(),
                "databases",
                "(default)",
                "documents",
                "users",
                owner_id,
                "logos",
                key,
            ]);
        url.query_pairs_mut()
            .append_pair("currentDocument.exists", "false");
        if let Some(api_key) = &self.api_key {
            url.query_pairs_mut().append_pair("key", api_key);
        }
        Ok(url)
    }
}

/// Firestore's typed-value document encoding of a record.
pub fn document_fields(record: &LogoRecord) -> Value {
    json!({
        "fields": {
            "image": { "stringValue": record.image.to_data_uri() },
            "title": { "stringValue": record.title },
            "desc": { "stringValue": record.description },
            "createdAt": {
                "timestampValue": record.created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
            }
        }
    })
}

#[async_trait]
impl LogoStore for FirestoreLogoStore {
    fn name(&self) -> &str {
        "firestore"
    }

    async fn save(&self, owner_id: &str, key: &str, record: &LogoRecord) -> Result<()> {
        if owner_id.trim().is_empty() {
            return Err(LogoError::Persistence("owner id is empty".into()));
        }

        let mut request = self
            .client
            .patch(self.document_url(owner_id, key)?)
            .json(&document_fields(record));
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| LogoError::Persistence(format!("Firestore request failed: {}", e)))?;

        if response.status().is_success() {
            log::debug!("Saved logo users/{}/logos/{}", owner_id, key);
            Ok(())
        } else {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            Err(LogoError::Persistence(format!(
                "Firestore write failed ({}): {}",
                status, error_text
            )))
        }
    }
}
