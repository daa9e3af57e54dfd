use std::sync::Arc;

use uuid::Uuid;

use crate::{
    backends::{placeholder_image, FallbackResolver, ImageSource},
    composer::PromptComposer,
    config::Config,
    error::{LogoError, Result},
    logger,
    models::{GenerateLogoResponse, GeneratedImage, LogoRecord, LogoRequest},
    storage::{store_from_config, LogoStore},
};

pub const FALLBACK_MESSAGE: &str = "Primary generation failed. Using fallback logo.";

/// Everything one generation produced, success or not.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub request_id: String,
    pub image: GeneratedImage,
    pub source: ImageSource,
    /// Set when the request could not be generated and was answered with a placeholder.
    pub error: Option<LogoError>,
    /// Backend failures absorbed by the fallback chain.
    pub attempts: Vec<LogoError>,
    /// Saved document key, the write error, or `None` when nothing was written.
    pub persistence: Option<Result<String>>,
}

impl GenerationOutcome {
    pub fn persistence_error(&self) -> Option<&LogoError> {
        match &self.persistence {
            Some(Err(err)) => Some(err),
            _ => None,
        }
    }

    pub fn to_response(&self) -> GenerateLogoResponse {
        GenerateLogoResponse {
            error: self.error.as_ref().map(|_| FALLBACK_MESSAGE.to_string()),
            image: self.image.to_data_uri(),
            warning: self
                .persistence_error()
                .map(|err| format!("Logo generated but not saved: {}", err)),
        }
    }
}

/// Refine, resolve, persist. Holds no per-request state.
#[derive(Clone)]
pub struct LogoService {
    composer: PromptComposer,
    resolver: FallbackResolver,
    store: Arc<dyn LogoStore>,
}

impl LogoService {
    pub fn new(composer: PromptComposer, resolver: FallbackResolver, store: Arc<dyn LogoStore>) -> Self {
        Self {
            composer,
            resolver,
            store,
        }
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(
            PromptComposer::from_config(config).await?,
            FallbackResolver::from_config(config),
            store_from_config(config)?,
        ))
    }

    pub fn store(&self) -> &Arc<dyn LogoStore> {
        &self.store
    }

    pub fn resolver(&self) -> &FallbackResolver {
        &self.resolver
    }

    pub async fn generate(&self, request: LogoRequest) -> GenerationOutcome {
        let request_id = Uuid::new_v4().to_string();
        let _timer = logger::timer(&format!("logo generation [req:{}]", request_id));
        let label = request.placeholder_label().to_string();

        log::info!(
            "[req:{}] Generating logo '{}' for '{}'",
            request_id,
            request.title,
            request.owner_id
        );

        let prompt = match self.composer.refine(&request.prompt_template).await {
            Ok(prompt) => prompt,
            Err(err) => {
                log::error!("[req:{}] {}; answering with placeholder", request_id, err);
                return GenerationOutcome {
                    request_id,
                    image: placeholder_image(&label),
                    source: ImageSource::Placeholder,
                    error: Some(err),
                    attempts: Vec::new(),
                    persistence: None,
                };
            }
        };

        let resolution = self.resolver.resolve(prompt.as_str(), &label).await;

        let record = LogoRecord::new(
            resolution.image.clone(),
            request.title.as_str(),
            request.description.as_str(),
        );
        let key = record.key(&request_id);
        let persistence = match self.store.save(&request.owner_id, &key, &record).await {
            Ok(()) => {
                log::info!(
                    "[req:{}] Saved to {} as users/{}/logos/{}",
                    request_id,
                    self.store.name(),
                    request.owner_id,
                    key
                );
                Ok(key)
            }
            Err(err) => {
                log::warn!("[req:{}] {}", request_id, err);
                Err(err)
            }
        };

        GenerationOutcome {
            request_id,
            image: resolution.image,
            source: resolution.source,
            error: None,
            attempts: resolution.attempts,
            persistence: Some(persistence),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::backends::ImageBackend;
    use crate::models::ImageMime;
    use crate::storage::InMemoryLogoStore;

    fn request() -> LogoRequest {
        LogoRequest {
            prompt_template: "blue fox logo".into(),
            owner_id: "fox@example.com".into(),
            title: "Blue Fox".into(),
            description: "outdoor gear".into(),
        }
    }

    fn service(
        reply: &str,
        backends: Vec<Arc<dyn ImageBackend>>,
        store: Arc<dyn LogoStore>,
    ) -> LogoService {
        LogoService::new(
            PromptComposer::new(Arc::new(ScriptedModel {
                reply: reply.to_string(),
            })),
            FallbackResolver::new(backends),
            store,
        )
    }

    #[tokio::test]
    async fn generated_logo_is_saved_under_owner() {
        let store = Arc::new(InMemoryLogoStore::new());
        let backend = CountingBackend::returning("flux", png_bytes(50));
        let service = service(r#"{"prompt":"fox"}"#, vec![backend.clone() as Arc<dyn ImageBackend>], store.clone());

        let outcome = service.generate(request()).await;

        assert!(outcome.error.is_none());
        assert_eq!(outcome.source, ImageSource::Backend("flux".into()));
        let key = outcome.persistence.as_ref().unwrap().as_ref().unwrap().clone();
        let saved = store.get("fox@example.com", &key).unwrap();
        assert_eq!(saved.image, outcome.image);
        assert_eq!(saved.title, "Blue Fox");
        assert_eq!(saved.description, "outdoor gear");
        assert_eq!(backend.calls(), 1);
    }

    #[tokio::test]
    async fn concurrent_requests_for_one_owner_keep_every_logo() {
        let store = Arc::new(InMemoryLogoStore::new());
        let backend = CountingBackend::returning("flux", png_bytes(50));
        let service = service(r#"{"prompt":"fox"}"#, vec![backend as Arc<dyn ImageBackend>], store.clone());

        let mut keys = Vec::new();
        for _ in 0..20 {
            let (first, second) = tokio::join!(service.generate(request()), service.generate(request()));
            for outcome in [first, second] {
                keys.push(outcome.persistence.unwrap().unwrap());
            }
        }

        assert_eq!(keys.len(), 40);
        assert_eq!(store.len(), 40);
        for key in &keys {
            assert!(store.get("fox@example.com", key).is_some());
        }
    }

    #[tokio::test]
    async fn placeholder_from_exhausted_chain_is_still_saved() {
        let store = Arc::new(InMemoryLogoStore::new());
        let service = service(
            r#"{"prompt":"fox"}"#,
            vec![
                CountingBackend::failing("flux") as Arc<dyn ImageBackend>,
                CountingBackend::failing("sdxl") as Arc<dyn ImageBackend>,
            ],
            store.clone(),
        );

        let outcome = service.generate(request()).await;

        assert!(outcome.error.is_none());
        assert_eq!(outcome.image.mime(), ImageMime::Svg);
        assert_eq!(outcome.attempts.len(), 2);
        assert_eq!(store.len(), 1);
        assert!(outcome.to_response().error.is_none());
    }

    #[tokio::test]
    async fn composition_failure_skips_backends_and_store() {
        let store = Arc::new(InMemoryLogoStore::new());
        let backend = CountingBackend::returning("flux", png_bytes(50));
        let service = service("{not json", vec![backend.clone() as Arc<dyn ImageBackend>], store.clone());

        let outcome = service.generate(request()).await;

        assert!(matches!(outcome.error, Some(LogoError::PromptComposition(_))));
        assert_eq!(outcome.image.mime(), ImageMime::Svg);
        assert!(String::from_utf8_lossy(outcome.image.data()).contains("Blue Fox"));
        assert!(outcome.persistence.is_none());
        assert_eq!(backend.calls(), 0);
        assert!(store.is_empty());
        assert_eq!(outcome.to_response().error.as_deref(), Some(FALLBACK_MESSAGE));
    }

    #[tokio::test]
    async fn persistence_failure_is_a_warning() {
        let backend = CountingBackend::returning("flux", png_bytes(50));
        let service = service(r#"{"prompt":"fox"}"#, vec![backend as Arc<dyn ImageBackend>], Arc::new(BrokenStore));

        let outcome = service.generate(request()).await;
        let response = outcome.to_response();

        assert!(response.error.is_none());
        assert!(response.image.starts_with("data:image/png;base64,"));
        assert!(response.warning.unwrap().contains("quota exceeded"));
    }
}
