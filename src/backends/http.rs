use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::{
    backends::traits::ImageBackend,
    config::{BackendConfig, BodyFormat},
    error::{BackendFailure, LogoError, Result},
};

/// Text-to-image backend reached with a single POST that answers with raw
/// image bytes (Hugging Face inference router and compatible endpoints).
pub struct HttpImageBackend {
    client: Client,
    name: String,
    endpoint: String,
    timeout: Duration,
    body: BodyFormat,
    token: Option<String>,
}

impl HttpImageBackend {
    pub fn new(config: &BackendConfig, token: Option<String>) -> Self {
        Self::with_client(Client::new(), config, token)
    }

    pub fn with_client(client: Client, config: &BackendConfig, token: Option<String>) -> Self {
        Self {
            client,
            name: config.name.clone(),
            endpoint: config.endpoint.clone(),
            timeout: config.timeout(),
            body: config.body,
            token,
        }
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token)).map_err(|e| {
                LogoError::ConfigError(format!("invalid token for '{}': {}", self.name, e))
            })?;
            headers.insert(AUTHORIZATION, value);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("image/png"));
        Ok(headers)
    }

    fn request_body(&self, prompt: &str) -> Result<Vec<u8>> {
        match self.body {
            BodyFormat::Raw => Ok(prompt.as_bytes().to_vec()),
            BodyFormat::Inputs => serde_json::to_vec(&json!({ "inputs": prompt }))
                .map_err(|e| LogoError::SerializationError(e.to_string())),
        }
    }

    fn failure(&self, reason: BackendFailure) -> LogoError {
        LogoError::backend(&self.name, reason)
    }
}

#[async_trait]
impl ImageBackend for HttpImageBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn attempt(&self, prompt: &str, timeout: Duration) -> Result<Vec<u8>> {
        log::debug!("POST {} ({:?} body)", self.endpoint, self.body);

        let response = self
            .client
            .post(&self.endpoint)
            .headers(self.build_headers()?)
            .timeout(timeout)
            .body(self.request_body(prompt)?)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    self.failure(BackendFailure::Timeout(timeout))
                } else {
                    self.failure(BackendFailure::Transport(e.to_string()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            log::debug!("{} answered {}: {}", self.name, status, detail);
            return Err(self.failure(BackendFailure::Status(status.as_u16())));
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                self.failure(BackendFailure::Timeout(timeout))
            } else {
                self.failure(BackendFailure::Transport(e.to_string()))
            }
        })?;

        if bytes.is_empty() {
            return Err(self.failure(BackendFailure::EmptyBody));
        }

        Ok(bytes.to_vec())
    }
}

#[cfg(all(test, feature = "server"))]
mod tests {
    use super::*;
    use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
    use std::time::Instant;

    const TOKEN: &str = "hf_test_token";

    async fn spawn_upstream() -> String {
        let server = HttpServer::new(|| {
            App::new()
                // Echoes the request body back so tests can inspect it.
                .route(
                    "/echo",
                    web::post().to(|req: HttpRequest, body: web::Bytes| async move {
                        let authorized = req
                            .headers()
                            .get("authorization")
                            .and_then(|v| v.to_str().ok())
                            == Some("Bearer hf_test_token");
                        if authorized {
                            HttpResponse::Ok().content_type("image/png").body(body)
                        } else {
                            HttpResponse::Unauthorized().finish()
                        }
                    }),
                )
                .route(
                    "/unavailable",
                    web::post().to(|| async { HttpResponse::ServiceUnavailable().body("loading") }),
                )
                .route(
                    "/empty",
                    web::post().to(|| async { HttpResponse::Ok().finish() }),
                )
                .route(
                    "/slow",
                    web::post().to(|| async {
                        actix_web::rt::time::sleep(Duration::from_secs(3)).await;
                        HttpResponse::Ok().body(vec![1u8, 2, 3])
                    }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{}", addr)
    }

    fn backend(base: &str, path: &str, body: BodyFormat) -> HttpImageBackend {
        let config = BackendConfig::new(path.trim_start_matches('/'), format!("{}{}", base, path), 5_000)
            .with_body(body);
        HttpImageBackend::new(&config, Some(TOKEN.to_string()))
    }

    #[actix_web::test]
    async fn raw_body_carries_prompt_text() {
        let base = spawn_upstream().await;
        let backend = backend(&base, "/echo", BodyFormat::Raw);

        let bytes = backend.attempt("blue fox logo", backend.timeout()).await.unwrap();
        assert_eq!(bytes, b"blue fox logo");
    }

    #[actix_web::test]
    async fn inputs_body_wraps_prompt_in_json() {
        let base = spawn_upstream().await;
        let backend = backend(&base, "/echo", BodyFormat::Inputs);

        let bytes = backend.attempt("blue fox logo", backend.timeout()).await.unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value, json!({ "inputs": "blue fox logo" }));
    }

    #[actix_web::test]
    async fn missing_token_is_rejected_upstream() {
        let base = spawn_upstream().await;
        let config = BackendConfig::new("echo", format!("{}/echo", base), 5_000);
        let backend = HttpImageBackend::new(&config, None);

        let err = backend.attempt("fox", backend.timeout()).await.unwrap_err();
        assert!(matches!(
            err,
            LogoError::BackendCall { reason: BackendFailure::Status(401), .. }
        ));
    }

    #[actix_web::test]
    async fn non_success_status_is_a_failure() {
        let base = spawn_upstream().await;
        let backend = backend(&base, "/unavailable", BodyFormat::Raw);

        let err = backend.attempt("fox", backend.timeout()).await.unwrap_err();
        assert!(matches!(
            err,
            LogoError::BackendCall { reason: BackendFailure::Status(503), .. }
        ));
    }

    #[actix_web::test]
    async fn empty_body_is_a_failure() {
        let base = spawn_upstream().await;
        let backend = backend(&base, "/empty", BodyFormat::Raw);

        let err = backend.attempt("fox", backend.timeout()).await.unwrap_err();
        assert!(matches!(
            err,
            LogoError::BackendCall { reason: BackendFailure::EmptyBody, .. }
        ));
    }

    #[actix_web::test]
    async fn slow_backend_times_out() {
        let base = spawn_upstream().await;
        let backend = backend(&base, "/slow", BodyFormat::Raw);

        let started = Instant::now();
        let err = backend
            .attempt("fox", Duration::from_millis(200))
            .await
            .unwrap_err();
        assert!(started.elapsed() < Duration::from_secs(2));
        assert!(matches!(
            err,
            LogoError::BackendCall { reason: BackendFailure::Timeout(_), .. }
        ));
    }

    #[actix_web::test]
    async fn unreachable_endpoint_is_a_transport_failure() {
        let config = BackendConfig::new("nowhere", "http://127.0.0.1:1/generate", 1_000);
        let backend = HttpImageBackend::new(&config, None);

        let err = backend.attempt("fox", backend.timeout()).await.unwrap_err();
        assert!(matches!(
            err,
            LogoError::BackendCall { reason: BackendFailure::Transport(_), .. }
        ));
    }
}
