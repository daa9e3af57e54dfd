use std::sync::Arc;
use std::time::Instant;

use crate::{
    backends::{placeholder::placeholder_image, traits::ImageBackend},
    error::{BackendFailure, LogoError},
    models::GeneratedImage,
};

/// Where a resolved image came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Backend(String),
    Placeholder,
}

/// Outcome of one resolution. `attempts` lists every backend failure, in
/// the order the backends were tried.
#[derive(Debug)]
pub struct Resolution {
    pub image: GeneratedImage,
    pub source: ImageSource,
    pub attempts: Vec<LogoError>,
}

impl Resolution {
    pub fn is_placeholder(&self) -> bool {
        self.source == ImageSource::Placeholder
    }
}

/// Per-request progress through the fallback chain.
#[derive(Debug)]
pub enum ResolverState {
    NotStarted,
    TryingBackend(usize),
    Success { backend: usize, image: GeneratedImage },
    AllFailed,
    Done(Resolution),
}

/// Tries each backend in order, one shot each, and falls back to a local
/// SVG when the chain is exhausted. `resolve` never fails.
#[derive(Clone)]
pub struct FallbackResolver {
    backends: Vec<Arc<dyn ImageBackend>>,
}

impl FallbackResolver {
    pub fn new(backends: Vec<Arc<dyn ImageBackend>>) -> Self {
        Self { backends }
    }

    pub fn backends(&self) -> impl Iterator<Item = &str> {
        self.backends.iter().map(|b| b.name())
    }

    pub async fn resolve(&self, prompt: &str, label: &str) -> Resolution {
        let mut attempts = Vec::new();
        let mut state = ResolverState::NotStarted;

        loop {
            state = match state {
                ResolverState::NotStarted => self.first_state(),
                ResolverState::TryingBackend(index) => match self.attempt(index, prompt).await {
                    Ok(image) => ResolverState::Success {
                        backend: index,
                        image,
                    },
                    Err(err) => {
                        log::warn!("{}", err);
                        attempts.push(err);
                        if index + 1 < self.backends.len() {
                            ResolverState::TryingBackend(index + 1)
                        } else {
                            ResolverState::AllFailed
                        }
                    }
                },
                ResolverState::Success { backend, image } => {
                    let name = self.backends[backend].name().to_string();
                    log::info!("Image generated by '{}'", name);
                    ResolverState::Done(Resolution {
                        image,
                        source: ImageSource::Backend(name),
                        attempts: std::mem::take(&mut attempts),
                    })
                }
                ResolverState::AllFailed => {
                    log::warn!(
                        "All {} image backends failed, using SVG placeholder",
                        self.backends.len()
                    );
                    ResolverState::Done(Resolution {
                        image: placeholder_image(label),
                        source: ImageSource::Placeholder,
                        attempts: std::mem::take(&mut attempts),
                    })
                }
                ResolverState::Done(resolution) => return resolution,
            };
        }
    }

    fn first_state(&self) -> ResolverState {
        if self.backends.is_empty() {
            ResolverState::AllFailed
        } else {
            ResolverState::TryingBackend(0)
        }
    }

    async fn attempt(&self, index: usize, prompt: &str) -> crate::error::Result<GeneratedImage> {
        let backend = &self.backends[index];
        let timeout = backend.timeout();
        log::info!(
            "Trying image backend {}/{} '{}' (timeout {}ms)",
            index + 1,
            self.backends.len(),
            backend.name(),
            timeout.as_millis()
        );

        let started = Instant::now();
        let bytes = match tokio::time::timeout(timeout, backend.attempt(prompt, timeout)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(LogoError::backend(
                    backend.name(),
                    BackendFailure::Timeout(timeout),
                ))
            }
        };
        log::debug!(
            "'{}' returned {} bytes in {}ms",
            backend.name(),
            bytes.len(),
            started.elapsed().as_millis()
        );

        GeneratedImage::png(bytes)
            .map_err(|_| LogoError::backend(backend.name(), BackendFailure::EmptyBody))
    }
}
