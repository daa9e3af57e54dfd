pub mod http;
pub mod placeholder;
pub mod resolver;
pub mod traits;

use std::sync::Arc;

use crate::config::Config;

pub use http::HttpImageBackend;
pub use placeholder::{placeholder_image, placeholder_svg};
pub use resolver::{FallbackResolver, ImageSource, Resolution, ResolverState};
pub use traits::ImageBackend;

impl FallbackResolver {
    /// One HTTP backend per configured entry, in configured order.
    pub fn from_config(config: &Config) -> Self {
        let client = reqwest::Client::new();
        let backends = config
            .backends
            .iter()
            .map(|backend| {
                let token = backend
                    .credential
                    .as_deref()
                    .and_then(|name| config.credential(name))
                    .map(String::from);
                if backend.credential.is_some() && token.is_none() {
                    log::warn!("No credential configured for backend '{}'", backend.name);
                }
                Arc::new(HttpImageBackend::with_client(client.clone(), backend, token))
                    as Arc<dyn ImageBackend>
            })
            .collect();

        Self::new(backends)
    }
}
