//! Logo generation server core.
//!
//! A request's prompt template is refined by a text model
//! ([`composer::PromptComposer`]), turned into an image by the first
//! backend in [`backends::FallbackResolver`] that answers, or by a local SVG
//! placeholder when none does, then saved through a [`storage::LogoStore`].

pub mod backends;
pub mod composer;
pub mod config;
pub mod error;
pub mod logger;
pub mod models;
#[cfg(feature = "server")]
pub mod server;
pub mod service;
pub mod storage;

pub use backends::{FallbackResolver, HttpImageBackend, ImageBackend, ImageSource, Resolution};
pub use composer::{LogoForm, PromptComposer, RefinedPrompt, TextModel};
pub use config::{BackendConfig, BodyFormat, Config};
pub use error::{BackendFailure, LogoError, Result};
pub use models::*;
pub use service::{GenerationOutcome, LogoService};
pub use storage::{InMemoryLogoStore, LogoStore};

