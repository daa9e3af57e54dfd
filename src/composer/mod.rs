#[cfg(feature = "bedrock")]
pub mod bedrock;
pub mod gemini;
pub mod template;
pub mod text_model;

use std::fmt;
use std::sync::Arc;

use crate::{
    config::{Config, RefinerProvider},
    error::{LogoError, Result},
};

#[cfg(feature = "bedrock")]
pub use bedrock::BedrockTextModel;
pub use gemini::GeminiTextModel;
pub use template::{LogoDesign, LogoForm, LOGO_PROMPT};
pub use text_model::TextModel;

/// Backend-ready prompt text returned by the refinement model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefinedPrompt(String);

impl RefinedPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RefinedPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a model reply of the form `{"prompt": "..."}`.
pub fn extract_prompt(reply: &str) -> Result<RefinedPrompt> {
    let parsed: serde_json::Value = serde_json::from_str(reply.trim()).map_err(|e| {
        LogoError::PromptComposition(format!("model reply is not JSON: {}", e))
    })?;
    let object = parsed.as_object().ok_or_else(|| {
        LogoError::PromptComposition("model reply is not a JSON object".into())
    })?;

    match object.get("prompt") {
        Some(serde_json::Value::String(prompt)) if !prompt.trim().is_empty() => {
            Ok(RefinedPrompt(prompt.clone()))
        }
        Some(serde_json::Value::String(_)) => Err(LogoError::PromptComposition(
            "model reply has an empty 'prompt' field".into(),
        )),
        Some(_) => Err(LogoError::PromptComposition(
            "model reply 'prompt' field is not a string".into(),
        )),
        None => Err(LogoError::PromptComposition(
            "model reply has no 'prompt' field".into(),
        )),
    }
}

#[derive(Clone)]
pub struct PromptComposer {
    model: Arc<dyn TextModel>,
}

impl PromptComposer {
    pub fn new(model: Arc<dyn TextModel>) -> Self {
        Self { model }
    }

    pub async fn from_config(config: &Config) -> Result<Self> {
        let model: Arc<dyn TextModel> = match config.refiner {
            RefinerProvider::Gemini => Arc::new(GeminiTextModel::new(&config.gemini)?),
            RefinerProvider::Bedrock => {
                #[cfg(feature = "bedrock")]
                {
                    Arc::new(BedrockTextModel::new(&config.bedrock).await?)
                }
                #[cfg(not(feature = "bedrock"))]
                {
                    return Err(LogoError::ConfigError(
                        "Bedrock feature not enabled".into(),
                    ));
                }
            }
        };

        Ok(Self::new(model))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Single attempt; every failure comes back as `PromptComposition`.
    pub async fn refine(&self, template: &str) -> Result<RefinedPrompt> {
        if template.trim().is_empty() {
            return Err(LogoError::PromptComposition("prompt template is empty".into()));
        }

        let reply = self.model.generate_json(template).await.map_err(|e| match e {
            LogoError::PromptComposition(_) => e,
            other => LogoError::PromptComposition(other.to_string()),
        })?;

        let prompt = extract_prompt(&reply)?;
        log::debug!("Refined prompt: {}", prompt);
        Ok(prompt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedModel {
        reply: Result<String>,
        calls: AtomicUsize,
    }

    impl CannedModel {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: Err(LogoError::RequestError("connection reset".into())),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl TextModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        async fn generate_json(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(LogoError::RequestError(e.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn extracts_prompt_field() {
        let model = CannedModel::replying(r#"{"prompt": "minimal blue fox head, flat vector"}"#);
        let composer = PromptComposer::new(model.clone());

        let prompt = composer.refine("blue fox logo").await.unwrap();
        assert_eq!(prompt.as_str(), "minimal blue fox head, flat vector");
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn model_failure_is_not_retried() {
        let model = CannedModel::failing();
        let composer = PromptComposer::new(model.clone());

        let err = composer.refine("blue fox logo").await.unwrap_err();
        assert!(matches!(err, LogoError::PromptComposition(ref msg) if msg.contains("connection reset")));
        assert_eq!(model.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_template_never_reaches_the_model() {
        let model = CannedModel::replying(r#"{"prompt": "x"}"#);
        let composer = PromptComposer::new(model.clone());

        assert!(composer.refine("   ").await.is_err());
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn rejects_unusable_replies() {
        for reply in [
            "not json at all",
            "[\"prompt\"]",
            "{}",
            r#"{"prompt": 42}"#,
            r#"{"prompt": "  "}"#,
            "```json\n{\"prompt\": \"fox\"}\n```",
        ] {
            let err = extract_prompt(reply).unwrap_err();
            assert!(matches!(err, LogoError::PromptComposition(_)), "{}", reply);
        }
    }
}
