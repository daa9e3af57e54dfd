use async_trait::async_trait;

use crate::error::Result;

/// Instruction sent alongside every refinement request.
pub const REFINEMENT_INSTRUCTION: &str = "You turn logo briefs into prompts for a text-to-image \
model. Reply only with a JSON object of the form {\"prompt\": \"<image prompt>\"}.";

/// Generative text model asked for a JSON-encoded answer. One call per
/// request, no retries.
#[async_trait]
pub trait TextModel: Send + Sync {
    fn name(&self) -> &str;

    async fn generate_json(&self, prompt: &str) -> Result<String>;
}
