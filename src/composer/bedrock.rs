use async_trait::async_trait;
use aws_sdk_bedrockruntime::{error::ProvideErrorMetadata, primitives::Blob, Client};
use serde_json::{json, Value};

use crate::{
    composer::text_model::{TextModel, REFINEMENT_INSTRUCTION},
    config::BedrockConfig,
    error::{LogoError, Result},
};

/// Prompt refinement through an AWS Bedrock text model.
pub struct BedrockTextModel {
    client: Client,
    model_id: String,
}

impl BedrockTextModel {
    pub async fn new(config: &BedrockConfig) -> Result<Self> {
        let aws_config = if let (Some(access_key), Some(secret_key)) =
            (&config.access_key, &config.secret_key)
        {
            aws_config::from_env()
                .credentials_provider(aws_sdk_bedrockruntime::config::Credentials::new(
                    access_key,
                    secret_key,
                    None,
                    None,
                    "logogen-refiner",
                ))
                .region(aws_sdk_bedrockruntime::config::Region::new(
                    config
                        .region
                        .clone()
                        .unwrap_or_else(|| "us-east-1".to_string()),
                ))
                .load()
                .await
        } else {
            aws_config::load_from_env().await
        };

        Ok(Self {
            client: Client::new(&aws_config),
            model_id: config.model_id.clone(),
        })
    }

    fn build_payload(&self, prompt: &str) -> Result<Value> {
        let payload = match self.model_id.as_str() {
            id if id.starts_with("anthropic.claude") || id.starts_with("arn:aws:bedrock") => {
                json!({
                    "system": REFINEMENT_INSTRUCTION,
                    "messages": [{ "role": "user", "content": prompt }],
                    "max_tokens": 1024,
                    "temperature": 1.0,
                    "anthropic_version": "bedrock-2023-05-31"
                })
            }
            id if id.starts_with("amazon.titan") => json!({
                "inputText": format!("{}\n\n{}", REFINEMENT_INSTRUCTION, prompt),
                "textGenerationConfig": {
                    "maxTokenCount": 1024,
                    "temperature": 0.9,
                    "topP": 0.9
                }
            }),
            _ => {
                return Err(LogoError::RequestError(format!(
                    "Unsupported refinement model: {}",
                    self.model_id
                )))
            }
        };

        Ok(payload)
    }
}

/// Pulls the generated text out of an Anthropic or Titan response body.
pub(crate) fn extract_text(model_id: &str, body: &Value) -> Result<String> {
    let text = if model_id.starts_with("amazon.titan") {
        body["results"][0]["outputText"].as_str().map(String::from)
    } else {
        body["content"].as_array().map(|blocks| {
            blocks
                .iter()
                .filter_map(|block| block["text"].as_str())
                .collect::<String>()
        })
    };

    text.filter(|t| !t.trim().is_empty())
        .ok_or_else(|| LogoError::ResponseError("Bedrock returned no text".into()))
}

#[async_trait]
impl TextModel for BedrockTextModel {
    fn name(&self) -> &str {
        &self.model_id
    }

    async fn generate_json(&self, prompt: &str) -> Result<String> {
        let request_json = serde_json::to_string(&self.build_payload(prompt)?)
            .map_err(|e| LogoError::SerializationError(e.to_string()))?;

        log::info!("Refining prompt with Bedrock model: {}", self.model_id);

        let response = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type("application/json")
            .accept("application/json")
            .body(Blob::new(request_json.into_bytes()))
            .send()
            .await
            .map_err(|e| {
                if let Some(service_error) = e.as_service_error() {
                    LogoError::ResponseError(format!(
                        "Bedrock service error: {} - {}",
                        service_error.code().unwrap_or("unknown"),
                        service_error.message().unwrap_or("no message")
                    ))
                } else {
                    LogoError::RequestError(format!("AWS SDK error: {}", e))
                }
            })?;

        let body: Value = serde_json::from_slice(&response.body.into_inner())
            .map_err(|e| LogoError::ResponseError(e.to_string()))?;

        extract_text(&self.model_id, &body)
    }
}
