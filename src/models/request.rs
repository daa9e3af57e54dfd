use serde::{Deserialize, Serialize};

/// Body of `POST /api/ai-logo-model`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateLogoBody {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateLogoResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoRequest {
    pub prompt_template: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
}

impl LogoRequest {
    /// Text drawn into the placeholder image: the title, or the template when
    /// the title is empty. A whitespace-only title is still used.
    pub fn placeholder_label(&self) -> &str {
        if self.title.is_empty() {
            &self.prompt_template
        } else {
            &self.title
        }
    }
}

impl From<GenerateLogoBody> for LogoRequest {
    fn from(body: GenerateLogoBody) -> Self {
        Self {
            prompt_template: body.prompt,
            owner_id: body.email,
            title: body.title,
            description: body.desc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_empty() {
        let body: GenerateLogoBody =
            serde_json::from_str(r#"{"prompt":"a fox","email":"a@b.co"}"#).unwrap();
        let request = LogoRequest::from(body);
        assert_eq!(request.prompt_template, "a fox");
        assert_eq!(request.owner_id, "a@b.co");
        assert!(request.title.is_empty());
        assert_eq!(request.placeholder_label(), "a fox");
    }

    #[test]
    fn blank_title_is_still_a_label() {
        let request = LogoRequest {
            prompt_template: "a fox".into(),
            owner_id: "a@b.co".into(),
            title: "  ".into(),
            description: String::new(),
        };
        assert_eq!(request.placeholder_label(), "  ");
    }

    #[test]
    fn response_omits_absent_fields() {
        let response = GenerateLogoResponse {
            error: None,
            image: "data:image/png;base64,AA==".into(),
            warning: None,
        };
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            serde_json::json!({ "image": "data:image/png;base64,AA==" })
        );
    }
}
