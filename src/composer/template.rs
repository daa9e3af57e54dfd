use serde::{Deserialize, Serialize};

pub const LOGO_PROMPT: &str = "Create a text prompt for an AI image model to generate a logo for \
the brand \"{logoTitle}\" ({logoDesc}). Use the {logoColor} color palette and build on the idea \
\"{logoIdea}\". The design style is {logoDesign}: {logoPrompt}. Return the result as JSON with a \
single \"prompt\" field.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoDesign {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub prompt: String,
}

/// Fields collected by the logo wizard, in the shape the web client stores them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogoForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
    #[serde(default, alias = "pallete")]
    pub palette: String,
    #[serde(default)]
    pub idea: String,
    #[serde(default)]
    pub design: Option<LogoDesign>,
}

impl LogoForm {
    pub fn render(&self) -> String {
        self.render_with(LOGO_PROMPT)
    }

    /// Substitutes the first occurrence of each placeholder. Missing values
    /// render as empty text.
    pub fn render_with(&self, template: &str) -> String {
        let design = self.design.clone().unwrap_or_default();
        [
            ("{logoTitle}", self.title.as_str()),
            ("{logoDesc}", self.desc.as_str()),
            ("{logoColor}", self.palette.as_str()),
            ("{logoIdea}", self.idea.as_str()),
            ("{logoDesign}", design.title.as_str()),
            ("{logoPrompt}", design.prompt.as_str()),
        ]
        .into_iter()
        .fold(template.to_string(), |acc, (placeholder, value)| {
            acc.replacen(placeholder, value, 1)
        })
    }
}
