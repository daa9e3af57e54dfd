use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{LogoError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageMime {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/svg+xml")]
    Svg,
}

impl ImageMime {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageMime::Png => "image/png",
            ImageMime::Svg => "image/svg+xml",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "image/png" => Some(ImageMime::Png),
            "image/svg+xml" => Some(ImageMime::Svg),
            _ => None,
        }
    }
}

impl fmt::Display for ImageMime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Image payload that always carries its MIME type.
///
/// Serializes as a `data:<mime>;base64,<payload>` URI. The byte buffer is
/// never empty: both constructors reject an empty payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    mime: ImageMime,
    data: Vec<u8>,
}

impl GeneratedImage {
    pub fn new(mime: ImageMime, data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(LogoError::InvalidImage("image payload is empty".into()));
        }
        if mime == ImageMime::Svg && std::str::from_utf8(&data).is_err() {
            return Err(LogoError::InvalidImage("SVG payload is not UTF-8".into()));
        }
        Ok(Self { mime, data })
    }

    pub fn png(data: Vec<u8>) -> Result<Self> {
        Self::new(ImageMime::Png, data)
    }

    pub fn svg(markup: String) -> Result<Self> {
        Self::new(ImageMime::Svg, markup.into_bytes())
    }

    /// Wraps SVG markup the crate generated itself; callers guarantee it is non-empty.
    pub(crate) fn from_svg_markup(markup: String) -> Self {
        debug_assert!(!markup.is_empty());
        Self {
            mime: ImageMime::Svg,
            data: markup.into_bytes(),
        }
    }

    pub fn mime(&self) -> ImageMime {
        self.mime
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime, self.to_base64())
    }

    pub fn from_data_uri(uri: &str) -> Result<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| LogoError::InvalidImage("missing 'data:' scheme".into()))?;
        let (mime, payload) = rest
            .split_once(";base64,")
            .ok_or_else(|| LogoError::InvalidImage("data URI is not base64-encoded".into()))?;
        let mime = ImageMime::parse(mime)
            .ok_or_else(|| LogoError::InvalidImage(format!("unsupported MIME type '{}'", mime)))?;
        let data = STANDARD
            .decode(payload)
            .map_err(|e| LogoError::InvalidImage(e.to_string()))?;
        Self::new(mime, data)
    }
}

impl Serialize for GeneratedImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_data_uri())
    }
}

impl<'de> Deserialize<'de> for GeneratedImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let uri = String::deserialize(deserializer)?;
        GeneratedImage::from_data_uri(&uri).map_err(serde::de::Error::custom)
    }
}
