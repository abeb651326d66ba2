//! Point costs for the generation features.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The generation mode requested by a feature endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationMode {
    /// Text generation.
    Text,
    /// Image generation.
    Image,
    /// Code generation.
    Code,
    /// Speech synthesis.
    Speech,
}

impl GenerationMode {
    /// The wire name of this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Code => "code",
            Self::Speech => "speech",
        }
    }

    /// The feature module that owns this mode, recorded in transaction meta.
    #[must_use]
    pub const fn module(self) -> &'static str {
        match self {
            Self::Text => "smart_insights",
            Self::Image => "creative_studio",
            Self::Code => "content_assistant",
            Self::Speech => "multimedia_hub",
        }
    }
}

impl fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GenerationMode {
    type Err = UnknownMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "code" => Ok(Self::Code),
            "speech" => Ok(Self::Speech),
            _ => Err(UnknownMode),
        }
    }
}

/// Error returned when parsing an unknown generation mode.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown generation mode")]
pub struct UnknownMode;

/// Point cost of each generation mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Cost of a text generation.
    pub text: i64,
    /// Cost of an image generation.
    pub image: i64,
    /// Cost of a code generation.
    pub code: i64,
    /// Cost of a speech synthesis.
    pub speech: i64,
}

impl PricingConfig {
    /// The cost in points of one call in the given mode.
    #[must_use]
    pub const fn cost(&self, mode: GenerationMode) -> i64 {
        match mode {
            GenerationMode::Text => self.text,
            GenerationMode::Image => self.image,
            GenerationMode::Code => self.code,
            GenerationMode::Speech => self.speech,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            text: 10,
            image: 5,
            code: 10,
            speech: 5,
        }
    }
}
