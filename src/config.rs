use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::llm::{DEFAULT_API_BASE, DEFAULT_MODEL};
use crate::persona::{CatalogError, Persona, PromptCatalog, DEFAULT_PERSONA};

/// RGB color represented as a 3-element array.
pub type Rgb = [u8; 3];

/// LLM configuration for API access.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LlmConfigFile {
    /// API base URL
    pub api_base: String,
    /// API key (GROQ_API_KEY takes precedence)
    pub api_key: Option<String>,
    /// Model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Max tokens for generation
    pub max_tokens: u32,
}

impl Default for LlmConfigFile {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 1024,
        }
    }
}

/// Chat session settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Persona selected at startup
    pub default_persona: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            default_persona: DEFAULT_PERSONA.to_string(),
        }
    }
}

/// Color configuration for the UI.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Chat area gradient start color (Purple by default)
    pub chat_gradient_start: Rgb,
    /// Chat area gradient end color (Blue by default)
    pub chat_gradient_end: Rgb,
    /// Input area gradient start color (Green by default)
    pub input_gradient_start: Rgb,
    /// Input area gradient end color (Cyan by default)
    pub input_gradient_end: Rgb,
    /// User message text
    pub user_text: Rgb,
    /// Assistant message text
    pub assistant_text: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            chat_gradient_start: [147, 51, 234],  // Purple
            chat_gradient_end: [59, 130, 246],    // Blue
            input_gradient_start: [16, 185, 129], // Green
            input_gradient_end: [6, 182, 212],    // Cyan
            user_text: [0, 255, 255],
            assistant_text: [100, 255, 100],
        }
    }
}

/// Behavior configuration for the UI.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Number of lines to scroll with Page Up/Down
    pub scroll_page_size: usize,
    /// Polling interval while waiting for a reply, in milliseconds
    pub busy_poll_ms: u64,
    /// Idle polling interval in milliseconds
    pub idle_poll_ms: u64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            scroll_page_size: 10,
            busy_poll_ms: 16,
            idle_poll_ms: 50,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct Config {
    pub llm: LlmConfigFile,
    pub chat: ChatConfig,
    pub behavior: BehaviorConfig,
    pub colors: ColorConfig,
    /// Replacement persona table. Empty means the built-in personas.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub personas: Vec<Persona>,
}

impl Config {
    /// Returns the config directory: ~/.config/rolechat
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("rolechat"))
    }

    /// Returns the default config file path: ~/.config/rolechat/config.toml
    pub fn default_path() -> Option<PathBuf> {
        Self::config_dir().map(|p| p.join("config.toml"))
    }

    /// Load configuration from the default path, falling back to defaults.
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_path(&path) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                Self::default()
            }
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to a specific path.
    pub fn save_to_path(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Build the persona catalog this config describes.
    ///
    /// A custom table uses `chat.default_persona` as its fallback when the name
    /// is present, otherwise its first entry.
    pub fn catalog(&self) -> Result<PromptCatalog, CatalogError> {
        if self.personas.is_empty() {
            return Ok(PromptCatalog::builtin());
        }

        let default = if self
            .personas
            .iter()
            .any(|p| p.name == self.chat.default_persona)
        {
            self.chat.default_persona.clone()
        } else {
            self.personas[0].name.clone()
        };
        PromptCatalog::new(self.personas.clone(), &default)
    }
}

impl ColorConfig {
    /// Convert an RGB array to a tuple for gradient math.
    pub fn to_tuple(rgb: &Rgb) -> (u8, u8, u8) {
        (rgb[0], rgb[1], rgb[2])
    }

    /// Convert an RGB array to a ratatui Color.
    pub fn to_color(rgb: &Rgb) -> ratatui::style::Color {
        ratatui::style::Color::Rgb(rgb[0], rgb[1], rgb[2])
    }

    /// Get chat gradient colors as tuples.
    pub fn chat_gradient(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        (
            Self::to_tuple(&self.chat_gradient_start),
            Self::to_tuple(&self.chat_gradient_end),
        )
    }

    /// Get input gradient colors as tuples.
    pub fn input_gradient(&self) -> ((u8, u8, u8), (u8, u8, u8)) {
        (
            Self::to_tuple(&self.input_gradient_start),
            Self::to_tuple(&self.input_gradient_end),
        )
    }
}
