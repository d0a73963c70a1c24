//! Configuration schema for the Slidecraft assistant.

use crate::error::ConfigError;
use log::debug;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Default system prompt describing the iterative authoring flow.
const DEFAULT_SYSTEM_PROMPT: &str = "\
You are an AI assistant that helps user to create PowerPoint presentation for a specific topic or basing on provided information.
Here is the process:
- Step 1: You ask the user for the topic or information for the presentation.
- Step 2: You suggest the title and detailed contents for each slide of the presentation.
- Step 3: You ask the user if they want to make the presentation longer or shorter. You update the presentation contents basing on the user's feedback. Repeat this step until the user is OK.
- Step 4: You ask the user if they want to generate the presentation file now or review each slide of the presentation. Go to step 6 if the user want to generate the presentation file now. Go to step 5 if the user want to review each slide.
- Step 5: You go through each slide of the presentation and ask the user if they are OK with the slide. You update the slide contents basing on the user's feedback. Repeat this step until the user is OK.
- Step 6: You use function calling (tools call) to generate the presentation with the contents that have been finalized.
";

/// Credentials for the chat-completion endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "provider")]
pub enum ApiCredentials {
    /// Direct OpenAI endpoint with bearer auth.
    OpenAi {
        /// API key sent as a bearer token.
        api_key: String,
    },
    /// Azure-hosted deployment with an `api-key` header.
    Azure {
        /// API key sent in the `api-key` header.
        api_key: String,
        /// Resource endpoint base URL.
        endpoint: String,
        /// API version query parameter.
        api_version: String,
    },
}

/// Root configuration for the assistant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AssistantConfig {
    /// Model endpoint credentials.
    pub credentials: ApiCredentials,
    /// Model identifier (or Azure deployment name).
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature for every model call.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// System instruction prepended to every prompt.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Path to the presentation template asset.
    #[serde(default = "default_template_path")]
    pub template_path: PathBuf,
    /// Index of the title layout within the template's layout collection.
    #[serde(default)]
    pub title_layout_index: usize,
    /// Index of the content layout within the template's layout collection.
    #[serde(default = "default_content_layout_index")]
    pub content_layout_index: usize,
    /// Root directory under which per-session output directories are created.
    #[serde(default = "default_output_root")]
    pub output_root: PathBuf,
}

impl AssistantConfig {
    /// Start building a config programmatically with defaults applied.
    pub fn builder(credentials: ApiCredentials) -> AssistantConfigBuilder {
        AssistantConfigBuilder::new(credentials)
    }

    /// Load configuration from environment variables.
    ///
    /// Missing credentials is the only fatal condition; every other setting
    /// falls back to its default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let credentials = credentials_from_env()?;
        let mut config = Self::builder(credentials).build();
        apply_env_overrides(&mut config)?;
        Ok(config)
    }

    /// Load configuration from a JSON5 file, with env values taking
    /// precedence for any setting present in the environment.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        debug!("loading config file ({})", path.display());
        let raw = std::fs::read_to_string(path)?;
        let mut config: AssistantConfig = json5::from_str(&raw)?;
        if let Ok(env_credentials) = credentials_from_env() {
            config.credentials = env_credentials;
        }
        apply_env_overrides(&mut config)?;
        Ok(config)
    }
}

/// Builder for assembling an `AssistantConfig` in code.
#[derive(Debug, Clone)]
pub struct AssistantConfigBuilder {
    config: AssistantConfig,
}

impl AssistantConfigBuilder {
    /// Create a new builder seeded with default config values.
    pub fn new(credentials: ApiCredentials) -> Self {
        Self {
            config: AssistantConfig {
                credentials,
                model: default_model(),
                temperature: default_temperature(),
                system_prompt: default_system_prompt(),
                template_path: default_template_path(),
                title_layout_index: 0,
                content_layout_index: default_content_layout_index(),
                output_root: default_output_root(),
            },
        }
    }

    /// Replace the model identifier.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Replace the sampling temperature.
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = temperature;
        self
    }

    /// Replace the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Replace the template asset path.
    pub fn template_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.template_path = path.into();
        self
    }

    /// Replace both layout indices.
    pub fn layout_indices(mut self, title: usize, content: usize) -> Self {
        self.config.title_layout_index = title;
        self.config.content_layout_index = content;
        self
    }

    /// Replace the output root directory.
    pub fn output_root(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_root = path.into();
        self
    }

    /// Finalize and return the built `AssistantConfig`.
    pub fn build(self) -> AssistantConfig {
        self.config
    }
}

/// Resolve credentials from the environment.
///
/// A non-empty `OPENAI_KEY` selects the direct endpoint; otherwise a
/// non-empty `AZURE_OPENAI_KEY` selects the Azure variant and requires its
/// endpoint and version companions.
fn credentials_from_env() -> Result<ApiCredentials, ConfigError> {
    if let Some(api_key) = non_empty_var("OPENAI_KEY") {
        return Ok(ApiCredentials::OpenAi { api_key });
    }
    if let Some(api_key) = non_empty_var("AZURE_OPENAI_KEY") {
        let endpoint = non_empty_var("AZURE_OPENAI_ENDPOINT")
            .ok_or(ConfigError::IncompleteAzure("AZURE_OPENAI_ENDPOINT"))?;
        let api_version = non_empty_var("AZURE_OPENAI_VERSION")
            .ok_or(ConfigError::IncompleteAzure("AZURE_OPENAI_VERSION"))?;
        return Ok(ApiCredentials::Azure {
            api_key,
            endpoint,
            api_version,
        });
    }
    Err(ConfigError::MissingCredentials)
}

/// Overlay environment variables onto an existing config.
fn apply_env_overrides(config: &mut AssistantConfig) -> Result<(), ConfigError> {
    if let Some(model) = non_empty_var("GPT_MODEL") {
        config.model = model;
    }
    if let Some(raw) = non_empty_var("TEMPERATURE") {
        config.temperature = parse_var("TEMPERATURE", &raw)?;
    }
    if let Some(prompt) = non_empty_var("SYSTEM_PROMPT") {
        config.system_prompt = prompt;
    }
    if let Some(path) = non_empty_var("TEMPLATE_FILE") {
        config.template_path = PathBuf::from(path);
    }
    if let Some(raw) = non_empty_var("TITLE_TEMPLATE_SLIDE_INDEX") {
        config.title_layout_index = parse_var("TITLE_TEMPLATE_SLIDE_INDEX", &raw)?;
    }
    if let Some(raw) = non_empty_var("CONTENT_TEMPLATE_SLIDE_INDEX") {
        config.content_layout_index = parse_var("CONTENT_TEMPLATE_SLIDE_INDEX", &raw)?;
    }
    if let Some(path) = non_empty_var("OUTPUT_ROOT") {
        config.output_root = PathBuf::from(path);
    }
    Ok(())
}

/// Read an environment variable, treating empty values as absent.
fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.is_empty())
}

/// Parse an environment variable value, naming the variable on failure.
fn parse_var<T: std::str::FromStr>(
    variable: &'static str,
    raw: &str,
) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|err: T::Err| ConfigError::InvalidVar {
        variable,
        message: err.to_string(),
    })
}

/// Default model identifier.
fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

/// Default sampling temperature.
fn default_temperature() -> f32 {
    0.7
}

/// Default system prompt text.
fn default_system_prompt() -> String {
    DEFAULT_SYSTEM_PROMPT.to_string()
}

/// Default template asset path.
fn default_template_path() -> PathBuf {
    PathBuf::from("template.pptx")
}

/// Default content-layout index within the template's layout collection.
fn default_content_layout_index() -> usize {
    1
}

/// Default per-session output root.
fn default_output_root() -> PathBuf {
    PathBuf::from(".files")
}
