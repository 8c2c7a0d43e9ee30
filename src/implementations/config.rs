use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::config::RunConfig;
use crate::errors::ProofsmithError;
use crate::models::common::{ FeedbackStrategy, ProofLanguage };

/// Key sent to endpoints that do not check credentials (Ollama and friends)
pub const PLACEHOLDER_API_KEY: &str = "ollama";
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:11434/v1/";
pub const DEFAULT_MODEL: &str = "mistral-small3.2:latest";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for ProofsmithError {
    fn from(err: ConfigError) -> Self {
        ProofsmithError::Config(err.to_string())
    }
}

/// Connection settings for an OpenAI-compatible chat-completion endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub api_base_url: String,
    /// `None` sends the placeholder key
    pub api_key: Option<String>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 2000,
        }
    }
}

impl ModelConfig {
    pub fn api_key_or_placeholder(&self) -> &str {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => key,
            _ => PLACEHOLDER_API_KEY,
        }
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_base_url.trim_end_matches('/'))
    }
}

/// The checker program and the mode arguments placed before the proof file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifierConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Extension given to the temporary proof file
    pub file_extension: String,
}

impl VerifierConfig {
    pub fn for_language(language: ProofLanguage) -> Self {
        let (program, args) = language.default_verifier();
        Self {
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            file_extension: language.file_extension().to_string(),
        }
    }
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self::for_language(ProofLanguage::default())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub api_base_url: Option<String>,
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct VerifierSection {
    pub program: Option<String>,
    pub args: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunSection {
    pub max_attempts: Option<u32>,
    pub language: Option<ProofLanguage>,
    pub feedback: Option<FeedbackStrategy>,
    /// Seconds; 0 disables the timeout
    pub generation_timeout_secs: Option<u64>,
    /// Seconds; 0 disables the timeout
    pub verification_timeout_secs: Option<u64>,
}

/// Contents of a proofsmith YAML configuration file. Every section is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProofsmithConfig {
    pub api: ApiSection,
    pub verifier: VerifierSection,
    pub run: RunSection,
}

impl ProofsmithConfig {
    /// Load configuration from a YAML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ProofsmithConfig = serde_yaml::from_str(contents)?;
        Ok(config)
    }

    /// Model settings from defaults, then this file, then the process environment
    pub fn model_config(&self) -> ModelConfig {
        self.model_config_with_env(|name| std::env::var(name).ok())
    }

    /// Same as [`model_config`](Self::model_config) with an injectable environment lookup
    pub fn model_config_with_env<F>(&self, env: F) -> ModelConfig
        where F: Fn(&str) -> Option<String>
    {
        use log::debug;

        let mut config = ModelConfig::default();

        if let Some(url) = &self.api.api_base_url {
            config.api_base_url = url.clone();
        }
        if let Some(key) = &self.api.api_key {
            debug!("Using API key from config file");
            config.api_key = Some(key.clone());
        }
        if let Some(model) = &self.api.model {
            config.model = model.clone();
        }
        if let Some(temperature) = self.api.temperature {
            config.temperature = temperature;
        }
        if let Some(max_tokens) = self.api.max_tokens {
            config.max_tokens = max_tokens;
        }

        if let Some(url) = non_empty(env("PROOFSMITH_API_BASE")) {
            debug!("Using API base URL from PROOFSMITH_API_BASE");
            config.api_base_url = url;
        }
        for var in ["PROOFSMITH_API_KEY", "OPENAI_API_KEY"] {
            if let Some(key) = non_empty(env(var)) {
                debug!("Using API key from {}", var);
                config.api_key = Some(key);
                break;
            }
        }
        if let Some(model) = non_empty(env("PROOFSMITH_MODEL")) {
            debug!("Using model from PROOFSMITH_MODEL");
            config.model = model;
        }

        config
    }

    pub fn verifier_config(&self, language: ProofLanguage) -> VerifierConfig {
        let mut config = VerifierConfig::for_language(language);
        if let Some(program) = &self.verifier.program {
            config.program = program.clone();
            // Mode flags of the default tool make no sense for a different program
            config.args.clear();
        }
        if let Some(args) = &self.verifier.args {
            config.args = args.clone();
        }
        config
    }

    pub fn run_config(&self) -> Result<RunConfig, ConfigError> {
        let mut config = RunConfig::default();
        if let Some(max_attempts) = self.run.max_attempts {
            config.max_attempts = max_attempts;
        }
        if let Some(language) = self.run.language {
            config.language = language;
        }
        if let Some(feedback) = self.run.feedback {
            config.feedback = feedback;
        }
        if let Some(secs) = self.run.generation_timeout_secs {
            config.generation_timeout = timeout_from_secs(secs);
        }
        if let Some(secs) = self.run.verification_timeout_secs {
            config.verification_timeout = timeout_from_secs(secs);
        }
        config.validate().map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(config)
    }
}

/// Zero seconds means "no timeout"
pub fn timeout_from_secs(secs: u64) -> Option<Duration> {
    if secs == 0 { None } else { Some(Duration::from_secs(secs)) }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
