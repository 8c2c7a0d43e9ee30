use std::time::Duration;

use crate::errors::{ ProofsmithError, ProofsmithResult };
use crate::models::common::{ FeedbackStrategy, ProofLanguage };

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(120);
pub const DEFAULT_VERIFICATION_TIMEOUT: Duration = Duration::from_secs(300);

/// Immutable settings for one run of the refinement loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub max_attempts: u32,
    pub language: ProofLanguage,
    pub feedback: FeedbackStrategy,
    /// `None` waits for the generator indefinitely
    pub generation_timeout: Option<Duration>,
    /// `None` waits for the verifier indefinitely
    pub verification_timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            language: ProofLanguage::default(),
            feedback: FeedbackStrategy::default(),
            generation_timeout: Some(DEFAULT_GENERATION_TIMEOUT),
            verification_timeout: Some(DEFAULT_VERIFICATION_TIMEOUT),
        }
    }
}

impl RunConfig {
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_language(mut self, language: ProofLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_feedback(mut self, feedback: FeedbackStrategy) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_generation_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.generation_timeout = timeout;
        self
    }

    pub fn with_verification_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.verification_timeout = timeout;
        self
    }

    pub fn validate(&self) -> ProofsmithResult<()> {
        if self.max_attempts == 0 {
            return Err(ProofsmithError::InvalidInput("max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}
