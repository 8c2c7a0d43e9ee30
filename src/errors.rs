use std::time::Duration;
use thiserror::Error;

/// Errors raised while talking to the text-generation service
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Generation endpoint unreachable: {0}")]
    Unreachable(String),

    #[error("Authentication rejected by generation endpoint (HTTP {status}): {message}")]
    Unauthorized { status: u16, message: String },

    #[error("Generation endpoint returned HTTP {status}: {message}")]
    Http { status: u16, message: String },

    #[error("Malformed generation response: {0}")]
    MalformedResponse(String),
}

/// Errors that end a run or prevent it from starting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofsmithError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),

    #[error("Verifier `{tool}` not found: {message}")]
    ToolNotFound { tool: String, message: String },

    #[error("Unexpected error during {stage}: {message}")]
    Unexpected { stage: String, message: String },

    #[error("{stage} timed out after {after:?}")]
    Timeout { stage: String, after: Duration },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type specific to proofsmith operations
pub type ProofsmithResult<T> = Result<T, ProofsmithError>;

/// Failure categories a run can encounter.
///
/// Only `MalformedExtraction` and `VerificationFailed` are absorbed by the
/// refinement loop; every other category terminates the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    InputError,
    GenerationError,
    MalformedExtraction,
    ToolNotFound,
    VerificationFailed,
    UnexpectedError,
    TimeoutError,
}

impl ErrorCategory {
    pub fn is_fatal(self) -> bool {
        !matches!(self, ErrorCategory::MalformedExtraction | ErrorCategory::VerificationFailed)
    }
}

impl ProofsmithError {
    pub fn unexpected(stage: impl Into<String>, message: impl ToString) -> Self {
        ProofsmithError::Unexpected {
            stage: stage.into(),
            message: message.to_string(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ProofsmithError::InvalidInput(_) | ProofsmithError::Config(_) => {
                ErrorCategory::InputError
            }
            ProofsmithError::Generation(_) => ErrorCategory::GenerationError,
            ProofsmithError::ToolNotFound { .. } => ErrorCategory::ToolNotFound,
            ProofsmithError::Unexpected { .. } => ErrorCategory::UnexpectedError,
            ProofsmithError::Timeout { .. } => ErrorCategory::TimeoutError,
        }
    }
}

/// Recoverable vs. non-recoverable errors
pub trait RecoverableError {
    fn is_recoverable(&self) -> bool;
    fn recovery_strategy(&self) -> Option<String>;
}

impl RecoverableError for ProofsmithError {
    fn is_recoverable(&self) -> bool {
        !self.category().is_fatal()
    }

    fn recovery_strategy(&self) -> Option<String> {
        match self {
            ProofsmithError::InvalidInput(_) => {
                Some("Describe the problem to prove before starting a run.".to_string())
            }
            ProofsmithError::Generation(GenerationError::Unauthorized { .. }) => {
                Some("Check the API key configured for the model endpoint.".to_string())
            }
            ProofsmithError::Generation(_) => {
                Some("Check the API base URL, the API key and that the model is served.".to_string())
            }
            ProofsmithError::ToolNotFound { tool, .. } => Some(format!(
                "Make sure `{}` is installed and available in your PATH.",
                tool
            )),
            ProofsmithError::Timeout { .. } => {
                Some("Increase the timeout or simplify the problem statement.".to_string())
            }
            ProofsmithError::Config(_) => Some("Fix the configuration file or flags.".to_string()),
            ProofsmithError::Unexpected { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_feedback_categories_are_non_fatal() {
        assert!(!ErrorCategory::MalformedExtraction.is_fatal());
        assert!(!ErrorCategory::VerificationFailed.is_fatal());
        assert!(ErrorCategory::ToolNotFound.is_fatal());
        assert!(ErrorCategory::TimeoutError.is_fatal());
        assert!(ErrorCategory::GenerationError.is_fatal());
    }

    #[test]
    fn test_tool_not_found_has_distinct_remediation() {
        let err = ProofsmithError::ToolNotFound {
            tool: "lean".to_string(),
            message: "No such file or directory".to_string(),
        };
        assert!(!err.is_recoverable());
        let hint = err.recovery_strategy().unwrap();
        assert!(hint.contains("`lean`"));
        assert!(hint.contains("PATH"));

        let unexpected = ProofsmithError::unexpected("verification", "boom");
        assert_eq!(unexpected.recovery_strategy(), None);
        assert!(unexpected.to_string().contains("boom"));
    }
}
