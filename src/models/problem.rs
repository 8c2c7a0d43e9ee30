use std::fmt;

use serde::Serialize;

use crate::errors::{ ProofsmithError, ProofsmithResult };

/// The user's problem statement. Never empty, never changed once a run starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProblemStatement(String);

impl ProblemStatement {
    pub fn new(text: impl Into<String>) -> ProofsmithResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(ProofsmithError::InvalidInput("the problem statement is empty".to_string()));
        }
        Ok(Self(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
