use std::fmt;
use std::time::Duration;

use serde::Serialize;

use crate::errors::ProofsmithError;
use crate::models::attempt::Attempt;
use crate::models::problem::ProblemStatement;

/// Phases of the refinement state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Generating,
    Extracting,
    Verifying,
    Retrying,
    Succeeded,
    Failed,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed)
    }
}

/// Why a run ended in `Failed`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// Every attempt was rejected by the verifier
    Exhausted,
    /// A fatal error stopped the run with budget possibly remaining
    Aborted(ProofsmithError),
}

/// Terminal status of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    Succeeded,
    Failed(FailureReason),
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunStatus::Succeeded => write!(f, "Succeeded"),
            RunStatus::Failed(FailureReason::Exhausted) => {
                write!(f, "Failed: attempts exhausted")
            }
            RunStatus::Failed(FailureReason::Aborted(err)) => write!(f, "Failed: {}", err),
        }
    }
}

/// A complete execution of the refinement loop
#[derive(Debug, Clone)]
pub struct Run {
    pub problem: ProblemStatement,
    pub max_attempts: u32,
    pub attempts: Vec<Attempt>,
    pub status: RunStatus,
    /// Phases visited in order, from `Idle` to the terminal phase
    pub phases: Vec<Phase>,
    pub duration: Duration,
}

impl Run {
    pub fn succeeded(&self) -> bool {
        self.status == RunStatus::Succeeded
    }

    pub fn fatal_error(&self) -> Option<&ProofsmithError> {
        match &self.status {
            RunStatus::Failed(FailureReason::Aborted(err)) => Some(err),
            _ => None,
        }
    }

    /// The most recent diagnostic available to explain the outcome.
    ///
    /// Prefers the latest verifier diagnostic and falls back to the fatal
    /// error message when the run aborted before any rejection.
    pub fn last_diagnostic(&self) -> Option<String> {
        if let Some(diagnostic) = self.attempts.iter().rev().find_map(|a| a.diagnostic()) {
            return Some(diagnostic.to_string());
        }
        self.fatal_error().map(|err| err.to_string())
    }

    /// Last extracted proof, which is the verified one on success
    pub fn final_proof(&self) -> Option<&str> {
        self.attempts.iter().rev().find_map(|a| a.proof.as_deref())
    }

    pub fn report(&self) -> RunReport {
        let (status, failure) = match &self.status {
            RunStatus::Succeeded => ("succeeded", None),
            RunStatus::Failed(FailureReason::Exhausted) => {
                ("failed", Some(FailureReport {
                    kind: "exhausted".to_string(),
                    category: None,
                    message: format!("no valid proof after {} attempts", self.attempts.len()),
                }))
            }
            RunStatus::Failed(FailureReason::Aborted(err)) => {
                ("failed", Some(FailureReport {
                    kind: "aborted".to_string(),
                    category: Some(format!("{:?}", err.category())),
                    message: err.to_string(),
                }))
            }
        };

        RunReport {
            problem: self.problem.as_str().to_string(),
            status: status.to_string(),
            failure,
            max_attempts: self.max_attempts,
            attempts: self.attempts.clone(),
            phases: self.phases.clone(),
            final_proof: self.final_proof().map(str::to_string),
            last_diagnostic: self.last_diagnostic(),
            duration_ms: self.duration.as_millis() as u64,
        }
    }
}

/// Serializable summary of a run for machine-readable output
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub problem: String,
    pub status: String,
    pub failure: Option<FailureReport>,
    pub max_attempts: u32,
    pub attempts: Vec<Attempt>,
    pub phases: Vec<Phase>,
    pub final_proof: Option<String>,
    pub last_diagnostic: Option<String>,
    pub duration_ms: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailureReport {
    pub kind: String,
    pub category: Option<String>,
    pub message: String,
}
