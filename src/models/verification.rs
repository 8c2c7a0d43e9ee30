use std::fmt;

use serde::Serialize;

/// Verdict recorded on an attempt once the verifier has run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Valid,
    Invalid,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Valid => write!(f, "Valid"),
            Verdict::Invalid => write!(f, "Invalid"),
        }
    }
}

/// Non-fatal result of running the verifier on a candidate proof.
///
/// Tool-not-found and unexpected failures are reported as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// The checker accepted the proof; `output` starts with a success message
    Verified { output: String },
    /// The checker rejected the proof; `diagnostic` is fed back to the generator
    Rejected { diagnostic: String },
}

impl VerificationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, VerificationOutcome::Verified { .. })
    }

    pub fn verdict(&self) -> Verdict {
        if self.is_valid() { Verdict::Valid } else { Verdict::Invalid }
    }

    pub fn text(&self) -> &str {
        match self {
            VerificationOutcome::Verified { output } => output,
            VerificationOutcome::Rejected { diagnostic } => diagnostic,
        }
    }

    /// The `(valid, output)` pair form of the outcome
    pub fn into_pair(self) -> (bool, String) {
        match self {
            VerificationOutcome::Verified { output } => (true, output),
            VerificationOutcome::Rejected { diagnostic } => (false, diagnostic),
        }
    }
}

impl fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationOutcome::Verified { .. } => write!(f, "Verified"),
            VerificationOutcome::Rejected { diagnostic } => {
                let first = diagnostic.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
                if first.is_empty() {
                    write!(f, "Rejected")
                } else {
                    write!(f, "Rejected: {}", first.trim())
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_displays_first_diagnostic_line() {
        let outcome = VerificationOutcome::Rejected {
            diagnostic: "\n  t.lean:3:2: error: unsolved goals\n  case h".to_string(),
        };
        assert_eq!(outcome.to_string(), "Rejected: t.lean:3:2: error: unsolved goals");
        assert_eq!(outcome.verdict(), Verdict::Invalid);

        let verified = VerificationOutcome::Verified { output: "ok".to_string() };
        assert_eq!(verified.to_string(), "Verified");
    }
}
