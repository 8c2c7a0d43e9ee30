pub mod common;
pub mod problem;
pub mod attempt;
pub mod prompt;
pub mod verification;
pub mod run;

// Re-export common model types
pub use common::{FeedbackStrategy, ProofLanguage};
pub use problem::ProblemStatement;
pub use attempt::Attempt;
pub use prompt::Prompt;
pub use verification::{Verdict, VerificationOutcome};
pub use run::{FailureReason, Phase, Run, RunReport, RunStatus};
