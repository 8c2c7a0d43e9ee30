use async_trait::async_trait;

use crate::errors::ProofsmithResult;
use crate::models::verification::VerificationOutcome;

/// External checker that decides whether proof source is valid
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    /// Check one candidate proof.
    ///
    /// A rejected proof is an `Ok(VerificationOutcome::Rejected)`; only
    /// `ToolNotFound` and `Unexpected` errors are returned as `Err`.
    async fn verify(&self, proof: &str) -> ProofsmithResult<VerificationOutcome>;

    /// Name of the checker program
    fn tool_name(&self) -> &str;
}
