use async_trait::async_trait;

use crate::errors::GenerationError;
use crate::models::prompt::Prompt;

/// External text-generation service that turns a prompt into a candidate proof
#[async_trait]
pub trait ProofGenerator: Send + Sync {
    /// Submit one prompt and return the raw generated text.
    ///
    /// Implementations make exactly one outbound call and never retry;
    /// regeneration is the controller's job.
    async fn submit(&self, prompt: &Prompt) -> Result<String, GenerationError>;

    /// Name of the model behind this generator, for logs and reports
    fn model_name(&self) -> &str;
}
