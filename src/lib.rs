pub mod models;
pub mod traits;
pub mod errors;
pub mod config;
pub mod implementations;
#[cfg(test)]
pub mod tests;

// Re-export core components
pub use config::RunConfig;
pub use errors::{ ErrorCategory, GenerationError, ProofsmithError, ProofsmithResult, RecoverableError };
pub use implementations::{
    command_verifier::CommandVerifier,
    config::{ ModelConfig, ProofsmithConfig, VerifierConfig },
    controller::RefinementController,
    extractor::{ extract_proof, Extraction },
    openai_generator::OpenAiGenerator,
    prompt_builder::PromptBuilder,
};
pub use models::{
    attempt::Attempt,
    common::{ FeedbackStrategy, ProofLanguage },
    problem::ProblemStatement,
    prompt::Prompt,
    run::{ FailureReason, Phase, Run, RunReport, RunStatus },
    verification::{ Verdict, VerificationOutcome },
};
pub use traits::{ NoopObserver, ProofGenerator, ProofVerifier, RunObserver };
