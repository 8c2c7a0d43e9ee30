pub mod config;
pub mod prompt_builder;
pub mod extractor;
pub mod openai_generator;
pub mod command_verifier;
pub mod controller;

pub use command_verifier::CommandVerifier;
pub use config::{ ModelConfig, ProofsmithConfig, VerifierConfig };
pub use controller::RefinementController;
pub use extractor::{ extract_proof, Extraction };
pub use openai_generator::OpenAiGenerator;
pub use prompt_builder::{ Feedback, PromptBuilder };
