pub mod proof_generator;
pub mod proof_verifier;
pub mod run_observer;

// Re-export traits
pub use proof_generator::ProofGenerator;
pub use proof_verifier::ProofVerifier;
pub use run_observer::{NoopObserver, RunObserver};
