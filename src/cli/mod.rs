use clap::{ Parser, Subcommand };
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "proofsmith",
    about = "Generates formal proofs with a language model and refines them until a proof checker accepts one",
    version,
    author,
    long_about = None
)]
pub struct ProofsmithCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to configuration file (defaults to ./proofsmith.yaml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub output_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for a proof of a problem statement
    Prove {
        /// Problem statement to prove
        #[arg(short, long, conflicts_with = "file")]
        statement: Option<String>,

        /// Read the problem statement from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Proof language (lean4, coq, dafny, fstar)
        #[arg(long)]
        language: Option<String>,

        /// Maximum number of generate/verify cycles
        #[arg(short, long)]
        max_attempts: Option<u32>,

        /// Model name sent to the completion endpoint
        #[arg(long)]
        model: Option<String>,

        /// Base URL of an OpenAI-compatible API
        #[arg(long)]
        api_base: Option<String>,

        /// API key (defaults to PROOFSMITH_API_KEY or OPENAI_API_KEY)
        #[arg(long)]
        api_key: Option<String>,

        /// Proof checker executable
        #[arg(long)]
        verifier: Option<String>,

        /// Argument passed to the checker before the proof file (repeatable)
        #[arg(long = "verifier-arg", allow_hyphen_values = true)]
        verifier_args: Vec<String>,

        /// Diagnostics fed back to the model (last, cumulative)
        #[arg(long)]
        feedback: Option<String>,

        /// Generation timeout in seconds, 0 to disable
        #[arg(long)]
        generation_timeout: Option<u64>,

        /// Verification timeout in seconds, 0 to disable
        #[arg(long)]
        verification_timeout: Option<u64>,

        /// Write the verified proof to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run the proof checker once on an existing proof file
    Verify {
        /// Path to the proof file
        #[arg(short, long)]
        proof: PathBuf,

        /// Proof language (lean4, coq, dafny, fstar)
        #[arg(long)]
        language: Option<String>,

        /// Proof checker executable
        #[arg(long)]
        verifier: Option<String>,

        /// Argument passed to the checker before the proof file (repeatable)
        #[arg(long = "verifier-arg", allow_hyphen_values = true)]
        verifier_args: Vec<String>,
    },

    /// Check that the proof checker is installed and show the model settings
    Check {
        /// Proof language (lean4, coq, dafny, fstar)
        #[arg(long)]
        language: Option<String>,

        /// Proof checker executable
        #[arg(long)]
        verifier: Option<String>,
    },
}
