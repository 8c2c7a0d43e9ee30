use anyhow::{ Context, Result };
use log::info;
use std::fs;
use std::path::Path;

use proofsmith::{ CommandVerifier, ProofVerifier, ProofsmithConfig };

use crate::cli::commands::{ resolve_language, resolve_verifier };
use crate::cli::ui;

/// Check an existing proof file once; returns whether it was accepted
pub async fn execute(
    config: &ProofsmithConfig,
    proof_path: &Path,
    language: Option<&str>,
    program: Option<&str>,
    args: &[String],
    json: bool
) -> Result<bool> {
    let language = resolve_language(language, config)?;
    let verifier = CommandVerifier::new(resolve_verifier(config, language, program, args));

    let proof = fs
        ::read_to_string(proof_path)
        .with_context(|| format!("Failed to read proof from {}", proof_path.display()))?;
    info!("Checking {} ({} characters)", proof_path.display(), proof.len());

    let outcome = if json {
        verifier.verify(&proof).await
    } else {
        ui::print_header("Verifying Proof");
        ui::display_proof(language, proof.trim_end());
        let spinner = ui::spinner_with_message(
            &format!("Checking the proof with {}...", verifier.tool_name())
        );
        let outcome = verifier.verify(&proof).await;
        spinner.finish_and_clear();
        outcome
    };

    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(err) => {
            if !json {
                ui::print_error_with_hint(&err);
            }
            return Err(err.into());
        }
    };

    if json {
        let report =
            serde_json::json!({
            "file": proof_path.display().to_string(),
            "tool": verifier.tool_name(),
            "verdict": outcome.verdict(),
            "output": outcome.text(),
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        ui::print_verdict(outcome.verdict());
        ui::print_text(outcome.text().trim_end());
    }

    Ok(outcome.is_valid())
}
