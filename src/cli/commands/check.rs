use anyhow::Result;
use log::debug;

use proofsmith::implementations::config::PLACEHOLDER_API_KEY;
use proofsmith::{ CommandVerifier, ProofsmithConfig };

use crate::cli::commands::{ resolve_language, resolve_verifier };
use crate::cli::ui;

/// Probe the proof checker and show the model settings; returns whether the checker runs
pub async fn execute(
    config: &ProofsmithConfig,
    language: Option<&str>,
    program: Option<&str>,
    json: bool
) -> Result<bool> {
    let language = resolve_language(language, config)?;
    let verifier_config = resolve_verifier(config, language, program, &[]);
    let model = config.model_config();
    let verifier = CommandVerifier::new(verifier_config.clone());

    debug!("Probing {}", verifier_config.program);
    let probe = verifier.probe().await;

    if json {
        let report =
            serde_json::json!({
            "language": language,
            "verifier": {
                "program": &verifier_config.program,
                "args": &verifier_config.args,
                "available": probe.is_ok(),
                "version": probe.as_ref().ok(),
                "error": probe.as_ref().err().map(|e| e.to_string()),
            },
            "model": {
                "api_base_url": &model.api_base_url,
                "model": &model.model,
                "api_key_configured": model.api_key.is_some(),
            },
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(probe.is_ok());
    }

    ui::print_header("Checking Tool Availability");
    ui::print_result("Language", language.display_name());

    let invocation = if verifier_config.args.is_empty() {
        format!("{} <proof file>", verifier_config.program)
    } else {
        format!("{} {} <proof file>", verifier_config.program, verifier_config.args.join(" "))
    };
    ui::print_result("Checker", &invocation);
    match &probe {
        Ok(version) => ui::print_success(&format!("{} is available: {}", verifier_config.program, version)),
        Err(err) => ui::print_error_with_hint(err),
    }

    ui::print_result("API base URL", &model.api_base_url);
    ui::print_result("Model", &model.model);
    if model.api_key.is_some() {
        ui::print_result("API key", "configured");
    } else {
        ui::print_info(&format!("No API key configured; sending the placeholder key \"{}\"", PLACEHOLDER_API_KEY));
    }

    Ok(probe.is_ok())
}
