use anyhow::{ anyhow, Context, Result };
use log::{ debug, info };
use std::fs;
use std::path::PathBuf;

use proofsmith::implementations::config::timeout_from_secs;
use proofsmith::{
    CommandVerifier,
    FeedbackStrategy,
    NoopObserver,
    OpenAiGenerator,
    ProofsmithConfig,
    RefinementController,
    RunConfig,
};

use crate::cli::commands::{ resolve_language, resolve_verifier };
use crate::cli::ui;

/// Flags of the `prove` command
#[derive(Debug, Clone, Default)]
pub struct ProveArgs {
    pub statement: Option<String>,
    pub file: Option<PathBuf>,
    pub language: Option<String>,
    pub max_attempts: Option<u32>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub api_key: Option<String>,
    pub verifier: Option<String>,
    pub verifier_args: Vec<String>,
    pub feedback: Option<String>,
    pub generation_timeout: Option<u64>,
    pub verification_timeout: Option<u64>,
    pub output: Option<PathBuf>,
}

/// File and environment settings with the command-line flags applied on top
fn run_config(config: &ProofsmithConfig, args: &ProveArgs) -> Result<RunConfig> {
    let mut run = config.run_config()?;
    run.language = resolve_language(args.language.as_deref(), config)?;
    if let Some(max_attempts) = args.max_attempts {
        run.max_attempts = max_attempts;
    }
    if let Some(feedback) = &args.feedback {
        run.feedback = feedback.parse::<FeedbackStrategy>().map_err(|e| anyhow!(e))?;
    }
    if let Some(secs) = args.generation_timeout {
        run.generation_timeout = timeout_from_secs(secs);
    }
    if let Some(secs) = args.verification_timeout {
        run.verification_timeout = timeout_from_secs(secs);
    }
    Ok(run)
}

fn read_statement(args: &ProveArgs) -> Result<String> {
    if let Some(statement) = &args.statement {
        return Ok(statement.clone());
    }
    if let Some(path) = &args.file {
        info!("Reading problem statement from {}", path.display());
        return fs
            ::read_to_string(path)
            .with_context(|| format!("Failed to read problem statement from {}", path.display()));
    }
    Ok(ui::prompt_statement()?)
}

/// Run the refinement loop; returns whether a proof was verified
pub async fn execute(config: &ProofsmithConfig, args: &ProveArgs, json: bool) -> Result<bool> {
    let run_config = run_config(config, args)?;

    let mut model = config.model_config();
    if let Some(api_base) = &args.api_base {
        model.api_base_url = api_base.clone();
    }
    if let Some(api_key) = &args.api_key {
        model.api_key = Some(api_key.clone());
    }
    if let Some(name) = &args.model {
        model.model = name.clone();
    }
    debug!("Model settings: {} at {}", model.model, model.api_base_url);

    let verifier_config = resolve_verifier(
        config,
        run_config.language,
        args.verifier.as_deref(),
        &args.verifier_args
    );
    debug!("Checker: {} {:?}", verifier_config.program, verifier_config.args);

    let statement = read_statement(args)?;

    let language = run_config.language;
    let model_name = model.model.clone();
    let tool = verifier_config.program.clone();
    let controller = RefinementController::new(
        OpenAiGenerator::new(model)?,
        CommandVerifier::new(verifier_config),
        run_config
    );

    let run = if json {
        controller.run_with_observer(&statement, &mut NoopObserver).await?
    } else {
        ui::print_header(&format!("Proving in {}", language));
        ui::print_result("Model", &model_name);
        ui::print_result("Checker", &tool);
        let mut observer = ui::ConsoleObserver::new(language, model_name, tool);
        controller.run_with_observer(&statement, &mut observer).await?
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&run.report())?);
    }

    if let (true, Some(path), Some(proof)) = (run.succeeded(), &args.output, run.final_proof()) {
        fs::write(path, proof).with_context(||
            format!("Failed to write proof to {}", path.display())
        )?;
        if !json {
            ui::print_success(&format!("Proof saved to {}", path.display()));
        }
    }

    Ok(run.succeeded())
}
