use anyhow::Result;
use clap::Parser;
use log::{ debug, info };

mod cli;
use cli::{ Commands, ProofsmithCli };
use cli::commands::prove::ProveArgs;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the command line arguments
    let cli = ProofsmithCli::parse();

    // Setup logging
    setup_logging(&cli.log_level);

    match dotenv::dotenv() {
        Ok(path) => debug!("Loaded environment variables from {}", path.display()),
        Err(_) => debug!("No .env file loaded"),
    }

    let json = cli::commands::wants_json(&cli.output_format)?;
    let config = cli::commands::load_config(cli.config.as_deref())?;

    let succeeded = match cli.command {
        Commands::Prove {
            statement,
            file,
            language,
            max_attempts,
            model,
            api_base,
            api_key,
            verifier,
            verifier_args,
            feedback,
            generation_timeout,
            verification_timeout,
            output,
        } => {
            let args = ProveArgs {
                statement,
                file,
                language,
                max_attempts,
                model,
                api_base,
                api_key,
                verifier,
                verifier_args,
                feedback,
                generation_timeout,
                verification_timeout,
                output,
            };
            cli::commands::prove::execute(&config, &args, json).await?
        }

        Commands::Verify { proof, language, verifier, verifier_args } => {
            cli::commands::verify::execute(
                &config,
                &proof,
                language.as_deref(),
                verifier.as_deref(),
                &verifier_args,
                json
            ).await?
        }

        Commands::Check { language, verifier } => {
            cli::commands::check::execute(
                &config,
                language.as_deref(),
                verifier.as_deref(),
                json
            ).await?
        }
    };

    if !succeeded {
        std::process::exit(1);
    }
    Ok(())
}

fn setup_logging(log_level: &str) {
    // Set up the logger based on the log level
    let level = match log_level.to_lowercase().as_str() {
        "trace" => log::LevelFilter::Trace,
        "debug" => log::LevelFilter::Debug,
        "info" => log::LevelFilter::Info,
        "warn" => log::LevelFilter::Warn,
        "error" => log::LevelFilter::Error,
        _ => log::LevelFilter::Info,
    };

    env_logger::Builder::new().filter_level(level).init();

    info!("Logger initialized with level: {}", log_level);
}
