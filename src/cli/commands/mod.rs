use anyhow::{ anyhow, Context, Result };
use log::{ debug, info };
use std::path::{ Path, PathBuf };

use proofsmith::{ ProofLanguage, ProofsmithConfig, VerifierConfig };

pub mod check;
pub mod prove;
pub mod verify;

const DEFAULT_CONFIG_FILE: &str = "proofsmith.yaml";

/// Load the YAML configuration, falling back to defaults when no file is in use
pub fn load_config(path: Option<&Path>) -> Result<ProofsmithConfig> {
    let path: Option<PathBuf> = match path {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if default.exists() { Some(default) } else { None }
        }
    };

    match path {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ProofsmithConfig::from_file(&path).with_context(||
                format!("Failed to load configuration from {}", path.display())
            )
        }
        None => {
            debug!("No configuration file, using defaults");
            Ok(ProofsmithConfig::default())
        }
    }
}

/// The `--language` flag wins over the file's `run.language`
pub fn resolve_language(flag: Option<&str>, config: &ProofsmithConfig) -> Result<ProofLanguage> {
    match flag {
        Some(name) => name.parse::<ProofLanguage>().map_err(|e| anyhow!(e)),
        None => Ok(config.run.language.unwrap_or_default()),
    }
}

/// Checker settings with command-line overrides applied on top of the file
pub fn resolve_verifier(
    config: &ProofsmithConfig,
    language: ProofLanguage,
    program: Option<&str>,
    args: &[String]
) -> VerifierConfig {
    let mut config = config.clone();
    if let Some(program) = program {
        config.verifier.program = Some(program.to_string());
        config.verifier.args = None;
    }
    if !args.is_empty() {
        config.verifier.args = Some(args.to_vec());
    }
    config.verifier_config(language)
}

pub fn wants_json(output_format: &str) -> Result<bool> {
    match output_format.to_lowercase().as_str() {
        "text" => Ok(false),
        "json" => Ok(true),
        other => Err(anyhow!("Unsupported output format: {} (expected text or json)", other)),
    }
}
