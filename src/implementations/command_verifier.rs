use std::io::{ ErrorKind, Write };
use std::process::Stdio;

use async_trait::async_trait;
use log::{ debug, info, warn };
use tempfile::TempPath;
use tokio::process::Command;

use crate::errors::{ ProofsmithError, ProofsmithResult };
use crate::implementations::config::VerifierConfig;
use crate::models::verification::VerificationOutcome;
use crate::traits::proof_verifier::ProofVerifier;

/// Runs a command-line proof checker on a temporary copy of the proof.
///
/// The checker is invoked as `<program> <args...> <proof file>`. Exit code
/// zero accepts the proof, any other exit code rejects it.
#[derive(Debug, Clone)]
pub struct CommandVerifier {
    config: VerifierConfig,
}

impl CommandVerifier {
    pub fn new(config: VerifierConfig) -> Self {
        Self { config }
    }

    /// Write the proof to a fresh temporary file.
    ///
    /// The returned path deletes the file when dropped, so every exit from
    /// `verify` (including cancellation) releases it.
    fn write_artifact(&self, proof: &str) -> ProofsmithResult<TempPath> {
        let suffix = format!(".{}", self.config.file_extension);
        let mut file = tempfile::Builder
            ::new()
            .prefix("proofsmith-")
            .suffix(&suffix)
            .tempfile()
            .map_err(|e| ProofsmithError::unexpected("writing the proof file", e))?;

        file.write_all(proof.as_bytes())
            .and_then(|_| file.flush())
            .map_err(|e| ProofsmithError::unexpected("writing the proof file", e))?;

        Ok(file.into_temp_path())
    }

    fn spawn_error(&self, err: std::io::Error) -> ProofsmithError {
        if err.kind() == ErrorKind::NotFound {
            ProofsmithError::ToolNotFound {
                tool: self.config.program.clone(),
                message: err.to_string(),
            }
        } else {
            ProofsmithError::unexpected(format!("running `{}`", self.config.program), err)
        }
    }

    /// Run the checker with `--version` to see whether it is installed
    pub async fn probe(&self) -> ProofsmithResult<String> {
        let output = Command::new(&self.config.program)
            .arg("--version")
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output().await
            .map_err(|e| self.spawn_error(e))?;

        let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if output.status.success() {
            Ok(if stdout.is_empty() { stderr } else { stdout })
        } else {
            Err(
                ProofsmithError::unexpected(
                    format!("probing `{}`", self.config.program),
                    format!("exit status {}: {}", output.status, stderr)
                )
            )
        }
    }
}

/// Classify a finished checker process.
///
/// `exit_code` is `None` when the process was terminated by a signal.
pub fn classify_exit(
    tool: &str,
    exit_code: Option<i32>,
    stdout: &str,
    stderr: &str
) -> ProofsmithResult<VerificationOutcome> {
    match exit_code {
        Some(0) => Ok(VerificationOutcome::Verified {
            output: format!("Proof verified by `{}`.\n{}", tool, stdout),
        }),
        Some(code) => {
            debug!("`{}` exited with code {}", tool, code);
            // Some checkers print their errors on stdout only
            let diagnostic = if !stderr.trim().is_empty() {
                stderr.to_string()
            } else if !stdout.trim().is_empty() {
                stdout.to_string()
            } else {
                format!("`{}` exited with code {} without printing a diagnostic", tool, code)
            };
            Ok(VerificationOutcome::Rejected { diagnostic })
        }
        None => Err(
            ProofsmithError::unexpected(
                format!("running `{}`", tool),
                format!("process terminated by a signal\n{}", stderr)
            )
        ),
    }
}

#[async_trait]
impl ProofVerifier for CommandVerifier {
    async fn verify(&self, proof: &str) -> ProofsmithResult<VerificationOutcome> {
        let artifact = self.write_artifact(proof)?;
        debug!("Wrote {} bytes of proof to {}", proof.len(), artifact.display());

        info!("Checking proof with `{}`", self.config.program);
        let output = Command::new(&self.config.program)
            .args(&self.config.args)
            .arg(&*artifact)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output().await
            .map_err(|e| {
                warn!("Failed to run `{}`: {}", self.config.program, e);
                self.spawn_error(e)
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);
        let outcome = classify_exit(&self.config.program, output.status.code(), &stdout, &stderr)?;

        if let Err(e) = artifact.close() {
            warn!("Failed to delete temporary proof file: {}", e);
        }
        Ok(outcome)
    }

    fn tool_name(&self) -> &str {
        &self.config.program
    }
}
