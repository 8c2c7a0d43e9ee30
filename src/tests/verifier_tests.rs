#[cfg(all(test, unix))]
mod tests {
    use std::path::Path;
    use std::time::Duration;

    use async_trait::async_trait;
    use log::debug;

    use tokio::test;

    use crate::config::RunConfig;
    use crate::errors::{ GenerationError, ProofsmithError };
    use crate::implementations::command_verifier::CommandVerifier;
    use crate::implementations::config::VerifierConfig;
    use crate::implementations::controller::RefinementController;
    use crate::models::prompt::Prompt;
    use crate::models::run::{ FailureReason, RunStatus };
    use crate::models::verification::VerificationOutcome;
    use crate::traits::proof_generator::ProofGenerator;
    use crate::traits::proof_verifier::ProofVerifier;

    fn setup() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// `sh -c <script>`; the proof file arrives as `$0`
    fn shell_verifier(script: &str) -> CommandVerifier {
        CommandVerifier::new(VerifierConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            file_extension: "lean".to_string(),
        })
    }

    #[test]
    async fn test_zero_exit_accepts_and_reports_stdout() {
        setup();
        let verifier = CommandVerifier::new(VerifierConfig {
            program: "cat".to_string(),
            args: vec![],
            file_extension: "lean".to_string(),
        });

        let outcome = verifier.verify("example : True := trivial").await.unwrap();

        let (valid, output) = outcome.into_pair();
        assert!(valid);
        assert!(output.starts_with("Proof verified by `cat`."));
        assert!(output.contains("example : True := trivial"));
    }

    #[test]
    async fn test_non_zero_exit_rejects_with_stderr() {
        setup();
        let verifier = shell_verifier("echo \"syntax error line 3\" >&2; exit 1");

        let outcome = verifier.verify("theorem broken").await.unwrap();

        assert!(!outcome.is_valid());
        assert_eq!(outcome.text().trim(), "syntax error line 3");
    }

    #[test]
    async fn test_temp_file_is_removed_after_rejection() {
        setup();
        // Nothing on stderr, so the diagnostic is stdout: the proof file path
        let verifier = shell_verifier("echo \"$0\"; exit 1");

        let outcome = verifier.verify("theorem t : False := sorry").await.unwrap();

        let path = outcome.text().trim().to_string();
        debug!("Checker saw {}", path);
        assert!(!outcome.is_valid());
        assert!(path.ends_with(".lean"));
        assert!(!Path::new(&path).exists());
    }

    #[test]
    async fn test_temp_file_is_removed_after_success() {
        setup();
        let verifier = shell_verifier("test -s \"$0\" && echo \"$0\"");

        let outcome = verifier.verify("example : True := trivial").await.unwrap();

        assert!(outcome.is_valid());
        let path = outcome.text().lines().last().unwrap_or_default().trim().to_string();
        assert!(path.ends_with(".lean"));
        assert!(!Path::new(&path).exists());
    }

    #[test]
    async fn test_missing_executable_is_tool_not_found() {
        setup();
        let verifier = CommandVerifier::new(VerifierConfig {
            program: "proofsmith-no-such-checker".to_string(),
            args: vec!["--run".to_string()],
            file_extension: "lean".to_string(),
        });

        let err = verifier.verify("example : True := trivial").await.unwrap_err();
        match err {
            ProofsmithError::ToolNotFound { tool, .. } => {
                assert_eq!(tool, "proofsmith-no-such-checker");
            }
            other => panic!("expected ToolNotFound, got {:?}", other),
        }

        let version_err = verifier.probe().await.unwrap_err();
        assert!(matches!(version_err, ProofsmithError::ToolNotFound { .. }));
    }

    #[test]
    async fn test_killed_checker_is_unexpected() {
        setup();
        let verifier = shell_verifier("kill -9 $$");

        let err = verifier.verify("example : True := trivial").await.unwrap_err();
        assert!(matches!(err, ProofsmithError::Unexpected { .. }));
    }

    #[test]
    async fn test_temp_file_is_removed_after_killed_checker() {
        setup();
        let scratch = tempfile::tempdir().unwrap();
        let marker = scratch.path().join("proof-path");
        let verifier = CommandVerifier::new(VerifierConfig {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo \"$1\" > \"$0\"; kill -9 $$".to_string(),
                marker.display().to_string()
            ],
            file_extension: "lean".to_string(),
        });

        let err = verifier.verify("example : True := trivial").await.unwrap_err();
        assert!(matches!(err, ProofsmithError::Unexpected { .. }));

        let proof_path = std::fs::read_to_string(&marker).unwrap();
        debug!("Killed checker saw {}", proof_path.trim());
        assert!(proof_path.trim().ends_with(".lean"));
        assert!(!Path::new(proof_path.trim()).exists());
    }

    /// Always answers with the same fenced proof
    struct FixedGenerator;

    #[async_trait]
    impl ProofGenerator for FixedGenerator {
        async fn submit(&self, _prompt: &Prompt) -> Result<String, GenerationError> {
            Ok("```lean\nexample : True := trivial\n```".to_string())
        }

        fn model_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    async fn test_verification_timeout_kills_checker_and_removes_file() {
        setup();
        let scratch = tempfile::tempdir().unwrap();
        let marker = scratch.path().join("proof-path");
        let verifier = CommandVerifier::new(VerifierConfig {
            program: "sh".to_string(),
            args: vec![
                "-c".to_string(),
                "echo \"$1\" > \"$0\"; sleep 30".to_string(),
                marker.display().to_string()
            ],
            file_extension: "lean".to_string(),
        });
        let config = RunConfig::default().with_verification_timeout(
            Some(Duration::from_millis(500))
        );
        let controller = RefinementController::new(FixedGenerator, verifier, config);

        let run = controller.run("true is true").await.unwrap();

        match &run.status {
            RunStatus::Failed(FailureReason::Aborted(ProofsmithError::Timeout { stage, .. })) => {
                assert_eq!(stage, "verification");
            }
            other => panic!("expected a verification timeout, got {:?}", other),
        }
        assert_eq!(run.attempts.len(), 1);

        let proof_path = std::fs::read_to_string(&marker).unwrap();
        assert!(!Path::new(proof_path.trim()).exists());
    }

    #[test]
    async fn test_silent_failure_still_produces_a_diagnostic() {
        setup();
        let verifier = shell_verifier("exit 3");
        let outcome = verifier.verify("x").await.unwrap();
        assert_eq!(outcome, VerificationOutcome::Rejected {
            diagnostic: "`sh` exited with code 3 without printing a diagnostic".to_string(),
        });
    }
}
