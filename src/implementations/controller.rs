//! The generate -> extract -> verify -> feedback loop.

use std::future::Future;
use std::time::{ Duration, Instant };

use chrono::Utc;
use log::{ debug, error, info, warn };

use crate::config::RunConfig;
use crate::errors::{ ProofsmithError, ProofsmithResult };
use crate::implementations::extractor::extract_proof;
use crate::implementations::prompt_builder::{ Feedback, PromptBuilder };
use crate::models::attempt::Attempt;
use crate::models::common::FeedbackStrategy;
use crate::models::problem::ProblemStatement;
use crate::models::prompt::Prompt;
use crate::models::run::{ FailureReason, Phase, Run, RunStatus };
use crate::models::verification::VerificationOutcome;
use crate::traits::proof_generator::ProofGenerator;
use crate::traits::proof_verifier::ProofVerifier;
use crate::traits::run_observer::{ NoopObserver, RunObserver };

/// How a single cycle ended
#[derive(Debug)]
enum CycleOutcome {
    Verified,
    Rejected,
    Fatal(ProofsmithError),
}

/// Records every phase transition of a run
struct PhaseLog {
    phases: Vec<Phase>,
}

impl PhaseLog {
    fn new() -> Self {
        Self { phases: vec![Phase::Idle] }
    }

    fn current(&self) -> Phase {
        self.phases.last().copied().unwrap_or(Phase::Idle)
    }

    fn enter(&mut self, attempt: u32, phase: Phase, observer: &mut dyn RunObserver) {
        debug!("Attempt {}: {:?} -> {:?}", attempt, self.current(), phase);
        self.phases.push(phase);
        observer.on_phase(attempt, phase);
    }
}

/// Drives attempts until the verifier accepts a proof, the attempt budget is
/// spent, or a fatal error occurs.
pub struct RefinementController<G: ProofGenerator, V: ProofVerifier> {
    generator: G,
    verifier: V,
    config: RunConfig,
}

impl<G: ProofGenerator, V: ProofVerifier> RefinementController<G, V> {
    pub fn new(generator: G, verifier: V, config: RunConfig) -> Self {
        Self { generator, verifier, config }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub async fn run(&self, statement: &str) -> ProofsmithResult<Run> {
        self.run_with_observer(statement, &mut NoopObserver).await
    }

    /// Run the loop for one problem statement.
    ///
    /// Only input errors are returned as `Err`, before any attempt is made.
    /// Every other failure is reported through the returned run's status.
    pub async fn run_with_observer(
        &self,
        statement: &str,
        observer: &mut dyn RunObserver
    ) -> ProofsmithResult<Run> {
        self.config.validate()?;
        let problem = ProblemStatement::new(statement)?;

        let max_attempts = self.config.max_attempts;
        info!(
            "Starting proof search in {} with up to {} attempts ({} checked by {})",
            self.config.language,
            max_attempts,
            self.generator.model_name(),
            self.verifier.tool_name()
        );
        debug!("Problem statement length: {} characters", problem.as_str().len());

        let started = Instant::now();
        let mut phases = PhaseLog::new();
        let mut attempts: Vec<Attempt> = Vec::new();

        let status = loop {
            let index = (attempts.len() as u32) + 1;
            if index > 1 {
                phases.enter(index, Phase::Retrying, observer);
            }
            observer.on_attempt_started(index, max_attempts);

            let (attempt, outcome) = self.attempt(
                &problem,
                index,
                &attempts,
                &mut phases,
                observer
            ).await;
            observer.on_attempt_finished(&attempt);
            attempts.push(attempt);

            match outcome {
                CycleOutcome::Verified => {
                    info!("Attempt {}/{}: proof verified", index, max_attempts);
                    break RunStatus::Succeeded;
                }
                CycleOutcome::Rejected if index < max_attempts => {
                    info!("Attempt {}/{}: proof rejected, retrying", index, max_attempts);
                }
                CycleOutcome::Rejected => {
                    info!("Attempt {}/{}: proof rejected, no attempts left", index, max_attempts);
                    break RunStatus::Failed(FailureReason::Exhausted);
                }
                CycleOutcome::Fatal(err) => {
                    error!("Attempt {}/{} aborted the run: {}", index, max_attempts, err);
                    break RunStatus::Failed(FailureReason::Aborted(err));
                }
            }
        };

        let last_index = attempts.len() as u32;
        let terminal = if status == RunStatus::Succeeded { Phase::Succeeded } else { Phase::Failed };
        phases.enter(last_index, terminal, observer);

        let run = Run {
            problem,
            max_attempts,
            attempts,
            status,
            phases: phases.phases,
            duration: started.elapsed(),
        };
        info!("Run finished after {} attempt(s): {}", run.attempts.len(), run.status);
        observer.on_run_finished(&run);
        Ok(run)
    }

    /// Diagnostics quoted in the next prompt
    fn feedback_for<'a>(&self, previous: &'a [Attempt]) -> Vec<Feedback<'a>> {
        let rejected = previous.iter().filter_map(|attempt| {
            attempt.diagnostic().map(|diagnostic| Feedback {
                attempt: attempt.index,
                diagnostic,
            })
        });
        match self.config.feedback {
            FeedbackStrategy::LastOnly => rejected.last().into_iter().collect(),
            FeedbackStrategy::Cumulative => rejected.collect(),
        }
    }

    async fn attempt(
        &self,
        problem: &ProblemStatement,
        index: u32,
        previous: &[Attempt],
        phases: &mut PhaseLog,
        observer: &mut dyn RunObserver
    ) -> (Attempt, CycleOutcome) {
        let clock = Instant::now();
        phases.enter(index, Phase::Generating, observer);

        let feedback = self.feedback_for(previous);
        let prompt = PromptBuilder::build(problem, self.config.language, &feedback);
        debug!(
            "Attempt {}: prompt of {} characters with {} diagnostic(s)",
            index,
            prompt.user.len(),
            feedback.len()
        );

        let mut attempt = Attempt {
            index,
            started_at: Utc::now(),
            prompt: prompt.user.clone(),
            raw_output: None,
            proof: None,
            malformed_extraction: false,
            verdict: None,
            output: None,
            duration: Duration::ZERO,
        };

        let outcome = self.cycle(&prompt, &mut attempt, phases, observer).await;
        attempt.duration = clock.elapsed();
        (attempt, outcome)
    }

    async fn cycle(
        &self,
        prompt: &Prompt,
        attempt: &mut Attempt,
        phases: &mut PhaseLog,
        observer: &mut dyn RunObserver
    ) -> CycleOutcome {
        let index = attempt.index;

        let generation = async {
            self.generator.submit(prompt).await.map_err(ProofsmithError::from)
        };
        let raw = match with_timeout("generation", self.config.generation_timeout, generation).await {
            Ok(raw) => raw,
            Err(err) => {
                return CycleOutcome::Fatal(err);
            }
        };
        debug!("Attempt {}: generator returned {} characters", index, raw.len());

        phases.enter(index, Phase::Extracting, observer);
        let extraction = extract_proof(&raw, self.config.language);
        if extraction.malformed {
            warn!("Attempt {}: unterminated code fence, verifying the raw response", index);
        }
        attempt.raw_output = Some(raw);
        attempt.proof = Some(extraction.proof.clone());
        attempt.malformed_extraction = extraction.malformed;
        observer.on_proof_extracted(index, &extraction.proof, extraction.malformed);

        phases.enter(index, Phase::Verifying, observer);
        let verification = with_timeout(
            "verification",
            self.config.verification_timeout,
            self.verifier.verify(&extraction.proof)
        ).await;
        let outcome: VerificationOutcome = match verification {
            Ok(outcome) => outcome,
            Err(err) => {
                return CycleOutcome::Fatal(err);
            }
        };

        debug!("Attempt {}: {}", index, outcome);
        attempt.verdict = Some(outcome.verdict());
        let (valid, output) = outcome.into_pair();
        debug!("Attempt {}: verifier output of {} characters", index, output.len());
        attempt.output = Some(output);

        if valid {
            CycleOutcome::Verified
        } else {
            CycleOutcome::Rejected
        }
    }
}

/// Await `fut`, failing with a `Timeout` error once `limit` has elapsed.
///
/// The future is dropped on expiry, which cancels any in-flight request or
/// child process it owns.
async fn with_timeout<T, F>(stage: &str, limit: Option<Duration>, fut: F) -> ProofsmithResult<T>
    where F: Future<Output = ProofsmithResult<T>>
{
    let Some(after) = limit else {
        return fut.await;
    };
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => {
            warn!("{} did not finish within {:?}", stage, after);
            Err(ProofsmithError::Timeout {
                stage: stage.to_string(),
                after,
            })
        }
    }
}
