use crate::models::attempt::Attempt;
use crate::models::run::{ Phase, Run };

/// Presentation hooks called by the controller while a run progresses.
///
/// Every method has an empty default so observers only implement what they render.
pub trait RunObserver: Send {
    fn on_phase(&mut self, _attempt: u32, _phase: Phase) {}

    fn on_attempt_started(&mut self, _attempt: u32, _max_attempts: u32) {}

    fn on_proof_extracted(&mut self, _attempt: u32, _proof: &str, _malformed: bool) {}

    fn on_attempt_finished(&mut self, _attempt: &Attempt) {}

    fn on_run_finished(&mut self, _run: &Run) {}
}

/// Observer that ignores every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}
