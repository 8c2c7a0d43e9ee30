use std::time::Duration;

use chrono::{ DateTime, Utc };
use serde::{ Serialize, Serializer };

use crate::models::verification::Verdict;

/// One generate -> extract -> verify cycle of a run.
///
/// Built by the controller once the cycle is over; the fields after `index`
/// are `None` when the run aborted before that stage was reached.
#[derive(Debug, Clone, Serialize)]
pub struct Attempt {
    /// 1-based ordinal within the run
    pub index: u32,
    pub started_at: DateTime<Utc>,
    /// User prompt sent to the generator
    pub prompt: String,
    /// Generator output before extraction
    pub raw_output: Option<String>,
    /// Proof source handed to the verifier
    pub proof: Option<String>,
    /// An opening fence was found without its closing fence
    pub malformed_extraction: bool,
    pub verdict: Option<Verdict>,
    /// Verifier output on success, diagnostic on failure
    pub output: Option<String>,
    #[serde(rename = "duration_ms", serialize_with = "serialize_millis")]
    pub duration: Duration,
}

fn serialize_millis<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_millis() as u64)
}

impl Attempt {
    /// Diagnostic fed to the next attempt, present only on a rejected proof
    pub fn diagnostic(&self) -> Option<&str> {
        match self.verdict {
            Some(Verdict::Invalid) => self.output.as_deref(),
            _ => None,
        }
    }
}
