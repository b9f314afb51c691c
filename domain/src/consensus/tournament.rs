//! Tournament run records.
//!
//! A [`TournamentRun`] is the audit record of one multi-model invocation:
//! which models were asked, what each returned (or how it failed), and
//! when. Once completed it is never mutated again.

use serde::{Deserialize, Serialize};

/// How many successful participants a run needs before its consensus is
/// considered meaningful.
pub const QUORUM_MINIMUM: usize = 2;

/// Terminal state of one participant's invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvocationStatus {
    Success,
    Failure,
    Timeout,
}

impl std::fmt::Display for InvocationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            InvocationStatus::Success => "success",
            InvocationStatus::Failure => "failure",
            InvocationStatus::Timeout => "timeout",
        };
        write!(f, "{s}")
    }
}

/// Outcome of one participant's invocation within a tournament
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantResult {
    /// Which model produced this result
    pub model_id: String,
    pub status: InvocationStatus,
    /// Raw payload text on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    /// Error description on failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Wall-clock latency of the call, milliseconds
    pub latency_ms: u64,
}

impl ParticipantResult {
    pub fn success(
        model_id: impl Into<String>,
        payload: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            status: InvocationStatus::Success,
            payload: Some(payload.into()),
            error: None,
            latency_ms,
        }
    }

    pub fn failure(model_id: impl Into<String>, error: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            model_id: model_id.into(),
            status: InvocationStatus::Failure,
            payload: None,
            error: Some(error.into()),
            latency_ms,
        }
    }

    pub fn timeout(model_id: impl Into<String>, latency_ms: u64) -> Self {
        Self {
            model_id: model_id.into(),
            status: InvocationStatus::Timeout,
            payload: None,
            error: None,
            latency_ms,
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == InvocationStatus::Success
    }
}

/// One tournament execution instance.
///
/// `results` preserves the coordinator's participant insertion order; the
/// consensus detector's first-seen tie-breaks depend on that order being
/// stable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TournamentRun {
    pub run_id: String,
    pub prompt: String,
    /// Model ids actually queried, in the order they were chosen
    pub participants: Vec<String>,
    /// Per-participant outcomes, in participant order
    pub results: Vec<ParticipantResult>,
    /// Milliseconds since epoch
    pub started_at: u64,
    /// Set exactly once when the fan-in completes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<u64>,
}

impl TournamentRun {
    pub fn new(run_id: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            prompt: prompt.into(),
            participants: Vec::new(),
            results: Vec::new(),
            started_at: current_timestamp(),
            completed_at: None,
        }
    }

    /// Record one participant's outcome. Participant order is preserved.
    pub fn record(&mut self, result: ParticipantResult) {
        if !self.participants.contains(&result.model_id) {
            self.participants.push(result.model_id.clone());
        }
        self.results.push(result);
    }

    /// Mark the fan-in as finished. A completed run is immutable.
    pub fn complete(&mut self) {
        if self.completed_at.is_none() {
            self.completed_at = Some(current_timestamp());
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Results from participants that succeeded, in participant order
    pub fn successful(&self) -> impl Iterator<Item = &ParticipantResult> {
        self.results.iter().filter(|r| r.is_success())
    }

    pub fn successful_count(&self) -> usize {
        self.successful().count()
    }

    /// Whether too few participants succeeded for the consensus to be
    /// meaningful (fewer than [`QUORUM_MINIMUM`])
    pub fn insufficient_quorum(&self) -> bool {
        self.successful_count() < QUORUM_MINIMUM
    }
}

/// Current timestamp in milliseconds since epoch
pub(crate) fn current_timestamp() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_preserves_order() {
        let mut run = TournamentRun::new("run-1", "check this scene");
        run.record(ParticipantResult::success("model-b", "[]", 120));
        run.record(ParticipantResult::failure("model-a", "boom", 40));
        run.record(ParticipantResult::timeout("model-c", 30_000));

        assert_eq!(run.participants, vec!["model-b", "model-a", "model-c"]);
        assert_eq!(run.results.len(), 3);
    }

    #[test]
    fn test_successful_filters_failures() {
        let mut run = TournamentRun::new("run-1", "q");
        run.record(ParticipantResult::success("a", "[]", 1));
        run.record(ParticipantResult::failure("b", "err", 1));
        run.record(ParticipantResult::success("c", "[]", 1));

        let ids: Vec<_> = run.successful().map(|r| r.model_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(run.successful_count(), 2);
    }

    #[test]
    fn test_insufficient_quorum_below_two_successes() {
        let mut run = TournamentRun::new("run-1", "q");
        run.record(ParticipantResult::success("a", "[]", 1));
        run.record(ParticipantResult::timeout("b", 1));
        assert!(run.insufficient_quorum());

        run.record(ParticipantResult::success("c", "[]", 1));
        assert!(!run.insufficient_quorum());
    }

    #[test]
    fn test_complete_is_idempotent() {
        let mut run = TournamentRun::new("run-1", "q");
        assert!(!run.is_complete());
        run.complete();
        let first = run.completed_at;
        run.complete();
        assert_eq!(run.completed_at, first);
    }
}
