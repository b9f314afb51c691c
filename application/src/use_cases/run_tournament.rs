//! Run Tournament use case
//!
//! Orchestrates a full tournament: chooses a diverse participant set,
//! fans the prompt out to every participant concurrently, joins the
//! results under a global deadline, records spend for completed calls,
//! and hands the run to the consensus detector.

use crate::availability::probe;
use crate::budget::BudgetTracker;
use crate::ports::{CredentialStore, InvocationRequest, ModelInvoker};
use crate::registry_store::SharedRegistry;
use conclave_domain::{
    AvailabilitySnapshot, CapabilityRegistry, DEFAULT_AGREEMENT_THRESHOLD, ModelProfile,
    ParticipantResult, Strength, TournamentRun, Verdict, detect, estimate_typical,
};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{info, warn};

/// Errors that can occur while starting a tournament.
///
/// Per-participant provider failures never surface here; they are
/// recorded in the run and excluded from consensus math.
#[derive(Error, Debug)]
pub enum RunTournamentError {
    #[error("Empty prompt")]
    EmptyPrompt,
}

/// Tournament execution parameters, per deployment
#[derive(Debug, Clone)]
pub struct TournamentConfig {
    /// How many models to query
    pub participant_count: usize,
    /// Minimum supporting models for an agreed issue
    pub agreement_threshold: usize,
    /// Deadline for each participant's call
    pub per_model_timeout: Duration,
    /// Deadline for the whole fan-out
    pub deadline: Duration,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        Self {
            participant_count: 3,
            agreement_threshold: DEFAULT_AGREEMENT_THRESHOLD,
            per_model_timeout: Duration::from_secs(30),
            deadline: Duration::from_secs(60),
        }
    }
}

/// Input for the RunTournament use case
#[derive(Debug, Clone)]
pub struct TournamentInput {
    pub prompt: String,
    pub system_context: Option<String>,
    /// Restrict participant choice to these ids; `None` means the whole
    /// registry
    pub candidate_pool: Option<Vec<String>>,
}

impl TournamentInput {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_context: None,
            candidate_pool: None,
        }
    }

    pub fn with_system_context(mut self, context: impl Into<String>) -> Self {
        self.system_context = Some(context.into());
        self
    }

    pub fn with_candidate_pool(mut self, pool: Vec<String>) -> Self {
        self.candidate_pool = Some(pool);
        self
    }
}

/// Complete tournament response: the audit run plus the merged verdict
#[derive(Debug, Clone)]
pub struct TournamentOutput {
    pub run: TournamentRun,
    pub verdict: Verdict,
    /// Fewer than two participants succeeded; the verdict rests on at
    /// most one model and should not be treated as consensus
    pub insufficient_quorum: bool,
}

/// Use case for running a multi-model tournament
pub struct RunTournamentUseCase<I, C> {
    registry: Arc<SharedRegistry>,
    budget: Arc<BudgetTracker>,
    invoker: Arc<I>,
    credentials: Arc<C>,
    config: TournamentConfig,
}

impl<I, C> RunTournamentUseCase<I, C>
where
    I: ModelInvoker + 'static,
    C: CredentialStore + 'static,
{
    pub fn new(
        registry: Arc<SharedRegistry>,
        budget: Arc<BudgetTracker>,
        invoker: Arc<I>,
        credentials: Arc<C>,
        config: TournamentConfig,
    ) -> Self {
        Self {
            registry,
            budget,
            invoker,
            credentials,
            config,
        }
    }

    pub async fn execute(
        &self,
        input: TournamentInput,
    ) -> Result<TournamentOutput, RunTournamentError> {
        if input.prompt.trim().is_empty() {
            return Err(RunTournamentError::EmptyPrompt);
        }

        let registry = self.registry.snapshot();
        let availability = probe(
            registry.as_ref(),
            self.invoker.as_ref(),
            self.credentials.as_ref(),
        )
        .await;

        let participants = choose_participants(
            &registry,
            &availability,
            input.candidate_pool.as_deref(),
            self.config.participant_count,
        );

        info!(
            "starting tournament with {} participants: {}",
            participants.len(),
            participants
                .iter()
                .map(|p| p.id.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );

        let run_id = format!("run-{}", chrono::Utc::now().timestamp_millis());
        let mut run = TournamentRun::new(run_id, input.prompt.clone());

        let mut request = InvocationRequest::new(input.prompt.clone());
        if let Some(context) = input.system_context.clone() {
            request = request.with_system_context(context);
        }
        let request = Arc::new(request);

        let completed = self.fan_out(&participants, request).await;

        // Record in participant choice order, not completion order, so
        // first-seen tie-breaks downstream stay deterministic. Anything
        // still pending at the deadline is a timeout.
        let mut completed = completed;
        for profile in &participants {
            let outcome = completed.remove(&profile.id).unwrap_or_else(|| {
                ParticipantResult::timeout(&profile.id, self.config.deadline.as_millis() as u64)
            });
            run.record(outcome);
        }
        run.complete();

        let verdict = detect(&run, self.config.agreement_threshold);
        let insufficient_quorum = run.insufficient_quorum();
        if insufficient_quorum {
            warn!(
                "tournament {} finished with insufficient quorum ({} successes)",
                run.run_id,
                run.successful_count()
            );
        }

        Ok(TournamentOutput {
            run,
            verdict,
            insufficient_quorum,
        })
    }

    /// Fan the request out to every participant and join under the
    /// global deadline. Each call is isolated: one failure never cancels
    /// the others. Calls still pending at the deadline are aborted and
    /// record no spend.
    async fn fan_out(
        &self,
        participants: &[ModelProfile],
        request: Arc<InvocationRequest>,
    ) -> HashMap<String, ParticipantResult> {
        let mut join_set = JoinSet::new();

        for profile in participants {
            let invoker = Arc::clone(&self.invoker);
            let request = Arc::clone(&request);
            let profile = profile.clone();
            let per_model_timeout = self.config.per_model_timeout;

            join_set.spawn(async move {
                let started = Instant::now();
                let result =
                    tokio::time::timeout(per_model_timeout, invoker.invoke(&profile, &request))
                        .await;
                let latency_ms = started.elapsed().as_millis() as u64;

                let outcome = match result {
                    Ok(Ok(payload)) => ParticipantResult::success(&profile.id, payload, latency_ms),
                    Ok(Err(e)) => ParticipantResult::failure(&profile.id, e.to_string(), latency_ms),
                    Err(_) => ParticipantResult::timeout(&profile.id, latency_ms),
                };
                (profile, outcome)
            });
        }

        let period = BudgetTracker::current_period();
        let deadline = tokio::time::sleep(self.config.deadline);
        tokio::pin!(deadline);

        let mut completed = HashMap::new();

        loop {
            tokio::select! {
                _ = &mut deadline => {
                    warn!(
                        "tournament deadline elapsed with {} of {} participants pending",
                        participants.len() - completed.len(),
                        participants.len()
                    );
                    join_set.abort_all();
                    break;
                }
                next = join_set.join_next() => match next {
                    None => break,
                    Some(Ok((profile, outcome))) => {
                        if outcome.is_success() {
                            let cost = estimate_typical(&profile);
                            if self.budget.record_spend(&period, cost).exceeded() {
                                warn!("budget ceiling exceeded recording spend for {}", profile.id);
                            }
                            info!("model {} responded in {}ms", profile.id, outcome.latency_ms);
                        } else {
                            warn!(
                                "model {} {}: {}",
                                profile.id,
                                outcome.status,
                                outcome.error.as_deref().unwrap_or("no detail")
                            );
                        }
                        completed.insert(outcome.model_id.clone(), outcome);
                    }
                    Some(Err(e)) => {
                        warn!("task join error: {}", e);
                    }
                }
            }
        }

        completed
    }
}

/// Choose up to `count` distinct participants.
///
/// Availability comes first, then strength diversity: each pick prefers
/// a model adding a strength the chosen set doesn't cover yet, so the
/// eventual disagreement is between genuinely different perspectives
/// rather than near-duplicates. Quality only breaks ties. Deterministic
/// for a fixed registry order.
fn choose_participants(
    registry: &CapabilityRegistry,
    availability: &AvailabilitySnapshot,
    pool: Option<&[String]>,
    count: usize,
) -> Vec<ModelProfile> {
    let candidates: Vec<&ModelProfile> = match pool {
        Some(ids) => ids.iter().filter_map(|id| registry.lookup(id)).collect(),
        None => registry.all().iter().collect(),
    };

    let mut remaining: Vec<&ModelProfile> = candidates
        .iter()
        .copied()
        .filter(|p| availability.is_available(&p.id))
        .collect();

    // Nothing usable: degrade to the guaranteed fallback alone
    if remaining.is_empty() {
        return vec![registry.fallback().clone()];
    }

    let mut chosen: Vec<ModelProfile> = Vec::new();
    let mut covered: BTreeSet<Strength> = BTreeSet::new();

    while chosen.len() < count && !remaining.is_empty() {
        let best_index = pick_most_diverse(&remaining, &covered);
        let picked = remaining.remove(best_index);
        covered.extend(picked.strengths.iter().cloned());
        chosen.push(picked.clone());
    }

    chosen
}

fn pick_most_diverse(pool: &[&ModelProfile], covered: &BTreeSet<Strength>) -> usize {
    let novelty = |p: &ModelProfile| p.strengths.iter().filter(|s| !covered.contains(s)).count();

    let mut best = 0;
    for (i, candidate) in pool.iter().enumerate().skip(1) {
        let current = pool[best];
        let better = novelty(candidate)
            .cmp(&novelty(current))
            .then(candidate.quality_score.cmp(&current.quality_score))
            .then(current.id.cmp(&candidate.id));
        if better == std::cmp::Ordering::Greater {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{CredentialStore, ProviderError};
    use async_trait::async_trait;
    use conclave_domain::InvocationStatus;

    enum Behavior {
        Reply(&'static str),
        Fail,
        Hang,
    }

    struct ScriptedInvoker {
        behaviors: HashMap<String, Behavior>,
    }

    impl ScriptedInvoker {
        fn new(entries: Vec<(&str, Behavior)>) -> Arc<Self> {
            Arc::new(Self {
                behaviors: entries
                    .into_iter()
                    .map(|(id, b)| (id.to_string(), b))
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl ModelInvoker for ScriptedInvoker {
        async fn invoke(
            &self,
            profile: &ModelProfile,
            _request: &InvocationRequest,
        ) -> Result<String, ProviderError> {
            match self.behaviors.get(&profile.id) {
                Some(Behavior::Reply(text)) => Ok(text.to_string()),
                Some(Behavior::Fail) => {
                    Err(ProviderError::RequestFailed("scripted failure".to_string()))
                }
                Some(Behavior::Hang) => {
                    tokio::time::sleep(Duration::from_secs(3_600)).await;
                    Ok(String::new())
                }
                None => Err(ProviderError::UnknownProvider(profile.provider.clone())),
            }
        }

        async fn is_reachable(&self, _profile: &ModelProfile) -> bool {
            true
        }
    }

    struct AllProviders;

    impl CredentialStore for AllProviders {
        fn has_credential(&self, _provider: &str) -> bool {
            true
        }
    }

    const PACING: &str =
        r#"[{"issue_type": "pacing", "description": "slow middle", "confidence": 0.8}]"#;
    const TONE: &str = r#"[{"issue_type": "tone", "description": "flat", "confidence": 0.6}]"#;

    fn registry() -> CapabilityRegistry {
        CapabilityRegistry::load(
            vec![
                ModelProfile::new("local-small", "local")
                    .with_strengths([Strength::Versatile])
                    .with_quality(5)
                    .local(),
                ModelProfile::new("reasoner", "anthropic")
                    .with_strengths([Strength::Reasoning])
                    .with_quality(9)
                    .with_cost(3.0, 15.0),
                ModelProfile::new("narrator", "openai")
                    .with_strengths([Strength::Narrative])
                    .with_quality(8)
                    .with_cost(1.0, 2.0),
                ModelProfile::new("outliner", "openai")
                    .with_strengths([Strength::Structural])
                    .with_quality(7)
                    .with_cost(0.5, 1.0),
            ],
            "local-small",
        )
        .unwrap()
        .registry
    }

    fn use_case(
        invoker: Arc<ScriptedInvoker>,
        config: TournamentConfig,
    ) -> (
        RunTournamentUseCase<ScriptedInvoker, AllProviders>,
        Arc<BudgetTracker>,
    ) {
        let budget = Arc::new(BudgetTracker::unbounded());
        let uc = RunTournamentUseCase::new(
            Arc::new(SharedRegistry::new(registry())),
            Arc::clone(&budget),
            invoker,
            Arc::new(AllProviders),
            config,
        );
        (uc, budget)
    }

    #[tokio::test]
    async fn test_agreeing_majority_produces_agreed_issue() {
        let invoker = ScriptedInvoker::new(vec![
            ("reasoner", Behavior::Reply(PACING)),
            ("narrator", Behavior::Reply(PACING)),
            ("outliner", Behavior::Reply(TONE)),
        ]);
        let (uc, _) = use_case(invoker, TournamentConfig::default());

        let output = uc
            .execute(
                TournamentInput::new("review chapter 3").with_candidate_pool(vec![
                    "reasoner".into(),
                    "narrator".into(),
                    "outliner".into(),
                ]),
            )
            .await
            .unwrap();

        assert!(!output.insufficient_quorum);
        assert_eq!(output.verdict.agreed.len(), 1);
        assert_eq!(output.verdict.agreed[0].issue_type, "pacing");
        assert_eq!(output.verdict.disputed.len(), 1);
        assert!(output.run.is_complete());
    }

    #[tokio::test]
    async fn test_failure_recorded_but_excluded_from_consensus() {
        let invoker = ScriptedInvoker::new(vec![
            ("reasoner", Behavior::Reply(PACING)),
            ("narrator", Behavior::Reply(PACING)),
            ("outliner", Behavior::Fail),
        ]);
        let (uc, _) = use_case(invoker, TournamentConfig::default());

        let output = uc
            .execute(
                TournamentInput::new("review").with_candidate_pool(vec![
                    "reasoner".into(),
                    "narrator".into(),
                    "outliner".into(),
                ]),
            )
            .await
            .unwrap();

        // Retained in the run record for audit
        let failed = output
            .run
            .results
            .iter()
            .find(|r| r.model_id == "outliner")
            .unwrap();
        assert_eq!(failed.status, InvocationStatus::Failure);

        // Excluded from consensus math
        assert_eq!(output.verdict.agreed[0].total_models, 2);
        assert!(!output.insufficient_quorum);
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_participant_times_out_and_verdict_survives() {
        let invoker = ScriptedInvoker::new(vec![
            ("reasoner", Behavior::Reply(PACING)),
            ("narrator", Behavior::Reply(PACING)),
            ("outliner", Behavior::Hang),
        ]);
        let config = TournamentConfig {
            per_model_timeout: Duration::from_secs(5),
            deadline: Duration::from_secs(10),
            ..TournamentConfig::default()
        };
        let (uc, _) = use_case(invoker, config);

        let output = uc
            .execute(
                TournamentInput::new("review").with_candidate_pool(vec![
                    "reasoner".into(),
                    "narrator".into(),
                    "outliner".into(),
                ]),
            )
            .await
            .unwrap();

        let hung = output
            .run
            .results
            .iter()
            .find(|r| r.model_id == "outliner")
            .unwrap();
        assert_eq!(hung.status, InvocationStatus::Timeout);
        assert_eq!(output.verdict.agreed.len(), 1);
        assert!(!output.insufficient_quorum);
    }

    #[tokio::test(start_paused = true)]
    async fn test_global_deadline_records_pending_as_timeout() {
        let invoker = ScriptedInvoker::new(vec![
            ("reasoner", Behavior::Reply(PACING)),
            ("narrator", Behavior::Reply(PACING)),
            ("outliner", Behavior::Hang),
        ]);
        // Deadline fires while the per-model timeout is still far off
        let config = TournamentConfig {
            per_model_timeout: Duration::from_secs(120),
            deadline: Duration::from_secs(10),
            ..TournamentConfig::default()
        };
        let (uc, budget) = use_case(invoker, config);

        let output = uc
            .execute(
                TournamentInput::new("review").with_candidate_pool(vec![
                    "reasoner".into(),
                    "narrator".into(),
                    "outliner".into(),
                ]),
            )
            .await
            .unwrap();

        let pending = output
            .run
            .results
            .iter()
            .find(|r| r.model_id == "outliner")
            .unwrap();
        assert_eq!(pending.status, InvocationStatus::Timeout);

        // The aborted call records no spend; only the two completed ones do
        let period = BudgetTracker::current_period();
        let total = budget.spend_to_date(&period);
        assert!((total - 0.0165).abs() < 1e-9, "total was {total}");

        assert_eq!(output.verdict.agreed.len(), 1);
        assert!(!output.insufficient_quorum);
        assert!(output.run.is_complete());
    }

    #[tokio::test]
    async fn test_single_success_flags_insufficient_quorum() {
        let invoker = ScriptedInvoker::new(vec![
            ("reasoner", Behavior::Reply(PACING)),
            ("narrator", Behavior::Fail),
            ("outliner", Behavior::Fail),
        ]);
        let (uc, _) = use_case(invoker, TournamentConfig::default());

        let output = uc
            .execute(
                TournamentInput::new("review").with_candidate_pool(vec![
                    "reasoner".into(),
                    "narrator".into(),
                    "outliner".into(),
                ]),
            )
            .await
            .unwrap();

        assert!(output.insufficient_quorum);
        // Degraded but still returned
        assert_eq!(output.verdict.disputed.len(), 1);
    }

    #[tokio::test]
    async fn test_spend_recorded_only_for_completed_calls() {
        let invoker = ScriptedInvoker::new(vec![
            ("reasoner", Behavior::Reply(PACING)),
            ("narrator", Behavior::Reply(PACING)),
            ("outliner", Behavior::Fail),
        ]);
        let (uc, budget) = use_case(invoker, TournamentConfig::default());

        uc.execute(TournamentInput::new("review").with_candidate_pool(vec![
            "reasoner".into(),
            "narrator".into(),
            "outliner".into(),
        ]))
        .await
        .unwrap();

        // reasoner: 2000/1e6*3.0 + 500/1e6*15.0 = 0.0135
        // narrator: 2000/1e6*1.0 + 500/1e6*2.0 = 0.003
        let period = BudgetTracker::current_period();
        let total = budget.spend_to_date(&period);
        assert!((total - 0.0165).abs() < 1e-9, "total was {total}");
    }

    #[tokio::test]
    async fn test_empty_prompt_rejected() {
        let invoker = ScriptedInvoker::new(vec![]);
        let (uc, _) = use_case(invoker, TournamentConfig::default());
        let err = uc.execute(TournamentInput::new("   ")).await.unwrap_err();
        assert!(matches!(err, RunTournamentError::EmptyPrompt));
    }

    #[test]
    fn test_choose_participants_prefers_diversity() {
        let reg = registry();
        let availability =
            AvailabilitySnapshot::new(reg.all().iter().map(|p| p.id.clone()));

        let chosen = choose_participants(&reg, &availability, None, 3);
        let strengths: BTreeSet<&Strength> =
            chosen.iter().flat_map(|p| p.strengths.iter()).collect();

        assert_eq!(chosen.len(), 3);
        // Three picks should cover three distinct strengths, not stack
        // duplicates of the highest-quality profile
        assert!(strengths.len() >= 3);
    }

    #[test]
    fn test_choose_participants_nothing_available_degrades_to_fallback() {
        let reg = registry();
        let chosen = choose_participants(&reg, &AvailabilitySnapshot::default(), None, 3);
        assert_eq!(chosen.len(), 1);
        assert_eq!(chosen[0].id, "local-small");
    }

    #[test]
    fn test_choose_participants_is_deterministic() {
        let reg = registry();
        let availability =
            AvailabilitySnapshot::new(reg.all().iter().map(|p| p.id.clone()));

        let first: Vec<String> = choose_participants(&reg, &availability, None, 3)
            .into_iter()
            .map(|p| p.id)
            .collect();
        for _ in 0..5 {
            let again: Vec<String> = choose_participants(&reg, &availability, None, 3)
                .into_iter()
                .map(|p| p.id)
                .collect();
            assert_eq!(first, again);
        }
    }
}
