//! CLI entrypoint for conclave
//!
//! Wires together all layers using dependency injection: config ->
//! registry + credentials + routing invoker -> use cases.

use anyhow::Result;
use clap::{Parser, Subcommand};
use conclave_application::{
    BudgetTracker, EstimateCostUseCase, EstimateInput, RunTournamentUseCase, SelectModelUseCase,
    SharedRegistry, TournamentConfig, TournamentInput,
};
use conclave_domain::{LocalityPreference, QualityTier, SelectionCriteria};
use conclave_infrastructure::{
    BudgetLedger, ConfigLoader, EnvCredentialStore, FileConfig, RoutingInvoker, build_registry,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "conclave", about = "Model orchestration and tournament consensus engine")]
struct Cli {
    /// Explicit config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Skip config files, use built-in defaults
    #[arg(long, global = true)]
    no_config: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Select the best model for a task
    Select {
        /// Task type (e.g. plot_analysis, scene_draft, outline)
        task_type: String,

        /// Quality tier: budget, balanced, or premium
        #[arg(long, default_value = "balanced")]
        tier: QualityTier,

        /// Per-query cost cap in USD
        #[arg(long)]
        max_cost: Option<f64>,

        /// Prefer local models when any is available
        #[arg(long, conflicts_with = "require_cloud")]
        prefer_local: bool,

        /// Exclude local-only models
        #[arg(long)]
        require_cloud: bool,
    },

    /// Run a multi-model tournament and report the consensus verdict
    Tournament {
        /// The prompt to fan out
        prompt: String,

        /// Optional system context
        #[arg(long)]
        context: Option<String>,

        /// Number of participants
        #[arg(long)]
        participants: Option<usize>,

        /// Restrict participants to these model ids
        #[arg(long = "pool", value_delimiter = ',')]
        candidate_pool: Option<Vec<String>>,
    },

    /// Project the monthly cost of a workload
    Estimate {
        task_type: String,

        #[arg(long, default_value = "balanced")]
        tier: QualityTier,

        /// Expected queries per month
        #[arg(long, default_value_t = 1_000)]
        volume: u64,
    },

    /// Show budget state for a billing period
    Budget {
        /// Period id (year-month); defaults to the current month
        #[arg(long)]
        period: Option<String>,
    },

    /// List the registered model profiles
    Models,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let config: FileConfig = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref()).map_err(|e| anyhow::anyhow!(e))?
    };

    // === Dependency Injection ===
    let registry = Arc::new(SharedRegistry::new(build_registry(&config)?));
    let credentials = Arc::new(EnvCredentialStore::from_config(&config));
    let invoker = Arc::new(RoutingInvoker::from_config(&config, &credentials));

    // Hydrate the tracker from the persisted ledger so the monthly
    // ceiling survives one-shot invocations
    let ledger = BudgetLedger::default_location();
    let persisted = ledger.as_ref().map(|l| l.load()).unwrap_or_default();
    let budget = Arc::new(BudgetTracker::with_spend(
        config.budget.monthly_ceiling,
        persisted,
    ));

    info!("conclave started");

    match cli.command {
        Command::Select {
            task_type,
            tier,
            max_cost,
            prefer_local,
            require_cloud,
        } => {
            let mut criteria = SelectionCriteria::for_task(task_type).with_tier(tier);
            if let Some(cap) = max_cost {
                criteria = criteria.with_max_cost(cap);
            }
            if prefer_local {
                criteria = criteria.with_locality(LocalityPreference::PreferLocal);
            } else if require_cloud {
                criteria = criteria.with_locality(LocalityPreference::RequireCloud);
            }

            let use_case = SelectModelUseCase::new(
                registry,
                budget,
                config.budget.policy,
                invoker,
                credentials,
            );
            let outcome = use_case.execute(&criteria).await?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::Tournament {
            prompt,
            context,
            participants,
            candidate_pool,
        } => {
            let mut tournament_config = TournamentConfig {
                participant_count: config.tournament.participant_count,
                agreement_threshold: config.tournament.agreement_threshold,
                per_model_timeout: Duration::from_secs(config.tournament.per_model_timeout_secs),
                deadline: Duration::from_secs(config.tournament.deadline_secs),
            };
            if let Some(count) = participants {
                tournament_config.participant_count = count;
            }

            let mut input = TournamentInput::new(prompt);
            if let Some(context) = context {
                input = input.with_system_context(context);
            }
            if let Some(pool) = candidate_pool {
                input = input.with_candidate_pool(pool);
            }

            let use_case = RunTournamentUseCase::new(
                registry,
                Arc::clone(&budget),
                invoker,
                credentials,
                tournament_config,
            );
            let output = use_case.execute(input).await?;

            if let Some(ledger) = &ledger
                && let Err(e) = ledger.save(&budget.totals())
            {
                warn!("failed to persist spend ledger: {}", e);
            }

            println!("Run {} ({} participants)", output.run.run_id, output.run.participants.len());
            for result in &output.run.results {
                println!("  {} -> {} ({}ms)", result.model_id, result.status, result.latency_ms);
            }
            if output.insufficient_quorum {
                println!("\nWARNING: insufficient quorum, verdict rests on fewer than 2 models");
            }
            println!("\nVerdict:");
            println!("{}", serde_json::to_string_pretty(&output.verdict)?);
        }

        Command::Estimate { task_type, tier, volume } => {
            let use_case = EstimateCostUseCase::new(registry, invoker, credentials);
            let output = use_case
                .execute(&EstimateInput {
                    task_type,
                    quality_tier: tier,
                    assumed_monthly_volume: volume,
                })
                .await;
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Budget { period } => {
            let period = period.unwrap_or_else(BudgetTracker::current_period);
            let report = budget.report(&period);
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        Command::Models => {
            let snapshot = registry.snapshot();
            for profile in snapshot.all() {
                let locality = if profile.local_only { "local" } else { "cloud" };
                println!(
                    "{:<24} {:<10} q{:<3} ${:<6} {:<10} [{}]",
                    profile.id,
                    profile.provider,
                    profile.quality_score,
                    profile.cost_per_million_input,
                    locality,
                    profile
                        .strengths
                        .iter()
                        .map(|s| s.to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
    }

    Ok(())
}
