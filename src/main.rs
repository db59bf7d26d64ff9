use anyhow::{bail, Context};
use chrono::Utc;
use clap::{Parser, Subcommand};
use stratlab::dashboard::{Dashboard, DashboardSnapshot};
use stratlab::ensemble::{score_assets, AssetSignal};
use stratlab::lab::{builtin_strategies, GenerationRequest, MockLab};
use stratlab::models::{RiskLevel, StrategyRecord, StrategyType};
use stratlab::portfolio::PortfolioConfig;
use stratlab::ranking::FilterQuery;
use stratlab::settings::{Settings, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use stratlab::store::StrategyStore;
use tokio::time::{interval, Duration};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

type FilterHandle = reload::Handle<EnvFilter, Registry>;

#[derive(Parser)]
#[command(name = "stratlab", about = "AI strategy lab: rank strategies, score signals, summarize the book")]
struct Cli {
    /// Settings file (TOML, extension optional)
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Filter and sort the strategy list
    Rank {
        #[arg(long, default_value = "")]
        search: String,
        /// all | conservative | moderate | aggressive
        #[arg(long, default_value = "all")]
        risk: String,
        /// all | neural_momentum | lstm_reversal | rl_adaptive | transformer_sentiment | transformer_hft | gan_synthetic
        #[arg(long = "type", default_value = "all")]
        strategy_type: String,
        /// performance | name | risk | recent
        #[arg(long, default_value = "performance")]
        sort: String,
        #[arg(long)]
        json: bool,
    },
    /// Portfolio headline statistics
    Summary {
        /// Number of worst strategies to list
        #[arg(long)]
        worst: Option<usize>,
        #[arg(long)]
        json: bool,
    },
    /// Ensemble-score assets (defaults to the configured watchlist)
    Signals {
        symbols: Vec<String>,
        #[arg(long)]
        json: bool,
    },
    /// Generate a strategy with the lab and backtest it
    Generate {
        #[arg(long = "type")]
        strategy_type: String,
        #[arg(long, default_value = "moderate")]
        risk: String,
        #[arg(long, value_delimiter = ',', required = true)]
        assets: Vec<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Refresh the dashboard on a timer until Ctrl+C
    Watch {
        /// Stop after this many refreshes
        #[arg(long)]
        ticks: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let log_handle = setup_logging();

    let settings = Settings::load(&cli.config)
        .with_context(|| format!("loading settings from {}", cli.config))?;
    if std::env::var_os(EnvFilter::DEFAULT_ENV).is_none() {
        apply_log_filter(&log_handle, &settings.log_filter);
    }

    let store = StrategyStore::from_records(builtin_strategies(Utc::now()));
    let lab = MockLab::new(settings.dashboard.seed)
        .with_sentiment_dropout(settings.dashboard.sentiment_dropout);

    tracing::debug!("Loaded {} strategies, seed {}", store.len(), settings.dashboard.seed);

    match cli.command {
        Command::Rank {
            search,
            risk,
            strategy_type,
            sort,
            json,
        } => {
            let query = FilterQuery::from_raw(&search, &risk, &strategy_type, &sort);
            let view = store.view(&query);
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print_strategy_table(&view);
            }
        }
        Command::Summary { worst, json } => {
            let config = PortfolioConfig {
                worst_k: worst.unwrap_or(settings.portfolio.worst_k),
            };
            let summary = store.summary(&config);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                summary.print_report();
            }
        }
        Command::Signals { symbols, json } => {
            let symbols = if symbols.is_empty() {
                settings.dashboard.watchlist.clone()
            } else {
                symbols
            };
            let mut lab = lab;
            let signals = score_assets(&mut lab, &symbols, &settings.ensemble);
            if json {
                println!("{}", serde_json::to_string_pretty(&signals)?);
            } else {
                print_signal_table(&signals);
            }
        }
        Command::Generate {
            strategy_type,
            risk,
            assets,
            name,
        } => {
            let Some(strategy_type) = StrategyType::parse(&strategy_type) else {
                bail!("unknown strategy type '{}'", strategy_type);
            };
            let Some(risk_level) = RiskLevel::parse(&risk) else {
                bail!("unknown risk level '{}'", risk);
            };

            let mut request = GenerationRequest::new(strategy_type, risk_level, assets);
            if let Some(name) = name {
                request = request.with_name(name);
            }

            let mut dashboard = Dashboard::new(store, lab, settings);
            let id = dashboard
                .generate_strategy(&request)
                .map_err(|e| anyhow::anyhow!("strategy generation failed: {}", e))?;

            if let Some(record) = dashboard.store().get(&id) {
                print_strategy_table(std::slice::from_ref(record));
            }
        }
        Command::Watch { ticks } => {
            run_watch(Dashboard::new(store, lab, settings.clone()), &settings, ticks).await;
        }
    }

    Ok(())
}

fn setup_logging() -> FilterHandle {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let (filter, handle) = reload::Layer::new(filter);
    tracing_subscriber::registry().with(filter).with(fmt::layer()).init();
    handle
}

/// Swap in the filter from settings; a bad directive keeps the current one
fn apply_log_filter(handle: &FilterHandle, directives: &str) -> bool {
    let filter = match EnvFilter::try_new(directives) {
        Ok(filter) => filter,
        Err(e) => {
            tracing::warn!("Invalid log_filter '{}': {}, keeping current filter", directives, e);
            return false;
        }
    };

    match handle.reload(filter) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("Could not apply log_filter '{}': {}", directives, e);
            false
        }
    }
}

async fn run_watch(mut dashboard: Dashboard<MockLab>, settings: &Settings, ticks: Option<u64>) {
    let every = Duration::from_secs(settings.dashboard.refresh_interval_secs);
    let mut timer = interval(every);

    tracing::info!(
        "🔄 Refreshing every {}s for {} assets. Press Ctrl+C to stop...",
        every.as_secs(),
        settings.dashboard.watchlist.len()
    );

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("⚠️  Received Ctrl+C, shutting down...");
                break;
            }
            _ = timer.tick() => {
                let snapshot = dashboard.refresh();
                print_snapshot(&snapshot);

                if ticks.is_some_and(|limit| snapshot.cycle >= limit) {
                    break;
                }
            }
        }
    }

    tracing::info!("👋 Dashboard stopped");
}

fn print_strategy_table(records: &[StrategyRecord]) {
    println!(
        "\n{:<30} {:<22} {:<13} {:>9} {:>7} {:>7} {:>7}",
        "Strategy", "Type", "Risk", "Return%", "Sharpe", "Win%", "Active"
    );
    println!("{}", "─".repeat(100));

    for r in records {
        println!(
            "{:<30} {:<22} {:<13} {:>9.2} {:>7.2} {:>7.1} {:>7}",
            r.name,
            r.strategy_type.label(),
            r.risk_level,
            r.performance.returns,
            r.performance.sharpe,
            r.performance.win_rate,
            if r.is_active { "yes" } else { "no" }
        );
    }
    println!();
}

fn print_signal_table(signals: &[AssetSignal]) {
    println!(
        "\n{:<8} {:>10} {:>10} {:>10} {:>10}  {:<16} {:<8}",
        "Asset", "Technical", "Sentiment", "Strategy", "Ensemble", "Tier", "Direction"
    );
    println!("{}", "─".repeat(82));

    for s in signals {
        let fmt = |v: Option<f64>| v.map(|x| format!("{:.2}", x)).unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<8} {:>10} {:>10} {:>10} {:>10.3}  {:<16} {:<8?}",
            s.symbol,
            fmt(s.signal.technical_confidence),
            fmt(s.signal.sentiment_score),
            fmt(s.signal.strategy_confidence),
            s.result.ensemble_confidence,
            s.result.tier.label(),
            s.result.direction
        );
    }
    println!();
}

fn print_snapshot(snapshot: &DashboardSnapshot) {
    println!(
        "\n═══ Cycle {} @ {} ═══",
        snapshot.cycle,
        snapshot.generated_at.format("%H:%M:%S")
    );
    print_strategy_table(&snapshot.view);
    print_signal_table(&snapshot.signals);
    snapshot.summary.print_report();
}
