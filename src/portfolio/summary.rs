use crate::models::StrategyRecord;
use crate::ranking::cmp_returns;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PortfolioConfig {
    pub worst_k: usize, // How many laggards to report
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self { worst_k: 2 }
    }
}

/// Headline statistics over the whole strategy collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioSummary {
    pub average_return: f64,
    pub best_strategy: Option<StrategyRecord>,
    pub worst_strategies: Vec<StrategyRecord>,
    pub active_count: usize,
    pub total_count: usize,

    // Dashboard extras
    pub average_sharpe: f64,
    pub average_win_rate: f64,
    pub total_trades: u64,
}

impl PortfolioSummary {
    /// Summary of an empty collection
    pub fn empty() -> Self {
        Self {
            average_return: 0.0,
            best_strategy: None,
            worst_strategies: vec![],
            active_count: 0,
            total_count: 0,
            average_sharpe: 0.0,
            average_win_rate: 0.0,
            total_trades: 0,
        }
    }

    /// Print a formatted report to stdout
    pub fn print_report(&self) {
        println!("\n╔═══════════════════════════════════════════════════════╗");
        println!("║              STRATEGY PORTFOLIO SUMMARY               ║");
        println!("╚═══════════════════════════════════════════════════════╝\n");

        println!("📊 OVERVIEW");
        println!("  Strategies:            {}", self.total_count);
        println!("  Active:                {}", self.active_count);
        println!("  Total Trades:          {}", self.total_trades);

        println!("\n📈 PERFORMANCE");
        println!("  Average Return:        {:+.2}%", self.average_return);
        println!("  Average Sharpe:        {:.2}", self.average_sharpe);
        println!("  Average Win Rate:      {:.1}%", self.average_win_rate);

        if let Some(best) = &self.best_strategy {
            println!(
                "\n🏆 Best: {} ({:+.2}%)",
                best.name, best.performance.returns
            );
        }

        if !self.worst_strategies.is_empty() {
            println!("\n⚠️  Needs attention:");
            for record in &self.worst_strategies {
                println!(
                    "    - {} ({:+.2}%)",
                    record.name, record.performance.returns
                );
            }
        }

        println!("\n═══════════════════════════════════════════════════════\n");
    }
}

/// Summarize with the default number of worst strategies
pub fn summarize(records: &[StrategyRecord]) -> PortfolioSummary {
    summarize_with(records, &PortfolioConfig::default())
}

/// Recomputed from scratch on every call; no running totals
pub fn summarize_with(records: &[StrategyRecord], config: &PortfolioConfig) -> PortfolioSummary {
    if records.is_empty() {
        return PortfolioSummary::empty();
    }

    let count = records.len() as f64;
    let mean = |f: fn(&StrategyRecord) -> f64| records.iter().map(f).sum::<f64>() / count;

    // Strictly greater keeps the first of equal returns
    let best_strategy = records
        .iter()
        .fold(None::<&StrategyRecord>, |best, r| match best {
            Some(b) if cmp_returns(r.performance.returns, b.performance.returns).is_le() => Some(b),
            _ => Some(r),
        })
        .cloned();

    let mut ascending: Vec<&StrategyRecord> = records.iter().collect();
    ascending.sort_by(|a, b| cmp_returns(a.performance.returns, b.performance.returns));
    let worst_strategies = ascending
        .into_iter()
        .take(config.worst_k)
        .cloned()
        .collect();

    PortfolioSummary {
        average_return: mean(|r| r.performance.returns),
        best_strategy,
        worst_strategies,
        active_count: records.iter().filter(|r| r.is_active).count(),
        total_count: records.len(),
        average_sharpe: mean(|r| r.performance.sharpe),
        average_win_rate: mean(|r| r.performance.win_rate),
        total_trades: records
            .iter()
            .map(|r| u64::from(r.performance.total_trades))
            .sum(),
    }
}
