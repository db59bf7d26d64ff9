use crate::models::{Performance, RiskLevel, StrategyRecord, StrategyType};
use chrono::{DateTime, Duration, Utc};

struct CatalogEntry {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    strategy_type: StrategyType,
    risk_level: RiskLevel,
    assets: &'static [&'static str],
    is_active: bool,
    performance: Performance,
    timeframe: &'static str,
    age_days: i64,
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: "neural-momentum-pro",
        name: "Neural Momentum Pro",
        description: "Feedforward network riding multi-day crypto momentum",
        strategy_type: StrategyType::NeuralMomentum,
        risk_level: RiskLevel::Moderate,
        assets: &["BTC", "ETH", "SOL"],
        is_active: true,
        performance: Performance {
            returns: 24.5,
            sharpe: 1.85,
            max_drawdown: 8.2,
            win_rate: 67.3,
            total_trades: 156,
        },
        timeframe: "4h",
        age_days: 30,
    },
    CatalogEntry {
        id: "lstm-reversal-hunter",
        name: "LSTM Reversal Hunter",
        description: "Sequence model fading exhausted equity moves",
        strategy_type: StrategyType::LstmReversal,
        risk_level: RiskLevel::Aggressive,
        assets: &["AAPL", "TSLA", "NVDA"],
        is_active: true,
        performance: Performance {
            returns: 18.7,
            sharpe: 1.42,
            max_drawdown: 12.5,
            win_rate: 61.8,
            total_trades: 203,
        },
        timeframe: "1h",
        age_days: 45,
    },
    CatalogEntry {
        id: "rl-adaptive-trader",
        name: "RL Adaptive Trader",
        description: "Policy-gradient agent rebalancing index ETFs",
        strategy_type: StrategyType::RlAdaptive,
        risk_level: RiskLevel::Moderate,
        assets: &["SPY", "QQQ"],
        is_active: false,
        performance: Performance {
            returns: 15.3,
            sharpe: 1.65,
            max_drawdown: 6.8,
            win_rate: 64.5,
            total_trades: 89,
        },
        timeframe: "1d",
        age_days: 20,
    },
    CatalogEntry {
        id: "transformer-sentiment-alpha",
        name: "Transformer Sentiment Alpha",
        description: "News and social sentiment scored by an attention model",
        strategy_type: StrategyType::TransformerSentiment,
        risk_level: RiskLevel::Conservative,
        assets: &["BTC", "ETH"],
        is_active: true,
        performance: Performance {
            returns: 11.2,
            sharpe: 1.95,
            max_drawdown: 4.1,
            win_rate: 71.2,
            total_trades: 124,
        },
        timeframe: "1h",
        age_days: 10,
    },
    CatalogEntry {
        id: "gan-synthetic-explorer",
        name: "GAN Synthetic Explorer",
        description: "Rules mined from GAN-generated market scenarios",
        strategy_type: StrategyType::GanSynthetic,
        risk_level: RiskLevel::Aggressive,
        assets: &["SOL", "AVAX", "MATIC"],
        is_active: false,
        performance: Performance {
            returns: -3.4,
            sharpe: -0.2,
            max_drawdown: 18.9,
            win_rate: 44.0,
            total_trades: 61,
        },
        timeframe: "15m",
        age_days: 5,
    },
];

/// The demo strategies the dashboard ships with, dated relative to `now`
pub fn builtin_strategies(now: DateTime<Utc>) -> Vec<StrategyRecord> {
    CATALOG
        .iter()
        .map(|entry| {
            let created_at = now - Duration::days(entry.age_days);
            let mut parameters = entry.risk_level.default_parameters();
            parameters.timeframe = Some(entry.timeframe.to_string());

            StrategyRecord {
                id: entry.id.to_string(),
                name: entry.name.to_string(),
                description: entry.description.to_string(),
                strategy_type: entry.strategy_type,
                risk_level: entry.risk_level,
                target_assets: entry.assets.iter().map(|s| s.to_string()).collect(),
                is_active: entry.is_active,
                performance: entry.performance,
                parameters,
                created_at,
                updated_at: created_at,
            }
        })
        .collect()
}
