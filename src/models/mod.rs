use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Strategy family produced by the AI lab
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum StrategyType {
    NeuralMomentum,
    LstmReversal,
    RlAdaptive,
    TransformerSentiment,
    TransformerHft,
    GanSynthetic,
}

impl StrategyType {
    pub const ALL: [StrategyType; 6] = [
        StrategyType::NeuralMomentum,
        StrategyType::LstmReversal,
        StrategyType::RlAdaptive,
        StrategyType::TransformerSentiment,
        StrategyType::TransformerHft,
        StrategyType::GanSynthetic,
    ];

    /// Tag used on the wire and in filter queries
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyType::NeuralMomentum => "neural_momentum",
            StrategyType::LstmReversal => "lstm_reversal",
            StrategyType::RlAdaptive => "rl_adaptive",
            StrategyType::TransformerSentiment => "transformer_sentiment",
            StrategyType::TransformerHft => "transformer_hft",
            StrategyType::GanSynthetic => "gan_synthetic",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrategyType::NeuralMomentum => "Neural Momentum",
            StrategyType::LstmReversal => "LSTM Reversal",
            StrategyType::RlAdaptive => "RL Adaptive",
            StrategyType::TransformerSentiment => "Transformer Sentiment",
            StrategyType::TransformerHft => "Transformer HFT",
            StrategyType::GanSynthetic => "GAN Synthetic",
        }
    }

    /// Model family backing the strategy
    pub fn model_family(&self) -> &'static str {
        match self {
            StrategyType::NeuralMomentum => "feedforward",
            StrategyType::LstmReversal => "lstm",
            StrategyType::RlAdaptive => "reinforcement",
            StrategyType::TransformerSentiment | StrategyType::TransformerHft => "transformer",
            StrategyType::GanSynthetic => "gan",
        }
    }

    /// Exact tag match, `None` for anything outside the closed set
    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == tag.trim())
    }
}

impl fmt::Display for StrategyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse risk classification, ordered conservative < moderate < aggressive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Conservative,
    Moderate,
    Aggressive,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [
        RiskLevel::Conservative,
        RiskLevel::Moderate,
        RiskLevel::Aggressive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Conservative => "conservative",
            RiskLevel::Moderate => "moderate",
            RiskLevel::Aggressive => "aggressive",
        }
    }

    /// Sort rank: conservative=1, moderate=2, aggressive=3
    pub fn rank(&self) -> u8 {
        match self {
            RiskLevel::Conservative => 1,
            RiskLevel::Moderate => 2,
            RiskLevel::Aggressive => 3,
        }
    }

    pub fn parse(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == tag.trim())
    }

    /// Parameter presets applied when a strategy is created or its risk level changes
    pub fn default_parameters(&self) -> StrategyParameters {
        let (position, stop, take, threshold) = match self {
            RiskLevel::Conservative => (5.0, 3.0, 6.0, 2.0),
            RiskLevel::Moderate => (10.0, 5.0, 10.0, 5.0),
            RiskLevel::Aggressive => (20.0, 8.0, 20.0, 10.0),
        };

        StrategyParameters {
            position_size_pct: position,
            stop_loss_pct: stop,
            take_profit_pct: take,
            risk_threshold_pct: threshold,
            timeframe: None,
            min_capital: None,
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest known backtest snapshot for a strategy
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Performance {
    pub returns: f64,      // Percent, signed
    pub sharpe: f64,
    pub max_drawdown: f64, // Percent, >= 0
    pub win_rate: f64,     // Percent, 0-100
    pub total_trades: u32,
}

impl Performance {
    /// Placeholder merged into freshly generated strategies before any backtest
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Enforce record invariants on numbers coming from a backtest run
    pub fn sanitized(self) -> Self {
        fn finite_or_zero(v: f64) -> f64 {
            if v.is_finite() {
                v
            } else {
                0.0
            }
        }

        Self {
            returns: finite_or_zero(self.returns),
            sharpe: finite_or_zero(self.sharpe),
            max_drawdown: finite_or_zero(self.max_drawdown).abs(),
            win_rate: finite_or_zero(self.win_rate).clamp(0.0, 100.0),
            total_trades: self.total_trades,
        }
    }
}

/// Tunable knobs for a strategy
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyParameters {
    pub position_size_pct: f64,
    pub stop_loss_pct: f64,
    pub take_profit_pct: f64,
    pub risk_threshold_pct: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeframe: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_capital: Option<f64>,
}

impl Default for StrategyParameters {
    fn default() -> Self {
        RiskLevel::Moderate.default_parameters()
    }
}

/// A named trading-rule definition plus its latest backtest performance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StrategyRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub strategy_type: StrategyType,
    pub risk_level: RiskLevel,
    pub target_assets: Vec<String>,
    pub is_active: bool,
    pub performance: Performance,
    pub parameters: StrategyParameters,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Strategy as handed over by a generator, before it joins the store
///
/// Missing fields are filled in on insert: zeroed performance, the risk
/// level's default parameters and a fresh id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedStrategy {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub strategy_type: StrategyType,
    pub risk_level: RiskLevel,
    pub target_assets: Vec<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub performance: Option<Performance>,
    #[serde(default)]
    pub parameters: Option<StrategyParameters>,
}

/// Fully resolved per-asset signal from the AI collaborators
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct SignalInput {
    pub technical_confidence: f64, // [0,1]
    pub sentiment_score: f64,      // [-1,1], sign = direction
    pub strategy_confidence: f64,  // [0,1]
}

impl SignalInput {
    pub fn new(technical_confidence: f64, sentiment_score: f64, strategy_confidence: f64) -> Self {
        Self {
            technical_confidence,
            sentiment_score,
            strategy_confidence,
        }
    }
}

/// Signal with components that may be unavailable
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PartialSignal {
    #[serde(default)]
    pub technical_confidence: Option<f64>,
    #[serde(default)]
    pub sentiment_score: Option<f64>,
    #[serde(default)]
    pub strategy_confidence: Option<f64>,
}

impl PartialSignal {
    /// Missing or non-finite components resolve to 0
    pub fn resolve(&self) -> SignalInput {
        fn component(v: Option<f64>) -> f64 {
            v.filter(|x| x.is_finite()).unwrap_or(0.0)
        }

        SignalInput {
            technical_confidence: component(self.technical_confidence),
            sentiment_score: component(self.sentiment_score),
            strategy_confidence: component(self.strategy_confidence),
        }
    }
}

impl From<SignalInput> for PartialSignal {
    fn from(signal: SignalInput) -> Self {
        Self {
            technical_confidence: Some(signal.technical_confidence),
            sentiment_score: Some(signal.sentiment_score),
            strategy_confidence: Some(signal.strategy_confidence),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_risk_rank_order() {
        assert!(RiskLevel::Conservative.rank() < RiskLevel::Moderate.rank());
        assert!(RiskLevel::Moderate.rank() < RiskLevel::Aggressive.rank());
        assert!(RiskLevel::Conservative < RiskLevel::Aggressive);
    }

    #[test]
    fn test_parse_closed_sets() {
        assert_eq!(RiskLevel::parse("moderate"), Some(RiskLevel::Moderate));
        assert_eq!(RiskLevel::parse("yolo"), None);
        assert_eq!(
            StrategyType::parse("lstm_reversal"),
            Some(StrategyType::LstmReversal)
        );
        assert_eq!(StrategyType::parse("LSTM"), None);
    }

    #[test]
    fn test_strategy_type_serde_tag() {
        let json = serde_json::to_string(&StrategyType::TransformerHft).unwrap();
        assert_eq!(json, "\"transformer_hft\"");
    }

    #[test]
    fn test_generated_payload_partial_fields() {
        let json = r#"{
            "name": "Night Owl",
            "type": "rl_adaptive",
            "risk_level": "aggressive",
            "target_assets": ["BTC"],
            "confidence": 0.8
        }"#;

        let generated: GeneratedStrategy = serde_json::from_str(json).unwrap();
        assert_eq!(generated.strategy_type, StrategyType::RlAdaptive);
        assert!(generated.id.is_none());
        assert!(generated.performance.is_none());
        assert!(generated.parameters.is_none());
    }

    #[test]
    fn test_performance_sanitized() {
        let perf = Performance {
            returns: f64::NAN,
            sharpe: 1.2,
            max_drawdown: -12.5,
            win_rate: 140.0,
            total_trades: 7,
        }
        .sanitized();

        assert_eq!(perf.returns, 0.0);
        assert_eq!(perf.sharpe, 1.2);
        assert_eq!(perf.max_drawdown, 12.5);
        assert_eq!(perf.win_rate, 100.0);
        assert_eq!(perf.total_trades, 7);
    }

    #[test]
    fn test_partial_signal_resolve_defaults_missing() {
        let partial = PartialSignal {
            technical_confidence: Some(0.7),
            sentiment_score: None,
            strategy_confidence: Some(f64::INFINITY),
        };

        let resolved = partial.resolve();
        assert_eq!(resolved.technical_confidence, 0.7);
        assert_eq!(resolved.sentiment_score, 0.0);
        assert_eq!(resolved.strategy_confidence, 0.0);
    }

    #[test]
    fn test_risk_presets_scale_with_risk() {
        let conservative = RiskLevel::Conservative.default_parameters();
        let aggressive = RiskLevel::Aggressive.default_parameters();
        assert!(conservative.position_size_pct < aggressive.position_size_pct);
        assert!(conservative.stop_loss_pct < aggressive.stop_loss_pct);
    }
}
