use super::{BacktestProvider, GenerationRequest, SignalProvider, StrategyGenerator};
use crate::models::{GeneratedStrategy, PartialSignal, Performance, RiskLevel, StrategyRecord};
use crate::Result;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const NAME_SUFFIXES: &[&str] = &["Pro", "Alpha", "Hunter", "Edge", "Prime", "Scout"];

/// Seeded stand-in for the AI services and the backtest engine
///
/// Same seed, same calls, same numbers. Used for development and tests
/// wherever the real collaborators are unavailable.
pub struct MockLab {
    rng: StdRng,
    sentiment_dropout: f64, // Probability that sentiment comes back missing
    generated: u32,
}

impl MockLab {
    /// Create a new lab with a seed for reproducibility
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            sentiment_dropout: 0.0,
            generated: 0,
        }
    }

    pub fn with_sentiment_dropout(mut self, probability: f64) -> Self {
        self.sentiment_dropout = if probability.is_finite() {
            probability.clamp(0.0, 1.0)
        } else {
            0.0
        };
        self
    }

    /// Return scale (percent) a strategy of this risk tier swings by
    fn volatility(risk_level: RiskLevel) -> f64 {
        match risk_level {
            RiskLevel::Conservative => 8.0,
            RiskLevel::Moderate => 15.0,
            RiskLevel::Aggressive => 30.0,
        }
    }
}

impl StrategyGenerator for MockLab {
    fn generate_strategy(&mut self, request: &GenerationRequest) -> Result<GeneratedStrategy> {
        if request.target_assets.is_empty() {
            return Err("Cannot generate a strategy without target assets".into());
        }

        self.generated += 1;
        let name = match &request.name {
            Some(name) => name.clone(),
            None => {
                let suffix = NAME_SUFFIXES[self.rng.gen_range(0..NAME_SUFFIXES.len())];
                format!("{} {} #{}", request.strategy_type.label(), suffix, self.generated)
            }
        };

        tracing::debug!("Mock lab generated '{}'", name);

        Ok(GeneratedStrategy {
            id: None,
            name,
            description: format!(
                "{} model trading {} with {} risk",
                request.strategy_type.model_family(),
                request.target_assets.join(", "),
                request.risk_level
            ),
            strategy_type: request.strategy_type,
            risk_level: request.risk_level,
            target_assets: request.target_assets.clone(),
            is_active: false,
            performance: None,
            parameters: None,
        })
    }

    fn name(&self) -> &str {
        "MockLab"
    }
}

impl BacktestProvider for MockLab {
    fn run_backtest(&mut self, record: &StrategyRecord) -> Result<Performance> {
        let scale = Self::volatility(record.risk_level);

        // Skewed slightly positive so the dashboard has winners and losers
        let returns = self.rng.gen_range(-0.5..1.0) * scale;
        let sharpe = returns / scale * 2.0 + self.rng.gen_range(-0.3..0.3);
        let max_drawdown = self.rng.gen_range(0.2..0.8) * scale;
        let win_rate = self.rng.gen_range(40.0..70.0);
        let total_trades = self.rng.gen_range(20..400);

        Ok(Performance {
            returns,
            sharpe,
            max_drawdown,
            win_rate,
            total_trades,
        })
    }

    fn name(&self) -> &str {
        "MockLab"
    }
}

impl SignalProvider for MockLab {
    fn analyze(&mut self, symbol: &str) -> Result<PartialSignal> {
        if symbol.trim().is_empty() {
            return Err("Empty asset symbol".into());
        }

        let technical = self.rng.gen_range(0.3..0.95);
        let sentiment = self.rng.gen_range(-1.0..1.0);
        let strategy = self.rng.gen_range(0.4..0.9);
        let sentiment_missing = self.rng.gen_bool(self.sentiment_dropout);

        Ok(PartialSignal {
            technical_confidence: Some(technical),
            sentiment_score: if sentiment_missing { None } else { Some(sentiment) },
            strategy_confidence: Some(strategy),
        })
    }

    fn name(&self) -> &str {
        "MockLab"
    }
}
