// AI lab collaborators: strategy generation, backtesting, signal analysis
pub mod catalog;
pub mod mock;

pub use catalog::builtin_strategies;
pub use mock::MockLab;

use crate::models::{
    GeneratedStrategy, PartialSignal, Performance, RiskLevel, StrategyRecord, StrategyType,
};
use crate::Result;

/// What the user asked the lab to build
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub strategy_type: StrategyType,
    pub risk_level: RiskLevel,
    pub target_assets: Vec<String>,
    pub name: Option<String>,
}

impl GenerationRequest {
    pub fn new(strategy_type: StrategyType, risk_level: RiskLevel, target_assets: Vec<String>) -> Self {
        Self {
            strategy_type,
            risk_level,
            target_assets,
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// Produces new strategy definitions
pub trait StrategyGenerator: Send {
    fn generate_strategy(&mut self, request: &GenerationRequest) -> Result<GeneratedStrategy>;

    fn name(&self) -> &str;
}

/// Runs a historical backtest for a strategy
pub trait BacktestProvider: Send {
    fn run_backtest(&mut self, record: &StrategyRecord) -> Result<Performance>;

    fn name(&self) -> &str;
}

/// Per-asset model analysis. Components the provider could not compute are `None`.
pub trait SignalProvider: Send {
    fn analyze(&mut self, symbol: &str) -> Result<PartialSignal>;

    fn name(&self) -> &str;
}
