use crate::models::{GeneratedStrategy, Performance, RiskLevel, StrategyRecord, StrategyType};
use crate::portfolio::{summarize_with, PortfolioConfig, PortfolioSummary};
use crate::ranking::{filter_and_sort, FilterQuery};
use chrono::{DateTime, Utc};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, PartialEq)]
pub enum StoreError {
    #[error("Strategy name must not be empty")]
    EmptyName,

    #[error("Strategy '{0}' has no target assets")]
    NoTargetAssets(String),
}

/// In-memory strategy collection owned by the caller
///
/// Records arrive from the generator or from the custom-strategy form, and are
/// updated in place when backtests complete or the user edits them. Views and
/// summaries are always derived from the current contents.
#[derive(Debug, Clone, Default)]
pub struct StrategyStore {
    records: Vec<StrategyRecord>,
}

impl StrategyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<StrategyRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[StrategyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&StrategyRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut StrategyRecord> {
        self.records.iter_mut().find(|r| r.id == id)
    }

    /// Merge a generator result into the store
    ///
    /// Missing performance becomes all zeros and missing parameters come from
    /// the risk level. A known id is replaced in place and keeps its creation time.
    pub fn insert_generated(&mut self, generated: GeneratedStrategy) -> Result<&StrategyRecord, StoreError> {
        validate(&generated.name, &generated.target_assets)?;

        let now = Utc::now();
        let id = generated
            .id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let mut record = StrategyRecord {
            id,
            name: generated.name,
            description: generated.description,
            strategy_type: generated.strategy_type,
            risk_level: generated.risk_level,
            target_assets: generated.target_assets,
            is_active: generated.is_active,
            performance: generated
                .performance
                .map(Performance::sanitized)
                .unwrap_or_else(Performance::zeroed),
            parameters: generated
                .parameters
                .unwrap_or_else(|| generated.risk_level.default_parameters()),
            created_at: now,
            updated_at: now,
        };

        let index = match self.records.iter().position(|r| r.id == record.id) {
            Some(index) => {
                record.created_at = self.records[index].created_at;
                record.updated_at = touch(record.created_at);
                tracing::info!("Replacing strategy {} ({})", record.id, record.name);
                self.records[index] = record;
                index
            }
            None => {
                tracing::info!("Added strategy {} ({})", record.id, record.name);
                self.records.push(record);
                self.records.len() - 1
            }
        };

        Ok(&self.records[index])
    }

    /// User-defined strategy from the create form, with risk-level presets
    pub fn create_custom(
        &mut self,
        name: &str,
        description: &str,
        strategy_type: StrategyType,
        risk_level: RiskLevel,
        target_assets: Vec<String>,
    ) -> Result<&StrategyRecord, StoreError> {
        self.insert_generated(GeneratedStrategy {
            id: None,
            name: name.trim().to_string(),
            description: description.to_string(),
            strategy_type,
            risk_level,
            target_assets,
            is_active: false,
            performance: None,
            parameters: None,
        })
    }

    /// Replace the performance snapshot of `id` with a finished backtest
    pub fn apply_backtest(&mut self, id: &str, performance: Performance) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.performance = performance.sanitized();
                record.updated_at = touch(record.created_at);
                tracing::debug!(
                    "Backtest for {}: {:+.2}% (sharpe {:.2})",
                    id,
                    record.performance.returns,
                    record.performance.sharpe
                );
                true
            }
            None => {
                tracing::warn!("Backtest result for unknown strategy {}, ignoring", id);
                false
            }
        }
    }

    pub fn set_active(&mut self, id: &str, is_active: bool) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                record.is_active = is_active;
                record.updated_at = touch(record.created_at);
                true
            }
            None => false,
        }
    }

    pub fn toggle_active(&mut self, id: &str) -> bool {
        match self.get(id).map(|r| r.is_active) {
            Some(current) => self.set_active(id, !current),
            None => false,
        }
    }

    /// Change risk level; position/stop/take-profit/threshold reset to the new
    /// level's presets, timeframe and minimum capital are kept
    pub fn set_risk_level(&mut self, id: &str, risk_level: RiskLevel) -> bool {
        match self.get_mut(id) {
            Some(record) => {
                let mut parameters = risk_level.default_parameters();
                parameters.timeframe = record.parameters.timeframe.take();
                parameters.min_capital = record.parameters.min_capital;

                record.risk_level = risk_level;
                record.parameters = parameters;
                record.updated_at = touch(record.created_at);
                true
            }
            None => false,
        }
    }

    pub fn view(&self, query: &FilterQuery) -> Vec<StrategyRecord> {
        filter_and_sort(&self.records, query)
    }

    pub fn summary(&self, config: &PortfolioConfig) -> PortfolioSummary {
        summarize_with(&self.records, config)
    }
}

fn validate(name: &str, target_assets: &[String]) -> Result<(), StoreError> {
    if name.trim().is_empty() {
        return Err(StoreError::EmptyName);
    }
    if target_assets.is_empty() {
        return Err(StoreError::NoTargetAssets(name.to_string()));
    }
    Ok(())
}

/// Update timestamp that never precedes creation
fn touch(created_at: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(created_at)
}
