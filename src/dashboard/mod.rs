use crate::ensemble::{score_assets, AssetSignal};
use crate::lab::{BacktestProvider, GenerationRequest, SignalProvider, StrategyGenerator};
use crate::models::StrategyRecord;
use crate::portfolio::PortfolioSummary;
use crate::ranking::FilterQuery;
use crate::settings::Settings;
use crate::store::StrategyStore;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Everything the presentation layer needs after one refresh
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub cycle: u64,
    pub generated_at: DateTime<Utc>,
    pub view: Vec<StrategyRecord>,
    pub signals: Vec<AssetSignal>,
    pub summary: PortfolioSummary,
}

impl DashboardSnapshot {
    /// Highest ensemble confidence, first wins on ties
    pub fn strongest_signal(&self) -> Option<&AssetSignal> {
        self.signals.iter().fold(None::<&AssetSignal>, |best, s| match best {
            Some(b) if s.result.ensemble_confidence <= b.result.ensemble_confidence => Some(b),
            _ => Some(s),
        })
    }
}

/// Wires the store to the lab collaborators and the pure scorers
pub struct Dashboard<L> {
    store: StrategyStore,
    lab: L,
    settings: Settings,
    query: FilterQuery,
    cycle: u64,
}

impl<L> Dashboard<L>
where
    L: SignalProvider + BacktestProvider,
{
    pub fn new(store: StrategyStore, lab: L, settings: Settings) -> Self {
        Self {
            store,
            lab,
            settings,
            query: FilterQuery::default(),
            cycle: 0,
        }
    }

    pub fn with_query(mut self, query: FilterQuery) -> Self {
        self.query = query;
        self
    }

    pub fn store(&self) -> &StrategyStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut StrategyStore {
        &mut self.store
    }

    pub fn set_query(&mut self, query: FilterQuery) {
        self.query = query;
    }

    /// Run one refresh cycle
    ///
    /// Collaborator failures are logged and skipped; a cycle always produces
    /// a snapshot.
    pub fn refresh(&mut self) -> DashboardSnapshot {
        self.cycle += 1;

        if self.settings.dashboard.backtest_on_refresh {
            self.rerun_active_backtests();
        }

        let signals = score_assets(
            &mut self.lab,
            &self.settings.dashboard.watchlist,
            &self.settings.ensemble,
        );

        let snapshot = DashboardSnapshot {
            cycle: self.cycle,
            generated_at: Utc::now(),
            view: self.store.view(&self.query),
            signals,
            summary: self.store.summary(&self.settings.portfolio),
        };

        tracing::info!(
            "Cycle {}: {} strategies shown ({} active), avg return {:+.2}%",
            snapshot.cycle,
            snapshot.view.len(),
            snapshot.summary.active_count,
            snapshot.summary.average_return
        );
        if let Some(top) = snapshot.strongest_signal() {
            tracing::info!(
                "  Strongest: {} {:.2} ({})",
                top.symbol,
                top.result.ensemble_confidence,
                top.result.tier
            );
        }

        snapshot
    }

    fn rerun_active_backtests(&mut self) {
        let active: Vec<String> = self
            .store
            .records()
            .iter()
            .filter(|r| r.is_active)
            .map(|r| r.id.clone())
            .collect();

        for id in active {
            let Some(record) = self.store.get(&id) else {
                continue;
            };

            match self.lab.run_backtest(record) {
                Ok(performance) => {
                    self.store.apply_backtest(&id, performance);
                }
                Err(e) => {
                    tracing::warn!(
                        "{} backtest failed for {}: {}, keeping last result",
                        BacktestProvider::name(&self.lab),
                        id,
                        e
                    );
                }
            }
        }
    }
}

impl<L> Dashboard<L>
where
    L: SignalProvider + BacktestProvider + StrategyGenerator,
{
    /// Generate a strategy, add it to the store and backtest it right away.
    /// Returns the new id.
    pub fn generate_strategy(&mut self, request: &GenerationRequest) -> Result<String> {
        let generated = self.lab.generate_strategy(request)?;
        let id = self.store.insert_generated(generated)?.id.clone();

        if let Some(record) = self.store.get(&id) {
            match self.lab.run_backtest(record) {
                Ok(performance) => {
                    self.store.apply_backtest(&id, performance);
                }
                Err(e) => {
                    tracing::warn!("Initial backtest failed for {}: {}", id, e);
                }
            }
        }

        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lab::{builtin_strategies, MockLab};
    use crate::models::{PartialSignal, Performance, RiskLevel, SignalInput, StrategyType};

    struct FlakyLab;

    impl SignalProvider for FlakyLab {
        fn analyze(&mut self, symbol: &str) -> Result<PartialSignal> {
            if symbol == "ETH" {
                return Err("sentiment service timeout".into());
            }
            Ok(SignalInput::new(0.5, 0.5, 0.5).into())
        }

        fn name(&self) -> &str {
            "FlakyLab"
        }
    }

    impl BacktestProvider for FlakyLab {
        fn run_backtest(&mut self, _record: &StrategyRecord) -> Result<Performance> {
            Err("backtest engine offline".into())
        }

        fn name(&self) -> &str {
            "FlakyLab"
        }
    }

    fn settings(watchlist: &[&str]) -> Settings {
        let mut settings = Settings::default();
        settings.dashboard.watchlist = watchlist.iter().map(|s| s.to_string()).collect();
        settings
    }

    #[test]
    fn test_refresh_survives_collaborator_failures() {
        let store = StrategyStore::from_records(builtin_strategies(Utc::now()));
        let before = store.records().to_vec();
        let mut dashboard = Dashboard::new(store, FlakyLab, settings(&["BTC", "ETH"]));

        let snapshot = dashboard.refresh();

        assert_eq!(snapshot.cycle, 1);
        assert_eq!(snapshot.view.len(), 5);
        assert_eq!(snapshot.signals.len(), 2);
        assert!(snapshot.signals[1].degraded);
        assert_eq!(snapshot.strongest_signal().unwrap().symbol, "BTC");

        // Failed backtests keep the previous performance
        for (old, new) in before.iter().zip(dashboard.store().records()) {
            assert_eq!(old.performance, new.performance);
        }
    }

    #[test]
    fn test_refresh_updates_only_active_strategies() {
        let store = StrategyStore::from_records(builtin_strategies(Utc::now()));
        let inactive_before = store.get("gan-synthetic-explorer").unwrap().performance;
        let mut dashboard = Dashboard::new(store, MockLab::new(42), settings(&["BTC"]));

        let snapshot = dashboard.refresh();
        assert_eq!(snapshot.summary.total_count, 5);

        let inactive_after = dashboard.store().get("gan-synthetic-explorer").unwrap().performance;
        assert_eq!(inactive_before, inactive_after);
    }

    #[test]
    fn test_query_applies_to_view() {
        let store = StrategyStore::from_records(builtin_strategies(Utc::now()));
        let mut dashboard = Dashboard::new(store, FlakyLab, settings(&[]))
            .with_query(FilterQuery::new().with_risk(RiskLevel::Aggressive));

        let snapshot = dashboard.refresh();
        assert_eq!(snapshot.view.len(), 2);
        assert!(snapshot.signals.is_empty());
        assert!(snapshot.strongest_signal().is_none());
        assert_eq!(snapshot.summary.total_count, 5);
    }

    #[test]
    fn test_edits_between_cycles_show_up() {
        let store = StrategyStore::from_records(builtin_strategies(Utc::now()));
        let mut dashboard = Dashboard::new(store, FlakyLab, settings(&[]));

        let first = dashboard.refresh();
        assert_eq!(first.summary.active_count, 3);

        assert!(dashboard.store_mut().toggle_active("rl-adaptive-trader"));
        dashboard.set_query(FilterQuery::new().with_type(StrategyType::RlAdaptive));

        let second = dashboard.refresh();
        assert_eq!(second.cycle, 2);
        assert_eq!(second.summary.active_count, 4);
        assert_eq!(second.view.len(), 1);
        assert!(second.view[0].is_active);
    }

    #[test]
    fn test_generate_strategy_is_backtested() {
        let mut dashboard = Dashboard::new(StrategyStore::new(), MockLab::new(8), settings(&["BTC"]));
        let request = GenerationRequest::new(
            StrategyType::GanSynthetic,
            RiskLevel::Conservative,
            vec!["SOL".to_string()],
        );

        let id = dashboard.generate_strategy(&request).unwrap();
        let record = dashboard.store().get(&id).unwrap();

        assert!(record.performance.total_trades > 0);
        assert_eq!(record.parameters, RiskLevel::Conservative.default_parameters());
    }
}
