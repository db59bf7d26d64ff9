use crate::ensemble::EnsembleConfig;
use crate::portfolio::PortfolioConfig;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_CONFIG_PATH: &str = "config/stratlab";
pub const DEFAULT_LOG_FILTER: &str = "stratlab=info";
const ENV_PREFIX: &str = "STRATLAB";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

/// Refresh loop settings for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardSettings {
    pub refresh_interval_secs: u64,
    pub seed: u64,                // Mock lab seed
    pub watchlist: Vec<String>,
    pub sentiment_dropout: f64,   // Chance the mock sentiment service is unavailable
    pub backtest_on_refresh: bool, // Re-run backtests for active strategies each cycle
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 30,
            seed: 42,
            watchlist: ["BTC", "ETH", "SOL", "AAPL", "TSLA"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            sentiment_dropout: 0.1,
            backtest_on_refresh: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    pub ensemble: EnsembleConfig,
    pub portfolio: PortfolioConfig,
    pub dashboard: DashboardSettings,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ensemble: EnsembleConfig::default(),
            portfolio: PortfolioConfig::default(),
            dashboard: DashboardSettings::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Load layered settings
    ///
    /// 1. Built-in defaults.
    /// 2. Optional TOML file at `path` (extension optional, e.g. `config/stratlab`).
    /// 3. Environment variables such as `STRATLAB__ENSEMBLE__STRONG_THRESHOLD=0.7`
    ///    or `STRATLAB__DASHBOARD__WATCHLIST=BTC,ETH`.
    pub fn load(path: &str) -> Result<Self, SettingsError> {
        let config = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("dashboard.watchlist"),
            )
            .build()?;

        let settings: Settings = config.try_deserialize()?;
        Ok(settings.validated())
    }

    fn validated(mut self) -> Self {
        self.ensemble = self.ensemble.validated();
        if self.dashboard.refresh_interval_secs == 0 {
            tracing::warn!("refresh_interval_secs must be positive, using 30");
            self.dashboard.refresh_interval_secs = 30;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert_eq!(settings.ensemble.strong_threshold, 0.6);
        assert_eq!(settings.ensemble.moderate_threshold, 0.4);
        assert_eq!(settings.portfolio.worst_k, 2);
        assert_eq!(settings.dashboard.refresh_interval_secs, 30);
        assert_eq!(settings.dashboard.watchlist.len(), 5);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let settings = Settings::load("does/not/exist/stratlab").unwrap();
        assert_eq!(settings.portfolio, PortfolioConfig::default());
        assert_eq!(settings.ensemble, EnsembleConfig::default());
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let toml = "[ensemble]\nstrong_threshold = 0.75\n\n[dashboard]\nseed = 7\n";
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.ensemble.strong_threshold, 0.75);
        assert_eq!(settings.ensemble.moderate_threshold, 0.4);
        assert_eq!(settings.dashboard.seed, 7);
        assert_eq!(settings.dashboard.refresh_interval_secs, 30);
        assert_eq!(settings.log_filter, "stratlab=info");
    }

    #[test]
    fn test_validated_repairs_bad_values() {
        let mut settings = Settings::default();
        settings.ensemble.moderate_threshold = 0.9;
        settings.dashboard.refresh_interval_secs = 0;

        let settings = settings.validated();
        assert_eq!(settings.ensemble, EnsembleConfig::default());
        assert_eq!(settings.dashboard.refresh_interval_secs, 30);
    }
}
