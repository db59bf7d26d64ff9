// Core modules
pub mod dashboard;
pub mod ensemble;
pub mod lab;
pub mod models;
pub mod portfolio;
pub mod ranking;
pub mod settings;
pub mod store;

// Re-export commonly used types
pub use ensemble::{score_ensemble, EnsembleConfig, EnsembleResult, SignalTier};
pub use models::*;
pub use portfolio::{summarize, PortfolioSummary};
pub use ranking::{filter_and_sort, FilterQuery, SortKey};
pub use store::StrategyStore;

// Error handling
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;
