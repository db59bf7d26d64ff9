pub mod summary;

pub use summary::{summarize, summarize_with, PortfolioConfig, PortfolioSummary};
