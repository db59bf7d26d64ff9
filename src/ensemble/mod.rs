// Ensemble scoring of per-asset AI signals
pub mod scorer;

pub use scorer::{
    score_ensemble, score_partial, EnsembleConfig, EnsembleResult, SignalDirection, SignalTier,
};

use crate::lab::SignalProvider;
use crate::models::PartialSignal;
use serde::Serialize;

/// Ensemble annotation for one asset
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AssetSignal {
    pub symbol: String,
    pub signal: PartialSignal,
    pub result: EnsembleResult,
    pub degraded: bool, // At least one component was missing or non-finite
}

/// Ask the provider about each symbol and score the answers
///
/// A provider failure never aborts the batch: that asset is scored as an
/// all-missing signal and flagged as degraded.
pub fn score_assets<P: SignalProvider + ?Sized>(
    provider: &mut P,
    symbols: &[String],
    config: &EnsembleConfig,
) -> Vec<AssetSignal> {
    symbols
        .iter()
        .map(|symbol| {
            let signal = match provider.analyze(symbol) {
                Ok(signal) => signal,
                Err(e) => {
                    tracing::warn!(
                        "{} failed to analyze {}: {}, scoring as no signal",
                        provider.name(),
                        symbol,
                        e
                    );
                    PartialSignal::default()
                }
            };

            let usable = |v: Option<f64>| v.is_some_and(f64::is_finite);
            let degraded = !usable(signal.technical_confidence)
                || !usable(signal.sentiment_score)
                || !usable(signal.strategy_confidence);
            let result = score_partial(&signal, config);

            tracing::debug!(
                "{}: {:.3} ({}, {:?})",
                symbol,
                result.ensemble_confidence,
                result.tier,
                result.direction
            );

            AssetSignal {
                symbol: symbol.clone(),
                signal,
                result,
                degraded,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lab::MockLab;
    use crate::models::SignalInput;
    use crate::Result;

    /// Provider that only knows BTC
    struct BtcOnly;

    impl SignalProvider for BtcOnly {
        fn analyze(&mut self, symbol: &str) -> Result<PartialSignal> {
            if symbol == "BTC" {
                Ok(SignalInput::new(0.9, 0.8, 0.7).into())
            } else {
                Err(format!("no model for {}", symbol).into())
            }
        }

        fn name(&self) -> &str {
            "BtcOnly"
        }
    }

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_provider_error_scores_as_weak() {
        let results = score_assets(&mut BtcOnly, &symbols(&["BTC", "DOGE"]), &EnsembleConfig::default());

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].result.tier, SignalTier::Strong);
        assert!(!results[0].degraded);

        assert_eq!(results[1].symbol, "DOGE");
        assert_eq!(results[1].result.ensemble_confidence, 0.0);
        assert_eq!(results[1].result.tier, SignalTier::Weak);
        assert!(results[1].degraded);
    }

    #[test]
    fn test_dropout_marks_degraded() {
        let mut lab = MockLab::new(5).with_sentiment_dropout(1.0);
        let results = score_assets(&mut lab, &symbols(&["ETH", "SOL"]), &EnsembleConfig::default());

        assert!(results.iter().all(|r| r.degraded));
        assert!(results
            .iter()
            .all(|r| (0.0..=1.0).contains(&r.result.ensemble_confidence)));
    }

    /// Provider whose sentiment model returns garbage
    struct NanSentiment;

    impl SignalProvider for NanSentiment {
        fn analyze(&mut self, symbol: &str) -> Result<PartialSignal> {
            let sentiment = if symbol == "ETH" { f64::INFINITY } else { f64::NAN };
            Ok(PartialSignal {
                technical_confidence: Some(0.9),
                sentiment_score: Some(sentiment),
                strategy_confidence: Some(0.6),
            })
        }

        fn name(&self) -> &str {
            "NanSentiment"
        }
    }

    #[test]
    fn test_non_finite_component_marks_degraded() {
        let results = score_assets(&mut NanSentiment, &symbols(&["BTC", "ETH"]), &EnsembleConfig::default());

        for r in &results {
            assert!(r.degraded);
            assert!((r.result.ensemble_confidence - 0.5).abs() < 1e-9);
            assert_eq!(r.result.tier, SignalTier::Moderate);
        }
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut lab: Box<dyn SignalProvider> = Box::new(MockLab::new(9));
        let results = score_assets(lab.as_mut(), &symbols(&["BTC"]), &EnsembleConfig::default());
        assert_eq!(results.len(), 1);
    }
}
