use crate::models::{PartialSignal, SignalInput};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tier cut-offs for the ensemble confidence
///
/// The defaults are the dashboard's historical constants, not calibrated values.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EnsembleConfig {
    pub strong_threshold: f64,
    pub moderate_threshold: f64,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            strong_threshold: 0.6,
            moderate_threshold: 0.4,
        }
    }
}

impl EnsembleConfig {
    /// Returns defaults unless `0 <= moderate <= strong <= 1`
    pub fn validated(self) -> Self {
        let ordered = 0.0 <= self.moderate_threshold
            && self.moderate_threshold <= self.strong_threshold
            && self.strong_threshold <= 1.0;

        if ordered {
            self
        } else {
            tracing::warn!(
                "Ignoring ensemble thresholds strong={} moderate={}, using defaults",
                self.strong_threshold,
                self.moderate_threshold
            );
            Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SignalTier {
    #[serde(rename = "Strong Signal")]
    Strong,
    #[serde(rename = "Moderate Signal")]
    Moderate,
    #[serde(rename = "Weak Signal")]
    Weak,
}

impl SignalTier {
    /// Thresholds are exclusive: exactly `strong_threshold` is still Moderate
    pub fn from_confidence(confidence: f64, config: &EnsembleConfig) -> Self {
        if confidence > config.strong_threshold {
            SignalTier::Strong
        } else if confidence > config.moderate_threshold {
            SignalTier::Moderate
        } else {
            SignalTier::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalTier::Strong => "Strong Signal",
            SignalTier::Moderate => "Moderate Signal",
            SignalTier::Weak => "Weak Signal",
        }
    }
}

impl fmt::Display for SignalTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Direction implied by the sentiment sign
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SignalDirection {
    Bullish,
    Bearish,
    Neutral,
}

impl SignalDirection {
    fn from_sentiment(sentiment: f64) -> Self {
        if sentiment > 0.0 {
            SignalDirection::Bullish
        } else if sentiment < 0.0 {
            SignalDirection::Bearish
        } else {
            SignalDirection::Neutral
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct EnsembleResult {
    pub ensemble_confidence: f64, // [0,1]
    pub tier: SignalTier,
    pub direction: SignalDirection,
}

/// Combine technical, sentiment and strategy confidence into one score
///
/// Each component is clamped into [0,1] before averaging (sentiment by
/// magnitude), so the result stays in range whatever the collaborators send.
///
/// # Example
/// ```
/// use stratlab::ensemble::{score_ensemble, EnsembleConfig, SignalTier};
/// use stratlab::models::SignalInput;
///
/// let result = score_ensemble(&SignalInput::new(1.0, 1.0, 1.0), &EnsembleConfig::default());
/// assert_eq!(result.ensemble_confidence, 1.0);
/// assert_eq!(result.tier, SignalTier::Strong);
/// ```
pub fn score_ensemble(signal: &SignalInput, config: &EnsembleConfig) -> EnsembleResult {
    let technical = unit(signal.technical_confidence);
    let sentiment = unit(signal.sentiment_score.abs());
    let strategy = unit(signal.strategy_confidence);

    let ensemble_confidence = ((technical + sentiment + strategy) / 3.0).clamp(0.0, 1.0);

    EnsembleResult {
        ensemble_confidence,
        tier: SignalTier::from_confidence(ensemble_confidence, config),
        direction: SignalDirection::from_sentiment(signal.sentiment_score),
    }
}

/// Score a signal whose components may be missing (missing = 0)
pub fn score_partial(signal: &PartialSignal, config: &EnsembleConfig) -> EnsembleResult {
    score_ensemble(&signal.resolve(), config)
}

fn unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_signal_is_strong() {
        let result = score_ensemble(&SignalInput::new(1.0, 1.0, 1.0), &EnsembleConfig::default());
        assert_eq!(result.ensemble_confidence, 1.0);
        assert_eq!(result.tier, SignalTier::Strong);
        assert_eq!(result.direction, SignalDirection::Bullish);
    }

    #[test]
    fn test_zero_signal_is_weak() {
        let result = score_ensemble(&SignalInput::default(), &EnsembleConfig::default());
        assert_eq!(result.ensemble_confidence, 0.0);
        assert_eq!(result.tier, SignalTier::Weak);
        assert_eq!(result.direction, SignalDirection::Neutral);
    }

    #[test]
    fn test_negative_sentiment_counts_by_magnitude() {
        let bearish = score_ensemble(&SignalInput::new(0.6, -0.9, 0.6), &EnsembleConfig::default());
        let bullish = score_ensemble(&SignalInput::new(0.6, 0.9, 0.6), &EnsembleConfig::default());

        assert!((bearish.ensemble_confidence - 0.7).abs() < 1e-9);
        assert_eq!(bearish.ensemble_confidence, bullish.ensemble_confidence);
        assert_eq!(bearish.direction, SignalDirection::Bearish);
    }

    #[test]
    fn test_out_of_range_inputs_are_clamped() {
        let config = EnsembleConfig::default();

        let high = score_ensemble(&SignalInput::new(5.0, 0.0, 0.0), &config);
        assert!((high.ensemble_confidence - 1.0 / 3.0).abs() < 1e-9);

        let wild = score_ensemble(&SignalInput::new(-3.0, 42.0, f64::INFINITY), &config);
        assert!((0.0..=1.0).contains(&wild.ensemble_confidence));
        assert!((wild.ensemble_confidence - 2.0 / 3.0).abs() < 1e-9);

        let nan = score_ensemble(&SignalInput::new(f64::NAN, f64::NAN, 0.3), &config);
        assert!((nan.ensemble_confidence - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_tier_boundaries_are_exclusive() {
        let config = EnsembleConfig::default();

        assert_eq!(SignalTier::from_confidence(0.6, &config), SignalTier::Moderate);
        assert_eq!(SignalTier::from_confidence(0.61, &config), SignalTier::Strong);
        assert_eq!(SignalTier::from_confidence(0.4, &config), SignalTier::Weak);
        assert_eq!(SignalTier::from_confidence(0.41, &config), SignalTier::Moderate);
    }

    #[test]
    fn test_missing_components_score_as_zero() {
        let partial = PartialSignal {
            technical_confidence: Some(0.9),
            sentiment_score: None,
            strategy_confidence: Some(0.6),
        };

        let result = score_partial(&partial, &EnsembleConfig::default());
        assert!((result.ensemble_confidence - 0.5).abs() < 1e-9);
        assert_eq!(result.tier, SignalTier::Moderate);
    }

    #[test]
    fn test_custom_thresholds() {
        let config = EnsembleConfig {
            strong_threshold: 0.8,
            moderate_threshold: 0.2,
        };

        let result = score_ensemble(&SignalInput::new(0.7, 0.7, 0.7), &config);
        assert_eq!(result.tier, SignalTier::Moderate);
    }

    #[test]
    fn test_validated_rejects_inverted_thresholds() {
        let inverted = EnsembleConfig {
            strong_threshold: 0.3,
            moderate_threshold: 0.5,
        };
        assert_eq!(inverted.validated(), EnsembleConfig::default());

        let fine = EnsembleConfig {
            strong_threshold: 0.7,
            moderate_threshold: 0.5,
        };
        assert_eq!(fine.validated(), fine);
    }

    #[test]
    fn test_tier_serializes_as_label() {
        let json = serde_json::to_string(&SignalTier::Moderate).unwrap();
        assert_eq!(json, "\"Moderate Signal\"");
    }
}
