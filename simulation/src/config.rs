//! Network fault-model configuration

use serde::{Deserialize, Serialize};
use ticknet_core::ConfigError;

/// Configuration for the simulated network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Probability, per path and per tick, that a path becomes clogged
    pub path_clog_probability: f64,
    /// Probability that a delivered message is queued to be delivered again
    pub message_replay_probability: f64,
    /// Probability that an eligible message is discarded instead of delivered
    pub drop_message_probability: f64,
    /// Upper bound (inclusive) on the length of a clog, in ticks
    pub max_clog_ticks: u64,
    /// Upper bound (inclusive) on the delay added to a send, in ticks
    pub max_delay_ticks: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            path_clog_probability: 0.05,
            message_replay_probability: 0.05,
            drop_message_probability: 0.05,
            max_clog_ticks: 100,
            max_delay_ticks: 100,
        }
    }
}

impl NetworkConfig {
    /// A network without faults or delays
    pub fn reliable() -> Self {
        Self {
            path_clog_probability: 0.0,
            message_replay_probability: 0.0,
            drop_message_probability: 0.0,
            max_clog_ticks: 0,
            max_delay_ticks: 0,
        }
    }

    pub fn with_path_clog_probability(mut self, p: f64) -> Self {
        self.path_clog_probability = p;
        self
    }

    pub fn with_message_replay_probability(mut self, p: f64) -> Self {
        self.message_replay_probability = p;
        self
    }

    pub fn with_drop_message_probability(mut self, p: f64) -> Self {
        self.drop_message_probability = p;
        self
    }

    pub fn with_max_clog_ticks(mut self, ticks: u64) -> Self {
        self.max_clog_ticks = ticks;
        self
    }

    pub fn with_max_delay_ticks(mut self, ticks: u64) -> Self {
        self.max_delay_ticks = ticks;
        self
    }

    /// Reject probabilities outside `[0, 1]`, including NaN
    pub fn validate(&self) -> Result<(), ConfigError> {
        let probabilities = [
            ("path_clog_probability", self.path_clog_probability),
            ("message_replay_probability", self.message_replay_probability),
            ("drop_message_probability", self.drop_message_probability),
        ];
        for (field, value) in probabilities {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ProbabilityOutOfRange { field, value });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(NetworkConfig::default().validate().is_ok());
        assert!(NetworkConfig::reliable().validate().is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let err = NetworkConfig::default()
            .with_drop_message_probability(1.01)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::ProbabilityOutOfRange {
                field: "drop_message_probability",
                value: 1.01
            }
        );

        assert!(
            NetworkConfig::default()
                .with_path_clog_probability(-0.5)
                .validate()
                .is_err()
        );
    }

    #[test]
    fn test_nan_rejected() {
        let result = NetworkConfig::default()
            .with_message_replay_probability(f64::NAN)
            .validate();
        assert!(matches!(
            result,
            Err(ConfigError::ProbabilityOutOfRange {
                field: "message_replay_probability",
                ..
            })
        ));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let config = NetworkConfig::reliable()
            .with_drop_message_probability(1.0)
            .with_path_clog_probability(0.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: NetworkConfig =
            serde_json::from_str(r#"{ "drop_message_probability": 0.5, "max_delay_ticks": 3 }"#)
                .unwrap();
        assert_eq!(config.drop_message_probability, 0.5);
        assert_eq!(config.max_delay_ticks, 3);
        assert_eq!(config.max_clog_ticks, 100);
    }
}
