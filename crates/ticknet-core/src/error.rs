//! Error types for ticknet
//!
//! Only construction-time problems are represented here. Simulated faults
//! (drops, clogs, replays) are modeled outcomes, and broken engine
//! invariants panic instead of returning an error.

use thiserror::Error;

use crate::identity::NodeId;

/// Top-level error type for ticknet
#[derive(Debug, Error)]
pub enum TicknetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Roster error: {0}")]
    Roster(#[from] RosterError),
}

/// Errors in a network configuration record
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be within [0, 1], got {value}")]
    ProbabilityOutOfRange { field: &'static str, value: f64 },
}

/// Errors in the node roster
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RosterError {
    #[error("Roster must contain at least one node")]
    Empty,

    #[error("Node {0} appears more than once in the roster")]
    DuplicateNode(NodeId),

    #[error("Node {0} is not part of the roster")]
    UnknownNode(NodeId),

    #[error("Node {0} cannot send a message to itself")]
    SelfAddressed(NodeId),
}

/// Result type alias for ticknet operations
pub type TicknetResult<T> = Result<T, TicknetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::ProbabilityOutOfRange {
            field: "drop_message_probability",
            value: 1.5,
        };
        let msg = format!("{}", err);
        assert!(msg.contains("drop_message_probability"));
        assert!(msg.contains("1.5"));
    }

    #[test]
    fn test_roster_error_display() {
        assert!(format!("{}", RosterError::Empty).contains("at least one"));
        assert!(format!("{}", RosterError::DuplicateNode(NodeId(3))).contains('3'));
        assert!(format!("{}", RosterError::UnknownNode(NodeId(-2))).contains("-2"));
        assert!(format!("{}", RosterError::SelfAddressed(NodeId(4))).contains("itself"));
    }

    #[test]
    fn test_error_conversions() {
        let err: TicknetError = RosterError::Empty.into();
        assert!(matches!(err, TicknetError::Roster(_)));

        let err: TicknetError = ConfigError::ProbabilityOutOfRange {
            field: "path_clog_probability",
            value: -0.1,
        }
        .into();
        assert!(matches!(err, TicknetError::Config(_)));
        assert!(format!("{}", err).contains("Configuration error"));
    }
}
