//! Node identity

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Identity of a simulated participant
///
/// A small signed integer, unique per node and stable for the lifetime of a
/// simulation. The derived ordering is the fixed order in which the harness
/// ticks nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub i16);

impl NodeId {
    /// Generate the ids `0..count`
    pub fn range(count: i16) -> Vec<Self> {
        (0..count).map(Self).collect()
    }

    /// Get the underlying integer
    pub fn as_i16(&self) -> i16 {
        self.0
    }
}

impl From<i16> for NodeId {
    fn from(id: i16) -> Self {
        Self(id)
    }
}

impl Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_id_range() {
        let ids = NodeId::range(3);
        assert_eq!(ids, vec![NodeId(0), NodeId(1), NodeId(2)]);
        assert!(NodeId::range(0).is_empty());
    }

    #[test]
    fn test_node_id_ordering() {
        assert!(NodeId(-1) < NodeId(0));
        assert!(NodeId(0) < NodeId(7));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(12).to_string(), "12");
        assert_eq!(NodeId::from(-4).to_string(), "-4");
    }
}
