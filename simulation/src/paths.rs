//! Network path table
//!
//! One [`NetworkPath`] per ordered pair of distinct nodes, built once from
//! the roster and never resized. Iteration is in `(from, to)` order, which
//! fixes the order of clog draws each tick.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ticknet_core::NodeId;

/// Reachability of the directed path `from -> to`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkPath {
    pub from: NodeId,
    pub to: NodeId,
    /// The path is clogged while the current tick is below this value
    pub unreachable_until_tick: u64,
}

impl NetworkPath {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self {
            from,
            to,
            unreachable_until_tick: 0,
        }
    }

    /// Whether messages on this path are held back at tick `now`
    pub fn is_clogged(&self, now: u64) -> bool {
        self.unreachable_until_tick > now
    }
}

/// All directed paths between the nodes of a roster
#[derive(Debug, Clone)]
pub struct PathTable {
    paths: BTreeMap<(NodeId, NodeId), NetworkPath>,
}

impl PathTable {
    /// Build a path for every ordered pair of distinct nodes, all reachable
    pub fn new(roster: &[NodeId]) -> Self {
        let mut paths = BTreeMap::new();
        for &from in roster {
            for &to in roster {
                if from == to {
                    continue;
                }
                paths.insert((from, to), NetworkPath::new(from, to));
            }
        }
        Self { paths }
    }

    /// Whether a path exists for the ordered pair
    pub fn contains(&self, from: NodeId, to: NodeId) -> bool {
        self.paths.contains_key(&(from, to))
    }

    /// Look up the path `from -> to`
    ///
    /// # Panics
    ///
    /// Panics if the pair is not part of the roster (or `from == to`).
    pub fn path_state(&self, from: NodeId, to: NodeId) -> &NetworkPath {
        match self.paths.get(&(from, to)) {
            Some(path) => path,
            None => panic!("no network path from node {} to node {}", from, to),
        }
    }

    /// Mutable lookup of the path `from -> to`
    ///
    /// # Panics
    ///
    /// Panics if the pair is not part of the roster (or `from == to`).
    pub fn path_state_mut(&mut self, from: NodeId, to: NodeId) -> &mut NetworkPath {
        match self.paths.get_mut(&(from, to)) {
            Some(path) => path,
            None => panic!("no network path from node {} to node {}", from, to),
        }
    }

    pub fn is_clogged(&self, from: NodeId, to: NodeId, now: u64) -> bool {
        self.path_state(from, to).is_clogged(now)
    }

    /// Make `from -> to` unreachable until `until_tick`, replacing any active clog
    pub fn clog(&mut self, from: NodeId, to: NodeId, until_tick: u64) {
        self.path_state_mut(from, to).unreachable_until_tick = until_tick;
    }

    pub fn iter(&self) -> impl Iterator<Item = &NetworkPath> {
        self.paths.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut NetworkPath> {
        self.paths.values_mut()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}
