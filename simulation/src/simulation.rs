//! Simulation harness
//!
//! Owns one [`Network`] and the node drivers of its roster, and runs them in
//! the fixed order the engine relies on: every step is `Network::tick`
//! followed by each node's tick in ascending [`NodeId`] order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ticknet_core::{Envelope, Message, NodeId, Protocol, RosterError, TicknetResult};
use tracing::info;

use crate::config::NetworkConfig;
use crate::network::{DeliverySink, Network, NetworkStats, TickReport};
use crate::node::NodeDriver;

impl<P: Protocol> DeliverySink for BTreeMap<NodeId, NodeDriver<P>> {
    fn deliver(&mut self, sender: NodeId, message: Message) {
        let recipient = message.recipient();
        match self.get_mut(&recipient) {
            Some(node) => node.receive(Envelope::new(sender, message)),
            None => panic!("delivery to node {} which has no driver", recipient),
        }
    }
}

/// What happened during one [`Simulation::step`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub network: TickReport,
    /// Nodes that handed an inbound message to their protocol
    pub consumed: u64,
    /// Nodes that passed an outbound message to the network
    pub sent: u64,
}

/// End-of-run summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSummary {
    pub seed: u64,
    pub ticks: u64,
    pub nodes: usize,
    pub pending: usize,
    pub stats: NetworkStats,
    /// Hex blake3 digest of the event log
    pub fingerprint: String,
}

/// The simulation state
#[derive(Debug)]
pub struct Simulation<P> {
    network: Network,
    nodes: BTreeMap<NodeId, NodeDriver<P>>,
}

impl<P: Protocol> Simulation<P> {
    /// Create a simulation hosting the given nodes
    pub fn new(
        config: NetworkConfig,
        seed: u64,
        nodes: impl IntoIterator<Item = (NodeId, P)>,
    ) -> TicknetResult<Self> {
        let nodes: Vec<(NodeId, P)> = nodes.into_iter().collect();
        let roster: Vec<NodeId> = nodes.iter().map(|(id, _)| *id).collect();
        let network = Network::new(config, &roster, seed)?;

        let nodes = nodes
            .into_iter()
            .map(|(id, protocol)| (id, NodeDriver::new(id, protocol)))
            .collect();

        info!(nodes = roster.len(), seed, "simulation initialized at tick 0");
        Ok(Self { network, nodes })
    }

    /// Create `count` nodes numbered from 0, each running `P::default()`
    pub fn uniform(config: NetworkConfig, seed: u64, count: i16) -> TicknetResult<Self>
    where
        P: Default,
    {
        Self::new(
            config,
            seed,
            NodeId::range(count).into_iter().map(|id| (id, P::default())),
        )
    }

    /// Run a single simulation step
    pub fn step(&mut self) -> StepReport {
        let network = self.network.tick(&mut self.nodes);

        let mut report = StepReport {
            network,
            ..Default::default()
        };
        for node in self.nodes.values_mut() {
            let node_report = node.tick(&mut self.network);
            report.consumed += u64::from(node_report.consumed);
            report.sent += u64::from(node_report.sent);
        }
        report
    }

    /// Run for a specific number of ticks
    pub fn run_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.step();
        }
        info!(tick = self.network.now(), "simulation paused");
    }

    /// Queue `message` on `node`'s outbound buffer
    ///
    /// Both the node and the message's recipient must be in the roster, and
    /// they must differ.
    pub fn inject(&mut self, node: NodeId, message: Message) -> Result<(), RosterError> {
        let recipient = message.recipient();
        if !self.nodes.contains_key(&recipient) {
            return Err(RosterError::UnknownNode(recipient));
        }
        if recipient == node {
            return Err(RosterError::SelfAddressed(node));
        }
        let driver = self
            .nodes
            .get_mut(&node)
            .ok_or(RosterError::UnknownNode(node))?;
        driver.enqueue(message);
        Ok(())
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeDriver<P>> {
        self.nodes.get(&id)
    }

    /// All node drivers in ascending id order
    pub fn nodes(&self) -> impl Iterator<Item = &NodeDriver<P>> {
        self.nodes.values()
    }

    pub fn network(&self) -> &Network {
        &self.network
    }

    /// Current tick
    pub fn now(&self) -> u64 {
        self.network.now()
    }

    /// Summarize the run so far
    pub fn summary(&self) -> Result<SimSummary, postcard::Error> {
        Ok(SimSummary {
            seed: self.network.seed(),
            ticks: self.network.now(),
            nodes: self.nodes.len(),
            pending: self.network.pending(),
            stats: self.network.stats().clone(),
            fingerprint: self.network.fingerprint()?.to_hex().to_string(),
        })
    }

    /// One-line description of the current state
    pub fn state_summary(&self) -> String {
        let stats = self.network.stats();
        format!(
            "tick {}: {} in flight, {} sent, {} delivered, {} dropped, {} replayed",
            self.network.now(),
            self.network.pending(),
            stats.messages_sent,
            stats.messages_delivered,
            stats.messages_dropped,
            stats.messages_replayed,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocols::{PingPong, Sink};

    #[test]
    fn test_ping_pong_round_trip_on_reliable_network() {
        let mut sim: Simulation<PingPong> =
            Simulation::uniform(NetworkConfig::reliable(), 1, 2).unwrap();
        sim.inject(NodeId(0), Message::ping(NodeId(1))).unwrap();

        // tick 1: node 0 sends the ping (eligible at 1)
        sim.step();
        // tick 2: delivered to node 1, which pongs in the same step
        let report = sim.step();
        assert_eq!(report.network.delivered, 1);
        assert_eq!(report.consumed, 1);
        assert_eq!(report.sent, 1);
        // tick 3: pong delivered and consumed by node 0
        sim.step();

        let node0 = sim.node(NodeId(0)).unwrap();
        let node1 = sim.node(NodeId(1)).unwrap();
        assert_eq!(node1.protocol().pings_answered(), 1);
        assert_eq!(node0.protocol().pongs_received(), 1);
        assert_eq!(sim.network().pending(), 0);
    }

    #[test]
    fn test_inject_rejects_bad_addresses() {
        let mut sim: Simulation<Sink> =
            Simulation::uniform(NetworkConfig::reliable(), 1, 2).unwrap();
        assert_eq!(
            sim.inject(NodeId(7), Message::ping(NodeId(1))),
            Err(RosterError::UnknownNode(NodeId(7)))
        );
        assert_eq!(
            sim.inject(NodeId(0), Message::ping(NodeId(7))),
            Err(RosterError::UnknownNode(NodeId(7)))
        );
        assert_eq!(
            sim.inject(NodeId(1), Message::ping(NodeId(1))),
            Err(RosterError::SelfAddressed(NodeId(1)))
        );
        assert_eq!(sim.node(NodeId(0)).unwrap().outbound_len(), 0);
    }

    #[test]
    fn test_duplicate_nodes_rejected() {
        let result = Simulation::new(
            NetworkConfig::default(),
            0,
            vec![(NodeId(1), Sink::default()), (NodeId(1), Sink::default())],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_reports_run() {
        let mut sim: Simulation<PingPong> =
            Simulation::uniform(NetworkConfig::default(), 99, 3).unwrap();
        sim.inject(NodeId(0), Message::ping(NodeId(1))).unwrap();
        sim.run_ticks(10);

        let summary = sim.summary().unwrap();
        assert_eq!(summary.seed, 99);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.nodes, 3);
        assert_eq!(summary.stats.messages_sent, sim.network().stats().messages_sent);
        assert_eq!(summary.fingerprint.len(), 64);
        assert!(sim.state_summary().starts_with("tick 10:"));
    }

    #[test]
    #[should_panic(expected = "has no driver")]
    fn test_delivery_to_missing_driver_panics() {
        let mut nodes: BTreeMap<NodeId, NodeDriver<Sink>> = BTreeMap::new();
        nodes.deliver(NodeId(0), Message::ping(NodeId(3)));
    }
}
