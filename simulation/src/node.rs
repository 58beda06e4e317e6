//! Node driver
//!
//! Bridges the engine and a node's [`Protocol`]. Per tick a driver hands at
//! most one inbound message to the protocol and sends at most one outbound
//! message, so a busy node falls behind instead of doing unbounded work.

use ticknet_core::{Envelope, Inbox, Message, NodeContext, NodeId, Outbox, Protocol};
use tracing::{debug_span, trace};

use crate::network::Network;

/// What a node did during one [`NodeDriver::tick`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeTickReport {
    /// An inbound message was handed to the protocol
    pub consumed: bool,
    /// An outbound message was passed to the network
    pub sent: bool,
}

/// A simulated node: its identity, buffers and protocol logic
#[derive(Debug)]
pub struct NodeDriver<P> {
    id: NodeId,
    protocol: P,
    inbox: Inbox,
    outbox: Outbox,
}

impl<P: Protocol> NodeDriver<P> {
    pub fn new(id: NodeId, protocol: P) -> Self {
        Self {
            id,
            protocol,
            inbox: Inbox::new(),
            outbox: Outbox::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Queue a message for sending, as an external stimulus would
    pub fn enqueue(&mut self, message: Message) {
        self.outbox.push(message);
    }

    /// Accept a message the network delivered
    pub fn receive(&mut self, envelope: Envelope) {
        self.inbox.push(envelope);
    }

    /// Run one step: consume at most one inbound, send at most one outbound
    pub fn tick(&mut self, network: &mut Network) -> NodeTickReport {
        let span = debug_span!("node", id = %self.id);
        let _enter = span.enter();

        trace!(
            to_send = self.outbox.len(),
            to_process = self.inbox.len(),
            "node tick"
        );

        let mut report = NodeTickReport::default();

        if let Some(envelope) = self.inbox.pop() {
            let mut ctx = NodeContext::new(self.id, network.now(), &mut self.outbox);
            self.protocol
                .on_message(&mut ctx, envelope.sender, envelope.message);
            report.consumed = true;
        }

        if let Some(message) = self.outbox.pop() {
            network.send(self.id, message);
            report.sent = true;
        }

        report
    }

    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    pub fn protocol_mut(&mut self) -> &mut P {
        &mut self.protocol
    }

    /// Delivered messages not yet handed to the protocol
    pub fn inbound_len(&self) -> usize {
        self.inbox.len()
    }

    /// Messages queued and not yet sent
    pub fn outbound_len(&self) -> usize {
        self.outbox.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NetworkConfig;
    use crate::protocols::{PingPong, Sink};

    fn network() -> Network {
        Network::new(NetworkConfig::reliable(), &NodeId::range(2), 42).unwrap()
    }

    #[test]
    fn test_idle_tick() {
        let mut network = network();
        let mut node = NodeDriver::new(NodeId(0), Sink::default());
        assert_eq!(node.tick(&mut network), NodeTickReport::default());
        assert_eq!(network.pending(), 0);
    }

    #[test]
    fn test_sends_one_message_per_tick() {
        let mut network = network();
        let mut node = NodeDriver::new(NodeId(0), Sink::default());
        for _ in 0..3 {
            node.enqueue(Message::ping(NodeId(1)));
        }

        let report = node.tick(&mut network);
        assert!(report.sent);
        assert!(!report.consumed);
        assert_eq!(network.pending(), 1);
        assert_eq!(node.outbound_len(), 2);

        node.tick(&mut network);
        node.tick(&mut network);
        assert_eq!(network.pending(), 3);
        assert!(!node.tick(&mut network).sent);
    }

    #[test]
    fn test_consumes_one_message_per_tick() {
        let mut network = network();
        let mut node = NodeDriver::new(NodeId(1), Sink::default());
        node.receive(Envelope::new(NodeId(0), Message::ping(NodeId(1))));
        node.receive(Envelope::new(NodeId(0), Message::pong(NodeId(1))));

        assert!(node.tick(&mut network).consumed);
        assert_eq!(node.inbound_len(), 1);
        assert_eq!(node.protocol().received().len(), 1);

        assert!(node.tick(&mut network).consumed);
        assert!(!node.tick(&mut network).consumed);
        assert_eq!(node.protocol().received().len(), 2);
    }

    #[test]
    fn test_reply_goes_out_same_tick() {
        let mut network = network();
        let mut node = NodeDriver::new(NodeId(1), PingPong::default());
        node.receive(Envelope::new(NodeId(0), Message::ping(NodeId(1))));

        let report = node.tick(&mut network);
        assert_eq!(
            report,
            NodeTickReport {
                consumed: true,
                sent: true
            }
        );
        let pending = network.next_delivery().unwrap();
        assert_eq!(pending.sender, NodeId(1));
        assert_eq!(pending.recipient(), NodeId(0));
    }

    #[test]
    fn test_queued_send_before_reply() {
        let mut network = network();
        let mut node = NodeDriver::new(NodeId(1), PingPong::default());
        node.enqueue(Message::ping(NodeId(0)));
        node.receive(Envelope::new(NodeId(0), Message::ping(NodeId(1))));

        node.tick(&mut network);
        // The earlier queued ping goes first; the pong waits for the next tick
        assert_eq!(node.outbound_len(), 1);
        assert_eq!(
            network.next_delivery().unwrap().message,
            Message::ping(NodeId(0))
        );
    }
}
