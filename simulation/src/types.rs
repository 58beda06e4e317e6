//! Core types for the ticknet engine
//!
//! A [`ScheduledDelivery`] is a message in flight; a [`NetworkEvent`] is one
//! line of the append-only record of what the engine did with it.

use serde::{Deserialize, Serialize};
use ticknet_core::{Message, NodeId};

/// A message waiting in the network for its eligible tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledDelivery {
    /// First tick at which the message may be delivered
    pub eligible_tick: u64,
    /// Node that handed the message to the network
    pub sender: NodeId,
    /// The message itself; its recipient selects the network path
    pub message: Message,
    /// Insertion counter, unique per network, kept across replays
    pub sequence: u64,
}

impl ScheduledDelivery {
    pub fn recipient(&self) -> NodeId {
        self.message.recipient()
    }
}

/// Events that occur in the network simulation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NetworkEvent {
    /// A node handed a message to the network
    Scheduled {
        tick: u64,
        sequence: u64,
        from: NodeId,
        to: NodeId,
        eligible_tick: u64,
    },
    /// A path became unreachable
    Clogged {
        tick: u64,
        from: NodeId,
        to: NodeId,
        until_tick: u64,
    },
    /// A message reached its recipient's inbound buffer
    Delivered {
        tick: u64,
        sequence: u64,
        from: NodeId,
        to: NodeId,
        message: Message,
    },
    /// A message was discarded for good
    Dropped {
        tick: u64,
        sequence: u64,
        from: NodeId,
        to: NodeId,
    },
    /// A delivered message was put back to be delivered again
    Replayed {
        tick: u64,
        sequence: u64,
        from: NodeId,
        to: NodeId,
    },
}

impl NetworkEvent {
    /// The tick at which the event happened
    pub fn tick(&self) -> u64 {
        match self {
            NetworkEvent::Scheduled { tick, .. }
            | NetworkEvent::Clogged { tick, .. }
            | NetworkEvent::Delivered { tick, .. }
            | NetworkEvent::Dropped { tick, .. }
            | NetworkEvent::Replayed { tick, .. } => *tick,
        }
    }
}
