//! Message types exchanged between simulated nodes

use std::fmt::Display;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::identity::NodeId;

/// What a message means to the protocol that sent it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MessageKind {
    /// Liveness probe, answered with [`MessageKind::Pong`]
    Ping,
    /// Answer to a [`MessageKind::Ping`]
    Pong,
    /// Protocol-defined message tag
    Application(u8),
}

impl Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MessageKind::Ping => write!(f, "ping"),
            MessageKind::Pong => write!(f, "pong"),
            MessageKind::Application(tag) => write!(f, "app:{}", tag),
        }
    }
}

/// A message addressed to a single recipient
///
/// Immutable once constructed. The payload is reference-counted, so the copy
/// kept around for a replayed delivery shares the original buffer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Message {
    recipient: NodeId,
    kind: MessageKind,
    payload: Bytes,
}

impl Message {
    /// Create a new message
    pub fn new(recipient: NodeId, kind: MessageKind, payload: impl Into<Bytes>) -> Self {
        Self {
            recipient,
            kind,
            payload: payload.into(),
        }
    }

    /// Create an empty ping addressed to `recipient`
    pub fn ping(recipient: NodeId) -> Self {
        Self::new(recipient, MessageKind::Ping, Bytes::new())
    }

    /// Create an empty pong addressed to `recipient`
    pub fn pong(recipient: NodeId) -> Self {
        Self::new(recipient, MessageKind::Pong, Bytes::new())
    }

    pub fn recipient(&self) -> NodeId {
        self.recipient
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn payload(&self) -> &Bytes {
        &self.payload
    }
}

/// A delivered message together with the node that sent it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub sender: NodeId,
    pub message: Message,
}

impl Envelope {
    pub fn new(sender: NodeId, message: Message) -> Self {
        Self { sender, message }
    }
}
