//! Built-in node protocols

use ticknet_core::{Envelope, Message, MessageKind, NodeContext, NodeId, Protocol};
use tracing::{debug, info};

/// Answers every ping with a pong and counts the pongs it gets back
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PingPong {
    pings_answered: u64,
    pongs_received: u64,
}

impl PingPong {
    pub fn pings_answered(&self) -> u64 {
        self.pings_answered
    }

    pub fn pongs_received(&self) -> u64 {
        self.pongs_received
    }
}

impl Protocol for PingPong {
    fn on_message(&mut self, ctx: &mut NodeContext<'_>, sender: NodeId, message: Message) {
        match message.kind() {
            MessageKind::Ping => {
                self.pings_answered += 1;
                ctx.send(Message::pong(sender));
            }
            MessageKind::Pong => {
                self.pongs_received += 1;
                info!(node = %ctx.id(), from = %sender, tick = ctx.now(), "received pong");
            }
            MessageKind::Application(tag) => {
                debug!(node = %ctx.id(), from = %sender, tag, "ignoring application message");
            }
        }
    }
}

/// A message a [`Sink`] was handed, with the tick it was processed at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Received {
    pub tick: u64,
    pub envelope: Envelope,
}

/// Records everything it is handed and never replies
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sink {
    received: Vec<Received>,
}

impl Sink {
    pub fn received(&self) -> &[Received] {
        &self.received
    }
}

impl Protocol for Sink {
    fn on_message(&mut self, ctx: &mut NodeContext<'_>, sender: NodeId, message: Message) {
        self.received.push(Received {
            tick: ctx.now(),
            envelope: Envelope::new(sender, message),
        });
    }
}
