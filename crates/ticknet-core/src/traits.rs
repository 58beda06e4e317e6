//! Collaborator traits for node protocol logic
//!
//! A node driver hands inbound messages to a [`Protocol`] and sends whatever
//! the protocol queues through its [`NodeContext`]. The protocol only ever
//! sees its own identity, the clock, and its outbox.

use crate::identity::NodeId;
use crate::mailbox::Outbox;
use crate::message::Message;

/// Pluggable node logic under test
pub trait Protocol {
    /// Handle a message delivered from `sender`
    ///
    /// Any number of replies may be queued through `ctx`. The node driver
    /// sends at most one queued message per tick, oldest first.
    fn on_message(&mut self, ctx: &mut NodeContext<'_>, sender: NodeId, message: Message);
}

/// The view of the simulation a [`Protocol`] gets while handling a message
pub struct NodeContext<'a> {
    id: NodeId,
    now: u64,
    outbox: &'a mut Outbox,
}

impl<'a> NodeContext<'a> {
    pub fn new(id: NodeId, now: u64, outbox: &'a mut Outbox) -> Self {
        Self { id, now, outbox }
    }

    /// Identity of the node running the protocol
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Current simulation tick
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Queue a message for sending on a later driver step
    pub fn send(&mut self, message: Message) {
        self.outbox.push(message);
    }
}

impl<P: Protocol + ?Sized> Protocol for Box<P> {
    fn on_message(&mut self, ctx: &mut NodeContext<'_>, sender: NodeId, message: Message) {
        (**self).on_message(ctx, sender, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Echo;

    impl Protocol for Echo {
        fn on_message(&mut self, ctx: &mut NodeContext<'_>, sender: NodeId, message: Message) {
            ctx.send(Message::new(sender, message.kind(), message.payload().clone()));
        }
    }

    #[test]
    fn test_context_queues_into_outbox() {
        let mut outbox = Outbox::new();
        let mut ctx = NodeContext::new(NodeId(0), 5, &mut outbox);
        assert_eq!(ctx.id(), NodeId(0));
        assert_eq!(ctx.now(), 5);

        Echo.on_message(&mut ctx, NodeId(1), Message::ping(NodeId(0)));
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox.pop().unwrap().recipient(), NodeId(1));
    }

    #[test]
    fn test_boxed_protocol() {
        let mut outbox = Outbox::new();
        let mut boxed: Box<dyn Protocol> = Box::new(Echo);
        let mut ctx = NodeContext::new(NodeId(2), 0, &mut outbox);
        boxed.on_message(&mut ctx, NodeId(3), Message::pong(NodeId(2)));
        assert_eq!(outbox.len(), 1);
    }
}
