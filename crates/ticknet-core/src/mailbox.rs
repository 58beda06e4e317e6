//! Per-node FIFO message buffers

use std::collections::VecDeque;

use crate::message::{Envelope, Message};

/// Messages delivered to a node and not yet handed to its protocol
#[derive(Debug, Clone, Default)]
pub struct Inbox {
    queue: VecDeque<Envelope>,
}

impl Inbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a delivered message
    pub fn push(&mut self, envelope: Envelope) {
        self.queue.push_back(envelope);
    }

    /// Remove the oldest delivered message
    pub fn pop(&mut self) -> Option<Envelope> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

/// Messages a node's protocol wants sent, oldest first
#[derive(Debug, Clone, Default)]
pub struct Outbox {
    queue: VecDeque<Message>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a message for sending
    pub fn push(&mut self, message: Message) {
        self.queue.push_back(message);
    }

    /// Remove the oldest queued message
    pub fn pop(&mut self) -> Option<Message> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::NodeId;

    #[test]
    fn test_inbox_is_fifo() {
        let mut inbox = Inbox::new();
        inbox.push(Envelope::new(NodeId(1), Message::ping(NodeId(0))));
        inbox.push(Envelope::new(NodeId(2), Message::ping(NodeId(0))));
        assert_eq!(inbox.len(), 2);

        assert_eq!(inbox.pop().unwrap().sender, NodeId(1));
        assert_eq!(inbox.pop().unwrap().sender, NodeId(2));
        assert!(inbox.pop().is_none());
        assert!(inbox.is_empty());
    }

    #[test]
    fn test_outbox_is_fifo() {
        let mut outbox = Outbox::new();
        outbox.push(Message::ping(NodeId(3)));
        outbox.push(Message::pong(NodeId(4)));

        assert_eq!(outbox.pop().unwrap().recipient(), NodeId(3));
        assert_eq!(outbox.pop().unwrap().recipient(), NodeId(4));
        assert!(outbox.is_empty());
    }
}
