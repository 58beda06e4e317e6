//! Scheduled-delivery queue with deterministic ordering.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::types::ScheduledDelivery;

/// Key for ordering deliveries in the queue.
///
/// Deliveries are ordered by:
/// 1. Eligible tick (earlier first)
/// 2. Sequence number (first scheduled first)
///
/// Sequence numbers are unique, so the order is total and pop order never
/// depends on heap internals.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd)]
pub struct DeliveryKey {
    pub eligible_tick: u64,
    pub sequence: u64,
}

impl DeliveryKey {
    pub fn of(delivery: &ScheduledDelivery) -> Self {
        Self {
            eligible_tick: delivery.eligible_tick,
            sequence: delivery.sequence,
        }
    }
}

#[derive(Debug)]
struct Entry(ScheduledDelivery);

impl Entry {
    fn key(&self) -> DeliveryKey {
        DeliveryKey::of(&self.0)
    }
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Entry {}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed so the max-heap yields the smallest key first
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-priority queue of pending deliveries
#[derive(Debug, Default)]
pub struct DeliveryQueue {
    heap: BinaryHeap<Entry>,
}

impl DeliveryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a delivery at the position given by its key
    pub fn push(&mut self, delivery: ScheduledDelivery) {
        self.heap.push(Entry(delivery));
    }

    /// Remove and return the delivery with the smallest key
    pub fn pop_min(&mut self) -> Option<ScheduledDelivery> {
        self.heap.pop().map(|entry| entry.0)
    }

    /// The delivery [`pop_min`](Self::pop_min) would return next
    pub fn peek_min(&self) -> Option<&ScheduledDelivery> {
        self.heap.peek().map(|entry| &entry.0)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use ticknet_core::{Message, NodeId};

    fn delivery(eligible_tick: u64, sequence: u64) -> ScheduledDelivery {
        ScheduledDelivery {
            eligible_tick,
            sender: NodeId(0),
            message: Message::ping(NodeId(1)),
            sequence,
        }
    }

    #[test]
    fn test_earlier_tick_first() {
        let mut queue = DeliveryQueue::new();
        queue.push(delivery(5, 0));
        queue.push(delivery(2, 1));
        queue.push(delivery(9, 2));

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek_min().unwrap().eligible_tick, 2);
        assert_eq!(queue.pop_min().unwrap().eligible_tick, 2);
        assert_eq!(queue.pop_min().unwrap().eligible_tick, 5);
        assert_eq!(queue.pop_min().unwrap().eligible_tick, 9);
        assert!(queue.pop_min().is_none());
        assert!(queue.peek_min().is_none());
    }

    #[test]
    fn test_sequence_breaks_ties() {
        let mut queue = DeliveryQueue::new();
        queue.push(delivery(3, 7));
        queue.push(delivery(3, 2));
        queue.push(delivery(3, 4));

        let order: Vec<u64> = std::iter::from_fn(|| queue.pop_min())
            .map(|d| d.sequence)
            .collect();
        assert_eq!(order, vec![2, 4, 7]);
    }

    #[test]
    fn test_repush_keeps_its_place() {
        let mut queue = DeliveryQueue::new();
        queue.push(delivery(1, 0));
        queue.push(delivery(1, 1));

        let first = queue.pop_min().unwrap();
        assert_eq!(first.sequence, 0);
        queue.push(first);
        assert_eq!(queue.peek_min().unwrap().sequence, 0);
    }

    proptest! {
        #[test]
        fn pops_are_non_decreasing(ticks in prop::collection::vec(0u64..50, 0..64)) {
            let mut queue = DeliveryQueue::new();
            for (sequence, tick) in ticks.iter().enumerate() {
                queue.push(delivery(*tick, sequence as u64));
            }
            prop_assert_eq!(queue.len(), ticks.len());

            let mut previous: Option<DeliveryKey> = None;
            while let Some(next) = queue.pop_min() {
                let key = DeliveryKey::of(&next);
                if let Some(previous) = previous {
                    prop_assert!(previous < key);
                }
                previous = Some(key);
            }
        }
    }
}
