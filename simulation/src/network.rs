//! Network engine
//!
//! Owns the simulation clock, the path table, the delivery queue and the
//! random source. Each [`Network::tick`]:
//!
//! 1. advances the clock,
//! 2. draws a clog decision for every path, in path order,
//! 3. drains the queue from its minimum while the head is eligible and its
//!    path is open. The first blocked head stops the drain for the whole
//!    tick, even if later entries travel on open paths.
//!
//! Eligible deliveries are then dropped or delivered, and delivered ones may
//! be replayed. Replays go back into the queue after the drain, so a
//! duplicate is delivered on a later tick, never the same one.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ticknet_core::{Envelope, Message, NodeId, RosterError, TicknetResult};
use tracing::{debug, debug_span, trace};

use crate::config::NetworkConfig;
use crate::paths::PathTable;
use crate::queue::DeliveryQueue;
use crate::random::DeterministicRng;
use crate::types::{NetworkEvent, ScheduledDelivery};

/// Receiver of messages the network delivers
///
/// Implemented by whatever owns the nodes' inbound buffers. The network
/// never inspects node state beyond handing over messages.
pub trait DeliverySink {
    fn deliver(&mut self, sender: NodeId, message: Message);
}

impl DeliverySink for Vec<Envelope> {
    fn deliver(&mut self, sender: NodeId, message: Message) {
        self.push(Envelope::new(sender, message));
    }
}

/// Network statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStats {
    pub messages_sent: u64,
    pub messages_delivered: u64,
    pub messages_dropped: u64,
    pub messages_replayed: u64,
    pub paths_clogged: u64,
    /// Ticks whose drain stopped at a head on a clogged path
    pub ticks_blocked_by_clog: u64,
}

/// Why a tick's drain stopped before the queue was empty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DrainStop {
    /// The head of the queue is scheduled for a later tick
    NotYetEligible { eligible_tick: u64 },
    /// The head of the queue travels on a clogged path
    Clogged { from: NodeId, to: NodeId },
}

/// What happened during one [`Network::tick`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    pub tick: u64,
    pub paths_clogged: u64,
    pub delivered: u64,
    pub dropped: u64,
    pub replayed: u64,
    pub stopped: Option<DrainStop>,
}

/// The simulation engine
#[derive(Debug)]
pub struct Network {
    config: NetworkConfig,
    rng: DeterministicRng,
    ticks: u64,
    roster: BTreeSet<NodeId>,
    paths: PathTable,
    queue: DeliveryQueue,
    next_sequence: u64,
    stats: NetworkStats,
    events: Vec<NetworkEvent>,
}

impl Network {
    /// Create a network over `roster` with a random source seeded from `seed`
    pub fn new(config: NetworkConfig, roster: &[NodeId], seed: u64) -> TicknetResult<Self> {
        Self::with_rng(config, roster, DeterministicRng::new(seed))
    }

    /// Create a network that draws from an already constructed random source
    pub fn with_rng(
        config: NetworkConfig,
        roster: &[NodeId],
        rng: DeterministicRng,
    ) -> TicknetResult<Self> {
        config.validate()?;
        if roster.is_empty() {
            return Err(RosterError::Empty.into());
        }
        let mut nodes = BTreeSet::new();
        for &id in roster {
            if !nodes.insert(id) {
                return Err(RosterError::DuplicateNode(id).into());
            }
        }

        debug!(
            nodes = nodes.len(),
            seed = rng.seed(),
            "network created"
        );

        Ok(Self {
            config,
            rng,
            ticks: 0,
            paths: PathTable::new(roster),
            roster: nodes,
            queue: DeliveryQueue::new(),
            next_sequence: 0,
            stats: NetworkStats::default(),
            events: Vec::new(),
        })
    }

    /// Hand a message to the network for delivery after a random delay
    ///
    /// Always accepted; there is no queue bound.
    ///
    /// # Panics
    ///
    /// Panics if there is no path from `sender` to the message's recipient,
    /// which means one of them is not in the roster or they are the same node.
    pub fn send(&mut self, sender: NodeId, message: Message) {
        let recipient = message.recipient();
        assert!(
            self.paths.contains(sender, recipient),
            "no network path from node {} to node {}",
            sender,
            recipient
        );

        let offset = self.rng.int_in_range(0, self.config.max_delay_ticks);
        let eligible_tick = self.ticks.saturating_add(offset);
        let sequence = self.next_sequence;
        self.next_sequence += 1;

        debug!(
            from = %sender,
            to = %recipient,
            kind = %message.kind(),
            sequence,
            eligible_tick,
            "message scheduled"
        );

        self.stats.messages_sent += 1;
        self.events.push(NetworkEvent::Scheduled {
            tick: self.ticks,
            sequence,
            from: sender,
            to: recipient,
            eligible_tick,
        });
        self.queue.push(ScheduledDelivery {
            eligible_tick,
            sender,
            message,
            sequence,
        });
    }

    /// Advance the simulation by exactly one tick
    pub fn tick<S: DeliverySink + ?Sized>(&mut self, sink: &mut S) -> TickReport {
        self.ticks += 1;
        let span = debug_span!("tick", tick = self.ticks);
        let _enter = span.enter();

        let mut report = TickReport {
            tick: self.ticks,
            ..Default::default()
        };
        self.clog_paths(&mut report);
        self.drain(sink, &mut report);

        trace!(
            delivered = report.delivered,
            dropped = report.dropped,
            replayed = report.replayed,
            pending = self.queue.len(),
            "tick complete"
        );
        report
    }

    fn clog_paths(&mut self, report: &mut TickReport) {
        let now = self.ticks;
        for path in self.paths.iter_mut() {
            if !self
                .rng
                .bool_with_probability(self.config.path_clog_probability)
            {
                continue;
            }
            let until_tick = now.saturating_add(self.rng.int_in_range(0, self.config.max_clog_ticks));
            path.unreachable_until_tick = until_tick;

            debug!(from = %path.from, to = %path.to, until_tick, "path clogged");
            report.paths_clogged += 1;
            self.stats.paths_clogged += 1;
            self.events.push(NetworkEvent::Clogged {
                tick: now,
                from: path.from,
                to: path.to,
                until_tick,
            });
        }
    }

    fn drain<S: DeliverySink + ?Sized>(&mut self, sink: &mut S, report: &mut TickReport) {
        let now = self.ticks;
        let mut replays = Vec::new();

        while let Some(head) = self.queue.peek_min() {
            let (eligible_tick, from, to) = (head.eligible_tick, head.sender, head.recipient());

            if eligible_tick > now {
                report.stopped = Some(DrainStop::NotYetEligible { eligible_tick });
                break;
            }
            if self.paths.is_clogged(from, to, now) {
                trace!(from = %from, to = %to, "head of queue on clogged path, drain stopped");
                report.stopped = Some(DrainStop::Clogged { from, to });
                self.stats.ticks_blocked_by_clog += 1;
                break;
            }

            let Some(delivery) = self.queue.pop_min() else {
                break;
            };
            let sequence = delivery.sequence;

            if self
                .rng
                .bool_with_probability(self.config.drop_message_probability)
            {
                trace!(from = %from, to = %to, sequence, "message dropped");
                report.dropped += 1;
                self.stats.messages_dropped += 1;
                self.events.push(NetworkEvent::Dropped {
                    tick: now,
                    sequence,
                    from,
                    to,
                });
                continue;
            }

            trace!(from = %from, to = %to, sequence, "message delivered");
            self.events.push(NetworkEvent::Delivered {
                tick: now,
                sequence,
                from,
                to,
                message: delivery.message.clone(),
            });
            sink.deliver(from, delivery.message.clone());
            report.delivered += 1;
            self.stats.messages_delivered += 1;

            if self
                .rng
                .bool_with_probability(self.config.message_replay_probability)
            {
                trace!(from = %from, to = %to, sequence, "message replayed");
                report.replayed += 1;
                self.stats.messages_replayed += 1;
                self.events.push(NetworkEvent::Replayed {
                    tick: now,
                    sequence,
                    from,
                    to,
                });
                replays.push(delivery);
            }
        }

        for delivery in replays {
            self.queue.push(delivery);
        }
    }

    /// Clog `from -> to` until `until_tick`, outside the random clog pass
    ///
    /// # Panics
    ///
    /// Panics if there is no such path.
    pub fn clog(&mut self, from: NodeId, to: NodeId, until_tick: u64) {
        self.paths.clog(from, to, until_tick);
        debug!(from = %from, to = %to, until_tick, "path clogged by hand");
        self.stats.paths_clogged += 1;
        self.events.push(NetworkEvent::Clogged {
            tick: self.ticks,
            from,
            to,
            until_tick,
        });
    }

    /// Current tick
    pub fn now(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn paths(&self) -> &PathTable {
        &self.paths
    }

    /// Nodes the network was built for, in ascending order
    pub fn roster(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roster.iter().copied()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.roster.contains(&id)
    }

    /// Number of deliveries still in flight
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The next delivery the drain would consider
    pub fn next_delivery(&self) -> Option<&ScheduledDelivery> {
        self.queue.peek_min()
    }

    pub fn stats(&self) -> &NetworkStats {
        &self.stats
    }

    /// Every event recorded so far, oldest first
    pub fn events(&self) -> &[NetworkEvent] {
        &self.events
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Number of random draws made so far
    pub fn draws(&self) -> u64 {
        self.rng.draws()
    }

    /// A digest of the event log
    ///
    /// Two runs behaved identically if and only if (up to hash collisions)
    /// their fingerprints match.
    pub fn fingerprint(&self) -> Result<blake3::Hash, postcard::Error> {
        let mut hasher = blake3::Hasher::new();
        for event in &self.events {
            let bytes = postcard::to_allocvec(event)?;
            hasher.update(&(bytes.len() as u64).to_le_bytes());
            hasher.update(&bytes);
        }
        Ok(hasher.finalize())
    }
}
