//! # Ticknet Simulation
//!
//! A deterministic, tick-driven network simulator for testing distributed
//! protocols under message delay, loss, duplication and temporary path
//! outages.
//!
//! ## Overview
//!
//! Time is a counter. All faults are drawn from one seeded random source in
//! a fixed order, so a seed plus the sequence of calls fully determines the
//! run:
//!
//! - **Delay**: every send is scheduled for a random tick up to `max_delay_ticks` ahead
//! - **Clogs**: each directed path may become unreachable for a while, every tick
//! - **Drops**: an eligible message may be discarded for good
//! - **Replays**: a delivered message may be delivered again on a later tick
//!
//! ## Architecture
//!
//! - **Random** (`random.rs`): Seeded ChaCha8 source for every fault decision
//! - **Queue** (`queue.rs`): Deliveries ordered by `(eligible_tick, sequence)`
//! - **Paths** (`paths.rs`): One clog deadline per ordered node pair
//! - **Network** (`network.rs`): The clock, the clog pass and the delivery drain
//! - **Node** (`node.rs`): Per-node driver, at most one message in and out per tick
//! - **Simulation** (`simulation.rs`): Owns the network and all node drivers
//! - **Scenarios** (`scenarios.rs`): Pre-built runs used by the `ticknet` binary
//!
//! ## Example
//!
//! ```rust,ignore
//! use ticknet_simulation::*;
//!
//! let mut sim: Simulation<PingPong> =
//!     Simulation::uniform(NetworkConfig::reliable(), 42, 2)?;
//! sim.inject(NodeId(0), Message::ping(NodeId(1)))?;
//! sim.run_ticks(3);
//!
//! assert_eq!(sim.node(NodeId(0)).unwrap().protocol().pongs_received(), 1);
//! ```
//!
//! ## Step Order
//!
//! Each [`Simulation::step`] calls [`Network::tick`] once, then every node's
//! [`NodeDriver::tick`] in ascending [`NodeId`] order. Nothing runs
//! concurrently; the order of random draws is part of the result.

pub mod config;
pub mod network;
pub mod node;
pub mod paths;
pub mod protocols;
pub mod queue;
pub mod random;
pub mod scenarios;
pub mod simulation;
pub mod types;

// Re-export main types
pub use config::NetworkConfig;
pub use network::{DeliverySink, DrainStop, Network, NetworkStats, TickReport};
pub use node::{NodeDriver, NodeTickReport};
pub use paths::{NetworkPath, PathTable};
pub use protocols::{PingPong, Received, Sink};
pub use queue::{DeliveryKey, DeliveryQueue};
pub use random::DeterministicRng;
pub use simulation::{SimSummary, Simulation, StepReport};
pub use types::{NetworkEvent, ScheduledDelivery};

// Re-export core types so protocol code needs a single dependency
pub use ticknet_core::{
    ConfigError, Envelope, Message, MessageKind, NodeContext, NodeId, Protocol, RosterError,
    TicknetError, TicknetResult,
};
