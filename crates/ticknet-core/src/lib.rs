//! # Ticknet Core
//!
//! Core types, collaborator traits, and errors for the ticknet simulator.
//!
//! This crate holds everything node protocol logic is allowed to see. The
//! engine itself (clock, fault model, delivery queue) lives in
//! `ticknet-simulation` and is deliberately absent here, so protocol code
//! cannot observe or influence simulated faults.
//!
//! ## Key Types
//!
//! - [`NodeId`]: Identity of a simulated participant
//! - [`Message`]: An immutable message addressed to one recipient
//! - [`Envelope`]: A delivered message together with its sender
//! - [`Inbox`] / [`Outbox`]: Per-node FIFO buffers
//!
//! ## Key Traits
//!
//! - [`Protocol`]: The pluggable node logic driven by a node driver

pub mod error;
pub mod identity;
pub mod mailbox;
pub mod message;
pub mod traits;

// Re-export main types
pub use error::*;
pub use identity::*;
pub use mailbox::*;
pub use message::*;
pub use traits::*;
