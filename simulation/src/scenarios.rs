//! Pre-defined simulation scenarios

use ticknet_core::{Message, NodeId, TicknetResult};
use tracing::info;

use crate::config::NetworkConfig;
use crate::protocols::PingPong;
use crate::simulation::Simulation;

/// Number of nodes in the ping-pong scenario
pub const PING_PONG_NODES: i16 = 3;

/// Three nodes under the default fault model; node 0 pings node 1 once
pub fn ping_pong(seed: u64, ticks: u64) -> TicknetResult<Simulation<PingPong>> {
    info!("=== Running ping-pong scenario ===");

    let mut sim = Simulation::uniform(NetworkConfig::default(), seed, PING_PONG_NODES)?;
    sim.inject(NodeId(0), Message::ping(NodeId(1)))?;

    for _ in 0..ticks {
        sim.step();
        info!("{}", sim.state_summary());
    }
    Ok(sim)
}

/// Every node keeps pinging its successor (wrapping around) under `config`
///
/// A node gets a fresh ping whenever its outbound buffer is empty, so each
/// node has at most one ping of its own waiting to be sent.
pub fn chaos(
    seed: u64,
    nodes: i16,
    ticks: u64,
    config: NetworkConfig,
) -> TicknetResult<Simulation<PingPong>> {
    info!(nodes, ticks, "=== Running chaos scenario ===");

    let mut sim = Simulation::uniform(config, seed, nodes)?;
    let roster = NodeId::range(nodes);

    for _ in 0..ticks {
        for (i, &id) in roster.iter().enumerate() {
            let successor = roster[(i + 1) % roster.len()];
            if successor == id {
                continue;
            }
            let idle = sim.node(id).is_some_and(|node| node.outbound_len() == 0);
            if idle {
                sim.inject(id, Message::ping(successor))?;
            }
        }
        sim.step();
    }

    info!("{}", sim.state_summary());
    Ok(sim)
}
