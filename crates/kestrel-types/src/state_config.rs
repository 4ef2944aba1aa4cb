//! Singleton node-count configuration persisted by the staking contract.

/// Counters and caps for the active set. Stored under the nodes-config
/// key and updated in the same invocation as the per-key flag it mirrors.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodesConfig {
    pub min_num_nodes: i64,
    pub max_num_nodes: i64,
    pub staked_nodes: i64,
    pub jailed_nodes: i64,
}

impl NodesConfig {
    /// A new stake can enter the active set directly; otherwise it queues.
    pub fn has_free_slot(&self) -> bool {
        self.staked_nodes < self.max_num_nodes
    }

    /// Removing one staked node would drop the set below the minimum.
    pub fn at_minimum(&self) -> bool {
        self.staked_nodes - 1 < self.min_num_nodes
    }
}
