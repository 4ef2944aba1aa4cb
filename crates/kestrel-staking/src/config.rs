use num_bigint::BigUint;
use serde::{Deserialize, Serialize};

/// Protocol parameters of the staking contract, carried by the node's
/// genesis configuration.
///
/// The bleed fields describe stake decay while a key sits in jail: after
/// `num_rounds_without_bleed` grace rounds, every further round bleeds
/// `bleed_bps_per_round` basis points of the stake, capped at
/// `max_bleed_bps`. All three default to zero, which disables the decay.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakingConfig {
    /// Stake booked for every newly registered key.
    pub min_stake_value: BigUint,
    /// Minimum nonce delta between unStake and unBond.
    pub unbond_period: u64,
    /// Epoch at which the full staking semantics (waiting list, leave
    /// gating) activate.
    pub stake_enable_epoch: u32,
    pub min_num_nodes: i64,
    pub max_num_nodes: i64,
    pub num_rounds_without_bleed: u64,
    pub bleed_bps_per_round: u32,
    pub max_bleed_bps: u32,
}

impl Default for StakingConfig {
    fn default() -> Self {
        StakingConfig {
            min_stake_value: BigUint::from(1u64),
            unbond_period: 0,
            stake_enable_epoch: 0,
            min_num_nodes: 1,
            max_num_nodes: 10,
            num_rounds_without_bleed: 0,
            bleed_bps_per_round: 0,
            max_bleed_bps: 0,
        }
    }
}
