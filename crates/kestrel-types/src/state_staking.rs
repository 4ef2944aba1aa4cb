//! Per-key staking registration record and its lifecycle predicates.
//!
//! `StakedData` is the canonical source of truth for a validator key's
//! economic state. Eligibility, queue membership and jail status are all
//! derived from this record; no shadow tracking exists anywhere else.

use num_bigint::BigUint;

use crate::primitives::Address;

/// Sentinel for `unstaked_epoch` when the key was never unstaked.
pub const DEFAULT_UNSTAKED_EPOCH: u32 = u32::MAX;

/// Sentinel for `jailed_round` when the key was never jailed.
pub const NEVER_JAILED_ROUND: u64 = u64::MAX;

/// Lifecycle state of a BLS key, derived from the persisted flags.
///
/// The on-disk layout keeps the three booleans for bit-compatibility;
/// this variant is what the contract logic branches on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyStatus {
    /// In the active set and not jailed.
    Staked,
    /// Jailed, whether still booked against capacity or swapped out.
    Jailed,
    /// In the waiting list.
    Queued,
    /// Unstaked, waiting out the unbond period.
    UnStaked,
    /// Registered but in none of the above states.
    NotStaked,
}

impl KeyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyStatus::Staked => "staked",
            KeyStatus::Jailed => "jailed",
            KeyStatus::Queued => "queued",
            KeyStatus::UnStaked => "unStaked",
            KeyStatus::NotStaked => "notStaked",
        }
    }
}

/// Registration record stored under the raw BLS key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StakedData {
    /// Block nonce at which the key was first staked or last re-activated.
    pub register_nonce: u64,
    /// Currently part of the active set.
    pub staked: bool,
    /// Currently jailed.
    pub jailed: bool,
    /// Block nonce of the last unStake, 0 if never unstaked.
    pub unstaked_nonce: u64,
    /// Epoch of the last unStake, `DEFAULT_UNSTAKED_EPOCH` if never.
    pub unstaked_epoch: u32,
    /// Owner address credited for rewards; required for unStake/unBond.
    pub reward_address: Address,
    /// Amount staked for this key.
    pub stake_value: BigUint,
    /// Round when jailed, `NEVER_JAILED_ROUND` if not jailed.
    pub jailed_round: u64,
    /// Nonce bookkeeping for the jail/bleed calculations.
    pub jailed_nonce: u64,
    pub unjailed_nonce: u64,
    /// Cumulative slashed amount; never decreases.
    pub slash_value: BigUint,
    /// Currently in the waiting list.
    pub waiting: bool,
}

impl StakedData {
    /// Fresh record for a key seen for the first time.
    pub fn new(register_nonce: u64, reward_address: Address, stake_value: BigUint) -> Self {
        StakedData {
            register_nonce,
            staked: false,
            jailed: false,
            unstaked_nonce: 0,
            unstaked_epoch: DEFAULT_UNSTAKED_EPOCH,
            reward_address,
            stake_value,
            jailed_round: NEVER_JAILED_ROUND,
            jailed_nonce: 0,
            unjailed_nonce: 0,
            slash_value: BigUint::default(),
            waiting: false,
        }
    }

    /// A record counts as registered once a reward address was set.
    pub fn is_registered(&self) -> bool {
        !self.reward_address.is_empty()
    }

    /// Derive the lifecycle status from the persisted flags. The jailed
    /// flag dominates: a jailed key reports jailed even while it is still
    /// booked against the active set.
    pub fn status(&self) -> KeyStatus {
        if self.jailed {
            KeyStatus::Jailed
        } else if self.waiting {
            KeyStatus::Queued
        } else if self.staked {
            KeyStatus::Staked
        } else if self.unstaked_nonce > 0 {
            KeyStatus::UnStaked
        } else {
            KeyStatus::NotStaked
        }
    }

    /// Eligible for consensus participation right now.
    pub fn is_active(&self) -> bool {
        self.staked && !self.jailed
    }
}
