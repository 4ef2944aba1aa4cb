//! The staking system contract: dispatcher, access gates and one handler
//! per supported action.
//!
//! Every invocation runs serialized by the host VM. Handlers write the
//! waiting-list pointers and the node counters before the per-key
//! registration record, so an abort after a partial commit leaves a
//! reachable state the next call overwrites cleanly.

use std::sync::atomic::{AtomicBool, Ordering};

use num_bigint::BigUint;

use kestrel_types::{
    Address, KeyStatus, NodesConfig, PeerList, ReturnCode, StakedData, NEVER_JAILED_ROUND,
};
use kestrel_vm::{ContractCallInput, EpochSubscriber, ExecutionInterface};

use crate::access::{required_caller, RequiredCaller};
use crate::bleed::jail_bleed_amount;
use crate::config::StakingConfig;
use crate::error::{StakingError, StakingSetupError};
use crate::storage;
use crate::waiting_list::WaitingList;

/// Function name the host uses for contract deployment.
pub const INIT_FUNCTION: &str = "_init";

pub struct StakingContractArgs {
    pub staking_access_address: Address,
    pub jail_access_address: Address,
    pub end_of_epoch_address: Address,
    pub config: StakingConfig,
}

pub struct StakingContract {
    staking_access_address: Address,
    jail_access_address: Address,
    end_of_epoch_address: Address,
    config: StakingConfig,
    /// Full semantics active once the chain reaches `stake_enable_epoch`.
    stake_v2_enabled: AtomicBool,
}

impl StakingContract {
    pub fn new(args: StakingContractArgs) -> Result<Self, StakingSetupError> {
        if args.staking_access_address.is_empty() {
            return Err(StakingSetupError::InvalidStakingAccessAddress);
        }
        if args.jail_access_address.is_empty() {
            return Err(StakingSetupError::InvalidJailAccessAddress);
        }
        if args.end_of_epoch_address.is_empty() {
            return Err(StakingSetupError::InvalidEndOfEpochAddress);
        }
        if args.config.min_stake_value == BigUint::default() {
            return Err(StakingSetupError::InvalidMinStakeValue);
        }

        let enabled = args.config.stake_enable_epoch == 0;
        Ok(StakingContract {
            staking_access_address: args.staking_access_address,
            jail_access_address: args.jail_access_address,
            end_of_epoch_address: args.end_of_epoch_address,
            config: args.config,
            stake_v2_enabled: AtomicBool::new(enabled),
        })
    }

    /// Entry point for every contract invocation.
    pub fn execute<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> ReturnCode {
        match self.dispatch(ei, input) {
            Ok(()) => ReturnCode::Ok,
            Err(err) => {
                ei.add_log(&err.to_string());
                ReturnCode::UserError
            }
        }
    }

    fn dispatch<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let required = required_caller(&input.function)
            .ok_or_else(|| StakingError::UnknownFunction(input.function.clone()))?;
        self.check_access(ei, required, &input.caller)?;

        match input.function.as_str() {
            INIT_FUNCTION => self.init(ei, input),
            "stake" => self.stake(ei, input),
            "unStake" => self.un_stake(ei, input),
            "unBond" => self.un_bond(ei, input),
            "jail" => self.jail(ei, input),
            "unJail" => self.un_jail(ei, input),
            "slash" => self.slash(ei, input),
            "switchJailedWithWaiting" => self.switch_jailed_with_waiting(ei, input),
            "finalizeUnStake" => self.finalize_un_stake(ei, input),
            "isStaked" => self.is_staked(ei, input),
            "get" => self.get(ei, input),
            "getRewardAddress" => self.get_reward_address(ei, input),
            "getBLSKeyStatus" => self.get_bls_key_status(ei, input),
            "getRemainingUnBondPeriod" => self.get_remaining_unbond_period(ei, input),
            "getQueueSize" => self.get_queue_size(ei),
            "getQueueIndex" => self.get_queue_index(ei, input),
            "getQueueRegisterNonceAndRewardAddress" => self.get_queue_snapshot(ei),
            "updateConfigMinNodes" => self.update_config_min_nodes(ei, input),
            other => Err(StakingError::UnknownFunction(other.to_string())),
        }
    }

    fn check_access<E: ExecutionInterface>(
        &self,
        ei: &E,
        required: RequiredCaller,
        caller: &[u8],
    ) -> Result<(), StakingError> {
        match required {
            RequiredCaller::Any => Ok(()),
            RequiredCaller::StakingAccess => {
                if caller == self.staking_access_address.as_slice() {
                    Ok(())
                } else {
                    Err(StakingError::AccessDenied(
                        "function can be called only by the staking access address",
                    ))
                }
            }
            RequiredCaller::JailAccess => {
                if caller == self.jail_access_address.as_slice() {
                    Ok(())
                } else {
                    Err(StakingError::AccessDenied(
                        "function can be called only by the jail access address",
                    ))
                }
            }
            RequiredCaller::EndOfEpoch => {
                if caller == self.end_of_epoch_address.as_slice() {
                    Ok(())
                } else {
                    Err(StakingError::AccessDenied(
                        "function can be called only by the end of epoch address",
                    ))
                }
            }
            RequiredCaller::Owner => {
                let owner = storage::owner(ei);
                if !owner.is_empty() && caller == owner.as_slice() {
                    Ok(())
                } else {
                    Err(StakingError::AccessDenied(
                        "function can be called only by the contract owner",
                    ))
                }
            }
        }
    }

    fn stake_v2(&self) -> bool {
        self.stake_v2_enabled.load(Ordering::Relaxed)
    }

    // ------------------------------------------------------------------
    // Deployment and configuration
    // ------------------------------------------------------------------

    fn init<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        if !storage::owner(ei).is_empty() {
            return Err(StakingError::Precondition(
                "smart contract was already initialized",
            ));
        }

        storage::save_owner(ei, &input.caller);
        let config = NodesConfig {
            min_num_nodes: self.config.min_num_nodes,
            max_num_nodes: self.config.max_num_nodes,
            staked_nodes: 0,
            jailed_nodes: 0,
        };
        storage::save_nodes_config(ei, &config);
        Ok(())
    }

    fn update_config_min_nodes<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let value = first_argument(input, "updateConfigMinNodes expects the new minimum")?;
        let new_min_num_nodes = decode_i64(value)?;

        let mut config = self.nodes_config(ei)?;
        config.min_num_nodes = new_min_num_nodes;
        storage::save_nodes_config(ei, &config);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Stake lifecycle
    // ------------------------------------------------------------------

    fn stake<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let (bls_key, reward_address) =
            two_arguments(input, "stake expects bls key and reward address")?;

        let mut data = match storage::staked_data(ei, bls_key)? {
            Some(data) => data,
            None => StakedData::new(
                ei.current_nonce(),
                Vec::new(),
                self.config.min_stake_value.clone(),
            ),
        };
        if data.staked {
            return Err(StakingError::Precondition("account already staked"));
        }
        if data.jailed {
            return Err(StakingError::Precondition("cannot stake a jailed key"));
        }
        if data.waiting {
            return Err(StakingError::Precondition(
                "key is already in the waiting list",
            ));
        }

        data.reward_address = reward_address.to_vec();

        let mut config = self.nodes_config(ei)?;
        if !self.stake_v2() || config.has_free_slot() {
            // Before the enable epoch admission is capped upstream by the
            // selection layer, so the waiting list is skipped entirely.
            config.staked_nodes += 1;
            storage::save_nodes_config(ei, &config);
            data.staked = true;
            data.register_nonce = ei.current_nonce();
            storage::save_staked_data(ei, bls_key, &data);
        } else {
            let mut list = WaitingList::load(ei)?;
            list.push_back(ei, bls_key)?;
            data.waiting = true;
            storage::save_staked_data(ei, bls_key, &data);
        }
        Ok(())
    }

    fn un_stake<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let (bls_key, caller_reward_address) =
            two_arguments(input, "unStake expects bls key and reward address")?;

        let mut data =
            self.registered_data(ei, bls_key, "cannot unStake a key that is not registered")?;
        if data.reward_address != caller_reward_address {
            return Err(StakingError::Precondition(
                "unStake is possible only from the reward address",
            ));
        }
        if data.jailed {
            return Err(StakingError::Precondition("cannot unStake a jailed key"));
        }
        if !data.staked && !data.waiting {
            return Err(StakingError::Precondition("key is already unStaked"));
        }

        if self.stake_v2() {
            self.check_can_leave(ei, bls_key, data.staked)?;
        }

        if data.waiting {
            let mut list = WaitingList::load(ei)?;
            list.remove(ei, bls_key)?;
            storage::delete_staked_data(ei, bls_key);
            return Ok(());
        }

        let mut config = self.nodes_config(ei)?;
        config.staked_nodes -= 1;
        storage::save_nodes_config(ei, &config);

        data.staked = false;
        data.unstaked_nonce = ei.current_nonce();
        data.unstaked_epoch = ei.current_epoch();
        storage::save_staked_data(ei, bls_key, &data);
        Ok(())
    }

    fn un_bond<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "unBond expects the bls key")?;

        let data =
            self.registered_data(ei, bls_key, "cannot unBond a key that is not registered")?;
        if data.waiting {
            return Err(StakingError::Precondition(
                "cannot unBond a key that is in the waiting list",
            ));
        }
        if data.staked {
            return Err(StakingError::Precondition(
                "cannot unBond a key that is staked",
            ));
        }
        if data.jailed {
            return Err(StakingError::Precondition("cannot unBond a jailed key"));
        }

        self.check_left_network(ei, bls_key)?;
        if ei.current_nonce().saturating_sub(data.unstaked_nonce) < self.config.unbond_period {
            return Err(StakingError::Precondition("unBond period has not passed"));
        }

        storage::delete_staked_data(ei, bls_key);
        Ok(())
    }

    fn finalize_un_stake<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "finalizeUnStake expects the bls key")?;

        let data = self.registered_data(
            ei,
            bls_key,
            "cannot finalize unStake for a key that is not registered",
        )?;
        if data.staked || data.waiting || data.jailed {
            return Err(StakingError::Precondition(
                "cannot finalize unStake for a key that is still active",
            ));
        }
        if ei.current_nonce().saturating_sub(data.unstaked_nonce) < self.config.unbond_period {
            return Err(StakingError::Precondition("unBond period has not passed"));
        }

        storage::delete_staked_data(ei, bls_key);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Jail lifecycle
    // ------------------------------------------------------------------

    fn jail<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "jail expects the bls key")?;

        let mut data =
            self.registered_data(ei, bls_key, "cannot jail a key that is not registered")?;
        if data.jailed {
            return Err(StakingError::Precondition("key is already jailed"));
        }
        if data.waiting {
            return Err(StakingError::Precondition(
                "cannot jail a key that is in the waiting list",
            ));
        }

        let mut config = self.nodes_config(ei)?;
        config.jailed_nodes += 1;
        storage::save_nodes_config(ei, &config);

        data.jailed = true;
        data.jailed_round = ei.current_round();
        data.jailed_nonce = ei.current_nonce();
        storage::save_staked_data(ei, bls_key, &data);
        Ok(())
    }

    fn un_jail<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "unJail expects the bls key")?;

        let mut data =
            self.registered_data(ei, bls_key, "cannot unJail a key that is not registered")?;
        if !data.jailed {
            return Err(StakingError::Precondition(
                "cannot unJail a key that is not jailed",
            ));
        }
        if let Some(peer) = ei.get_existing_account(bls_key) {
            if peer.list != PeerList::Jailed {
                return Err(StakingError::Precondition(
                    "cannot unJail a key that is not jailed in the accounts state",
                ));
            }
            if ei.rater_chances(peer.temp_rating) < ei.rater_chances(0) {
                return Err(StakingError::Precondition(
                    "rating has not recovered above the jail threshold",
                ));
            }
        }

        let bleed = jail_bleed_amount(
            &self.config,
            data.jailed_round,
            ei.current_round(),
            &data.stake_value,
        );
        data.stake_value -= bleed;

        let mut config = self.nodes_config(ei)?;
        config.jailed_nodes -= 1;
        storage::save_nodes_config(ei, &config);

        data.jailed = false;
        data.jailed_round = NEVER_JAILED_ROUND;
        data.unjailed_nonce = ei.current_nonce();

        if !data.staked {
            // Swapped out while jailed: back through the queue, behind any
            // other key that went through jail before it.
            let mut list = WaitingList::load(ei)?;
            list.insert_after_last_jailed(ei, bls_key)?;
            data.waiting = true;
        }
        storage::save_staked_data(ei, bls_key, &data);
        Ok(())
    }

    fn switch_jailed_with_waiting<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "switchJailedWithWaiting expects the bls key")?;

        let mut data =
            self.registered_data(ei, bls_key, "cannot switch a key that is not registered")?;
        if !data.staked {
            return Err(StakingError::Precondition(
                "cannot switch a key that is not staked",
            ));
        }
        if data.jailed {
            return Err(StakingError::Precondition("key is already jailed"));
        }

        let mut config = self.nodes_config(ei)?;
        config.jailed_nodes += 1;
        storage::save_nodes_config(ei, &config);

        let mut list = WaitingList::load(ei)?;
        if let Some(promoted_key) = list.pop_front(ei)? {
            let mut promoted = storage::staked_data(ei, &promoted_key)?.ok_or(
                StakingError::Inconsistent("waiting list entry without a registration record"),
            )?;
            promoted.staked = true;
            promoted.waiting = false;
            storage::save_staked_data(ei, &promoted_key, &promoted);

            // The replacement takes over the slot; the jailed key keeps
            // consuming capacity only when no replacement exists.
            data.staked = false;
        }

        data.jailed = true;
        data.jailed_round = ei.current_round();
        data.jailed_nonce = ei.current_nonce();
        storage::save_staked_data(ei, bls_key, &data);
        Ok(())
    }

    fn slash<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let (bls_key, amount_bytes) = two_arguments(input, "slash expects bls key and amount")?;

        let mut data =
            self.registered_data(ei, bls_key, "cannot slash a key that is not registered")?;
        if !data.staked {
            return Err(StakingError::Precondition(
                "cannot slash a key that is not staked",
            ));
        }

        let amount = BigUint::from_bytes_be(amount_bytes);
        data.slash_value += amount;
        storage::save_staked_data(ei, bls_key, &data);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read-only queries
    // ------------------------------------------------------------------

    fn is_staked<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "isStaked expects the bls key")?;

        let data = self.registered_data(ei, bls_key, "key is not registered")?;
        if !data.is_active() {
            return Err(StakingError::Precondition("key is not staked"));
        }
        Ok(())
    }

    fn get<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "get expects the bls key")?;

        let reward_address = storage::staked_data(ei, bls_key)?
            .map(|data| data.reward_address)
            .unwrap_or_default();
        ei.finish(hex::encode(&reward_address).as_bytes());
        Ok(())
    }

    fn get_reward_address<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "getRewardAddress expects the bls key")?;

        let data = self.registered_data(ei, bls_key, "key is not registered")?;
        ei.finish(hex::encode(&data.reward_address).as_bytes());
        Ok(())
    }

    fn get_bls_key_status<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "getBLSKeyStatus expects the bls key")?;

        let status = match storage::staked_data(ei, bls_key)? {
            Some(data) if data.is_registered() => data.status(),
            _ => KeyStatus::NotStaked,
        };
        ei.finish(status.as_str().as_bytes());
        Ok(())
    }

    fn get_remaining_unbond_period<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "getRemainingUnBondPeriod expects the bls key")?;

        let data = self.registered_data(ei, bls_key, "key is not registered")?;
        if data.staked || data.waiting || data.unstaked_nonce == 0 {
            return Err(StakingError::Precondition("key is not unStaked"));
        }

        let elapsed = ei.current_nonce().saturating_sub(data.unstaked_nonce);
        let remaining = self.config.unbond_period.saturating_sub(elapsed);
        ei.finish(remaining.to_string().as_bytes());
        Ok(())
    }

    fn get_queue_size<E: ExecutionInterface>(&self, ei: &mut E) -> Result<(), StakingError> {
        let list = WaitingList::load(ei)?;
        ei.finish(list.len().to_string().as_bytes());
        Ok(())
    }

    fn get_queue_index<E: ExecutionInterface>(
        &self,
        ei: &mut E,
        input: &ContractCallInput,
    ) -> Result<(), StakingError> {
        let bls_key = first_argument(input, "getQueueIndex expects the bls key")?;

        let list = WaitingList::load(ei)?;
        let position = list
            .position(ei, bls_key)?
            .ok_or(StakingError::Precondition("key is not in the waiting list"))?;
        ei.finish(position.to_string().as_bytes());
        Ok(())
    }

    /// Emits, per queued element in order, the hex reward address followed
    /// by the decimal register nonce.
    fn get_queue_snapshot<E: ExecutionInterface>(&self, ei: &mut E) -> Result<(), StakingError> {
        let list = WaitingList::load(ei)?;
        for bls_key in list.walk(ei)? {
            let data = storage::staked_data(ei, &bls_key)?.ok_or(StakingError::Inconsistent(
                "waiting list entry without a registration record",
            ))?;
            ei.finish(hex::encode(&data.reward_address).as_bytes());
            ei.finish(data.register_nonce.to_string().as_bytes());
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Shared checks
    // ------------------------------------------------------------------

    fn nodes_config<E: ExecutionInterface>(&self, ei: &E) -> Result<NodesConfig, StakingError> {
        match storage::nodes_config(ei)? {
            Some(config) => Ok(config),
            None => Ok(NodesConfig {
                min_num_nodes: self.config.min_num_nodes,
                max_num_nodes: self.config.max_num_nodes,
                ..NodesConfig::default()
            }),
        }
    }

    fn registered_data<E: ExecutionInterface>(
        &self,
        ei: &E,
        bls_key: &[u8],
        missing: &'static str,
    ) -> Result<StakedData, StakingError> {
        storage::staked_data(ei, bls_key)?
            .filter(StakedData::is_registered)
            .ok_or(StakingError::Precondition(missing))
    }

    /// Whether a key may voluntarily leave via unStake. A key the rating
    /// oracle marks as a jail candidate must serve out the process, and a
    /// staked key cannot leave when that would underrun the minimum set.
    /// No peer account means the accounts layer has no opinion.
    fn check_can_leave<E: ExecutionInterface>(
        &self,
        ei: &E,
        bls_key: &[u8],
        currently_staked: bool,
    ) -> Result<(), StakingError> {
        let peer = match ei.get_existing_account(bls_key) {
            Some(peer) => peer,
            None => return Ok(()),
        };

        if peer.list == PeerList::Jailed {
            return Err(StakingError::Precondition(
                "cannot unStake a key that is jailed in the accounts state",
            ));
        }
        if ei.rater_chances(peer.temp_rating) < ei.rater_chances(0) {
            return Err(StakingError::Precondition(
                "cannot unStake a key with rating below the jail threshold",
            ));
        }
        if currently_staked {
            let config = self.nodes_config(ei)?;
            if config.at_minimum() {
                return Err(StakingError::Precondition(
                    "not enough staked nodes left to allow unStake",
                ));
            }
        }
        Ok(())
    }

    /// Whether a key has fully left the network in the accounts layer,
    /// as unBond requires.
    fn check_left_network<E: ExecutionInterface>(
        &self,
        ei: &E,
        bls_key: &[u8],
    ) -> Result<(), StakingError> {
        let peer = match ei.get_existing_account(bls_key) {
            Some(peer) => peer,
            None => return Ok(()),
        };

        if matches!(
            peer.list,
            PeerList::Eligible | PeerList::Waiting | PeerList::Jailed
        ) {
            return Err(StakingError::Precondition(
                "cannot unBond a key that is still active in the accounts state",
            ));
        }
        if ei.rater_chances(peer.temp_rating) < ei.rater_chances(0) {
            return Err(StakingError::Precondition(
                "cannot unBond a key with rating below the jail threshold",
            ));
        }
        Ok(())
    }
}

impl EpochSubscriber for StakingContract {
    fn handle_epoch_change(&self, new_epoch: u32) {
        self.stake_v2_enabled.store(
            new_epoch >= self.config.stake_enable_epoch,
            Ordering::Relaxed,
        );
    }
}

fn first_argument<'a>(
    input: &'a ContractCallInput,
    missing: &'static str,
) -> Result<&'a [u8], StakingError> {
    input
        .arguments
        .first()
        .map(|argument| argument.as_slice())
        .ok_or(StakingError::InvalidArguments(missing))
}

fn two_arguments<'a>(
    input: &'a ContractCallInput,
    missing: &'static str,
) -> Result<(&'a [u8], &'a [u8]), StakingError> {
    if input.arguments.len() < 2 {
        return Err(StakingError::InvalidArguments(missing));
    }
    Ok((input.arguments[0].as_slice(), input.arguments[1].as_slice()))
}

/// Decode a big-endian unsigned argument into an i64 counter value.
fn decode_i64(bytes: &[u8]) -> Result<i64, StakingError> {
    let value = BigUint::from_bytes_be(bytes);
    let digits = value.to_u64_digits();
    match digits.as_slice() {
        [] => Ok(0),
        [single] if *single <= i64::MAX as u64 => Ok(*single as i64),
        _ => Err(StakingError::InvalidArguments(
            "numeric argument is out of range",
        )),
    }
}
