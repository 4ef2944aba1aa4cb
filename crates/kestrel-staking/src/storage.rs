//! Typed accessors over the EI key/value store.
//!
//! Storage keys are consensus-visible and bit-exact: the owner address
//! under `owner`, the node counters under `nodesConfig`, the queue head
//! under `waitingList`, per-key registration records under the raw BLS
//! key, and queue elements under the `w_` prefixed BLS key. Deleting a
//! key means writing empty bytes.

use kestrel_serde::{decode_all, StateEncode, StateError};
use kestrel_types::{NodesConfig, StakedData, WaitingListElement, WaitingListHead};
use kestrel_vm::ExecutionInterface;

pub const OWNER_KEY: &[u8] = b"owner";
pub const NODES_CONFIG_KEY: &[u8] = b"nodesConfig";
pub const WAITING_LIST_HEAD_KEY: &[u8] = b"waitingList";
pub const WAITING_ELEMENT_PREFIX: &[u8] = b"w_";

/// Storage key of the waiting-list element for a BLS key.
pub fn element_key(bls_key: &[u8]) -> Vec<u8> {
    let mut key = WAITING_ELEMENT_PREFIX.to_vec();
    key.extend_from_slice(bls_key);
    key
}

fn encode<T: StateEncode>(value: &T) -> Vec<u8> {
    let mut out = Vec::new();
    value.encode_state(&mut out);
    out
}

pub fn owner<E: ExecutionInterface>(ei: &E) -> Vec<u8> {
    ei.get_storage(OWNER_KEY)
}

pub fn save_owner<E: ExecutionInterface>(ei: &mut E, owner: &[u8]) {
    ei.set_storage(OWNER_KEY, owner);
}

pub fn staked_data<E: ExecutionInterface>(
    ei: &E,
    bls_key: &[u8],
) -> Result<Option<StakedData>, StateError> {
    let bytes = ei.get_storage(bls_key);
    if bytes.is_empty() {
        return Ok(None);
    }
    decode_all(&bytes).map(Some)
}

pub fn save_staked_data<E: ExecutionInterface>(ei: &mut E, bls_key: &[u8], data: &StakedData) {
    ei.set_storage(bls_key, &encode(data));
}

pub fn delete_staked_data<E: ExecutionInterface>(ei: &mut E, bls_key: &[u8]) {
    ei.set_storage(bls_key, &[]);
}

pub fn nodes_config<E: ExecutionInterface>(ei: &E) -> Result<Option<NodesConfig>, StateError> {
    let bytes = ei.get_storage(NODES_CONFIG_KEY);
    if bytes.is_empty() {
        return Ok(None);
    }
    decode_all(&bytes).map(Some)
}

pub fn save_nodes_config<E: ExecutionInterface>(ei: &mut E, config: &NodesConfig) {
    ei.set_storage(NODES_CONFIG_KEY, &encode(config));
}

/// Absent head record reads as the empty list.
pub fn waiting_list_head<E: ExecutionInterface>(ei: &E) -> Result<WaitingListHead, StateError> {
    let bytes = ei.get_storage(WAITING_LIST_HEAD_KEY);
    if bytes.is_empty() {
        return Ok(WaitingListHead::default());
    }
    decode_all(&bytes)
}

pub fn save_waiting_list_head<E: ExecutionInterface>(ei: &mut E, head: &WaitingListHead) {
    ei.set_storage(WAITING_LIST_HEAD_KEY, &encode(head));
}

pub fn waiting_element<E: ExecutionInterface>(
    ei: &E,
    element_key: &[u8],
) -> Result<Option<WaitingListElement>, StateError> {
    let bytes = ei.get_storage(element_key);
    if bytes.is_empty() {
        return Ok(None);
    }
    decode_all(&bytes).map(Some)
}

pub fn save_waiting_element<E: ExecutionInterface>(
    ei: &mut E,
    element_key: &[u8],
    element: &WaitingListElement,
) {
    ei.set_storage(element_key, &encode(element));
}

pub fn delete_waiting_element<E: ExecutionInterface>(ei: &mut E, element_key: &[u8]) {
    ei.set_storage(element_key, &[]);
}
