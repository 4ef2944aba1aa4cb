//! Persisted records backing the waiting list.
//!
//! The queue is a doubly-linked list laid out in flat KV storage: the
//! head record is a singleton, each element lives under its prefixed BLS
//! key, and all links are prefixed storage keys rather than memory
//! references.

/// Singleton head record of the waiting list.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaitingListHead {
    /// Prefixed key of the first element, empty when the list is empty.
    pub first_key: Vec<u8>,
    /// Prefixed key of the last element, empty when the list is empty.
    pub last_key: Vec<u8>,
    pub length: u32,
    /// Prefixed key of the most recently re-queued previously-jailed key.
    /// Re-queued jailed keys insert after it; empty when no jailed key is
    /// queued.
    pub last_jailed_key: Vec<u8>,
}

/// One queue entry, stored under `"w_" || bls_key`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WaitingListElement {
    pub bls_key: Vec<u8>,
    /// Prefixed key of the successor, empty at the tail.
    pub next_key: Vec<u8>,
    /// Prefixed key of the predecessor, empty at the head.
    pub previous_key: Vec<u8>,
}
