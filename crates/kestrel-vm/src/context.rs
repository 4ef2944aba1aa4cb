use std::collections::HashMap;

use kestrel_types::PeerAccount;
use tracing::trace;

use crate::interface::ExecutionInterface;

/// Chances returned for any rating the rater was not configured with.
const DEFAULT_RATING_CHANCES: u32 = 10;

/// HashMap-backed execution environment for tests and local execution.
///
/// Block context, peer accounts and rater chances are all settable so a
/// test can drive the contract through arbitrary chain histories.
pub struct InMemoryVmContext {
    storage: HashMap<Vec<u8>, Vec<u8>>,
    peer_accounts: HashMap<Vec<u8>, PeerAccount>,
    rating_chances: HashMap<u32, u32>,
    block_nonce: u64,
    block_round: u64,
    block_epoch: u32,
    sc_address: Vec<u8>,
    output: Vec<Vec<u8>>,
    logs: Vec<String>,
}

impl InMemoryVmContext {
    pub fn new(sc_address: Vec<u8>) -> Self {
        InMemoryVmContext {
            storage: HashMap::new(),
            peer_accounts: HashMap::new(),
            rating_chances: HashMap::new(),
            block_nonce: 0,
            block_round: 0,
            block_epoch: 0,
            sc_address,
            output: Vec::new(),
            logs: Vec::new(),
        }
    }

    pub fn set_block_nonce(&mut self, nonce: u64) {
        self.block_nonce = nonce;
    }

    pub fn set_block_round(&mut self, round: u64) {
        self.block_round = round;
    }

    pub fn set_block_epoch(&mut self, epoch: u32) {
        self.block_epoch = epoch;
    }

    /// Install or replace the peer account returned for an address.
    pub fn put_peer_account(&mut self, address: &[u8], account: PeerAccount) {
        self.peer_accounts.insert(address.to_vec(), account);
    }

    pub fn remove_peer_account(&mut self, address: &[u8]) {
        self.peer_accounts.remove(address);
    }

    /// Override the chances the rating oracle reports for one rating.
    pub fn set_rating_chances(&mut self, rating: u32, chances: u32) {
        self.rating_chances.insert(rating, chances);
    }

    /// Values pushed through `finish`, oldest first.
    pub fn output(&self) -> &[Vec<u8>] {
        &self.output
    }

    pub fn last_output(&self) -> Option<&[u8]> {
        self.output.last().map(|v| v.as_slice())
    }

    pub fn logs(&self) -> &[String] {
        &self.logs
    }

    /// Snapshot of every stored key, for invariant checks in tests.
    pub fn storage_keys(&self) -> Vec<Vec<u8>> {
        self.storage.keys().cloned().collect()
    }
}

impl ExecutionInterface for InMemoryVmContext {
    fn get_storage(&self, key: &[u8]) -> Vec<u8> {
        self.storage.get(key).cloned().unwrap_or_default()
    }

    fn set_storage(&mut self, key: &[u8], value: &[u8]) {
        trace!(key_len = key.len(), value_len = value.len(), "set_storage");
        if value.is_empty() {
            self.storage.remove(key);
        } else {
            self.storage.insert(key.to_vec(), value.to_vec());
        }
    }

    fn current_nonce(&self) -> u64 {
        self.block_nonce
    }

    fn current_round(&self) -> u64 {
        self.block_round
    }

    fn current_epoch(&self) -> u32 {
        self.block_epoch
    }

    fn get_existing_account(&self, address: &[u8]) -> Option<PeerAccount> {
        self.peer_accounts.get(address).cloned()
    }

    fn rater_chances(&self, rating: u32) -> u32 {
        self.rating_chances
            .get(&rating)
            .copied()
            .unwrap_or(DEFAULT_RATING_CHANCES)
    }

    fn finish(&mut self, value: &[u8]) {
        self.output.push(value.to_vec());
    }

    fn add_log(&mut self, message: &str) {
        trace!(message, "contract log");
        self.logs.push(message.to_string());
    }

    fn sc_address(&self) -> &[u8] {
        &self.sc_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_write_deletes_the_key() {
        let mut ctx = InMemoryVmContext::new(b"addr".to_vec());
        ctx.set_storage(b"key", b"value");
        assert_eq!(ctx.get_storage(b"key"), b"value");

        ctx.set_storage(b"key", &[]);
        assert!(ctx.get_storage(b"key").is_empty());
        assert!(ctx.storage_keys().is_empty());
    }

    #[test]
    fn absent_key_reads_as_empty() {
        let ctx = InMemoryVmContext::new(b"addr".to_vec());
        assert!(ctx.get_storage(b"missing").is_empty());
    }

    #[test]
    fn unconfigured_rating_uses_default_chances() {
        let mut ctx = InMemoryVmContext::new(b"addr".to_vec());
        assert_eq!(ctx.rater_chances(0), ctx.rater_chances(5));

        ctx.set_rating_chances(5, 3);
        assert_eq!(ctx.rater_chances(5), 3);
        assert_eq!(ctx.rater_chances(0), DEFAULT_RATING_CHANCES);
    }
}
