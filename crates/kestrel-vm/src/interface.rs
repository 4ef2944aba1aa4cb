use kestrel_types::PeerAccount;

/// Host environment handed to a system contract for one invocation.
///
/// The host serializes invocations, so a contract observes storage and
/// block context as a consistent snapshot for the whole call. Writing
/// empty bytes deletes a key; reading an absent key yields empty bytes.
pub trait ExecutionInterface {
    /// Read a value from the contract-scoped storage.
    fn get_storage(&self, key: &[u8]) -> Vec<u8>;

    /// Write a value into the contract-scoped storage. Empty deletes.
    fn set_storage(&mut self, key: &[u8], value: &[u8]);

    fn current_nonce(&self) -> u64;
    fn current_round(&self) -> u64;
    fn current_epoch(&self) -> u32;

    /// Look up a peer account in the accounts database, `None` when the
    /// address has no peer record yet.
    fn get_existing_account(&self, address: &[u8]) -> Option<PeerAccount>;

    /// Selection chances the rating oracle assigns to a rating value.
    fn rater_chances(&self, rating: u32) -> u32;

    /// Append a value to the invocation's output buffer.
    fn finish(&mut self, value: &[u8]);

    /// Record a diagnostic message for the caller.
    fn add_log(&mut self, message: &str);

    /// Address the contract is deployed under.
    fn sc_address(&self) -> &[u8];
}
