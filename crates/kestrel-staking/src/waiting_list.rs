//! The waiting list: an ordered queue of BLS keys laid out as a
//! doubly-linked list in flat KV storage.
//!
//! All pointer surgery happens inside this type; handlers only see
//! `push_back`, `insert_after_last_jailed`, `pop_front`, `remove` and the
//! read-only walks. Every mutation persists the touched elements and the
//! head record before returning, so callers observe a consistent chain.

use kestrel_types::{BlsKey, WaitingListElement, WaitingListHead};
use kestrel_vm::ExecutionInterface;

use crate::error::StakingError;
use crate::storage;

pub struct WaitingList {
    head: WaitingListHead,
}

impl WaitingList {
    pub fn load<E: ExecutionInterface>(ei: &E) -> Result<Self, StakingError> {
        Ok(WaitingList {
            head: storage::waiting_list_head(ei)?,
        })
    }

    pub fn len(&self) -> u32 {
        self.head.length
    }

    pub fn is_empty(&self) -> bool {
        self.head.length == 0
    }

    pub fn head(&self) -> &WaitingListHead {
        &self.head
    }

    /// Append a key at the tail of the queue.
    pub fn push_back<E: ExecutionInterface>(
        &mut self,
        ei: &mut E,
        bls_key: &[u8],
    ) -> Result<(), StakingError> {
        let key = storage::element_key(bls_key);
        self.assert_not_queued(ei, &key)?;

        if self.head.first_key.is_empty() {
            storage::save_waiting_element(ei, &key, &new_element(bls_key, &[], &[]));
            self.head.first_key = key.clone();
            self.head.last_key = key;
        } else {
            let last_key = self.head.last_key.clone();
            let mut last = self.element(ei, &last_key, "tail element missing")?;
            last.next_key = key.clone();
            storage::save_waiting_element(ei, &last_key, &last);
            storage::save_waiting_element(ei, &key, &new_element(bls_key, &[], &last_key));
            self.head.last_key = key;
        }

        self.head.length += 1;
        self.save_head(ei);
        Ok(())
    }

    /// Re-queue a previously jailed key.
    ///
    /// Jailed keys form a prefix block in jail order: with no jailed key
    /// queued the new key becomes the head, otherwise it lands right
    /// after the current `last_jailed_key`. Either way the pointer then
    /// names this key.
    pub fn insert_after_last_jailed<E: ExecutionInterface>(
        &mut self,
        ei: &mut E,
        bls_key: &[u8],
    ) -> Result<(), StakingError> {
        let key = storage::element_key(bls_key);
        self.assert_not_queued(ei, &key)?;

        if self.head.last_jailed_key.is_empty() {
            if self.head.first_key.is_empty() {
                storage::save_waiting_element(ei, &key, &new_element(bls_key, &[], &[]));
                self.head.last_key = key.clone();
            } else {
                let old_first_key = self.head.first_key.clone();
                let mut old_first = self.element(ei, &old_first_key, "head element missing")?;
                old_first.previous_key = key.clone();
                storage::save_waiting_element(ei, &old_first_key, &old_first);
                storage::save_waiting_element(ei, &key, &new_element(bls_key, &old_first_key, &[]));
            }
            self.head.first_key = key.clone();
        } else {
            let anchor_key = self.head.last_jailed_key.clone();
            let mut anchor = self.element(ei, &anchor_key, "last jailed element missing")?;
            let next_key = anchor.next_key.clone();
            anchor.next_key = key.clone();
            storage::save_waiting_element(ei, &anchor_key, &anchor);

            if next_key.is_empty() {
                self.head.last_key = key.clone();
            } else {
                let mut next = self.element(ei, &next_key, "successor element missing")?;
                next.previous_key = key.clone();
                storage::save_waiting_element(ei, &next_key, &next);
            }
            storage::save_waiting_element(ei, &key, &new_element(bls_key, &next_key, &anchor_key));
        }

        self.head.last_jailed_key = key;
        self.head.length += 1;
        self.save_head(ei);
        Ok(())
    }

    /// Remove the head of the queue, returning its BLS key.
    pub fn pop_front<E: ExecutionInterface>(
        &mut self,
        ei: &mut E,
    ) -> Result<Option<BlsKey>, StakingError> {
        if self.head.first_key.is_empty() {
            return Ok(None);
        }

        let first_key = self.head.first_key.clone();
        let first = self.element(ei, &first_key, "head element missing")?;

        if self.head.last_jailed_key == first_key {
            self.head.last_jailed_key.clear();
        }
        self.head.first_key = first.next_key.clone();
        if first.next_key.is_empty() {
            self.head.last_key.clear();
        } else {
            let mut next = self.element(ei, &first.next_key, "successor element missing")?;
            next.previous_key.clear();
            storage::save_waiting_element(ei, &first.next_key, &next);
        }

        self.decrement_length()?;
        storage::delete_waiting_element(ei, &first_key);
        self.save_head(ei);
        Ok(Some(first.bls_key))
    }

    /// Splice a key out of the queue, wherever it sits.
    pub fn remove<E: ExecutionInterface>(
        &mut self,
        ei: &mut E,
        bls_key: &[u8],
    ) -> Result<(), StakingError> {
        let key = storage::element_key(bls_key);
        let removed = self
            .element_opt(ei, &key)?
            .ok_or(StakingError::Precondition("key is not in the waiting list"))?;

        if self.head.last_jailed_key == key {
            self.head.last_jailed_key.clear();
        }

        if removed.previous_key.is_empty() {
            self.head.first_key = removed.next_key.clone();
        } else {
            let mut previous = self.element(ei, &removed.previous_key, "predecessor missing")?;
            previous.next_key = removed.next_key.clone();
            storage::save_waiting_element(ei, &removed.previous_key, &previous);
        }

        if removed.next_key.is_empty() {
            self.head.last_key = removed.previous_key.clone();
        } else {
            let mut next = self.element(ei, &removed.next_key, "successor missing")?;
            next.previous_key = removed.previous_key.clone();
            storage::save_waiting_element(ei, &removed.next_key, &next);
        }

        self.decrement_length()?;
        storage::delete_waiting_element(ei, &key);
        self.save_head(ei);
        Ok(())
    }

    /// 1-based position of a key, `None` when it is not queued.
    pub fn position<E: ExecutionInterface>(
        &self,
        ei: &E,
        bls_key: &[u8],
    ) -> Result<Option<u32>, StakingError> {
        let keys = self.walk(ei)?;
        Ok(keys
            .iter()
            .position(|queued| queued == bls_key)
            .map(|index| index as u32 + 1))
    }

    /// BLS keys in queue order, validating chain length on the way.
    pub fn walk<E: ExecutionInterface>(&self, ei: &E) -> Result<Vec<BlsKey>, StakingError> {
        let mut keys = Vec::with_capacity(self.head.length as usize);
        let mut cursor = self.head.first_key.clone();

        while !cursor.is_empty() {
            if keys.len() as u32 >= self.head.length {
                return Err(StakingError::Inconsistent("chain longer than recorded length"));
            }
            let element = self.element(ei, &cursor, "broken chain link")?;
            keys.push(element.bls_key);
            cursor = element.next_key;
        }

        if keys.len() as u32 != self.head.length {
            return Err(StakingError::Inconsistent("chain shorter than recorded length"));
        }
        Ok(keys)
    }

    fn save_head<E: ExecutionInterface>(&self, ei: &mut E) {
        storage::save_waiting_list_head(ei, &self.head);
    }

    fn decrement_length(&mut self) -> Result<(), StakingError> {
        self.head.length = self
            .head
            .length
            .checked_sub(1)
            .ok_or(StakingError::Inconsistent("length underflow"))?;
        Ok(())
    }

    fn assert_not_queued<E: ExecutionInterface>(
        &self,
        ei: &E,
        element_key: &[u8],
    ) -> Result<(), StakingError> {
        if self.element_opt(ei, element_key)?.is_some() {
            return Err(StakingError::Precondition("key is already in the waiting list"));
        }
        Ok(())
    }

    fn element_opt<E: ExecutionInterface>(
        &self,
        ei: &E,
        element_key: &[u8],
    ) -> Result<Option<WaitingListElement>, StakingError> {
        Ok(storage::waiting_element(ei, element_key)?)
    }

    fn element<E: ExecutionInterface>(
        &self,
        ei: &E,
        element_key: &[u8],
        missing: &'static str,
    ) -> Result<WaitingListElement, StakingError> {
        self.element_opt(ei, element_key)?
            .ok_or(StakingError::Inconsistent(missing))
    }
}

fn new_element(bls_key: &[u8], next_key: &[u8], previous_key: &[u8]) -> WaitingListElement {
    WaitingListElement {
        bls_key: bls_key.to_vec(),
        next_key: next_key.to_vec(),
        previous_key: previous_key.to_vec(),
    }
}
