/// Hook invoked by the node's epoch-start notifier.
///
/// Subscribers flip internal activation flags here; no storage migration
/// happens on epoch change.
pub trait EpochSubscriber {
    fn handle_epoch_change(&self, new_epoch: u32);
}
