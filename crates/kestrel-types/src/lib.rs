pub mod peer;
pub mod primitives;
pub mod state_config;
pub mod state_staking;
pub mod state_waiting;

pub use peer::{PeerAccount, PeerList};
pub use primitives::{Address, BlsKey, ReturnCode};
pub use state_config::NodesConfig;
pub use state_staking::{KeyStatus, StakedData, DEFAULT_UNSTAKED_EPOCH, NEVER_JAILED_ROUND};
pub use state_waiting::{WaitingListElement, WaitingListHead};
