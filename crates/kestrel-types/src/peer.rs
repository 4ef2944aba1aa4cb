//! Peer-account view exposed by the accounts database.
//!
//! The staking contract reads these records through the execution
//! interface to decide whether a validator may leave the network or be
//! released from jail. The contract never writes them.

/// Which consensus list a peer account currently belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PeerList {
    Eligible,
    Waiting,
    Leaving,
    Inactive,
    Jailed,
    Observer,
    New,
}

impl PeerList {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeerList::Eligible => "eligible",
            PeerList::Waiting => "waiting",
            PeerList::Leaving => "leaving",
            PeerList::Inactive => "inactive",
            PeerList::Jailed => "jailed",
            PeerList::Observer => "observer",
            PeerList::New => "new",
        }
    }
}

/// Snapshot of the fields the staking contract needs from a peer account.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PeerAccount {
    pub list: PeerList,
    pub temp_rating: u32,
}
