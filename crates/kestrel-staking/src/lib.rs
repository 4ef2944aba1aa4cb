pub mod access;
pub mod bleed;
pub mod config;
pub mod contract;
pub mod error;
pub mod storage;
pub mod waiting_list;

pub use config::StakingConfig;
pub use contract::{StakingContract, StakingContractArgs, INIT_FUNCTION};
pub use error::{StakingError, StakingSetupError};
pub use waiting_list::WaitingList;
