pub mod config;
pub mod error;
pub mod io;
pub mod staking;
pub mod waiting;

pub use error::StateError;
pub use io::{decode_all, StateDecode, StateEncode};
