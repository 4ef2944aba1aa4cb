use kestrel_serde::StateError;
use thiserror::Error;

/// Errors raised while wiring the contract into a node, before any call
/// is executed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StakingSetupError {
    #[error("invalid staking access address")]
    InvalidStakingAccessAddress,
    #[error("invalid jail access address")]
    InvalidJailAccessAddress,
    #[error("invalid end of epoch access address")]
    InvalidEndOfEpochAddress,
    #[error("minimum stake value must be a positive number")]
    InvalidMinStakeValue,
}

/// Internal error taxonomy of the action handlers.
///
/// Every variant collapses to `ReturnCode::UserError` at the dispatch
/// boundary; the message is pushed into the EI log so callers can tell
/// the cases apart.
#[derive(Debug, Error)]
pub enum StakingError {
    #[error("function not recognized: {0}")]
    UnknownFunction(String),
    #[error("{0}")]
    AccessDenied(&'static str),
    #[error("{0}")]
    InvalidArguments(&'static str),
    #[error("{0}")]
    Precondition(&'static str),
    #[error("state decode failed: {0}")]
    Decode(#[from] StateError),
    #[error("waiting list inconsistent: {0}")]
    Inconsistent(&'static str),
}
