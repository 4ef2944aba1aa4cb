//! Per-function caller gating.

/// Caller role a contract function is gated to.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RequiredCaller {
    Any,
    StakingAccess,
    JailAccess,
    EndOfEpoch,
    Owner,
}

/// Role required to invoke a function, `None` for unknown functions.
pub fn required_caller(function: &str) -> Option<RequiredCaller> {
    let required = match function {
        "_init" | "get" | "getRewardAddress" | "getBLSKeyStatus" | "getRemainingUnBondPeriod" => {
            RequiredCaller::Any
        }
        "stake" | "unStake" | "unBond" | "isStaked" | "unJail" | "getQueueSize"
        | "getQueueIndex" | "getQueueRegisterNonceAndRewardAddress" => {
            RequiredCaller::StakingAccess
        }
        "jail" => RequiredCaller::JailAccess,
        "switchJailedWithWaiting" | "updateConfigMinNodes" => RequiredCaller::EndOfEpoch,
        "slash" | "finalizeUnStake" => RequiredCaller::Owner,
        _ => return None,
    };
    Some(required)
}
