//! Core primitives shared by the kestrel staking contract and its host VM.

/// Opaque account address as handed over by the host. Addresses are
/// variable-length byte strings; the contract never inspects their shape.
pub type Address = Vec<u8>;

/// A validator's BLS public key. Used verbatim as a storage key.
pub type BlsKey = Vec<u8>;

/// Return code handed back to the VM for every contract invocation.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ReturnCode {
    Ok = 0,
    FunctionNotFound = 1,
    UserError = 2,
    OutOfGas = 3,
    ContractInvalid = 4,
}

impl std::fmt::Display for ReturnCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            ReturnCode::Ok => "ok",
            ReturnCode::FunctionNotFound => "function not found",
            ReturnCode::UserError => "user error",
            ReturnCode::OutOfGas => "out of gas",
            ReturnCode::ContractInvalid => "contract invalid",
        };
        write!(f, "{}", text)
    }
}
