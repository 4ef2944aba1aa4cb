use kestrel_types::Address;
use num_bigint::BigUint;

/// Decoded call input for one contract invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContractCallInput {
    pub caller: Address,
    pub recipient: Address,
    pub call_value: BigUint,
    pub function: String,
    pub arguments: Vec<Vec<u8>>,
}

impl ContractCallInput {
    pub fn new(caller: Address, recipient: Address, function: &str) -> Self {
        ContractCallInput {
            caller,
            recipient,
            call_value: BigUint::default(),
            function: function.to_string(),
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Vec<u8>>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn with_call_value(mut self, call_value: BigUint) -> Self {
        self.call_value = call_value;
        self
    }
}
