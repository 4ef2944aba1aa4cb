pub mod context;
pub mod epoch;
pub mod input;
pub mod interface;

pub use context::InMemoryVmContext;
pub use epoch::EpochSubscriber;
pub use input::ContractCallInput;
pub use interface::ExecutionInterface;
