//! Workflow services module.

pub mod block;
pub mod contract;
pub mod submission;
pub mod transfer;
pub mod workflows;

pub use block::BlockService;
pub use contract::{ContractCaller, CounterContract, TransactOpts};
pub use submission::{ConfirmationPolicy, Submitter};
pub use transfer::{TransferRequest, TransferService};
pub use workflows::{run_counter, run_transfer, CounterReport, CounterStep};
