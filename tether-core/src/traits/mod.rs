//! Device contracts
//!
//! These traits define the interface between protocol clients, transport
//! drivers, and the scheduler that services them.

pub mod comm;
pub mod task;

pub use comm::CommDevice;
pub use task::Task;
