//! Connection state machine
//!
//! Defines how a device moves between idle and connected. The machine is
//! explicit, finite, and deterministic; caller intent is tracked alongside
//! it in [`PendingFlags`] until a servicing routine acts on it.

pub mod events;
pub mod machine;
pub mod pending;

pub use events::Event;
pub use machine::ConnectionState;
pub use pending::PendingFlags;
