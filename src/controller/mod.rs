//! Match coordination.
//!
//! ## Key Types
//!
//! - `Controller`: Single-task state machine that owns the `Game`
//! - `ControllerHandle`: Cloneable sender the messaging layer calls into
//! - `Notification` / `Outbound`: What the controller asks for or announces
//! - `ControllerError`: Why a match stopped without a winner

pub mod error;
pub mod events;
pub mod handle;
pub mod machine;

pub use error::ControllerError;
pub use events::{BoardSnapshot, Notification, Outbound, PlayerEvent, Recipient, WorkerView};
pub use handle::ControllerHandle;
pub use machine::{Controller, MatchOutcome};
