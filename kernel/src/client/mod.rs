//! The light-client layer: the verification contract concrete clients
//! implement, the heights and status they report, and the handlers that
//! drive client creation, updates, and misbehaviour freezing.

pub mod context;
pub mod error;
pub mod events;
pub mod handler;
mod height;
pub mod msgs;
mod state;
mod status;

pub use height::Height;
pub use state::{
    ClientStateCommon, ClientStateExecution, ClientStateValidation, ConsensusState,
};
pub use status::Status;
