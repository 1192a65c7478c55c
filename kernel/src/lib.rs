//! Host-agnostic implementation of the IBC protocol core.
//!
//! The kernel contains the connection and channel handshake state machines,
//! the packet lifecycle (send, receive, acknowledge, timeout) and the
//! light-client verification interface they share. It owns no state and
//! performs no consensus verification of its own: all reads and writes go
//! through the [`host`] context traits, all proofs are checked by whichever
//! [`client`] implementation the host registered, and all application
//! callbacks are dispatched through the [`router`] traits.
//!
//! Every operation is a pure transition from (committed state, message,
//! proof) to (new state, events). Events produced by a transition are
//! returned to the caller rather than emitted ambiently, so relayers and
//! tests observe exactly what a transition did.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod prelude;

pub mod channel;
pub mod client;
pub mod commitment;
pub mod connection;
pub mod entrypoint;
pub mod error;
pub mod events;
pub mod host;
pub mod primitives;
pub mod router;

pub use entrypoint::{dispatch, execute, validate};
pub use error::ProtocolError;
pub use events::IbcEvent;
