//! Test support for the protocol kernel: an in-memory [`context::MockContext`]
//! implementing the host traits, a [`clients::MockClientState`] light client
//! that trusts every proof, a [`router::DummyModule`] application, and
//! fixture builders for messages.
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

pub mod clients;
pub mod context;
pub mod fixtures;
pub mod router;
