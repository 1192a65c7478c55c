//! Handlers driving the consumed light-client capability: client creation
//! and client updates (including misbehaviour freezing).

pub mod create_client;
pub mod update_client;
