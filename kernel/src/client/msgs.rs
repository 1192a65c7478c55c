//! Client-layer protocol messages.

use crate::prelude::*;
use crate::primitives::Signer;
use crate::host::identifiers::ClientId;

/// Registers a new light client. The client and consensus state bytes are
/// opaque to the kernel; the host's client layer decodes them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgCreateClient {
    pub client_state: Vec<u8>,
    pub consensus_state: Vec<u8>,
    pub signer: Signer,
}

/// Submits a client message: either a header to advance the client or
/// misbehaviour evidence to freeze it. The concrete client decides which
/// it is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgUpdateClient {
    pub client_id: ClientId,
    pub client_message: Vec<u8>,
    pub signer: Signer,
}
