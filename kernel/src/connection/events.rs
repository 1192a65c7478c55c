//! Events produced by the connection handshake handlers.

use crate::host::identifiers::{ClientId, ConnectionId};

/// `conn_open_init` recorded a new connection end in state `Init`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenInit {
    pub conn_id_on_a: ConnectionId,
    pub client_id_on_a: ClientId,
    pub client_id_on_b: ClientId,
}

impl OpenInit {
    pub fn new(
        conn_id_on_a: ConnectionId,
        client_id_on_a: ClientId,
        client_id_on_b: ClientId,
    ) -> Self {
        Self {
            conn_id_on_a,
            client_id_on_a,
            client_id_on_b,
        }
    }
}

/// `conn_open_try` recorded a new connection end in state `TryOpen`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenTry {
    pub conn_id_on_b: ConnectionId,
    pub client_id_on_b: ClientId,
    pub conn_id_on_a: ConnectionId,
    pub client_id_on_a: ClientId,
}

impl OpenTry {
    pub fn new(
        conn_id_on_b: ConnectionId,
        client_id_on_b: ClientId,
        conn_id_on_a: ConnectionId,
        client_id_on_a: ClientId,
    ) -> Self {
        Self {
            conn_id_on_b,
            client_id_on_b,
            conn_id_on_a,
            client_id_on_a,
        }
    }
}

/// `conn_open_ack` moved the initiating end to `Open`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenAck {
    pub conn_id_on_a: ConnectionId,
    pub client_id_on_a: ClientId,
    pub conn_id_on_b: ConnectionId,
    pub client_id_on_b: ClientId,
}

impl OpenAck {
    pub fn new(
        conn_id_on_a: ConnectionId,
        client_id_on_a: ClientId,
        conn_id_on_b: ConnectionId,
        client_id_on_b: ClientId,
    ) -> Self {
        Self {
            conn_id_on_a,
            client_id_on_a,
            conn_id_on_b,
            client_id_on_b,
        }
    }
}

/// `conn_open_confirm` moved the accepting end to `Open`.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OpenConfirm {
    pub conn_id_on_b: ConnectionId,
    pub client_id_on_b: ClientId,
    pub conn_id_on_a: ConnectionId,
    pub client_id_on_a: ClientId,
}

impl OpenConfirm {
    pub fn new(
        conn_id_on_b: ConnectionId,
        client_id_on_b: ClientId,
        conn_id_on_a: ConnectionId,
        client_id_on_a: ClientId,
    ) -> Self {
        Self {
            conn_id_on_b,
            client_id_on_b,
            conn_id_on_a,
            client_id_on_a,
        }
    }
}
