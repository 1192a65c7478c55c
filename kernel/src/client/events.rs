//! Events produced by the client handlers.

use crate::client::Height;
use crate::host::identifiers::{ClientId, ClientType};
use crate::prelude::*;

/// A new client was created.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateClient {
    pub client_id: ClientId,
    pub client_type: ClientType,
    pub consensus_height: Height,
}

impl CreateClient {
    pub fn new(client_id: ClientId, client_type: ClientType, consensus_height: Height) -> Self {
        Self {
            client_id,
            client_type,
            consensus_height,
        }
    }
}

/// A client consumed a header and advanced to new height(s).
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateClient {
    pub client_id: ClientId,
    pub client_type: ClientType,
    pub consensus_heights: Vec<Height>,
}

impl UpdateClient {
    pub fn new(client_id: ClientId, client_type: ClientType, consensus_heights: Vec<Height>) -> Self {
        Self {
            client_id,
            client_type,
            consensus_heights,
        }
    }
}

/// Misbehaviour was proven; the client is now frozen.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientMisbehaviour {
    pub client_id: ClientId,
    pub client_type: ClientType,
}

impl ClientMisbehaviour {
    pub fn new(client_id: ClientId, client_type: ClientType) -> Self {
        Self {
            client_id,
            client_type,
        }
    }
}
