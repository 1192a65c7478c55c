//! Context traits giving light clients access to their stored records.

use crate::client::state::{ClientStateExecution, ClientStateValidation, ConsensusState};
use crate::client::Height;
use crate::error::ProtocolError;
use crate::host::identifiers::ClientId;
use crate::host::path::{ClientConsensusStatePath, ClientStatePath};
use crate::prelude::*;
use crate::primitives::Timestamp;

/// Read access to client records. The associated `ClientStateRef` is how a
/// host plugs in its set of supported client types, typically an enum over
/// them keyed by client type, so new clients can be added without touching
/// the handshake or packet engines.
pub trait ClientValidationContext: Sized {
    type ClientStateRef: ClientStateValidation<Self>;
    type ConsensusStateRef: ConsensusState;

    /// Returns the client state for `client_id`.
    ///
    /// Clients store their state on creation and update; an unknown
    /// identifier is `ClientNotFound`.
    fn client_state(&self, client_id: &ClientId) -> Result<Self::ClientStateRef, ProtocolError>;

    /// Decodes client state bytes received in a message into the host's
    /// client state representation.
    fn decode_client_state(
        &self,
        client_state: &[u8],
    ) -> Result<Self::ClientStateRef, ProtocolError>;

    /// Returns the consensus state stored for the given client at the given
    /// height, or `ConsensusStateNotFound`, a transient condition the
    /// relayer resolves with a client update rather than a proof failure.
    fn consensus_state(
        &self,
        client_cons_state_path: &ClientConsensusStatePath,
    ) -> Result<Self::ConsensusStateRef, ProtocolError>;

    /// The host timestamp and height at which the consensus state for
    /// (`client_id`, `height`) was installed. Used to enforce connection
    /// delay periods.
    fn client_update_meta(
        &self,
        client_id: &ClientId,
        height: &Height,
    ) -> Result<(Timestamp, Height), ProtocolError>;
}

/// Write access to client records, used by `ClientStateExecution`
/// implementations.
pub trait ClientExecutionContext:
    ClientValidationContext<ClientStateRef = Self::ClientStateMut>
{
    type ClientStateMut: ClientStateExecution<Self>;

    fn client_state_mut(
        &self,
        client_id: &ClientId,
    ) -> Result<Self::ClientStateMut, ProtocolError> {
        self.client_state(client_id)
    }

    /// Called on successful client creation and update.
    fn store_client_state(
        &mut self,
        client_state_path: ClientStatePath,
        client_state: Self::ClientStateRef,
    ) -> Result<(), ProtocolError>;

    /// Called on successful client creation and update.
    fn store_consensus_state(
        &mut self,
        consensus_state_path: ClientConsensusStatePath,
        consensus_state: Self::ConsensusStateRef,
    ) -> Result<(), ProtocolError>;

    /// Records the host time and height at which the given client height
    /// was installed.
    fn store_update_meta(
        &mut self,
        client_id: ClientId,
        height: Height,
        host_timestamp: Timestamp,
        host_height: Height,
    ) -> Result<(), ProtocolError>;
}
