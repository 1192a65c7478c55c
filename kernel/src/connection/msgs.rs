//! Connection handshake messages.
//!
//! Field names carry the chain they refer to: `_on_a` lives on the chain
//! that initiated the handshake, `_on_b` on the counterparty. Proof fields
//! are named after the record they prove.

use core::time::Duration;

use crate::client::Height;
use crate::commitment::CommitmentProofBytes;
use crate::connection::version::Version;
use crate::connection::Counterparty;
use crate::host::identifiers::{ClientId, ConnectionId};
use crate::prelude::*;
use crate::primitives::Signer;

/// Starts the handshake on chain A. No proofs: nothing exists yet on B.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgConnectionOpenInit {
    pub client_id_on_a: ClientId,
    /// B's client of A and B's commitment prefix; B has no connection
    /// identifier yet.
    pub counterparty: Counterparty,
    /// Pin the handshake to one version, or `None` to propose all
    /// compatible versions.
    pub version: Option<Version>,
    pub delay_period: Duration,
    pub signer: Signer,
}

/// Relays A's `Init` record to chain B.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgConnectionOpenTry {
    pub client_id_on_b: ClientId,
    /// A's end of the handshake, connection identifier included.
    pub counterparty: Counterparty,
    /// B's own client state as A stores it, for `validate_self_client`.
    pub client_state_of_b_on_a: Vec<u8>,
    pub versions_on_a: Vec<Version>,
    pub proof_conn_end_on_a: CommitmentProofBytes,
    pub proof_client_state_of_b_on_a: CommitmentProofBytes,
    pub proof_consensus_state_of_b_on_a: CommitmentProofBytes,
    /// Height of A at which all three proofs above were generated.
    pub proofs_height_on_a: Height,
    /// Height of B that A's client of B had consumed when the proofs were
    /// generated.
    pub consensus_height_of_b_on_a: Height,
    pub delay_period: Duration,
    pub signer: Signer,
}

/// Relays B's `TryOpen` record back to chain A.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgConnectionOpenAck {
    pub conn_id_on_a: ConnectionId,
    pub conn_id_on_b: ConnectionId,
    /// A's own client state as B stores it, for `validate_self_client`.
    pub client_state_of_a_on_b: Vec<u8>,
    pub proof_conn_end_on_b: CommitmentProofBytes,
    pub proof_client_state_of_a_on_b: CommitmentProofBytes,
    pub proof_consensus_state_of_a_on_b: CommitmentProofBytes,
    pub proofs_height_on_b: Height,
    pub consensus_height_of_a_on_b: Height,
    /// The single version B selected.
    pub version: Version,
    pub signer: Signer,
}

/// Relays A's `Open` record to chain B, completing the handshake.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MsgConnectionOpenConfirm {
    pub conn_id_on_b: ConnectionId,
    pub proof_conn_end_on_a: CommitmentProofBytes,
    pub proof_height_on_a: Height,
    pub signer: Signer,
}
