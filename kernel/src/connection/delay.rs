//! Enforcement of the connection `delay_period` on packet proofs.

use crate::client::context::ClientValidationContext;
use crate::client::Height;
use crate::connection::error::ConnectionError;
use crate::connection::ConnectionEnd;
use crate::error::ProtocolError;
use crate::host::ValidationContext;

/// Checks that both the time and the block component of the connection's
/// delay period have elapsed since the client consumed the consensus state
/// at `packet_proof_height`.
pub fn verify_conn_delay_passed<Ctx>(
    ctx: &Ctx,
    packet_proof_height: Height,
    connection_end: &ConnectionEnd,
) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    let current_host_time = ctx.host_timestamp()?;
    let current_host_height = ctx.host_height()?;

    // When the client was updated past the proof height on this chain.
    let client_id = connection_end.client_id();
    let (last_update_time, last_update_height) = ctx
        .get_client_validation_context()
        .client_update_meta(client_id, &packet_proof_height)?;

    let conn_delay_time = connection_end.delay_period();
    let conn_delay_blocks = ctx.block_delay(&conn_delay_time);

    let earliest_valid_time =
        (last_update_time + conn_delay_time).map_err(ConnectionError::TimestampOverflow)?;
    if current_host_time < earliest_valid_time {
        return Err(ConnectionError::NotEnoughTimeElapsed {
            current_host_time,
            earliest_valid_time,
        }
        .into());
    }

    let earliest_valid_height = last_update_height.add(conn_delay_blocks);
    if current_host_height < earliest_valid_height {
        return Err(ConnectionError::NotEnoughBlocksElapsed {
            current_host_height,
            earliest_valid_height,
        }
        .into());
    }

    Ok(())
}
