//! Message envelopes and the top-level `validate`/`execute`/`dispatch`
//! entrypoints a host calls for every protocol message it receives.

use crate::channel::handler::acknowledgement::{
    acknowledgement_packet_execute, acknowledgement_packet_validate,
};
use crate::channel::handler::chan_close_confirm::{
    chan_close_confirm_execute, chan_close_confirm_validate,
};
use crate::channel::handler::chan_close_init::{chan_close_init_execute, chan_close_init_validate};
use crate::channel::handler::chan_open_ack::{chan_open_ack_execute, chan_open_ack_validate};
use crate::channel::handler::chan_open_confirm::{
    chan_open_confirm_execute, chan_open_confirm_validate,
};
use crate::channel::handler::chan_open_init::{chan_open_init_execute, chan_open_init_validate};
use crate::channel::handler::chan_open_try::{chan_open_try_execute, chan_open_try_validate};
use crate::channel::handler::recv_packet::{recv_packet_execute, recv_packet_validate};
use crate::channel::handler::timeout::{
    timeout_packet_execute, timeout_packet_validate, TimeoutMsgType,
};
use crate::channel::handler::timeout_on_close::timeout_on_close_packet_validate;
use crate::channel::msgs::{
    MsgAcknowledgement, MsgChannelCloseConfirm, MsgChannelCloseInit, MsgChannelOpenAck,
    MsgChannelOpenConfirm, MsgChannelOpenInit, MsgChannelOpenTry, MsgRecvPacket, MsgTimeout,
    MsgTimeoutOnClose,
};
use crate::client::handler::{create_client, update_client};
use crate::client::msgs::{MsgCreateClient, MsgUpdateClient};
use crate::connection::handler::{
    conn_open_ack, conn_open_confirm, conn_open_init, conn_open_try,
};
use crate::connection::msgs::{
    MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit, MsgConnectionOpenTry,
};
use crate::error::ProtocolError;
use crate::events::IbcEvent;
use crate::host::identifiers::PortId;
use crate::host::{ExecutionContext, ValidationContext};
use crate::prelude::*;
use crate::router::{ModuleId, Router, RouterError};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMsg {
    CreateClient(MsgCreateClient),
    UpdateClient(MsgUpdateClient),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectionMsg {
    OpenInit(MsgConnectionOpenInit),
    OpenTry(MsgConnectionOpenTry),
    OpenAck(MsgConnectionOpenAck),
    OpenConfirm(MsgConnectionOpenConfirm),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChannelMsg {
    OpenInit(MsgChannelOpenInit),
    OpenTry(MsgChannelOpenTry),
    OpenAck(MsgChannelOpenAck),
    OpenConfirm(MsgChannelOpenConfirm),
    CloseInit(MsgChannelCloseInit),
    CloseConfirm(MsgChannelCloseConfirm),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PacketMsg {
    Recv(MsgRecvPacket),
    Ack(MsgAcknowledgement),
    Timeout(MsgTimeout),
    TimeoutOnClose(MsgTimeoutOnClose),
}

/// Every message the protocol accepts, in one envelope.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MsgEnvelope {
    Client(ClientMsg),
    Connection(ConnectionMsg),
    Channel(ChannelMsg),
    Packet(PacketMsg),
}

/// The port whose module must be consulted for a channel message.
fn channel_msg_port(msg: &ChannelMsg) -> &PortId {
    match msg {
        ChannelMsg::OpenInit(msg) => &msg.port_id_on_a,
        ChannelMsg::OpenTry(msg) => &msg.port_id_on_b,
        ChannelMsg::OpenAck(msg) => &msg.port_id_on_a,
        ChannelMsg::OpenConfirm(msg) => &msg.port_id_on_b,
        ChannelMsg::CloseInit(msg) => &msg.port_id_on_a,
        ChannelMsg::CloseConfirm(msg) => &msg.port_id_on_b,
    }
}

/// The port whose module must be consulted for a packet message: the
/// receiving port for deliveries, the sending port for acknowledgements
/// and timeouts.
fn packet_msg_port(msg: &PacketMsg) -> &PortId {
    match msg {
        PacketMsg::Recv(msg) => &msg.packet.port_id_on_b,
        PacketMsg::Ack(msg) => &msg.packet.port_id_on_a,
        PacketMsg::Timeout(msg) => &msg.packet.port_id_on_a,
        PacketMsg::TimeoutOnClose(msg) => &msg.packet.port_id_on_a,
    }
}

fn lookup_module(router: &impl Router, port_id: &PortId) -> Result<ModuleId, RouterError> {
    router
        .lookup_module(port_id)
        .ok_or(RouterError::UnknownPort {
            port_id: port_id.clone(),
        })
}

/// Checks a message against committed state without changing anything.
pub fn validate<Ctx>(ctx: &Ctx, router: &impl Router, msg: MsgEnvelope) -> Result<(), ProtocolError>
where
    Ctx: ValidationContext,
{
    match msg {
        MsgEnvelope::Client(msg) => match msg {
            ClientMsg::CreateClient(msg) => create_client::validate(ctx, &msg),
            ClientMsg::UpdateClient(msg) => update_client::validate(ctx, &msg),
        },
        MsgEnvelope::Connection(msg) => match msg {
            ConnectionMsg::OpenInit(msg) => conn_open_init::validate(ctx, &msg),
            ConnectionMsg::OpenTry(msg) => conn_open_try::validate(ctx, &msg),
            ConnectionMsg::OpenAck(msg) => conn_open_ack::validate(ctx, &msg),
            ConnectionMsg::OpenConfirm(msg) => conn_open_confirm::validate(ctx, &msg),
        },
        MsgEnvelope::Channel(msg) => {
            let module_id = lookup_module(router, channel_msg_port(&msg))?;
            let module = router
                .get_route(&module_id)
                .ok_or(RouterError::MissingModule {
                    module_id: module_id.clone(),
                })?;

            match msg {
                ChannelMsg::OpenInit(msg) => chan_open_init_validate(ctx, module, &msg),
                ChannelMsg::OpenTry(msg) => chan_open_try_validate(ctx, module, &msg),
                ChannelMsg::OpenAck(msg) => chan_open_ack_validate(ctx, module, &msg),
                ChannelMsg::OpenConfirm(msg) => chan_open_confirm_validate(ctx, module, &msg),
                ChannelMsg::CloseInit(msg) => chan_close_init_validate(ctx, module, &msg),
                ChannelMsg::CloseConfirm(msg) => chan_close_confirm_validate(ctx, module, &msg),
            }
        }
        MsgEnvelope::Packet(msg) => {
            let module_id = lookup_module(router, packet_msg_port(&msg))?;
            let module = router
                .get_route(&module_id)
                .ok_or(RouterError::MissingModule {
                    module_id: module_id.clone(),
                })?;

            match msg {
                PacketMsg::Recv(msg) => recv_packet_validate(ctx, &msg),
                PacketMsg::Ack(msg) => acknowledgement_packet_validate(ctx, module, &msg),
                PacketMsg::Timeout(msg) => timeout_packet_validate(ctx, module, &msg),
                PacketMsg::TimeoutOnClose(msg) => {
                    timeout_on_close_packet_validate(ctx, module, &msg)
                }
            }
        }
    }
}

/// Applies a message and returns the events it produced. Assumes the
/// message was validated first; `dispatch` does both.
pub fn execute<Ctx>(
    ctx: &mut Ctx,
    router: &mut impl Router,
    msg: MsgEnvelope,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    match msg {
        MsgEnvelope::Client(msg) => match msg {
            ClientMsg::CreateClient(msg) => create_client::execute(ctx, msg),
            ClientMsg::UpdateClient(msg) => update_client::execute(ctx, msg),
        },
        MsgEnvelope::Connection(msg) => match msg {
            ConnectionMsg::OpenInit(msg) => conn_open_init::execute(ctx, msg),
            ConnectionMsg::OpenTry(msg) => conn_open_try::execute(ctx, msg),
            ConnectionMsg::OpenAck(msg) => conn_open_ack::execute(ctx, msg),
            ConnectionMsg::OpenConfirm(msg) => conn_open_confirm::execute(ctx, msg),
        },
        MsgEnvelope::Channel(msg) => {
            let module_id = lookup_module(router, channel_msg_port(&msg))?;
            let module = router
                .get_route_mut(&module_id)
                .ok_or(RouterError::MissingModule {
                    module_id: module_id.clone(),
                })?;

            match msg {
                ChannelMsg::OpenInit(msg) => chan_open_init_execute(ctx, module, msg),
                ChannelMsg::OpenTry(msg) => chan_open_try_execute(ctx, module, msg),
                ChannelMsg::OpenAck(msg) => chan_open_ack_execute(ctx, module, msg),
                ChannelMsg::OpenConfirm(msg) => chan_open_confirm_execute(ctx, module, msg),
                ChannelMsg::CloseInit(msg) => chan_close_init_execute(ctx, module, msg),
                ChannelMsg::CloseConfirm(msg) => chan_close_confirm_execute(ctx, module, msg),
            }
        }
        MsgEnvelope::Packet(msg) => {
            let module_id = lookup_module(router, packet_msg_port(&msg))?;
            let module = router
                .get_route_mut(&module_id)
                .ok_or(RouterError::MissingModule {
                    module_id: module_id.clone(),
                })?;

            match msg {
                PacketMsg::Recv(msg) => recv_packet_execute(ctx, module, msg),
                PacketMsg::Ack(msg) => acknowledgement_packet_execute(ctx, module, msg),
                PacketMsg::Timeout(msg) => {
                    timeout_packet_execute(ctx, module, TimeoutMsgType::Timeout(msg))
                }
                PacketMsg::TimeoutOnClose(msg) => {
                    timeout_packet_execute(ctx, module, TimeoutMsgType::TimeoutOnClose(msg))
                }
            }
        }
    }
}

/// Validates and, on success, executes a message. This is the transition
/// function of the protocol: a failed message leaves the store untouched.
pub fn dispatch<Ctx>(
    ctx: &mut Ctx,
    router: &mut impl Router,
    msg: MsgEnvelope,
) -> Result<Vec<IbcEvent>, ProtocolError>
where
    Ctx: ExecutionContext,
{
    validate(ctx, router, msg.clone())?;
    execute(ctx, router, msg)
}
