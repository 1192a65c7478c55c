//! Events returned by the `execute` half of each handler.
//!
//! Handlers never write events into the host store; they hand the full
//! list back to the caller, which decides how to publish them.

use crate::channel::events::{
    AcknowledgePacket, ChannelClosed, CloseConfirm as ChannelCloseConfirm,
    CloseInit as ChannelCloseInit, OpenAck as ChannelOpenAck, OpenConfirm as ChannelOpenConfirm,
    OpenInit as ChannelOpenInit, OpenTry as ChannelOpenTry, ReceivePacket, SendPacket,
    TimeoutPacket, WriteAcknowledgement,
};
use crate::client::events::{ClientMisbehaviour, CreateClient, UpdateClient};
use crate::connection::events::{
    OpenAck as ConnectionOpenAck, OpenConfirm as ConnectionOpenConfirm,
    OpenInit as ConnectionOpenInit, OpenTry as ConnectionOpenTry,
};
use crate::router::ModuleEvent;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IbcEvent {
    CreateClient(CreateClient),
    UpdateClient(UpdateClient),
    ClientMisbehaviour(ClientMisbehaviour),

    OpenInitConnection(ConnectionOpenInit),
    OpenTryConnection(ConnectionOpenTry),
    OpenAckConnection(ConnectionOpenAck),
    OpenConfirmConnection(ConnectionOpenConfirm),

    OpenInitChannel(ChannelOpenInit),
    OpenTryChannel(ChannelOpenTry),
    OpenAckChannel(ChannelOpenAck),
    OpenConfirmChannel(ChannelOpenConfirm),
    CloseInitChannel(ChannelCloseInit),
    CloseConfirmChannel(ChannelCloseConfirm),

    SendPacket(SendPacket),
    ReceivePacket(ReceivePacket),
    WriteAcknowledgement(WriteAcknowledgement),
    AcknowledgePacket(AcknowledgePacket),
    TimeoutPacket(TimeoutPacket),
    ChannelClosed(ChannelClosed),

    Module(ModuleEvent),
}

impl IbcEvent {
    pub fn event_type(&self) -> &str {
        match self {
            IbcEvent::CreateClient(_) => "create_client",
            IbcEvent::UpdateClient(_) => "update_client",
            IbcEvent::ClientMisbehaviour(_) => "client_misbehaviour",
            IbcEvent::OpenInitConnection(_) => "connection_open_init",
            IbcEvent::OpenTryConnection(_) => "connection_open_try",
            IbcEvent::OpenAckConnection(_) => "connection_open_ack",
            IbcEvent::OpenConfirmConnection(_) => "connection_open_confirm",
            IbcEvent::OpenInitChannel(_) => "channel_open_init",
            IbcEvent::OpenTryChannel(_) => "channel_open_try",
            IbcEvent::OpenAckChannel(_) => "channel_open_ack",
            IbcEvent::OpenConfirmChannel(_) => "channel_open_confirm",
            IbcEvent::CloseInitChannel(_) => "channel_close_init",
            IbcEvent::CloseConfirmChannel(_) => "channel_close_confirm",
            IbcEvent::SendPacket(_) => "send_packet",
            IbcEvent::ReceivePacket(_) => "recv_packet",
            IbcEvent::WriteAcknowledgement(_) => "write_acknowledgement",
            IbcEvent::AcknowledgePacket(_) => "acknowledge_packet",
            IbcEvent::TimeoutPacket(_) => "timeout_packet",
            IbcEvent::ChannelClosed(_) => "channel_close",
            IbcEvent::Module(event) => event.kind.as_str(),
        }
    }
}
