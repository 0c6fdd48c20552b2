use uiclass_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedInteger};

use crate::{
    replication::channel_kinds::ChannelKind, types::InstanceId, value::typed_value::TypedValue,
};

/// Messages exchanged between an authority and its observers
#[derive(Clone, Debug, PartialEq)]
pub enum ReplicationMessage {
    /// Observer -> Authority, opens (or re-opens) a connection
    Connect,
    /// Observer -> Authority
    Disconnect,
    /// Observer -> Authority, asks for the current value of every live
    /// instance on a channel
    SyncRequest { channel: ChannelKind },
    /// Authority -> Observer, one field value of one instance
    ValuePush {
        channel: ChannelKind,
        instance_id: InstanceId,
        value: TypedValue,
    },
}

impl ReplicationMessage {
    fn kind(&self) -> u8 {
        match self {
            ReplicationMessage::Connect => 0,
            ReplicationMessage::Disconnect => 1,
            ReplicationMessage::SyncRequest { .. } => 2,
            ReplicationMessage::ValuePush { .. } => 3,
        }
    }
}

impl Serde for ReplicationMessage {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedInteger::<2>::new(self.kind()).ser(writer);
        match self {
            ReplicationMessage::Connect | ReplicationMessage::Disconnect => {}
            ReplicationMessage::SyncRequest { channel } => channel.ser(writer),
            ReplicationMessage::ValuePush {
                channel,
                instance_id,
                value,
            } => {
                channel.ser(writer);
                instance_id.ser(writer);
                value.ser(writer);
            }
        }
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        match IncomingMessage::de(reader)? {
            IncomingMessage::Message(message) => Ok(message),
            IncomingMessage::Unsupported { reason, .. } => Err(reason),
        }
    }
}

/// A decoded message. A value push whose value this build can't decode is
/// still framed correctly, so it is surfaced instead of failing the packet.
#[derive(Clone, Debug, PartialEq)]
pub enum IncomingMessage {
    Message(ReplicationMessage),
    Unsupported {
        channel: ChannelKind,
        instance_id: InstanceId,
        reason: SerdeErr,
    },
}

impl IncomingMessage {
    pub fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let kind: u8 = UnsignedInteger::<2>::de(reader)?.try_to()?;
        let message = match kind {
            0 => ReplicationMessage::Connect,
            1 => ReplicationMessage::Disconnect,
            2 => ReplicationMessage::SyncRequest {
                channel: ChannelKind::de(reader)?,
            },
            3 => {
                let channel = ChannelKind::de(reader)?;
                let instance_id = InstanceId::de(reader)?;
                match TypedValue::read_framed(reader)? {
                    Ok(value) => ReplicationMessage::ValuePush {
                        channel,
                        instance_id,
                        value,
                    },
                    Err(reason) => {
                        return Ok(IncomingMessage::Unsupported {
                            channel,
                            instance_id,
                            reason,
                        })
                    }
                }
            }
            tag => {
                return Err(SerdeErr::UnknownTag {
                    type_name: "ReplicationMessage",
                    tag,
                })
            }
        };
        Ok(IncomingMessage::Message(message))
    }
}
