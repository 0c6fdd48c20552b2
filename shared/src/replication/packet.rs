use uiclass_serde::{BitReader, BitWriter, Serde, SerdeErr, UnsignedVariableInteger};

use crate::replication::message::{IncomingMessage, ReplicationMessage};

/// Packs messages into packets of at most `max_messages_per_packet`
/// messages each. A packet is a message count followed by the messages.
pub fn write_packets(
    messages: &[ReplicationMessage],
    max_messages_per_packet: usize,
) -> Vec<Box<[u8]>> {
    messages
        .chunks(max_messages_per_packet.max(1))
        .map(|chunk| {
            let mut writer = BitWriter::new();
            UnsignedVariableInteger::<7>::new(chunk.len() as u64).ser(&mut writer);
            for message in chunk {
                message.ser(&mut writer);
            }
            writer.to_bytes()
        })
        .collect()
}

/// Reads every message of a packet. Any framing error fails the whole
/// packet.
pub fn read_packet(payload: &[u8]) -> Result<Vec<IncomingMessage>, SerdeErr> {
    match read_packet_prefix(payload) {
        (messages, None) => Ok(messages),
        (_, Some(error)) => Err(error),
    }
}

/// Reads messages up to the first framing error. Returns the messages that
/// decoded before it, and the error if there was one. A bad header yields
/// no messages.
pub fn read_packet_prefix(payload: &[u8]) -> (Vec<IncomingMessage>, Option<SerdeErr>) {
    let mut reader = BitReader::new(payload);
    let count = match UnsignedVariableInteger::<7>::de(&mut reader)
        .and_then(|count| count.try_to::<usize>())
    {
        Ok(count) => count,
        Err(error) => return (Vec::new(), Some(error)),
    };
    // every message takes at least two bits
    if count > reader.bits_remaining() as usize / 2 {
        return (Vec::new(), Some(SerdeErr::UnexpectedEnd));
    }

    let mut messages = Vec::with_capacity(count);
    for _ in 0..count {
        match IncomingMessage::de(&mut reader) {
            Ok(message) => messages.push(message),
            Err(error) => return (messages, Some(error)),
        }
    }
    (messages, None)
}
