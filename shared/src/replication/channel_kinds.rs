use std::collections::HashMap;

use uiclass_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

use crate::{class::class_kinds::ClassKind, protocol::ProtocolError};

/// Network id of one `(class, field)` replication channel
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelKind(u16);

impl ChannelKind {
    pub(crate) fn new(net_id: u16) -> Self {
        Self(net_id)
    }
}

impl Serde for ChannelKind {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<7>::new(self.0).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let net_id: u16 = UnsignedVariableInteger::<7>::de(reader)?.try_to()?;
        Ok(Self(net_id))
    }
}

/// Which accessor of which class a channel carries
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelRoute {
    pub class: ClassKind,
    pub accessor_index: usize,
}

/// Every replication channel of a locked protocol.
///
/// Channels are named `"{Class}.{field}"` and numbered by their position in
/// the sorted name list, so any two builds declaring the same replicated
/// fields agree on the numbering.
#[derive(Clone, Default)]
pub struct ChannelKinds {
    names: Vec<String>,
    routes: Vec<ChannelRoute>,
    kind_map: HashMap<String, ChannelKind>,
}

impl ChannelKinds {
    pub fn channel_name(class_name: &str, field_name: &str) -> String {
        format!("{}.{}", class_name, field_name)
    }

    pub(crate) fn build(
        mut entries: Vec<(String, ChannelRoute)>,
    ) -> Result<Self, ProtocolError> {
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        if u16::try_from(entries.len()).is_err() {
            return Err(ProtocolError::TooManyChannels);
        }

        let mut channel_kinds = Self::default();
        for (index, (name, route)) in entries.into_iter().enumerate() {
            let kind = ChannelKind(index as u16);
            if channel_kinds.kind_map.insert(name.clone(), kind).is_some() {
                return Err(ProtocolError::DuplicateChannelName { name });
            }
            channel_kinds.names.push(name);
            channel_kinds.routes.push(route);
        }
        Ok(channel_kinds)
    }

    pub fn kind_of(&self, name: &str) -> Option<ChannelKind> {
        self.kind_map.get(name).copied()
    }

    pub fn name(&self, kind: ChannelKind) -> Option<&str> {
        self.names.get(kind.0 as usize).map(String::as_str)
    }

    pub fn route(&self, kind: ChannelKind) -> Option<ChannelRoute> {
        self.routes.get(kind.0 as usize).copied()
    }

    pub fn kinds(&self) -> impl Iterator<Item = ChannelKind> + '_ {
        (0..self.names.len()).map(|index| ChannelKind(index as u16))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
