use crate::{replication::channel_kinds::ChannelKind, types::InstanceId, value::typed_value::TypedValue};

/// A committed change of a replicated field, waiting to be broadcast
#[derive(Clone, Debug, PartialEq)]
pub struct FieldMutation {
    pub channel: ChannelKind,
    pub instance_id: InstanceId,
    pub value: TypedValue,
}

impl FieldMutation {
    pub fn new(channel: ChannelKind, instance_id: InstanceId, value: TypedValue) -> Self {
        Self {
            channel,
            instance_id,
            value,
        }
    }
}

/// Mutations in commit order
#[derive(Default)]
pub struct MutationQueue {
    queue: Vec<FieldMutation>,
}

impl MutationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mutation: FieldMutation) {
        self.queue.push(mutation);
    }

    pub fn take(&mut self) -> Vec<FieldMutation> {
        std::mem::take(&mut self.queue)
    }
}
