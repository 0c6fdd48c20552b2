use std::collections::{HashMap, VecDeque};

use log::warn;

use crate::{
    class::class_kinds::ClassKind, replication::channel_kinds::ChannelKind, types::InstanceId,
    value::typed_value::TypedValue,
};

/// Value pushes received for an instance that doesn't exist locally yet.
/// They are replayed, in arrival order, once the instance is created.
pub struct PushWaitlist {
    pending: HashMap<(ClassKind, InstanceId), VecDeque<(ChannelKind, TypedValue)>>,
    len: usize,
    capacity: usize,
}

impl PushWaitlist {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: HashMap::new(),
            len: 0,
            capacity,
        }
    }

    /// Returns false, and drops the push, when the waitlist is full
    pub fn queue(
        &mut self,
        class: ClassKind,
        instance_id: InstanceId,
        channel: ChannelKind,
        value: TypedValue,
    ) -> bool {
        if self.len >= self.capacity {
            warn!(
                "Push waitlist is full ({} entries), dropping push for instance {}",
                self.capacity, instance_id
            );
            return false;
        }
        self.pending
            .entry((class, instance_id))
            .or_default()
            .push_back((channel, value));
        self.len += 1;
        true
    }

    /// Removes and returns every push waiting on this instance
    pub fn take(
        &mut self,
        class: ClassKind,
        instance_id: InstanceId,
    ) -> Option<VecDeque<(ChannelKind, TypedValue)>> {
        let pushes = self.pending.remove(&(class, instance_id))?;
        self.len -= pushes.len();
        Some(pushes)
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.len = 0;
    }
}
