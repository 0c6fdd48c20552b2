use std::mem;

use uiclass_shared::{ChannelKind, InstanceId};

use crate::ClientError;

pub struct Events {
    updates: Vec<(ChannelKind, InstanceId)>,
    errors: Vec<ClientError>,
    empty: bool,
}

impl Events {
    pub(crate) fn new() -> Self {
        Self {
            updates: Vec::new(),
            errors: Vec::new(),
            empty: true,
        }
    }

    // Public

    pub fn is_empty(&self) -> bool {
        self.empty
    }

    /// Remote values that passed the local setter pipeline, in arrival
    /// order
    pub fn take_updates(&mut self) -> Vec<(ChannelKind, InstanceId)> {
        mem::take(&mut self.updates)
    }

    pub fn take_errors(&mut self) -> Vec<ClientError> {
        mem::take(&mut self.errors)
    }

    // Crate-public

    pub(crate) fn push_update(&mut self, channel: ChannelKind, instance_id: InstanceId) {
        self.updates.push((channel, instance_id));
        self.empty = false;
    }

    pub(crate) fn push_error(&mut self, error: ClientError) {
        self.errors.push(error);
        self.empty = false;
    }
}
