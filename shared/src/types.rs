use std::fmt;

use uiclass_serde::{BitReader, BitWrite, Serde, SerdeErr, UnsignedVariableInteger};

/// Which side of the replication protocol a process plays
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HostType {
    /// Owns the canonical copy of replicated state
    Authority,
    /// Receives replicated state, never originates it
    Observer,
}

/// Per-class instance identifier, assigned in creation order starting at 1
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(u32);

impl InstanceId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl Serde for InstanceId {
    fn ser(&self, writer: &mut dyn BitWrite) {
        UnsignedVariableInteger::<7>::new(self.0).ser(writer);
    }

    fn de(reader: &mut BitReader) -> Result<Self, SerdeErr> {
        let value: u32 = UnsignedVariableInteger::<7>::de(reader)?.try_to()?;
        Ok(Self(value))
    }
}
