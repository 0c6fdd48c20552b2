pub mod channel_kinds;
pub mod message;
pub mod mutation;
pub mod packet;
pub mod waitlist;
