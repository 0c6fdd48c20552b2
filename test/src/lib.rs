pub mod helpers;

pub use helpers::*;
pub use local_socket::{LocalSocket, LocalSocketHub};
pub use test_protocol::{protocol, RANK};
