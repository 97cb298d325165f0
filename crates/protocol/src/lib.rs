//! Wire types shared by the chat widget and the relay backend.

pub mod protocol;

pub use protocol::*;
