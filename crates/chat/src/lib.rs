//! Client-side model of the chat widget: ordered turns plus a single-flight
//! request guard. Transport is left to the host.

pub mod session;
pub mod turn;

pub use session::*;
pub use turn::*;
