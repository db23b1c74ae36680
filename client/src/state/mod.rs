//! Layouts of the on-chain records the client reads.
//!
//! These mirror the bridge and relayer programs' account structs; the
//! programs own all writes, the client only decodes (and re-encodes in
//! fixtures). See [`crate::anchor`] for the discriminator handling.

pub mod bridge;
pub mod incoming_message;
pub mod outgoing_message;
pub mod relayer;

pub use bridge::*;
pub use incoming_message::*;
pub use outgoing_message::*;
pub use relayer::*;
