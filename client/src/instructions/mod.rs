//! Client-side builders for the bridge and relayer program instructions.
//!
//! Account orders and argument layouts mirror the on-chain programs; a
//! mismatch here produces transactions the programs reject.

pub mod bridge_sol;
pub mod pay_for_relay;
pub mod prove_message;
pub mod relay_message;

pub use bridge_sol::{bridge_sol, BridgeSolArgs};
pub use pay_for_relay::{pay_for_relay, PayForRelayArgs};
pub use prove_message::{prove_message, ProveMessageArgs};
pub use relay_message::{relay_message, transfer_remaining_accounts};
