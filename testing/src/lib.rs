//! Test support for the bridge client: in-memory chains implementing the
//! client's collaborator traits, a litesvm-backed Solana for exercising
//! real transaction submission, and fixture builders.

pub mod chains;
pub mod fixtures;
