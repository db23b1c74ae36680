#![doc = include_str!("../README.md")]

pub mod anchor;
pub mod chain;
pub mod config;
pub mod error;
pub mod evm;
pub mod flow;
pub mod instructions;
pub mod monitor;
pub mod pda;
pub mod proof;
pub mod relay;
pub mod state;
pub mod submit;
pub mod token_factory;

pub use config::BridgeConfig;
pub use error::{BridgeError, Result};
pub use relay::{BaseToSolana, MessageState, RelayReport};
