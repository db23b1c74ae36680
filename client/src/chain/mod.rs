//! The narrow contracts the client requires from its chain collaborators.
//!
//! Transport is deliberately external: these traits carry exactly the reads
//! and the one write the protocol needs, so tests substitute in-memory
//! chains and production wires in RPC. Signing goes through
//! [`solana_sdk::signer::Signer`] and is never inspected.

use alloy_primitives::{Address, Bytes, B256};
use async_trait::async_trait;
use solana_program::pubkey::Pubkey;
use solana_sdk::{hash::Hash, signature::Signature, transaction::Transaction};

use crate::error::Result;

pub mod base;
pub mod solana;

pub use base::HttpBaseReader;
pub use solana::RpcSolanaChain;

/// One log entry of a Base transaction receipt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
}

/// A confirmed Base transaction's receipt, reduced to what the protocol
/// consumes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BaseReceipt {
    pub block_number: u64,
    pub logs: Vec<BaseLog>,
}

/// Read-only view of Base.
#[async_trait]
pub trait BaseReader: Send + Sync {
    /// Receipt of a confirmed transaction. Missing receipts are an error:
    /// callers hold references to transactions they know landed.
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<BaseReceipt>;

    /// `eth_call` against `to`, optionally pinned to a historic block.
    async fn call(&self, to: Address, data: Bytes, block_number: Option<u64>) -> Result<Bytes>;
}

/// Read-only view of Solana.
#[async_trait]
pub trait SolanaReader: Send + Sync {
    /// Raw account data, or `None` if the account does not exist.
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>>;

    async fn latest_blockhash(&self) -> Result<Hash>;
}

/// The single write path into Solana: a fully signed transaction, confirmed
/// before returning.
#[async_trait]
pub trait SolanaSubmitter: Send + Sync {
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature>;
}
