//! [`SolanaReader`] and [`SolanaSubmitter`] over the nonblocking Solana
//! RPC client.

use async_trait::async_trait;
use solana_client::{
    client_error::{ClientError, ClientErrorKind},
    nonblocking::rpc_client::RpcClient,
};
use solana_program::pubkey::Pubkey;
use solana_sdk::{
    commitment_config::CommitmentConfig, hash::Hash, signature::Signature,
    transaction::Transaction,
};

use super::{SolanaReader, SolanaSubmitter};
use crate::error::{BridgeError, Result};

pub struct RpcSolanaChain {
    client: RpcClient,
}

impl RpcSolanaChain {
    /// Connects at `confirmed` commitment, the level the protocol assumes.
    pub fn new(rpc_url: &str) -> Self {
        Self::with_commitment(rpc_url, CommitmentConfig::confirmed())
    }

    pub fn with_commitment(rpc_url: &str, commitment: CommitmentConfig) -> Self {
        Self {
            client: RpcClient::new_with_commitment(rpc_url.to_string(), commitment),
        }
    }
}

#[async_trait]
impl SolanaReader for RpcSolanaChain {
    async fn get_account(&self, address: &Pubkey) -> Result<Option<Vec<u8>>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .map_err(read_error)?;
        Ok(response.value.map(|account| account.data))
    }

    async fn latest_blockhash(&self) -> Result<Hash> {
        self.client.get_latest_blockhash().await.map_err(read_error)
    }
}

#[async_trait]
impl SolanaSubmitter for RpcSolanaChain {
    async fn send_and_confirm(&self, transaction: &Transaction) -> Result<Signature> {
        self.client
            .send_and_confirm_transaction(transaction)
            .await
            .map_err(send_error)
    }
}

/// Reads either reach the node or they don't; every failure is worth a
/// retry.
fn read_error(err: ClientError) -> BridgeError {
    BridgeError::TransientNetwork(err.to_string())
}

/// Submissions must distinguish "never reached the cluster" from "the
/// cluster said no": the latter carries a reason that must be inspected
/// before any retry.
fn send_error(err: ClientError) -> BridgeError {
    match &err.kind {
        ClientErrorKind::Io(_) | ClientErrorKind::Reqwest(_) | ClientErrorKind::Middleware(_) => {
            BridgeError::TransientNetwork(err.to_string())
        }
        ClientErrorKind::RpcError(_)
        | ClientErrorKind::TransactionError(_)
        | ClientErrorKind::SigningError(_) => BridgeError::SubmissionRejected(err.to_string()),
        _ => BridgeError::TransientNetwork(err.to_string()),
    }
}
