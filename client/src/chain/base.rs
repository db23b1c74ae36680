//! [`BaseReader`] over an alloy HTTP provider.

use alloy::{
    providers::{DynProvider, Provider, ProviderBuilder},
    rpc::types::{TransactionInput, TransactionRequest},
};
use alloy_primitives::{Address, Bytes, TxKind, B256};
use async_trait::async_trait;

use super::{BaseLog, BaseReader, BaseReceipt};
use crate::error::{BridgeError, Result};

pub struct HttpBaseReader {
    provider: DynProvider,
}

impl HttpBaseReader {
    /// Connects to a Base JSON-RPC endpoint.
    pub async fn connect(rpc_url: &str) -> Result<Self> {
        let provider = ProviderBuilder::new()
            .connect(rpc_url)
            .await
            .map_err(|err| BridgeError::InvalidConfig(err.to_string()))?
            .erased();
        Ok(Self { provider })
    }
}

#[async_trait]
impl BaseReader for HttpBaseReader {
    async fn transaction_receipt(&self, tx_hash: B256) -> Result<BaseReceipt> {
        let receipt = self
            .provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|err| BridgeError::TransientNetwork(err.to_string()))?
            .ok_or_else(|| {
                BridgeError::MalformedSourceState(format!("no receipt for transaction {tx_hash}"))
            })?;

        let block_number = receipt.block_number.ok_or_else(|| {
            BridgeError::MalformedSourceState(format!("receipt for {tx_hash} is still pending"))
        })?;

        let logs = receipt
            .inner
            .logs()
            .iter()
            .map(|log| BaseLog {
                address: log.inner.address,
                topics: log.inner.data.topics().to_vec(),
                data: log.inner.data.data.clone(),
            })
            .collect();

        Ok(BaseReceipt { block_number, logs })
    }

    async fn call(&self, to: Address, data: Bytes, block_number: Option<u64>) -> Result<Bytes> {
        let request = TransactionRequest {
            to: Some(TxKind::Call(to)),
            input: TransactionInput::new(data),
            ..Default::default()
        };

        let mut call = self.provider.call(request);
        if let Some(number) = block_number {
            call = call.block(number.into());
        }

        call.await
            .map_err(|err| BridgeError::TransientNetwork(err.to_string()))
    }
}
