//! Inclusion proofs for Base -> Solana messages.
//!
//! The client's share of the work is locating the one registration event a
//! bridging transaction produced and fetching the sibling path against the
//! MMR root as of the anchored block. Verifying the path belongs to the
//! bridge program on Solana.

use alloy_primitives::{Address, B256};
use alloy_sol_types::{SolCall, SolEvent};
use tracing::debug;

use crate::{
    chain::{BaseReader, BaseReceipt},
    error::{BridgeError, Result},
    evm::BaseBridge,
};

/// A decoded `MessageInitiated` event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InitiatedEvent {
    /// Envelope hash; keys the incoming-message account on Solana.
    pub message_hash: B256,
    /// MMR root after appending this message.
    pub mmr_root: B256,
    /// Leaf index of the message in the MMR.
    pub nonce: u64,
    pub sender: [u8; 32],
    pub data: Vec<u8>,
}

/// An event plus the sibling path proving its inclusion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageProof {
    pub event: InitiatedEvent,
    /// Ordered leaf-to-root sibling hashes, passed through untouched.
    pub proof: Vec<[u8; 32]>,
}

/// Finds the single `MessageInitiated` event the bridge contract emitted in
/// this receipt.
///
/// The protocol assumes a 1:1 transaction-to-message relationship, so zero
/// or multiple matches mean the reference is not a bridging transaction (or
/// indexing broke) and fail with [`BridgeError::MalformedSourceState`].
pub fn find_initiated_event(receipt: &BaseReceipt, bridge_contract: Address) -> Result<InitiatedEvent> {
    let mut events = Vec::new();
    for log in &receipt.logs {
        if log.address != bridge_contract {
            continue;
        }
        if log.topics.first() != Some(&BaseBridge::MessageInitiated::SIGNATURE_HASH) {
            continue;
        }
        let event = BaseBridge::MessageInitiated::decode_raw_log(log.topics.iter().copied(), &log.data)
            .map_err(|err| {
                BridgeError::MalformedSourceState(format!(
                    "undecodable MessageInitiated log: {err}"
                ))
            })?;
        events.push(event);
    }

    debug!(count = events.len(), "found MessageInitiated event(s)");
    if events.len() != 1 {
        return Err(BridgeError::MalformedSourceState(format!(
            "expected exactly one MessageInitiated event, found {}",
            events.len()
        )));
    }

    let event = events.remove(0);
    Ok(InitiatedEvent {
        message_hash: event.messageHash,
        mmr_root: event.mmrRoot,
        nonce: event.message.nonce,
        sender: event.message.sender.0,
        data: event.message.data.to_vec(),
    })
}

/// Generates the inclusion proof for the message registered by `tx_hash`,
/// anchored at `anchor_height`.
///
/// # Errors
///
/// [`BridgeError::NotYetFinalized`] if the transaction's block is newer
/// than the anchored height; retry once the oracle advances. Proofs are not
/// single-use, but the anchor may move between attempts, so regenerate
/// against the latest height on every retry.
pub async fn generate_proof<B: BaseReader + ?Sized>(
    base: &B,
    bridge_contract: Address,
    tx_hash: B256,
    anchor_height: u64,
) -> Result<MessageProof> {
    let receipt = base.transaction_receipt(tx_hash).await?;
    if receipt.block_number > anchor_height {
        return Err(BridgeError::NotYetFinalized {
            anchor: anchor_height,
            event: receipt.block_number,
        });
    }

    let event = find_initiated_event(&receipt, bridge_contract)?;
    debug!(
        message_hash = %event.message_hash,
        nonce = event.nonce,
        block = receipt.block_number,
        "generating proof at anchored block"
    );

    let calldata = BaseBridge::generateProofCall { nonce: event.nonce }.abi_encode();
    let raw = base
        .call(bridge_contract, calldata.into(), Some(anchor_height))
        .await?;
    let proof = BaseBridge::generateProofCall::abi_decode_returns(&raw).map_err(|err| {
        BridgeError::MalformedSourceState(format!("undecodable generateProof response: {err}"))
    })?;

    Ok(MessageProof {
        event,
        proof: proof.into_iter().map(|word| word.0).collect(),
    })
}
