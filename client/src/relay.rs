//! The relay state machine for Base -> Solana messages.
//!
//! A message advances `Initiated -> Provable -> Proven -> Executed`, keyed
//! by its envelope hash. Position is never cached: every decision re-reads
//! chain state, so flows can be cancelled, retried, or resumed from another
//! process without coordination. Idempotence is enforced before every
//! write: proving re-checks for an existing incoming-message account, and
//! execution short-circuits on the `executed` flag, so an already-completed
//! step is a success no-op rather than a wasted (or doomed) transaction.

use alloy_primitives::B256;
use solana_sdk::signer::Signer;
use tracing::{debug, info};

use crate::{
    anchor,
    chain::{BaseReader, SolanaReader, SolanaSubmitter},
    config::BridgeConfig,
    error::{BridgeError, Result},
    instructions::{self, ProveMessageArgs},
    pda,
    proof::{self, MessageProof},
    state::{Bridge, IncomingMessage},
    submit,
};

/// Relay lifecycle of one cross-chain message. Ordered: later states
/// subsume earlier ones, and no backward transition exists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum MessageState {
    /// Registered on Base, not yet coverable by the anchored output root.
    Initiated,
    /// The anchored root covers the message's block; a proof can be built.
    Provable,
    /// The destination accepted a proof and holds the incoming-message
    /// account.
    Proven,
    /// The destination executed the message. Terminal.
    Executed,
}

/// Where a relay attempt got to, and what stopped it. The furthest state is
/// reported even on failure so a caller can resume without replaying
/// completed steps.
#[derive(Debug)]
pub struct RelayReport {
    /// Envelope hash, once the registration event has been located.
    pub message_hash: Option<B256>,
    pub reached: MessageState,
    pub error: Option<BridgeError>,
}

/// Drives Base -> Solana messages over the chain collaborators.
pub struct BaseToSolana<'a, B: BaseReader + ?Sized, S: SolanaReader + SolanaSubmitter + ?Sized> {
    config: &'a BridgeConfig,
    base: &'a B,
    solana: &'a S,
}

impl<'a, B, S> BaseToSolana<'a, B, S>
where
    B: BaseReader + ?Sized,
    S: SolanaReader + SolanaSubmitter + ?Sized,
{
    pub fn new(config: &'a BridgeConfig, base: &'a B, solana: &'a S) -> Self {
        Self { config, base, solana }
    }

    /// Highest Base block covered by an output root on Solana. Fetched
    /// fresh on every use; the oracle advances it underneath us.
    pub async fn anchor_height(&self) -> Result<u64> {
        let (bridge, _) = pda::bridge_address(&self.config.bridge_program)?;
        let data = self.solana.get_account(&bridge).await?.ok_or_else(|| {
            BridgeError::MalformedSourceState("bridge account does not exist".into())
        })?;
        let bridge: Bridge = anchor::decode_account(Bridge::NAME, &data)?;
        Ok(bridge.base_block_number)
    }

    /// Whether the message registered by `tx_hash` can be proven yet. The
    /// boundary is inclusive: a message in the anchored block itself is
    /// provable.
    pub async fn is_provable(&self, tx_hash: B256) -> Result<bool> {
        let anchor_height = self.anchor_height().await?;
        let receipt = self.base.transaction_receipt(tx_hash).await?;
        debug!(anchor_height, event_block = receipt.block_number, "provability check");
        Ok(receipt.block_number <= anchor_height)
    }

    /// The incoming-message account for an envelope hash, if the proof has
    /// been accepted.
    pub async fn incoming_message(&self, message_hash: &B256) -> Result<Option<IncomingMessage>> {
        let (address, _) =
            pda::incoming_message_address(&self.config.bridge_program, &message_hash.0)?;
        match self.solana.get_account(&address).await? {
            None => Ok(None),
            Some(data) => anchor::decode_account(IncomingMessage::NAME, &data).map(Some),
        }
    }

    /// Reconstructs the message's current state from chain reads alone.
    pub async fn status(&self, tx_hash: B256) -> Result<MessageState> {
        let receipt = self.base.transaction_receipt(tx_hash).await?;
        let event = proof::find_initiated_event(&receipt, self.config.base_bridge)?;

        if let Some(incoming) = self.incoming_message(&event.message_hash).await? {
            return Ok(if incoming.executed {
                MessageState::Executed
            } else {
                MessageState::Proven
            });
        }

        let anchor_height = self.anchor_height().await?;
        Ok(if receipt.block_number <= anchor_height {
            MessageState::Provable
        } else {
            MessageState::Initiated
        })
    }

    /// Proves the message on Solana and returns its envelope hash.
    ///
    /// # Errors
    ///
    /// [`BridgeError::NotYetFinalized`] while the anchored root trails the
    /// message's block; retry later, regenerating the proof against the
    /// then-current anchor.
    pub async fn prove(&self, payer: &dyn Signer, tx_hash: B256) -> Result<B256> {
        let anchor_height = self.anchor_height().await?;
        let proof = proof::generate_proof(
            self.base,
            self.config.base_bridge,
            tx_hash,
            anchor_height,
        )
        .await?;
        self.submit_proof(payer, anchor_height, &proof).await?;
        Ok(proof.event.message_hash)
    }

    /// Submits `prove_message` unless the destination already holds the
    /// record (a retry after an indeterminate failure must not buy a
    /// guaranteed-to-fail duplicate).
    async fn submit_proof(
        &self,
        payer: &dyn Signer,
        anchor_height: u64,
        proof: &MessageProof,
    ) -> Result<()> {
        let message_hash = proof.event.message_hash;
        if self.incoming_message(&message_hash).await?.is_some() {
            info!(%message_hash, "message already proven, skipping submission");
            return Ok(());
        }

        let args = ProveMessageArgs {
            nonce: proof.event.nonce,
            sender: proof.event.sender,
            data: proof.event.data.clone(),
            proof: proof.proof.clone(),
            message_hash: message_hash.0,
        };
        let ix = instructions::prove_message(
            &self.config.bridge_program,
            &payer.pubkey(),
            anchor_height,
            &args,
        )?;
        submit::submit(self.solana, &self.config.submit, &[ix], payer).await?;
        info!(%message_hash, nonce = proof.event.nonce, "message proven");
        Ok(())
    }

    /// Executes a proven message. Already-executed messages are a success
    /// no-op: no transaction is built or sent.
    pub async fn execute(&self, payer: &dyn Signer, message_hash: B256) -> Result<()> {
        let incoming = self.incoming_message(&message_hash).await?.ok_or_else(|| {
            BridgeError::MalformedSourceState(format!(
                "incoming message {message_hash} has not been proven"
            ))
        })?;

        if incoming.executed {
            info!(%message_hash, "message already executed");
            return Ok(());
        }

        let remaining =
            instructions::transfer_remaining_accounts(&self.config.bridge_program, &incoming.message)?;
        let (message_address, _) =
            pda::incoming_message_address(&self.config.bridge_program, &message_hash.0)?;
        let ix = instructions::relay_message(
            &self.config.bridge_program,
            &message_address,
            remaining,
        )?;
        submit::submit(self.solana, &self.config.submit, &[ix], payer).await?;
        info!(%message_hash, "message executed");
        Ok(())
    }

    /// Drives the message to `Executed`, reporting the furthest state
    /// reached plus the terminal error.
    pub async fn run(&self, payer: &dyn Signer, tx_hash: B256) -> RelayReport {
        let mut reached = MessageState::Initiated;
        let mut message_hash = None;
        let error = self
            .advance(payer, tx_hash, &mut reached, &mut message_hash)
            .await
            .err();
        RelayReport { message_hash, reached, error }
    }

    async fn advance(
        &self,
        payer: &dyn Signer,
        tx_hash: B256,
        reached: &mut MessageState,
        message_hash: &mut Option<B256>,
    ) -> Result<()> {
        let anchor_height = self.anchor_height().await?;
        let proof = proof::generate_proof(
            self.base,
            self.config.base_bridge,
            tx_hash,
            anchor_height,
        )
        .await?;
        *reached = MessageState::Provable;
        *message_hash = Some(proof.event.message_hash);

        self.submit_proof(payer, anchor_height, &proof).await?;
        *reached = MessageState::Proven;

        self.execute(payer, proof.event.message_hash).await?;
        *reached = MessageState::Executed;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_are_ordered() {
        assert!(MessageState::Initiated < MessageState::Provable);
        assert!(MessageState::Provable < MessageState::Proven);
        assert!(MessageState::Proven < MessageState::Executed);
    }
}
