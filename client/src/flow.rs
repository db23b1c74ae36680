//! End-to-end flows in the Solana -> Base direction.
//!
//! Initiation locks value and writes an `OutgoingMessage` account derived
//! from a fresh salt; relay payment rides in the same atomic transaction;
//! monitoring recomputes the envelope hash from the on-chain record and
//! watches Base for the success marker.

use alloy_primitives::Address;
use solana_sdk::{pubkey::Pubkey, signature::Signature, signer::Signer};
use tracing::info;

use crate::{
    anchor,
    chain::{BaseReader, SolanaReader, SolanaSubmitter},
    config::BridgeConfig,
    error::{BridgeError, Result},
    evm::{self, EvmMessage},
    instructions::{self, BridgeSolArgs, PayForRelayArgs},
    monitor::{self, ExecutionStatus},
    pda,
    state::{Bridge, Call, OutgoingMessage, RelayerConfig},
    submit,
};

/// An outbound transfer request.
#[derive(Clone, Debug)]
pub struct OutboundTransfer {
    /// Base recipient.
    pub to: Address,
    /// Wrapped SOL's ERC-20 on Base.
    pub remote_token: Address,
    /// Lamports to bridge.
    pub amount: u64,
    /// Optional call to run on Base after the transfer.
    pub call: Option<Call>,
    /// Buy automatic relay from the relayer program in the same
    /// transaction.
    pub auto_relay: bool,
}

/// Handle on a submitted outbound message.
#[derive(Clone, Debug)]
pub struct OutboundHandle {
    pub outgoing_message: Pubkey,
    pub signature: Signature,
}

/// Drives Solana -> Base messages over the chain collaborators.
pub struct SolanaToBase<'a, B: BaseReader + ?Sized, S: SolanaReader + SolanaSubmitter + ?Sized> {
    config: &'a BridgeConfig,
    base: &'a B,
    solana: &'a S,
}

impl<'a, B, S> SolanaToBase<'a, B, S>
where
    B: BaseReader + ?Sized,
    S: SolanaReader + SolanaSubmitter + ?Sized,
{
    pub fn new(config: &'a BridgeConfig, base: &'a B, solana: &'a S) -> Self {
        Self { config, base, solana }
    }

    /// Locks lamports and registers the outgoing message, optionally
    /// paying for automatic relay in the same transaction.
    pub async fn bridge_sol(
        &self,
        payer: &dyn Signer,
        transfer: &OutboundTransfer,
    ) -> Result<OutboundHandle> {
        let bridge = self.bridge_state().await?;
        let (salt, outgoing_message) =
            pda::generate_outgoing_message(&self.config.bridge_program)?;
        info!(%outgoing_message, "derived outgoing message account");

        let args = BridgeSolArgs {
            outgoing_message_salt: salt,
            to: evm::evm_address_bytes(&transfer.to),
            remote_token: evm::evm_address_bytes(&transfer.remote_token),
            amount: transfer.amount,
            call: transfer.call.clone(),
        };
        let mut ixs = vec![instructions::bridge_sol(
            &self.config.bridge_program,
            &payer.pubkey(),
            &payer.pubkey(),
            &bridge.gas_config.gas_fee_receiver,
            &args,
        )?];

        if transfer.auto_relay {
            let relayer = self.relayer_state().await?;
            let (mtr_salt, message_to_relay) =
                pda::generate_message_to_relay(&self.config.relayer_program)?;
            info!(%message_to_relay, "derived relay payment account");
            ixs.push(instructions::pay_for_relay(
                &self.config.relayer_program,
                &payer.pubkey(),
                &relayer.gas_config.gas_fee_receiver,
                &PayForRelayArgs {
                    outgoing_message,
                    gas_limit: self.config.pay_for_relay_gas_limit,
                    mtr_salt,
                },
            )?);
        }

        let signature = submit::submit(self.solana, &self.config.submit, &ixs, payer).await?;
        Ok(OutboundHandle { outgoing_message, signature })
    }

    /// Renders the committed outgoing message for the Base side, envelope
    /// hash included. Always recomputed from freshly fetched state.
    pub async fn outgoing_evm_message(&self, outgoing_message: &Pubkey) -> Result<EvmMessage> {
        let data = self
            .solana
            .get_account(outgoing_message)
            .await?
            .ok_or_else(|| {
                BridgeError::MalformedSourceState(format!(
                    "outgoing message {outgoing_message} does not exist"
                ))
            })?;
        let outgoing: OutgoingMessage = anchor::decode_account(OutgoingMessage::NAME, &data)?;
        Ok(evm::build_evm_message(
            outgoing_message,
            &outgoing,
            self.config.relay_gas_limit,
        ))
    }

    /// Watches Base until the relayer has executed the message. The
    /// envelope hash is computed once, up front.
    pub async fn monitor(&self, outgoing_message: &Pubkey) -> Result<ExecutionStatus> {
        let message = self.outgoing_evm_message(outgoing_message).await?;
        info!(
            inner = %message.inner_hash,
            outer = %message.outer_hash,
            "watching for automatic relay"
        );
        monitor::await_execution(
            self.base,
            self.config.base_bridge,
            message.outer_hash,
            &self.config.monitor,
        )
        .await
    }

    /// Initiation and monitoring in one call.
    pub async fn bridge_and_await(
        &self,
        payer: &dyn Signer,
        transfer: &OutboundTransfer,
    ) -> Result<(OutboundHandle, ExecutionStatus)> {
        let handle = self.bridge_sol(payer, transfer).await?;
        let status = self.monitor(&handle.outgoing_message).await?;
        Ok((handle, status))
    }

    async fn bridge_state(&self) -> Result<Bridge> {
        let (address, _) = pda::bridge_address(&self.config.bridge_program)?;
        let data = self.solana.get_account(&address).await?.ok_or_else(|| {
            BridgeError::MalformedSourceState("bridge account does not exist".into())
        })?;
        anchor::decode_account(Bridge::NAME, &data)
    }

    async fn relayer_state(&self) -> Result<RelayerConfig> {
        let (address, _) = pda::relayer_config_address(&self.config.relayer_program)?;
        let data = self.solana.get_account(&address).await?.ok_or_else(|| {
            BridgeError::MalformedSourceState("relayer config account does not exist".into())
        })?;
        anchor::decode_account(RelayerConfig::NAME, &data)
    }
}
