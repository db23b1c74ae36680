use anchor_lang::prelude::borsh;
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_program::{pubkey::Pubkey, system_program};
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::{anchor, error::Result, pda};

/// Arguments of the relayer program's `pay_for_relay` instruction.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct PayForRelayArgs {
    /// The outgoing-message account whose relay is being bought.
    pub outgoing_message: Pubkey,
    /// Destination gas to fund.
    pub gas_limit: u64,
    /// Salt deriving the relay-payment record.
    pub mtr_salt: [u8; 32],
}

/// Pays the relayer to deliver an outgoing message to Base. Submitted in
/// the same transaction as `bridge_sol`, so a message is never initiated
/// without its relay being funded.
pub fn pay_for_relay(
    relayer_program: &Pubkey,
    payer: &Pubkey,
    gas_fee_receiver: &Pubkey,
    args: &PayForRelayArgs,
) -> Result<Instruction> {
    let (cfg, _) = pda::relayer_config_address(relayer_program)?;
    let (message_to_relay, _) = pda::message_to_relay_address(relayer_program, &args.mtr_salt)?;

    Ok(Instruction {
        program_id: *relayer_program,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(cfg, false),
            AccountMeta::new(*gas_fee_receiver, false),
            AccountMeta::new(message_to_relay, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: anchor::instruction_data("pay_for_relay", args)?,
    })
}
