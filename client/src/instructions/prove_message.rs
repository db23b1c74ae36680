use anchor_lang::prelude::borsh;
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_program::{pubkey::Pubkey, system_program};
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::{anchor, error::Result, pda};

/// Arguments of the bridge program's `prove_message` instruction.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ProveMessageArgs {
    /// Leaf index of the message in the Base MMR.
    pub nonce: u64,
    pub sender: [u8; 32],
    /// The registered message payload, exactly as emitted on Base.
    pub data: Vec<u8>,
    /// Ordered sibling path from leaf to the anchored root.
    pub proof: Vec<[u8; 32]>,
    /// Envelope hash; the program re-derives it and keys the new
    /// incoming-message account by it.
    pub message_hash: [u8; 32],
}

/// Proves a Base -> Solana message against the output root recorded for
/// `anchor_height`, creating its incoming-message account.
pub fn prove_message(
    bridge_program: &Pubkey,
    payer: &Pubkey,
    anchor_height: u64,
    args: &ProveMessageArgs,
) -> Result<Instruction> {
    let (output_root, _) = pda::output_root_address(bridge_program, anchor_height)?;
    let (message, _) = pda::incoming_message_address(bridge_program, &args.message_hash)?;
    let (bridge, _) = pda::bridge_address(bridge_program)?;

    Ok(Instruction {
        program_id: *bridge_program,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new_readonly(output_root, false),
            AccountMeta::new(message, false),
            AccountMeta::new_readonly(bridge, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: anchor::instruction_data("prove_message", args)?,
    })
}
