use anchor_lang::prelude::borsh;
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_program::{pubkey::Pubkey, system_program};
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::{anchor, error::Result, pda, state::Call};

/// Arguments of the bridge program's `bridge_sol` instruction.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BridgeSolArgs {
    /// Salt deriving the outgoing-message account; fresh randomness per
    /// message keeps derivations collision-free.
    pub outgoing_message_salt: [u8; 32],
    /// Base recipient.
    pub to: [u8; 20],
    /// Wrapped SOL's ERC-20 address on Base.
    pub remote_token: [u8; 20],
    /// Lamports to lock and mint on the far side.
    pub amount: u64,
    /// Optional call to run on Base after the transfer.
    pub call: Option<Call>,
}

/// Locks lamports in the vault and writes the outgoing-message account that
/// carries them to Base.
pub fn bridge_sol(
    bridge_program: &Pubkey,
    payer: &Pubkey,
    from: &Pubkey,
    gas_fee_receiver: &Pubkey,
    args: &BridgeSolArgs,
) -> Result<Instruction> {
    let (sol_vault, _) = pda::sol_vault_address(bridge_program, &args.remote_token)?;
    let (bridge, _) = pda::bridge_address(bridge_program)?;
    let (outgoing_message, _) =
        pda::outgoing_message_address(bridge_program, &args.outgoing_message_salt)?;

    Ok(Instruction {
        program_id: *bridge_program,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(*from, true),
            AccountMeta::new(*gas_fee_receiver, false),
            AccountMeta::new(sol_vault, false),
            AccountMeta::new(bridge, false),
            AccountMeta::new(outgoing_message, false),
            AccountMeta::new_readonly(system_program::ID, false),
        ],
        data: anchor::instruction_data("bridge_sol", args)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_against_derived_accounts() {
        let program = Pubkey::new_unique();
        let payer = Pubkey::new_unique();
        let receiver = Pubkey::new_unique();
        let args = BridgeSolArgs {
            outgoing_message_salt: [9; 32],
            to: [1; 20],
            remote_token: [2; 20],
            amount: 1_000_000,
            call: None,
        };

        let ix = bridge_sol(&program, &payer, &payer, &receiver, &args).unwrap();
        assert_eq!(ix.accounts.len(), 7);
        assert!(ix.accounts[0].is_signer);
        assert!(ix.accounts[1].is_signer);
        assert_eq!(ix.accounts[2].pubkey, receiver);
        assert_eq!(
            ix.accounts[3].pubkey,
            pda::sol_vault_address(&program, &[2; 20]).unwrap().0
        );
        assert_eq!(
            ix.accounts[5].pubkey,
            pda::outgoing_message_address(&program, &[9; 32]).unwrap().0
        );
        assert_eq!(ix.data[..8], anchor::instruction_discriminator("bridge_sol"));
    }
}
