use anchor_lang::prelude::borsh;
use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_program::{pubkey::Pubkey, system_program};
use solana_sdk::instruction::{AccountMeta, Instruction};

use crate::{
    anchor,
    error::{BridgeError, Result},
    pda,
    state::{IncomingPayload, IncomingTransfer},
};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
struct RelayMessageArgs;

/// Executes a proven incoming message. The transfer and bundled-instruction
/// accounts ride as remaining accounts, assembled by
/// [`transfer_remaining_accounts`].
pub fn relay_message(
    bridge_program: &Pubkey,
    message: &Pubkey,
    remaining_accounts: Vec<AccountMeta>,
) -> Result<Instruction> {
    let (bridge, _) = pda::bridge_address(bridge_program)?;

    let mut accounts = vec![
        AccountMeta::new(*message, false),
        AccountMeta::new(bridge, false),
    ];
    accounts.extend(remaining_accounts);

    Ok(Instruction {
        program_id: *bridge_program,
        accounts,
        data: anchor::instruction_data("relay_message", &RelayMessageArgs)?,
    })
}

/// Remaining accounts for a transfer payload: the vault and recipient
/// first, then every bundled instruction's accounts, then the bundled
/// programs themselves.
///
/// Only native-SOL transfers are relayed by this client; `Call`-only and
/// SPL payloads are refused with their wire tag.
pub fn transfer_remaining_accounts(
    bridge_program: &Pubkey,
    payload: &IncomingPayload,
) -> Result<Vec<AccountMeta>> {
    let (transfer, ixs) = match payload {
        IncomingPayload::Transfer { transfer, ixs } => (transfer, ixs),
        IncomingPayload::Call(_) => return Err(BridgeError::UnsupportedMessageType(0)),
    };

    let mut accounts = match transfer {
        IncomingTransfer::Sol { remote_token, to, .. } => {
            let (sol_vault, _) = pda::sol_vault_address(bridge_program, remote_token)?;
            vec![
                AccountMeta::new(sol_vault, false),
                AccountMeta::new(*to, false),
                AccountMeta::new_readonly(system_program::ID, false),
            ]
        }
        IncomingTransfer::Spl { .. } => return Err(BridgeError::UnsupportedMessageType(1)),
    };

    for ix in ixs {
        for account in &ix.accounts {
            accounts.push(AccountMeta {
                pubkey: account.pubkey,
                is_signer: account.is_signer,
                is_writable: account.is_writable,
            });
        }
    }
    for ix in ixs {
        accounts.push(AccountMeta::new_readonly(ix.program_id, false));
    }

    Ok(accounts)
}
