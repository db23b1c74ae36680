//! Deterministic derivation of every program account the bridge touches.
//!
//! Seed schedules must match the on-chain programs byte for byte; a wrong
//! seed silently derives an address the program will never accept.

use solana_program::pubkey::Pubkey;

use crate::error::{BridgeError, Result};

pub const BRIDGE_SEED: &[u8] = b"bridge";
pub const SOL_VAULT_SEED: &[u8] = b"sol_vault";
pub const INCOMING_MESSAGE_SEED: &[u8] = b"incoming_message";
pub const OUTGOING_MESSAGE_SEED: &[u8] = b"outgoing_message";
pub const OUTPUT_ROOT_SEED: &[u8] = b"output_root";
pub const RELAYER_CONFIG_SEED: &[u8] = b"config";
pub const MESSAGE_TO_RELAY_SEED: &[u8] = b"mtr";

/// Global bridge configuration account.
pub fn bridge_address(bridge_program: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(bridge_program, &[BRIDGE_SEED], "bridge")
}

/// Vault holding the lamports locked against one wrapped token on Base.
pub fn sol_vault_address(bridge_program: &Pubkey, remote_token: &[u8; 20]) -> Result<(Pubkey, u8)> {
    derive(bridge_program, &[SOL_VAULT_SEED, remote_token], "sol_vault")
}

/// Record of a Base -> Solana message, keyed by its message hash.
pub fn incoming_message_address(
    bridge_program: &Pubkey,
    message_hash: &[u8; 32],
) -> Result<(Pubkey, u8)> {
    derive(
        bridge_program,
        &[INCOMING_MESSAGE_SEED, message_hash],
        "incoming_message",
    )
}

/// Record of a Solana -> Base message, keyed by its creation salt.
pub fn outgoing_message_address(bridge_program: &Pubkey, salt: &[u8; 32]) -> Result<(Pubkey, u8)> {
    derive(
        bridge_program,
        &[OUTGOING_MESSAGE_SEED, salt],
        "outgoing_message",
    )
}

/// Output root recorded for one Base block height.
pub fn output_root_address(bridge_program: &Pubkey, base_block_number: u64) -> Result<(Pubkey, u8)> {
    derive(
        bridge_program,
        &[OUTPUT_ROOT_SEED, &base_block_number.to_le_bytes()],
        "output_root",
    )
}

/// The relayer program's fee configuration account.
pub fn relayer_config_address(relayer_program: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(relayer_program, &[RELAYER_CONFIG_SEED], "relayer config")
}

/// Relay-payment record, keyed by its creation salt.
pub fn message_to_relay_address(relayer_program: &Pubkey, salt: &[u8; 32]) -> Result<(Pubkey, u8)> {
    derive(
        relayer_program,
        &[MESSAGE_TO_RELAY_SEED, salt],
        "message_to_relay",
    )
}

/// Fresh random salt plus the outgoing-message account it derives.
pub fn generate_outgoing_message(bridge_program: &Pubkey) -> Result<([u8; 32], Pubkey)> {
    let salt: [u8; 32] = rand::random();
    let (address, _) = outgoing_message_address(bridge_program, &salt)?;
    Ok((salt, address))
}

/// Fresh random salt plus the relay-payment account it derives.
pub fn generate_message_to_relay(relayer_program: &Pubkey) -> Result<([u8; 32], Pubkey)> {
    let salt: [u8; 32] = rand::random();
    let (address, _) = message_to_relay_address(relayer_program, &salt)?;
    Ok((salt, address))
}

fn derive(program: &Pubkey, seeds: &[&[u8]], context: &'static str) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(seeds, program)
        .ok_or(BridgeError::DerivationExhausted(context))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let program = Pubkey::new_unique();
        let hash = [7u8; 32];
        let first = incoming_message_address(&program, &hash).unwrap();
        let second = incoming_message_address(&program, &hash).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn derived_addresses_are_off_curve() {
        let program = Pubkey::new_unique();
        let (address, _) = bridge_address(&program).unwrap();
        assert!(!address.is_on_curve());
    }

    #[test]
    fn distinct_seeds_derive_distinct_addresses() {
        let program = Pubkey::new_unique();
        let (a, _) = output_root_address(&program, 100).unwrap();
        let (b, _) = output_root_address(&program, 101).unwrap();
        assert_ne!(a, b);

        let (vault_a, _) = sol_vault_address(&program, &[1u8; 20]).unwrap();
        let (vault_b, _) = sol_vault_address(&program, &[2u8; 20]).unwrap();
        assert_ne!(vault_a, vault_b);
    }

    #[test]
    fn fresh_salts_derive_fresh_messages() {
        let program = Pubkey::new_unique();
        let (salt_a, message_a) = generate_outgoing_message(&program).unwrap();
        let (salt_b, message_b) = generate_outgoing_message(&program).unwrap();
        assert_ne!(salt_a, salt_b);
        assert_ne!(message_a, message_b);
    }

    #[test]
    fn programs_namespace_their_accounts() {
        let bridge = Pubkey::new_unique();
        let relayer = Pubkey::new_unique();
        let (a, _) = bridge_address(&bridge).unwrap();
        let (b, _) = bridge_address(&relayer).unwrap();
        assert_ne!(a, b);
    }
}
