//! Speaking the on-chain programs' Anchor ABI without linking the program
//! crates. Discriminators are derived from the same sha256 preimages Anchor
//! uses; account and instruction payloads share the programs' Borsh layouts.

use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_program::hash::hashv;

use crate::error::{BridgeError, Result};

/// Eight-byte prefix of every Anchor account: `sha256("account:<Name>")[..8]`.
pub fn account_discriminator(name: &str) -> [u8; 8] {
    discriminator("account", name)
}

/// Discriminator selecting a program instruction: `sha256("global:<name>")[..8]`.
pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    discriminator("global", name)
}

fn discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let preimage = format!("{namespace}:{name}");
    let digest = hashv(&[preimage.as_bytes()]);
    let mut out = [0u8; 8];
    out.copy_from_slice(&digest.to_bytes()[..8]);
    out
}

/// Decodes account data fetched from chain, verifying its discriminator.
///
/// Trailing bytes are tolerated, matching Anchor's own deserializer.
pub fn decode_account<T: AnchorDeserialize>(name: &str, data: &[u8]) -> Result<T> {
    let expected = account_discriminator(name);
    if data.len() < 8 || data[..8] != expected {
        return Err(BridgeError::MalformedSourceState(format!(
            "account data does not carry the `{name}` discriminator"
        )));
    }
    let mut rest = &data[8..];
    T::deserialize(&mut rest).map_err(|err| {
        BridgeError::MalformedSourceState(format!("undecodable `{name}` account: {err}"))
    })
}

/// Encodes an account the way the owning program lays it out, discriminator
/// included. The write half lives on chain; this half exists for fixtures
/// and round-trip checks.
pub fn encode_account<T: AnchorSerialize>(name: &str, value: &T) -> Result<Vec<u8>> {
    let mut data = account_discriminator(name).to_vec();
    value
        .serialize(&mut data)
        .map_err(|err| BridgeError::Serialization(err.to_string()))?;
    Ok(data)
}

/// Instruction data: discriminator followed by Borsh-encoded arguments.
pub fn instruction_data<T: AnchorSerialize>(name: &str, args: &T) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator(name).to_vec();
    args.serialize(&mut data)
        .map_err(|err| BridgeError::Serialization(err.to_string()))?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use anchor_lang::prelude::borsh;

    use super::*;

    #[derive(AnchorSerialize, AnchorDeserialize, Debug, PartialEq, Eq)]
    struct Sample {
        count: u64,
        flag: bool,
    }

    #[test]
    fn namespaces_do_not_collide() {
        assert_ne!(
            account_discriminator("ProveMessage"),
            instruction_discriminator("ProveMessage")
        );
        assert_ne!(account_discriminator("Bridge"), account_discriminator("Cfg"));
    }

    #[test]
    fn account_round_trip() {
        let sample = Sample { count: 42, flag: true };
        let bytes = encode_account("Sample", &sample).unwrap();
        assert_eq!(bytes[..8], account_discriminator("Sample"));
        let back: Sample = decode_account("Sample", &bytes).unwrap();
        assert_eq!(back, sample);
    }

    #[test]
    fn wrong_discriminator_is_rejected() {
        let sample = Sample { count: 1, flag: false };
        let bytes = encode_account("Sample", &sample).unwrap();
        let err = decode_account::<Sample>("Other", &bytes).unwrap_err();
        assert!(matches!(err, BridgeError::MalformedSourceState(_)));
    }

    #[test]
    fn short_data_is_rejected() {
        let err = decode_account::<Sample>("Sample", &[1, 2, 3]).unwrap_err();
        assert!(matches!(err, BridgeError::MalformedSourceState(_)));
    }

    #[test]
    fn instruction_data_is_prefixed() {
        let data = instruction_data("prove_message", &Sample { count: 7, flag: false }).unwrap();
        assert_eq!(data[..8], instruction_discriminator("prove_message"));
        assert_eq!(data.len(), 8 + 8 + 1);
    }
}
