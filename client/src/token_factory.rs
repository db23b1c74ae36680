//! Deploying the wrapped ERC-20 for a Solana mint on Base.
//!
//! This module only computes calldata and decodes receipts; signing and
//! broadcasting the deployment is the caller's Base wallet's job.

use alloy_primitives::{b256, Address, B256};
use alloy_sol_types::{sol, SolCall};
use solana_program::pubkey::Pubkey;

use crate::{
    chain::BaseReceipt,
    error::{BridgeError, Result},
    evm::pubkey_to_bytes32,
};

sol! {
    function deploy(bytes32 remoteToken, string name, string symbol, uint8 decimals) external returns (address token);
}

/// Topic of the factory's `CrossChainERC20Created` event. The new token's
/// address rides in the first indexed slot.
pub const CROSS_CHAIN_ERC20_CREATED_TOPIC: B256 =
    b256!("0b84965add45c4d10c5aacc22714edc5f88def8df83d2c1f9d18b45ef2d28783");

/// Calldata deploying the wrapped ERC-20 for `mint`.
pub fn deploy_calldata(mint: &Pubkey, name: &str, symbol: &str, decimals: u8) -> Vec<u8> {
    deployCall {
        remoteToken: pubkey_to_bytes32(mint),
        name: name.to_string(),
        symbol: symbol.to_string(),
        decimals,
    }
    .abi_encode()
}

/// Recovers the deployed token's address from the factory's creation
/// event in a deployment receipt.
pub fn created_token(receipt: &BaseReceipt, token_factory: Address) -> Result<Address> {
    for log in &receipt.logs {
        if log.address != token_factory {
            continue;
        }
        if log.topics.first() != Some(&CROSS_CHAIN_ERC20_CREATED_TOPIC) {
            continue;
        }
        let Some(topic) = log.topics.get(1) else {
            continue;
        };
        return Ok(Address::from_slice(&topic[12..]));
    }
    Err(BridgeError::MalformedSourceState(
        "no CrossChainERC20Created event in receipt".into(),
    ))
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;

    use super::*;
    use crate::chain::BaseLog;

    #[test]
    fn calldata_is_selector_prefixed_and_word_aligned() {
        let mint = Pubkey::new_from_array([0x42; 32]);
        let calldata = deploy_calldata(&mint, "My Token", "MT", 9);
        assert_eq!(calldata[..4], deployCall::SELECTOR);
        assert_eq!((calldata.len() - 4) % 32, 0);
    }

    #[test]
    fn recovers_token_address_from_topic() {
        let factory = Address::from([0x11; 20]);
        let token = Address::from([0x22; 20]);
        let mut topic = [0u8; 32];
        topic[12..].copy_from_slice(token.as_slice());

        let receipt = BaseReceipt {
            block_number: 1,
            logs: vec![BaseLog {
                address: factory,
                topics: vec![CROSS_CHAIN_ERC20_CREATED_TOPIC, B256::from(topic)],
                data: Bytes::new(),
            }],
        };

        assert_eq!(created_token(&receipt, factory).unwrap(), token);
    }

    #[test]
    fn missing_event_is_an_error() {
        let receipt = BaseReceipt { block_number: 1, logs: vec![] };
        assert!(created_token(&receipt, Address::from([0x11; 20])).is_err());
    }
}
