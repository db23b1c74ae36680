use std::time::Duration;

use alloy_primitives::{Address, B256};
use alloy_sol_types::{SolEvent, SolValue};
use bridge_client::{
    anchor,
    chain::{BaseLog, BaseReceipt},
    evm::BaseBridge,
    monitor::MonitorPolicy,
    state::{Bridge, GasConfig, RelayerConfig},
    submit::SubmitPolicy,
    BridgeConfig,
};
use solana_sdk::pubkey::Pubkey;

/// A config pointed at nowhere, with policies tuned for fast tests.
pub fn test_config(
    bridge_program: Pubkey,
    relayer_program: Pubkey,
    base_bridge: Address,
) -> BridgeConfig {
    BridgeConfig {
        solana_rpc_url: "http://localhost:8899".into(),
        base_rpc_url: "http://localhost:8545".into(),
        bridge_program,
        relayer_program,
        base_bridge,
        token_factory: Address::from([0xFA; 20]),
        relay_gas_limit: 100_000,
        pay_for_relay_gas_limit: 200_000,
        submit: SubmitPolicy {
            compute_unit_limit: 400_000,
            max_retries: 0,
            retry_delay: Duration::from_millis(1),
        },
        monitor: MonitorPolicy {
            poll_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(2),
            max_wait: Some(Duration::from_millis(250)),
        },
    }
}

/// A `MessageInitiated` log as the bridge contract would emit it.
pub fn initiated_log(
    bridge_contract: Address,
    message_hash: B256,
    mmr_root: B256,
    nonce: u64,
    sender: [u8; 32],
    data: Vec<u8>,
) -> BaseLog {
    let event = BaseBridge::MessageInitiated {
        messageHash: message_hash,
        mmrRoot: mmr_root,
        message: BaseBridge::BridgeMessage {
            nonce,
            sender: B256::from(sender),
            data: data.into(),
        },
    };
    let log_data = event.encode_log_data();
    BaseLog {
        address: bridge_contract,
        topics: log_data.topics().to_vec(),
        data: log_data.data,
    }
}

pub fn receipt(block_number: u64, logs: Vec<BaseLog>) -> BaseReceipt {
    BaseReceipt { block_number, logs }
}

/// Encoded `Bridge` account with the given anchored Base block height.
pub fn bridge_account(base_block_number: u64, gas_fee_receiver: Pubkey) -> Vec<u8> {
    anchor::encode_account(
        Bridge::NAME,
        &Bridge {
            base_block_number,
            nonce: 0,
            gas_config: gas_config(gas_fee_receiver),
        },
    )
    .unwrap()
}

/// Encoded relayer `Cfg` account.
pub fn relayer_config_account(gas_fee_receiver: Pubkey) -> Vec<u8> {
    anchor::encode_account(
        RelayerConfig::NAME,
        &RelayerConfig { gas_config: gas_config(gas_fee_receiver) },
    )
    .unwrap()
}

fn gas_config(gas_fee_receiver: Pubkey) -> GasConfig {
    GasConfig {
        gas_fee_receiver,
        gas_cost_scaler: 1_000_000,
        gas_cost_scaler_dp: 1_000_000,
        default_gas_limit: 100_000,
    }
}

/// ABI-encoded `generateProof` response.
pub fn proof_response(proof: Vec<B256>) -> Vec<u8> {
    proof.abi_encode()
}

/// ABI-encoded `successes` response.
pub fn bool_response(value: bool) -> Vec<u8> {
    value.abi_encode()
}
