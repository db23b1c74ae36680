use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};
use solana_sdk::{pubkey, pubkey::Pubkey};

use crate::{monitor::MonitorPolicy, submit::SubmitPolicy};

/// Pseudo-mint marking native SOL in bridge transfer records.
pub const NATIVE_SOL: Pubkey = pubkey!("SoL1111111111111111111111111111111111111111");

/// Wrapped SOL ERC-20 on Base Sepolia.
pub const WRAPPED_SOL_BASE_SEPOLIA: Address =
    address!("C5b9112382f3c87AFE8e1A28fa52452aF81085AD");

/// Everything a bridge flow needs to know about the two chains.
///
/// Passed explicitly into each flow and treated as an immutable snapshot;
/// nothing in here is cached globally, since gas settings and the anchored
/// block height can change between steps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BridgeConfig {
    pub solana_rpc_url: String,
    pub base_rpc_url: String,
    /// The bridge program on Solana.
    pub bridge_program: Pubkey,
    /// The relayer program on Solana selling automatic relay to Base.
    pub relayer_program: Pubkey,
    /// The bridge contract on Base.
    pub base_bridge: Address,
    /// The factory deploying wrapped-token ERC-20s on Base.
    pub token_factory: Address,
    /// Gas limit stamped on Solana -> Base messages.
    pub relay_gas_limit: u64,
    /// Destination gas bought from the relayer by `pay_for_relay`.
    pub pay_for_relay_gas_limit: u64,
    #[serde(default)]
    pub submit: SubmitPolicy,
    #[serde(default)]
    pub monitor: MonitorPolicy,
}

impl BridgeConfig {
    /// Base Sepolia <-> Solana devnet deployment.
    pub fn devnet() -> Self {
        Self {
            solana_rpc_url: "https://api.devnet.solana.com".into(),
            base_rpc_url: "https://sepolia.base.org".into(),
            bridge_program: pubkey!("HSvNvzehozUpYhRBuCKq3Fq8udpRocTmGMUYXmCSiCCc"),
            relayer_program: pubkey!("ExS1gcALmaA983oiVpvFSVohi1zCtAUTgsLj5xiFPPgL"),
            base_bridge: address!("B2068ECCDb908902C76E3f965c1712a9cF64171E"),
            token_factory: address!("58207331CBF8Af87BB6453b610E6579D9878e4EA"),
            relay_gas_limit: 100_000,
            pay_for_relay_gas_limit: 200_000,
            submit: SubmitPolicy::default(),
            monitor: MonitorPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn devnet_round_trips_through_serde() {
        let config = BridgeConfig::devnet();
        let json = serde_json::to_string(&config).unwrap();
        let back: BridgeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.bridge_program, config.bridge_program);
        assert_eq!(back.base_bridge, config.base_bridge);
        assert_eq!(back.relay_gas_limit, config.relay_gas_limit);
    }
}
