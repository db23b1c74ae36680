use anchor_lang::prelude::*;

/// Global bridge state on Solana.
///
/// Seeds: `[b"bridge"]`
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Bridge {
    /// Highest Base block for which an output root has been recorded.
    /// Advanced by the oracle; messages originating at or below this
    /// height are provable.
    pub base_block_number: u64,
    /// Sequence number assigned to the next outgoing message.
    pub nonce: u64,
    pub gas_config: GasConfig,
}

impl Bridge {
    pub const NAME: &'static str = "Bridge";
}

/// Pricing of destination-side gas, embedded in [`Bridge`] and in the
/// relayer configuration.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct GasConfig {
    /// Account credited with gas fees on Solana.
    pub gas_fee_receiver: Pubkey,
    /// Lamports per unit of destination gas, scaled by `gas_cost_scaler_dp`.
    pub gas_cost_scaler: u64,
    pub gas_cost_scaler_dp: u64,
    /// Gas limit applied when the caller does not supply one.
    pub default_gas_limit: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{decode_account, encode_account};

    #[test]
    fn round_trip() {
        let bridge = Bridge {
            base_block_number: 12_345_678,
            nonce: 42,
            gas_config: GasConfig {
                gas_fee_receiver: Pubkey::new_unique(),
                gas_cost_scaler: 1_000_000,
                gas_cost_scaler_dp: 1_000_000,
                default_gas_limit: 100_000,
            },
        };
        let bytes = encode_account(Bridge::NAME, &bridge).unwrap();
        let back: Bridge = decode_account(Bridge::NAME, &bytes).unwrap();
        assert_eq!(back, bridge);
    }
}
