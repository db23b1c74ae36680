use anchor_lang::prelude::*;

use super::GasConfig;

/// The relayer program's fee configuration.
///
/// Seeds: `[b"config"]`. The on-chain account is named `Cfg`, which is what
/// its discriminator is derived from.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RelayerConfig {
    pub gas_config: GasConfig,
}

impl RelayerConfig {
    pub const NAME: &'static str = "Cfg";
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anchor::{decode_account, encode_account};

    #[test]
    fn round_trip() {
        let config = RelayerConfig {
            gas_config: GasConfig {
                gas_fee_receiver: Pubkey::new_unique(),
                gas_cost_scaler: 10,
                gas_cost_scaler_dp: 100,
                default_gas_limit: 200_000,
            },
        };
        let bytes = encode_account(RelayerConfig::NAME, &config).unwrap();
        let back: RelayerConfig = decode_account(RelayerConfig::NAME, &bytes).unwrap();
        assert_eq!(back, config);
    }
}
