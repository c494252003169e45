pub use bitcoin::consensus::Params;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// bip-0113 defines the median of the last 11 blocks instead of the block's timestamp for
/// lock-time calculations.
pub const MEDIAN_TIME_SPAN: usize = 11;

// we re-implement the enum here since `rust-bitcoin`'s enum implementation
// does not have `#[derive(Serialize, Deserialize)]`
#[derive(Serialize, Deserialize, Copy, Clone, Debug, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    Mainnet,
    Testnet,
    Signet,
    Regtest,
}

impl Network {
    pub fn chain_params(&self) -> Params {
        Params::new(self.bitcoin_network())
    }

    pub fn bitcoin_network(&self) -> bitcoin::Network {
        match self {
            Self::Mainnet => bitcoin::Network::Bitcoin,
            Self::Testnet => bitcoin::Network::Testnet,
            Self::Signet => bitcoin::Network::Signet,
            Self::Regtest => bitcoin::Network::Regtest,
        }
    }

    /// Height at which the CSV deployment (and with it BIP-113 median-time-past) activated.
    pub fn csv_height(&self) -> u32 {
        match self {
            Self::Mainnet => 419_328, // 000000000000000004a1b34462cb8aeebd5799177f7a29cf28f2d1961716b5b5
            Self::Testnet => 770_112, // 00000000025e930139bac5c6c31a403776da130831ab85be56578f3fa75369bb
            Self::Signet | Self::Regtest => 1,
        }
    }
}
