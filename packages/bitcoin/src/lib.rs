pub mod chain_params;
pub mod error;
pub mod pow;
pub mod work;

pub use bitcoin::{
    block::{Header as BlockHeader, Version},
    consensus::encode::Error as EncodeError,
    consensus::{deserialize, serialize, Params},
    hash_types,
    hashes::hex::HexToArrayError as HexError,
    BlockHash, CompactTarget, Target, Work,
};
pub use chain_params::Network;
pub use cosmwasm_std::Uint256;

pub type Result<T> = std::result::Result<T, error::Error>;
