//! Conversions between `rust-bitcoin`'s [`Work`] and CosmWasm's [`Uint256`], which is the
//! representation used in storage and in JSON messages.

use crate::{Uint256, Work};

pub fn to_uint256(work: Work) -> Uint256 {
    Uint256::from_be_bytes(work.to_be_bytes())
}

pub fn from_uint256(value: Uint256) -> Work {
    Work::from_be_bytes(value.to_be_bytes())
}
