use cosmwasm_std::{StdError, Uint256};
use cw_controllers::AdminError;
use thiserror::Error;

use crate::state::StoreError;
use crate::validation::HeaderError;

/// Error type for the contract initialization.
#[derive(Error, Debug, PartialEq)]
pub enum InitError {
    #[error("The base header cannot be verified: {0}")]
    InvalidBaseHeader(#[from] babylon_bitcoin::error::Error),
    #[error("The base header's total work ({total}) is less than its own work ({own})")]
    BaseWorkTooLow { total: Uint256, own: Uint256 },
}

/// Rejections of a batch of BTC headers.
///
/// All of them are raised before anything is written to storage.
#[derive(Error, Debug, PartialEq)]
pub enum InsertError {
    #[error("The reporter {0} is not allowed to insert BTC headers")]
    UnauthorizedReporter(String),

    #[error("The BTC headers batch is empty")]
    EmptyHeaders,

    #[error("The parent {0} of the first BTC header is not in the header chain")]
    ParentNotFound(String),

    #[error("The BTC header {0} is already in the header chain")]
    ForkStartWithKnownHeader(String),

    #[error("BTC header #{index} is invalid: {source}")]
    InvalidHeader { index: usize, source: HeaderError },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<StdError> for InsertError {
    fn from(e: StdError) -> Self {
        Self::Store(e.into())
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("The given base header cannot be used to initialize the header chain: {0}")]
    Init(#[from] InitError),

    #[error(transparent)]
    Insert(#[from] InsertError),

    #[error("The BTC header cannot be decoded: {0}")]
    BTCHeaderDecodeError(String),

    #[error("The BTC header {0} is not on the main chain")]
    HeaderNotOnMainChain(String),

    #[error("Invalid contract name: expected {expected}, got {actual}")]
    InvalidContractName { expected: String, actual: String },

    #[error("{0}")]
    Admin(#[from] AdminError),

    #[error(transparent)]
    Std(#[from] StdError),

    #[error(transparent)]
    HashError(#[from] babylon_bitcoin::HexError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<babylon_bitcoin::EncodeError> for ContractError {
    fn from(e: babylon_bitcoin::EncodeError) -> Self {
        Self::BTCHeaderDecodeError(e.to_string())
    }
}
