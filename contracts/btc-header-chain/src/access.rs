use cosmwasm_std::Addr;

use crate::error::InsertError;
use crate::state::Params;

/// Whether `reporter` may submit BTC headers under `params`.
///
/// An empty allow list leaves header submission open to anyone.
pub fn is_authorized(params: &Params, reporter: &Addr) -> bool {
    params.allowed_reporters.is_empty() || params.allowed_reporters.contains(reporter)
}

pub fn ensure_authorized(params: &Params, reporter: &Addr) -> Result<(), InsertError> {
    if !is_authorized(params, reporter) {
        return Err(InsertError::UnauthorizedReporter(reporter.to_string()));
    }
    Ok(())
}
