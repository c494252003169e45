pub mod btc_header;
pub mod contract;

pub use contract::{ExecuteMsg, InstantiateMsg, QueryMsg};
