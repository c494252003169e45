pub mod config;
pub mod header_chain;

pub use config::{Config, Params, ADMIN, CONFIG, PARAMS};
pub use header_chain::{
    expect_header_by_hash, get_base_header, get_header, get_header_by_hash, get_largest_reorg,
    get_main_chain, get_tip, BtcHeaderInfo, HeaderView, LargestReorg, StoreError,
};
