use anyhow::Result as AnyResult;
use babylon_bitcoin::{BlockHeader, Network};
use cosmwasm_std::Addr;
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};

use crate::msg::btc_header::{BtcHeaderResponse, BtcHeadersResponse, LargestReorgResponse};
use crate::msg::contract::{BaseHeader, ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::state::{Config, Params};
use crate::test_utils::{regtest_base_header, to_btc_headers};

fn contract_header_chain() -> Box<dyn Contract<cosmwasm_std::Empty>> {
    let contract = ContractWrapper::new(
        crate::contract::execute,
        crate::contract::instantiate,
        crate::contract::query,
    )
    .with_migrate(crate::contract::migrate);
    Box::new(contract)
}

pub struct SuiteBuilder {
    network: Network,
    base_header: BaseHeader,
    allowed_reporters: Vec<String>,
}

impl SuiteBuilder {
    pub fn new() -> Self {
        Self {
            network: Network::Regtest,
            base_header: regtest_base_header(0, 2),
            allowed_reporters: vec![],
        }
    }

    pub fn with_base_header(mut self, base_header: BaseHeader) -> Self {
        self.base_header = base_header;
        self
    }

    pub fn with_allowed_reporters(mut self, reporters: &[&str]) -> Self {
        self.allowed_reporters = reporters.iter().map(|r| r.to_string()).collect();
        self
    }

    #[track_caller]
    pub fn build(self) -> Suite {
        let mut app = App::default();
        let owner = app.api().addr_make("owner");

        // reporters are given as labels, turned into valid addresses here
        let allowed_reporters = self
            .allowed_reporters
            .iter()
            .map(|r| app.api().addr_make(r).to_string())
            .collect();

        let code_id = app.store_code_with_creator(owner.clone(), contract_header_chain());
        let contract = app
            .instantiate_contract(
                code_id,
                owner.clone(),
                &InstantiateMsg {
                    network: self.network,
                    base_header: self.base_header,
                    allowed_reporters,
                    admin: Some(owner.to_string()),
                },
                &[],
                "btc-header-chain",
                Some(owner.to_string()),
            )
            .unwrap();

        Suite {
            app,
            code_id,
            contract,
            owner,
        }
    }
}

pub struct Suite {
    pub app: App,
    pub code_id: u64,
    pub contract: Addr,
    pub owner: Addr,
}

impl Suite {
    pub fn addr(&self, label: &str) -> Addr {
        self.app.api().addr_make(label)
    }

    pub fn submit_headers(
        &mut self,
        reporter: &str,
        headers: &[BlockHeader],
    ) -> AnyResult<AppResponse> {
        let sender = self.addr(reporter);
        self.app.execute_contract(
            sender,
            self.contract.clone(),
            &ExecuteMsg::BtcHeaders {
                headers: to_btc_headers(headers),
            },
            &[],
        )
    }

    pub fn update_params(&mut self, sender: &Addr, reporters: &[&str]) -> AnyResult<AppResponse> {
        let allowed_reporters = reporters
            .iter()
            .map(|r| self.addr(r).to_string())
            .collect();
        self.app.execute_contract(
            sender.clone(),
            self.contract.clone(),
            &ExecuteMsg::UpdateParams { allowed_reporters },
            &[],
        )
    }

    pub fn migrate(&mut self) -> AnyResult<AppResponse> {
        self.app.migrate_contract(
            self.owner.clone(),
            self.contract.clone(),
            &MigrateMsg {},
            self.code_id,
        )
    }

    #[track_caller]
    pub fn get_config(&self) -> Config {
        self.app
            .wrap()
            .query_wasm_smart(self.contract.clone(), &QueryMsg::Config {})
            .unwrap()
    }

    #[track_caller]
    pub fn get_params(&self) -> Params {
        self.app
            .wrap()
            .query_wasm_smart(self.contract.clone(), &QueryMsg::Params {})
            .unwrap()
    }

    #[track_caller]
    pub fn get_tip(&self) -> BtcHeaderResponse {
        self.app
            .wrap()
            .query_wasm_smart(self.contract.clone(), &QueryMsg::BtcTipHeader {})
            .unwrap()
    }

    #[track_caller]
    pub fn get_header(&self, height: u32) -> Option<BtcHeaderResponse> {
        self.app
            .wrap()
            .query_wasm_smart(self.contract.clone(), &QueryMsg::BtcHeader { height })
            .unwrap()
    }

    #[track_caller]
    pub fn get_header_by_hash(&self, hash: &str) -> Option<BtcHeaderResponse> {
        self.app
            .wrap()
            .query_wasm_smart(
                self.contract.clone(),
                &QueryMsg::BtcHeaderByHash {
                    hash: hash.to_string(),
                },
            )
            .unwrap()
    }

    #[track_caller]
    pub fn get_main_chain(&self, start_after: Option<u32>, limit: Option<u32>) -> BtcHeadersResponse {
        self.app
            .wrap()
            .query_wasm_smart(
                self.contract.clone(),
                &QueryMsg::BtcHeaders {
                    start_after,
                    limit,
                    reverse: None,
                },
            )
            .unwrap()
    }

    #[track_caller]
    pub fn get_depth(&self, hash: &str) -> u32 {
        self.app
            .wrap()
            .query_wasm_smart(
                self.contract.clone(),
                &QueryMsg::HeaderDepth {
                    hash: hash.to_string(),
                },
            )
            .unwrap()
    }

    #[track_caller]
    pub fn get_largest_reorg(&self) -> Option<LargestReorgResponse> {
        self.app
            .wrap()
            .query_wasm_smart(self.contract.clone(), &QueryMsg::LargestReorg {})
            .unwrap()
    }
}
