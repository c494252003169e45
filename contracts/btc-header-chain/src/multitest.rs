mod suite;

use babylon_bitcoin::Network;
use rand::rngs::StdRng;
use rand::SeedableRng;
use suite::SuiteBuilder;

use crate::error::{ContractError, InsertError};
use crate::test_utils::{gen_chain, regtest_base_header, regtest_genesis};

#[test]
fn instantiate_works() {
    let suite = SuiteBuilder::new()
        .with_base_header(regtest_base_header(100, 1_000))
        .build();

    let config = suite.get_config();
    assert_eq!(config.network, Network::Regtest);
    assert!(suite.get_params().allowed_reporters.is_empty());

    let tip = suite.get_tip();
    assert_eq!(tip.height, 100);
    assert_eq!(tip.hash, regtest_genesis().block_hash().to_string());
    assert_eq!(suite.get_header(100), Some(tip));
    assert_eq!(suite.get_largest_reorg(), None);
}

#[test]
fn competing_branches_are_resolved_by_work() {
    let mut rng = StdRng::seed_from_u64(80);
    let mut suite = SuiteBuilder::new().build();
    let genesis = regtest_genesis();

    let main = gen_chain(&mut rng, &genesis, 10);
    suite.submit_headers("reporter", &main).unwrap();
    assert_eq!(suite.get_tip().height, 10);

    // a side branch with as much work as the main chain does not move the tip
    let side = gen_chain(&mut rng, &main[2], 7);
    suite.submit_headers("reporter", &side).unwrap();
    assert_eq!(suite.get_tip().hash, main[9].block_hash().to_string());
    let side_tip = suite
        .get_header_by_hash(&side[6].block_hash().to_string())
        .unwrap();
    assert_eq!(side_tip.height, 10);
    assert_eq!(suite.get_largest_reorg(), None);

    // one more header on the side branch makes it win
    let extension = gen_chain(&mut rng, &side[6], 1);
    suite.submit_headers("reporter", &extension).unwrap();
    let tip = suite.get_tip();
    assert_eq!(tip.height, 11);
    assert_eq!(tip.hash, extension[0].block_hash().to_string());

    let reorg = suite.get_largest_reorg().unwrap();
    assert_eq!(reorg.block_diff, 7);
    assert_eq!(reorg.rollback_from.hash, main[9].block_hash().to_string());
    assert_eq!(reorg.rollback_to.hash, main[2].block_hash().to_string());

    // the main chain now goes through the revived side branch
    let heights_4_to_8: Vec<_> = suite
        .get_main_chain(Some(3), Some(5))
        .headers
        .into_iter()
        .map(|h| h.hash)
        .collect();
    let expected: Vec<_> = side[..5]
        .iter()
        .map(|h| h.block_hash().to_string())
        .collect();
    assert_eq!(heights_4_to_8, expected);
    assert_eq!(suite.get_depth(&main[2].block_hash().to_string()), 8);
}

#[test]
fn only_allowed_reporters_can_submit() {
    let mut rng = StdRng::seed_from_u64(81);
    let mut suite = SuiteBuilder::new()
        .with_allowed_reporters(&["alice"])
        .build();
    let headers = gen_chain(&mut rng, &regtest_genesis(), 3);

    let err = suite.submit_headers("bob", &headers).unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::Insert(InsertError::UnauthorizedReporter(
            suite.addr("bob").to_string()
        ))
    );
    suite.submit_headers("alice", &headers[..1]).unwrap();

    // only the admin can change the reporter set
    let bob = suite.addr("bob");
    let err = suite.update_params(&bob, &["bob"]).unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::Admin(cw_controllers::AdminError::NotAdmin {})
    );

    let owner = suite.owner.clone();
    suite.update_params(&owner, &["bob"]).unwrap();
    suite.submit_headers("bob", &headers[1..]).unwrap();
    assert_eq!(suite.get_tip().height, 3);

    let next = gen_chain(&mut rng, &headers[2], 1);
    let err = suite.submit_headers("alice", &next).unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::Insert(InsertError::UnauthorizedReporter(
            suite.addr("alice").to_string()
        ))
    );
}

#[test]
fn rejected_batch_changes_nothing() {
    let mut rng = StdRng::seed_from_u64(82);
    let mut suite = SuiteBuilder::new().build();
    let headers = gen_chain(&mut rng, &regtest_genesis(), 4);
    suite.submit_headers("reporter", &headers[..2]).unwrap();
    let tip = suite.get_tip();

    // known header in the middle of an otherwise new batch
    let batch = [headers[2], headers[1], headers[3]];
    let err = suite.submit_headers("reporter", &batch).unwrap_err();
    assert_eq!(
        err.downcast::<ContractError>().unwrap(),
        ContractError::Insert(InsertError::ForkStartWithKnownHeader(
            headers[1].block_hash().to_string()
        ))
    );
    assert_eq!(suite.get_tip(), tip);
    assert_eq!(
        suite.get_header_by_hash(&headers[2].block_hash().to_string()),
        None
    );
}

#[test]
fn migrate_works() {
    let mut suite = SuiteBuilder::new().build();
    suite.migrate().unwrap();
    assert_eq!(suite.get_tip().height, 0);
}
