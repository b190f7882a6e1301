//! Tests against the configured live network.
//!
//! Read-only tests only need RPC access. Tests that send transactions need a
//! funded key, see setup.rs.

use crate::setup::{load_test_config, require_signer, setup_provider};
use action::{
    withdraw::{Withdraw, WithdrawAction},
    Action,
};
use alloy_primitives::U256;
use alloy_provider::Provider;
use balance::{BalanceMonitor, BalanceQuery, Monitor};
use withdrawal::{
    unix_now, OracleContract, OutputOracle, PortalContract, StatusContext, WithdrawalPortal,
};


#[tokio::test]
#[ignore = "requires network access"]
async fn test_oracle_status_context() {
    let network = load_test_config().network_config();
    let l1 = setup_provider(&network.l1.rpc_url).await;

    let oracle = OracleContract::new(network.contracts.l2_output_oracle, l1);
    let ctx = StatusContext::load(&oracle, unix_now()).await.unwrap();
    println!("Latest committed L2 block: {}", ctx.latest_committed_block);
    println!("Finalization period: {}s", ctx.finalization_period);

    assert!(ctx.latest_committed_block > 0);

    let index = oracle
        .l2_output_index_after(ctx.latest_committed_block)
        .await
        .unwrap();
    let output = oracle.l2_output(index).await.unwrap();
    assert_eq!(output.l2BlockNumber, u128::from(ctx.latest_committed_block));
}

#[tokio::test]
#[ignore = "requires network access"]
async fn test_unknown_withdrawal_is_not_proven() {
    let network = load_test_config().network_config();
    let l1 = setup_provider(&network.l1.rpc_url).await;

    let portal = PortalContract::new(network.contracts.optimism_portal, l1);
    let hash = alloy_primitives::B256::repeat_byte(0x42);

    assert!(portal.proven_withdrawal(hash).await.unwrap().is_none());
    assert!(!portal.is_finalized(hash).await.unwrap());
}

#[tokio::test]
#[ignore = "requires network access and a funded key"]
async fn test_balances() {
    let network = load_test_config().network_config();
    let account = require_signer().address();

    for url in [&network.l1.rpc_url, &network.l2.rpc_url] {
        let monitor = BalanceMonitor::new(setup_provider(url).await);
        let balance = monitor
            .query_balance(BalanceQuery::NativeBalance { address: account })
            .await
            .unwrap();
        println!("{}: {} {}", url, balance.formatted(), balance.symbol);
    }
}

#[tokio::test]
#[ignore = "requires real funds and submits an actual withdrawal"]
async fn test_withdraw_execute() {
    let network = load_test_config().network_config();
    let account = client::connect_account(&network.l2.rpc_url, network.l2.chain_id, require_signer())
        .await
        .unwrap();

    let balance = account.provider.get_balance(account.address).await.unwrap();
    println!("L2 balance of {}: {} wei", account.address, balance);

    let action = WithdrawAction::new(
        account.provider,
        Withdraw {
            message_passer: network.contracts.l2_to_l1_message_passer,
            source: account.address,
            target: account.address,
            value: U256::from(1_000_000u64),
            gas_limit: network.default_gas_limit,
        },
    );

    assert!(
        action.is_ready().await.unwrap(),
        "Withdrawal should be ready. Make sure the account has L2 funds."
    );

    let outcome = action.execute().await.unwrap();
    println!("Withdrawal initiated: {}", outcome.tx_hash);
    assert!(outcome.block_number.is_some());
}
