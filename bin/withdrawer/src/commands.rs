//! Command dispatch.
//!
//! Every command connects to the chains it needs, runs once and reports to
//! stdout. Failures propagate to `main`.

use crate::{
    cli::{Cli, Command},
    config::Config,
    list::{render_table, WithdrawalLister},
};
use action::{
    deposit::{BridgeEth, BridgeEthAction, BridgeToken, BridgeTokenAction},
    finalize::{Finalize, FinalizeAction},
    prove::{Prove, ProveAction},
    withdraw::{Withdraw, WithdrawAction},
    withdraw_token::{WithdrawToken, WithdrawTokenAction},
    Action, Outcome,
};
use alloy_primitives::{Address, TxHash, U256};
use balance::{BalanceMonitor, BalanceQuery, Monitor};
use config::NetworkConfig;
use explorer::ExplorerClient;
use tracing::info;
use withdrawal::{load_withdrawal, unix_now, L2Node, OracleContract, PortalContract};

/// Run the parsed command line to completion.
pub async fn run(cli: Cli) -> eyre::Result<()> {
    let config = Config::load(cli.config.as_deref())?;
    let network = config.network_config();

    match &cli.command {
        Command::Balance { token } => show_balance(&cli, &network, *token).await,
        Command::Withdraw { amount } => withdraw(&cli, &network, *amount).await,
        Command::WithdrawToken { amount, token } => {
            withdraw_token(&cli, &network, *amount, *token).await
        }
        Command::ProveWithdrawal { tx } => prove_withdrawal(&cli, &network, *tx).await,
        Command::FinalizeWithdrawal { tx } => finalize_withdrawal(&cli, &network, *tx).await,
        Command::FetchWithdrawals { full } => fetch_withdrawals(&cli, &network, *full).await,
        Command::Bridge { amount } => bridge(&cli, &network, *amount).await,
        Command::BridgeToken {
            amount,
            l1_token,
            l2_token,
        } => bridge_token(&cli, &network, *amount, *l1_token, *l2_token).await,
    }
}

/// Native withdrawal of `amount` from `account` back to itself on L1.
pub fn withdraw_input(network: &NetworkConfig, account: Address, amount: U256) -> Withdraw {
    Withdraw {
        message_passer: network.contracts.l2_to_l1_message_passer,
        source: account,
        target: account,
        value: amount,
        gas_limit: network.default_gas_limit,
    }
}

/// Check preconditions, then send.
async fn submit<A: Action>(action: &A) -> eyre::Result<Outcome> {
    info!(action = %action.description(), "Submitting");

    if !action.is_ready().await? {
        eyre::bail!(
            "{}: not ready, check the amount, addresses and account balance",
            action.description()
        )
    }

    action.execute().await
}

fn print_outcome(outcome: &Outcome) {
    println!("Transaction hash: {}", outcome.tx_hash);
}

async fn show_balance(
    cli: &Cli,
    network: &NetworkConfig,
    token: Option<Address>,
) -> eyre::Result<()> {
    let account = cli.signer()?.address();

    let l1 = BalanceMonitor::new(client::create_provider(&network.l1.rpc_url).await?);
    let l2 = BalanceMonitor::new(client::create_provider(&network.l2.rpc_url).await?);

    let native = BalanceQuery::NativeBalance { address: account };
    let l1_balance = l1.query_balance(native.clone()).await?;
    let l2_balance = l2.query_balance(native).await?;

    println!("Account: {}", account);
    println!("L1 balance: {} {}", l1_balance.formatted(), l1_balance.symbol);
    println!("L2 balance: {} {}", l2_balance.formatted(), l2_balance.symbol);

    if let Some(token) = token {
        let token_balance = l2
            .query_balance(BalanceQuery::ERC20Balance {
                token,
                holder: account,
            })
            .await?;
        println!(
            "L2 token balance: {} {}",
            token_balance.formatted(),
            token_balance.symbol
        );
    }

    Ok(())
}

async fn withdraw(cli: &Cli, network: &NetworkConfig, amount: U256) -> eyre::Result<()> {
    let account =
        client::connect_account(&network.l2.rpc_url, network.l2.chain_id, cli.signer()?).await?;

    let action = WithdrawAction::new(
        account.provider,
        withdraw_input(network, account.address, amount),
    );
    let outcome = submit(&action).await?;

    print_outcome(&outcome);
    Ok(())
}

async fn withdraw_token(
    cli: &Cli,
    network: &NetworkConfig,
    amount: U256,
    token: Address,
) -> eyre::Result<()> {
    let account =
        client::connect_account(&network.l2.rpc_url, network.l2.chain_id, cli.signer()?).await?;

    let action = WithdrawTokenAction::new(
        account.provider,
        WithdrawToken {
            l2_bridge: network.contracts.l2_standard_bridge,
            message_passer: network.contracts.l2_to_l1_message_passer,
            source: account.address,
            token,
            amount,
            gas_limit: network.default_gas_limit,
        },
    );
    let outcome = submit(&action).await?;

    print_outcome(&outcome);
    Ok(())
}

async fn prove_withdrawal(cli: &Cli, network: &NetworkConfig, tx: TxHash) -> eyre::Result<()> {
    let l2_provider = client::create_provider(&network.l2.rpc_url).await?;
    let withdrawal = load_withdrawal(
        &L2Node::new(l2_provider.clone()),
        tx,
        network.contracts.l2_to_l1_message_passer,
    )
    .await?;
    info!(
        tx_hash = %tx,
        withdrawal_hash = %withdrawal.hash,
        l2_block = withdrawal.l2_block,
        "Loaded withdrawal"
    );

    let account =
        client::connect_account(&network.l1.rpc_url, network.l1.chain_id, cli.signer()?).await?;

    let action = ProveAction::new(
        account.provider,
        l2_provider,
        Prove {
            portal_address: network.contracts.optimism_portal,
            oracle_address: network.contracts.l2_output_oracle,
            message_passer: network.contracts.l2_to_l1_message_passer,
            withdrawal,
        },
    );
    info!(action = %action.description(), "Submitting");
    let outcome = action.execute().await?;

    print_outcome(&outcome);
    Ok(())
}

async fn finalize_withdrawal(cli: &Cli, network: &NetworkConfig, tx: TxHash) -> eyre::Result<()> {
    let l2_provider = client::create_provider(&network.l2.rpc_url).await?;
    let withdrawal = load_withdrawal(
        &L2Node::new(l2_provider),
        tx,
        network.contracts.l2_to_l1_message_passer,
    )
    .await?;

    let account =
        client::connect_account(&network.l1.rpc_url, network.l1.chain_id, cli.signer()?).await?;

    let action = FinalizeAction::new(
        account.provider,
        Finalize {
            portal_address: network.contracts.optimism_portal,
            oracle_address: network.contracts.l2_output_oracle,
            withdrawal: withdrawal.transaction,
            withdrawal_hash: withdrawal.hash,
        },
    );
    info!(action = %action.description(), "Submitting");
    let outcome = action.execute().await?;

    print_outcome(&outcome);
    if let Some(explorer) = &network.l1_explorer_url {
        println!("{}", l1_transaction_link(explorer, outcome.tx_hash));
    }
    Ok(())
}

fn l1_transaction_link(explorer: &str, tx_hash: TxHash) -> String {
    format!("{}/tx/{}", explorer.trim_end_matches('/'), tx_hash)
}

async fn fetch_withdrawals(cli: &Cli, network: &NetworkConfig, full: bool) -> eyre::Result<()> {
    let account = cli.signer()?.address();

    let l1_provider = client::create_provider(&network.l1.rpc_url).await?;
    let l2_provider = client::create_provider(&network.l2.rpc_url).await?;

    let lister = WithdrawalLister {
        explorer: ExplorerClient::new(&network.explorer_api_url)?,
        receipts: L2Node::new(l2_provider.clone()),
        oracle: OracleContract::new(network.contracts.l2_output_oracle, l1_provider.clone()),
        portal: PortalContract::new(network.contracts.optimism_portal, l1_provider),
        tokens: BalanceMonitor::new(l2_provider),
        contracts: network.contracts.clone(),
    };

    let rows = lister.fetch(account, unix_now()).await?;
    info!(account = %account, withdrawals = rows.len(), "Fetched withdrawals");

    render_table(&rows, full).printstd();
    Ok(())
}

async fn bridge(cli: &Cli, network: &NetworkConfig, amount: U256) -> eyre::Result<()> {
    let account =
        client::connect_account(&network.l1.rpc_url, network.l1.chain_id, cli.signer()?).await?;

    let action = BridgeEthAction::new(
        account.provider,
        BridgeEth {
            l1_bridge: network.contracts.l1_standard_bridge,
            source: account.address,
            value: amount,
            gas_limit: network.default_gas_limit,
        },
    );
    let outcome = submit(&action).await?;

    print_outcome(&outcome);
    Ok(())
}

async fn bridge_token(
    cli: &Cli,
    network: &NetworkConfig,
    amount: U256,
    l1_token: Address,
    l2_token: Address,
) -> eyre::Result<()> {
    let account =
        client::connect_account(&network.l1.rpc_url, network.l1.chain_id, cli.signer()?).await?;

    let action = BridgeTokenAction::new(
        account.provider,
        BridgeToken {
            l1_bridge: network.contracts.l1_standard_bridge,
            source: account.address,
            l1_token,
            l2_token,
            amount,
            gas_limit: network.default_gas_limit,
        },
    );
    let outcome = submit(&action).await?;

    print_outcome(&outcome);
    Ok(())
}
