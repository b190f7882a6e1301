//! Command line parsing and the calls it turns into.

use crate::setup::setup_provider;
use action::withdraw::WithdrawAction;
use alloy_primitives::{Address, TxKind, U256};
use alloy_sol_types::SolCall;
use binding::opstack::IL2ToL1MessagePasser::initiateWithdrawalCall;
use clap::Parser;
use config::NetworkConfig;
use withdrawer::{
    cli::{Cli, Command},
    commands::withdraw_input,
};


const ONE_AND_A_HALF_ETHER: u128 = 1_500_000_000_000_000_000;

#[test]
fn test_parse_withdraw_amount() {
    let cli = Cli::try_parse_from(["withdrawer", "withdraw", "--amount", "1.5"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Withdraw {
            amount: U256::from(ONE_AND_A_HALF_ETHER)
        }
    );

    let cli = Cli::try_parse_from(["withdrawer", "withdraw", "--amount=1.5"]).unwrap();
    assert_eq!(
        cli.command,
        Command::Withdraw {
            amount: U256::from(ONE_AND_A_HALF_ETHER)
        }
    );
}

#[test]
fn test_withdraw_requires_amount() {
    let err = Cli::try_parse_from(["withdrawer", "withdraw"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

    let err = Cli::try_parse_from(["withdrawer", "withdraw", "--amount", "lots"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn test_negative_amounts_rejected() {
    let err = Cli::try_parse_from(["withdrawer", "withdraw", "--amount=-1.5"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);

    let err = Cli::try_parse_from(["withdrawer", "bridge", "--amount=-1"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
}

#[test]
fn test_command_names_and_aliases() {
    let tx = "0x91b374b5403401198a892f62db8843b60125cfb3e28ec1664089d9158424dc4a";

    for name in ["proveWithdrawal", "prove-withdrawal"] {
        let cli = Cli::try_parse_from(["withdrawer", name, "--tx", tx]).unwrap();
        assert!(matches!(cli.command, Command::ProveWithdrawal { .. }));
    }

    for name in ["finalizeWithdrawal", "finalize-withdrawal"] {
        let cli = Cli::try_parse_from(["withdrawer", name, "--tx", tx]).unwrap();
        assert!(matches!(cli.command, Command::FinalizeWithdrawal { .. }));
    }

    for name in ["fetchWithdrawals", "fetch-withdrawals"] {
        let cli = Cli::try_parse_from(["withdrawer", name, "--full"]).unwrap();
        assert_eq!(cli.command, Command::FetchWithdrawals { full: true });
    }

    let cli = Cli::try_parse_from([
        "withdrawer",
        "bridge-token",
        "--amount",
        "2",
        "--l1-token",
        "0x00000000000000000000000000000000000000a1",
        "--l2-token",
        "0x00000000000000000000000000000000000000b2",
    ])
    .unwrap();
    assert_eq!(
        cli.command,
        Command::BridgeToken {
            amount: U256::from(2_000_000_000_000_000_000u128),
            l1_token: Address::with_last_byte(0xa1),
            l2_token: Address::with_last_byte(0xb2),
        }
    );
}

#[test]
fn test_global_options_after_subcommand() {
    let cli = Cli::try_parse_from([
        "withdrawer",
        "balance",
        "--account-index",
        "3",
        "--config",
        "custom.toml",
        "--log-json",
    ])
    .unwrap();

    assert_eq!(cli.account_index, 3);
    assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("custom.toml")));
    assert!(cli.log_json);
    assert_eq!(cli.command, Command::Balance { token: None });
}

#[test]
fn test_private_key_takes_precedence() {
    let cli = Cli::try_parse_from([
        "withdrawer",
        "--mnemonic",
        "test test test test test test test test test test test junk",
        "--private-key",
        "0x59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d",
        "balance",
    ])
    .unwrap();

    // second anvil account, not the mnemonic's first
    assert_eq!(
        cli.signer().unwrap().address(),
        "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
            .parse::<Address>()
            .unwrap()
    );
}

#[tokio::test]
async fn test_withdraw_builds_initiate_withdrawal() {
    let cli = Cli::try_parse_from(["withdrawer", "withdraw", "--amount=1.5"]).unwrap();
    let Command::Withdraw { amount } = cli.command else {
        panic!("expected withdraw command");
    };

    let network = NetworkConfig::hera_testnet();
    let account = Address::with_last_byte(0x42);

    // building the request never touches the node
    let provider = setup_provider("http://127.0.0.1:8545").await;
    let action = WithdrawAction::new(provider, withdraw_input(&network, account, amount));
    let request = action.transaction_request();

    assert_eq!(
        request.to,
        Some(TxKind::Call(network.contracts.l2_to_l1_message_passer))
    );
    assert_eq!(request.value, Some(U256::from(ONE_AND_A_HALF_ETHER)));

    let call = initiateWithdrawalCall::abi_decode(request.input.input().unwrap()).unwrap();
    assert_eq!(call._target, account);
    assert_eq!(call._gasLimit, U256::from(network.default_gas_limit));
    assert!(call._data.is_empty());
}
