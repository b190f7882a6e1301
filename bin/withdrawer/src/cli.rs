use alloy_primitives::{
    utils::{ParseUnits, Unit},
    Address, TxHash, U256,
};
use alloy_signer_local::PrivateKeySigner;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "withdrawer", version)]
#[command(about = "Withdraw from an OP Stack L2 to its L1, and bridge back")]
pub struct Cli {
    /// Path to the configuration file [default: withdrawer.toml, if present]
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// BIP-39 mnemonic of the account
    #[arg(long, env = "MNEMONIC", global = true, hide_env_values = true)]
    pub mnemonic: Option<String>,

    /// Private key of the account (hex string, with or without 0x prefix), used instead of the mnemonic
    #[arg(short = 'k', long, env = "PRIVATE_KEY", global = true, hide_env_values = true)]
    pub private_key: Option<String>,

    /// Index of the account derived from the mnemonic
    #[arg(long, default_value_t = 0, global = true)]
    pub account_index: u32,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Print the account's native balances on L1 and L2
    Balance {
        /// Also print the balance of this L2 token
        #[arg(long)]
        token: Option<Address>,
    },

    /// Initiate a native withdrawal from L2 to L1
    Withdraw {
        /// Amount to withdraw, in ether
        #[arg(long, value_parser = parse_amount)]
        amount: U256,
    },

    /// Initiate an ERC-20 withdrawal from L2 to L1
    #[command(name = "withdrawToken", alias = "withdraw-token")]
    WithdrawToken {
        /// Amount to withdraw, scaled by 18 decimals
        #[arg(long, value_parser = parse_amount)]
        amount: U256,

        /// Token address on L2
        #[arg(long)]
        token: Address,
    },

    /// Prove an initiated withdrawal on L1
    #[command(name = "proveWithdrawal", alias = "prove-withdrawal")]
    ProveWithdrawal {
        /// Hash of the L2 transaction that initiated the withdrawal
        #[arg(long)]
        tx: TxHash,
    },

    /// Finalize a proven withdrawal on L1
    #[command(name = "finalizeWithdrawal", alias = "finalize-withdrawal")]
    FinalizeWithdrawal {
        /// Hash of the L2 transaction that initiated the withdrawal
        #[arg(long)]
        tx: TxHash,
    },

    /// List past withdrawals and their status
    #[command(name = "fetchWithdrawals", alias = "fetch-withdrawals")]
    FetchWithdrawals {
        /// Show full transaction hashes
        #[arg(long)]
        full: bool,
    },

    /// Deposit native value from L1 to L2
    Bridge {
        /// Amount to deposit, in ether
        #[arg(long, value_parser = parse_amount)]
        amount: U256,
    },

    /// Deposit an ERC-20 token from L1 to L2
    #[command(name = "bridgeToken", alias = "bridge-token")]
    BridgeToken {
        /// Amount to deposit, scaled by 18 decimals
        #[arg(long, value_parser = parse_amount)]
        amount: U256,

        /// Token address on L1
        #[arg(long)]
        l1_token: Address,

        /// Token address on L2
        #[arg(long)]
        l2_token: Address,
    },
}

impl Cli {
    /// Signing key of the account. A private key takes precedence over the mnemonic.
    pub fn signer(&self) -> eyre::Result<PrivateKeySigner> {
        if let Some(private_key) = &self.private_key {
            return Ok(client::signer_from_private_key(private_key)?);
        }

        let Some(mnemonic) = &self.mnemonic else {
            eyre::bail!("No account configured: pass --mnemonic or --private-key (or set MNEMONIC / PRIVATE_KEY)")
        };
        Ok(client::signer_from_mnemonic(mnemonic, self.account_index)?)
    }
}

/// Parse a non-negative decimal ether amount into wei.
pub fn parse_amount(amount: &str) -> Result<U256, String> {
    match ParseUnits::parse_units(amount.trim(), Unit::ETHER) {
        Ok(ParseUnits::U256(wei)) => Ok(wei),
        Ok(ParseUnits::I256(_)) => {
            Err(format!("invalid amount `{}`: must not be negative", amount))
        }
        Err(e) => Err(format!("invalid amount `{}`: {}", amount, e)),
    }
}
