//! Balance queries for the bridged accounts.
//!
//! Covers native balances on either layer and ERC-20 balances, along with the
//! token metadata needed to display them.

pub mod monitor;

pub use monitor::BalanceMonitor;

use alloy_primitives::{
    utils::{format_ether, format_units},
    Address, U256,
};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// Symbol shown for the native currency.
pub const NATIVE_SYMBOL: &str = "ETH";

/// Represents a blockchain balance at a specific point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Balance {
    /// The address holding the balance
    pub holder: Address,
    /// The asset address (zero address for native token)
    pub asset: Address,
    /// The balance amount, in base units
    pub amount: U256,
    pub decimals: u8,
    pub symbol: String,
}

impl Balance {
    /// Amount scaled by the asset's decimals.
    pub fn formatted(&self) -> String {
        if self.asset == Address::ZERO {
            return format_ether(self.amount);
        }
        format_units(self.amount, self.decimals).unwrap_or_else(|_| self.amount.to_string())
    }
}

/// Type of balance query to perform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceQuery {
    /// Query ERC20 token balance for an EOA or contract
    ERC20Balance {
        /// Token contract address
        token: Address,
        /// Holder address
        holder: Address,
    },
    /// Query native balance
    NativeBalance {
        /// Account address
        address: Address,
    },
}

/// Trait for monitoring balances on a blockchain.
pub trait Monitor: Send + Sync {
    /// Query a single balance.
    fn query_balance(
        &self,
        query: BalanceQuery,
    ) -> impl Future<Output = eyre::Result<Balance>> + Send;
}

/// Source of ERC-20 token metadata.
pub trait TokenMetadata: Send + Sync {
    fn symbol(&self, token: Address) -> impl Future<Output = eyre::Result<String>> + Send;

    fn decimals(&self, token: Address) -> impl Future<Output = eyre::Result<u8>> + Send;
}
