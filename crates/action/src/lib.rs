pub mod deposit;
pub mod finalize;
pub mod prove;
pub mod withdraw;
pub mod withdraw_token;

use alloy_primitives::TxHash;
use alloy_rpc_types_eth::TransactionReceipt;
use std::future::Future;

/// Trait for executable onchain actions.
pub trait Action: Send + Sync {
    /// Check to see if the action is ready to be executed.
    ///
    /// Returns true if all preconditions are met.
    fn is_ready(&self) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Check if the action has already been completed.
    ///
    /// Actions without an on-chain completion marker are never completed.
    fn is_completed(&self) -> impl Future<Output = eyre::Result<bool>> + Send {
        async { Ok(false) }
    }

    /// Execute the action.
    fn execute(&self) -> impl Future<Output = eyre::Result<Outcome>> + Send;

    /// Get a human-readable description of this action.
    fn description(&self) -> String;
}

/// Result of an executed action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    /// Transaction hash
    pub tx_hash: TxHash,
    /// Block number where transaction was included
    pub block_number: Option<u64>,
    pub gas_used: u64,
}

impl From<&TransactionReceipt> for Outcome {
    fn from(receipt: &TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
        }
    }
}

/// Fail on a mined but reverted transaction.
pub(crate) fn ensure_success(receipt: &TransactionReceipt, what: &str) -> eyre::Result<()> {
    if !receipt.status() {
        eyre::bail!("{} transaction {} reverted", what, receipt.transaction_hash)
    }
    Ok(())
}
