//! Withdrawal history of an account.
//!
//! Past withdrawals are discovered from the explorer's transaction list,
//! classified by destination and calldata, then enriched with their portal
//! status one by one.

use alloy_primitives::{utils::format_units, Address, TxHash, U256};
use alloy_sol_types::SolInterface;
use balance::{TokenMetadata, NATIVE_SYMBOL};
use binding::opstack::IL2StandardBridge::IL2StandardBridgeCalls;
use config::ContractAddresses;
use explorer::{ExplorerTransaction, TransactionSource};
use prettytable::{row, Table};
use tracing::debug;
use withdrawal::{
    load_withdrawal, query_withdrawal_status, OutputOracle, ReceiptSource, StatusContext,
    WithdrawalPortal, WithdrawalStatus,
};

/// How a transaction moved value out of L2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalKind {
    /// Native value sent to the message passer or the portal
    Native { value: U256 },
    /// Token withdrawn through the L2 standard bridge
    Token { token: Address, amount: U256 },
}

/// One line of the withdrawal table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithdrawalRow {
    pub tx_hash: TxHash,
    pub symbol: String,
    /// Amount in the asset's base units
    pub value: U256,
    pub decimals: u8,
    /// Explorer timestamp of the initiating transaction
    pub timestamp: u64,
    pub status: WithdrawalStatus,
}

/// Classify an explorer entry, or `None` if it did not initiate a withdrawal.
pub fn classify(tx: &ExplorerTransaction, contracts: &ContractAddresses) -> Option<WithdrawalKind> {
    if tx.is_error {
        return None;
    }

    let to = tx.to?;

    if (to == contracts.l2_to_l1_message_passer || to == contracts.optimism_portal)
        && !tx.value.is_zero()
    {
        return Some(WithdrawalKind::Native { value: tx.value });
    }

    if to == contracts.l2_standard_bridge {
        return match IL2StandardBridgeCalls::abi_decode(&tx.input) {
            Ok(IL2StandardBridgeCalls::withdraw(call)) => Some(WithdrawalKind::Token {
                token: call._l2Token,
                amount: call._amount,
            }),
            // other bridge entry points and unknown selectors
            _ => None,
        };
    }

    None
}

/// Everything the lister reads from.
pub struct WithdrawalLister<T, R, O, W, M> {
    pub explorer: T,
    pub receipts: R,
    pub oracle: O,
    pub portal: W,
    pub tokens: M,
    pub contracts: ContractAddresses,
}

impl<T, R, O, W, M> WithdrawalLister<T, R, O, W, M>
where
    T: TransactionSource,
    R: ReceiptSource,
    O: OutputOracle,
    W: WithdrawalPortal,
    M: TokenMetadata,
{
    /// All withdrawals initiated by `account`, oldest first, evaluated at `now`.
    pub async fn fetch(&self, account: Address, now: u64) -> eyre::Result<Vec<WithdrawalRow>> {
        let transactions = self.explorer.transactions_from(account).await?;

        let mut candidates = Vec::new();
        for tx in transactions {
            let Some(kind) = classify(&tx, &self.contracts) else {
                continue;
            };
            let (symbol, decimals, value) = match kind {
                WithdrawalKind::Native { value } => (NATIVE_SYMBOL.to_string(), 18, value),
                WithdrawalKind::Token { token, amount } => (
                    self.tokens.symbol(token).await?,
                    self.tokens.decimals(token).await?,
                    amount,
                ),
            };
            candidates.push((tx, symbol, decimals, value));
        }

        debug!(
            account = %account,
            candidates = candidates.len(),
            "Classified withdrawal transactions"
        );

        let ctx = StatusContext::load(&self.oracle, now).await?;

        let mut rows = Vec::with_capacity(candidates.len());
        for (tx, symbol, decimals, value) in candidates {
            let withdrawal = load_withdrawal(
                &self.receipts,
                tx.hash,
                self.contracts.l2_to_l1_message_passer,
            )
            .await?;
            let status =
                query_withdrawal_status(&self.portal, &ctx, withdrawal.hash, withdrawal.l2_block)
                    .await?;

            rows.push(WithdrawalRow {
                tx_hash: tx.hash,
                symbol,
                value,
                decimals,
                timestamp: tx.timestamp,
                status,
            });
        }

        // stable: equal timestamps keep explorer order
        rows.sort_by_key(|row| row.timestamp);
        Ok(rows)
    }
}

/// `0x1234...abcdef` form of a hash, or the full hash.
pub fn display_hash(hash: &TxHash, full: bool) -> String {
    let hash = hash.to_string();
    if full || hash.len() <= 12 {
        return hash;
    }
    format!("{}...{}", &hash[..6], &hash[hash.len() - 6..])
}

/// Row value scaled by its asset's decimals.
fn format_value(row: &WithdrawalRow) -> String {
    format_units(row.value, row.decimals).unwrap_or_else(|_| row.value.to_string())
}

pub fn render_table(rows: &[WithdrawalRow], full: bool) -> Table {
    let mut table = Table::new();
    table.set_titles(row![
        "hash",
        "symbol",
        "value",
        "readyToProve",
        "proven",
        "readyToFinalize",
        "finalized"
    ]);

    for withdrawal in rows {
        table.add_row(row![
            display_hash(&withdrawal.tx_hash, full),
            withdrawal.symbol,
            format_value(withdrawal),
            withdrawal.status.is_ready_to_prove,
            withdrawal.status.is_proven,
            withdrawal.status.is_ready_to_finalize,
            withdrawal.status.is_finalized
        ]);
    }

    table
}
