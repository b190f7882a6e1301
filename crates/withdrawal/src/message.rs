//! Recovering the withdrawal message from an L2 receipt.

use crate::{
    hash::compute_withdrawal_hash,
    types::{InitiatedWithdrawal, WithdrawalHash},
};
use alloy_primitives::{Address, TxHash};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use binding::opstack::{IL2ToL1MessagePasser::MessagePassed, WithdrawalTransaction};
use eyre::eyre;
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum DecodeError {
    /// The receipt carries no logs at all
    #[error("Receipt has no logs to decode a withdrawal from")]
    NoLogs,

    /// The selected log is not a `MessagePassed` event
    #[error("Log is not a MessagePassed event: {0}")]
    EventShape(#[source] alloy_sol_types::Error),
}

/// The parts of a transaction receipt needed to locate a withdrawal.
#[derive(Debug, Clone, Default)]
pub struct WithdrawalReceipt {
    pub tx_hash: TxHash,
    /// `None` while the transaction is pending
    pub block_number: Option<u64>,
    pub logs: Vec<Log>,
}

/// Source of L2 transaction receipts.
pub trait ReceiptSource: Send + Sync {
    fn receipt(
        &self,
        tx_hash: TxHash,
    ) -> impl Future<Output = eyre::Result<Option<WithdrawalReceipt>>> + Send;
}

/// Decode the `MessagePassed` event out of a receipt's logs.
///
/// The log emitted by `message_passer` is preferred. Receipts without one fall
/// back to the first log, which still has to decode as `MessagePassed`.
/// Returns the withdrawal together with the hash reported by the event.
pub fn decode_withdrawal_message(
    logs: &[Log],
    message_passer: Address,
) -> Result<(WithdrawalTransaction, WithdrawalHash), DecodeError> {
    let selected = logs.iter().find(|log| {
        log.inner.address == message_passer && MessagePassed::decode_log(&log.inner).is_ok()
    });

    let log = match selected {
        Some(log) => log,
        None => {
            let first = logs.first().ok_or(DecodeError::NoLogs)?;
            warn!(
                emitter = %first.inner.address,
                expected = %message_passer,
                "No MessagePassed log from the message passer, using the first log"
            );
            first
        }
    };

    let event = MessagePassed::decode_log(&log.inner)
        .map_err(DecodeError::EventShape)?
        .data;

    let transaction = WithdrawalTransaction {
        nonce: event.nonce,
        sender: event.sender,
        target: event.target,
        value: event.value,
        gasLimit: event.gasLimit,
        data: event.data,
    };

    Ok((transaction, event.withdrawalHash))
}

/// Fetch the receipt of `tx_hash` and recover the withdrawal it initiated.
pub async fn load_withdrawal<R: ReceiptSource>(
    receipts: &R,
    tx_hash: TxHash,
    message_passer: Address,
) -> eyre::Result<InitiatedWithdrawal> {
    let receipt = receipts
        .receipt(tx_hash)
        .await?
        .ok_or_else(|| eyre!("Transaction receipt not found: {}", tx_hash))?;

    let l2_block = receipt
        .block_number
        .ok_or_else(|| eyre!("Transaction {} is not mined yet", tx_hash))?;

    let (transaction, event_hash) = decode_withdrawal_message(&receipt.logs, message_passer)?;

    let hash = compute_withdrawal_hash(&transaction);
    if hash != event_hash {
        warn!(
            tx_hash = %tx_hash,
            computed_hash = %hash,
            event_hash = %event_hash,
            "Withdrawal hash mismatch, using the computed hash"
        );
    }

    debug!(
        tx_hash = %tx_hash,
        withdrawal_hash = %hash,
        l2_block,
        nonce = %transaction.nonce,
        "Loaded withdrawal"
    );

    Ok(InitiatedWithdrawal {
        tx_hash,
        transaction,
        hash,
        l2_block,
    })
}
