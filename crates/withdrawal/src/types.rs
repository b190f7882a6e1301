use alloy_primitives::{TxHash, B256};
use binding::opstack::WithdrawalTransaction;

pub type WithdrawalHash = B256;

/// A withdrawal initiated on L2, recovered from its transaction receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitiatedWithdrawal {
    /// Hash of the initiating L2 transaction
    pub tx_hash: TxHash,
    /// Decoded `MessagePassed` fields
    pub transaction: WithdrawalTransaction,
    /// Withdrawal hash recomputed from `transaction`
    pub hash: WithdrawalHash,
    /// L2 block the initiating transaction was mined in
    pub l2_block: u64,
}

/// Proof record kept by the portal for a proven withdrawal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProvenWithdrawal {
    pub output_root: B256,
    pub timestamp: u64,
    pub l2_output_index: u64,
}

/// Oracle-side values shared by every status evaluation of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusContext {
    /// Highest L2 block committed to the output oracle
    pub latest_committed_block: u64,
    /// Delay between proving and finalizing, in seconds
    pub finalization_period: u64,
    /// Wall-clock unix time, in seconds
    pub now: u64,
}

/// Derived, display-only status of a withdrawal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WithdrawalStatus {
    pub is_proven: bool,
    pub is_finalized: bool,
    pub is_ready_to_prove: bool,
    pub is_ready_to_finalize: bool,
}

impl WithdrawalStatus {
    /// Combine on-chain portal state with the oracle context.
    ///
    /// A withdrawal is ready to prove once its block is committed and it is
    /// neither proven nor finalized, and ready to finalize once the
    /// finalization period has passed since it was proven.
    pub fn evaluate(
        proven: Option<&ProvenWithdrawal>,
        is_finalized: bool,
        l2_block: u64,
        ctx: &StatusContext,
    ) -> Self {
        let is_proven = proven.is_some();

        let is_ready_to_finalize = proven.is_some_and(|p| {
            ctx.now > p.timestamp.saturating_add(ctx.finalization_period)
        }) && !is_finalized;

        let is_ready_to_prove =
            ctx.latest_committed_block >= l2_block && !is_finalized && !is_proven;

        Self {
            is_proven,
            is_finalized,
            is_ready_to_prove,
            is_ready_to_finalize,
        }
    }
}
