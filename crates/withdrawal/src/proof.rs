//! Proof generation for L2→L1 withdrawals.
//!
//! A withdrawal is proven against the first output the proposer committed at
//! or after its L2 block. The proof pairs that output's state and
//! message-passer storage roots with a Merkle proof of the
//! `sentMessages[withdrawalHash]` slot, all taken at the output's block.

use crate::{
    hash::{compute_output_root, compute_storage_slot},
    state::OutputOracle,
    types::InitiatedWithdrawal,
};
use alloy_primitives::{Address, Bytes, B256, U256};
use binding::opstack::{OutputRootProof, WithdrawalTransaction, OUTPUT_VERSION_V0};
use eyre::{eyre, Result};
use std::future::Future;
use tracing::debug;

/// `eth_getProof` result for a single storage slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorageProof {
    pub account_proof: Vec<Bytes>,
    /// Merkle proof of the slot within the account's storage trie
    pub storage_proof: Vec<Bytes>,
    pub storage_value: U256,
    pub storage_root: B256,
}

/// Header roots of an L2 block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockRoots {
    pub state_root: B256,
    pub block_hash: B256,
}

/// Source of L2 state proofs.
pub trait StateProofSource: Send + Sync {
    fn storage_proof(
        &self,
        account: Address,
        slot: B256,
        block: u64,
    ) -> impl Future<Output = Result<StorageProof>> + Send;

    fn block_roots(&self, block: u64) -> impl Future<Output = Result<BlockRoots>> + Send;
}

/// Parameters required to prove a withdrawal on L1.
#[derive(Debug, Clone)]
pub struct ProveWithdrawalParams {
    pub withdrawal: WithdrawalTransaction,
    pub l2_output_index: U256,
    /// L2 block of the output the proof was generated at
    pub output_block: u64,
    pub output_root_proof: OutputRootProof,
    pub withdrawal_proof: Vec<Bytes>,
    /// Full `eth_getProof` answer the withdrawal proof was taken from
    pub storage_proof: StorageProof,
}

/// Build the proof for `withdrawal` against the first output covering its block.
pub async fn generate_proof<O, S>(
    oracle: &O,
    l2_state: &S,
    message_passer: Address,
    withdrawal: &InitiatedWithdrawal,
) -> Result<ProveWithdrawalParams>
where
    O: OutputOracle,
    S: StateProofSource,
{
    let l2_output_index = oracle.l2_output_index_after(withdrawal.l2_block).await?;
    let output = oracle.l2_output(l2_output_index).await?;
    let output_block = u64::try_from(output.l2BlockNumber)
        .map_err(|_| eyre!("Output block number out of range: {}", output.l2BlockNumber))?;

    debug!(
        l2_output_index = %l2_output_index,
        output_block,
        withdrawal_block = withdrawal.l2_block,
        "Found output covering withdrawal"
    );

    // proofs are taken at the output's block, not the withdrawal's
    let slot = compute_storage_slot(withdrawal.hash);
    let storage = l2_state
        .storage_proof(message_passer, slot, output_block)
        .await?;
    let roots = l2_state.block_roots(output_block).await?;

    debug!(
        proof_nodes = storage.storage_proof.len(),
        slot = %slot,
        "Generated storage proof"
    );

    let output_root_proof = OutputRootProof {
        version: OUTPUT_VERSION_V0,
        stateRoot: roots.state_root,
        messagePasserStorageRoot: storage.storage_root,
        latestBlockhash: roots.block_hash,
    };

    let output_root = compute_output_root(&output_root_proof);
    if output_root != output.outputRoot {
        return Err(eyre!(
            "Output root mismatch at L2 block {}: computed {}, committed {}",
            output_block,
            output_root,
            output.outputRoot
        ));
    }

    Ok(ProveWithdrawalParams {
        withdrawal: withdrawal.transaction.clone(),
        l2_output_index,
        output_block,
        output_root_proof,
        withdrawal_proof: storage.storage_proof.clone(),
        storage_proof: storage,
    })
}
