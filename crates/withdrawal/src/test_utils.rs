use crate::{
    hash::compute_withdrawal_hash,
    message::{ReceiptSource, WithdrawalReceipt},
    proof::{BlockRoots, StateProofSource, StorageProof},
    state::{OutputOracle, WithdrawalPortal},
    types::{ProvenWithdrawal, WithdrawalHash},
};
use alloy_primitives::{Address, Bytes, TxHash, B256, U256};
use alloy_rpc_types_eth::Log;
use alloy_sol_types::SolEvent;
use binding::opstack::{
    IL2ToL1MessagePasser::MessagePassed, OutputProposal, WithdrawalTransaction,
};
use eyre::eyre;
use std::{
    collections::{BTreeMap, HashMap, HashSet},
    sync::Mutex,
};

/// nonce=5, sender=0x..0a, target=0x..0b, value=1000, gasLimit=1_000_000, empty data
pub(crate) fn sample_transaction() -> WithdrawalTransaction {
    WithdrawalTransaction {
        nonce: U256::from(5),
        sender: Address::with_last_byte(0x0a),
        target: Address::with_last_byte(0x0b),
        value: U256::from(1000),
        gasLimit: U256::from(1_000_000),
        data: Bytes::new(),
    }
}

pub(crate) fn sample_message() -> MessagePassed {
    let tx = sample_transaction();
    MessagePassed {
        withdrawalHash: compute_withdrawal_hash(&tx),
        nonce: tx.nonce,
        sender: tx.sender,
        target: tx.target,
        value: tx.value,
        gasLimit: tx.gasLimit,
        data: tx.data,
    }
}

pub(crate) fn message_passed_log(emitter: Address, event: MessagePassed) -> Log {
    Log {
        inner: alloy_primitives::Log {
            address: emitter,
            data: event.encode_log_data(),
        },
        ..Default::default()
    }
}

#[derive(Default)]
pub(crate) struct MockOracle {
    outputs: BTreeMap<U256, OutputProposal>,
    latest: u64,
    period: u64,
}

impl MockOracle {
    pub(crate) fn with_output(mut self, index: U256, output: OutputProposal) -> Self {
        self.outputs.insert(index, output);
        self
    }

    pub(crate) const fn with_latest(mut self, latest: u64) -> Self {
        self.latest = latest;
        self
    }

    pub(crate) const fn with_period(mut self, period: u64) -> Self {
        self.period = period;
        self
    }
}

impl OutputOracle for MockOracle {
    async fn l2_output_index_after(&self, l2_block: u64) -> eyre::Result<U256> {
        self.outputs
            .iter()
            .find(|(_, output)| output.l2BlockNumber >= u128::from(l2_block))
            .map(|(index, _)| *index)
            .ok_or_else(|| eyre!("execution reverted"))
    }

    async fn l2_output(&self, index: U256) -> eyre::Result<OutputProposal> {
        self.outputs
            .get(&index)
            .cloned()
            .ok_or_else(|| eyre!("execution reverted"))
    }

    async fn latest_block_number(&self) -> eyre::Result<u64> {
        Ok(self.latest)
    }

    async fn finalization_period_seconds(&self) -> eyre::Result<u64> {
        Ok(self.period)
    }
}

#[derive(Default)]
pub(crate) struct MockPortal {
    proven: HashMap<WithdrawalHash, ProvenWithdrawal>,
    finalized: HashSet<WithdrawalHash>,
}

impl MockPortal {
    pub(crate) fn with_proven(mut self, hash: WithdrawalHash, proven: ProvenWithdrawal) -> Self {
        self.proven.insert(hash, proven);
        self
    }
}

impl WithdrawalPortal for MockPortal {
    async fn is_finalized(&self, hash: WithdrawalHash) -> eyre::Result<bool> {
        Ok(self.finalized.contains(&hash))
    }

    async fn proven_withdrawal(&self, hash: WithdrawalHash) -> eyre::Result<Option<ProvenWithdrawal>> {
        Ok(self.proven.get(&hash).copied())
    }
}

#[derive(Default)]
pub(crate) struct MockL2State {
    pub(crate) storage: StorageProof,
    pub(crate) roots: BlockRoots,
    pub(crate) requests: Mutex<Vec<(Address, B256, u64)>>,
}

impl StateProofSource for MockL2State {
    async fn storage_proof(
        &self,
        account: Address,
        slot: B256,
        block: u64,
    ) -> eyre::Result<StorageProof> {
        self.requests
            .lock()
            .map_err(|_| eyre!("poisoned"))?
            .push((account, slot, block));
        Ok(self.storage.clone())
    }

    async fn block_roots(&self, _block: u64) -> eyre::Result<BlockRoots> {
        Ok(self.roots)
    }
}

#[derive(Default)]
pub(crate) struct MockReceipts {
    receipts: HashMap<TxHash, WithdrawalReceipt>,
}

impl MockReceipts {
    pub(crate) fn with_receipt(mut self, receipt: WithdrawalReceipt) -> Self {
        self.receipts.insert(receipt.tx_hash, receipt);
        self
    }
}

impl ReceiptSource for MockReceipts {
    async fn receipt(&self, tx_hash: TxHash) -> eyre::Result<Option<WithdrawalReceipt>> {
        Ok(self.receipts.get(&tx_hash).cloned())
    }
}
