use crate::{
    message::{ReceiptSource, WithdrawalReceipt},
    proof::{BlockRoots, StateProofSource, StorageProof},
};
use alloy_contract::private::Provider;
use alloy_primitives::{Address, TxHash, B256};
use alloy_rpc_types_eth::BlockNumberOrTag;
use eyre::eyre;

/// L2 execution node, queried for receipts and state proofs.
#[derive(Debug, Clone)]
pub struct L2Node<P> {
    provider: P,
}

impl<P> L2Node<P> {
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P: Provider + Clone> ReceiptSource for L2Node<P> {
    async fn receipt(&self, tx_hash: TxHash) -> eyre::Result<Option<WithdrawalReceipt>> {
        let Some(receipt) = self.provider.get_transaction_receipt(tx_hash).await? else {
            return Ok(None);
        };

        Ok(Some(WithdrawalReceipt {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            logs: receipt.inner.logs().to_vec(),
        }))
    }
}

impl<P: Provider + Clone> StateProofSource for L2Node<P> {
    async fn storage_proof(
        &self,
        account: Address,
        slot: B256,
        block: u64,
    ) -> eyre::Result<StorageProof> {
        let proof = self
            .provider
            .get_proof(account, vec![slot])
            .block_id(BlockNumberOrTag::Number(block).into())
            .await?;

        let slot_proof = proof
            .storage_proof
            .into_iter()
            .next()
            .ok_or_else(|| eyre!("No storage proof returned"))?;

        Ok(StorageProof {
            account_proof: proof.account_proof,
            storage_proof: slot_proof.proof,
            storage_value: slot_proof.value,
            storage_root: proof.storage_hash,
        })
    }

    async fn block_roots(&self, block: u64) -> eyre::Result<BlockRoots> {
        let header = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(block))
            .await?
            .ok_or_else(|| eyre!("Block not found: {}", block))?
            .header;

        Ok(BlockRoots {
            state_root: header.state_root,
            block_hash: header.hash,
        })
    }
}
