//! Prove withdrawal action.
//!
//! Submits a proof to L1 that a withdrawal was initiated on L2.

use crate::{ensure_success, Action, Outcome};
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionRequest;
use binding::opstack::IOptimismPortal;
use tracing::info;
use withdrawal::{
    generate_proof, InitiatedWithdrawal, L2Node, OracleContract, OutputOracle, PortalContract,
    ProveWithdrawalParams, WithdrawalHash, WithdrawalPortal,
};

/// Input data for proving a withdrawal on L1.
#[derive(Clone, Debug)]
pub struct Prove {
    /// OptimismPortal contract address on L1
    pub portal_address: Address,
    /// L2OutputOracle contract address on L1
    pub oracle_address: Address,
    /// L2ToL1MessagePasser address on L2
    pub message_passer: Address,
    /// The withdrawal, as recovered from its L2 receipt
    pub withdrawal: InitiatedWithdrawal,
}

/// Action to prove a withdrawal on L1.
pub struct ProveAction<P1, P2> {
    l1_provider: P1,
    l2_provider: P2,
    action: Prove,
}

impl<P1, P2> ProveAction<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    pub const fn new(l1_provider: P1, l2_provider: P2, action: Prove) -> Self {
        Self {
            l1_provider,
            l2_provider,
            action,
        }
    }

    /// Get the withdrawal hash for this action.
    pub const fn withdrawal_hash(&self) -> WithdrawalHash {
        self.action.withdrawal.hash
    }

    fn portal(&self) -> PortalContract<P1> {
        PortalContract::new(self.action.portal_address, self.l1_provider.clone())
    }

    fn oracle(&self) -> OracleContract<P1> {
        OracleContract::new(self.action.oracle_address, self.l1_provider.clone())
    }

    async fn check_is_proven(&self) -> eyre::Result<bool> {
        let proven = self.portal().proven_withdrawal(self.withdrawal_hash()).await?;
        Ok(proven.is_some())
    }

    /// `proveWithdrawalTransaction` call for the given proof.
    pub fn transaction_request(&self, params: ProveWithdrawalParams) -> TransactionRequest {
        IOptimismPortal::new(self.action.portal_address, &self.l1_provider)
            .proveWithdrawalTransaction(
                params.withdrawal,
                params.l2_output_index,
                params.output_root_proof,
                params.withdrawal_proof,
            )
            .into_transaction_request()
    }
}

/// Fail unless `withdrawal` is unproven and its L2 block is committed to the oracle.
pub async fn ensure_provable<W, O>(
    portal: &W,
    oracle: &O,
    withdrawal: &InitiatedWithdrawal,
) -> eyre::Result<()>
where
    W: WithdrawalPortal,
    O: OutputOracle,
{
    if portal.proven_withdrawal(withdrawal.hash).await?.is_some() {
        eyre::bail!("Withdrawal already proven")
    }

    let latest = oracle.latest_block_number().await?;
    if latest < withdrawal.l2_block {
        eyre::bail!(
            "L2 block {} is not committed to the output oracle yet (latest committed block {})",
            withdrawal.l2_block,
            latest
        )
    }

    Ok(())
}

impl<P1, P2> Action for ProveAction<P1, P2>
where
    P1: Provider + Clone,
    P2: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.check_is_proven().await? {
            return Ok(false);
        }
        let latest = self.oracle().latest_block_number().await?;
        Ok(latest >= self.action.withdrawal.l2_block)
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        self.check_is_proven().await
    }

    async fn execute(&self) -> eyre::Result<Outcome> {
        ensure_provable(&self.portal(), &self.oracle(), &self.action.withdrawal).await?;

        info!(
            withdrawal_hash = %self.withdrawal_hash(),
            l2_block = self.action.withdrawal.l2_block,
            "Generating withdrawal proof"
        );

        let l2_node = L2Node::new(self.l2_provider.clone());
        let params = generate_proof(
            &self.oracle(),
            &l2_node,
            self.action.message_passer,
            &self.action.withdrawal,
        )
        .await?;

        let l2_output_index = params.l2_output_index;
        info!(
            l2_output_index = %l2_output_index,
            output_block = params.output_block,
            proof_nodes = params.withdrawal_proof.len(),
            "Proof generated, submitting to L1"
        );

        let receipt = self
            .l1_provider
            .send_transaction(self.transaction_request(params))
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt, "Prove")?;

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            withdrawal_hash = %self.withdrawal_hash(),
            l2_output_index = %l2_output_index,
            "Withdrawal proven on L1"
        );

        Ok(Outcome::from(&receipt))
    }

    fn description(&self) -> String {
        format!("Proving withdrawal {} on L1", self.withdrawal_hash())
    }
}
