//! Finalize withdrawal action.
//!
//! Finalizes a proven withdrawal on L1, executing the withdrawal transaction
//! and releasing the withdrawn value to the target.

use crate::{ensure_success, Action, Outcome};
use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{BlockNumberOrTag, TransactionRequest};
use binding::opstack::{IOptimismPortal, WithdrawalTransaction};
use tracing::info;
use withdrawal::{
    OracleContract, OutputOracle, PortalContract, ProvenWithdrawal, WithdrawalHash,
    WithdrawalPortal,
};

/// Input data for finalizing a withdrawal on L1.
#[derive(Clone, Debug)]
pub struct Finalize {
    /// OptimismPortal contract address on L1
    pub portal_address: Address,
    /// L2OutputOracle contract address on L1
    pub oracle_address: Address,
    /// The withdrawal transaction details
    pub withdrawal: WithdrawalTransaction,
    /// Hash of the withdrawal
    pub withdrawal_hash: WithdrawalHash,
}

/// Action to finalize a proven withdrawal on L1.
pub struct FinalizeAction<P> {
    l1_provider: P,
    action: Finalize,
}

impl<P> FinalizeAction<P>
where
    P: Provider + Clone,
{
    pub const fn new(l1_provider: P, action: Finalize) -> Self {
        Self {
            l1_provider,
            action,
        }
    }

    /// Get the withdrawal hash for this action.
    pub const fn withdrawal_hash(&self) -> WithdrawalHash {
        self.action.withdrawal_hash
    }

    fn portal(&self) -> PortalContract<P> {
        PortalContract::new(self.action.portal_address, self.l1_provider.clone())
    }

    async fn check_is_finalized(&self) -> eyre::Result<bool> {
        self.portal().is_finalized(self.action.withdrawal_hash).await
    }

    /// Timestamp at which the withdrawal was proven, if it was.
    async fn check_is_proven(&self) -> eyre::Result<Option<u64>> {
        let proven = self
            .portal()
            .proven_withdrawal(self.action.withdrawal_hash)
            .await?;
        Ok(proven.map(|p| p.timestamp))
    }

    fn oracle(&self) -> OracleContract<P> {
        OracleContract::new(self.action.oracle_address, self.l1_provider.clone())
    }

    async fn get_current_timestamp(&self) -> eyre::Result<u64> {
        let block = self
            .l1_provider
            .get_block_by_number(BlockNumberOrTag::Latest)
            .await?
            .ok_or_else(|| eyre::eyre!("Failed to get latest block"))?;
        Ok(block.header.timestamp)
    }

    /// Seconds left before the proven withdrawal can be finalized.
    async fn remaining_period(&self, proven_timestamp: u64) -> eyre::Result<Option<u64>> {
        let period = self.oracle().finalization_period_seconds().await?;
        let now = self.get_current_timestamp().await?;
        Ok(finalization_wait(proven_timestamp, period, now))
    }

    /// `finalizeWithdrawalTransaction` call for this withdrawal.
    pub fn transaction_request(&self) -> TransactionRequest {
        IOptimismPortal::new(self.action.portal_address, &self.l1_provider)
            .finalizeWithdrawalTransaction(self.action.withdrawal.clone())
            .into_transaction_request()
    }
}

/// Seconds to wait until `now` is strictly past `proven_timestamp + period`,
/// or `None` once it is.
pub fn finalization_wait(proven_timestamp: u64, period: u64, now: u64) -> Option<u64> {
    let matures_at = proven_timestamp.saturating_add(period);
    (now <= matures_at).then(|| matures_at - now + 1)
}

/// Fail unless the withdrawal is proven, not finalized and past its
/// finalization period at `now`.
pub async fn ensure_finalizable<W, O>(
    portal: &W,
    oracle: &O,
    hash: WithdrawalHash,
    now: u64,
) -> eyre::Result<ProvenWithdrawal>
where
    W: WithdrawalPortal,
    O: OutputOracle,
{
    if portal.is_finalized(hash).await? {
        eyre::bail!("Withdrawal already finalized")
    }

    let Some(proven) = portal.proven_withdrawal(hash).await? else {
        eyre::bail!("Withdrawal not proven yet")
    };

    let period = oracle.finalization_period_seconds().await?;
    if let Some(remaining) = finalization_wait(proven.timestamp, period, now) {
        eyre::bail!(
            "Finalization period not elapsed. {} seconds remaining",
            remaining
        )
    }

    Ok(proven)
}

impl<P> Action for FinalizeAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.check_is_finalized().await? {
            return Ok(false);
        }

        let Some(proven_timestamp) = self.check_is_proven().await? else {
            return Ok(false);
        };

        Ok(self.remaining_period(proven_timestamp).await?.is_none())
    }

    async fn is_completed(&self) -> eyre::Result<bool> {
        self.check_is_finalized().await
    }

    async fn execute(&self) -> eyre::Result<Outcome> {
        let now = self.get_current_timestamp().await?;
        let proven = ensure_finalizable(
            &self.portal(),
            &self.oracle(),
            self.action.withdrawal_hash,
            now,
        )
        .await?;

        info!(
            withdrawal_hash = %self.action.withdrawal_hash,
            proven_timestamp = proven.timestamp,
            "Finalizing withdrawal"
        );

        let receipt = self
            .l1_provider
            .send_transaction(self.transaction_request())
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt, "Finalize")?;

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            withdrawal_hash = %self.action.withdrawal_hash,
            "Withdrawal finalized on L1"
        );

        Ok(Outcome::from(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Finalizing withdrawal {} on L1",
            self.action.withdrawal_hash
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockOracle, MockPortal, MockProvider};
    use alloy_primitives::{address, b256, Bytes, TxKind, B256, U256};
    use alloy_sol_types::SolCall;
    use binding::opstack::IOptimismPortal::finalizeWithdrawalTransactionCall;

    const PORTAL: Address = address!("0d605bb7d4FB586eAB750205F5247825F4D8AF4B");

    fn withdrawal_tx() -> WithdrawalTransaction {
        WithdrawalTransaction {
            nonce: U256::from(1),
            sender: address!("5CFFA347b0aE99cc01E5c01714cA5658e54a23D1"),
            target: address!("5CFFA347b0aE99cc01E5c01714cA5658e54a23D1"),
            value: U256::from(1000000000000000u64), // 0.001 ETH
            gasLimit: U256::from(1_000_000),
            data: Bytes::new(),
        }
    }

    fn create_test_finalize_action() -> FinalizeAction<MockProvider> {
        let finalize = Finalize {
            portal_address: PORTAL,
            oracle_address: address!("74Ad6E0FB793eB5e6c1ff1225B03F5C5fFB7EF0c"),
            withdrawal: withdrawal_tx(),
            withdrawal_hash: b256!(
                "1111111111111111111111111111111111111111111111111111111111111111"
            ),
        };

        FinalizeAction::new(MockProvider, finalize)
    }

    #[test]
    fn test_finalize_action_description() {
        let action = create_test_finalize_action();
        let desc = action.description();
        assert!(desc.contains("Finalizing withdrawal"));
        assert!(desc.contains("1111111111111111111111111111111111111111111111111111111111111111"));
    }

    #[test]
    fn test_finalize_transaction_request() {
        let action = create_test_finalize_action();
        let request = action.transaction_request();
        assert_eq!(request.to, Some(TxKind::Call(PORTAL)));

        let call =
            finalizeWithdrawalTransactionCall::abi_decode(request.input.input().unwrap()).unwrap();
        assert_eq!(call._tx, withdrawal_tx());
    }

    #[test]
    fn test_finalization_wait() {
        // proven at 1000 with a 600s period: finalizable strictly after 1600
        assert_eq!(finalization_wait(1_000, 600, 1_000), Some(601));
        assert_eq!(finalization_wait(1_000, 600, 1_600), Some(1));
        assert_eq!(finalization_wait(1_000, 600, 1_601), None);
        assert_eq!(finalization_wait(1_000, 0, 1_001), None);
    }

    const HASH: WithdrawalHash =
        b256!("1111111111111111111111111111111111111111111111111111111111111111");
    const ORACLE: MockOracle = MockOracle {
        latest: 0,
        period: 600,
    };

    fn proven_at(timestamp: u64) -> ProvenWithdrawal {
        ProvenWithdrawal {
            output_root: B256::repeat_byte(0xee),
            timestamp,
            l2_output_index: 3,
        }
    }

    #[tokio::test]
    async fn test_ensure_finalizable() {
        let portal = MockPortal::default().with_proven(HASH, proven_at(1_000));

        let proven = ensure_finalizable(&portal, &ORACLE, HASH, 1_601)
            .await
            .unwrap();
        assert_eq!(proven.timestamp, 1_000);
    }

    #[tokio::test]
    async fn test_ensure_finalizable_already_finalized() {
        let portal = MockPortal::default()
            .with_proven(HASH, proven_at(1_000))
            .with_finalized(HASH);

        let err = ensure_finalizable(&portal, &ORACLE, HASH, 5_000)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Withdrawal already finalized");
    }

    #[tokio::test]
    async fn test_ensure_finalizable_not_proven() {
        let err = ensure_finalizable(&MockPortal::default(), &ORACLE, HASH, 5_000)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Withdrawal not proven yet");
    }

    #[tokio::test]
    async fn test_ensure_finalizable_period_not_elapsed() {
        let portal = MockPortal::default().with_proven(HASH, proven_at(1_000));

        let err = ensure_finalizable(&portal, &ORACLE, HASH, 1_600)
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Finalization period not elapsed. 1 seconds remaining"
        );
    }
}
