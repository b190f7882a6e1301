use crate::types::{ProvenWithdrawal, StatusContext, WithdrawalHash, WithdrawalStatus};
use alloy_contract::private::Provider;
use alloy_primitives::{Address, B256, U256};
use binding::opstack::{IL2OutputOracle, IOptimismPortal, OutputProposal};
use eyre::eyre;
use std::{
    future::Future,
    time::{SystemTime, UNIX_EPOCH},
};
use tracing::debug;

/// Read access to the L1 output oracle.
pub trait OutputOracle: Send + Sync {
    /// Index of the first output whose L2 block is at or after `l2_block`.
    fn l2_output_index_after(&self, l2_block: u64)
        -> impl Future<Output = eyre::Result<U256>> + Send;

    fn l2_output(&self, index: U256) -> impl Future<Output = eyre::Result<OutputProposal>> + Send;

    /// Highest L2 block number committed so far.
    fn latest_block_number(&self) -> impl Future<Output = eyre::Result<u64>> + Send;

    fn finalization_period_seconds(&self) -> impl Future<Output = eyre::Result<u64>> + Send;
}

/// Read access to the L1 portal's withdrawal bookkeeping.
pub trait WithdrawalPortal: Send + Sync {
    fn is_finalized(&self, hash: WithdrawalHash) -> impl Future<Output = eyre::Result<bool>> + Send;

    /// Proof record for `hash`, or `None` if it was never proven.
    fn proven_withdrawal(
        &self,
        hash: WithdrawalHash,
    ) -> impl Future<Output = eyre::Result<Option<ProvenWithdrawal>>> + Send;
}

/// `L2OutputOracle` deployed on L1.
#[derive(Debug, Clone)]
pub struct OracleContract<P> {
    address: Address,
    provider: P,
}

impl<P> OracleContract<P> {
    pub const fn new(address: Address, provider: P) -> Self {
        Self { address, provider }
    }
}

impl<P: Provider + Clone> OutputOracle for OracleContract<P> {
    async fn l2_output_index_after(&self, l2_block: u64) -> eyre::Result<U256> {
        let oracle = IL2OutputOracle::new(self.address, &self.provider);
        // reverts until an output covering the block has been proposed
        oracle
            .getL2OutputIndexAfter(U256::from(l2_block))
            .call()
            .await
            .map_err(|e| eyre!("No output committed for L2 block {} yet: {}", l2_block, e))
    }

    async fn l2_output(&self, index: U256) -> eyre::Result<OutputProposal> {
        let oracle = IL2OutputOracle::new(self.address, &self.provider);
        Ok(oracle.getL2Output(index).call().await?)
    }

    async fn latest_block_number(&self) -> eyre::Result<u64> {
        let oracle = IL2OutputOracle::new(self.address, &self.provider);
        let latest = oracle.latestBlockNumber().call().await?;
        Ok(latest.saturating_to())
    }

    async fn finalization_period_seconds(&self) -> eyre::Result<u64> {
        let oracle = IL2OutputOracle::new(self.address, &self.provider);
        let period = oracle.FINALIZATION_PERIOD_SECONDS().call().await?;
        Ok(period.saturating_to())
    }
}

/// `OptimismPortal` deployed on L1.
#[derive(Debug, Clone)]
pub struct PortalContract<P> {
    address: Address,
    provider: P,
}

impl<P> PortalContract<P> {
    pub const fn new(address: Address, provider: P) -> Self {
        Self { address, provider }
    }
}

impl<P: Provider + Clone> WithdrawalPortal for PortalContract<P> {
    async fn is_finalized(&self, hash: WithdrawalHash) -> eyre::Result<bool> {
        let portal = IOptimismPortal::new(self.address, &self.provider);
        Ok(portal.finalizedWithdrawals(hash).call().await?)
    }

    async fn proven_withdrawal(&self, hash: WithdrawalHash) -> eyre::Result<Option<ProvenWithdrawal>> {
        let portal = IOptimismPortal::new(self.address, &self.provider);
        let proven = portal.provenWithdrawals(hash).call().await?;

        if proven.outputRoot == B256::ZERO {
            return Ok(None);
        }

        Ok(Some(ProvenWithdrawal {
            output_root: proven.outputRoot,
            timestamp: proven.timestamp.try_into().unwrap_or(u64::MAX),
            l2_output_index: proven.l2OutputIndex.try_into().unwrap_or(u64::MAX),
        }))
    }
}

impl StatusContext {
    /// Snapshot the oracle values needed to evaluate withdrawal statuses at `now`.
    pub async fn load<O: OutputOracle>(oracle: &O, now: u64) -> eyre::Result<Self> {
        let latest_committed_block = oracle.latest_block_number().await?;
        let finalization_period = oracle.finalization_period_seconds().await?;

        debug!(
            latest_committed_block,
            finalization_period, now, "Loaded oracle status context"
        );

        Ok(Self {
            latest_committed_block,
            finalization_period,
            now,
        })
    }
}

/// Query the portal and derive the status of one withdrawal.
pub async fn query_withdrawal_status<W: WithdrawalPortal>(
    portal: &W,
    ctx: &StatusContext,
    hash: WithdrawalHash,
    l2_block: u64,
) -> eyre::Result<WithdrawalStatus> {
    let proven = portal.proven_withdrawal(hash).await?;
    let is_finalized = portal.is_finalized(hash).await?;

    Ok(WithdrawalStatus::evaluate(
        proven.as_ref(),
        is_finalized,
        l2_block,
        ctx,
    ))
}

/// Current unix time in seconds.
pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{MockOracle, MockPortal};

    #[tokio::test]
    async fn test_status_context_load() {
        let oracle = MockOracle::default().with_latest(1_200).with_period(604_800);
        let ctx = StatusContext::load(&oracle, 1_700_000_000).await.unwrap();

        assert_eq!(ctx.latest_committed_block, 1_200);
        assert_eq!(ctx.finalization_period, 604_800);
        assert_eq!(ctx.now, 1_700_000_000);
    }

    #[tokio::test]
    async fn test_query_status_unproven() {
        let portal = MockPortal::default();
        let ctx = StatusContext {
            latest_committed_block: 1_200,
            finalization_period: 12,
            now: 1_000,
        };

        let status = query_withdrawal_status(&portal, &ctx, B256::repeat_byte(1), 1_000)
            .await
            .unwrap();
        assert!(status.is_ready_to_prove);
        assert!(!status.is_proven);
    }

    #[tokio::test]
    async fn test_query_status_proven_and_matured() {
        let hash = B256::repeat_byte(1);
        let portal = MockPortal::default().with_proven(
            hash,
            ProvenWithdrawal {
                output_root: B256::repeat_byte(9),
                timestamp: 900,
                l2_output_index: 4,
            },
        );
        let ctx = StatusContext {
            latest_committed_block: 1_200,
            finalization_period: 12,
            now: 1_000,
        };

        let status = query_withdrawal_status(&portal, &ctx, hash, 1_000)
            .await
            .unwrap();
        assert!(status.is_proven);
        assert!(status.is_ready_to_finalize);
        assert!(!status.is_ready_to_prove);
    }

    #[test]
    fn test_unix_now_is_recent() {
        // 2023-01-01
        assert!(unix_now() > 1_672_531_200);
    }
}
