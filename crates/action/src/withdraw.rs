use crate::{ensure_success, Action, Outcome};
use alloy_primitives::{utils::format_ether, Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionRequest;
use binding::opstack::IL2ToL1MessagePasser;
use tracing::{info, warn};
use withdrawal::decode_withdrawal_message;

/// Native withdrawal input data.
#[derive(Clone, Debug)]
pub struct Withdraw {
    /// L2ToL1MessagePasser address
    pub message_passer: Address,
    /// Account paying the withdrawn value on L2
    pub source: Address,
    /// Recipient on L1
    pub target: Address,
    pub value: U256,
    pub gas_limit: u32,
}

/// Initiates a native withdrawal through the message passer.
pub struct WithdrawAction<P> {
    provider: P,
    action: Withdraw,
}

impl<P: Provider + Clone> WithdrawAction<P> {
    pub const fn new(provider: P, action: Withdraw) -> Self {
        Self { provider, action }
    }

    /// `initiateWithdrawal(target, gasLimit, 0x)` carrying the withdrawn value.
    pub fn transaction_request(&self) -> TransactionRequest {
        IL2ToL1MessagePasser::new(self.action.message_passer, &self.provider)
            .initiateWithdrawal(
                self.action.target,
                U256::from(self.action.gas_limit),
                Bytes::new(),
            )
            .value(self.action.value)
            .into_transaction_request()
    }
}

impl<P> Action for WithdrawAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.action.value == U256::ZERO {
            return Ok(false);
        }

        if self.action.target == Address::ZERO {
            return Ok(false);
        }

        let balance = self.provider.get_balance(self.action.source).await?;
        Ok(balance >= self.action.value)
    }

    async fn execute(&self) -> eyre::Result<Outcome> {
        let message_passer = IL2ToL1MessagePasser::new(self.action.message_passer, &self.provider);
        let nonce = message_passer.messageNonce().call().await?;
        info!(nonce = %nonce, "Message nonce");

        let receipt = self
            .provider
            .send_transaction(self.transaction_request())
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt, "Withdrawal")?;

        match decode_withdrawal_message(receipt.inner.logs(), self.action.message_passer) {
            Ok((withdrawal_tx, withdrawal_hash)) => info!(
                tx_hash = %receipt.transaction_hash,
                block_number = receipt.block_number,
                gas_used = receipt.gas_used,
                withdrawal_hash = %withdrawal_hash,
                withdrawal_tx = ?withdrawal_tx,
                amount = %format_ether(self.action.value),
                "Withdrawal initiated"
            ),
            Err(e) => warn!(
                tx_hash = %receipt.transaction_hash,
                error = %e,
                "Withdrawal sent but its MessagePassed event could not be decoded"
            ),
        }

        Ok(Outcome::from(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Withdrawing {} ETH from L2 to {}",
            format_ether(self.action.value),
            self.action.target
        )
    }
}
