use crate::{ensure_success, Action, Outcome};
use alloy_primitives::{utils::format_ether, Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionRequest;
use binding::{opstack::IL2StandardBridge, token::IERC20};
use tracing::{info, warn};
use withdrawal::decode_withdrawal_message;

/// Extra data attached to bridge withdrawals.
pub const WITHDRAW_EXTRA_DATA: [u8; 1] = [0x01];

/// ERC-20 withdrawal input data.
#[derive(Clone, Debug)]
pub struct WithdrawToken {
    /// L2StandardBridge address
    pub l2_bridge: Address,
    /// L2ToL1MessagePasser address, emitter of the resulting MessagePassed event
    pub message_passer: Address,
    pub source: Address,
    /// Token address on L2
    pub token: Address,
    pub amount: U256,
    pub gas_limit: u32,
}

/// Initiates an ERC-20 withdrawal through the L2 standard bridge.
pub struct WithdrawTokenAction<P> {
    provider: P,
    action: WithdrawToken,
}

impl<P: Provider + Clone> WithdrawTokenAction<P> {
    pub const fn new(provider: P, action: WithdrawToken) -> Self {
        Self { provider, action }
    }

    /// `withdraw(token, amount, minGasLimit, 0x01)` on the L2 bridge.
    pub fn transaction_request(&self) -> TransactionRequest {
        IL2StandardBridge::new(self.action.l2_bridge, &self.provider)
            .withdraw(
                self.action.token,
                self.action.amount,
                self.action.gas_limit,
                Bytes::from_static(&WITHDRAW_EXTRA_DATA),
            )
            .into_transaction_request()
    }
}

impl<P> Action for WithdrawTokenAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.action.amount == U256::ZERO || self.action.token == Address::ZERO {
            return Ok(false);
        }

        let token = IERC20::new(self.action.token, &self.provider);
        let balance = token.balanceOf(self.action.source).call().await?;
        Ok(balance >= self.action.amount)
    }

    async fn execute(&self) -> eyre::Result<Outcome> {
        let receipt = self
            .provider
            .send_transaction(self.transaction_request())
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt, "Token withdrawal")?;

        match decode_withdrawal_message(receipt.inner.logs(), self.action.message_passer) {
            Ok((_, withdrawal_hash)) => info!(
                tx_hash = %receipt.transaction_hash,
                block_number = receipt.block_number,
                gas_used = receipt.gas_used,
                token = %self.action.token,
                withdrawal_hash = %withdrawal_hash,
                "Token withdrawal initiated"
            ),
            Err(e) => warn!(
                tx_hash = %receipt.transaction_hash,
                error = %e,
                "Token withdrawal sent but its MessagePassed event could not be decoded"
            ),
        }

        Ok(Outcome::from(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Withdrawing {} of token {} from L2",
            format_ether(self.action.amount),
            self.action.token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;
    use alloy_primitives::{address, TxKind};
    use alloy_sol_types::SolCall;
    use binding::opstack::{
        IL2StandardBridge::withdrawCall, L2_STANDARD_BRIDGE_ADDRESS, MESSAGE_PASSER_ADDRESS,
    };

    const TOKEN: Address = address!("b03eef386a61b5b462051636001485fffdd3d843");

    fn create_test_action(token: Address, amount: U256) -> WithdrawTokenAction<MockProvider> {
        WithdrawTokenAction::new(
            MockProvider,
            WithdrawToken {
                l2_bridge: L2_STANDARD_BRIDGE_ADDRESS,
                message_passer: MESSAGE_PASSER_ADDRESS,
                source: address!("5CFFA347b0aE99cc01E5c01714cA5658e54a23D1"),
                token,
                amount,
                gas_limit: 1_000_000,
            },
        )
    }

    #[test]
    fn test_withdraw_token_transaction_request() {
        let amount = U256::from(2_000_000_000_000_000_000u128);
        let action = create_test_action(TOKEN, amount);

        let request = action.transaction_request();
        assert_eq!(request.to, Some(TxKind::Call(L2_STANDARD_BRIDGE_ADDRESS)));
        assert!(request.value.is_none_or(|v| v.is_zero()));

        let call = withdrawCall::abi_decode(request.input.input().unwrap()).unwrap();
        assert_eq!(call._l2Token, TOKEN);
        assert_eq!(call._amount, amount);
        assert_eq!(call._minGasLimit, 1_000_000);
        assert_eq!(call._extraData.as_ref(), &[0x01]);
    }

    #[tokio::test]
    async fn test_withdraw_token_not_ready_without_token() {
        let action = create_test_action(Address::ZERO, U256::from(1));
        assert!(!action.is_ready().await.unwrap());
    }

    #[tokio::test]
    async fn test_withdraw_token_not_ready_zero_amount() {
        let action = create_test_action(TOKEN, U256::ZERO);
        assert!(!action.is_ready().await.unwrap());
    }
}
