//! L1 → L2 deposits through the L1 standard bridge.

use crate::{ensure_success, Action, Outcome};
use alloy_primitives::{utils::format_ether, Address, Bytes, U256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::TransactionRequest;
use binding::{opstack::IL1StandardBridge, token::IERC20};
use tracing::info;

/// Native deposit input data.
#[derive(Debug, Clone)]
pub struct BridgeEth {
    /// L1StandardBridge address
    pub l1_bridge: Address,
    pub source: Address,
    pub value: U256,
    pub gas_limit: u32,
}

/// Deposits native value to the caller's address on L2.
pub struct BridgeEthAction<P> {
    provider: P,
    action: BridgeEth,
}

impl<P: Provider + Clone> BridgeEthAction<P> {
    pub const fn new(provider: P, action: BridgeEth) -> Self {
        Self { provider, action }
    }

    /// `bridgeETH(minGasLimit, 0x)` carrying the deposited value.
    pub fn transaction_request(&self) -> TransactionRequest {
        IL1StandardBridge::new(self.action.l1_bridge, &self.provider)
            .bridgeETH(self.action.gas_limit, Bytes::new())
            .value(self.action.value)
            .into_transaction_request()
    }
}

impl<P> Action for BridgeEthAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.action.value == U256::ZERO {
            return Ok(false);
        }

        let balance = self.provider.get_balance(self.action.source).await?;
        Ok(balance >= self.action.value)
    }

    async fn execute(&self) -> eyre::Result<Outcome> {
        let receipt = self
            .provider
            .send_transaction(self.transaction_request())
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt, "Deposit")?;

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            amount = %format_ether(self.action.value),
            "Deposit submitted"
        );

        Ok(Outcome::from(&receipt))
    }

    fn description(&self) -> String {
        format!("Bridging {} ETH from L1 to L2", format_ether(self.action.value))
    }
}

/// ERC-20 deposit input data.
#[derive(Debug, Clone)]
pub struct BridgeToken {
    /// L1StandardBridge address
    pub l1_bridge: Address,
    pub source: Address,
    pub l1_token: Address,
    pub l2_token: Address,
    pub amount: U256,
    pub gas_limit: u32,
}

/// Deposits an ERC-20 token, approving the bridge first when needed.
pub struct BridgeTokenAction<P> {
    provider: P,
    action: BridgeToken,
}

impl<P: Provider + Clone> BridgeTokenAction<P> {
    pub const fn new(provider: P, action: BridgeToken) -> Self {
        Self { provider, action }
    }

    /// `approve(l1Bridge, amount)` on the L1 token.
    pub fn approve_request(&self) -> TransactionRequest {
        IERC20::new(self.action.l1_token, &self.provider)
            .approve(self.action.l1_bridge, self.action.amount)
            .into_transaction_request()
    }

    /// `depositERC20(l1Token, l2Token, amount, minGasLimit, 0x)`.
    pub fn transaction_request(&self) -> TransactionRequest {
        IL1StandardBridge::new(self.action.l1_bridge, &self.provider)
            .depositERC20(
                self.action.l1_token,
                self.action.l2_token,
                self.action.amount,
                self.action.gas_limit,
                Bytes::new(),
            )
            .into_transaction_request()
    }

    async fn ensure_allowance(&self) -> eyre::Result<()> {
        let token = IERC20::new(self.action.l1_token, &self.provider);
        let allowance = token
            .allowance(self.action.source, self.action.l1_bridge)
            .call()
            .await?;

        if allowance >= self.action.amount {
            info!(allowance = %allowance, "Token is approved to deposit");
            return Ok(());
        }

        info!(
            allowance = %allowance,
            amount = %self.action.amount,
            "Approving bridge to access token"
        );
        let receipt = self
            .provider
            .send_transaction(self.approve_request())
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt, "Approve")?;

        info!(tx_hash = %receipt.transaction_hash, "Bridge approved");
        Ok(())
    }
}

impl<P> Action for BridgeTokenAction<P>
where
    P: Provider + Clone,
{
    async fn is_ready(&self) -> eyre::Result<bool> {
        if self.action.amount == U256::ZERO
            || self.action.l1_token == Address::ZERO
            || self.action.l2_token == Address::ZERO
        {
            return Ok(false);
        }

        let token = IERC20::new(self.action.l1_token, &self.provider);
        let balance = token.balanceOf(self.action.source).call().await?;
        Ok(balance >= self.action.amount)
    }

    async fn execute(&self) -> eyre::Result<Outcome> {
        let bridge = IL1StandardBridge::new(self.action.l1_bridge, &self.provider);
        let l2_bridge = bridge.l2TokenBridge().call().await?;
        info!(l2_bridge = %l2_bridge, "Paired L2 bridge");

        self.ensure_allowance().await?;

        let receipt = self
            .provider
            .send_transaction(self.transaction_request())
            .await?
            .get_receipt()
            .await?;
        ensure_success(&receipt, "Token deposit")?;

        info!(
            tx_hash = %receipt.transaction_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            l1_token = %self.action.l1_token,
            l2_token = %self.action.l2_token,
            "Token deposit submitted"
        );

        Ok(Outcome::from(&receipt))
    }

    fn description(&self) -> String {
        format!(
            "Bridging {} of token {} from L1 to L2",
            format_ether(self.action.amount),
            self.action.l1_token
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockProvider;
    use alloy_primitives::{address, TxKind};
    use alloy_sol_types::SolCall;
    use binding::{
        opstack::IL1StandardBridge::{bridgeETHCall, depositERC20Call},
        token::IERC20::approveCall,
    };

    const L1_BRIDGE: Address = address!("3C91efB30c55FbD5782be4BbA3D9628C1074a18D");
    const SOURCE: Address = address!("5CFFA347b0aE99cc01E5c01714cA5658e54a23D1");
    const L1_TOKEN: Address = address!("00000000000000000000000000000000000000a1");
    const L2_TOKEN: Address = address!("00000000000000000000000000000000000000b2");

    fn bridge_token_action(amount: U256) -> BridgeTokenAction<MockProvider> {
        BridgeTokenAction::new(
            MockProvider,
            BridgeToken {
                l1_bridge: L1_BRIDGE,
                source: SOURCE,
                l1_token: L1_TOKEN,
                l2_token: L2_TOKEN,
                amount,
                gas_limit: 1_000_000,
            },
        )
    }

    #[test]
    fn test_bridge_eth_transaction_request() {
        let value = U256::from(10u64.pow(17));
        let action = BridgeEthAction::new(
            MockProvider,
            BridgeEth {
                l1_bridge: L1_BRIDGE,
                source: SOURCE,
                value,
                gas_limit: 1_000_000,
            },
        );

        let request = action.transaction_request();
        assert_eq!(request.to, Some(TxKind::Call(L1_BRIDGE)));
        assert_eq!(request.value, Some(value));

        let call = bridgeETHCall::abi_decode(request.input.input().unwrap()).unwrap();
        assert_eq!(call._minGasLimit, 1_000_000);
        assert!(call._extraData.is_empty());
        assert!(action.description().contains("0.1"));
    }

    #[test]
    fn test_bridge_token_requests() {
        let amount = U256::from(5u64);
        let action = bridge_token_action(amount);

        let approve = action.approve_request();
        assert_eq!(approve.to, Some(TxKind::Call(L1_TOKEN)));
        let call = approveCall::abi_decode(approve.input.input().unwrap()).unwrap();
        assert_eq!(call.spender, L1_BRIDGE);
        assert_eq!(call.amount, amount);

        let deposit = action.transaction_request();
        assert_eq!(deposit.to, Some(TxKind::Call(L1_BRIDGE)));
        let call = depositERC20Call::abi_decode(deposit.input.input().unwrap()).unwrap();
        assert_eq!(call._l1Token, L1_TOKEN);
        assert_eq!(call._l2Token, L2_TOKEN);
        assert_eq!(call._amount, amount);
        assert_eq!(call._minGasLimit, 1_000_000);
    }

    #[tokio::test]
    async fn test_bridge_token_zero_amount_not_ready() {
        let action = bridge_token_action(U256::ZERO);
        assert!(!action.is_ready().await.unwrap());
    }
}
