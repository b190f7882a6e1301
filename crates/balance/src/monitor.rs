use crate::{Balance, BalanceQuery, Monitor, TokenMetadata, NATIVE_SYMBOL};
use alloy_primitives::Address;
use alloy_provider::Provider;
use binding::token::IERC20;
use eyre::Result;
use tracing::debug;

// Balance monitor implementation.
#[derive(Debug, Clone)]
pub struct BalanceMonitor<P> {
    provider: P,
}

impl<P> BalanceMonitor<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    async fn query_native(&self, address: Address) -> Result<Balance> {
        debug!(address = %address, "Querying native balance");

        let balance = self.provider.get_balance(address).await?;

        Ok(Balance {
            holder: address,
            asset: Address::ZERO,
            amount: balance,
            decimals: 18,
            symbol: NATIVE_SYMBOL.to_string(),
        })
    }

    async fn query_erc20(&self, token: Address, holder: Address) -> Result<Balance> {
        debug!(token = %token, holder = %holder, "Querying erc20 balance");

        let contract = IERC20::new(token, &self.provider);
        let amount = contract.balanceOf(holder).call().await?;
        let decimals = contract.decimals().call().await?;
        let symbol = contract.symbol().call().await?;

        Ok(Balance {
            holder,
            asset: token,
            amount,
            decimals,
            symbol,
        })
    }
}

impl<P> Monitor for BalanceMonitor<P>
where
    P: Provider + Clone,
{
    async fn query_balance(&self, query: BalanceQuery) -> Result<Balance> {
        match query {
            BalanceQuery::ERC20Balance { token, holder } => self.query_erc20(token, holder).await,
            BalanceQuery::NativeBalance { address } => self.query_native(address).await,
        }
    }
}

impl<P> TokenMetadata for BalanceMonitor<P>
where
    P: Provider + Clone,
{
    async fn symbol(&self, token: Address) -> Result<String> {
        let contract = IERC20::new(token, &self.provider);
        Ok(contract.symbol().call().await?)
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        let contract = IERC20::new(token, &self.provider);
        Ok(contract.decimals().call().await?)
    }
}
