use alloy_network::EthereumWallet;
use alloy_primitives::Address;
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer::Signer;
use alloy_signer_local::{coins_bip39::English, MnemonicBuilder, PrivateKeySigner};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// Error with private key
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Error deriving a key from a mnemonic phrase
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// The node serves a different chain than the one configured
    #[error("Chain id mismatch: expected {expected}, node reports {actual}")]
    ChainIdMismatch { expected: u64, actual: u64 },
}

/// A signing account connected to one chain.
#[derive(Debug, Clone)]
pub struct Account<P> {
    /// Address of the signing key
    pub address: Address,
    /// Provider that signs and sends transactions from `address`
    pub provider: P,
}

/// Convenience function to create an ethereum rpc provider from url.
pub async fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Create a provider with wallet signing capability from a local signer.
pub fn create_wallet_provider(
    rpc_url: &str,
    signer: PrivateKeySigner,
) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;

    let wallet = EthereumWallet::from(signer);

    let provider = ProviderBuilder::new().wallet(wallet).connect_http(url);

    Ok(provider)
}

/// Derive a signer from a BIP-39 phrase on the default Ethereum path
/// `m/44'/60'/0'/0/{index}`.
pub fn signer_from_mnemonic(phrase: &str, index: u32) -> Result<PrivateKeySigner, ClientError> {
    MnemonicBuilder::<English>::default()
        .phrase(phrase.trim())
        .index(index)
        .map_err(|e| ClientError::InvalidMnemonic(format!("{}", e)))?
        .build()
        .map_err(|e| ClientError::InvalidMnemonic(format!("{}", e)))
}

/// Parse a hex private key, with or without `0x` prefix.
pub fn signer_from_private_key(private_key: &str) -> Result<PrivateKeySigner, ClientError> {
    private_key
        .trim()
        .parse()
        .map_err(|e| ClientError::InvalidPrivateKey(format!("{}", e)))
}

/// Bind a signer to a chain.
///
/// When `chain_id` is set the signer is pinned to it and the node must report
/// the same id, otherwise the node's chain id is used as-is.
pub async fn connect_account(
    rpc_url: &str,
    chain_id: Option<u64>,
    signer: PrivateKeySigner,
) -> Result<Account<impl Provider + Clone>, ClientError> {
    let signer = signer.with_chain_id(chain_id);
    let address = signer.address();
    let provider = create_wallet_provider(rpc_url, signer)?;

    if let Some(expected) = chain_id {
        let actual = provider
            .get_chain_id()
            .await
            .map_err(|e| ClientError::Connection(format!("{}", e)))?;
        if actual != expected {
            return Err(ClientError::ChainIdMismatch { expected, actual });
        }
    }

    debug!(%address, rpc_url, ?chain_id, "Account connected");

    Ok(Account { address, provider })
}
