//! Network configuration for the withdrawal flow.
//!
//! Provides the chain endpoints, contract addresses and constants needed by
//! every command. Nothing here is read from module-level globals: callers
//! build a [`NetworkConfig`] and pass it down.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Gas limit forwarded to L1 when relaying a withdrawal or deposit.
pub const DEFAULT_GAS_LIMIT: u32 = 1_000_000;

/// Known deployments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    /// Hera testnet (L2) settling on JIBCHAIN testnet (L1).
    HeraTestnet,
}

/// Endpoint and identity of a single chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint url
    pub rpc_url: String,
    /// Expected chain id. When unset the signer follows whatever the node reports.
    pub chain_id: Option<u64>,
}

/// Addresses of the bridge contracts on both layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    /// L1StandardBridge (L1)
    pub l1_standard_bridge: Address,
    /// L2StandardBridge (L2 predeploy)
    pub l2_standard_bridge: Address,
    /// L2ToL1MessagePasser (L2 predeploy)
    pub l2_to_l1_message_passer: Address,
    /// L2OutputOracle (L1)
    pub l2_output_oracle: Address,
    /// OptimismPortal (L1)
    pub optimism_portal: Address,
}

impl ContractAddresses {
    /// Hera testnet deployment.
    pub const fn hera_testnet() -> Self {
        Self {
            l1_standard_bridge: address!("3C91efB30c55FbD5782be4BbA3D9628C1074a18D"),
            l2_standard_bridge: address!("4200000000000000000000000000000000000010"),
            l2_to_l1_message_passer: address!("4200000000000000000000000000000000000016"),
            l2_output_oracle: address!("74Ad6E0FB793eB5e6c1ff1225B03F5C5fFB7EF0c"),
            optimism_portal: address!("0d605bb7d4FB586eAB750205F5247825F4D8AF4B"),
        }
    }
}

/// Complete network configuration for the withdrawal flow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Settlement chain
    pub l1: ChainConfig,
    /// Rollup chain
    pub l2: ChainConfig,
    /// Bridge contract addresses
    pub contracts: ContractAddresses,
    /// Gas limit used for `initiateWithdrawal`, `withdraw` and deposits
    pub default_gas_limit: u32,
    /// L2 block explorer API base url (etherscan-compatible `txlist`)
    pub explorer_api_url: String,
    /// Optional L1 explorer url, only used to print links
    pub l1_explorer_url: Option<String>,
}

impl NetworkConfig {
    /// Hera testnet (L2) on JIBCHAIN testnet (L1).
    pub fn hera_testnet() -> Self {
        Self {
            l1: ChainConfig {
                rpc_url: "https://rpc.testnet.jibchain.net".to_string(),
                chain_id: None,
            },
            l2: ChainConfig {
                rpc_url: "https://rpc.hera.jbcha.in".to_string(),
                chain_id: None,
            },
            contracts: ContractAddresses::hera_testnet(),
            default_gas_limit: DEFAULT_GAS_LIMIT,
            explorer_api_url: "https://exp.hera.jbcha.in/api".to_string(),
            l1_explorer_url: Some("https://exp.testnet.jibchain.net/".to_string()),
        }
    }

    /// Create configuration from a known network.
    pub fn from_network(network: Network) -> Self {
        match network {
            Network::HeraTestnet => Self::hera_testnet(),
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Start from the defaults of a known network.
    pub fn from_network(network: Network) -> Self {
        Self {
            config: NetworkConfig::from_network(network),
        }
    }

    /// Override the L1 RPC url.
    pub fn l1_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.config.l1.rpc_url = url.into();
        self
    }

    /// Override the L2 RPC url.
    pub fn l2_rpc_url(mut self, url: impl Into<String>) -> Self {
        self.config.l2.rpc_url = url.into();
        self
    }

    /// Pin the L1 chain id.
    pub const fn l1_chain_id(mut self, chain_id: u64) -> Self {
        self.config.l1.chain_id = Some(chain_id);
        self
    }

    /// Pin the L2 chain id.
    pub const fn l2_chain_id(mut self, chain_id: u64) -> Self {
        self.config.l2.chain_id = Some(chain_id);
        self
    }

    /// Override L1StandardBridge address.
    pub const fn l1_standard_bridge(mut self, address: Address) -> Self {
        self.config.contracts.l1_standard_bridge = address;
        self
    }

    /// Override L2StandardBridge address.
    pub const fn l2_standard_bridge(mut self, address: Address) -> Self {
        self.config.contracts.l2_standard_bridge = address;
        self
    }

    /// Override L2ToL1MessagePasser address.
    pub const fn l2_to_l1_message_passer(mut self, address: Address) -> Self {
        self.config.contracts.l2_to_l1_message_passer = address;
        self
    }

    /// Override L2OutputOracle address.
    pub const fn l2_output_oracle(mut self, address: Address) -> Self {
        self.config.contracts.l2_output_oracle = address;
        self
    }

    /// Override OptimismPortal address.
    pub const fn optimism_portal(mut self, address: Address) -> Self {
        self.config.contracts.optimism_portal = address;
        self
    }

    /// Override the default gas limit.
    pub const fn default_gas_limit(mut self, gas_limit: u32) -> Self {
        self.config.default_gas_limit = gas_limit;
        self
    }

    /// Override the explorer API url.
    pub fn explorer_api_url(mut self, url: impl Into<String>) -> Self {
        self.config.explorer_api_url = url.into();
        self
    }

    /// Build the network configuration.
    pub fn build(self) -> NetworkConfig {
        self.config
    }
}
