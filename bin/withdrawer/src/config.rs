use alloy_primitives::Address;
use config::{Network, NetworkConfig, NetworkConfigBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "withdrawer.toml";

/// Top-level withdrawer configuration.
///
/// Every field is optional and overrides the matching value of the selected
/// network preset. Secrets never live here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Network preset, `hera-testnet` when unset
    pub network: Option<Network>,

    /// L1 RPC endpoint url
    pub l1_rpc_url: Option<String>,

    /// L2 RPC endpoint url
    pub l2_rpc_url: Option<String>,

    /// Expected L1 chain id
    pub l1_chain_id: Option<u64>,

    /// Expected L2 chain id
    pub l2_chain_id: Option<u64>,

    /// L2 explorer API url
    pub explorer_api_url: Option<String>,

    /// Gas limit for withdrawals and deposits
    pub default_gas_limit: Option<u32>,

    /// Contract address overrides
    #[serde(default)]
    pub contracts: ContractOverrides,
}

/// Per-contract address overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContractOverrides {
    pub l1_standard_bridge: Option<Address>,
    pub l2_standard_bridge: Option<Address>,
    pub l2_to_l1_message_passer: Option<Address>,
    pub l2_output_oracle: Option<Address>,
    pub optimism_portal: Option<Address>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Load `path` if given, otherwise the default config file when present.
    pub fn load(path: Option<&Path>) -> eyre::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => Ok(Self::default()),
        }
    }

    /// Network configuration with the overrides of this file applied.
    pub fn network_config(&self) -> NetworkConfig {
        let mut builder =
            NetworkConfigBuilder::from_network(self.network.unwrap_or(Network::HeraTestnet));

        if let Some(url) = &self.l1_rpc_url {
            builder = builder.l1_rpc_url(url);
        }
        if let Some(url) = &self.l2_rpc_url {
            builder = builder.l2_rpc_url(url);
        }
        if let Some(chain_id) = self.l1_chain_id {
            builder = builder.l1_chain_id(chain_id);
        }
        if let Some(chain_id) = self.l2_chain_id {
            builder = builder.l2_chain_id(chain_id);
        }
        if let Some(url) = &self.explorer_api_url {
            builder = builder.explorer_api_url(url);
        }
        if let Some(gas_limit) = self.default_gas_limit {
            builder = builder.default_gas_limit(gas_limit);
        }

        let contracts = &self.contracts;
        if let Some(address) = contracts.l1_standard_bridge {
            builder = builder.l1_standard_bridge(address);
        }
        if let Some(address) = contracts.l2_standard_bridge {
            builder = builder.l2_standard_bridge(address);
        }
        if let Some(address) = contracts.l2_to_l1_message_passer {
            builder = builder.l2_to_l1_message_passer(address);
        }
        if let Some(address) = contracts.l2_output_oracle {
            builder = builder.l2_output_oracle(address);
        }
        if let Some(address) = contracts.optimism_portal {
            builder = builder.optimism_portal(address);
        }

        builder.build()
    }
}
