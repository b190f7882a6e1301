//! Configuration types for the withdrawal CLI.
//!
//! This crate provides:
//! - Network configurations (known deployments)
//! - Contract addresses for both layers
//! - A builder to override any of them

pub mod network;

pub use network::{
    ChainConfig, ContractAddresses, Network, NetworkConfig, NetworkConfigBuilder,
    DEFAULT_GAS_LIMIT,
};
