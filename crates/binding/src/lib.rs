//! Contract bindings for all external contracts.
//!
//! This crate consolidates all Solidity contract interfaces used across the project:
//! - OP Stack contracts (L2ToL1MessagePasser, standard bridges, L2OutputOracle, OptimismPortal)
//! - ERC20 tokens
//!
//! All bindings are generated using alloy's `sol!` macro.

pub mod opstack;
pub mod token;

pub use opstack::{OutputProposal, OutputRootProof, WithdrawalTransaction};
