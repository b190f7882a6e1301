//! L2→L1 withdrawal primitives for output-oracle based OP Stack chains.
//!
//! Covers recovering a withdrawal from its L2 receipt, hashing it, building
//! the proof the portal expects, and deriving its lifecycle status.

pub mod hash;
pub mod message;
pub mod node;
pub mod proof;
pub mod state;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use hash::{compute_output_root, compute_storage_slot, compute_withdrawal_hash};
pub use message::{
    decode_withdrawal_message, load_withdrawal, DecodeError, ReceiptSource, WithdrawalReceipt,
};
pub use node::L2Node;
pub use proof::{generate_proof, BlockRoots, ProveWithdrawalParams, StateProofSource, StorageProof};
pub use state::{
    query_withdrawal_status, unix_now, OracleContract, OutputOracle, PortalContract,
    WithdrawalPortal,
};
pub use types::{
    InitiatedWithdrawal, ProvenWithdrawal, StatusContext, WithdrawalHash, WithdrawalStatus,
};
