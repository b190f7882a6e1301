use crate::types::WithdrawalHash;
use alloy_primitives::{keccak256, B256, U256};
use alloy_sol_types::SolValue;
use binding::opstack::{OutputRootProof, WithdrawalTransaction};

/// Hash of a withdrawal as the portal and message passer compute it.
pub fn compute_withdrawal_hash(tx: &WithdrawalTransaction) -> WithdrawalHash {
    // keccak256(abi.encode(nonce, sender, target, value, gasLimit, data)), encoded
    // as a parameter sequence: no leading offset for the enclosing tuple
    let encoded = (
        &tx.nonce,
        &tx.sender,
        &tx.target,
        &tx.value,
        &tx.gasLimit,
        &tx.data,
    )
        .abi_encode_sequence();

    keccak256(encoded)
}

/// Storage slot of `sentMessages[withdrawal_hash]` in the L2ToL1MessagePasser.
///
/// `sentMessages` is a `mapping(bytes32 => bool)` at slot 0, so the slot is
/// `keccak256(abi.encode(withdrawal_hash, uint256(0)))`.
pub fn compute_storage_slot(withdrawal_hash: WithdrawalHash) -> B256 {
    keccak256((withdrawal_hash, U256::ZERO).abi_encode_sequence())
}

/// Output root committed by the proposer for the given proof components.
pub fn compute_output_root(proof: &OutputRootProof) -> B256 {
    keccak256(
        (
            proof.version,
            proof.stateRoot,
            proof.messagePasserStorageRoot,
            proof.latestBlockhash,
        )
            .abi_encode_sequence(),
    )
}
