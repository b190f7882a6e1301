//! OP Stack contract bindings.
//!
//! Includes the contracts touched by the withdrawal flow:
//! - L2ToL1MessagePasser (L2 predeploy)
//! - L2StandardBridge (L2 predeploy)
//! - L1StandardBridge (L1 contract)
//! - L2OutputOracle (L1 contract)
//! - OptimismPortal (L1 contract, output-oracle based proving)

use alloy_primitives::{address, Address, B256};
use alloy_sol_types::sol;

/// L2ToL1MessagePasser predeploy address, identical on all OP Stack chains.
pub const MESSAGE_PASSER_ADDRESS: Address = address!("4200000000000000000000000000000000000016");

/// L2StandardBridge predeploy address, identical on all OP Stack chains.
pub const L2_STANDARD_BRIDGE_ADDRESS: Address =
    address!("4200000000000000000000000000000000000010");

/// Version byte string of the output root proof.
pub const OUTPUT_VERSION_V0: B256 = B256::ZERO;

sol! {
    /// L2ToL1MessagePasser - L2 predeploy contract for initiating withdrawals
    #[sol(rpc)]
    interface IL2ToL1MessagePasser {
        /// Emitted when a withdrawal is initiated on L2
        event MessagePassed(
            uint256 indexed nonce,
            address indexed sender,
            address indexed target,
            uint256 value,
            uint256 gasLimit,
            bytes data,
            bytes32 withdrawalHash
        );

        /// Initiate a withdrawal from L2 to L1
        function initiateWithdrawal(
            address _target,
            uint256 _gasLimit,
            bytes calldata _data
        ) external payable;

        /// Get the current message nonce (with version encoded in top 2 bytes)
        function messageNonce() external view returns (uint256);
    }

    /// L2StandardBridge - token withdrawals from L2
    #[sol(rpc)]
    interface IL2StandardBridge {
        /// Emitted when a withdrawal is initiated through the bridge
        event WithdrawalInitiated(
            address indexed l1Token,
            address indexed l2Token,
            address indexed from,
            address to,
            uint256 amount,
            bytes extraData
        );

        /// Withdraw an L2 token (or the legacy ETH token) back to L1
        function withdraw(
            address _l2Token,
            uint256 _amount,
            uint32 _minGasLimit,
            bytes calldata _extraData
        ) external payable;

        /// Withdraw to a different recipient on L1
        function withdrawTo(
            address _l2Token,
            address _to,
            uint256 _amount,
            uint32 _minGasLimit,
            bytes calldata _extraData
        ) external payable;
    }

    /// L1StandardBridge - deposits from L1 into L2
    #[sol(rpc)]
    interface IL1StandardBridge {
        /// Address of the paired bridge on L2
        function l2TokenBridge() external view returns (address);

        /// Deposit ETH to the caller's address on L2
        function bridgeETH(uint32 _minGasLimit, bytes calldata _extraData) external payable;

        /// Deposit an ERC20 token to the caller's address on L2
        function depositERC20(
            address _l1Token,
            address _l2Token,
            uint256 _amount,
            uint32 _minGasLimit,
            bytes calldata _extraData
        ) external;
    }

    /// L2OutputOracle - L1 contract holding committed L2 output roots
    #[sol(rpc)]
    interface IL2OutputOracle {
        /// Index of the first output covering the given L2 block
        function getL2OutputIndexAfter(uint256 _l2BlockNumber) external view returns (uint256);

        /// Output proposal stored at the given index
        function getL2Output(uint256 _l2OutputIndex) external view returns (OutputProposal memory);

        /// Highest L2 block number that has been committed
        function latestBlockNumber() external view returns (uint256);

        /// Delay between proving and finalizing a withdrawal
        function FINALIZATION_PERIOD_SECONDS() external view returns (uint256);
    }

    /// OptimismPortal - L1 contract for withdrawal proving and finalization
    #[sol(rpc)]
    interface IOptimismPortal {
        /// Proven withdrawal data, keyed by withdrawal hash
        function provenWithdrawals(bytes32 withdrawalHash)
            external view returns (bytes32 outputRoot, uint128 timestamp, uint128 l2OutputIndex);

        /// Query if a withdrawal has been finalized
        function finalizedWithdrawals(bytes32 withdrawalHash)
            external view returns (bool);

        /// Prove a withdrawal transaction against a committed output
        function proveWithdrawalTransaction(
            WithdrawalTransaction calldata _tx,
            uint256 _l2OutputIndex,
            OutputRootProof calldata _outputRootProof,
            bytes[] calldata _withdrawalProof
        ) external;

        /// Finalize a proven withdrawal transaction
        function finalizeWithdrawalTransaction(WithdrawalTransaction calldata _tx) external;
    }

    /// Output proposal committed by the proposer
    #[derive(Debug, PartialEq, Eq)]
    struct OutputProposal {
        bytes32 outputRoot;
        uint128 timestamp;
        uint128 l2BlockNumber;
    }

    /// Output root proof structure (used in proving withdrawals)
    #[derive(Debug, PartialEq, Eq)]
    struct OutputRootProof {
        bytes32 version;
        bytes32 stateRoot;
        bytes32 messagePasserStorageRoot;
        bytes32 latestBlockhash;
    }

    /// Withdrawal transaction structure (shared across contracts)
    #[derive(Debug, PartialEq, Eq)]
    struct WithdrawalTransaction {
        uint256 nonce;
        address sender;
        address target;
        uint256 value;
        uint256 gasLimit;
        bytes data;
    }
}
