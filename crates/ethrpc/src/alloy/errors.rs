use alloy::{contract::Error as ContractError, transports::RpcError};

pub trait ContractErrorExt {
    /// Returns whether a given error was caused by the contract itself (for
    /// example a reverting constructor) rather than by the node.
    fn is_contract_error(&self) -> bool;

    /// Returns whether a given error is a node error (connection issues,
    /// rejected transactions, missing unlocked accounts).
    fn is_node_error(&self) -> bool;
}

impl ContractErrorExt for ContractError {
    fn is_contract_error(&self) -> bool {
        !self.is_node_error()
    }

    fn is_node_error(&self) -> bool {
        match self {
            // Reverts are reported as RPC error responses carrying revert
            // data, possibly empty. Only responses without any revert data
            // originate from the node.
            ContractError::TransportError(RpcError::ErrorResp(err)) => {
                let no_revert_data = err.as_revert_data().is_none();
                tracing::debug!(?err, %no_revert_data, "transport rpc error");
                no_revert_data
            }
            ContractError::TransportError(_) => true,
            ContractError::PendingTransactionError(_) => true,
            _ => false,
        }
    }
}

/// Create an arbitrary alloy error that will convert into a "contract" error.
/// Useful for testing.
#[cfg(any(test, feature = "test-util"))]
pub fn testing_alloy_contract_error() -> ContractError {
    ContractError::ContractNotDeployed
}

/// Create an arbitrary alloy error that will convert into a "node" error.
/// Useful for testing.
#[cfg(any(test, feature = "test-util"))]
pub fn testing_alloy_node_error() -> ContractError {
    ContractError::TransportError(alloy::transports::TransportError::ErrorResp(
        alloy::rpc::json_rpc::ErrorPayload::internal_error(),
    ))
}
