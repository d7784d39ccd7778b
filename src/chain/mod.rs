pub mod abi;
pub mod contract;
pub mod rpc;
pub mod watcher;

use thiserror::Error;

/// Failures from the node-facing side. Revert reasons are not interpreted;
/// whatever the node reports is logged verbatim and the action stops.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("rpc transport: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("malformed rpc response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Abi(#[from] abi::AbiError),

    #[error("node exposes no accounts")]
    NoAccounts,
}
