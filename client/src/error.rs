//! Errors returned by the wallet connector, the contract binding and the
//! session actions.
use alloy::primitives::TxHash;

/// An error that occurred while talking to the wallet or the NFT contract.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The wallet is connected to a different chain than the one the dapp is
    /// configured for.
    #[error(
        "please switch to the {network} network (expected chain id \
         {expected}, wallet is on {actual})"
    )]
    WrongNetwork {
        /// Human readable name of the expected network.
        network: String,
        /// Configured chain id.
        expected: u64,
        /// Chain id reported by the wallet.
        actual: u64,
    },

    /// A signer was requested from a wallet that only has read access.
    #[error("wallet has no signing account")]
    NoSigner,

    /// The wallet could not be obtained from the provider selection.
    #[error("wallet connection failed: {0}")]
    Connection(String),

    /// A contract call failed, either at the transport or at the abi level.
    #[error(transparent)]
    Contract(#[from] alloy::contract::Error),

    /// Raw JSON-RPC failure.
    #[error(transparent)]
    Transport(#[from] alloy::transports::TransportError),

    /// The transaction was broadcast but waiting for its receipt failed.
    #[error(transparent)]
    Confirmation(#[from] alloy::providers::PendingTransactionError),

    /// The transaction was mined with a failed status.
    #[error("transaction {0} reverted")]
    Reverted(TxHash),
}

impl Error {
    /// Whether this is the loud, caller-aborting network mismatch error.
    #[must_use]
    pub fn is_wrong_network(&self) -> bool {
        matches!(self, Self::WrongNetwork { .. })
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;
