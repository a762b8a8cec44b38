use thiserror::Error;

use crate::{JarId, NotificationId};

/// Failure reported by a wallet or chain collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExternalError {
    #[error("Request rejected by wallet: {0}")]
    Rejected(String),

    #[error("Network failure: {0}")]
    Network(String),

    #[error("No contract address in receipt")]
    MissingAddress,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JarError {
    #[error("Amount must be positive")]
    InvalidAmount,

    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    #[error("Wallet is not connected")]
    NotConnected,

    #[error("Jar {0} doesn't exist")]
    JarNotFound(JarId),

    #[error("Notification {0} doesn't exist")]
    NotificationNotFound(NotificationId),

    #[error("Jar {0} is not filling")]
    JarNotFilling(JarId),

    #[error("Jar {0} is already broken")]
    JarAlreadyBroken(JarId),

    #[error("Jar {0} is paid on chain, manual payments are not accepted")]
    NotSimulated(JarId),

    #[error("Jar {0} has a payment in flight")]
    SettlementInProgress(JarId),

    #[error("Failed to switch to chain {chain_id}: {source}")]
    ChainSwitch { chain_id: u64, source: ExternalError },

    #[error(transparent)]
    External(#[from] ExternalError),
}
