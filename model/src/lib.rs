pub mod address;
pub mod agent;
pub mod api;
pub mod error;
pub mod jar;
pub mod notification;
mod numbers;
pub mod settlement;

pub use address::Address;
pub use error::{ExternalError, JarError};
pub use numbers::U128;

pub type JarId = String;

pub type NotificationId = String;

/// Amount of tokens in base units of a jar's denomination
pub type TokenAmount = u128;

/// Simulated day counter
pub type Day = u64;

/// EIP-155 chain id
pub type ChainId = u64;

pub const DAYS_IN_WEEK: Day = 7;
pub const DAYS_IN_MONTH: Day = 30;

/// Rootstock testnet, the chain jars are deployed to by default
pub const ROOTSTOCK_TESTNET_CHAIN_ID: ChainId = 31;
