//! Capabilities the planner consumes from the wallet and the chain.

use async_trait::async_trait;
use piggy_jar_model::{
    jar::{Cadence, JarKind},
    Address, ChainId, ExternalError, TokenAmount,
};
use serde::{Deserialize, Serialize};

/// Contract template to deploy for a jar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractKind {
    NativeCoinJar,
    TokenJar,
}

impl ContractKind {
    pub(crate) fn for_kind(kind: &JarKind) -> Option<Self> {
        match kind {
            JarKind::NativeCoin => Some(ContractKind::NativeCoinJar),
            JarKind::FungibleToken { .. } => Some(ContractKind::TokenJar),
            JarKind::SimulatedOnly => None,
        }
    }
}

/// Constructor arguments of a jar contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployArgs {
    pub owner: Address,
    pub name: String,
    pub target_amount: TokenAmount,
    pub recurring_amount: TokenAmount,
    pub cadence: Cadence,
    pub token: Option<Address>,
}

/// A deployed jar contract, with the token it holds if it isn't the native coin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instrument {
    pub address: Address,
    pub token: Option<Address>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: String,
}

/// Connected wallet. Only its account and chain matter to the planner.
#[async_trait]
pub trait WalletConnector: Send + Sync {
    /// Address of the active account, as reported by the wallet.
    fn account(&self) -> Option<String>;

    fn chain_id(&self) -> ChainId;

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ExternalError>;
}

/// Executes transactions against jar contracts. Every call may suspend until the chain confirms it.
#[async_trait]
pub trait PaymentExecutor: Send + Sync {
    /// Deploys a jar contract and returns its address.
    async fn deploy(&self, kind: ContractKind, args: DeployArgs) -> Result<Address, ExternalError>;

    /// Moves `amount` from the owner into the jar contract.
    async fn deposit(&self, instrument: &Instrument, amount: TokenAmount) -> Result<Receipt, ExternalError>;

    /// Returns everything held by the jar contract to the owner.
    async fn withdraw(&self, instrument: &Instrument) -> Result<Receipt, ExternalError>;
}
