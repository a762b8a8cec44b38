use std::{
    collections::HashMap,
    env,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
};

use async_trait::async_trait;
use piggy_jar::{
    config::PlannerConfig,
    external::{ContractKind, DeployArgs, Instrument, PaymentExecutor, Receipt, WalletConnector},
    storage::FileStorage,
    Planner,
};
use piggy_jar_model::{api::SessionApi, Address, ChainId, ExternalError, TokenAmount};
use rand::Rng;
use tokio::sync::Mutex;

use crate::common::format_amount;

/// Chain the wallet starts on, different from the one jars are deployed to.
const ETHEREUM_MAINNET: ChainId = 1;

pub(crate) struct SandboxWallet {
    account: std::sync::Mutex<Address>,
    chain_id: AtomicU64,
}

impl SandboxWallet {
    pub(crate) fn set_account(&self, account: Address) {
        if let Ok(mut current) = self.account.lock() {
            *current = account;
        }
    }
}

#[async_trait]
impl WalletConnector for SandboxWallet {
    fn account(&self) -> Option<String> {
        self.account.lock().ok().map(|account| account.to_string())
    }

    fn chain_id(&self) -> ChainId {
        self.chain_id.load(Ordering::SeqCst)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ExternalError> {
        tokio::task::yield_now().await;
        self.chain_id.store(chain_id, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
struct Ledger {
    /// Funds of the wallet owner outside any jar.
    wallet_balance: TokenAmount,
    /// Funds locked in every deployed jar contract.
    contracts: HashMap<Address, TokenAmount>,
    transactions: u64,
}

impl Ledger {
    fn receipt(&mut self) -> Receipt {
        self.transactions += 1;
        Receipt {
            transaction_hash: format!("0x{:064x}", self.transactions),
        }
    }
}

/// In-process chain keeping balances of the wallet and of the jar contracts.
pub(crate) struct SandboxChain {
    ledger: Mutex<Ledger>,
    fail_withdrawals: AtomicBool,
}

impl SandboxChain {
    fn new(wallet_balance: TokenAmount) -> Self {
        Self {
            ledger: Mutex::new(Ledger {
                wallet_balance,
                ..Ledger::default()
            }),
            fail_withdrawals: AtomicBool::new(false),
        }
    }

    pub(crate) async fn wallet_balance(&self) -> TokenAmount {
        self.ledger.lock().await.wallet_balance
    }

    pub(crate) async fn contract_balance(&self, address: &Address) -> Option<TokenAmount> {
        self.ledger.lock().await.contracts.get(address).copied()
    }

    pub(crate) fn fail_withdrawals(&self, fail: bool) {
        self.fail_withdrawals.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl PaymentExecutor for SandboxChain {
    async fn deploy(&self, kind: ContractKind, args: DeployArgs) -> Result<Address, ExternalError> {
        let mut ledger = self.ledger.lock().await;

        let index = ledger.contracts.len() + 1;
        let address: Address = format!("0x{index:040x}").parse().map_err(|_| ExternalError::MissingAddress)?;

        ledger.contracts.insert(address.clone(), 0);
        ledger.receipt();

        tracing::info!("Deployed {kind:?} {:?} for {} at {address}", args.name, args.owner);

        Ok(address)
    }

    async fn deposit(&self, instrument: &Instrument, amount: TokenAmount) -> Result<Receipt, ExternalError> {
        let mut ledger = self.ledger.lock().await;

        if ledger.wallet_balance < amount {
            return Err(ExternalError::Rejected(format!(
                "Insufficient funds: {} < {}",
                format_amount(ledger.wallet_balance),
                format_amount(amount)
            )));
        }

        let Some(balance) = ledger.contracts.get_mut(&instrument.address) else {
            return Err(ExternalError::Network(format!("No contract at {}", instrument.address)));
        };

        *balance += amount;
        ledger.wallet_balance -= amount;

        tracing::info!("Deposited {} into {}", format_amount(amount), instrument.address);

        Ok(ledger.receipt())
    }

    async fn withdraw(&self, instrument: &Instrument) -> Result<Receipt, ExternalError> {
        if self.fail_withdrawals.load(Ordering::SeqCst) {
            return Err(ExternalError::Network("Withdrawal transaction reverted".to_string()));
        }

        let mut ledger = self.ledger.lock().await;

        let Some(balance) = ledger.contracts.get_mut(&instrument.address) else {
            return Err(ExternalError::Network(format!("No contract at {}", instrument.address)));
        };

        let amount = std::mem::take(balance);
        ledger.wallet_balance += amount;

        tracing::info!("Withdrew {} from {}", format_amount(amount), instrument.address);

        Ok(ledger.receipt())
    }
}

/// A wallet, a sandbox chain and a storage directory shared by every planner opened from it.
pub(crate) struct Context {
    pub config: PlannerConfig,
    pub wallet: Arc<SandboxWallet>,
    pub chain: Arc<SandboxChain>,
}

impl Context {
    pub(crate) fn new(wallet_balance: TokenAmount) -> anyhow::Result<Self> {
        let storage_dir = env::temp_dir().join(format!("piggy-jar-{:016x}", rand::thread_rng().gen::<u64>()));

        Ok(Self {
            config: PlannerConfig {
                storage_dir,
                ..PlannerConfig::default()
            },
            wallet: Arc::new(SandboxWallet {
                account: std::sync::Mutex::new(Self::account("a11ce")?),
                chain_id: AtomicU64::new(ETHEREUM_MAINNET),
            }),
            chain: Arc::new(SandboxChain::new(wallet_balance)),
        })
    }

    /// Account address ending with `suffix`.
    pub(crate) fn account(suffix: &str) -> anyhow::Result<Address> {
        Ok(format!("0x{suffix:0>40}").parse()?)
    }

    pub(crate) fn storage_dir(&self) -> &PathBuf {
        &self.config.storage_dir
    }

    /// Opens a planner over the storage directory and connects the current wallet account.
    pub(crate) fn planner(&self) -> anyhow::Result<Planner> {
        let mut planner = Planner::new(
            self.config.clone(),
            Box::new(FileStorage::new(self.storage_dir())),
            self.wallet.clone(),
            self.chain.clone(),
        );

        planner.connect()?;

        Ok(planner)
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if let Err(err) = std::fs::remove_dir_all(self.storage_dir()) {
            tracing::debug!("Failed to remove {}: {err}", self.storage_dir().display());
        }
    }
}
