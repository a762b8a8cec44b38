#![cfg(test)]

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use piggy_jar_model::{api::SessionApi, Address, ChainId, Day, ExternalError, TokenAmount, ROOTSTOCK_TESTNET_CHAIN_ID};

use crate::{
    billing::SimulatedClock,
    common::test_env_ext,
    config::PlannerConfig,
    event::EventKind,
    external::{ContractKind, DeployArgs, Instrument, PaymentExecutor, Receipt, WalletConnector},
    jar::model::Jar,
    storage::MemoryStorage,
    Planner,
};

pub mod accounts {
    use piggy_jar_model::Address;
    use rstest::fixture;

    #[fixture]
    pub fn alice() -> Address {
        "0x00000000000000000000000000000000000a11ce".parse().unwrap()
    }

    #[fixture]
    pub fn bob() -> Address {
        "0x0000000000000000000000000000000000000b0b".parse().unwrap()
    }

    pub fn token() -> Address {
        "0x00000000000000000000000000000000000005dc".parse().unwrap()
    }
}

pub(crate) struct TestWallet {
    account: Mutex<Option<String>>,
    chain_id: AtomicU64,
    reject_switch: AtomicBool,
}

impl TestWallet {
    fn new(account: &Address) -> Self {
        Self {
            account: Mutex::new(Some(account.to_string())),
            chain_id: AtomicU64::new(ROOTSTOCK_TESTNET_CHAIN_ID),
            reject_switch: AtomicBool::new(false),
        }
    }

    pub(crate) fn set_account(&self, account: Option<&str>) {
        *self.account.lock().unwrap() = account.map(ToOwned::to_owned);
    }

    pub(crate) fn set_chain_id(&self, chain_id: ChainId) {
        self.chain_id.store(chain_id, Ordering::SeqCst);
    }

    pub(crate) fn reject_switch(&self, reject: bool) {
        self.reject_switch.store(reject, Ordering::SeqCst);
    }
}

#[async_trait]
impl WalletConnector for TestWallet {
    fn account(&self) -> Option<String> {
        self.account.lock().unwrap().clone()
    }

    fn chain_id(&self) -> ChainId {
        self.chain_id.load(Ordering::SeqCst)
    }

    async fn switch_chain(&self, chain_id: ChainId) -> Result<(), ExternalError> {
        if self.reject_switch.load(Ordering::SeqCst) {
            return Err(ExternalError::Rejected("User rejected the request".to_string()));
        }

        self.set_chain_id(chain_id);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ExecutorCall {
    Deploy(ContractKind, DeployArgs),
    Deposit(Address, TokenAmount),
    Withdraw(Address),
}

/// Records every call and fails the operations it is told to fail.
#[derive(Default)]
pub(crate) struct TestExecutor {
    calls: Mutex<Vec<ExecutorCall>>,
    deployed: AtomicU64,
    fail_deploy: AtomicBool,
    fail_deposit: AtomicBool,
    fail_withdraw: AtomicBool,
}

impl TestExecutor {
    pub(crate) fn calls(&self) -> Vec<ExecutorCall> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn fail_deploy(&self, fail: bool) {
        self.fail_deploy.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_deposit(&self, fail: bool) {
        self.fail_deposit.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_withdraw(&self, fail: bool) {
        self.fail_withdraw.store(fail, Ordering::SeqCst);
    }

    fn record(&self, call: ExecutorCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn receipt(&self) -> Receipt {
        Receipt {
            transaction_hash: format!("0x{:064x}", self.calls.lock().unwrap().len()),
        }
    }
}

#[async_trait]
impl PaymentExecutor for TestExecutor {
    async fn deploy(&self, kind: ContractKind, args: DeployArgs) -> Result<Address, ExternalError> {
        self.record(ExecutorCall::Deploy(kind, args));

        if self.fail_deploy.load(Ordering::SeqCst) {
            return Err(ExternalError::MissingAddress);
        }

        let index = self.deployed.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("0x{index:040x}").parse().unwrap())
    }

    async fn deposit(&self, instrument: &Instrument, amount: TokenAmount) -> Result<Receipt, ExternalError> {
        self.record(ExecutorCall::Deposit(instrument.address.clone(), amount));

        if self.fail_deposit.load(Ordering::SeqCst) {
            return Err(ExternalError::Network("Deposit transaction reverted".to_string()));
        }

        Ok(self.receipt())
    }

    async fn withdraw(&self, instrument: &Instrument) -> Result<Receipt, ExternalError> {
        self.record(ExecutorCall::Withdraw(instrument.address.clone()));

        if self.fail_withdraw.load(Ordering::SeqCst) {
            return Err(ExternalError::Rejected("User rejected the request".to_string()));
        }

        Ok(self.receipt())
    }
}

pub(crate) struct Context {
    planner: Planner,
    pub wallet: Arc<TestWallet>,
    pub executor: Arc<TestExecutor>,
    pub storage: MemoryStorage,
}

impl Context {
    /// Planner connected as `identity`, on the expected chain, with empty storage.
    pub(crate) fn new(identity: Address) -> Self {
        test_env_ext::set_test_log_events(false);

        let storage = MemoryStorage::new();
        let wallet = Arc::new(TestWallet::new(&identity));
        let executor = Arc::new(TestExecutor::default());

        let mut planner = Planner::new(
            PlannerConfig::default(),
            Box::new(storage.clone()),
            wallet.clone(),
            executor.clone(),
        );
        planner.connect().unwrap();

        Self {
            planner,
            wallet,
            executor,
            storage,
        }
    }

    pub(crate) fn planner(&mut self) -> &mut Planner {
        &mut self.planner
    }

    /// A second planner over the same storage and collaborators, as after a restart.
    pub(crate) fn reopen(&self) -> Planner {
        Planner::new(
            PlannerConfig::default(),
            Box::new(self.storage.clone()),
            self.wallet.clone(),
            self.executor.clone(),
        )
    }

    pub(crate) fn with_jars(mut self, jars: &[Jar]) -> Self {
        self.planner.jars.extend_from_slice(jars);
        self.planner.save_jars();
        self
    }

    pub(crate) fn with_day(mut self, day: Day) -> Self {
        self.planner.clock = SimulatedClock::at(day);
        self.planner.save_billing_state();
        self
    }

    pub(crate) fn jar(&self, id: &str) -> Jar {
        self.planner.get_jar_internal(id).unwrap().clone()
    }

    pub(crate) fn get_events(&self) -> Vec<EventKind> {
        test_env_ext::get_events()
    }
}
