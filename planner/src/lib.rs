use std::sync::Arc;

use piggy_jar_model::{jar::JarDraft, Address};

use crate::{
    billing::SimulatedClock,
    config::PlannerConfig,
    external::{PaymentExecutor, WalletConnector},
    jar::model::Jar,
    notification::NotificationQueue,
    storage::{JarStore, KeyValueStorage},
};

mod assert;
pub mod billing;
mod common;
pub mod config;
mod event;
pub mod external;
mod internal;
pub mod jar;
pub mod notification;
mod prefill;
mod session;
pub mod storage;
mod test_builder;

pub use piggy_jar_model as model;

pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The `Planner` struct owns the savings jars of the connected wallet, the simulated clock
/// and the pending billing notifications. It is the single writer of all of them.
pub struct Planner {
    pub(crate) config: PlannerConfig,

    /// Durable per-identity storage of jars, clock and notifications.
    pub(crate) store: JarStore,

    pub(crate) wallet: Arc<dyn WalletConnector>,

    /// Deploys jar contracts and moves funds in and out of them.
    pub(crate) executor: Arc<dyn PaymentExecutor>,

    /// Wallet address the visible jars belong to. `None` while disconnected.
    pub(crate) identity: Option<Address>,

    pub(crate) jars: Vec<Jar>,

    pub(crate) clock: SimulatedClock,

    pub(crate) notifications: NotificationQueue,

    /// Current state of the creation form.
    pub(crate) draft: Option<JarDraft>,
}

impl Planner {
    /// Restores the clock and the notification queue from `storage`.
    /// Jars are loaded once an identity connects.
    pub fn new(
        config: PlannerConfig,
        storage: Box<dyn KeyValueStorage>,
        wallet: Arc<dyn WalletConnector>,
        executor: Arc<dyn PaymentExecutor>,
    ) -> Self {
        let store = JarStore::new(storage, &config.storage_prefix);
        let clock = store.load_clock();
        let notifications = store.load_notifications();

        Self {
            config,
            store,
            wallet,
            executor,
            identity: None,
            jars: vec![],
            clock,
            notifications,
            draft: None,
        }
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn identity(&self) -> Option<&Address> {
        self.identity.as_ref()
    }
}
