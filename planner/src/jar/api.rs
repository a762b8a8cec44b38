use async_trait::async_trait;
use piggy_jar_model::{
    api::JarApi,
    jar::{DraftKind, JarDraft, JarKind, JarStatus, JarView},
    settlement::{DepositOutcome, DepositView},
    Address, Day, JarError, TokenAmount,
};

use crate::{
    assert::{assert_filling, assert_not_broken, assert_not_locked, assert_positive_amount},
    event::{emit, CreateJarData, EventKind},
    external::{ContractKind, DeployArgs},
    jar::model::Jar,
    Planner,
};

impl Planner {
    /// Asks the wallet to move to the configured chain unless it is already there.
    async fn ensure_chain(&self) -> Result<(), JarError> {
        let chain_id = self.config.chain_id;

        if self.wallet.chain_id() == chain_id {
            return Ok(());
        }

        tracing::debug!("Switching wallet from chain {} to {chain_id}", self.wallet.chain_id());

        self.wallet
            .switch_chain(chain_id)
            .await
            .map_err(|source| JarError::ChainSwitch { chain_id, source })
    }

    fn set_locked(&mut self, jar_id: &str, locked: bool) -> Result<(), JarError> {
        let jar = self.get_jar_mut_internal(jar_id)?;

        if locked {
            jar.lock();
        } else {
            jar.unlock();
        }

        self.save_jars();

        Ok(())
    }

    /// Tops up a filling jar and breaks it automatically once an on-chain jar reaches its target.
    /// For on-chain jars the funds are moved first; if that fails the jar is left as it was.
    pub(crate) async fn deposit_internal(&mut self, jar_id: &str, amount: TokenAmount) -> Result<DepositView, JarError> {
        assert_positive_amount(amount)?;

        let jar = self.get_jar_internal(jar_id)?.clone();

        assert_filling(&jar)?;
        assert_not_locked(&jar)?;

        if let Some(instrument) = jar.instrument() {
            self.ensure_chain().await?;
            self.set_locked(jar_id, true)?;

            let result = self.executor.deposit(&instrument, amount).await;

            self.set_locked(jar_id, false)?;

            let receipt = result?;
            tracing::debug!("Deposit into {jar_id} confirmed in {}", receipt.transaction_hash);
        }

        let topped_up_jar = jar.topped_up(amount);
        let status = topped_up_jar.status;
        *self.get_jar_mut_internal(jar_id)? = topped_up_jar;
        self.save_jars();

        emit(EventKind::Deposit((jar_id.to_owned(), amount.into())));

        let outcome = match status {
            JarStatus::Filled if jar.is_on_chain() => match self.break_internal(jar_id).await {
                Ok(()) => DepositOutcome::FilledAndBroken,
                Err(err) => {
                    tracing::warn!("Jar {jar_id} is filled but could not be broken: {err}");
                    DepositOutcome::BreakFailed { reason: err.to_string() }
                }
            },
            JarStatus::Filled => DepositOutcome::Filled,
            _ => DepositOutcome::Filling,
        };

        Ok(DepositView {
            amount: amount.into(),
            outcome,
            jar: self.get_jar_internal(jar_id)?.into(),
        })
    }

    /// Withdraws the funds of an on-chain jar and marks it broken.
    /// A failed withdrawal only clears the in-flight flag.
    pub(crate) async fn break_internal(&mut self, jar_id: &str) -> Result<(), JarError> {
        let jar = self.get_jar_internal(jar_id)?.clone();

        assert_not_broken(&jar)?;
        assert_not_locked(&jar)?;

        if let Some(instrument) = jar.instrument() {
            self.ensure_chain().await?;
            self.set_locked(jar_id, true)?;

            let result = self.executor.withdraw(&instrument).await;

            if let Err(err) = result {
                self.set_locked(jar_id, false)?;
                return Err(err.into());
            }
        }

        *self.get_jar_mut_internal(jar_id)? = jar.broken();
        self.save_jars();

        emit(EventKind::BreakJar(jar_id.to_owned()));

        Ok(())
    }

    fn resolve_kind(&self, kind: &DraftKind) -> Result<JarKind, JarError> {
        Ok(match kind {
            DraftKind::NativeCoin => JarKind::NativeCoin,
            DraftKind::FungibleToken { token } => JarKind::FungibleToken {
                token: token.parse::<Address>()?,
            },
            DraftKind::SimulatedOnly => JarKind::SimulatedOnly,
        })
    }

    fn default_name(&self, kind: &JarKind) -> String {
        match kind {
            JarKind::FungibleToken { .. } => self.config.default_token_jar_name.clone(),
            _ => self.config.default_jar_name.clone(),
        }
    }
}

#[async_trait]
impl JarApi for Planner {
    fn get_jars(&self) -> Vec<JarView> {
        self.jars.iter().map(Into::into).collect()
    }

    fn get_jar(&self, jar_id: &str) -> Result<JarView, JarError> {
        self.get_jar_internal(jar_id).map(Into::into)
    }

    async fn create_jar(&mut self, draft: JarDraft) -> Result<JarView, JarError> {
        assert_positive_amount(draft.target_amount)?;
        assert_positive_amount(draft.recurring_amount)?;

        let kind = self.resolve_kind(&draft.kind)?;
        let owner = self.connected_identity()?.clone();

        let name = match draft.name.trim() {
            "" => self.default_name(&kind),
            name => name.to_owned(),
        };

        let contract_address = match ContractKind::for_kind(&kind) {
            Some(contract_kind) => {
                self.ensure_chain().await?;

                let args = DeployArgs {
                    owner,
                    name: name.clone(),
                    target_amount: draft.target_amount,
                    recurring_amount: draft.recurring_amount,
                    cadence: draft.cadence,
                    token: match &kind {
                        JarKind::FungibleToken { token } => Some(token.clone()),
                        _ => None,
                    },
                };

                let address = self.executor.deploy(contract_kind, args).await?;
                tracing::info!("Deployed {contract_kind:?} for jar {name:?} at {address}");

                Some(address)
            }
            None => None,
        };

        let jar = Jar::create(
            Self::generate_id(),
            name,
            kind,
            draft.cadence,
            draft.target_amount,
            draft.recurring_amount,
            contract_address,
        );

        emit(EventKind::CreateJar(CreateJarData {
            id: jar.id.clone(),
            cadence: jar.cadence,
            target: jar.target_amount.into(),
            contract_address: jar.contract_address.clone(),
        }));

        let view = JarView::from(&jar);

        self.jars.insert(0, jar);
        self.save_jars();
        self.draft = None;

        Ok(view)
    }

    async fn deposit(&mut self, jar_id: &str, amount: TokenAmount) -> Result<DepositView, JarError> {
        self.deposit_internal(jar_id, amount).await
    }

    async fn confirm_manual_payment(&mut self, jar_id: &str) -> Result<DepositView, JarError> {
        let jar = self.get_jar_internal(jar_id)?;

        if !jar.kind.is_simulated() {
            return Err(JarError::NotSimulated(jar_id.to_owned()));
        }

        let amount = jar.recurring_amount;

        self.deposit_internal(jar_id, amount).await
    }

    async fn break_jar(&mut self, jar_id: &str) -> Result<JarView, JarError> {
        self.break_internal(jar_id).await?;
        self.get_jar(jar_id)
    }

    fn unlock_jar(&mut self, jar_id: &str) -> Result<(), JarError> {
        self.set_locked(jar_id, false)
    }

    fn get_days_to_fill(&self, jar_id: &str) -> Result<Day, JarError> {
        let jar = self.get_jar_internal(jar_id)?;

        if jar.status == JarStatus::Broken {
            return Err(JarError::JarNotFilling(jar_id.to_owned()));
        }

        jar.days_to_fill().ok_or(JarError::InvalidAmount)
    }
}
