use piggy_jar_model::{
    api::estimate_days_to_fill,
    jar::{Cadence, JarKind, JarStatus, JarView},
    Address, Day, JarId, TokenAmount,
};
use serde::{Deserialize, Serialize};

use crate::external::Instrument;

/// The `Jar` struct is the persisted record of a savings goal.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Jar {
    pub id: JarId,
    pub name: String,
    pub kind: JarKind,
    pub cadence: Cadence,

    #[serde(with = "amount")]
    pub target_amount: TokenAmount,

    /// Amount charged for every billing period.
    #[serde(with = "amount")]
    pub recurring_amount: TokenAmount,

    #[serde(with = "amount")]
    pub deposited_amount: TokenAmount,

    pub status: JarStatus,

    /// Simulated day up to which recurring payments have been billed.
    /// Stays `None` until the first clock jump after creation.
    #[serde(default)]
    pub last_period_paid_day: Option<Day>,

    #[serde(default)]
    pub contract_address: Option<Address>,

    /// Set while a deposit or withdrawal of this jar is in flight.
    #[serde(default)]
    pub is_pending_settlement: bool,
}

impl Jar {
    pub(crate) fn create(
        id: JarId,
        name: String,
        kind: JarKind,
        cadence: Cadence,
        target_amount: TokenAmount,
        recurring_amount: TokenAmount,
        contract_address: Option<Address>,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            cadence,
            target_amount,
            recurring_amount,
            deposited_amount: 0,
            status: JarStatus::Filling,
            last_period_paid_day: None,
            contract_address,
            is_pending_settlement: false,
        }
    }

    /// The deployed contract backing this jar. `None` for simulated jars
    /// and for jars whose deployment never produced an address.
    pub(crate) fn instrument(&self) -> Option<Instrument> {
        let token = match &self.kind {
            JarKind::SimulatedOnly => return None,
            JarKind::NativeCoin => None,
            JarKind::FungibleToken { token } => Some(token.clone()),
        };

        Some(Instrument {
            address: self.contract_address.clone()?,
            token,
        })
    }

    pub(crate) fn is_on_chain(&self) -> bool {
        self.instrument().is_some()
    }

    pub(crate) fn topped_up(&self, amount: TokenAmount) -> Self {
        let deposited_amount = self.deposited_amount.saturating_add(amount);
        let status = if deposited_amount >= self.target_amount {
            JarStatus::Filled
        } else {
            JarStatus::Filling
        };

        Self {
            deposited_amount,
            status,
            ..self.clone()
        }
    }

    pub(crate) fn broken(&self) -> Self {
        Self {
            deposited_amount: 0,
            status: JarStatus::Broken,
            ..self.clone()
        }
    }

    pub(crate) fn lock(&mut self) {
        self.is_pending_settlement = true;
    }

    pub(crate) fn unlock(&mut self) {
        self.is_pending_settlement = false;
    }

    /// Simulated days until the target is reached if every period gets paid.
    pub(crate) fn days_to_fill(&self) -> Option<Day> {
        let remaining = self.target_amount.saturating_sub(self.deposited_amount);

        if remaining == 0 {
            return Some(0);
        }

        estimate_days_to_fill(remaining, self.recurring_amount, self.cadence)
    }
}

impl From<&Jar> for JarView {
    fn from(jar: &Jar) -> Self {
        Self {
            id: jar.id.clone(),
            name: jar.name.clone(),
            kind: jar.kind.clone(),
            cadence: jar.cadence,
            status: jar.status,
            target_amount: jar.target_amount.into(),
            recurring_amount: jar.recurring_amount.into(),
            deposited_amount: jar.deposited_amount.into(),
            last_period_paid_day: jar.last_period_paid_day,
            contract_address: jar.contract_address.clone(),
            is_pending_settlement: jar.is_pending_settlement,
        }
    }
}

/// Amounts are stored as decimal strings.
mod amount {
    use piggy_jar_model::{TokenAmount, U128};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(value: &TokenAmount, serializer: S) -> Result<S::Ok, S::Error> {
        U128(*value).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TokenAmount, D::Error> {
        U128::deserialize(deserializer).map(|value| value.0)
    }
}
