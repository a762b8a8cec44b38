use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Address, Day, JarId, TokenAmount, DAYS_IN_MONTH, DAYS_IN_WEEK, U128};

/// Recurring billing interval of a jar.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
}

impl Cadence {
    /// Length of one billing period in simulated days.
    pub const fn period_days(self) -> Day {
        match self {
            Cadence::Daily => 1,
            Cadence::Weekly => DAYS_IN_WEEK,
            Cadence::Monthly => DAYS_IN_MONTH,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Cadence::Daily => "daily",
            Cadence::Weekly => "weekly",
            Cadence::Monthly => "monthly",
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "daily" => Ok(Cadence::Daily),
            "weekly" => Ok(Cadence::Weekly),
            "monthly" => Ok(Cadence::Monthly),
            _ => Err(format!("Unknown cadence: {value}")),
        }
    }
}

/// Lifecycle state of a jar. `Filled` and `Broken` are terminal for billing,
/// nothing ever leaves `Broken`.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum JarStatus {
    Filling,
    Filled,
    Broken,
}

/// The instrument backing a jar.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum JarKind {
    /// Escrow contract holding the chain's native coin.
    NativeCoin,

    /// Escrow contract holding an ERC-20 token.
    FungibleToken { token: Address },

    /// Bookkeeping only, paid through manual offline confirmations.
    SimulatedOnly,
}

impl JarKind {
    pub fn is_simulated(&self) -> bool {
        matches!(self, JarKind::SimulatedOnly)
    }
}

/// The `JarView` struct is a read-only snapshot of a jar handed out to callers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct JarView {
    pub id: JarId,
    pub name: String,
    pub kind: JarKind,
    pub cadence: Cadence,
    pub status: JarStatus,
    pub target_amount: U128,
    pub recurring_amount: U128,
    pub deposited_amount: U128,
    pub last_period_paid_day: Option<Day>,
    pub contract_address: Option<Address>,
    pub is_pending_settlement: bool,
}

/// Kind of instrument requested by the creation form. Token addresses are kept
/// as entered and validated when the jar is created.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DraftKind {
    NativeCoin,
    FungibleToken { token: String },
    SimulatedOnly,
}

/// State of the jar creation form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct JarDraft {
    pub name: String,
    pub target_amount: TokenAmount,
    pub recurring_amount: TokenAmount,
    pub cadence: Cadence,
    pub kind: DraftKind,
}
