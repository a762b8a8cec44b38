use serde::{Deserialize, Serialize};

use crate::{jar::JarView, Day, JarId, U128};

/// What happened to a jar after a deposit landed.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DepositOutcome {
    /// Target not reached yet.
    Filling,

    /// Target reached. Simulated jars stay here.
    Filled,

    /// Target reached and the funds went back to the owner.
    FilledAndBroken,

    /// Target reached, but the automatic withdrawal failed.
    /// The jar stays filled with the deposited amount.
    BreakFailed { reason: String },
}

/// The `DepositView` struct represents the result of a deposit into a jar.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DepositView {
    pub amount: U128,
    pub outcome: DepositOutcome,
    pub jar: JarView,
}

/// Result of settling a notification.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SettlementView {
    /// The notification referred to nothing payable and was dropped.
    Discarded,

    /// Due periods were paid on chain.
    Deposited(DepositView),

    /// The user has to confirm one offline payment of `amount`
    /// via `confirm_manual_payment`.
    ManualPaymentRequested { jar_id: JarId, amount: U128 },
}

/// One jar billed by a clock jump.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DueJar {
    pub jar_id: JarId,
    /// Periods that elapsed during this jump.
    pub new_periods: u64,
    /// Periods carried by the pending notification after this jump.
    pub periods_due: u64,
    pub last_period_paid_day: Day,
}

/// The `BillingReport` struct describes the effect of advancing the simulated clock.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BillingReport {
    pub previous_day: Day,
    pub current_day: Day,
    pub due: Vec<DueJar>,
}
