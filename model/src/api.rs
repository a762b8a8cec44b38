use async_trait::async_trait;

use crate::{
    agent::PrefillParams,
    jar::{Cadence, JarDraft, JarView},
    notification::NotificationView,
    settlement::{BillingReport, DepositView, SettlementView},
    Day, JarError, TokenAmount,
};

/// The `SessionApi` trait binds the planner to the wallet identity currently connected.
pub trait SessionApi {
    /// Loads the jars persisted for the wallet account reported by the connector.
    /// Switching identity switches the entire visible jar set.
    ///
    /// # Returns
    ///
    /// Jars of the connected account, most recent first.
    ///
    /// # Errors
    ///
    /// `JarError::NotConnected` if the connector reports no account or a malformed one.
    fn connect(&mut self) -> Result<Vec<JarView>, JarError>;

    /// Forgets the current identity and hides its jars. Persisted data is kept.
    fn disconnect(&mut self);

    /// Removes every persisted jar of the connected identity.
    fn clear_jars(&mut self) -> Result<(), JarError>;
}

/// The `JarApi` trait defines methods for managing savings jars.
#[async_trait]
pub trait JarApi {
    /// Retrieves all jars of the connected identity, most recent first.
    fn get_jars(&self) -> Vec<JarView>;

    fn get_jar(&self, jar_id: &str) -> Result<JarView, JarError>;

    /// Creates a new jar from the creation form.
    ///
    /// Jars backed by an on-chain instrument are deployed first. If the wallet is on a different
    /// chain it is asked to switch. Nothing is stored unless the deployment succeeds.
    ///
    /// # Errors
    ///
    /// - `JarError::InvalidAmount` if target or recurring amount is zero.
    /// - `JarError::InvalidAddress` if a token jar has a malformed token address.
    /// - `JarError::NotConnected` without a connected identity.
    /// - `JarError::ChainSwitch` / `JarError::External` if the wallet or the chain fails.
    async fn create_jar(&mut self, draft: JarDraft) -> Result<JarView, JarError>;

    /// Tops up a filling jar. When the deposit reaches the target the jar becomes filled.
    /// On-chain jars are then broken automatically, returning the funds to the owner.
    async fn deposit(&mut self, jar_id: &str, amount: TokenAmount) -> Result<DepositView, JarError>;

    /// Confirms one offline payment of `recurring_amount` for a simulated jar.
    async fn confirm_manual_payment(&mut self, jar_id: &str) -> Result<DepositView, JarError>;

    /// Breaks a jar, returning its funds and resetting the deposited amount to zero.
    ///
    /// # Errors
    ///
    /// If the withdrawal of an on-chain jar fails, the jar keeps its previous state
    /// and `JarError::External` is returned.
    async fn break_jar(&mut self, jar_id: &str) -> Result<JarView, JarError>;

    /// Clears a pending settlement flag left behind by an interrupted payment.
    fn unlock_jar(&mut self, jar_id: &str) -> Result<(), JarError>;

    /// Estimated number of simulated days until the jar is full, assuming every period is paid.
    fn get_days_to_fill(&self, jar_id: &str) -> Result<Day, JarError>;
}

/// The `BillingApi` trait drives the simulated clock.
pub trait BillingApi {
    fn get_current_day(&self) -> Day;

    /// Moves the clock forward by `days` and bills every filling jar for the periods that elapsed.
    /// A jump of zero days changes nothing.
    fn advance(&mut self, days: Day) -> BillingReport;

    /// Moves the clock back to day zero. Jars and notifications are left untouched.
    fn reset_clock(&mut self);
}

/// The `NotificationApi` trait gives access to pending billing notices.
#[async_trait]
pub trait NotificationApi {
    /// Pending notifications, most recent first.
    fn get_notifications(&self) -> Vec<NotificationView>;

    /// Settles a notification.
    ///
    /// On-chain jars receive a deposit of `recurring_amount * periods_due`; the notification
    /// is kept if that deposit fails. Simulated jars get a request for one manual payment
    /// and the notification is removed right away.
    async fn settle(&mut self, notification_id: &str) -> Result<SettlementView, JarError>;

    /// Drops a notification without paying. The jar is not touched.
    fn dismiss(&mut self, notification_id: &str) -> Result<(), JarError>;
}

/// The `PrefillApi` trait lets assistants and tests fill in the jar creation form.
pub trait PrefillApi {
    /// Builds a creation draft from loose parameters and keeps it as the current form state.
    fn prefill_jar_creation(&mut self, params: PrefillParams) -> JarDraft;

    fn get_draft(&self) -> Option<JarDraft>;
}

/// Days needed to collect `target` with payments of `recurring` every period.
pub fn estimate_days_to_fill(target: TokenAmount, recurring: TokenAmount, cadence: Cadence) -> Option<Day> {
    if target == 0 || recurring == 0 {
        return None;
    }

    let periods = target.div_ceil(recurring);
    let periods = Day::try_from(periods).ok()?;

    periods.checked_mul(cadence.period_days())
}

#[cfg(test)]
mod test {
    use crate::{api::estimate_days_to_fill, jar::Cadence};

    #[test]
    fn days_to_fill() {
        assert_eq!(estimate_days_to_fill(10, 3, Cadence::Daily), Some(4));
        assert_eq!(estimate_days_to_fill(10, 5, Cadence::Weekly), Some(14));
        assert_eq!(estimate_days_to_fill(100, 1, Cadence::Monthly), Some(3000));
        assert_eq!(estimate_days_to_fill(0, 1, Cadence::Daily), None);
        assert_eq!(estimate_days_to_fill(1, 0, Cadence::Daily), None);
    }
}

