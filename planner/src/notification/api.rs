use async_trait::async_trait;
use piggy_jar_model::{
    api::NotificationApi,
    jar::JarStatus,
    notification::NotificationView,
    settlement::SettlementView,
    JarError,
};

use crate::{
    assert::assert_not_locked,
    event::{emit, EventKind, SettleData},
    jar::model::Jar,
    notification::Notification,
    Planner,
};

impl Planner {
    fn get_notification_internal(&self, notification_id: &str) -> Result<&Notification, JarError> {
        self.notifications
            .get(notification_id)
            .ok_or_else(|| JarError::NotificationNotFound(notification_id.to_owned()))
    }

    fn remove_notification(&mut self, notification_id: &str) {
        self.notifications.remove(notification_id);
        self.save_billing_state();
    }

    /// A jar that can still receive payments for its notification.
    fn is_payable(jar: &Jar) -> bool {
        jar.status == JarStatus::Filling && (jar.kind.is_simulated() || jar.is_on_chain())
    }
}

#[async_trait]
impl NotificationApi for Planner {
    fn get_notifications(&self) -> Vec<NotificationView> {
        self.notifications.iter().map(Into::into).collect()
    }

    async fn settle(&mut self, notification_id: &str) -> Result<SettlementView, JarError> {
        let notification = self.get_notification_internal(notification_id)?.clone();

        let payable_jar = self
            .get_jar_internal(&notification.jar_id)
            .ok()
            .filter(|jar| Self::is_payable(jar))
            .cloned();

        let Some(jar) = payable_jar else {
            tracing::info!(
                "Discarding notification {notification_id}: jar {} can't be paid",
                notification.jar_id
            );
            self.remove_notification(notification_id);

            return Ok(SettlementView::Discarded);
        };

        if jar.kind.is_simulated() {
            self.remove_notification(notification_id);

            emit(EventKind::SettleNotification(SettleData {
                notification_id: notification.id,
                jar_id: jar.id.clone(),
                periods: notification.periods_due,
                manual: true,
            }));

            return Ok(SettlementView::ManualPaymentRequested {
                jar_id: jar.id,
                amount: jar.recurring_amount.into(),
            });
        }

        assert_not_locked(&jar)?;

        let amount = jar
            .recurring_amount
            .checked_mul(u128::from(notification.periods_due))
            .ok_or(JarError::InvalidAmount)?;

        // The notification stays queued when the deposit fails.
        let deposit = self.deposit_internal(&jar.id, amount).await?;

        self.remove_notification(notification_id);

        emit(EventKind::SettleNotification(SettleData {
            notification_id: notification.id,
            jar_id: jar.id,
            periods: notification.periods_due,
            manual: false,
        }));

        Ok(SettlementView::Deposited(deposit))
    }

    fn dismiss(&mut self, notification_id: &str) -> Result<(), JarError> {
        self.get_notification_internal(notification_id)?;
        self.remove_notification(notification_id);

        emit(EventKind::DismissNotification(notification_id.to_owned()));

        Ok(())
    }
}
