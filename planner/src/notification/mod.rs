use piggy_jar_model::{notification::NotificationView, JarId, NotificationId};
use serde::{Deserialize, Serialize};

use crate::{jar::model::Jar, Planner};

mod api;
#[cfg(test)]
mod tests;

fn one_period() -> u64 {
    1
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    pub jar_id: JarId,

    /// Unpaid periods of the jar. Older entries stored it as `periods`.
    #[serde(alias = "periods", default = "one_period")]
    pub periods_due: u64,

    pub text: String,
}

impl Notification {
    fn describe(jar: &Jar, periods_due: u64) -> String {
        format!("{periods_due} {} payment(s) due for {}", jar.cadence, jar.name)
    }
}

impl From<&Notification> for NotificationView {
    fn from(notification: &Notification) -> Self {
        Self {
            id: notification.id.clone(),
            jar_id: notification.jar_id.clone(),
            periods_due: notification.periods_due,
            text: notification.text.clone(),
        }
    }
}

/// Pending notifications, most recent first. Holds at most one entry per jar.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct NotificationQueue {
    items: Vec<Notification>,
}

impl NotificationQueue {
    /// Replaces the pending notification of `jar` with a new one.
    /// Periods of the replaced notification were never paid, so they are carried over.
    pub(crate) fn raise(&mut self, jar: &Jar, new_periods: u64) -> &Notification {
        let carried = self.remove_for_jar(&jar.id).map_or(0, |previous| previous.periods_due);
        let periods_due = carried + new_periods;

        self.items.insert(
            0,
            Notification {
                id: Planner::generate_id(),
                jar_id: jar.id.clone(),
                periods_due,
                text: Notification::describe(jar, periods_due),
            },
        );

        &self.items[0]
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.items.iter().find(|notification| notification.id == id)
    }

    pub fn for_jar(&self, jar_id: &str) -> Option<&Notification> {
        self.items.iter().find(|notification| notification.jar_id == jar_id)
    }

    pub(crate) fn remove(&mut self, id: &str) -> Option<Notification> {
        let index = self.items.iter().position(|notification| notification.id == id)?;
        Some(self.items.remove(index))
    }

    fn remove_for_jar(&mut self, jar_id: &str) -> Option<Notification> {
        let index = self.items.iter().position(|notification| notification.jar_id == jar_id)?;
        Some(self.items.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Notification> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
