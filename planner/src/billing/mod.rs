use piggy_jar_model::{jar::JarStatus, settlement::DueJar, Day};
use serde::{Deserialize, Serialize};

use crate::{jar::model::Jar, notification::NotificationQueue};

mod api;

/// Process-wide day counter, moved only by explicit user jumps.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct SimulatedClock {
    current_day: Day,
}

impl SimulatedClock {
    pub fn at(current_day: Day) -> Self {
        Self { current_day }
    }

    pub fn current_day(&self) -> Day {
        self.current_day
    }

    /// Moves the clock forward and returns the day it was on before.
    pub(crate) fn jump(&mut self, days: Day) -> Day {
        let previous_day = self.current_day;
        self.current_day = previous_day.saturating_add(days);
        previous_day
    }

    pub(crate) fn reset(&mut self) {
        self.current_day = 0;
    }
}

/// Number of whole periods of `period_days` between `last_paid` and `now`.
/// Zero when `now` is not after `last_paid`, which happens after a clock reset.
pub fn periods_due(period_days: Day, last_paid: Day, now: Day) -> u64 {
    now.checked_sub(last_paid).map_or(0, |elapsed| elapsed / period_days)
}

/// Bills every filling jar for the periods that elapsed up to `current_day`.
///
/// A jar that has never been billed starts its schedule at `previous_day`, the day before the jump,
/// so periods from before its creation are not charged. Billed periods are consumed from the
/// schedule right away and handed to the notification queue.
pub(crate) fn bill_jars(
    jars: &mut [Jar],
    notifications: &mut NotificationQueue,
    previous_day: Day,
    current_day: Day,
) -> Vec<DueJar> {
    let mut due = vec![];

    for jar in jars.iter_mut().filter(|jar| jar.status == JarStatus::Filling) {
        let period_days = jar.cadence.period_days();
        let last_paid = *jar.last_period_paid_day.get_or_insert(previous_day);
        let new_periods = periods_due(period_days, last_paid, current_day);

        if new_periods == 0 {
            continue;
        }

        let last_period_paid_day = last_paid + new_periods * period_days;
        jar.last_period_paid_day = Some(last_period_paid_day);

        let notification = notifications.raise(jar, new_periods);

        due.push(DueJar {
            jar_id: jar.id.clone(),
            new_periods,
            periods_due: notification.periods_due,
            last_period_paid_day,
        });
    }

    due
}
