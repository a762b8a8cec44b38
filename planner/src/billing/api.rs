use piggy_jar_model::{api::BillingApi, settlement::BillingReport, Day};

use crate::{
    billing::bill_jars,
    event::{emit, AdvanceClockData, EventKind},
    Planner,
};

impl BillingApi for Planner {
    fn get_current_day(&self) -> Day {
        self.clock.current_day()
    }

    fn advance(&mut self, days: Day) -> BillingReport {
        let current_day = self.clock.current_day();

        if days == 0 {
            return BillingReport {
                previous_day: current_day,
                current_day,
                due: vec![],
            };
        }

        let previous_day = self.clock.jump(days);
        let current_day = self.clock.current_day();

        let due = bill_jars(&mut self.jars, &mut self.notifications, previous_day, current_day);

        self.save_jars();
        self.save_billing_state();

        tracing::debug!("Clock moved from day {previous_day} to {current_day}, {} jar(s) due", due.len());

        emit(EventKind::AdvanceClock(AdvanceClockData {
            from: previous_day,
            to: current_day,
            due_jars: due.iter().map(|due| due.jar_id.clone()).collect(),
        }));

        BillingReport {
            previous_day,
            current_day,
            due,
        }
    }

    fn reset_clock(&mut self) {
        self.clock.reset();
        self.store.save_clock(&self.clock);

        emit(EventKind::ResetClock);
    }
}
