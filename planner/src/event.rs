use piggy_jar_model::{jar::Cadence, Address, Day, JarId, NotificationId, U128};
use serde::Serialize;

#[cfg(test)]
use crate::common::test_env_ext;
use crate::{PACKAGE_NAME, VERSION};

pub(crate) const EVENT_TARGET: &str = "piggy_jar::event";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub(crate) enum EventKind {
    CreateJar(CreateJarData),
    Deposit(DepositData),
    BreakJar(JarId),
    ClearJars(Address),
    AdvanceClock(AdvanceClockData),
    ResetClock,
    SettleNotification(SettleData),
    DismissNotification(NotificationId),
}

#[derive(Debug, Serialize)]
struct PiggyJarEvent {
    standard: &'static str,
    version: &'static str,
    #[serde(flatten)]
    event_kind: EventKind,
}

/// Creating a Jar.
/// `contract_address` – address of the deployed jar contract, absent for simulated jars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct CreateJarData {
    pub id: JarId,
    pub cadence: Cadence,
    pub target: U128,
    pub contract_address: Option<Address>,
}

/// Deposit into a Jar.
/// `.0` – ID of the Jar.
/// `.1` – deposited amount.
pub(crate) type DepositData = (JarId, U128);

/// Jump of the simulated clock.
/// `due_jars` – IDs of Jars that got a notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct AdvanceClockData {
    pub from: Day,
    pub to: Day,
    pub due_jars: Vec<JarId>,
}

/// Settling a notification.
/// `periods` – number of periods the notification covered.
/// `manual`  – whether the payment was handed to the user for offline confirmation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SettleData {
    pub notification_id: NotificationId,
    pub jar_id: JarId,
    pub periods: u64,
    pub manual: bool,
}

impl From<EventKind> for PiggyJarEvent {
    fn from(event_kind: EventKind) -> Self {
        Self {
            standard: PACKAGE_NAME,
            version: VERSION,
            event_kind,
        }
    }
}

#[mutants::skip]
#[cfg(not(test))]
pub(crate) fn emit(event: EventKind) {
    log_event(event);
}

#[mutants::skip]
#[cfg(test)]
pub(crate) fn emit(event: EventKind) {
    test_env_ext::store_event(&event);

    if test_env_ext::should_log_events() {
        log_event(event);
    }
}

fn log_event(event: EventKind) {
    match PiggyJarEvent::from(event).to_json_event_string() {
        Ok(json) => tracing::info!(target: EVENT_TARGET, "{json}"),
        Err(err) => tracing::error!(target: EVENT_TARGET, "Failed to serialize event: {err}"),
    }
}

impl PiggyJarEvent {
    fn to_json_event_string(&self) -> serde_json::Result<String> {
        Ok(format!("EVENT_JSON:{}", serde_json::to_string(self)?))
    }
}

#[cfg(test)]
mod test {
    use piggy_jar_model::{jar::Cadence, U128};

    use crate::event::{CreateJarData, EventKind, PiggyJarEvent};

    #[test]
    fn event_to_string() {
        let event = PiggyJarEvent::from(EventKind::CreateJar(CreateJarData {
            id: "abc".to_string(),
            cadence: Cadence::Weekly,
            target: U128(100),
            contract_address: Some("0x00000000000000000000000000000000000000aa".parse().unwrap()),
        }))
        .to_json_event_string()
        .unwrap();

        let json = format!(
            r#"EVENT_JSON:{{"standard":"piggy_jar","version":"{}","event":"create_jar","data":{{"id":"abc","cadence":"weekly","target":"100","contract_address":"0x00000000000000000000000000000000000000aa"}}}}"#,
            crate::VERSION
        );

        assert_eq!(json, event);

        let event = PiggyJarEvent::from(EventKind::Deposit(("abc".to_string(), U128(5))))
            .to_json_event_string()
            .unwrap();

        assert!(event.ends_with(r#""event":"deposit","data":["abc","5"]}"#), "{event}");

        let event = PiggyJarEvent::from(EventKind::ResetClock).to_json_event_string().unwrap();

        assert!(event.ends_with(r#""event":"reset_clock"}"#), "{event}");
    }
}
