use serde::{Deserialize, Serialize};

use crate::{JarId, NotificationId};

/// A pending billing notice. At most one exists per jar.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    pub id: NotificationId,
    pub jar_id: JarId,
    pub periods_due: u64,
    pub text: String,
}
