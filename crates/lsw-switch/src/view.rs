use chrono::{SecondsFormat, TimeZone, Utc};
use serde::Serialize;

/// Point-in-time copy of a [`crate::Switch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchSnapshot {
    pub name: String,
    pub state: String,
    pub next: String,
    pub timestamp: u64,
}

impl SwitchSnapshot {
    /// Template view model for this snapshot.
    pub fn view(&self) -> SwitchView {
        SwitchView {
            name: self.name.clone(),
            timestamp: format_timestamp(self.timestamp),
            state: self.state.clone(),
            next: self.next.clone(),
        }
    }
}

/// Fields exposed to the HTML template as `{{.Name}}`, `{{.Timestamp}}`,
/// `{{.State}}` and `{{.Next}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct SwitchView {
    pub name: String,
    /// RFC3339, UTC, second precision.
    pub timestamp: String,
    pub state: String,
    pub next: String,
}

/// RFC3339 rendering of a nanosecond epoch stamp (UTC, whole seconds).
pub fn format_timestamp(nanos: u64) -> String {
    let nanos = i64::try_from(nanos).unwrap_or(i64::MAX);
    Utc.timestamp_nanos(nanos)
        .to_rfc3339_opts(SecondsFormat::Secs, true)
}
