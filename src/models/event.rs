use serde::{Deserialize, Serialize};

/// Start or end of a calendar event: all-day entries carry `date`,
/// timed entries carry `dateTime`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EventTime {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(
        default,
        rename = "dateTime",
        skip_serializing_if = "Option::is_none"
    )]
    pub date_time: Option<String>,
}

/// A calendar event, read-only from the core's perspective. The store
/// returns them ordered by start time ascending, so the first element is
/// the next upcoming one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
}
