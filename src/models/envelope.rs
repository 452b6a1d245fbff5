//! Wire-level event types shared by the publisher and the consumers.
//!
//! Every broker message is an `Envelope<Payload>` serialized as JSON. The
//! `message_id` travels as a string and is only parsed into a UUID during the
//! structural check, so a malformed id is routed to the dead-letter sink
//! instead of failing as a decode error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The three event kinds, 1:1 with the three broker topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Personal,
    Position,
    History,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Personal => "personal",
            EventKind::Position => "position",
            EventKind::History => "history",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "personal" => Ok(EventKind::Personal),
            "position" => Ok(EventKind::Position),
            "history" => Ok(EventKind::History),
            other => Err(format!("unknown event kind: {other}")),
        }
    }
}

/// Wire envelope carrying kind, identity, payload and provenance for one event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub kind: EventKind,
    pub message_id: String,
    pub employee_id: String,
    pub payload: T,
    pub timestamp: DateTime<Utc>,
    pub source: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Contacts {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Personal-facts event payload. All fields default to empty so that partial
/// payloads reach business validation rather than failing to decode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalPayload {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    /// ISO date, YYYY-MM-DD.
    #[serde(default)]
    pub birth_date: String,
    #[serde(default)]
    pub contacts: Contacts,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PositionPayload {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub grade: String,
    /// ISO date, YYYY-MM-DD.
    #[serde(default)]
    pub effective_from: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Period {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HistoryPayload {
    #[serde(default)]
    pub employee_id: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub period: Period,
    #[serde(default)]
    pub stack: Vec<String>,
}

/// Allowed career grades. The wire format carries the grade as a plain string;
/// parsing into this enum is the business-validation step, not the decode step,
/// so an out-of-range grade dead-letters instead of failing as malformed JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grade {
    Junior,
    Middle,
    Senior,
    Lead,
    Head,
}

impl Grade {
    pub const ALL: [&'static str; 5] = ["Junior", "Middle", "Senior", "Lead", "Head"];
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Junior" => Ok(Grade::Junior),
            "Middle" => Ok(Grade::Middle),
            "Senior" => Ok(Grade::Senior),
            "Lead" => Ok(Grade::Lead),
            "Head" => Ok(Grade::Head),
            other => Err(format!(
                "invalid enum value: grade {} not in allowed grades {:?}",
                other,
                Grade::ALL
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_round_trip() {
        for kind in [EventKind::Personal, EventKind::Position, EventKind::History] {
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
        assert!("payroll".parse::<EventKind>().is_err());
    }

    #[test]
    fn test_event_kind_serde_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&EventKind::Position).unwrap(),
            "\"position\""
        );
    }

    #[test]
    fn test_partial_personal_payload_decodes() {
        let payload: PersonalPayload =
            serde_json::from_str(r#"{"employee_id": "e-1"}"#).unwrap();
        assert_eq!(payload.employee_id, "e-1");
        assert!(payload.first_name.is_empty());
        assert!(payload.contacts.email.is_empty());
    }

    #[test]
    fn test_history_payload_missing_stack_defaults_to_empty() {
        let payload: HistoryPayload = serde_json::from_str(
            r#"{"employee_id": "e-1", "company": "Acme", "period": {"from": "2020-01-01", "to": "2021-01-01"}}"#,
        )
        .unwrap();
        assert!(payload.stack.is_empty());
    }

    #[test]
    fn test_grade_parse() {
        assert_eq!("Senior".parse::<Grade>().unwrap(), Grade::Senior);
        let err = "Principal".parse::<Grade>().unwrap_err();
        assert!(err.contains("Principal"));
        assert!(err.contains("allowed grades"));
    }
}
