use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-requirement completion flags, keyed by requirement.
pub type Completions = BTreeMap<String, bool>;

/// A scout's registration for an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Registration {
    pub id: i64,
    pub scout_id: i64,
    pub event_id: i64,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationInput {
    pub event_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A registration's enrollment in an offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Assignment {
    pub registration_id: i64,
    pub offering_id: i64,
    pub periods: Vec<u8>,
    #[serde(default)]
    pub completions: Completions,
}

impl Assignment {
    pub fn completed_count(&self) -> usize {
        self.completions.values().filter(|&&done| done).count()
    }

    /// True once every tracked requirement is done. An offering without
    /// requirements is never considered complete.
    pub fn is_complete(&self) -> bool {
        !self.completions.is_empty() && self.completions.values().all(|&done| done)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentInput {
    pub offering_id: i64,
    pub periods: Vec<u8>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssignmentUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<u8>>,
    /// Partial update; keys not present keep their value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completions: Option<Completions>,
}

/// A scout's ranked interest in an offering. Rank 1 is the top choice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Preference {
    pub registration_id: i64,
    pub offering_id: i64,
    pub rank: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PreferenceInput {
    pub offering_id: i64,
    pub rank: u32,
}

/// Body of `PUT .../preferences/:offering_id`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PreferenceUpdate {
    pub rank: u32,
}
