use serde::{Deserialize, Serialize};

use super::Price;

/// A merit badge in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Badge {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BadgeInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BadgeUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A badge taught at an event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Offering {
    pub id: i64,
    pub badge_id: i64,
    pub event_id: i64,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub price: Price,
    /// Periods the class meets in, sorted and unique
    pub periods: Vec<u8>,
    /// Number of periods a scout spends in the class
    pub duration: u8,
    pub requirements: Vec<String>,
    pub size_limit: u32,
}

impl Offering {
    pub fn meets_in(&self, period: u8) -> bool {
        self.periods.contains(&period)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferingInput {
    pub badge_id: i64,
    #[serde(default)]
    pub price: Price,
    pub periods: Vec<u8>,
    #[serde(default = "default_duration")]
    pub duration: u8,
    #[serde(default)]
    pub requirements: Vec<String>,
    /// Falls back to the configured default class size
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<u32>,
}

fn default_duration() -> u8 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OfferingUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub periods: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_limit: Option<u32>,
}
