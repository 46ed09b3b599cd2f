use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Price;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum Semester {
    Spring,
    Fall,
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Semester::Spring => write!(f, "Spring"),
            Semester::Fall => write!(f, "Fall"),
        }
    }
}

/// A merit badge event held on a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Event {
    pub id: i64,
    pub year: i32,
    pub semester: Semester,
    pub date: NaiveDate,
    pub registration_open: NaiveDate,
    pub registration_close: NaiveDate,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub price: Price,
}

impl Event {
    /// "Spring 2026"
    pub fn label(&self) -> String {
        format!("{} {}", self.semester, self.year)
    }

    pub fn formatted_date(&self) -> String {
        self.date.format("%b %d, %Y").to_string()
    }

    /// Registration window is inclusive on both ends
    pub fn is_registration_open(&self, today: NaiveDate) -> bool {
        today >= self.registration_open && today <= self.registration_close
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventInput {
    pub year: i32,
    pub semester: Semester,
    pub date: NaiveDate,
    pub registration_open: NaiveDate,
    pub registration_close: NaiveDate,
    pub price: Price,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semester: Option<Semester>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_open: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_close: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

/// Body of `POST /api/events/current`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CurrentEventRequest {
    pub id: i64,
}
