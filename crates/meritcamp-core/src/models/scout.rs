use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// A scout, owned by the coordinator who created it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Scout {
    pub id: i64,
    pub user_id: i64,
    pub firstname: String,
    pub lastname: String,
    pub birthday: NaiveDate,
    #[serde(default)]
    pub troop: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    pub emergency_name: String,
    pub emergency_relation: String,
    pub emergency_phone: String,
}

impl Scout {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    pub fn display_name(&self) -> String {
        format!("{}, {}", self.lastname, self.firstname)
    }

    /// Age in whole years on the given date
    pub fn age_on(&self, date: NaiveDate) -> i32 {
        let mut age = date.year() - self.birthday.year();
        if (date.month(), date.day()) < (self.birthday.month(), self.birthday.day()) {
            age -= 1;
        }
        age
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoutInput {
    pub firstname: String,
    pub lastname: String,
    pub birthday: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub emergency_name: String,
    pub emergency_relation: String,
    pub emergency_phone: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoutUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub troop: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_relation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_phone: Option<String>,
}
