use serde::{Deserialize, Deserializer, Serialize};

use super::Price;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
#[serde(rename_all = "lowercase")]
pub enum Size {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

/// An optional item sold with an event registration (t-shirt, lunch, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Purchasable {
    pub id: i64,
    pub event_id: i64,
    pub item: String,
    #[serde(default)]
    pub description: String,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub price: Price,
    #[serde(default)]
    pub has_size: bool,
    #[serde(default)]
    pub minimum_age: Option<u32>,
    #[serde(default)]
    pub maximum_age: Option<u32>,
    /// None means unlimited
    #[serde(default)]
    pub purchaser_limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchasableInput {
    pub item: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub has_size: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_age: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchaser_limit: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchasableUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_size: Option<bool>,
    /// `Some(None)` clears the bound
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub minimum_age: Option<Option<u32>>,
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub maximum_age: Option<Option<u32>>,
    /// `Some(None)` makes the item unlimited again
    #[serde(default, deserialize_with = "clearable", skip_serializing_if = "Option::is_none")]
    pub purchaser_limit: Option<Option<u32>>,
}

/// A missing field stays `None` (unchanged) through `#[serde(default)]`;
/// a present one, including `null`, becomes `Some`.
fn clearable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A registration's purchase of a purchasable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Purchase {
    pub id: i64,
    pub registration_id: i64,
    pub purchasable_id: i64,
    pub quantity: u32,
    #[serde(default)]
    pub size: Option<Size>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseInput {
    pub purchasable_id: i64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PurchaseUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
}
