use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

/// A monetary amount stored in cents.
///
/// The API exchanges prices as decimal strings ("10.00"); plain JSON numbers
/// are accepted on input as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(i64);

impl Price {
    pub const ZERO: Price = Price(0);

    pub const fn from_cents(cents: i64) -> Self {
        Price(cents)
    }

    pub const fn from_dollars(dollars: i64) -> Self {
        Price(dollars * 100)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Multiply by a quantity, e.g. for purchases. Saturates at the
    /// largest representable amount.
    pub fn times(self, quantity: u32) -> Self {
        Price(self.0.saturating_mul(i64::from(quantity)))
    }

    /// Parse "10", "10.5", "10.50" or "$10.50". At most two fractional digits.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        let (negative, s) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let s = s.strip_prefix('$').unwrap_or(s);
        if s.is_empty() {
            return None;
        }

        let (whole, fraction) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && fraction.is_empty() {
            return None;
        }
        if fraction.len() > 2
            || !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let whole: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
        let fraction: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().ok()? * 10,
            _ => fraction.parse().ok()?,
        };
        let cents = whole.checked_mul(100)?.checked_add(fraction)?;
        Some(Price(if negative { -cents } else { cents }))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        Price(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Price>>(iter: I) -> Price {
        iter.fold(Price::ZERO, Add::add)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PriceVisitor;

        impl<'de> de::Visitor<'de> for PriceVisitor {
            type Value = Price;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a price as a decimal string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Price::parse(v).ok_or_else(|| E::custom(format!("invalid price: {}", v)))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                v.checked_mul(100)
                    .map(Price)
                    .ok_or_else(|| E::custom("price out of range"))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                i64::try_from(v)
                    .ok()
                    .and_then(|v| v.checked_mul(100))
                    .map(Price)
                    .ok_or_else(|| E::custom("price out of range"))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                if !v.is_finite() {
                    return Err(E::custom("price must be finite"));
                }
                Ok(Price((v * 100.0).round() as i64))
            }
        }

        deserializer.deserialize_any(PriceVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(Price::parse("10"), Some(Price::from_cents(1000)));
        assert_eq!(Price::parse("10.5"), Some(Price::from_cents(1050)));
        assert_eq!(Price::parse("10.05"), Some(Price::from_cents(1005)));
        assert_eq!(Price::parse("$3.99"), Some(Price::from_cents(399)));
        assert_eq!(Price::parse(".75"), Some(Price::from_cents(75)));
        assert_eq!(Price::parse("-2.00"), Some(Price::from_cents(-200)));
        assert_eq!(Price::parse(""), None);
        assert_eq!(Price::parse("1.234"), None);
        assert_eq!(Price::parse("ten"), None);
        assert_eq!(Price::parse("."), None);
    }

    #[test]
    fn test_display_price() {
        assert_eq!(Price::from_cents(1000).to_string(), "10.00");
        assert_eq!(Price::from_cents(5).to_string(), "0.05");
        assert_eq!(Price::from_cents(-150).to_string(), "-1.50");
    }

    #[test]
    fn test_deserialize_string_or_number() {
        let p: Price = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(p, Price::from_cents(1250));
        let p: Price = serde_json::from_str("7").unwrap();
        assert_eq!(p, Price::from_dollars(7));
        let p: Price = serde_json::from_str("2.25").unwrap();
        assert_eq!(p, Price::from_cents(225));
        assert!(serde_json::from_str::<Price>("\"abc\"").is_err());
    }

    #[test]
    fn test_serialize_as_string() {
        assert_eq!(serde_json::to_string(&Price::from_cents(1999)).unwrap(), "\"19.99\"");
    }

    #[test]
    fn test_sum_and_times() {
        let total: Price = [Price::from_dollars(1), Price::from_cents(50)].into_iter().sum();
        assert_eq!(total, Price::from_cents(150));
        assert_eq!(Price::from_cents(250).times(3), Price::from_cents(750));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let huge = Price::from_cents(i64::MAX / 2);
        assert_eq!(huge.times(u32::MAX), Price::from_cents(i64::MAX));
        assert_eq!(huge + huge + huge, Price::from_cents(i64::MAX));
        assert_eq!(Price::from_cents(-5).times(u32::MAX).cents(), -5 * i64::from(u32::MAX));
    }
}
