use std::{fmt, str::FromStr};

use crate::EngineError;

/// Positive money amount represented as **integer cents**.
///
/// Subscription amounts cross the wire as JSON numbers in major units but are
/// stored as cents to avoid floating-point drift.
///
/// # Examples
///
/// ```rust
/// use engine::Amount;
///
/// let amount: Amount = "12.34".parse().unwrap();
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing rejects zero, negatives and more than 2 decimals:
///
/// ```rust
/// use engine::Amount;
///
/// assert!("0".parse::<Amount>().is_err());
/// assert!("-1".parse::<Amount>().is_err());
/// assert!("12.345".parse::<Amount>().is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Creates an amount from integer cents. Must be > 0.
    pub fn from_cents(cents: i64) -> Result<Self, EngineError> {
        if cents <= 0 {
            return Err(invalid("amount must be greater than 0"));
        }
        Ok(Self(cents))
    }

    /// Creates an amount from a JSON number in major units (`9.99`).
    pub fn from_major(value: f64) -> Result<Self, EngineError> {
        if !value.is_finite() {
            return Err(invalid("invalid amount"));
        }
        // `Display` for f64 yields the shortest representation that round-trips,
        // so `9.99` is rendered as "9.99" and goes through the decimal parser.
        value.to_string().parse()
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Returns the value in major units, for JSON output.
    #[must_use]
    pub fn as_major(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

fn invalid(message: &str) -> EngineError {
    EngineError::validation("amount", message)
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl From<Amount> for i64 {
    fn from(value: Amount) -> Self {
        value.0
    }
}

impl FromStr for Amount {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - must be > 0
    /// - rejects empty/invalid strings and exponents
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(invalid("empty amount"));
        }
        if trimmed.starts_with('-') {
            return Err(invalid("amount must be greater than 0"));
        }
        let rest = trimmed.strip_prefix('+').unwrap_or(trimmed);

        let mut parts = rest.split('.');
        let units_str = parts.next().unwrap_or_default();
        let cents_str = parts.next();
        if parts.next().is_some() {
            return Err(invalid("invalid amount"));
        }

        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid("invalid amount"));
        }
        let units: i64 = units_str
            .parse()
            .map_err(|_| invalid("amount too large"))?;

        let cents: i64 = match cents_str {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid("invalid amount"));
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid("invalid amount"))? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid("invalid amount"))?,
                    _ => return Err(invalid("amount must have at most 2 decimals")),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(|| invalid("amount too large"))?;

        Self::from_cents(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_formats_two_decimals() {
        assert_eq!(Amount::from_cents(1).unwrap().to_string(), "0.01");
        assert_eq!(Amount::from_cents(10).unwrap().to_string(), "0.10");
        assert_eq!(Amount::from_cents(1050).unwrap().to_string(), "10.50");
    }

    #[test]
    fn parse_accepts_up_to_two_decimals() {
        assert_eq!("10".parse::<Amount>().unwrap().cents(), 1000);
        assert_eq!("10.5".parse::<Amount>().unwrap().cents(), 1050);
        assert_eq!("+1.00".parse::<Amount>().unwrap().cents(), 100);
        assert_eq!("  2.30 ".parse::<Amount>().unwrap().cents(), 230);
        assert!("12.345".parse::<Amount>().is_err());
        assert!("1,50".parse::<Amount>().is_err());
    }

    #[test]
    fn from_major_keeps_cents_exact() {
        assert_eq!(Amount::from_major(9.99).unwrap().cents(), 999);
        assert_eq!(Amount::from_major(15.49).unwrap().cents(), 1549);
        assert_eq!(Amount::from_major(100.0).unwrap().cents(), 10_000);
        assert!((Amount::from_major(0.1).unwrap().as_major() - 0.1).abs() < f64::EPSILON);
    }

    #[test]
    fn from_major_rejects_non_positive_and_fractions_of_cents() {
        assert!(Amount::from_major(0.0).is_err());
        assert!(Amount::from_major(-3.5).is_err());
        assert!(Amount::from_major(0.001).is_err());
        assert!(Amount::from_major(f64::NAN).is_err());
        assert!(Amount::from_major(1e30).is_err());
    }
}
