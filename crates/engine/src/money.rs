use std::{fmt, str::FromStr};

use crate::EngineError;

/// Signed amount of Korean won.
///
/// The won has no minor unit in practice, so the value is a plain integer.
///
/// # Examples
///
/// ```rust
/// use engine::Won;
///
/// assert_eq!(Won::new(1_200_000).to_string(), "1,200,000원");
/// assert_eq!("12,000".parse::<Won>().unwrap().amount(), 12_000);
/// assert!("12.5".parse::<Won>().is_err());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Won(i64);

impl Won {
    /// Largest amount a single deposit, expense, budget or bank balance
    /// may carry: one trillion won.
    pub const MAX: Won = Won(1_000_000_000_000);

    #[must_use]
    pub const fn new(amount: i64) -> Self {
        Self(amount)
    }

    #[must_use]
    pub const fn amount(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Won {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.0.unsigned_abs().to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (idx, ch) in digits.chars().enumerate() {
            if idx > 0 && (digits.len() - idx) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }
        write!(f, "{sign}{grouped}원")
    }
}

impl From<i64> for Won {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<Won> for i64 {
    fn from(value: Won) -> Self {
        value.0
    }
}

impl FromStr for Won {
    type Err = EngineError;

    /// Parses user input such as `12000`, `12,000` or `12,000원`.
    ///
    /// Decimal points are rejected: there is nothing below one won.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s}"));

        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('원').unwrap_or(trimmed).trim_end();
        if trimmed.is_empty() {
            return Err(EngineError::InvalidAmount("empty amount".to_string()));
        }

        let (negative, rest) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let digits: String = rest.chars().filter(|c| *c != ',').collect();
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }

        let value: i64 = digits
            .parse()
            .map_err(|_| EngineError::InvalidAmount("amount too large".to_string()))?;
        Ok(Won(if negative { -value } else { value }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_groups_thousands() {
        assert_eq!(Won::new(0).to_string(), "0원");
        assert_eq!(Won::new(999).to_string(), "999원");
        assert_eq!(Won::new(1000).to_string(), "1,000원");
        assert_eq!(Won::new(4_000_000).to_string(), "4,000,000원");
        assert_eq!(Won::new(-12_500).to_string(), "-12,500원");
    }

    #[test]
    fn parse_accepts_separators_and_suffix() {
        assert_eq!("12000".parse::<Won>().unwrap().amount(), 12_000);
        assert_eq!(" 12,000 ".parse::<Won>().unwrap().amount(), 12_000);
        assert_eq!("12,000원".parse::<Won>().unwrap().amount(), 12_000);
        assert_eq!("-500".parse::<Won>().unwrap().amount(), -500);
    }

    #[test]
    fn parse_rejects_decimals_and_garbage() {
        assert!("12.5".parse::<Won>().is_err());
        assert!("abc".parse::<Won>().is_err());
        assert!("".parse::<Won>().is_err());
        assert!("원".parse::<Won>().is_err());
    }
}
