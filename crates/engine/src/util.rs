//! Internal helpers for input validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation so every operation normalizes text the same way.

use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use crate::{EngineError, ResultEngine, Won};

/// Trim and NFC-normalize a required text field.
///
/// Hangul typed on different keyboards may arrive decomposed; composing it
/// keeps nickname and category comparisons stable.
pub(crate) fn normalize_required(value: &str, label: &str) -> ResultEngine<String> {
    let normalized: String = value.trim().nfc().collect();
    if normalized.is_empty() {
        return Err(EngineError::InvalidInput(format!(
            "{label} must not be empty"
        )));
    }
    Ok(normalized)
}

pub(crate) fn normalize_optional(value: Option<&str>) -> Option<String> {
    value
        .map(|s| s.trim().nfc().collect::<String>())
        .filter(|s| !s.is_empty())
}

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::InvalidId(format!("invalid {label} id")))
}

pub(crate) fn require_positive(amount: i64, label: &str) -> ResultEngine<()> {
    if amount <= 0 {
        return Err(EngineError::InvalidAmount(format!("{label} must be > 0")));
    }
    require_at_most_max(amount, label)
}

pub(crate) fn require_at_most_max(amount: i64, label: &str) -> ResultEngine<()> {
    if amount > Won::MAX.amount() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must be <= {}",
            Won::MAX
        )));
    }
    Ok(())
}

/// Sum amounts, failing instead of wrapping when the total leaves `i64`.
pub(crate) fn checked_sum(amounts: impl IntoIterator<Item = i64>) -> ResultEngine<i64> {
    amounts
        .into_iter()
        .try_fold(0i64, |total, amount| total.checked_add(amount))
        .ok_or_else(|| EngineError::InvalidAmount("amount total out of range".to_string()))
}
