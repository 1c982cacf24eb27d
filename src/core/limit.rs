use crate::utils::error::{Result, UsersError};
use std::num::{IntErrorKind, NonZeroUsize, ParseIntError};

const TOO_LARGE: &str = "limit is too large";
const NEGATIVE: &str = "limit cannot be negative";

/// Number of users returned when the caller does not ask for a specific count.
pub const DEFAULT_LIMIT: NonZeroUsize = match NonZeroUsize::new(10) {
    Some(limit) => limit,
    None => panic!("default limit must be non-zero"),
};

/// Resolves the raw `limit` parameter into a positive count.
///
/// Absent, blank and `0` resolve to [`DEFAULT_LIMIT`]. Anything that is not an
/// integer, or is negative, fails with [`UsersError::MalformedLimit`] instead of
/// quietly falling back to the default.
pub fn resolve_limit(raw: Option<&str>) -> Result<NonZeroUsize> {
    let trimmed = match raw.map(str::trim) {
        None | Some("") => {
            tracing::info!("Limit set to default value of {}", DEFAULT_LIMIT);
            return Ok(DEFAULT_LIMIT);
        }
        Some(value) => value,
    };

    let malformed = |reason: String| UsersError::MalformedLimit {
        value: trimmed.to_string(),
        reason,
    };

    let parsed: i64 = trimmed.parse().map_err(|e: ParseIntError| match e.kind() {
        IntErrorKind::PosOverflow => malformed(TOO_LARGE.to_string()),
        IntErrorKind::NegOverflow => malformed(NEGATIVE.to_string()),
        _ => malformed(format!("not an integer ({})", e)),
    })?;

    if parsed < 0 {
        return Err(malformed(NEGATIVE.to_string()));
    }

    let count = usize::try_from(parsed).map_err(|_| malformed(TOO_LARGE.to_string()))?;

    match NonZeroUsize::new(count) {
        Some(limit) => Ok(limit),
        None => {
            tracing::info!("Limit set to default value of {}", DEFAULT_LIMIT);
            Ok(DEFAULT_LIMIT)
        }
    }
}

/// Keeps the first `limit` items in their original order.
///
/// The upstream has no server-side limit, so truncation happens here after the
/// full list has been fetched.
pub fn apply_limit<T>(mut items: Vec<T>, limit: NonZeroUsize) -> Vec<T> {
    items.truncate(limit.get());
    items
}
