//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns a ready-to-send `400` [`Error`] so handlers can
//! validate with `?` in the order their contract prescribes.

use crate::domain::{ChatId, Error, UserId};

const USER_ID_INVALID: &str = "user_id must be a positive integer";
const CHAT_ID_INVALID: &str = "chat_id must be a positive integer";

/// Parse an optional `user_id` query value.
///
/// Missing, blank and `0` all mean "not supplied".
pub(crate) fn parse_optional_user_id(raw: Option<&str>) -> Result<Option<UserId>, Error> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let parsed = raw
        .parse::<i64>()
        .map_err(|_| Error::invalid_request(USER_ID_INVALID))?;
    optional_user_id(parsed)
}

/// Interpret a numeric `user_id` from a JSON body; `0` means "not supplied".
pub(crate) fn optional_user_id(raw: i64) -> Result<Option<UserId>, Error> {
    if raw == 0 {
        return Ok(None);
    }
    UserId::new(raw)
        .map(Some)
        .map_err(|_| Error::invalid_request(USER_ID_INVALID))
}

/// Parse the `{chat_id}` path segment.
pub(crate) fn parse_chat_id(raw: &str) -> Result<ChatId, Error> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|value| ChatId::new(value).ok())
        .ok_or_else(|| Error::invalid_request(CHAT_ID_INVALID))
}

/// Require a non-blank text field, returning it unchanged.
pub(crate) fn require_text(value: Option<String>, message: &'static str) -> Result<String, Error> {
    value
        .filter(|text| !text.trim().is_empty())
        .ok_or_else(|| Error::invalid_request(message))
}
