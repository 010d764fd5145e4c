//! Caller-id extraction from a successful validation reply.
//!
//! Each extractor inspects one carrier and either finds a positive user id or
//! gives up. [`extract_user_id`] tries them in a fixed order and stops at the
//! first hit.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use reqwest::header::HeaderMap;
use serde_json::{Map, Number, Value};

use crate::domain::{BearerToken, UserId};

/// Header names carrying the caller id. Lookups are case-insensitive, so
/// `X-UserId` and `X-UserID` share one entry.
const USER_ID_HEADERS: [&str; 2] = ["x-user-id", "x-userid"];

/// JSON keys accepted for the caller id, in priority order.
const USER_ID_KEYS: [&str; 8] = [
    "user_id", "userId", "userID", "User_id", "UserId", "id", "uid", "sub",
];

/// Object key under which the id may be nested one level deep.
const NESTED_USER_KEY: &str = "user";

/// Everything an extractor may inspect.
pub(crate) struct ValidationReply<'a> {
    pub(crate) headers: &'a HeaderMap,
    pub(crate) body: &'a [u8],
    pub(crate) token: &'a BearerToken,
}

type Extractor = fn(&ValidationReply<'_>) -> Option<UserId>;

const EXTRACTORS: [Extractor; 3] = [from_headers, from_body, from_token_claims];

/// Run the extractors in order and return the first id found.
pub(crate) fn extract_user_id(reply: &ValidationReply<'_>) -> Option<UserId> {
    EXTRACTORS.iter().find_map(|extract| extract(reply))
}

fn from_headers(reply: &ValidationReply<'_>) -> Option<UserId> {
    USER_ID_HEADERS.iter().find_map(|name| {
        let raw = reply.headers.get(*name)?.to_str().ok()?;
        parse_positive(raw)
    })
}

fn from_body(reply: &ValidationReply<'_>) -> Option<UserId> {
    let payload: Value = serde_json::from_slice(reply.body).ok()?;
    find_in_document(&payload)
}

fn from_token_claims(reply: &ValidationReply<'_>) -> Option<UserId> {
    let segment = reply.token.credential().split('.').nth(1)?;
    let decoded = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .ok()?;
    let claims: Value = serde_json::from_slice(&decoded).ok()?;
    find_in_document(&claims)
}

fn find_in_document(document: &Value) -> Option<UserId> {
    let object = document.as_object()?;
    find_in_object(object).or_else(|| {
        object
            .get(NESTED_USER_KEY)
            .and_then(Value::as_object)
            .and_then(find_in_object)
    })
}

fn find_in_object(object: &Map<String, Value>) -> Option<UserId> {
    USER_ID_KEYS
        .iter()
        .find_map(|key| object.get(*key).and_then(normalise_id))
}

fn normalise_id(value: &Value) -> Option<UserId> {
    match value {
        Value::Number(number) => number
            .as_i64()
            .or_else(|| integral_float(number))
            .and_then(|raw| UserId::new(raw).ok()),
        Value::String(raw) => parse_positive(raw),
        _ => None,
    }
}

/// Accept floats such as `42.0`; fractional or out-of-range values fail to
/// parse back as an integer.
fn integral_float(number: &Number) -> Option<i64> {
    number.as_f64()?.to_string().parse::<i64>().ok()
}

fn parse_positive(raw: &str) -> Option<UserId> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .and_then(|id| UserId::new(id).ok())
}
