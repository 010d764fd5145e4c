//! Caller identity and bearer credentials.
//!
//! The gateway never validates tokens itself. A [`BearerToken`] is only
//! checked for shape before being handed to the identity service, and the
//! resulting [`Caller`] carries nothing but the user id that service vouched
//! for.

use zeroize::Zeroize;

use super::{Error, UserId};

const BEARER_PREFIX: &str = "Bearer ";

/// Raw `Authorization` header value with a `Bearer ` prefix.
///
/// The value is forwarded verbatim to the identity service. `Debug` output is
/// redacted and the buffer is wiped on drop.
///
/// # Examples
/// ```
/// use gateway::domain::BearerToken;
///
/// let token = BearerToken::parse("Bearer abc.def.ghi").expect("bearer header");
/// assert_eq!(token.credential(), "abc.def.ghi");
/// assert_eq!(format!("{token:?}"), "BearerToken(<redacted>)");
/// assert!(BearerToken::parse("Basic Zm9vOmJhcg==").is_none());
/// ```
pub struct BearerToken(String);

impl BearerToken {
    /// Accept a header value only when it starts with `Bearer `.
    #[must_use]
    pub fn parse(header: &str) -> Option<Self> {
        header
            .starts_with(BEARER_PREFIX)
            .then(|| Self(header.to_owned()))
    }

    /// Full header value including the scheme.
    #[must_use]
    pub fn header_value(&self) -> &str {
        self.0.as_str()
    }

    /// Credential part after the scheme, trimmed.
    #[must_use]
    pub fn credential(&self) -> &str {
        self.0
            .strip_prefix(BEARER_PREFIX)
            .unwrap_or_default()
            .trim()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

impl Drop for BearerToken {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

/// Identity attached to a request once its token has been accepted.
///
/// `user_id` is `None` when the identity service accepted the token without
/// exposing an id through any of the supported carriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caller {
    user_id: Option<UserId>,
}

impl Caller {
    /// Caller with a known user id.
    #[must_use]
    pub const fn identified(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// Caller whose token was accepted but whose id is unknown.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { user_id: None }
    }

    /// Authenticated user id, if known.
    #[must_use]
    pub const fn user_id(&self) -> Option<UserId> {
        self.user_id
    }
}

/// Reconcile a user id supplied by the client with the authenticated one.
///
/// Token identity wins over body consistency: a mismatch is `403`, a
/// request with neither id is `401`.
///
/// # Errors
///
/// Returns [`Error::forbidden`] when both ids are known and differ, and
/// [`Error::unauthorized`] when neither is known.
///
/// # Examples
/// ```
/// use gateway::domain::{resolve_user_id, ErrorCode, UserId};
///
/// let a = UserId::new(42).ok();
/// let b = UserId::new(7).ok();
/// assert_eq!(resolve_user_id(None, a).ok(), a);
/// assert_eq!(
///     resolve_user_id(b, a).map_err(|err| err.code()),
///     Err(ErrorCode::Forbidden)
/// );
/// ```
pub fn resolve_user_id(
    requested: Option<UserId>,
    authenticated: Option<UserId>,
) -> Result<UserId, Error> {
    match (requested, authenticated) {
        (Some(requested), Some(authenticated)) if requested != authenticated => {
            Err(Error::forbidden("user_id does not match token"))
        }
        (Some(requested), _) => Ok(requested),
        (None, Some(authenticated)) => Ok(authenticated),
        (None, None) => Err(Error::unauthorized("user_id is required")),
    }
}
