//! Request-scoped correlation identifier.
//!
//! A `TraceId` follows one inbound request through the gateway: it is placed
//! in Tokio task-local storage by the HTTP trace middleware, captured by
//! domain errors, and echoed to clients in the `trace-id` response header.
//!
//! Task locals are not inherited by spawned tasks; wrap spawned work in
//! [`TraceId::scope`] to keep the identifier visible.

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

/// Header carrying the trace identifier on requests and responses.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier exposed via task-local storage.
///
/// # Examples
/// ```
/// use gateway::TraceId;
///
/// async fn handler() -> Option<String> {
///     TraceId::current().map(|id| id.to_string())
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Reuse an identifier supplied by an upstream proxy, falling back to a
    /// fresh one when the value is missing or not a UUID.
    ///
    /// # Examples
    /// ```
    /// use gateway::TraceId;
    ///
    /// let nil = "00000000-0000-0000-0000-000000000000";
    /// assert_eq!(TraceId::inherit_or_generate(Some(nil)).to_string(), nil);
    /// assert_ne!(TraceId::inherit_or_generate(Some("junk")).to_string(), "junk");
    /// ```
    #[must_use]
    pub fn inherit_or_generate(incoming: Option<&str>) -> Self {
        incoming
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or_else(Self::generate)
    }

    /// Returns the identifier in scope for the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
