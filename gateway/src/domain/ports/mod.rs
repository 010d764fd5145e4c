//! Domain ports: the boundaries adapters implement.
//!
//! - [`SemanticBackend`] is the typed RPC surface of the search backend.
//! - [`IdentityResolver`] turns bearer tokens into callers.

mod macros;
pub(crate) use macros::define_port_error;

mod identity_resolver;
mod semantic_backend;

#[cfg(test)]
pub use identity_resolver::MockIdentityResolver;
pub use identity_resolver::{
    FixtureIdentityResolver, IdentityError, IdentityResolver, UnconfiguredIdentityResolver,
};
#[cfg(test)]
pub use semantic_backend::MockSemanticBackend;
pub use semantic_backend::{FixtureSemanticBackend, RpcFailure, SemanticBackend};
