//! Identity service adapter.

mod extractors;
mod http_resolver;

pub use http_resolver::{
    DEFAULT_IDENTITY_TIMEOUT, HttpIdentityResolver, IdentityClientBuildError, VALIDATE_PATH,
};
