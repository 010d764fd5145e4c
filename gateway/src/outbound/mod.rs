//! Outbound adapters implementing domain ports for external services.
//!
//! - **identity**: reqwest client for the identity service's validation
//!   endpoint.
//! - **rpc**: tonic client for the semantic backend.
//!
//! Adapters translate between wire and domain representations. They contain
//! no authorization logic.

pub mod identity;
pub mod rpc;
