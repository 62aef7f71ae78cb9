//! Zonn identity registry
//!
//! Maps caller-controlled wallet addresses to durable profiles. A profile is
//! created by its primary address, which alone may later link additional
//! wallets or update the username and metadata URI. Every address resolves to
//! at most one profile.
//!
//! The registry consumes an [`ExecutionContext`] for the authenticated caller
//! and the current time, and persists through any [`zonn_storage::Storage`]
//! backend.

pub mod context;
pub mod errors;
pub mod events;
pub mod genesis;
pub mod msg;
pub mod query;
pub mod registry;

pub use context::{ExecutionContext, TxContext};
pub use errors::*;
pub use events::IdentityEvent;
pub use msg::{IdentityMsg, MsgResponse};
pub use query::*;
pub use registry::IdentityRegistry;
