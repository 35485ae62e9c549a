//! # ScopeDesk Core
//!
//! Domain types and traits for the ScopeDesk role-scoped question panel.
//! This crate has **no I/O** — it defines the model the other crates build on:
//!
//! - [`identity`]: who the operator is acting as, and which slice they may see
//! - [`dataset`] / [`scope`]: the student table and the row-level access filter
//! - [`message`]: the conversation transcript
//! - [`provider`]: the seam to the hosted language model
//! - [`session`]: per-session state passed explicitly into every operation

pub mod credential;
pub mod dataset;
pub mod error;
pub mod identity;
pub mod message;
pub mod provider;
pub mod scope;
pub mod session;

// Re-export key types at crate root for ergonomics
pub use credential::Credential;
pub use dataset::{Dataset, Grade, Row, ScopedView};
pub use error::{DataError, ProviderError, ScopeError};
pub use identity::{IdentityDirectory, Scope, StaticDirectory, UserRecord};
pub use message::{ChatTurn, Role, Transcript};
pub use provider::{Provider, ProviderRequest, ProviderResponse};
pub use scope::filter;
pub use session::Session;
