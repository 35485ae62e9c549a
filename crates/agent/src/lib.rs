//! Question answering over a scoped view — the heart of ScopeDesk.
//!
//! A question flows through two layers:
//!
//! 1. **Panel** checks the caller-side preconditions (a credential is set,
//!    the active identity's view is non-empty) and keeps the transcript.
//! 2. **QueryBridge** packages the scoped rows, the prior turns and the new
//!    question into one provider request and returns the answer text. Any
//!    provider failure becomes a fixed apology.
//!
//! Neither layer ever sees the unfiltered dataset: the bridge only accepts a
//! [`ScopedView`](scopedesk_core::ScopedView).

pub mod bridge;
pub mod panel;
pub mod prompt;

pub use bridge::{QueryBridge, FALLBACK_MESSAGE};
pub use panel::{Panel, Refusal, Reply, Selection};
