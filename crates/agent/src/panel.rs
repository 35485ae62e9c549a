//! The panel — identity selection and guarded question answering.
//!
//! `Panel` owns the read-only inputs (directory, full dataset, bridge).
//! Everything that changes lives in the [`Session`] passed to each call.

use crate::bridge::QueryBridge;
use scopedesk_core::dataset::{Dataset, ScopedView};
use scopedesk_core::error::ScopeError;
use scopedesk_core::identity::{IdentityDirectory, Scope, UserRecord};
use scopedesk_core::message::ChatTurn;
use scopedesk_core::scope::filter;
use scopedesk_core::session::Session;
use std::sync::Arc;
use tracing::{info, warn};

/// Why a question was not sent to the reasoning service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Refusal {
    #[error("Please provide an API key (--api-key, SCOPEDESK_API_KEY, or /key <secret>) to chat.")]
    MissingCredential,

    #[error("No data available for your scope ({}). Cannot answer questions.", describe(.scope))]
    EmptyScope { scope: Option<Scope> },
}

fn describe(scope: &Option<Scope>) -> String {
    match scope {
        Some(scope) => scope.to_string(),
        None => "no identity selected".into(),
    }
}

/// Outcome of [`Panel::ask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Answered(String),
    Refused(Refusal),
}

/// Outcome of [`Panel::select`].
#[derive(Debug, Clone)]
pub struct Selection {
    /// The resolved identity, if the name was known
    pub user: Option<UserRecord>,

    /// Whether the transcript was cleared
    pub reset: bool,

    /// Rows visible to the identity
    pub visible_rows: usize,

    /// Set when the dataset could not be filtered for this scope
    pub scope_error: Option<ScopeError>,
}

impl Selection {
    /// The notice shown after a reset, e.g. "Chat reset. You are now logged in as ...".
    pub fn notice(&self) -> Option<String> {
        if !self.reset {
            return None;
        }
        Some(match &self.user {
            Some(user) => format!("Chat reset. You are now logged in as {}.", user.display_name),
            None => "Chat reset. No identity is selected.".to_string(),
        })
    }
}

pub struct Panel {
    directory: Arc<dyn IdentityDirectory>,
    dataset: Dataset,
    bridge: QueryBridge,
}

impl Panel {
    pub fn new(directory: Arc<dyn IdentityDirectory>, dataset: Dataset, bridge: QueryBridge) -> Self {
        Self {
            directory,
            dataset,
            bridge,
        }
    }

    pub fn directory(&self) -> &dyn IdentityDirectory {
        self.directory.as_ref()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn bridge(&self) -> &QueryBridge {
        &self.bridge
    }

    /// Compute the view for `user`, degrading a data-quality failure to the
    /// empty view.
    fn scoped_view(&self, user: Option<&UserRecord>) -> (ScopedView, Option<ScopeError>) {
        match filter(&self.dataset, user) {
            Ok(view) => (view, None),
            Err(e) => {
                warn!(error = %e, "Dataset could not be filtered for scope, showing no data");
                (ScopedView::empty(), Some(e))
            }
        }
    }

    /// Act as the identity named `name`.
    ///
    /// Unknown names select nobody, which sees nothing.
    pub fn select(&self, session: &mut Session, name: &str) -> Selection {
        let user = self.directory.resolve(name);
        if user.is_none() {
            warn!(name = %name, "Unknown identity selected");
        }

        let (view, scope_error) = self.scoped_view(user.as_ref());
        let visible_rows = view.len();
        let reset = session.activate(user.clone(), view);

        if let Some(user) = &user {
            info!(user = %user.identifier, scope = %user.scope, visible_rows, "Identity selected");
        }

        Selection {
            user,
            reset,
            visible_rows,
            scope_error,
        }
    }

    /// Select the directory's first identity.
    pub fn select_default(&self, session: &mut Session) -> Selection {
        let name = self.directory.default_name().unwrap_or_default();
        self.select(session, &name)
    }

    /// Answer `question` for the session's active identity.
    ///
    /// Refusals leave the transcript untouched and never reach the provider.
    pub async fn ask(&self, session: &mut Session, question: &str) -> Reply {
        let Some(credential) = session.credential().cloned() else {
            return Reply::Refused(Refusal::MissingCredential);
        };

        if session.view().is_empty() {
            let scope = session.active().map(|u| u.scope.clone());
            info!(scope = %describe(&scope), "Question refused, scope has no data");
            return Reply::Refused(Refusal::EmptyScope { scope });
        }

        let history: Vec<ChatTurn> = session.transcript().turns().to_vec();
        session.record(ChatTurn::user(question));

        let answer = self
            .bridge
            .answer(&credential, session.view(), &history, question)
            .await;

        session.record(ChatTurn::assistant(answer.clone()));
        Reply::Answered(answer)
    }
}
