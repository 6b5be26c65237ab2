use thiserror::Error;

use crate::catalog::{ActionName, Resource};
use crate::format::FormatError;

/// Why a turn ended without the data the caller asked for. Every variant maps
/// to exactly one user-facing sentence.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("{action} requires a logged-in caller")]
    AuthenticationMissing { action: ActionName, user_message: &'static str },
    #[error("{action} denied for role {role:?}")]
    AuthorizationDenied {
        action: ActionName,
        role: Option<String>,
        user_message: &'static str,
    },
    #[error("backend unavailable for {resource}: {detail}")]
    BackendUnavailable { resource: Resource, detail: String },
    #[error("malformed input for {action}")]
    MalformedInput { action: ActionName, prompt: &'static str },
    #[error("could not format {resource}: {source}")]
    Formatting { resource: Resource, source: FormatError },
}

impl ActionError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::AuthenticationMissing { user_message, .. }
            | Self::AuthorizationDenied { user_message, .. } => *user_message,
            Self::BackendUnavailable { resource, .. } => resource.unavailable_message(),
            Self::MalformedInput { prompt, .. } => *prompt,
            Self::Formatting { resource, .. } => resource.formatting_message(),
        }
    }

    /// Stable label for logs and metrics.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::AuthenticationMissing { .. } => "authentication_missing",
            Self::AuthorizationDenied { .. } => "authorization_denied",
            Self::BackendUnavailable { .. } => "backend_unavailable",
            Self::MalformedInput { .. } => "malformed_input",
            Self::Formatting { .. } => "formatting",
        }
    }
}
