//! Collaborator traits and common types.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;
use talentscout_core::Language;
use thiserror::Error;

use crate::providers::ProviderError;

/// Which collaborator a call went to. Circuits are tracked per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollaboratorKind {
    Translation,
    QuestionAnswering,
}

impl fmt::Display for CollaboratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollaboratorKind::Translation => write!(f, "translation"),
            CollaboratorKind::QuestionAnswering => write!(f, "question_answering"),
        }
    }
}

/// Errors from collaborators. Every variant ends the turn with the apology.
#[derive(Error, Debug, Clone)]
pub enum CollaboratorError {
    #[error("{0} collaborator unavailable")]
    Unavailable(CollaboratorKind),

    #[error("{kind} collaborator timed out after {timeout:?}")]
    Timeout {
        kind: CollaboratorKind,
        timeout: Duration,
    },

    #[error("{0} circuit is open")]
    CircuitOpen(CollaboratorKind),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Converts text between languages.
///
/// Implementations may be lossy. Callers never pass `source == target`
/// expecting a model call; [`crate::ModelTranslator`] short-circuits it.
#[async_trait]
pub trait Translator: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
    ) -> Result<String, CollaboratorError>;
}

/// Answers a free-form prompt.
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    async fn answer(&self, prompt: &str) -> Result<String, CollaboratorError>;
}
