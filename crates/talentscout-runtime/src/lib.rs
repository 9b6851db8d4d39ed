//! # talentscout-runtime
//!
//! Optional model-backed collaborators for TalentScout.
//!
//! The screening flow in `talentscout-core` is deterministic and never calls
//! a model. This crate adds what the core leaves out:
//! - Translation of candidate input and bot replies (Tamil, Hindi)
//! - Answers to questions the candidate asks mid-interview
//! - Circuit breaker, retry and timeout around every model call
//!
//! Without a configured provider the runtime still serves English
//! conversations; interjected questions get an apology.
//!
//! ## Example
//!
//! ```rust,ignore
//! use talentscout_runtime::{ProviderRegistry, RuntimeConfig, ScreeningRuntime};
//! use talentscout_core::{Language, ScreeningConfig};
//!
//! let runtime = ScreeningRuntime::from_config(
//!     RuntimeConfig::from_yaml("provider:\n  type: huggingface\n")?,
//!     ScreeningConfig::default(),
//!     &ProviderRegistry::with_defaults(),
//! )?;
//!
//! let mut conversation = runtime.start("candidate-1", Language::Tamil)?;
//! let response = runtime.handle_turn(&mut conversation, "வணக்கம்").await?;
//! println!("{}", response.reply);
//! ```

use thiserror::Error;

pub mod cache;
pub mod collaborators;
pub mod config;
pub mod conversation;
pub mod providers;
pub mod registry;
pub mod resilience;

pub use cache::{TranslationCache, TranslationKey};
pub use collaborators::{
    CollaboratorError, CollaboratorKind, ModelAnswerer, ModelTranslator, QuestionAnswerer,
    Translator,
};
pub use config::{ProviderSettings, QuestionAnsweringConfig, RuntimeConfig, TranslationConfig};
pub use conversation::{Conversation, ScreeningRuntime, ScreeningRuntimeBuilder, APOLOGY};
pub use providers::{
    InferenceProvider, ProviderError, ProviderFactory, ProviderRegistry, HF_API_TOKEN_ENV,
};
pub use registry::ConversationRegistry;
pub use resilience::{CircuitBreaker, CircuitBreakerConfig, FallbackStrategy, RetryPolicy};

/// Errors from the runtime.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("Conversation '{0}' has ended")]
    ConversationEnded(String),

    #[error("Unknown conversation '{0}'")]
    UnknownConversation(String),

    #[error("Conversation '{0}' already exists")]
    DuplicateConversation(String),

    #[error("Provider not configured: {0}")]
    ProviderNotConfigured(String),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Invalid runtime config: {0}")]
    Config(String),

    #[error("Runtime config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}
