//! # talentscout-core
//!
//! Deterministic candidate screening engine.
//!
//! This crate walks a candidate through a fixed script (name, email, phone,
//! experience, position, location, tech stack), validates and masks contact
//! details, generates interview questions from the tech stack and keeps a
//! running score.
//!
//! ## Key Guarantees
//!
//! 1. **Pure transitions**: [`StageMachine::advance`] takes a [`Session`] by
//!    value and returns the next one; nothing else holds session state
//! 2. **No model calls**: translation and question answering are left to the
//!    caller (see `talentscout-runtime`)
//! 3. **Forward only**: stages never move backwards; only email and phone
//!    re-prompt on invalid input
//! 4. **Masked at rest**: raw email and phone are never stored
//!
//! ## Example
//!
//! ```rust
//! use talentscout_core::{Outcome, Session, Stage, StageMachine};
//!
//! let machine = StageMachine::default();
//! let (session, outcome) = machine.advance(Session::new(), "hi");
//! assert_eq!(session.stage(), Stage::Name);
//!
//! match outcome {
//!     Outcome::Reply(text) => println!("{}", text),
//!     Outcome::Interjection { prompt } => println!("ask a model: {}", prompt),
//!     Outcome::Farewell(text) => println!("{}", text),
//!     Outcome::Ignored => {}
//! }
//! ```

pub mod config;
pub mod language;
pub mod machine;
pub mod masking;
pub mod questions;
pub mod session;
pub mod transcript;
pub mod types;
pub mod validators;

// Re-export main types at crate root
pub use config::{ConfigError, ScreeningConfig};
pub use language::{Language, UnsupportedLanguage};
pub use machine::{answer_prompt, is_exit_keyword, replies, Outcome, StageMachine, EXIT_KEYWORDS};
pub use masking::{mask_email, mask_phone};
pub use questions::{generate_questions, QUESTIONS_PER_TECH};
pub use session::{Candidate, Field, Session, Stage};
pub use transcript::{Role, Transcript, TranscriptEntry};
pub use types::{TurnRequest, TurnResponse};
pub use validators::{valid_email, valid_phone};
