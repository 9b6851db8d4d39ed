//! Translation and question-answering collaborators.
//!
//! The stage machine never calls a model. The conversation driver calls
//! these traits around it: translate the utterance in, translate the reply
//! out, answer interjected questions.

mod model;
mod traits;

pub use model::{ModelAnswerer, ModelTranslator, DEFAULT_QA_MODEL, DEFAULT_TRANSLATION_PATTERN};
pub use traits::{CollaboratorError, CollaboratorKind, QuestionAnswerer, Translator};
