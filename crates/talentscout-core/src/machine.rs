//! The screening stage machine.
//!
//! [`StageMachine::advance`] is a pure transition `(Session, utterance) →
//! (Session, Outcome)`. Before any stage-specific handling two global checks
//! run, in order:
//!
//! 1. An exit keyword (`exit`, `bye`, `quit`) ends the conversation.
//! 2. An utterance containing `?` is an interjection for the question
//!    answering collaborator.
//!
//! Neither check touches the session. Otherwise the current stage's handler,
//! picked by an exhaustive match, captures data and moves the stage forward.
//!
//! | Stage | Captures | Next |
//! |-------|----------|------|
//! | greeting | nothing | name |
//! | name | raw name | email |
//! | email | masked email (re-prompts if invalid) | phone |
//! | phone | masked phone (re-prompts if invalid) | experience |
//! | experience | raw | position |
//! | position | raw | location |
//! | location | raw | tech |
//! | tech | raw, generates questions | qa |
//! | qa | score per answer | qa / done |
//! | done | nothing | done |

use tracing::{debug, info};

use crate::config::ScreeningConfig;
use crate::masking::{mask_email, mask_phone};
use crate::questions::generate_questions;
use crate::session::{Field, Session, Stage};
use crate::validators::{valid_email, valid_phone};

/// Words that end the conversation at any stage.
pub const EXIT_KEYWORDS: [&str; 3] = ["exit", "bye", "quit"];

/// Fixed reply texts, in the working language.
pub mod replies {
    pub const FAREWELL: &str = "🙏 Thank you for your time. We will contact you soon.";
    pub const GREETING: &str = "Hello 👋 Welcome to TalentScout!\nWhat is your full name?";
    pub const ASK_EMAIL: &str = "Enter your email address:";
    pub const INVALID_EMAIL: &str = "Invalid email. Try again:";
    pub const ASK_PHONE: &str = "Enter your phone number:";
    pub const INVALID_PHONE: &str = "Invalid phone number. Try again:";
    pub const ASK_EXPERIENCE: &str = "Years of experience?";
    pub const ASK_POSITION: &str = "Desired position?";
    pub const ASK_LOCATION: &str = "Current location?";
    pub const ASK_TECH: &str = "Enter your tech stack (comma separated):";
    pub const ACKNOWLEDGE: &str = "Thank you 🙏 You may ask any further questions.";
}

/// Prefix put in front of an interjection before it reaches the model.
pub const ANSWER_PROMPT_PREFIX: &str = "Answer this question clearly: ";

/// What the caller should do after a turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show this reply. The session may have moved on.
    Reply(String),

    /// Forward `prompt` to the question answering collaborator and show its
    /// answer. The session is unchanged.
    Interjection { prompt: String },

    /// Show this reply and accept no further turns. The session is unchanged.
    Farewell(String),

    /// Blank input. Nothing to show, session unchanged.
    ///
    /// Whitespace-only input counts as blank, so a run of spaces is never
    /// stored as a name or scored as an answer.
    Ignored,
}

impl Outcome {
    /// The reply text, when the machine produced one itself.
    pub fn reply(&self) -> Option<&str> {
        match self {
            Outcome::Reply(text) | Outcome::Farewell(text) => Some(text),
            Outcome::Interjection { .. } | Outcome::Ignored => None,
        }
    }

    pub fn is_farewell(&self) -> bool {
        matches!(self, Outcome::Farewell(_))
    }
}

/// Check for an exit keyword, ignoring case and surrounding whitespace.
pub fn is_exit_keyword(utterance: &str) -> bool {
    let normalized = utterance.trim().to_lowercase();
    EXIT_KEYWORDS.contains(&normalized.as_str())
}

/// Build the question answering prompt for an interjection.
pub fn answer_prompt(question: &str) -> String {
    format!("{}{}", ANSWER_PROMPT_PREFIX, question)
}

type Handler = fn(&StageMachine, &mut Session, &str) -> String;

/// Drives a [`Session`] through the screening flow.
#[derive(Debug, Clone, Default)]
pub struct StageMachine {
    config: ScreeningConfig,
}

impl StageMachine {
    pub fn new(config: ScreeningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScreeningConfig {
        &self.config
    }

    /// Process one utterance in the working language.
    pub fn advance(&self, mut session: Session, utterance: &str) -> (Session, Outcome) {
        if utterance.trim().is_empty() {
            return (session, Outcome::Ignored);
        }

        if is_exit_keyword(utterance) {
            info!(stage = %session.stage, "Candidate ended the conversation");
            return (session, Outcome::Farewell(replies::FAREWELL.to_string()));
        }

        if utterance.contains('?') {
            debug!(stage = %session.stage, "Interjection routed to question answering");
            return (
                session,
                Outcome::Interjection {
                    prompt: answer_prompt(utterance),
                },
            );
        }

        let from = session.stage;
        let reply = Self::handler(from)(self, &mut session, utterance);
        debug!(from = %from, to = %session.stage, "Stage transition");

        (session, Outcome::Reply(reply))
    }

    /// Dispatch table from stage to handler.
    fn handler(stage: Stage) -> Handler {
        match stage {
            Stage::Greeting => Self::on_greeting,
            Stage::Name => Self::on_name,
            Stage::Email => Self::on_email,
            Stage::Phone => Self::on_phone,
            Stage::Experience => Self::on_experience,
            Stage::Position => Self::on_position,
            Stage::Location => Self::on_location,
            Stage::Tech => Self::on_tech,
            Stage::Qa => Self::on_answer,
            Stage::Done => Self::on_done,
        }
    }

    fn on_greeting(&self, session: &mut Session, _utterance: &str) -> String {
        session.stage = Stage::Name;
        replies::GREETING.to_string()
    }

    fn on_name(&self, session: &mut Session, utterance: &str) -> String {
        capture(session, utterance);
        replies::ASK_EMAIL.to_string()
    }

    fn on_email(&self, session: &mut Session, utterance: &str) -> String {
        let email = utterance.trim();
        if !valid_email(email) {
            debug!("Rejected email address");
            return replies::INVALID_EMAIL.to_string();
        }

        capture(session, mask_email(email));
        replies::ASK_PHONE.to_string()
    }

    fn on_phone(&self, session: &mut Session, utterance: &str) -> String {
        let phone = utterance.trim();
        if !valid_phone(phone) {
            debug!("Rejected phone number");
            return replies::INVALID_PHONE.to_string();
        }

        capture(session, mask_phone(phone));
        replies::ASK_EXPERIENCE.to_string()
    }

    fn on_experience(&self, session: &mut Session, utterance: &str) -> String {
        capture(session, utterance);
        replies::ASK_POSITION.to_string()
    }

    fn on_position(&self, session: &mut Session, utterance: &str) -> String {
        capture(session, utterance);
        replies::ASK_LOCATION.to_string()
    }

    fn on_location(&self, session: &mut Session, utterance: &str) -> String {
        capture(session, utterance);

        let candidate = &session.candidate;
        format!(
            "Details captured:\nEmail: {}\nPhone: {}\n\n{}",
            candidate.get(Field::Email).unwrap_or_default(),
            candidate.get(Field::Phone).unwrap_or_default(),
            replies::ASK_TECH
        )
    }

    fn on_tech(&self, session: &mut Session, utterance: &str) -> String {
        capture(session, utterance);
        session.questions = generate_questions(utterance);
        session.question_index = 0;
        info!(questions = session.questions.len(), "Interview questions generated");

        match session.questions.first() {
            Some(first) => first.clone(),
            None => self.complete(session),
        }
    }

    fn on_answer(&self, session: &mut Session, _utterance: &str) -> String {
        session.score = session.score.saturating_add(self.config.points_per_answer);
        session.question_index += 1;

        match session.questions.get(session.question_index) {
            Some(next) => next.clone(),
            None => self.complete(session),
        }
    }

    fn on_done(&self, _session: &mut Session, _utterance: &str) -> String {
        replies::ACKNOWLEDGE.to_string()
    }

    fn complete(&self, session: &mut Session) -> String {
        session.stage = Stage::Done;
        info!(score = session.score, "Interview completed");

        format!(
            "🎉 Interview completed!\nFinal Score: {}/{}\n\nThank you for applying. You may ask any question now.",
            session.score,
            self.config.max_score(session.questions.len())
        )
    }
}

/// Store the field the current stage captures and move to the next stage.
fn capture(session: &mut Session, value: impl Into<String>) {
    if let Some(field) = session.stage.captures() {
        session.candidate.record(field, value);
    }
    session.stage = session.stage.next();
}
