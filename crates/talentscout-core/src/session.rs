//! Session state for a single screening conversation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Position in the scripted screening flow.
///
/// Variants are declared in flow order; `Ord` follows that order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Greeting,
    Name,
    Email,
    Phone,
    Experience,
    Position,
    Location,
    Tech,
    Qa,
    Done,
}

impl Stage {
    /// All stages in flow order.
    pub const ORDER: [Stage; 10] = [
        Stage::Greeting,
        Stage::Name,
        Stage::Email,
        Stage::Phone,
        Stage::Experience,
        Stage::Position,
        Stage::Location,
        Stage::Tech,
        Stage::Qa,
        Stage::Done,
    ];

    /// The stage that follows this one. `Done` is terminal.
    pub fn next(self) -> Stage {
        match self {
            Stage::Greeting => Stage::Name,
            Stage::Name => Stage::Email,
            Stage::Email => Stage::Phone,
            Stage::Phone => Stage::Experience,
            Stage::Experience => Stage::Position,
            Stage::Position => Stage::Location,
            Stage::Location => Stage::Tech,
            Stage::Tech => Stage::Qa,
            Stage::Qa => Stage::Done,
            Stage::Done => Stage::Done,
        }
    }

    /// The candidate field captured at this stage, if any.
    pub fn captures(self) -> Option<Field> {
        match self {
            Stage::Name => Some(Field::Name),
            Stage::Email => Some(Field::Email),
            Stage::Phone => Some(Field::Phone),
            Stage::Experience => Some(Field::Experience),
            Stage::Position => Some(Field::Position),
            Stage::Location => Some(Field::Location),
            Stage::Tech => Some(Field::Tech),
            Stage::Greeting | Stage::Qa | Stage::Done => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Greeting => "greeting",
            Stage::Name => "name",
            Stage::Email => "email",
            Stage::Phone => "phone",
            Stage::Experience => "experience",
            Stage::Position => "position",
            Stage::Location => "location",
            Stage::Tech => "tech",
            Stage::Qa => "qa",
            Stage::Done => "done",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A piece of candidate information collected during screening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Phone,
    Experience,
    Position,
    Location,
    Tech,
}

/// Candidate details captured so far.
///
/// Entries are only ever added. Email and phone hold their masked form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate {
    fields: BTreeMap<Field, String>,
}

impl Candidate {
    /// Record a field value. An existing value is kept.
    pub(crate) fn record(&mut self, field: Field, value: impl Into<String>) {
        self.fields.entry(field).or_insert_with(|| value.into());
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// State of one screening conversation.
///
/// A session is owned by exactly one conversation and only changed by
/// [`StageMachine::advance`](crate::StageMachine::advance).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) stage: Stage,
    pub(crate) candidate: Candidate,
    pub(crate) questions: Vec<String>,
    pub(crate) question_index: usize,
    pub(crate) score: u32,
}

impl Session {
    /// Start a fresh session at the greeting stage.
    pub fn new() -> Self {
        Self {
            stage: Stage::Greeting,
            candidate: Candidate::default(),
            questions: Vec::new(),
            question_index: 0,
            score: 0,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// The interview question awaiting an answer, if any.
    pub fn current_question(&self) -> Option<&str> {
        if self.stage == Stage::Qa {
            self.questions.get(self.question_index).map(String::as_str)
        } else {
            None
        }
    }

    pub fn is_done(&self) -> bool {
        self.stage == Stage::Done
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
