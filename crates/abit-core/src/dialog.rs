//! The three-question recommendation dialog as a value-level state machine.
//!
//! `Done` and `Cancelled` are not states: finishing or cancelling removes the
//! session from whatever map the caller keeps.

use crate::recommend::{classify, Recommendation};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogState {
    AwaitingBackground,
    AwaitingInterests {
        background: String,
    },
    AwaitingCareer {
        background: String,
        interests: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogAnswers {
    pub background: String,
    pub interests: String,
    pub career: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogStep {
    /// Store this state and ask the next question
    Continue(DialogState),
    /// All three answers collected
    Done {
        answers: DialogAnswers,
        recommendation: Recommendation,
    },
}

impl DialogState {
    pub fn start() -> Self {
        DialogState::AwaitingBackground
    }

    /// Consume one free-text answer.
    pub fn advance(self, answer: &str) -> DialogStep {
        let answer = answer.trim().to_string();
        match self {
            DialogState::AwaitingBackground => {
                DialogStep::Continue(DialogState::AwaitingInterests { background: answer })
            }
            DialogState::AwaitingInterests { background } => {
                DialogStep::Continue(DialogState::AwaitingCareer {
                    background,
                    interests: answer,
                })
            }
            DialogState::AwaitingCareer {
                background,
                interests,
            } => {
                let recommendation = classify(&background, &interests, &answer);
                DialogStep::Done {
                    answers: DialogAnswers {
                        background,
                        interests,
                        career: answer,
                    },
                    recommendation,
                }
            }
        }
    }
}
