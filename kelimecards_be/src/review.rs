//! Review state transitions.
//!
//! A review moves a card between `new`, `learning` and `learned` depending on
//! how well the word was recalled. `learned` is reached once the number of
//! correct repetitions meets the configured threshold, and a learned card
//! drops back to `learning` on any non-correct answer.

use crate::models::CardStatus;
use std::{fmt, str::FromStr};

/// Default number of correct repetitions needed for `learned`.
pub const DEFAULT_LEARNED_THRESHOLD: u32 = 3;

/// How well the user recalled a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Correct,
    Unsure,
    Incorrect,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownFeedback(pub String);

impl fmt::Display for UnknownFeedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid feedback {:?}, expected one of correct, unsure, incorrect",
            self.0
        )
    }
}

impl FromStr for Feedback {
    type Err = UnknownFeedback;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "correct" => Ok(Feedback::Correct),
            "unsure" => Ok(Feedback::Unsure),
            "incorrect" => Ok(Feedback::Incorrect),
            other => Err(UnknownFeedback(other.to_string())),
        }
    }
}

/// The part of a card a review reads and writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewState {
    pub correct_repetitions: u32,
    pub status: CardStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub state: ReviewState,
    /// Set only on the review that moved the card into `learned`.
    pub became_learned: bool,
}

pub fn apply_feedback(current: ReviewState, feedback: Feedback, threshold: u32) -> ReviewOutcome {
    let state = match feedback {
        Feedback::Correct => {
            let correct_repetitions = current.correct_repetitions.saturating_add(1);
            let status = if correct_repetitions >= threshold {
                CardStatus::Learned
            } else {
                CardStatus::Learning
            };
            ReviewState {
                correct_repetitions,
                status,
            }
        }
        Feedback::Unsure => ReviewState {
            correct_repetitions: current.correct_repetitions.saturating_sub(1),
            status: CardStatus::Learning,
        },
        Feedback::Incorrect => ReviewState {
            correct_repetitions: 0,
            status: CardStatus::Learning,
        },
    };

    ReviewOutcome {
        became_learned: current.status != CardStatus::Learned
            && state.status == CardStatus::Learned,
        state,
    }
}
