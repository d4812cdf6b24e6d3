//! A quote and a small idea to print under the plan.
//!
//! Randomness is always supplied by the caller so output is reproducible
//! under a seeded generator.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const QUOTES: &[&str] = &[
    "Small progress is still progress.",
    "Focus on the next right thing.",
    "Deep work > busy work.",
    "Discipline beats motivation.",
    "Your future self is watching.",
    "Consistency compounds.",
    "Start where you are, use what you have.",
    "You don’t need more time, you need fewer distractions.",
    "Sprints of focus, walks for clarity.",
    "Done is better than perfect.",
];

pub const IDEAS: &[&str] = &[
    "Tidy your desk for 5 minutes.",
    "Write a 3-bullet plan for this hour.",
    "Turn off notifications for 45 minutes.",
    "Review yesterday’s notes for 10 minutes.",
    "Do a 2-minute stretch.",
    "Drink a glass of water.",
    "Archive old tabs; keep only 3 open.",
    "Summarize a chapter in 5 sentences.",
    "Send one thank-you message.",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inspiration {
    pub quote: String,
    pub idea: String,
}

impl std::fmt::Display for Inspiration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "“{}”\nTry: {}", self.quote, self.idea)
    }
}

/// Pick one quote and one idea.
pub fn pick<R: Rng + ?Sized>(rng: &mut R) -> Inspiration {
    // Both tables are non-empty constants
    let quote = QUOTES.choose(rng).copied().unwrap_or_default();
    let idea = IDEAS.choose(rng).copied().unwrap_or_default();
    Inspiration {
        quote: quote.to_string(),
        idea: idea.to_string(),
    }
}
