//! Built-in practice sentences grouped by difficulty and topic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    #[default]
    Daily,
    Business,
    Travel,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Daily, Category::Business, Category::Travel];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Business => "business",
            Self::Travel => "travel",
        }
    }
}

impl FromStr for Level {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| ScoringError::invalid_input(format!("unknown practice level '{s}'")))
    }
}

impl FromStr for Category {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| {
                ScoringError::invalid_input(format!("unknown practice category '{s}'"))
            })
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub fn practice_sentences(level: Level, category: Category) -> &'static [&'static str] {
    match (level, category) {
        (Level::Beginner, Category::Daily) => &[
            "Hello, how are you?",
            "Nice to meet you",
            "What's your name?",
            "I am fine, thank you",
        ],
        (Level::Beginner, Category::Business) => &[
            "Good morning",
            "Thank you for your time",
            "Please send me the file",
            "Let's have a meeting",
        ],
        (Level::Beginner, Category::Travel) => &[
            "Where is the hotel?",
            "How much is this?",
            "I need help please",
            "Thank you very much",
        ],
        (Level::Intermediate, Category::Daily) => &[
            "What's the weather like today?",
            "I'd like a cup of coffee please",
            "Could you help me with this?",
            "That sounds like a great idea",
        ],
        (Level::Intermediate, Category::Business) => &[
            "Could you send me the report?",
            "Let's schedule a meeting next week",
            "I'll get back to you soon",
            "What's your opinion on this?",
        ],
        (Level::Intermediate, Category::Travel) => &[
            "How do I get to the airport?",
            "I'd like to make a reservation",
            "Is there a pharmacy nearby?",
            "What time does it close?",
        ],
        (Level::Advanced, Category::Daily) => &[
            "I've been thinking about trying that new restaurant",
            "It's been quite challenging to manage everything lately",
            "The presentation went better than I expected",
            "I appreciate your understanding in this matter",
        ],
        (Level::Advanced, Category::Business) => &[
            "We need to reassess our strategy moving forward",
            "I'd like to discuss the quarterly projections",
            "Could you elaborate on your proposal?",
            "Let's align our objectives for the next quarter",
        ],
        (Level::Advanced, Category::Travel) => &[
            "I'd like to extend my reservation for two more nights",
            "Could you recommend any local attractions?",
            "Is there a shuttle service to the city center?",
            "What's the best way to get around the city?",
        ],
    }
}
