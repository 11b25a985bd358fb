// Public API - what other modules can use
pub use handlers::list_modes;

pub mod handlers;

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{EnumIter, EnumString};
use thiserror::Error;

/// A variant of the typing game, identified by the stable code the
/// client sends along with each finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
pub enum GameMode {
    #[strum(serialize = "eng_dict")]
    EnglishDictionary,
    #[strum(serialize = "rand_alpha")]
    RandomAlphanumeric,
    #[strum(serialize = "rand_alpha_punc")]
    RandomAlphanumericPunctuation,
    #[strum(serialize = "paragraph")]
    Paragraph,
}

/// Error returned when a mode code does not resolve. There is no
/// fallback mode: an unrecognized code must be surfaced to the caller.
#[derive(Debug, Error, PartialEq)]
#[error("Unknown game mode: {0}")]
pub struct UnknownMode(pub String);

impl GameMode {
    /// Parses a mode code sent by the client.
    pub fn from_code(code: &str) -> Result<Self, UnknownMode> {
        Self::from_str(code).map_err(|_| UnknownMode(code.to_string()))
    }

    /// The stable code used in requests and persisted score rows.
    pub fn code(&self) -> &'static str {
        match self {
            GameMode::EnglishDictionary => "eng_dict",
            GameMode::RandomAlphanumeric => "rand_alpha",
            GameMode::RandomAlphanumericPunctuation => "rand_alpha_punc",
            GameMode::Paragraph => "paragraph",
        }
    }

    /// Human-readable name shown in mode dropdowns and leaderboards.
    pub fn display_name(&self) -> &'static str {
        match self {
            GameMode::EnglishDictionary => "English Dictionary",
            GameMode::RandomAlphanumeric => "Random Alphanumeric",
            GameMode::RandomAlphanumericPunctuation => "Random Alphanumeric + Punctuation",
            GameMode::Paragraph => "Paragraph",
        }
    }

    /// Script the browser loads to render this mode.
    pub fn client_script(&self) -> &'static str {
        "/static/js/textgame.js"
    }

    /// URL the client navigates to in order to play this mode.
    pub fn play_url(&self) -> String {
        format!("/game?game_mode={}", self.code())
    }
}

/// Wire representation of a mode, served to the client's mode dropdown.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameModeInfo {
    pub code: String,
    pub name: String,
    pub script: String,
    pub play_url: String,
}

impl From<GameMode> for GameModeInfo {
    fn from(mode: GameMode) -> Self {
        Self {
            code: mode.code().to_string(),
            name: mode.display_name().to_string(),
            script: mode.client_script().to_string(),
            play_url: mode.play_url(),
        }
    }
}
