//! Notification titles → playback commands.
//!
//! Phrases arrive as (title, body) notifications; the title is the verb and
//! the body the free text to resolve.

use crate::playback::VOLUME_STEP;

/// Titles that all mean "play <body>".
pub const PLAY_TITLES: &[&str] = &[
    "play",
    "play music",
    "play all music",
    "play all",
    "play all songs",
    "play songs",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Pause,
    /// Relative volume change.
    Volume(i32),
    /// Free-text phrase, trimmed. Empty means "just play something".
    Play(String),
}

impl Command {
    /// Map a notification to a command. `None` for unrecognized titles.
    pub fn parse(title: &str, body: Option<&str>) -> Option<Self> {
        let title = title.trim();
        let command = match title {
            "next" => Command::Next,
            "pause" => Command::Pause,
            "louder" => Command::Volume(VOLUME_STEP),
            "quieter" => Command::Volume(-VOLUME_STEP),
            t if PLAY_TITLES.contains(&t) => Command::Play(body.unwrap_or("").trim().to_string()),
            _ => return None,
        };
        Some(command)
    }
}
