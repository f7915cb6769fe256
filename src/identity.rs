use std::fmt;
use std::str::FromStr;

use crate::error::AppError;

/// A player's display identity, `game_name#tag_line`.
///
/// The tag line is case-folded so a player typed with different casing maps to the same key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RiotId {
    pub game_name: String,
    pub tag_line: String,
}

impl RiotId {
    /// Split on the first `#`; both halves must be non-empty once trimmed.
    pub fn parse(input: &str) -> Result<Self, AppError> {
        let invalid = || {
            AppError::InvalidInput(format!(
                "`{}` is not a valid Riot ID, expected `Name#Tag`",
                input.trim()
            ))
        };

        let (game_name, tag_line) = input.split_once('#').ok_or_else(invalid)?;
        let game_name = game_name.trim();
        let tag_line = tag_line.trim();

        if game_name.is_empty() || tag_line.is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            game_name: game_name.to_string(),
            tag_line: tag_line.to_lowercase(),
        })
    }

    /// Document key of the tracked identity.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl FromStr for RiotId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RiotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.game_name, self.tag_line)
    }
}
