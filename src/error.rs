use thiserror::Error;

use crate::db::StoreError;
use crate::riot::RiotError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("Player not found: {game_name}#{tag_line}")]
    IdentityNotFound { game_name: String, tag_line: String },

    #[error("Player not tracked in this server")]
    PlayerNotTracked,

    #[error("Riot API error: {0}")]
    Riot(#[from] RiotError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Discord error: {0}")]
    Discord(Box<serenity::Error>),
}

impl From<serenity::Error> for AppError {
    fn from(err: serenity::Error) -> Self {
        AppError::Discord(Box::new(err))
    }
}

impl AppError {
    /// The request itself was wrong; nothing failed on our side.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            AppError::InvalidInput(_)
                | AppError::IdentityNotFound { .. }
                | AppError::PlayerNotTracked
                | AppError::Riot(RiotError::IdentityNotFound(_))
        )
    }

    /// Text shown to the user who ran the command.
    pub fn user_message(&self) -> String {
        match self {
            AppError::InvalidInput(msg) => msg.clone(),
            AppError::IdentityNotFound {
                game_name,
                tag_line,
            } => format!("Could not find a player named **{game_name}#{tag_line}**."),
            AppError::PlayerNotTracked => "This player is not tracked in this server.".into(),
            AppError::Riot(RiotError::IdentityNotFound(_)) => {
                "Riot does not know this player.".into()
            }
            AppError::Riot(e) if e.is_auth() => {
                "The bot's Riot API key was rejected. Please tell the bot operator.".into()
            }
            AppError::Riot(RiotError::RateLimited { .. }) => {
                "The Riot API is busy right now, please try again later.".into()
            }
            AppError::Riot(e) if e.is_transient() => {
                "The Riot API is unavailable right now, please try again later.".into()
            }
            AppError::Riot(_) => "The Riot API sent data the bot could not read.".into(),
            AppError::Store(StoreError::WriteFailed(_)) => {
                "Could not save that change, the request was not saved.".into()
            }
            AppError::Store(_) => "Could not read the bot's data, please try again later.".into(),
            AppError::Config(_) | AppError::Discord(_) => {
                "Something went wrong on our side.".into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use reqwest::StatusCode;

    use super::*;

    #[test]
    fn invalid_input_is_shown_verbatim() {
        let err = AppError::InvalidInput("bad id".into());
        assert_eq!(err.user_message(), "bad id");
    }

    #[test]
    fn upstream_failures_are_transient() {
        let rate_limited = AppError::from(RiotError::RateLimited { attempts: 3 });
        let status = AppError::from(RiotError::Status(StatusCode::BAD_GATEWAY));

        assert!(rate_limited.user_message().contains("try again later"));
        assert!(status.user_message().contains("try again later"));
    }

    #[test]
    fn credential_failure_points_at_operator() {
        let err = AppError::from(RiotError::Auth(StatusCode::FORBIDDEN));
        assert!(err.user_message().contains("operator"));
    }

    #[test]
    fn only_bad_requests_are_rejections() {
        assert!(AppError::PlayerNotTracked.is_rejection());
        assert!(AppError::from(RiotError::IdentityNotFound("x#y".into())).is_rejection());
        assert!(!AppError::from(RiotError::Auth(StatusCode::FORBIDDEN)).is_rejection());
        assert!(!AppError::Config("boom".into()).is_rejection());
    }

    #[test]
    fn write_failure_says_not_saved() {
        let err = AppError::from(StoreError::WriteFailed(io::Error::other("down").into()));
        assert!(err.user_message().contains("not saved"));
    }
}
