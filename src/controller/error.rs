//! Controller error types.

use thiserror::Error;

use crate::rules::RulesError;

/// Reasons a match stops without a winner, or a handle call fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// A player still in the match disconnected while a phase was blocked.
    #[error("match aborted: {} disconnected", nickname.as_deref().unwrap_or("a player"))]
    MatchAborted { nickname: Option<String> },

    /// The controller task is gone, or every handle was dropped.
    #[error("controller channel closed")]
    ChannelClosed,

    /// An accepted action could not be applied.
    #[error(transparent)]
    Rules(#[from] RulesError),

    /// The catalog cannot supply one card per player.
    #[error("{needed} cards needed, only {available} playable")]
    NotEnoughCards { needed: usize, available: usize },

    /// Nobody is left to take a turn.
    #[error("no player can take the turn")]
    NoActivePlayer,
}
