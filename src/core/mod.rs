//! Core match types: board geometry, actions, players, match state, RNG,
//! configuration.
//!
//! Nothing here knows about card powers; the `rules` module interprets
//! these types.

pub mod direction;
pub mod board;
pub mod action;
pub mod player;
pub mod game;
pub mod rng;
pub mod config;

pub use direction::Direction;
pub use board::{Board, Cell, OffBoardPosition, Position, BOARD_SIZE, MAX_FLOORS};
pub use action::{Action, ActionHistory, ActionKind, ActionRecord, LegalActionSet};
pub use player::{Color, Genre, Player, PlayerId, Worker};
pub use game::Game;
pub use rng::GameRng;
pub use config::MatchConfig;
