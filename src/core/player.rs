//! Players and their workers.
//!
//! ## PlayerId
//!
//! Index of a seated player in the game's turn order. Stable once the lobby
//! closes: players are never removed, only flagged as losers.
//!
//! ## Worker
//!
//! Workers store the `Position` they stand on rather than a cell reference;
//! `None` until placed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::action::ActionHistory;
use super::board::Position;
use crate::cards::CardKind;

/// Seat index in turn order (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Which of a player's two workers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Genre {
    Male,
    Female,
}

impl Genre {
    pub const BOTH: [Genre; 2] = [Genre::Male, Genre::Female];
}

/// Worker color chosen during placement.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    Blue,
    White,
    Beige,
}

/// One movable piece.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub genre: Genre,
    pub color: Option<Color>,
    pub position: Option<Position>,
}

impl Worker {
    #[must_use]
    pub fn new(genre: Genre) -> Self {
        Self {
            genre,
            color: None,
            position: None,
        }
    }
}

/// A seated player.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub nickname: String,
    pub birth_date: NaiveDate,
    workers: [Worker; 2],
    pub card: Option<CardKind>,
    /// Actions of this player's current or most recent round.
    pub history: ActionHistory,
    pub connected: bool,
    pub loser: bool,
    pub winner: bool,
}

impl Player {
    #[must_use]
    pub fn new(nickname: impl Into<String>, birth_date: NaiveDate) -> Self {
        Self {
            nickname: nickname.into(),
            birth_date,
            workers: [Worker::new(Genre::Male), Worker::new(Genre::Female)],
            card: None,
            history: ActionHistory::new(),
            connected: true,
            loser: false,
            winner: false,
        }
    }

    #[must_use]
    pub fn worker(&self, genre: Genre) -> &Worker {
        &self.workers[Self::slot(genre)]
    }

    pub fn worker_mut(&mut self, genre: Genre) -> &mut Worker {
        &mut self.workers[Self::slot(genre)]
    }

    pub fn workers(&self) -> impl Iterator<Item = &Worker> {
        self.workers.iter()
    }

    /// Paint both workers.
    pub fn set_color(&mut self, color: Color) {
        for worker in &mut self.workers {
            worker.color = Some(color);
        }
    }

    #[must_use]
    pub fn color(&self) -> Option<Color> {
        self.workers[0].color
    }

    /// Still in the match: not eliminated and connected.
    #[must_use]
    pub fn is_in_play(&self) -> bool {
        !self.loser && self.connected
    }

    const fn slot(genre: Genre) -> usize {
        match genre {
            Genre::Male => 0,
            Genre::Female => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_player_id_basics() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);

        assert_eq!(p0.index(), 0);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p0), "Player 0");
        assert_eq!(PlayerId::all(3).count(), 3);
    }

    #[test]
    fn test_new_player_has_unplaced_workers() {
        let player = Player::new("ada", date(1990, 1, 1));

        assert_eq!(player.worker(Genre::Male).genre, Genre::Male);
        assert_eq!(player.worker(Genre::Female).genre, Genre::Female);
        assert!(player.workers().all(|w| w.position.is_none()));
        assert!(player.is_in_play());
        assert!(player.card.is_none());
    }

    #[test]
    fn test_set_color_paints_both_workers() {
        let mut player = Player::new("ada", date(1990, 1, 1));
        player.set_color(Color::Beige);

        assert_eq!(player.color(), Some(Color::Beige));
        assert!(player.workers().all(|w| w.color == Some(Color::Beige)));
    }

    #[test]
    fn test_worker_mut() {
        let mut player = Player::new("ada", date(1990, 1, 1));
        player.worker_mut(Genre::Female).position = Some(Position::new(2, 3));

        assert_eq!(player.worker(Genre::Female).position, Some(Position::new(2, 3)));
        assert_eq!(player.worker(Genre::Male).position, None);
    }
}
