//! Mutable match state.
//!
//! A `Game` owns the board, the seated players in turn order, the cards in
//! play, and the match-wide action log. Players are only ever added (during
//! the lobby) and flagged; never removed.

use im::Vector;
use serde::Serialize;

use super::action::{Action, ActionRecord};
use super::board::{Board, Position};
use super::player::{Genre, Player, PlayerId};
use crate::cards::CardKind;

/// State of one match.
#[derive(Clone, Debug, Serialize)]
pub struct Game {
    board: Board,
    players: Vec<Player>,
    num_players: Option<usize>,
    used_cards: Vec<CardKind>,
    active: bool,
    current: Option<PlayerId>,
    turn: u32,
    log: Vector<ActionRecord>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// Create an empty, active match with an unbuilt board.
    #[must_use]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            players: Vec::new(),
            num_players: None,
            used_cards: Vec::new(),
            active: true,
            current: None,
            turn: 0,
            log: Vector::new(),
        }
    }

    // === Board ===

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    // === Seating ===

    /// Fix the table size. Only the first call is accepted.
    pub fn set_num_players(&mut self, count: usize) -> bool {
        if self.num_players.is_some() {
            return false;
        }
        self.num_players = Some(count);
        true
    }

    #[must_use]
    pub fn num_players(&self) -> Option<usize> {
        self.num_players
    }

    /// Every seat is taken.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.num_players.is_some_and(|n| self.players.len() >= n)
    }

    #[must_use]
    pub fn has_nickname(&self, nickname: &str) -> bool {
        self.players.iter().any(|p| p.nickname == nickname)
    }

    /// Seat a player, keeping turn order oldest first.
    ///
    /// Rejected when the table size is unknown, the table is full, or the
    /// nickname is taken.
    pub fn add_player(&mut self, player: Player) -> bool {
        if self.num_players.is_none() || self.is_full() || self.has_nickname(&player.nickname) {
            return false;
        }
        self.players.push(player);
        self.players.sort_by_key(|p| p.birth_date);
        true
    }

    /// Rename a seated player. Rejected if `new` is taken or `old` unknown.
    pub fn rename_player(&mut self, old: &str, new: &str) -> bool {
        if self.has_nickname(new) {
            return false;
        }
        match self.players.iter_mut().find(|p| p.nickname == old) {
            Some(player) => {
                player.nickname = new.to_string();
                true
            }
            None => false,
        }
    }

    // === Players ===

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_ids(&self) -> impl Iterator<Item = PlayerId> {
        PlayerId::all(self.players.len())
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn player_mut(&mut self, id: PlayerId) -> &mut Player {
        &mut self.players[id.index()]
    }

    #[must_use]
    pub fn player_id(&self, nickname: &str) -> Option<PlayerId> {
        self.players
            .iter()
            .position(|p| p.nickname == nickname)
            .map(|i| PlayerId::new(i as u8))
    }

    /// Nicknames in turn order.
    #[must_use]
    pub fn nicknames(&self) -> Vec<String> {
        self.players.iter().map(|p| p.nickname.clone()).collect()
    }

    /// The next player after `from` in turn order who is still in play.
    ///
    /// Wraps around; returns `from` itself when nobody else is left.
    #[must_use]
    pub fn next_in_play(&self, from: PlayerId) -> Option<PlayerId> {
        let count = self.players.len();
        (1..=count)
            .map(|offset| PlayerId::new(((from.index() + offset) % count) as u8))
            .find(|&id| self.player(id).is_in_play())
    }

    /// The only player not flagged as loser, if exactly one remains.
    #[must_use]
    pub fn sole_survivor(&self) -> Option<PlayerId> {
        let mut survivors = self.player_ids().filter(|&id| !self.player(id).loser);
        match (survivors.next(), survivors.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        }
    }

    // === Workers ===

    #[must_use]
    pub fn worker_position(&self, player: PlayerId, genre: Genre) -> Option<Position> {
        self.player(player).worker(genre).position
    }

    pub fn place_worker(&mut self, player: PlayerId, genre: Genre, position: Position) {
        self.player_mut(player).worker_mut(genre).position = Some(position);
    }

    /// The worker standing on `position`, if any.
    #[must_use]
    pub fn occupant(&self, position: Position) -> Option<(PlayerId, Genre)> {
        self.player_ids().find_map(|id| {
            self.player(id)
                .workers()
                .find(|w| w.position == Some(position))
                .map(|w| (id, w.genre))
        })
    }

    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.occupant(position).is_some()
    }

    /// Positions of every placed worker.
    #[must_use]
    pub fn occupied_positions(&self) -> Vec<Position> {
        self.players
            .iter()
            .flat_map(|p| p.workers().filter_map(|w| w.position))
            .collect()
    }

    // === Cards ===

    #[must_use]
    pub fn used_cards(&self) -> &[CardKind] {
        &self.used_cards
    }

    pub fn set_used_cards(&mut self, cards: Vec<CardKind>) {
        self.used_cards = cards;
    }

    // === Lifecycle ===

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Mark the match as aborted. There is no way back.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        self.current
    }

    pub fn set_current_player(&mut self, player: PlayerId) {
        self.current = Some(player);
    }

    /// Hand the turn to `player` and clear their round history.
    pub fn begin_turn(&mut self, player: PlayerId) {
        self.current = Some(player);
        self.turn += 1;
        self.player_mut(player).history.clear();
    }

    /// Turn number (0 before the first turn).
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    // === Log ===

    /// Append a committed action to the match log.
    pub fn record(&mut self, player: PlayerId, action: Action) {
        let nickname = self.player(player).nickname.clone();
        self.log.push_back(ActionRecord::new(nickname, self.turn, action));
    }

    #[must_use]
    pub fn log(&self) -> &Vector<ActionRecord> {
        &self.log
    }
}
