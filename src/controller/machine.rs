//! The match state machine.
//!
//! One `Controller` drives one match through its phases:
//!
//! 1. Lobby: wait until every seat is taken
//! 2. Card selection: a random challenger picks one card per player
//! 3. Card assignment: the others pick in turn order, the challenger keeps the last
//! 4. First player selection: the challenger names who starts
//! 5. Worker placement: each player picks a color and places both workers
//! 6. Main loop: turns until a win or a single survivor
//!
//! The controller owns the `Game` and is the only code that mutates it.
//! Every blocking point reads one `PlayerEvent` at a time from its channel,
//! so the legal-action set is always computed over a fully applied prior
//! action. A disconnection of a player still in the match deactivates the
//! game, and every wait unwinds with `ControllerError::MatchAborted`.

use std::sync::Arc;

use im::Vector;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use super::error::ControllerError;
use super::events::{BoardSnapshot, Notification, Outbound, PlayerEvent, Recipient};
use super::handle::ControllerHandle;
use crate::cards::{CardCatalog, CardKind};
use crate::core::{
    Action, ActionKind, ActionRecord, Color, Game, GameRng, Genre, LegalActionSet, MatchConfig, Player, PlayerId,
    Position,
};
use crate::rules::{legal_actions, Rules, StandardRules};

/// How a finished match ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchOutcome {
    pub winner: String,
    /// Every committed action, in order.
    pub log: Vector<ActionRecord>,
}

/// The response the current phase is blocked on.
#[derive(Debug)]
enum Awaiting {
    Lobby,
    Cards { count: usize, available: Vec<CardKind> },
    Card { chooser: PlayerId, remaining: Vec<CardKind> },
    FirstPlayer,
    Color { player: PlayerId, available: Vec<Color> },
    Position { player: PlayerId, genre: Genre },
    Action { player: PlayerId, legal: LegalActionSet },
}

/// An accepted answer to an `Awaiting`.
#[derive(Debug)]
enum Response {
    LobbyReady,
    Cards(Vec<CardKind>),
    Card(CardKind),
    FirstPlayer(PlayerId),
    Color(Color),
    Position(Position),
    Action(Action),
}

/// Turn and phase coordinator for one match.
pub struct Controller {
    game: Game,
    catalog: Arc<CardCatalog>,
    config: MatchConfig,
    rng: GameRng,
    events: mpsc::Receiver<PlayerEvent>,
    outbound: mpsc::UnboundedSender<Outbound>,
    /// Players waiting for the table size, in arrival order.
    parked: Vec<Player>,
    /// Who caused the abort, once the game is inactive.
    aborted_by: Option<String>,
}

impl Controller {
    /// Create a controller for a fresh match.
    ///
    /// Returns the controller, a handle for the messaging layer, and the
    /// stream of outbound notifications.
    #[must_use]
    pub fn new(
        config: MatchConfig,
        catalog: Arc<CardCatalog>,
    ) -> (Self, ControllerHandle, mpsc::UnboundedReceiver<Outbound>) {
        Self::with_game(Game::new(), config, catalog)
    }

    /// Create a controller over an existing game.
    ///
    /// Lets a host resume from any phase by calling the matching `run_*`
    /// method directly.
    #[must_use]
    pub fn with_game(
        game: Game,
        config: MatchConfig,
        catalog: Arc<CardCatalog>,
    ) -> (Self, ControllerHandle, mpsc::UnboundedReceiver<Outbound>) {
        let (event_tx, event_rx) = mpsc::channel(config.event_buffer.max(1));
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);

        let controller = Self {
            game,
            catalog,
            config,
            rng,
            events: event_rx,
            outbound: outbound_tx,
            parked: Vec::new(),
            aborted_by: None,
        };
        (controller, ControllerHandle::new(event_tx), outbound_rx)
    }

    #[must_use]
    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Play the whole match, from lobby to winner.
    pub async fn run(mut self) -> Result<MatchOutcome, ControllerError> {
        let result = self.play().await;
        match &result {
            Ok(outcome) => info!(winner = %outcome.winner, actions = outcome.log.len(), "match finished"),
            Err(error) => warn!(%error, "match ended without a winner"),
        }
        result
    }

    async fn play(&mut self) -> Result<MatchOutcome, ControllerError> {
        self.run_lobby().await?;
        let challenger = self.run_card_selection().await?;
        self.run_card_assignment(challenger).await?;
        self.run_first_player_selection(challenger).await?;
        self.run_worker_placement().await?;
        self.run_main_loop().await
    }

    // === Phases ===

    /// Wait until the table size is known and every seat is taken.
    pub async fn run_lobby(&mut self) -> Result<(), ControllerError> {
        if !self.game.is_full() {
            self.wait_for(&Awaiting::Lobby).await?;
        }
        info!(players = ?self.game.nicknames(), "lobby closed");
        Ok(())
    }

    /// Draw the challenger and let them pick one card per player.
    ///
    /// Returns the challenger.
    pub async fn run_card_selection(&mut self) -> Result<PlayerId, ControllerError> {
        let count = self.game.player_count();
        if count == 0 {
            return Err(ControllerError::NoActivePlayer);
        }
        let available = self.catalog.playable_with(count);
        if available.len() < count {
            return Err(ControllerError::NotEnoughCards {
                needed: count,
                available: available.len(),
            });
        }
        let challenger = PlayerId::new(self.rng.gen_range_usize(0..count) as u8);
        info!(challenger = %self.nickname(challenger), seed = self.rng.seed(), "card selection");

        self.send_to(
            challenger,
            Notification::RequestCards {
                count,
                available: available.clone(),
            },
        );
        let awaiting = Awaiting::Cards { count, available };
        let Response::Cards(cards) = self.wait_for(&awaiting).await? else {
            unreachable!("card selection accepts only card lists");
        };

        self.game.set_used_cards(cards.clone());
        self.broadcast(Notification::ShowCards { cards });
        Ok(challenger)
    }

    /// Every player after the challenger picks a card; the challenger gets the last one.
    pub async fn run_card_assignment(&mut self, challenger: PlayerId) -> Result<(), ControllerError> {
        let count = self.game.player_count();
        let mut remaining = self.game.used_cards().to_vec();

        for offset in 1..count {
            let chooser = PlayerId::new(((challenger.index() + offset) % count) as u8);
            self.send_to(
                chooser,
                Notification::RequestCard {
                    remaining: remaining.clone(),
                },
            );
            let awaiting = Awaiting::Card {
                chooser,
                remaining: remaining.clone(),
            };
            let Response::Card(card) = self.wait_for(&awaiting).await? else {
                unreachable!("card assignment accepts only single cards");
            };

            remaining.retain(|&kind| kind != card);
            self.game.player_mut(chooser).card = Some(card);
            debug!(player = %self.nickname(chooser), %card, "card picked");
        }

        if let Some(&last) = remaining.first() {
            self.game.player_mut(challenger).card = Some(last);
        }

        let players = self
            .game
            .players()
            .iter()
            .filter_map(|p| p.card.map(|card| (p.nickname.clone(), card)))
            .collect();
        self.broadcast(Notification::ShowCardAssignment { players });
        Ok(())
    }

    /// The challenger names the first player.
    pub async fn run_first_player_selection(&mut self, challenger: PlayerId) -> Result<(), ControllerError> {
        self.send_to(
            challenger,
            Notification::RequestFirstPlayer {
                nicknames: self.game.nicknames(),
            },
        );
        let Response::FirstPlayer(first) = self.wait_for(&Awaiting::FirstPlayer).await? else {
            unreachable!("first player selection accepts only a player");
        };

        self.game.set_current_player(first);
        info!(first = %self.nickname(first), "first player chosen");
        Ok(())
    }

    /// Starting with the first player, each picks a color and places both workers.
    pub async fn run_worker_placement(&mut self) -> Result<(), ControllerError> {
        let first = self.game.current_player().ok_or(ControllerError::NoActivePlayer)?;
        let count = self.game.player_count();
        let mut colors = self.config.colors.clone();

        for offset in 0..count {
            let player = PlayerId::new(((first.index() + offset) % count) as u8);

            if colors.is_empty() {
                warn!(player = %self.nickname(player), "no colors left to offer");
            } else {
                self.send_to(
                    player,
                    Notification::RequestColor {
                        available: colors.clone(),
                    },
                );
                let awaiting = Awaiting::Color {
                    player,
                    available: colors.clone(),
                };
                let Response::Color(color) = self.wait_for(&awaiting).await? else {
                    unreachable!("color selection accepts only colors");
                };
                colors.retain(|&c| c != color);
                self.game.player_mut(player).set_color(color);
            }

            for genre in Genre::BOTH {
                self.send_to(
                    player,
                    Notification::RequestWorkerPosition {
                        genre,
                        forbidden: self.game.occupied_positions(),
                    },
                );
                let Response::Position(position) = self.wait_for(&Awaiting::Position { player, genre }).await? else {
                    unreachable!("worker placement accepts only positions");
                };
                self.game.place_worker(player, genre, position);
                self.broadcast_map(None);
            }
        }
        Ok(())
    }

    /// Turns until someone wins.
    ///
    /// Each step computes the legal-action set through the current player's
    /// rules and every player's enemy hook, then eliminates, skips, or asks.
    pub async fn run_main_loop(&mut self) -> Result<MatchOutcome, ControllerError> {
        let mut current = self.game.current_player().ok_or(ControllerError::NoActivePlayer)?;
        self.game.begin_turn(current);
        self.broadcast_map(None);
        let mut eliminated: Option<String> = None;

        loop {
            self.ensure_active()?;
            let legal = legal_actions(&self.game, current);
            debug!(player = %self.nickname(current), options = legal.len(), "legal actions");

            if legal.is_only(ActionKind::Lose) {
                let nickname = self.nickname(current);
                self.game.player_mut(current).loser = true;
                self.game.record(current, Action::lose());
                info!(%nickname, "player eliminated");

                if let Some(winner) = self.game.sole_survivor() {
                    return Ok(self.finish(winner));
                }
                eliminated = Some(nickname);
                current = self.advance(current, eliminated.clone())?;
                continue;
            }

            if self.game.player(current).history.contains_end() || legal.is_only(ActionKind::End) {
                current = self.advance(current, eliminated.clone())?;
                continue;
            }

            self.send_to(
                current,
                Notification::RequestTurnAction {
                    legal: legal.clone(),
                    snapshot: BoardSnapshot::of(&self.game),
                    eliminated: eliminated.take(),
                },
            );
            let awaiting = Awaiting::Action { player: current, legal };
            let Response::Action(action) = self.wait_for(&awaiting).await? else {
                unreachable!("turns accept only actions");
            };

            let rules: &dyn Rules = match self.game.player(current).card {
                Some(kind) => kind.rules(),
                None => &StandardRules,
            };
            let won = rules.do_action(&mut self.game, current, &action)?;
            self.game.record(current, action);
            self.broadcast_map(None);

            if won {
                return Ok(self.finish(current));
            }
        }
    }

    /// Hand the turn to the next player still in play.
    fn advance(&mut self, from: PlayerId, eliminated: Option<String>) -> Result<PlayerId, ControllerError> {
        let next = self.game.next_in_play(from).ok_or(ControllerError::NoActivePlayer)?;
        self.game.begin_turn(next);
        debug!(player = %self.nickname(next), turn = self.game.turn(), "turn started");
        self.broadcast_map(eliminated);
        Ok(next)
    }

    fn finish(&mut self, winner: PlayerId) -> MatchOutcome {
        self.game.player_mut(winner).winner = true;
        let winner_name = self.nickname(winner);
        info!(winner = %winner_name, "winner decided");

        for id in self.game.player_ids() {
            self.send_to(
                id,
                Notification::ShowGameEnd {
                    winner: winner_name.clone(),
                    you_won: id == winner,
                },
            );
        }

        MatchOutcome {
            winner: winner_name,
            log: self.game.log().clone(),
        }
    }

    // === Waiting ===

    /// Block until an event answers `awaiting`.
    ///
    /// Lobby requests and disconnections are handled whatever the phase.
    /// The match state is re-checked after every event.
    async fn wait_for(&mut self, awaiting: &Awaiting) -> Result<Response, ControllerError> {
        loop {
            self.ensure_active()?;
            let Some(event) = self.events.recv().await else {
                self.game.deactivate();
                return Err(ControllerError::ChannelClosed);
            };
            if let Some(response) = self.handle_event(event, awaiting) {
                return Ok(response);
            }
        }
    }

    fn ensure_active(&self) -> Result<(), ControllerError> {
        if self.game.is_active() {
            Ok(())
        } else {
            Err(ControllerError::MatchAborted {
                nickname: self.aborted_by.clone(),
            })
        }
    }

    fn handle_event(&mut self, event: PlayerEvent, awaiting: &Awaiting) -> Option<Response> {
        match event {
            PlayerEvent::SetNumPlayers { count } => {
                self.set_num_players(count);
                self.lobby_ready(awaiting)
            }
            PlayerEvent::SetPlayerInfo {
                nickname,
                birth_date,
                reply,
            } => {
                let accepted = !self.nickname_taken(&nickname) && self.game.add_player(Player::new(&nickname, birth_date));
                if accepted {
                    info!(%nickname, "player seated");
                } else {
                    warn!(%nickname, "player info rejected");
                }
                let _ = reply.send(accepted);
                self.lobby_ready(awaiting)
            }
            PlayerEvent::SetTemporaryPlayerInfo { nickname, birth_date } => {
                debug!(%nickname, "player parked");
                self.parked.push(Player::new(nickname, birth_date));
                self.seat_parked();
                self.lobby_ready(awaiting)
            }
            PlayerEvent::SetNewNickname { old, new, reply } => {
                let accepted = self.rename(&old, &new);
                let _ = reply.send(accepted);
                self.lobby_ready(awaiting)
            }
            PlayerEvent::SetCards { cards } => match awaiting {
                Awaiting::Cards { count, available } => {
                    let distinct = cards.iter().enumerate().all(|(i, c)| !cards[..i].contains(c));
                    let valid = cards.len() == *count && distinct && cards.iter().all(|c| available.contains(c));
                    self.accept_if(valid, "cards", Response::Cards(cards))
                }
                _ => self.unexpected("cards"),
            },
            PlayerEvent::SetCard { card, nickname } => match awaiting {
                Awaiting::Card { chooser, remaining } => {
                    let valid = self.is_sender(&nickname, *chooser) && remaining.contains(&card);
                    self.accept_if(valid, "card", Response::Card(card))
                }
                _ => self.unexpected("card"),
            },
            PlayerEvent::SetFirstPlayer { nickname } => match awaiting {
                Awaiting::FirstPlayer => {
                    let first = self.game.player_id(&nickname);
                    if first.is_none() {
                        warn!(%nickname, "first player is not seated");
                    }
                    first.map(Response::FirstPlayer)
                }
                _ => self.unexpected("first player"),
            },
            PlayerEvent::SetColor { nickname, color } => match awaiting {
                Awaiting::Color { player, available } => {
                    let valid = self.is_sender(&nickname, *player) && available.contains(&color);
                    self.accept_if(valid, "color", Response::Color(color))
                }
                _ => self.unexpected("color"),
            },
            PlayerEvent::SetFirstPosition {
                nickname,
                genre,
                position,
            } => match awaiting {
                Awaiting::Position { player, genre: wanted } => {
                    let valid = self.is_sender(&nickname, *player)
                        && genre == *wanted
                        && !self.game.is_occupied(position)
                        && !self.game.board().cell(position).has_dome();
                    self.accept_if(valid, "worker position", Response::Position(position))
                }
                _ => self.unexpected("worker position"),
            },
            PlayerEvent::SetAction { action, nickname } => match awaiting {
                Awaiting::Action { player, legal } => {
                    let valid = self.is_sender(&nickname, *player) && legal.contains(&action);
                    self.accept_if(valid, "action", Response::Action(action))
                }
                _ => self.unexpected("action"),
            },
            PlayerEvent::SetAsDisconnected { nickname } => {
                self.disconnect(&nickname);
                None
            }
        }
    }

    fn accept_if(&self, valid: bool, what: &'static str, response: Response) -> Option<Response> {
        if valid {
            Some(response)
        } else {
            warn!(what, "request rejected");
            None
        }
    }

    fn unexpected(&self, what: &'static str) -> Option<Response> {
        warn!(what, "request arrived outside its phase");
        None
    }

    fn is_sender(&self, nickname: &str, expected: PlayerId) -> bool {
        self.game.player_id(nickname) == Some(expected)
    }

    // === Lobby ===

    fn lobby_ready(&self, awaiting: &Awaiting) -> Option<Response> {
        (matches!(awaiting, Awaiting::Lobby) && self.game.is_full()).then_some(Response::LobbyReady)
    }

    fn set_num_players(&mut self, count: usize) {
        if !self.config.accepts_player_count(count) {
            warn!(count, "unsupported number of players");
            return;
        }
        if self.game.set_num_players(count) {
            info!(count, "number of players set");
            self.seat_parked();
        } else {
            warn!(count, "number of players already set");
        }
    }

    fn nickname_taken(&self, nickname: &str) -> bool {
        self.game.has_nickname(nickname) || self.parked.iter().any(|p| p.nickname == nickname)
    }

    /// Seat parked players in arrival order while seats are free.
    ///
    /// A parked player whose nickname is already seated stays parked.
    fn seat_parked(&mut self) {
        if self.game.num_players().is_none() {
            return;
        }
        let mut index = 0;
        while index < self.parked.len() && !self.game.is_full() {
            if self.game.has_nickname(&self.parked[index].nickname) {
                index += 1;
                continue;
            }
            let player = self.parked.remove(index);
            info!(nickname = %player.nickname, "parked player seated");
            self.game.add_player(player);
        }
    }

    fn rename(&mut self, old: &str, new: &str) -> bool {
        if self.nickname_taken(new) {
            warn!(%old, %new, "nickname change rejected");
            return false;
        }
        // A parked player sharing a seated nickname is the one being renamed.
        if let Some(player) = self.parked.iter_mut().find(|p| p.nickname == old) {
            player.nickname = new.to_string();
            info!(%old, %new, "parked nickname changed");
            self.seat_parked();
            return true;
        }
        if self.game.rename_player(old, new) {
            info!(%old, %new, "nickname changed");
            return true;
        }
        warn!(%old, "nickname change for unknown player");
        false
    }

    fn disconnect(&mut self, nickname: &str) {
        if let Some(index) = self.parked.iter().position(|p| p.nickname == nickname) {
            self.parked.remove(index);
            debug!(%nickname, "parked player left");
            return;
        }
        let Some(id) = self.game.player_id(nickname) else {
            warn!(%nickname, "disconnection of unknown player");
            return;
        };

        let player = self.game.player_mut(id);
        player.connected = false;
        if player.loser {
            info!(%nickname, "eliminated player left");
            return;
        }

        warn!(%nickname, "player disconnected, aborting match");
        self.game.deactivate();
        self.aborted_by = Some(nickname.to_string());
        self.broadcast(Notification::ShowDisconnection {
            nickname: nickname.to_string(),
        });
    }

    // === Notifications ===

    fn nickname(&self, player: PlayerId) -> String {
        self.game.player(player).nickname.clone()
    }

    fn send_to(&self, player: PlayerId, notification: Notification) {
        self.emit(Recipient::Player(self.nickname(player)), notification);
    }

    fn broadcast(&self, notification: Notification) {
        self.emit(Recipient::All, notification);
    }

    fn broadcast_map(&self, eliminated: Option<String>) {
        self.broadcast(Notification::ShowMap {
            snapshot: BoardSnapshot::of(&self.game),
            current: self.game.current_player().map(|id| self.nickname(id)),
            eliminated,
        });
    }

    fn emit(&self, recipient: Recipient, notification: Notification) {
        if self.outbound.send(Outbound { recipient, notification }).is_err() {
            debug!("notification dropped, nobody is listening");
        }
    }
}
