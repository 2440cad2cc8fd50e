//! Typed messages between the controller and the messaging layer.
//!
//! Inbound: `PlayerEvent`, one per setter call on a `ControllerHandle`.
//! Outbound: `Outbound`, a `Notification` addressed to one player or all.
//! Serialization for the wire is the messaging layer's business; the
//! outbound types derive `Serialize` so it can do so directly.

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::oneshot;

use crate::cards::CardKind;
use crate::core::{Action, Board, Color, Game, Genre, LegalActionSet, Position};

/// A player's response or lobby request, as delivered to the controller.
#[derive(Debug)]
pub enum PlayerEvent {
    SetNumPlayers {
        count: usize,
    },
    SetPlayerInfo {
        nickname: String,
        birth_date: NaiveDate,
        reply: oneshot::Sender<bool>,
    },
    SetTemporaryPlayerInfo {
        nickname: String,
        birth_date: NaiveDate,
    },
    SetNewNickname {
        old: String,
        new: String,
        reply: oneshot::Sender<bool>,
    },
    /// The challenger's card picks.
    SetCards {
        cards: Vec<CardKind>,
    },
    SetCard {
        card: CardKind,
        nickname: String,
    },
    /// The challenger names the first player.
    SetFirstPlayer {
        nickname: String,
    },
    SetColor {
        nickname: String,
        color: Color,
    },
    SetFirstPosition {
        nickname: String,
        genre: Genre,
        position: Position,
    },
    SetAction {
        action: Action,
        nickname: String,
    },
    SetAsDisconnected {
        nickname: String,
    },
}

/// A placed worker as shown to clients.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WorkerView {
    pub nickname: String,
    pub genre: Genre,
    pub color: Option<Color>,
    pub position: Position,
}

/// Board state plus every placed worker.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    pub board: Board,
    pub workers: Vec<WorkerView>,
}

impl BoardSnapshot {
    #[must_use]
    pub fn of(game: &Game) -> Self {
        let workers = game
            .players()
            .iter()
            .flat_map(|player| {
                player.workers().filter_map(move |worker| {
                    worker.position.map(|position| WorkerView {
                        nickname: player.nickname.clone(),
                        genre: worker.genre,
                        color: worker.color,
                        position,
                    })
                })
            })
            .collect();

        Self {
            board: game.board().clone(),
            workers,
        }
    }
}

/// What the controller asks for or announces.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    RequestCards {
        count: usize,
        available: Vec<CardKind>,
    },
    RequestCard {
        remaining: Vec<CardKind>,
    },
    RequestFirstPlayer {
        nicknames: Vec<String>,
    },
    RequestColor {
        available: Vec<Color>,
    },
    RequestWorkerPosition {
        genre: Genre,
        forbidden: Vec<Position>,
    },
    ShowCards {
        cards: Vec<CardKind>,
    },
    ShowCardAssignment {
        players: Vec<(String, CardKind)>,
    },
    ShowMap {
        snapshot: BoardSnapshot,
        current: Option<String>,
        eliminated: Option<String>,
    },
    RequestTurnAction {
        legal: LegalActionSet,
        snapshot: BoardSnapshot,
        eliminated: Option<String>,
    },
    ShowGameEnd {
        winner: String,
        you_won: bool,
    },
    ShowDisconnection {
        nickname: String,
    },
}

/// Who a notification is for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Recipient {
    All,
    Player(String),
}

impl Recipient {
    /// Check whether `nickname` receives messages sent to this recipient.
    #[must_use]
    pub fn includes(&self, nickname: &str) -> bool {
        match self {
            Recipient::All => true,
            Recipient::Player(name) => name == nickname,
        }
    }
}

/// An addressed notification.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Outbound {
    pub recipient: Recipient,
    pub notification: Notification,
}
