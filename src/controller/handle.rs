//! Setter entry points for the messaging layer.
//!
//! A `ControllerHandle` is cheap to clone; give one to every connection
//! task. Each setter becomes a `PlayerEvent` on the controller's channel.

use chrono::NaiveDate;
use tokio::sync::{mpsc, oneshot};

use super::error::ControllerError;
use super::events::PlayerEvent;
use crate::cards::CardKind;
use crate::core::{Action, Color, Genre, Position};

/// Sending side of a match controller.
#[derive(Clone, Debug)]
pub struct ControllerHandle {
    events: mpsc::Sender<PlayerEvent>,
}

impl ControllerHandle {
    pub(crate) fn new(events: mpsc::Sender<PlayerEvent>) -> Self {
        Self { events }
    }

    async fn send(&self, event: PlayerEvent) -> Result<(), ControllerError> {
        self.events
            .send(event)
            .await
            .map_err(|_| ControllerError::ChannelClosed)
    }

    async fn ask(&self, event: impl FnOnce(oneshot::Sender<bool>) -> PlayerEvent) -> Result<bool, ControllerError> {
        let (reply, answer) = oneshot::channel();
        self.send(event(reply)).await?;
        answer.await.map_err(|_| ControllerError::ChannelClosed)
    }

    pub async fn set_num_players(&self, count: usize) -> Result<(), ControllerError> {
        self.send(PlayerEvent::SetNumPlayers { count }).await
    }

    /// Seat a player. `Ok(false)` means the nickname is taken or no seat is free.
    pub async fn set_player_info(&self, nickname: impl Into<String>, birth_date: NaiveDate) -> Result<bool, ControllerError> {
        let nickname = nickname.into();
        self.ask(|reply| PlayerEvent::SetPlayerInfo {
            nickname,
            birth_date,
            reply,
        })
        .await
    }

    /// Park a player until the table size is known.
    pub async fn set_temporary_player_info(&self, nickname: impl Into<String>, birth_date: NaiveDate) -> Result<(), ControllerError> {
        self.send(PlayerEvent::SetTemporaryPlayerInfo {
            nickname: nickname.into(),
            birth_date,
        })
        .await
    }

    /// Rename a seated or parked player. `Ok(false)` if `new` is taken or `old` unknown.
    pub async fn set_new_nickname(&self, old: impl Into<String>, new: impl Into<String>) -> Result<bool, ControllerError> {
        let (old, new) = (old.into(), new.into());
        self.ask(|reply| PlayerEvent::SetNewNickname { old, new, reply }).await
    }

    pub async fn set_cards(&self, cards: Vec<CardKind>) -> Result<(), ControllerError> {
        self.send(PlayerEvent::SetCards { cards }).await
    }

    pub async fn set_card(&self, card: CardKind, nickname: impl Into<String>) -> Result<(), ControllerError> {
        self.send(PlayerEvent::SetCard {
            card,
            nickname: nickname.into(),
        })
        .await
    }

    pub async fn set_first_player(&self, nickname: impl Into<String>) -> Result<(), ControllerError> {
        self.send(PlayerEvent::SetFirstPlayer {
            nickname: nickname.into(),
        })
        .await
    }

    pub async fn set_color(&self, nickname: impl Into<String>, color: Color) -> Result<(), ControllerError> {
        self.send(PlayerEvent::SetColor {
            nickname: nickname.into(),
            color,
        })
        .await
    }

    pub async fn set_first_position(
        &self,
        nickname: impl Into<String>,
        genre: Genre,
        position: Position,
    ) -> Result<(), ControllerError> {
        self.send(PlayerEvent::SetFirstPosition {
            nickname: nickname.into(),
            genre,
            position,
        })
        .await
    }

    pub async fn set_action(&self, action: Action, nickname: impl Into<String>) -> Result<(), ControllerError> {
        self.send(PlayerEvent::SetAction {
            action,
            nickname: nickname.into(),
        })
        .await
    }

    pub async fn set_as_disconnected(&self, nickname: impl Into<String>) -> Result<(), ControllerError> {
        self.send(PlayerEvent::SetAsDisconnected {
            nickname: nickname.into(),
        })
        .await
    }
}
