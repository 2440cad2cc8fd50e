//! Power card definitions.
//!
//! `CardKind` is the closed set of powers. A `Card` is the catalog record
//! for a kind: display name, description and 3-player compatibility.
//! The behavior of a kind lives in the `rules` module and is reached
//! through `CardKind::rules` and `CardKind::enemy_rules`.

use serde::{Deserialize, Serialize};

use crate::rules::{enemy_rules_for, rules_for, EnemyRules, Rules};

/// The power a card grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CardKind {
    Apollo,
    Artemis,
    Athena,
    Atlas,
    Demeter,
    Hephaestus,
    Minotaur,
    Pan,
    Prometheus,
}

impl CardKind {
    /// Every power, alphabetically.
    pub const ALL: [CardKind; 9] = [
        CardKind::Apollo,
        CardKind::Artemis,
        CardKind::Athena,
        CardKind::Atlas,
        CardKind::Demeter,
        CardKind::Hephaestus,
        CardKind::Minotaur,
        CardKind::Pan,
        CardKind::Prometheus,
    ];

    /// Move/build rules for the holder of this card.
    #[must_use]
    pub fn rules(self) -> &'static dyn Rules {
        rules_for(self)
    }

    /// Restrictions this card imposes on opponents.
    #[must_use]
    pub fn enemy_rules(self) -> &'static dyn EnemyRules {
        enemy_rules_for(self)
    }

    /// Canonical display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            CardKind::Apollo => "Apollo",
            CardKind::Artemis => "Artemis",
            CardKind::Athena => "Athena",
            CardKind::Atlas => "Atlas",
            CardKind::Demeter => "Demeter",
            CardKind::Hephaestus => "Hephaestus",
            CardKind::Minotaur => "Minotaur",
            CardKind::Pan => "Pan",
            CardKind::Prometheus => "Prometheus",
        }
    }
}

impl std::fmt::Display for CardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Catalog record for a power card.
///
/// Cards compare by name.
///
/// ## Example
///
/// ```
/// use santorini_core::cards::{Card, CardKind};
///
/// let pan = Card::new(CardKind::Pan, "You also win if your worker moves down two or more levels.");
/// assert_eq!(pan.name, "Pan");
/// assert!(pan.allows_players(3));
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Card {
    pub kind: CardKind,
    pub name: String,
    /// Playable at a 3-player table.
    pub three_players: bool,
    pub description: String,
}

impl Card {
    /// Create a 3-player compatible card named after its kind.
    pub fn new(kind: CardKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            name: kind.name().to_string(),
            three_players: true,
            description: description.into(),
        }
    }

    /// Restrict the card to 2-player tables.
    #[must_use]
    pub fn two_players_only(mut self) -> Self {
        self.three_players = false;
        self
    }

    /// Check whether the card can be used at a table of `player_count`.
    #[must_use]
    pub fn allows_players(&self, player_count: usize) -> bool {
        player_count < 3 || self.three_players
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Card {}
