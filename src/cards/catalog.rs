//! Card catalog for definition lookup.
//!
//! The `CardCatalog` is built once at startup and shared read-only by every
//! match (usually behind an `Arc`).

use rustc_hash::FxHashMap;

use super::definition::{Card, CardKind};

/// Catalog of power cards.
///
/// Iteration follows registration order.
///
/// ## Example
///
/// ```
/// use santorini_core::cards::{CardCatalog, CardKind};
///
/// let catalog = CardCatalog::standard();
///
/// let found = catalog.by_name("Minotaur").unwrap();
/// assert_eq!(found.kind, CardKind::Minotaur);
/// assert_eq!(catalog.len(), 9);
/// ```
#[derive(Clone, Debug, Default)]
pub struct CardCatalog {
    cards: FxHashMap<CardKind, Card>,
    order: Vec<CardKind>,
}

impl CardCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The nine standard power cards.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        let cards = [
            (CardKind::Apollo, "Your Worker may move into an opponent Worker's space by forcing their Worker to the space yours just vacated."),
            (CardKind::Artemis, "Your Worker may move one additional time, but not back to its initial space."),
            (CardKind::Athena, "If one of your Workers moved up on your last turn, opponent Workers cannot move up this turn."),
            (CardKind::Atlas, "Your Worker may build a dome at any level."),
            (CardKind::Demeter, "Your Worker may build one additional time, but not on the same space."),
            (CardKind::Hephaestus, "Your Worker may build one additional block (not dome) on top of your first block."),
            (CardKind::Minotaur, "Your Worker may move into an opponent Worker's space, if their Worker can be forced one space straight backwards to an unoccupied space at any level."),
            (CardKind::Pan, "You also win if your Worker moves down two or more levels."),
            (CardKind::Prometheus, "If your Worker does not move up, it may build both before and after moving."),
        ];
        for (kind, description) in cards {
            catalog.register(Card::new(kind, description));
        }
        catalog
    }

    /// Register a card.
    ///
    /// Panics if a card of the same kind already exists.
    pub fn register(&mut self, card: Card) {
        if self.cards.contains_key(&card.kind) {
            panic!("Card {} already registered", card.kind);
        }
        self.order.push(card.kind);
        self.cards.insert(card.kind, card);
    }

    /// Get a card by kind.
    #[must_use]
    pub fn get(&self, kind: CardKind) -> Option<&Card> {
        self.cards.get(&kind)
    }

    /// Get a card by display name.
    #[must_use]
    pub fn by_name(&self, name: &str) -> Option<&Card> {
        self.cards.values().find(|c| c.name == name)
    }

    /// Check if a kind is registered.
    #[must_use]
    pub fn contains(&self, kind: CardKind) -> bool {
        self.cards.contains_key(&kind)
    }

    /// Get the number of registered cards.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Iterate over all cards in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.order.iter().filter_map(|kind| self.cards.get(kind))
    }

    /// Kinds playable at a table of `player_count`, in registration order.
    #[must_use]
    pub fn playable_with(&self, player_count: usize) -> Vec<CardKind> {
        self.iter()
            .filter(|c| c.allows_players(player_count))
            .map(|c| c.kind)
            .collect()
    }
}
