//! Match configuration.

use serde::{Deserialize, Serialize};

use super::player::Color;

/// Match configuration parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Seed for the challenger draw.
    /// `None` draws a fresh seed per match.
    pub seed: Option<u64>,

    /// Capacity of the inbound player-event channel.
    pub event_buffer: usize,

    /// Worker colors players pick from, in offer order.
    pub colors: Vec<Color>,

    /// Smallest accepted table size.
    pub min_players: usize,

    /// Largest accepted table size.
    pub max_players: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            seed: None,
            event_buffer: 32,
            colors: vec![Color::Blue, Color::White, Color::Beige],
            min_players: 2,
            max_players: 3,
        }
    }
}

impl MatchConfig {
    /// Fix the challenger draw.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    #[must_use]
    pub fn with_event_buffer(mut self, capacity: usize) -> Self {
        self.event_buffer = capacity;
        self
    }

    #[must_use]
    pub fn with_colors(mut self, colors: Vec<Color>) -> Self {
        self.colors = colors;
        self
    }

    /// Check whether `count` is an accepted table size.
    #[must_use]
    pub fn accepts_player_count(&self, count: usize) -> bool {
        (self.min_players..=self.max_players).contains(&count)
    }
}
