//! Powers that constrain opponents.
//!
//! After the current player's own rules produce their candidate set, every
//! card holder in the match gets a chance to filter it. The filter is keyed
//! off the holder's own most recent round, so applying a holder's hook to
//! their own turn changes nothing.

use tracing::debug;

use crate::core::{Game, LegalActionSet, PlayerId};

use super::engine::{Rules, StandardRules};
use super::powers::Athena;

/// Interference a card holder applies to an opponent's candidates.
pub trait EnemyRules: Sync {
    /// Filter `candidates` given `owner`'s own history. Identity by default.
    fn fix_enemy_actions(&self, candidates: LegalActionSet, game: &Game, owner: PlayerId) -> LegalActionSet {
        let _ = (game, owner);
        candidates
    }
}

impl EnemyRules for Athena {
    /// If Athena's holder climbed during their last round, nobody may climb.
    fn fix_enemy_actions(&self, mut candidates: LegalActionSet, game: &Game, owner: PlayerId) -> LegalActionSet {
        if !game.player(owner).history.moved_up() {
            return candidates;
        }

        let before = candidates.len();
        candidates.retain(|a| !(a.is_move() && a.level_difference > 0));
        if candidates.len() != before {
            debug!(%owner, removed = before - candidates.len(), "upward moves blocked");
        }
        candidates.or_lose()
    }
}

/// The authoritative legal-action set for `player` right now.
///
/// The player's own card rules produce the candidates, then every player
/// still in the match (self included) applies their card's enemy hook in
/// turn order.
#[must_use]
pub fn legal_actions(game: &Game, player: PlayerId) -> LegalActionSet {
    let own: &dyn Rules = match game.player(player).card {
        Some(kind) => kind.rules(),
        None => &StandardRules,
    };
    let candidates = own.next_possible_actions(game, player);

    game.player_ids()
        .filter(|&id| !game.player(id).loser)
        .fold(candidates, |set, id| match game.player(id).card {
            Some(kind) => kind.enemy_rules().fix_enemy_actions(set, game, id),
            None => set,
        })
}
