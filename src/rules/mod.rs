//! Card rules: legal-action generation and action application.
//!
//! - `Rules`: what the card holder may do, and how their actions apply.
//!   Default methods are the standard game; each power overrides only
//!   what it changes.
//! - `EnemyRules`: how a card holder restricts everybody else.
//! - `legal_actions`: the composition the controller trusts.
//!
//! Cards reach their entries through a static table keyed by `CardKind`.

pub mod engine;
pub mod powers;
pub mod enemy;

pub use engine::{resolve_target, scan_builds, scan_moves, Occupant, Rules, RulesError, StandardRules};
pub use powers::{enemy_rules_for, rules_for, Apollo, Artemis, Athena, Atlas, Demeter, Hephaestus, Minotaur, Pan, Prometheus};
pub use enemy::{legal_actions, EnemyRules};
