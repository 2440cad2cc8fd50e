//! Power cards: kinds, catalog records, and the catalog.
//!
//! ## Key Types
//!
//! - `CardKind`: The closed set of powers, dispatching to their rules
//! - `Card`: Catalog record (name, description, 3-player flag)
//! - `CardCatalog`: Card lookup, built once and shared between matches

pub mod definition;
pub mod catalog;

pub use definition::{Card, CardKind};
pub use catalog::CardCatalog;
