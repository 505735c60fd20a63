//! The playable layer: sessions, configuration, and the game registry.
//!
//! [`Game`] binds the rules engine to the version store -- every accepted
//! turn becomes a commit, and branches let a finished or in-progress game
//! fork into alternate lines. [`GameRegistry`] keeps multiple games
//! addressable by name in one process.

mod config;
mod error;
#[allow(clippy::module_inception)]
mod game;
mod registry;

pub use config::GameConfig;
pub use error::{GameError, GameResult};
pub use game::{Game, PassOutcome};
pub use registry::GameRegistry;
