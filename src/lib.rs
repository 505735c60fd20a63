//! gogogo - A Version-Controlled Go Engine
//!
//! This crate plays go on top of a content-addressed object store. Every
//! move is a commit, every board is a snapshot, and a game's entire history
//! stays branchable: fork an alternate line at any earlier move and play
//! both out.
//!
//! # Example
//!
//! ```no_run
//! use gogogo::game::{Game, GameConfig};
//!
//! let mut game = Game::new("first", &GameConfig::default()).unwrap();
//! game.move_stone(3, 3).unwrap();
//! game.move_stone(15, 15).unwrap();
//!
//! // fork an alternate line one move back and play it out
//! game.branch("what-if", 1).unwrap();
//! game.checkout("what-if").unwrap();
//! game.move_stone(16, 3).unwrap();
//! ```

pub mod board;
pub mod game;
pub mod store;
