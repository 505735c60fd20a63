//! Rule violations surfaced by move application.
//!
//! A rejected move never mutates the board; the caller keeps the state it
//! started from.

use thiserror::Error;

use crate::board::types::PlayerId;

/// the closed set of reasons a `place`/`pass_turn` can be rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoveError {
    /// target coordinate lies outside the grid
    #[error("({x}, {y}) is outside the {width}x{height} board")]
    OutOfBounds { x: u32, y: u32, width: u32, height: u32 },

    /// target coordinate already holds a stone
    #[error("({x}, {y}) is already occupied")]
    Occupied { x: u32, y: u32 },

    /// the placement would leave its own group with no liberties and
    /// captures nothing
    #[error("placing at ({x}, {y}) would be suicide")]
    Suicide { x: u32, y: u32 },

    /// the placement would recreate the arrangement from before the
    /// opponent's last move
    #[error("ko rule forbids replaying at ({x}, {y})")]
    Ko { x: u32, y: u32 },

    /// a player moved out of turn
    #[error("it is {expected}'s turn, not {player}'s")]
    NotYourTurn { player: PlayerId, expected: PlayerId },

    /// the game ended with consecutive passes; no further moves accepted
    #[error("the game is over")]
    GameOver,
}
