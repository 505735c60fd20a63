//! Errors surfaced by the game layer.

use thiserror::Error;

use crate::board::{InvalidBoardError, MoveError};
use crate::store::{InvalidBranchName, StoreError};

pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, Error)]
pub enum GameError {
    /// an illegal move, reported verbatim from the rules engine
    #[error(transparent)]
    Move(#[from] MoveError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("invalid game configuration: {0}")]
    InvalidConfig(#[from] InvalidBoardError),

    #[error("invalid branch name: {0}")]
    InvalidBranch(#[from] InvalidBranchName),

    #[error("branch '{0}' does not exist")]
    UnknownBranch(String),

    #[error("branch '{0}' already exists")]
    BranchAlreadyExists(String),

    #[error("cannot go back {back} moves: history is too short")]
    HistoryTooShort { back: usize },

    #[error("game '{0}' not found")]
    GameNotFound(String),

    #[error("game '{0}' already exists")]
    GameAlreadyExists(String),

    #[error("HEAD is detached, check out a branch before moving")]
    DetachedHead,
}

impl GameError {
    /// true when the error is an illegal move rather than a system failure
    pub fn is_illegal_move(&self) -> bool {
        matches!(self, GameError::Move(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            GameError::GameNotFound(_) | GameError::UnknownBranch(_)
        ) || matches!(self, GameError::Store(e) if e.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_error_is_transparent() {
        let err: GameError = MoveError::Occupied { x: 3, y: 4 }.into();
        assert!(err.is_illegal_move());
        assert_eq!(err.to_string(), MoveError::Occupied { x: 3, y: 4 }.to_string());
    }

    #[test]
    fn test_not_found_classification() {
        assert!(GameError::GameNotFound("g".into()).is_not_found());
        assert!(GameError::UnknownBranch("b".into()).is_not_found());
        assert!(!GameError::DetachedHead.is_not_found());
    }
}
