//! Game configuration.

use crate::board::{BoardState, InvalidBoardError, PlayerId};

/// Settings for a new game. Defaults to a standard 19x19 board with
/// players "Black" and "White".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    pub width: u32,
    pub height: u32,
    pub players: Vec<PlayerId>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 19,
            height: 19,
            players: vec![PlayerId::black(), PlayerId::white()],
        }
    }
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = width;
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = height;
        self
    }

    pub fn players(mut self, players: Vec<PlayerId>) -> Self {
        self.players = players;
        self
    }

    /// Build the empty starting board, validating the dimensions and
    /// player list.
    pub fn build_board(&self) -> Result<BoardState, InvalidBoardError> {
        BoardState::new(self.width, self.height, self.players.clone())
    }
}
