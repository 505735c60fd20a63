//! core value types for the board rule engine.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A validated player identifier.
///
/// Player names are restricted so they can appear verbatim in commit
/// messages and authors without escaping:
/// - 1-32 characters
/// - Alphanumeric, underscores, hyphens only
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(String);

impl PlayerId {
    /// create a new PlayerId, validating the input
    pub fn new(name: impl Into<String>) -> Result<Self, InvalidBoardError> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(Self(name))
    }

    fn validate(name: &str) -> Result<(), InvalidBoardError> {
        if name.is_empty() {
            return Err(InvalidBoardError::EmptyPlayerName);
        }

        if name.len() > 32 {
            return Err(InvalidBoardError::PlayerNameTooLong(name.len()));
        }

        for (i, c) in name.chars().enumerate() {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '-' {
                return Err(InvalidBoardError::InvalidPlayerNameCharacter { char: c, position: i });
            }
        }

        Ok(())
    }

    /// the conventional first player
    pub fn black() -> Self {
        Self("Black".to_string())
    }

    /// the conventional second player
    pub fn white() -> Self {
        Self("White".to_string())
    }

    /// get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// convert to owned String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PlayerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A grid coordinate. `(0, 0)` is a corner; valid coordinates satisfy
/// `x < width` and `y < height` of the board they are used on.
///
/// Serialized as the string `"x,y"` so stone maps become JSON objects with
/// deterministic key order (required for content hashing).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub x: u32,
    pub y: u32,
}

impl Coord {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&format_args!("{},{}", self.x, self.y))
    }
}

struct CoordVisitor;

impl Visitor<'_> for CoordVisitor {
    type Value = Coord;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a coordinate string of the form \"x,y\"")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Coord, E> {
        let (x, y) = value
            .split_once(',')
            .ok_or_else(|| E::custom(format!("malformed coordinate: {value:?}")))?;
        let x = x
            .parse()
            .map_err(|_| E::custom(format!("malformed coordinate: {value:?}")))?;
        let y = y
            .parse()
            .map_err(|_| E::custom(format!("malformed coordinate: {value:?}")))?;
        Ok(Coord { x, y })
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(CoordVisitor)
    }
}

/// One entry in a board's move log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MoveRecord {
    /// a stone placed at `(x, y)`
    Place { player: PlayerId, x: u32, y: u32 },
    /// a skipped turn
    Pass { player: PlayerId },
}

impl MoveRecord {
    /// the player who produced this record
    pub fn player(&self) -> &PlayerId {
        match self {
            MoveRecord::Place { player, .. } => player,
            MoveRecord::Pass { player } => player,
        }
    }

    pub fn is_pass(&self) -> bool {
        matches!(self, MoveRecord::Pass { .. })
    }
}

/// error type for invalid board construction (dimensions, players, stones)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidBoardError {
    EmptyPlayerName,
    PlayerNameTooLong(usize),
    InvalidPlayerNameCharacter { char: char, position: usize },
    ZeroDimension,
    DimensionTooLarge(u32),
    NotEnoughPlayers(usize),
    DuplicatePlayer(PlayerId),
    StoneOutOfBounds { x: u32, y: u32 },
    UnknownPlayer(PlayerId),
}

impl fmt::Display for InvalidBoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPlayerName => write!(f, "player name cannot be empty"),
            Self::PlayerNameTooLong(len) => write!(f, "player name too long: {} characters", len),
            Self::InvalidPlayerNameCharacter { char, position } => {
                write!(f, "invalid character '{}' at position {} in player name", char, position)
            }
            Self::ZeroDimension => write!(f, "board dimensions must be at least 1x1"),
            Self::DimensionTooLarge(dim) => write!(f, "board dimension too large: {}", dim),
            Self::NotEnoughPlayers(n) => write!(f, "a game needs at least 2 players, got {}", n),
            Self::DuplicatePlayer(p) => write!(f, "duplicate player: {}", p),
            Self::StoneOutOfBounds { x, y } => {
                write!(f, "stone at ({}, {}) is outside the board", x, y)
            }
            Self::UnknownPlayer(p) => write!(f, "player {} is not part of this game", p),
        }
    }
}

impl std::error::Error for InvalidBoardError {}
