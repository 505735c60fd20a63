//! Board rule engine.
//!
//! Pure, serializable game state plus the Go rules that govern it: turn
//! order, captures, suicide and ko rejection, pass/game-over detection, and
//! area scoring. No I/O happens here; the version store persists whatever
//! state this module produces.

mod error;
mod group;
mod state;
mod types;

pub use error::MoveError;
pub use group::Group;
pub use state::{BoardState, MAX_DIMENSION};
pub use types::{Coord, InvalidBoardError, MoveRecord, PlayerId};
