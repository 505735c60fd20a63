//! The board rule engine.
//!
//! `BoardState` is a pure value: move application is copy-on-write, so a
//! rejected move leaves the caller's state untouched and an accepted move
//! yields a brand-new state ready to be snapshotted. The serialized form is
//! exactly the persisted data model (dimensions, players, move log, stones);
//! everything else (groups, liberties, territory) is derived on demand.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::board::error::MoveError;
use crate::board::group::{self, Group};
use crate::board::types::{Coord, InvalidBoardError, MoveRecord, PlayerId};

/// upper bound on board edge length, mostly to keep flood fills and
/// serialized snapshots bounded
pub const MAX_DIMENSION: u32 = 255;

/// One immutable position in a game, including the full move log that
/// produced it.
///
/// Invariants (checked by [`BoardState::validate`] at construction and when
/// a snapshot is decoded):
/// - every stone coordinate is in bounds
/// - every stone owner and move author is one of `players`
/// - `players` holds at least two distinct ids
///
/// Whose turn it is falls out of the log: `players[moves.len() % players.len()]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardState {
    width: u32,
    height: u32,
    players: Vec<PlayerId>,
    moves: Vec<MoveRecord>,
    stones: BTreeMap<Coord, PlayerId>,
}

impl BoardState {
    /// Create an empty board. Turn order follows the order of `players`.
    pub fn new(width: u32, height: u32, players: Vec<PlayerId>) -> Result<Self, InvalidBoardError> {
        let state = Self {
            width,
            height,
            players,
            moves: Vec::new(),
            stones: BTreeMap::new(),
        };
        state.validate()?;
        Ok(state)
    }

    /// Check the structural invariants.
    ///
    /// Every construction boundary runs this, including snapshot decoding in
    /// the object store (a snapshot that fails here is treated as corrupt).
    pub fn validate(&self) -> Result<(), InvalidBoardError> {
        if self.width == 0 || self.height == 0 {
            return Err(InvalidBoardError::ZeroDimension);
        }
        let largest = self.width.max(self.height);
        if largest > MAX_DIMENSION {
            return Err(InvalidBoardError::DimensionTooLarge(largest));
        }

        if self.players.len() < 2 {
            return Err(InvalidBoardError::NotEnoughPlayers(self.players.len()));
        }
        let mut seen = BTreeSet::new();
        for player in &self.players {
            if !seen.insert(player) {
                return Err(InvalidBoardError::DuplicatePlayer(player.clone()));
            }
        }

        for (coord, owner) in &self.stones {
            if coord.x >= self.width || coord.y >= self.height {
                return Err(InvalidBoardError::StoneOutOfBounds { x: coord.x, y: coord.y });
            }
            if !self.players.contains(owner) {
                return Err(InvalidBoardError::UnknownPlayer(owner.clone()));
            }
        }

        for record in &self.moves {
            if !self.players.contains(record.player()) {
                return Err(InvalidBoardError::UnknownPlayer(record.player().clone()));
            }
        }

        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    pub fn moves(&self) -> &[MoveRecord] {
        &self.moves
    }

    /// non-empty positions only; absence means empty
    pub fn stones(&self) -> &BTreeMap<Coord, PlayerId> {
        &self.stones
    }

    pub fn stone_at(&self, x: u32, y: u32) -> Option<&PlayerId> {
        self.stones.get(&Coord::new(x, y))
    }

    /// the player whose turn it is, even after game over
    pub fn current_player(&self) -> &PlayerId {
        &self.players[self.moves.len() % self.players.len()]
    }

    /// Game over iff the two most recent records, regardless of which player
    /// produced them, are both passes.
    pub fn is_game_over(&self) -> bool {
        self.moves.len() >= 2 && self.moves[self.moves.len() - 2..].iter().all(MoveRecord::is_pass)
    }

    /// the chain containing the stone at `(x, y)`, if any
    pub fn group_at(&self, x: u32, y: u32) -> Option<Group> {
        group::group_at(self.width, self.height, &self.stones, Coord::new(x, y))
    }

    /// Place a stone for `player` at `(x, y)`.
    ///
    /// Captures any adjacent opposing group left without liberties, then
    /// rejects suicide and ko. On success returns the next state with the
    /// move appended to the log.
    pub fn place(&self, player: &PlayerId, x: u32, y: u32) -> Result<BoardState, MoveError> {
        if x >= self.width || y >= self.height {
            return Err(MoveError::OutOfBounds { x, y, width: self.width, height: self.height });
        }
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let expected = self.current_player();
        if player != expected {
            return Err(MoveError::NotYourTurn {
                player: player.clone(),
                expected: expected.clone(),
            });
        }
        let coord = Coord::new(x, y);
        if self.stones.contains_key(&coord) {
            return Err(MoveError::Occupied { x, y });
        }

        let mut next = self.clone();
        next.stones.insert(coord, player.clone());
        group::capture_dead_neighbors(self.width, self.height, &mut next.stones, coord, player);

        let own_liberties = group::group_at(self.width, self.height, &next.stones, coord)
            .map_or(0, |g| g.liberty_count());
        if own_liberties == 0 {
            return Err(MoveError::Suicide { x, y });
        }

        if !self.moves.is_empty() {
            let before_last = replay(self.width, self.height, &self.moves[..self.moves.len() - 1]);
            if next.stones == before_last {
                return Err(MoveError::Ko { x, y });
            }
        }

        next.moves.push(MoveRecord::Place { player: player.clone(), x, y });
        Ok(next)
    }

    /// Skip `player`'s turn. The second consecutive pass ends the game.
    pub fn pass_turn(&self, player: &PlayerId) -> Result<BoardState, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let expected = self.current_player();
        if player != expected {
            return Err(MoveError::NotYourTurn {
                player: player.clone(),
                expected: expected.clone(),
            });
        }

        let mut next = self.clone();
        next.moves.push(MoveRecord::Pass { player: player.clone() });
        Ok(next)
    }

    /// Area scoring: one point per stone, plus every empty region bordered
    /// by exactly one player. Mixed-border regions (dame) score for nobody.
    ///
    /// Meaningful once the game is over, but callable earlier as an estimate.
    pub fn score(&self) -> BTreeMap<PlayerId, u64> {
        let mut totals: BTreeMap<PlayerId, u64> =
            self.players.iter().map(|p| (p.clone(), 0)).collect();

        for owner in self.stones.values() {
            *totals.entry(owner.clone()).or_insert(0) += 1;
        }

        let mut seen: BTreeSet<Coord> = BTreeSet::new();
        for y in 0..self.height {
            for x in 0..self.width {
                let coord = Coord::new(x, y);
                if seen.contains(&coord) || self.stones.contains_key(&coord) {
                    continue;
                }
                let Some((region, borders)) =
                    group::empty_region(self.width, self.height, &self.stones, coord)
                else {
                    continue;
                };
                seen.extend(region.iter().copied());
                if borders.len() == 1 {
                    if let Some(owner) = borders.first() {
                        *totals.entry(owner.clone()).or_insert(0) += region.len() as u64;
                    }
                }
            }
        }

        totals
    }

    /// the player with the strictly highest score; a tie means no winner
    pub fn winner(&self) -> Option<PlayerId> {
        let totals = self.score();
        let best = *totals.values().max()?;
        let mut leaders = totals.iter().filter(|(_, score)| **score == best);
        let (first, _) = leaders.next()?;
        if leaders.next().is_some() {
            return None;
        }
        Some(first.clone())
    }
}

/// Rebuild the stone arrangement produced by a prefix of a legal move log:
/// apply each placement and resolve its captures, skipping passes. Legality
/// is not re-checked (the records were validated when accepted).
fn replay(width: u32, height: u32, moves: &[MoveRecord]) -> BTreeMap<Coord, PlayerId> {
    let mut stones = BTreeMap::new();
    for record in moves {
        if let MoveRecord::Place { player, x, y } = record {
            let coord = Coord::new(*x, *y);
            stones.insert(coord, player.clone());
            group::capture_dead_neighbors(width, height, &mut stones, coord, player);
        }
    }
    stones
}
