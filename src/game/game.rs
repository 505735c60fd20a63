//! A game of go whose every move is a commit.
//!
//! Placing a stone or passing never mutates history: each turn builds the
//! next board, writes it as a snapshot behind a manifest and a commit, then
//! advances the current branch by compare-and-swap. A lost swap means
//! someone else moved first -- re-read their board and try the move there,
//! up to a small retry bound.

use std::collections::BTreeMap;

use crate::board::{BoardState, PlayerId};
use crate::game::config::GameConfig;
use crate::game::error::{GameError, GameResult};
use crate::store::{
    ancestors, nth_ancestor, BranchName, Commit, CommitBuilder, CommitId, Manifest, ObjectStore,
    RefTable, StoreError,
};

/// how many times a turn is retried when the branch tip moves underneath it
const MAX_COMMIT_RETRIES: usize = 3;

/// What a pass did to the game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PassOutcome {
    /// second consecutive pass, the game is finished
    GameOver,
    /// play continues with this player
    NextPlayer(PlayerId),
}

/// Commit message and author formatting, kept in one place so history
/// reads uniformly.
pub(crate) struct CommitMessage;

impl CommitMessage {
    pub(crate) fn root(name: &str) -> String {
        format!("new blank board for game: {name}")
    }

    pub(crate) fn place(player: &PlayerId, x: u32, y: u32) -> String {
        format!("{player} moved to ({x}, {y})")
    }

    pub(crate) fn pass(player: &PlayerId, game_over: bool) -> String {
        if game_over {
            format!("{player} skipped, game is over")
        } else {
            format!("{player} skipped, game is NOT over")
        }
    }

    pub(crate) fn author(name: &str) -> String {
        format!("game {name}")
    }
}

/// A handle on one game: its object store, its refs, and a cached copy of
/// the board at the commit this handle last saw.
///
/// Handles opened on the same store and refs see each other's moves; the
/// cache is only a fast path and is re-read whenever the branch tip has
/// moved past it.
#[derive(Debug, Clone)]
pub struct Game {
    name: String,
    store: ObjectStore,
    refs: RefTable,
    head: CommitId,
    board: BoardState,
}

impl Game {
    /// Start a new game: write the empty board as the root commit and point
    /// a fresh `main` branch at it.
    pub fn new(name: impl Into<String>, config: &GameConfig) -> GameResult<Self> {
        let name = name.into();
        let board = config.build_board()?;
        let store = ObjectStore::new();

        let snapshot = store.put_snapshot(&board)?;
        let manifest = store.put_manifest(&Manifest::for_board(snapshot))?;
        let head = CommitBuilder::new()
            .manifest(manifest)
            .message(CommitMessage::root(&name))
            .author(CommitMessage::author(&name))
            .commit(&store)?;

        let refs = RefTable::new(BranchName::main(), head);
        Ok(Self { name, store, refs, head, board })
    }

    /// Open a second handle on an existing game's store and refs, reading
    /// the board at the current HEAD.
    pub fn open(name: impl Into<String>, store: ObjectStore, refs: RefTable) -> GameResult<Self> {
        let head = refs.resolve_head()?;
        let board = materialize(&store, head)?;
        Ok(Self { name: name.into(), store, refs, head, board })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    pub fn refs(&self) -> &RefTable {
        &self.refs
    }

    /// the commit this handle last read or wrote
    pub fn head(&self) -> CommitId {
        self.head
    }

    /// the board at [`Game::head`]
    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn whose_turn(&self) -> PlayerId {
        self.board.current_player().clone()
    }

    pub fn is_over(&self) -> bool {
        self.board.is_game_over()
    }

    pub fn scores(&self) -> BTreeMap<PlayerId, u64> {
        self.board.score()
    }

    pub fn winner(&self) -> Option<PlayerId> {
        self.board.winner()
    }

    /// Place a stone at `(x, y)` for whoever's turn it is and commit the
    /// result. Returns the player who moved.
    pub fn move_stone(&mut self, x: u32, y: u32) -> GameResult<PlayerId> {
        self.commit_turn(|board| {
            let player = board.current_player().clone();
            let next = board.place(&player, x, y)?;
            let message = CommitMessage::place(&player, x, y);
            Ok((next, message, player))
        })
    }

    /// Pass the current player's turn and commit it. A second consecutive
    /// pass finishes the game.
    pub fn skip(&mut self) -> GameResult<PassOutcome> {
        self.commit_turn(|board| {
            let player = board.current_player().clone();
            let next = board.pass_turn(&player)?;
            let message = CommitMessage::pass(&player, next.is_game_over());
            let outcome = if next.is_game_over() {
                PassOutcome::GameOver
            } else {
                PassOutcome::NextPlayer(next.current_player().clone())
            };
            Ok((next, message, outcome))
        })
    }

    /// Fork a new branch at the commit `back` moves behind HEAD. `back = 0`
    /// branches at HEAD itself. Does not check the new branch out.
    pub fn branch(&self, name: &str, back: usize) -> GameResult<()> {
        let branch = BranchName::new(name)?;
        if self.refs.branch_exists(&branch) {
            return Err(GameError::BranchAlreadyExists(branch.to_string()));
        }

        let head = self.refs.resolve_head()?;
        let target = nth_ancestor(&self.store, head, back)?
            .ok_or(GameError::HistoryTooShort { back })?;

        match self.refs.create_branch(&branch, target) {
            Ok(()) => Ok(()),
            Err(StoreError::BranchAlreadyExists(name)) => {
                Err(GameError::BranchAlreadyExists(name))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Switch HEAD to another branch and load its board.
    pub fn checkout(&mut self, name: &str) -> GameResult<()> {
        let branch = BranchName::new(name)?;
        match self.refs.set_head(&branch) {
            Ok(()) => {}
            Err(StoreError::RefNotFound(name)) => return Err(GameError::UnknownBranch(name)),
            Err(e) => return Err(e.into()),
        }

        self.head = self.refs.resolve(&branch)?;
        self.board = materialize(&self.store, self.head)?;
        Ok(())
    }

    /// All branch names, sorted.
    pub fn branches(&self) -> Vec<String> {
        self.refs
            .list_branches()
            .into_iter()
            .map(|b| b.to_string())
            .collect()
    }

    /// History from this handle's head back toward the root, newest first,
    /// optionally truncated to `limit` commits.
    pub fn history(&self, limit: Option<usize>) -> GameResult<Vec<(CommitId, Commit)>> {
        let walk = ancestors(&self.store, self.head);
        let commits: Result<Vec<_>, _> = match limit {
            Some(n) => walk.take(n).collect(),
            None => walk.collect(),
        };
        Ok(commits?)
    }

    /// One turn: read the branch tip, apply the move to the board there,
    /// write the resulting objects, and swap the tip forward. Retries on a
    /// lost swap since the objects are already safely in the store.
    fn commit_turn<T>(
        &mut self,
        apply: impl Fn(&BoardState) -> GameResult<(BoardState, String, T)>,
    ) -> GameResult<T> {
        let branch = self.refs.current_branch().ok_or(GameError::DetachedHead)?;

        let mut attempts = 0;
        loop {
            let base = self.refs.resolve(&branch)?;
            let board = if base == self.head {
                self.board.clone()
            } else {
                materialize(&self.store, base)?
            };

            let (next, message, value) = apply(&board)?;

            let snapshot = self.store.put_snapshot(&next)?;
            let manifest = self.store.put_manifest(&Manifest::for_board(snapshot))?;
            let commit = CommitBuilder::new()
                .manifest(manifest)
                .parent(base)
                .message(message)
                .author(CommitMessage::author(&self.name))
                .commit(&self.store)?;

            match self.refs.update_branch(&branch, base, commit) {
                Ok(()) => {
                    self.head = commit;
                    self.board = next;
                    return Ok(value);
                }
                Err(e) if e.is_retriable() && attempts + 1 < MAX_COMMIT_RETRIES => {
                    attempts += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}

/// Load the board a commit points at: commit -> manifest -> board snapshot.
fn materialize(store: &ObjectStore, commit_id: CommitId) -> Result<BoardState, StoreError> {
    let commit = store.get_commit(commit_id)?;
    let manifest = store.get_manifest(commit.manifest)?;
    let snapshot = manifest.board().ok_or_else(|| StoreError::Corrupt {
        id: commit.manifest.raw(),
        reason: "manifest has no board entry".to_string(),
    })?;
    store.get_snapshot(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MoveError;

    fn small_game() -> Game {
        Game::new("test", &GameConfig::new().width(5).height(5)).unwrap()
    }

    #[test]
    fn test_new_game_has_root_commit() {
        let game = small_game();
        let history = game.history(None).unwrap();
        assert_eq!(history.len(), 1);

        let (_, root) = &history[0];
        assert!(root.is_root());
        assert_eq!(root.message, "new blank board for game: test");
        assert_eq!(root.author, "game test");
        assert_eq!(game.branches(), vec!["main"]);
    }

    #[test]
    fn test_move_commits_and_alternates() {
        let mut game = small_game();

        let mover = game.move_stone(2, 2).unwrap();
        assert_eq!(mover, PlayerId::black());
        assert_eq!(game.whose_turn(), PlayerId::white());
        assert_eq!(game.board().stone_at(2, 2), Some(&PlayerId::black()));

        let history = game.history(None).unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].1.message, "Black moved to (2, 2)");
    }

    #[test]
    fn test_illegal_move_leaves_history_alone() {
        let mut game = small_game();
        game.move_stone(2, 2).unwrap();
        let head = game.head();

        let err = game.move_stone(2, 2).unwrap_err();
        assert!(matches!(err, GameError::Move(MoveError::Occupied { .. })));
        assert_eq!(game.head(), head);
        assert_eq!(game.history(None).unwrap().len(), 2);
    }

    #[test]
    fn test_skip_outcomes_and_messages() {
        let mut game = small_game();
        game.move_stone(0, 0).unwrap();

        let outcome = game.skip().unwrap();
        assert_eq!(outcome, PassOutcome::NextPlayer(PlayerId::black()));
        assert!(!game.is_over());

        let outcome = game.skip().unwrap();
        assert_eq!(outcome, PassOutcome::GameOver);
        assert!(game.is_over());

        let history = game.history(Some(2)).unwrap();
        assert_eq!(history[0].1.message, "Black skipped, game is over");
        assert_eq!(history[1].1.message, "White skipped, game is NOT over");
    }

    #[test]
    fn test_move_after_game_over_rejected() {
        let mut game = small_game();
        game.skip().unwrap();
        game.skip().unwrap();

        let err = game.move_stone(0, 0).unwrap_err();
        assert!(matches!(err, GameError::Move(MoveError::GameOver)));
        let err = game.skip().unwrap_err();
        assert!(matches!(err, GameError::Move(MoveError::GameOver)));
    }

    #[test]
    fn test_branch_at_head_and_back() {
        let mut game = small_game();
        game.move_stone(0, 0).unwrap();
        game.move_stone(1, 0).unwrap();

        game.branch("at-head", 0).unwrap();
        game.branch("one-back", 1).unwrap();

        assert_eq!(game.branches(), vec!["at-head", "main", "one-back"]);
        assert_eq!(game.refs().resolve(&BranchName::new("at-head").unwrap()).unwrap(), game.head());
    }

    #[test]
    fn test_branch_too_far_back() {
        let mut game = small_game();
        game.move_stone(0, 0).unwrap();

        // history is root + one move, so back=2 walks past the root
        let err = game.branch("too-far", 2).unwrap_err();
        assert!(matches!(err, GameError::HistoryTooShort { back: 2 }));

        let err = game.branch("main", 0).unwrap_err();
        assert!(matches!(err, GameError::BranchAlreadyExists(_)));
    }

    #[test]
    fn test_checkout_rewinds_board() {
        let mut game = small_game();
        game.move_stone(2, 2).unwrap();
        game.move_stone(3, 3).unwrap();
        game.branch("rewind", 1).unwrap();

        game.checkout("rewind").unwrap();
        assert_eq!(game.board().stone_at(2, 2), Some(&PlayerId::black()));
        assert_eq!(game.board().stone_at(3, 3), None);
        // one move in means it is White's turn on this branch
        assert_eq!(game.whose_turn(), PlayerId::white());

        assert!(matches!(game.checkout("no-such"), Err(GameError::UnknownBranch(_))));
    }

    #[test]
    fn test_branches_diverge_independently() {
        let mut game = small_game();
        game.move_stone(2, 2).unwrap();
        game.branch("variation", 1).unwrap();

        game.checkout("variation").unwrap();
        game.move_stone(4, 4).unwrap();

        // the variation played elsewhere
        assert_eq!(game.board().stone_at(4, 4), Some(&PlayerId::black()));
        assert_eq!(game.board().stone_at(2, 2), None);

        // main still has the original line
        game.checkout("main").unwrap();
        assert_eq!(game.board().stone_at(2, 2), Some(&PlayerId::black()));
        assert_eq!(game.board().stone_at(4, 4), None);
    }

    #[test]
    fn test_second_handle_sees_first_handles_moves() {
        let mut first = small_game();
        let mut second =
            Game::open("test", first.store().clone(), first.refs().clone()).unwrap();

        first.move_stone(0, 0).unwrap();

        // second's cache is stale, but its next turn re-reads the tip
        let mover = second.move_stone(1, 1).unwrap();
        assert_eq!(mover, PlayerId::white());
        assert_eq!(second.board().stone_at(0, 0), Some(&PlayerId::black()));
        assert_eq!(second.history(None).unwrap().len(), 3);
    }

    #[test]
    fn test_detached_head_rejects_moves() {
        let mut game = small_game();
        game.move_stone(0, 0).unwrap();

        let root = nth_ancestor(game.store(), game.head(), 1).unwrap().unwrap();
        game.refs().detach_head(root);

        let err = game.move_stone(1, 1).unwrap_err();
        assert!(matches!(err, GameError::DetachedHead));
    }

    #[test]
    fn test_scores_and_winner_through_handle() {
        let mut game = small_game();
        game.move_stone(2, 2).unwrap();
        game.skip().unwrap();
        game.skip().unwrap();

        // one black stone owns the whole empty board
        let scores = game.scores();
        assert_eq!(scores[&PlayerId::black()], 25);
        assert_eq!(scores[&PlayerId::white()], 0);
        assert_eq!(game.winner(), Some(PlayerId::black()));
    }
}
