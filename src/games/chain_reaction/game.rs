//! Chain-reaction game implementation.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::board::{Board, Position};
use crate::cascade::CascadeProcessor;
use crate::core::{BoardSize, CascadePolicy, ConfigError, GameConfig, GameRng, MoveError, PlayerId, PlayerMap};
use crate::rules::{MoveReport, Phase, Placement, RulesEngine, TurnManager};

/// Read-only view of a game for rendering.
///
/// The grid is an O(1) structural-sharing clone; holding a snapshot never
/// blocks further moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub grid: Board,
    pub phase: Phase,
    pub current_player: PlayerId,
    pub player_order: Vec<PlayerId>,
    pub alive_players: Vec<PlayerId>,
    /// Owned-cell count per seat.
    pub cell_counts: PlayerMap<usize>,
    pub turn_number: u32,
    pub game_over: bool,
    pub winner: Option<PlayerId>,
}

/// A running game: board plus turn state.
#[derive(Clone, Debug)]
pub struct ChainReaction {
    config: GameConfig,
    seed: u64,
    board: Board,
    turns: TurnManager,
    cascade: CascadeProcessor,
}

/// Builder for creating a ChainReaction game.
///
/// Without an explicit `board_size` the board follows
/// [`BoardSize::recommended`] for the final seat count.
#[derive(Clone, Debug)]
pub struct GameBuilder {
    config: GameConfig,
    board_size: Option<BoardSize>,
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self {
            config: GameConfig::default(),
            board_size: None,
        }
    }
}

impl From<GameConfig> for GameBuilder {
    fn from(config: GameConfig) -> Self {
        Self {
            board_size: Some(BoardSize::new(config.rows, config.cols)),
            config,
        }
    }
}

impl GameBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player_count(mut self, count: usize) -> Self {
        self.config.player_count = count;
        self
    }

    pub fn board_size(mut self, rows: usize, cols: usize) -> Self {
        self.board_size = Some(BoardSize::new(rows, cols));
        self
    }

    pub fn capacity(mut self, capacity: u32) -> Self {
        self.config.capacity = capacity;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn player_order(mut self, order: Vec<PlayerId>) -> Self {
        self.config.player_order = Some(order);
        self
    }

    pub fn cascade_policy(mut self, policy: CascadePolicy) -> Self {
        self.config.cascade = policy;
        self
    }

    /// Build the game.
    pub fn build(mut self) -> Result<ChainReaction, ConfigError> {
        let size = self
            .board_size
            .unwrap_or_else(|| BoardSize::recommended(self.config.player_count));
        self.config.rows = size.rows;
        self.config.cols = size.cols;
        ChainReaction::new(self.config)
    }
}

impl ChainReaction {
    /// Start a game: empty board, seating order fixed, first seat to move.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => GameRng::new(seed),
            None => GameRng::from_entropy(),
        };
        let turns = match &config.player_order {
            Some(order) => TurnManager::new(order.clone()),
            None => TurnManager::shuffled(config.player_count, &mut rng),
        };

        debug!(
            "new {}-player game on {}x{} board, seed {}, order {:?}",
            config.player_count,
            config.rows,
            config.cols,
            rng.seed(),
            turns.order()
        );

        Ok(Self {
            board: Board::new(config.rows, config.cols, config.capacity),
            cascade: CascadeProcessor::new(config.cascade),
            seed: rng.seed(),
            config,
            turns,
        })
    }

    /// Seed the seating order was drawn from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.turns.current_player()
    }

    #[must_use]
    pub fn player_order(&self) -> &[PlayerId] {
        self.turns.order()
    }

    #[must_use]
    pub fn phase(&self) -> Phase {
        self.turns.phase()
    }

    #[must_use]
    pub fn turn_number(&self) -> u32 {
        self.turns.turn_number()
    }

    #[must_use]
    pub fn is_alive(&self, player: PlayerId) -> bool {
        self.turns.is_alive(player)
    }

    #[must_use]
    pub fn alive_players(&self) -> Vec<PlayerId> {
        self.turns.alive_players()
    }

    #[must_use]
    pub fn has_moved_first(&self, player: PlayerId) -> bool {
        self.turns.has_moved_first(player)
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.turns.is_over()
    }

    /// Read-only view for a renderer.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.board.clone(),
            phase: self.turns.phase(),
            current_player: self.turns.current_player(),
            player_order: self.turns.order().to_vec(),
            alive_players: self.turns.alive_players(),
            cell_counts: self.board.cell_counts(self.config.player_count),
            turn_number: self.turns.turn_number(),
            game_over: self.turns.is_over(),
            winner: self.turns.winner(),
        }
    }

    /// Place for the current player.
    pub fn play(&mut self, pos: Position) -> Result<MoveReport, MoveError> {
        let player = self.current_player();
        self.apply_move(player, pos)
    }
}

impl RulesEngine for ChainReaction {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn board(&self) -> &Board {
        &self.board
    }

    fn check_move(&self, player: PlayerId, pos: Position) -> Result<Placement, MoveError> {
        self.turns.check_placement(&self.board, player, pos)
    }

    fn apply_move(&mut self, player: PlayerId, pos: Position) -> Result<MoveReport, MoveError> {
        let placement = match self.check_move(player, pos) {
            Ok(placement) => placement,
            Err(err) => {
                debug!("rejected move by {} at {}: {}", player, pos, err);
                return Err(err);
            }
        };

        // Resolve on scratch copies; nothing is committed until every step succeeds.
        let mut board = self.board.clone();
        let mut turns = self.turns.clone();

        placement.apply(&mut board, player, pos)?;
        let cascade = self.cascade.run(&mut board)?;

        turns.record_move(player);
        let eliminated = turns.update_eliminations(&board);
        let winner = turns.check_winner()?;
        let next_player = match winner {
            Some(_) => None,
            None => Some(turns.advance()?),
        };

        debug!(
            "{} placed at {} ({:?}): {} explosions, next {:?}",
            player,
            pos,
            placement,
            cascade.explosions(),
            next_player
        );

        self.board = board;
        self.turns = turns;

        Ok(MoveReport {
            player,
            position: pos,
            placement,
            cascade,
            eliminated,
            winner,
            next_player,
        })
    }

    fn winner(&self) -> Option<PlayerId> {
        self.turns.winner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::core::{ErrorKind, IllegalReason};
    use crate::rules::MoveResult;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn two_player(rows: usize, cols: usize) -> ChainReaction {
        GameBuilder::new()
            .player_count(2)
            .board_size(rows, cols)
            .player_order(vec![P0, P1])
            .build()
            .unwrap()
    }

    #[test]
    fn test_game_creation() {
        let game = GameBuilder::new().player_count(3).seed(42).build().unwrap();

        assert_eq!(game.board().rows(), 8);
        assert_eq!(game.board().cols(), 8);
        assert_eq!(game.player_order().len(), 3);
        assert_eq!(game.current_player(), game.player_order()[0]);
        assert_eq!(game.turn_number(), 1);
        assert_eq!(game.seed(), 42);
        assert!(game.board().iter().all(|(_, c)| c.is_empty()));
        assert!(!game.is_terminal());
    }

    #[test]
    fn test_builder_keeps_size_regardless_of_call_order() {
        let game = GameBuilder::new()
            .board_size(1, 2)
            .player_count(2)
            .seed(3)
            .build()
            .unwrap();
        assert_eq!((game.board().rows(), game.board().cols()), (1, 2));

        let game = GameBuilder::new().player_count(4).seed(3).build().unwrap();
        assert_eq!((game.board().rows(), game.board().cols()), (9, 9));

        let config = GameConfig::for_players(2).with_board_size(3, 5).with_seed(3);
        let game = GameBuilder::from(config).player_count(3).build().unwrap();
        assert_eq!((game.board().rows(), game.board().cols()), (3, 5));
        assert_eq!(game.player_order().len(), 3);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = GameBuilder::new().player_count(5).build().unwrap_err();
        assert_eq!(err, ConfigError::PlayerCount(5));

        let err = GameBuilder::new().capacity(2).build().unwrap_err();
        assert!(matches!(err, ConfigError::CapacityTooLow { .. }));
    }

    #[test]
    fn test_seeded_order_is_reproducible() {
        let a = GameBuilder::new().player_count(4).seed(7).build().unwrap();
        let b = GameBuilder::new().player_count(4).seed(7).build().unwrap();
        assert_eq!(a.player_order(), b.player_order());
    }

    #[test]
    fn test_first_move_places_three() {
        let mut game = two_player(3, 3);

        let report = game.apply_move(P0, pos(1, 1)).unwrap();

        assert_eq!(report.placement, Placement::First);
        assert!(report.cascade.is_empty());
        assert_eq!(report.next_player, Some(P1));
        assert_eq!(game.board().get(pos(1, 1)).unwrap(), Cell::owned(P0, 3));
        assert!(game.has_moved_first(P0));
        assert!(!game.has_moved_first(P1));
        assert_eq!(game.current_player(), P1);
    }

    #[test]
    fn test_rejections_leave_state_untouched() {
        let mut game = two_player(3, 3);
        game.apply_move(P0, pos(0, 0)).unwrap();
        let before = game.snapshot();

        let err = game.apply_move(P0, pos(1, 1)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotYourTurn);

        let err = game.apply_move(P1, pos(0, 0)).unwrap_err();
        assert_eq!(
            err,
            MoveError::IllegalMove {
                player: P1,
                position: pos(0, 0),
                reason: IllegalReason::CellOccupied,
            }
        );

        let err = game.apply_move(P1, pos(3, 0)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::OutOfBounds);

        assert_eq!(game.snapshot(), before);
    }

    #[test]
    fn test_legal_moves() {
        let mut game = two_player(2, 2);
        assert_eq!(game.legal_moves(P0).len(), 4);
        assert!(game.legal_moves(P1).is_empty());

        game.apply_move(P0, pos(0, 0)).unwrap();
        assert_eq!(game.legal_moves(P1), vec![pos(0, 1), pos(1, 0), pos(1, 1)]);

        game.apply_move(P1, pos(1, 1)).unwrap();
        assert_eq!(game.legal_moves(P0), vec![pos(0, 0)]);
    }

    #[test]
    fn test_play_uses_current_player() {
        let mut game = two_player(2, 2);
        let report = game.play(pos(1, 0)).unwrap();
        assert_eq!(report.player, P0);
        assert_eq!(game.current_player(), P1);
    }

    #[test]
    fn test_snapshot_contents() {
        let mut game = two_player(2, 3);
        game.apply_move(P0, pos(0, 0)).unwrap();
        game.apply_move(P1, pos(1, 2)).unwrap();

        let snap = game.snapshot();
        assert_eq!(snap.current_player, P0);
        assert_eq!(snap.phase, Phase::AwaitingMove(P0));
        assert_eq!(snap.turn_number, 3);
        assert_eq!(snap.cell_counts[P0], 1);
        assert_eq!(snap.cell_counts[P1], 1);
        assert_eq!(snap.alive_players, vec![P0, P1]);
        assert!(!snap.game_over);
        assert_eq!(snap.grid.get(pos(1, 2)).unwrap(), Cell::owned(P1, 3));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut game = two_player(2, 2);
        let snap = game.snapshot();
        game.apply_move(P0, pos(0, 0)).unwrap();

        assert!(snap.grid.get(pos(0, 0)).unwrap().is_empty());
        assert_eq!(snap.turn_number, 1);
    }

    #[test]
    fn test_move_result_flattening() {
        let mut game = two_player(2, 2);
        let result = MoveResult::from(game.apply_move(P1, pos(0, 0)));
        assert!(!result.accepted);
        assert_eq!(result.reason, Some(ErrorKind::NotYourTurn));

        let result = MoveResult::from(game.apply_move(P0, pos(0, 0)));
        assert!(result.accepted);
        assert!(result.events.is_empty());
    }
}
