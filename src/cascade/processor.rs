//! Breadth-first explosion propagation.

use std::collections::VecDeque;

use log::{debug, trace, warn};
use rustc_hash::FxHashSet;

use super::{CascadeEvent, CascadeReport, EventKind};
use crate::board::{Board, Cell, Position};
use crate::core::{CascadePolicy, MoveError};

/// Drains every overloaded cell until the board is stable.
///
/// ## Ordering
///
/// - Wave 0 is seeded by a row-major scan for cells at or above capacity.
/// - The queue is FIFO; a neighbour armed by a wave-`n` explosion goes off
///   in wave `n + 1`.
/// - A cell sits in the queue at most once. Its power only grows while it
///   waits, so whatever it accumulated goes off in a single explosion and
///   any excess over the neighbour count is lost.
///
/// With capacity at least the neighbour count, explosions never create
/// power and the boundary absorbs some on every edge explosion, so the
/// queue always drains. `dequeue_limit` turns a violation of that argument
/// into an error instead of a hang.
#[derive(Clone, Copy, Debug, Default)]
pub struct CascadeProcessor {
    policy: CascadePolicy,
}

impl CascadeProcessor {
    #[must_use]
    pub fn new(policy: CascadePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> CascadePolicy {
        self.policy
    }

    /// Upper bound on queue entries for one cascade on `board`.
    #[must_use]
    pub fn dequeue_limit(board: &Board) -> usize {
        let capacity = board.capacity(Position::new(0, 0)) as usize;
        board.len() * capacity * (board.rows() + board.cols())
    }

    /// Resolve all explosions on `board`.
    ///
    /// On error the board is left mid-cascade; callers that need atomicity
    /// run this on a clone.
    pub fn run(&self, board: &mut Board) -> Result<CascadeReport, MoveError> {
        let mut queue: VecDeque<(Position, u32)> = VecDeque::new();
        let mut queued: FxHashSet<Position> = FxHashSet::default();

        let seeds: Vec<Position> = board.positions().filter(|&p| board.is_overloaded(p)).collect();
        for pos in seeds {
            queued.insert(pos);
            queue.push_back((pos, 0));
        }

        let limit = Self::dequeue_limit(board);
        let mut report = CascadeReport::default();

        while let Some((pos, wave)) = queue.pop_front() {
            queued.remove(&pos);

            if report.record_dequeue() > limit {
                warn!("cascade exceeded {} dequeues, aborting", limit);
                return Err(MoveError::InvariantViolation(format!(
                    "cascade did not settle within {} explosions",
                    limit
                )));
            }

            let cell = board.get(pos)?;
            let Some(owner) = cell.owner() else {
                return Err(MoveError::InvariantViolation(format!(
                    "unowned cell {} queued to explode",
                    pos
                )));
            };

            board.set(pos, Cell::EMPTY)?;
            trace!("wave {}: {} explodes for {} with power {}", wave, pos, owner, cell.power());
            report.push(CascadeEvent {
                cell: pos,
                wave,
                kind: EventKind::Exploded {
                    owner,
                    power: cell.power(),
                },
            });

            for next in board.neighbors(pos) {
                let target = board.cell_mut(next)?;
                let previous_owner = target.charge(owner);
                let power = target.power();
                let captured = previous_owner != Some(owner);

                let kind = if captured {
                    EventKind::Captured {
                        from: pos,
                        previous_owner,
                    }
                } else {
                    EventKind::Reinforced { from: pos }
                };
                report.push(CascadeEvent {
                    cell: next,
                    wave,
                    kind,
                });

                if self.arms(board.capacity(next), power, captured) && queued.insert(next) {
                    queue.push_back((next, wave + 1));
                }
            }
        }

        if !report.is_empty() {
            debug!(
                "cascade settled: {} explosions over {} waves",
                report.explosions(),
                report.wave_count()
            );
        }

        Ok(report)
    }

    fn arms(&self, capacity: u32, power: u32, captured: bool) -> bool {
        power >= capacity
            || (self.policy.explode_on_conversion_at_threshold && captured && power + 1 == capacity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PlayerId;

    const P0: PlayerId = PlayerId(0);
    const P1: PlayerId = PlayerId(1);

    fn pos(row: usize, col: usize) -> Position {
        Position::new(row, col)
    }

    fn board_with(rows: usize, cols: usize, cells: &[((usize, usize), Cell)]) -> Board {
        let mut board = Board::new(rows, cols, 4);
        for &((r, c), cell) in cells {
            board.set(pos(r, c), cell).unwrap();
        }
        board
    }

    fn assert_stable(board: &Board) {
        for (p, cell) in board.iter() {
            assert!(cell.power() < board.capacity(p), "{} still overloaded", p);
        }
    }

    #[test]
    fn test_stable_board_is_noop() {
        let mut board = board_with(2, 2, &[((0, 0), Cell::owned(P0, 3))]);
        let before = board.clone();

        let report = CascadeProcessor::default().run(&mut board).unwrap();

        assert!(report.is_empty());
        assert_eq!(report.dequeues(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn test_interior_explosion_feeds_four() {
        let mut board = board_with(3, 3, &[((1, 1), Cell::owned(P0, 4))]);

        let report = CascadeProcessor::default().run(&mut board).unwrap();

        assert_eq!(report.explosions(), 1);
        assert_eq!(report.wave_count(), 1);
        assert!(board.get(pos(1, 1)).unwrap().is_empty());
        for n in [pos(0, 1), pos(2, 1), pos(1, 0), pos(1, 2)] {
            assert_eq!(board.get(n).unwrap(), Cell::owned(P0, 1));
        }
        assert_eq!(board.total_power(), 4);

        let targets: Vec<_> = report.events().iter().skip(1).map(|e| e.cell).collect();
        assert_eq!(targets, vec![pos(0, 1), pos(2, 1), pos(1, 0), pos(1, 2)]);
    }

    #[test]
    fn test_corner_and_edge_explosions() {
        let mut corner = board_with(3, 3, &[((0, 0), Cell::owned(P0, 4))]);
        CascadeProcessor::default().run(&mut corner).unwrap();
        assert_eq!(corner.total_power(), 2);
        assert_eq!(corner.owned_cells(P0), vec![pos(0, 1), pos(1, 0)]);

        let mut edge = board_with(3, 3, &[((2, 1), Cell::owned(P1, 4))]);
        CascadeProcessor::default().run(&mut edge).unwrap();
        assert_eq!(edge.total_power(), 3);
        assert_eq!(edge.owned_cells(P1), vec![pos(1, 1), pos(2, 0), pos(2, 2)]);
    }

    #[test]
    fn test_chain_assigns_waves() {
        let mut board = board_with(
            1,
            3,
            &[
                ((0, 0), Cell::owned(P0, 4)),
                ((0, 1), Cell::owned(P1, 3)),
                ((0, 2), Cell::owned(P1, 3)),
            ],
        );

        let report = CascadeProcessor::default().run(&mut board).unwrap();

        let explosions: Vec<_> = report
            .events()
            .iter()
            .filter(|e| e.is_explosion())
            .map(|e| (e.cell, e.wave))
            .collect();
        assert_eq!(explosions, vec![(pos(0, 0), 0), (pos(0, 1), 1), (pos(0, 2), 2)]);
        assert_eq!(report.wave_count(), 3);

        assert_eq!(
            report.events()[1].kind,
            EventKind::Captured {
                from: pos(0, 0),
                previous_owner: Some(P1),
            }
        );

        assert_eq!(board.get(pos(0, 0)).unwrap(), Cell::owned(P0, 1));
        assert_eq!(board.get(pos(0, 1)).unwrap(), Cell::owned(P0, 1));
        assert!(board.get(pos(0, 2)).unwrap().is_empty());
        assert_eq!(board.owned_count(P1), 0);
    }

    #[test]
    fn test_wave_zero_is_row_major() {
        let mut board = board_with(
            2,
            3,
            &[((1, 0), Cell::owned(P0, 4)), ((0, 2), Cell::owned(P1, 4))],
        );

        let report = CascadeProcessor::default().run(&mut board).unwrap();

        let wave0: Vec<_> = report
            .events_in_wave(0)
            .filter(|e| e.is_explosion())
            .map(|e| e.cell)
            .collect();
        assert_eq!(wave0, vec![pos(0, 2), pos(1, 0)]);
    }

    #[test]
    fn test_overfilled_cell_explodes_once() {
        let mut board = board_with(
            3,
            3,
            &[
                ((0, 1), Cell::owned(P0, 4)),
                ((1, 0), Cell::owned(P0, 4)),
                ((0, 0), Cell::owned(P0, 3)),
            ],
        );

        let report = CascadeProcessor::default().run(&mut board).unwrap();

        assert_eq!(report.explosions(), 3);
        let corner: Vec<_> = report
            .events()
            .iter()
            .filter(|e| e.is_explosion() && e.cell == pos(0, 0))
            .collect();
        assert_eq!(corner.len(), 1);
        assert_eq!(corner[0].wave, 1);
        assert_eq!(corner[0].kind, EventKind::Exploded { owner: P0, power: 5 });

        assert!(board.get(pos(0, 0)).unwrap().is_empty());
        assert_eq!(board.get(pos(1, 1)).unwrap(), Cell::owned(P0, 2));
        assert_eq!(board.total_power(), 6);
        assert_stable(&board);
    }

    #[test]
    fn test_reinforcement_is_not_a_capture() {
        let mut board = board_with(
            1,
            2,
            &[((0, 0), Cell::owned(P0, 4)), ((0, 1), Cell::owned(P0, 1))],
        );

        let report = CascadeProcessor::default().run(&mut board).unwrap();

        assert_eq!(
            report.events()[1].kind,
            EventKind::Reinforced { from: pos(0, 0) }
        );
        assert_eq!(board.get(pos(0, 1)).unwrap(), Cell::owned(P0, 2));
    }

    fn conversion_board() -> Board {
        board_with(
            1,
            3,
            &[
                ((0, 0), Cell::owned(P0, 4)),
                ((0, 1), Cell::owned(P1, 2)),
                ((0, 2), Cell::owned(P1, 1)),
            ],
        )
    }

    #[test]
    fn test_classic_policy_leaves_capture_at_threshold() {
        let mut board = conversion_board();
        let report = CascadeProcessor::new(CascadePolicy::classic()).run(&mut board).unwrap();

        assert_eq!(report.explosions(), 1);
        assert_eq!(board.get(pos(0, 1)).unwrap(), Cell::owned(P0, 3));
        assert_eq!(board.get(pos(0, 2)).unwrap(), Cell::owned(P1, 1));
    }

    #[test]
    fn test_division_policy_explodes_capture_at_threshold() {
        let mut board = conversion_board();
        let report = CascadeProcessor::new(CascadePolicy::division()).run(&mut board).unwrap();

        assert_eq!(report.explosions(), 2);
        assert_eq!(board.get(pos(0, 0)).unwrap(), Cell::owned(P0, 1));
        assert!(board.get(pos(0, 1)).unwrap().is_empty());
        assert_eq!(board.get(pos(0, 2)).unwrap(), Cell::owned(P0, 2));
    }

    #[test]
    fn test_division_policy_ignores_own_cells() {
        let mut board = board_with(
            1,
            3,
            &[((0, 0), Cell::owned(P0, 4)), ((0, 1), Cell::owned(P0, 2))],
        );
        let report = CascadeProcessor::new(CascadePolicy::division()).run(&mut board).unwrap();

        assert_eq!(report.explosions(), 1);
        assert_eq!(board.get(pos(0, 1)).unwrap(), Cell::owned(P0, 3));
    }

    #[test]
    fn test_dense_board_terminates_within_bound() {
        for n in [3usize, 5, 8, 9, 12] {
            let mut board = Board::new(n, n, 4);
            for p in board.positions().collect::<Vec<_>>() {
                let owner = if (p.row + p.col) % 2 == 0 { P0 } else { P1 };
                board.set(p, Cell::owned(owner, 3)).unwrap();
            }
            board.set(pos(n / 2, n / 2), Cell::owned(P0, 4)).unwrap();

            let report = CascadeProcessor::default().run(&mut board).unwrap();

            assert!(report.dequeues() <= n * n * 4, "{}x{}: {}", n, n, report.dequeues());
            assert_stable(&board);
        }
    }

    #[test]
    fn test_single_cell_board_dissipates() {
        let mut board = board_with(1, 1, &[((0, 0), Cell::owned(P0, 4))]);
        let report = CascadeProcessor::default().run(&mut board).unwrap();

        assert_eq!(report.explosions(), 1);
        assert_eq!(report.events().len(), 1);
        assert_eq!(board.total_power(), 0);
    }
}
