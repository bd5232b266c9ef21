use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

use skysearch_core::{Board, ObjectCounts, SpaceObject};

use crate::combin;

/// Confines an object kind to an explicit set of allowed sectors.
///
/// This is the only immediately limiting rule: its forbidden sectors are
/// known before anything is placed, so the pipeline can run it first and
/// the board-type setup can subtract the disallowed sectors up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorsRule {
    object: SpaceObject,
    positions: BTreeSet<usize>,
    board_size: usize,
}

impl SectorsRule {
    /// Creates a rule confining `object` to `positions` (0-based sector
    /// indices) on a board with `board_size` sectors.
    #[must_use]
    pub fn new(object: SpaceObject, positions: BTreeSet<usize>, board_size: usize) -> Self {
        Self {
            object,
            positions,
            board_size,
        }
    }

    /// The comet rule: comets sit only in prime-numbered sectors, with
    /// sectors numbered from 1.
    #[must_use]
    pub fn comet(board_size: usize) -> Self {
        Self::new(SpaceObject::Comet, prime_sectors(board_size), board_size)
    }

    pub(super) fn is_satisfied(&self, board: &Board) -> bool {
        board
            .iter()
            .enumerate()
            .filter(|&(_, cell)| cell == Some(self.object))
            .all(|(i, _)| self.positions.contains(&i))
    }

    pub(super) fn fill_board(&self, board: &Board, counts: &ObjectCounts) -> Vec<Board> {
        if !self.is_satisfied(board) {
            return Vec::new();
        }
        let placed = board.num_objects()[self.object];
        let Some(num) = counts[self.object].checked_sub(placed) else {
            return Vec::new();
        };
        let open = self
            .positions
            .iter()
            .copied()
            .filter(|&i| board.at(i as isize).is_none())
            .collect::<Vec<_>>();
        combin::combinations(&open, num)
            .into_iter()
            .map(|chosen| {
                let mut filled = board.clone();
                for i in chosen {
                    filled.set(i as isize, Some(self.object));
                }
                filled
            })
            .collect()
    }

    pub(super) fn affects(&self) -> Vec<SpaceObject> {
        vec![self.object]
    }

    pub(super) fn adds(&self) -> Vec<SpaceObject> {
        vec![self.object]
    }

    pub(super) fn disallowed_sectors(&self) -> Vec<(SpaceObject, BTreeSet<usize>)> {
        let forbidden = (0..self.board_size)
            .filter(|i| !self.positions.contains(i))
            .collect();
        vec![(self.object, forbidden)]
    }
}

impl Display for SectorsRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "every {} is in sector", self.object.name())?;
        for (n, i) in self.positions.iter().enumerate() {
            let sep = if n == 0 { " " } else { ", " };
            write!(f, "{sep}{}", i + 1)?;
        }
        Ok(())
    }
}

/// Returns the 0-based indices of prime-numbered sectors (1-based) on a
/// board with `board_size` sectors.
fn prime_sectors(board_size: usize) -> BTreeSet<usize> {
    (2..=board_size).filter(|&n| is_prime(n)).map(|n| n - 1).collect()
}

fn is_prime(n: usize) -> bool {
    n >= 2 && (2..n).take_while(|d| d * d <= n).all(|d| n % d != 0)
}
