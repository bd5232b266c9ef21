use std::fmt::{self, Display};

use skysearch_core::{Board, ObjectCounts, SpaceObject};

use super::FillError;
use crate::{Qualifier, combin};

/// Relates two object kinds by diametrically opposite placement.
///
/// Sector `i` is opposite sector `i + N/2` on an `N`-sector board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OppositeRule {
    object1: SpaceObject,
    object2: SpaceObject,
    qualifier: Qualifier,
}

impl OppositeRule {
    /// Creates a rule relating `object1` to `object2` by opposite
    /// placement under `qualifier`.
    #[must_use]
    pub fn new(object1: SpaceObject, object2: SpaceObject, qualifier: Qualifier) -> Self {
        Self {
            object1,
            object2,
            qualifier,
        }
    }

    pub(super) fn is_satisfied(&self, board: &Board) -> bool {
        let half = board.len() as isize / 2;
        let instances = (0..board.len() as isize).filter(|&i| board.at(i) == Some(self.object1));
        let opposite = instances
            .clone()
            .filter(|&i| board.at(i + half) == Some(self.object2));
        match self.qualifier {
            Qualifier::None => opposite.count() == 0,
            Qualifier::AtLeastOne => opposite.count() > 0,
            Qualifier::Every => opposite.count() == instances.count(),
        }
    }

    pub(super) fn fill_board(
        &self,
        board: &Board,
        counts: &ObjectCounts,
    ) -> Result<Vec<Board>, FillError> {
        let placed = board.num_objects();
        let Some(num1) = counts[self.object1].checked_sub(placed[self.object1]) else {
            return Ok(Vec::new());
        };
        let Some(num2) = counts[self.object2].checked_sub(placed[self.object2]) else {
            return Ok(Vec::new());
        };
        match self.qualifier {
            Qualifier::None => Ok(self.fill_none(board, num1, num2)),
            Qualifier::AtLeastOne => Err(FillError::UnsupportedQualifier {
                qualifier: self.qualifier,
            }),
            Qualifier::Every => Ok(self.fill_every(board, counts[self.object1], num1, num2, 0)),
        }
    }

    /// Fills every free sector from a multiset permutation of the
    /// remaining objects, keeping the boards that avoid opposite pairs.
    fn fill_none(&self, board: &Board, num1: usize, num2: usize) -> Vec<Board> {
        if !self.is_satisfied(board) {
            return Vec::new();
        }
        let free = board.iter().filter(Option::is_none).count();
        let Some(num_none) = free.checked_sub(num1 + num2) else {
            return Vec::new();
        };
        let perms = combin::multiset_permutations(&[
            (Some(self.object1), num1),
            (Some(self.object2), num2),
            (None, num_none),
        ]);
        perms
            .into_iter()
            .map(|perm| {
                let mut filled = board.clone();
                let mut next = perm.into_iter();
                for i in 0..filled.len() as isize {
                    if filled.at(i).is_none()
                        && let Some(cell) = next.next()
                    {
                        filled.set(i, cell);
                    }
                }
                filled
            })
            .filter(|filled| self.is_satisfied(filled))
            .collect()
    }

    /// Pairs every first-kind instance, existing or new, with a
    /// second-kind instance in the opposite sector.
    ///
    /// `need1` counts the pairings still required, `left1` and `left2` the
    /// instances still available to place. An existing instance whose
    /// opposite sector can no longer host a witness makes the whole branch
    /// unsatisfiable.
    fn fill_every(
        &self,
        board: &Board,
        need1: usize,
        left1: usize,
        left2: usize,
        start: isize,
    ) -> Vec<Board> {
        if need1 == 0 {
            return vec![board.clone()];
        }
        let half = board.len() as isize / 2;
        let mut filled = Vec::new();
        for i in start..board.len() as isize {
            let cell = board.at(i);
            let is_obj1 = cell == Some(self.object1);
            if cell.is_some() && !is_obj1 {
                continue;
            }
            let opposite = board.at(i + half);
            let witnessed = opposite == Some(self.object2);
            let can_witness = witnessed || (opposite.is_none() && left2 > 0);
            if can_witness && (is_obj1 || left1 > 0) {
                let mut paired = board.clone();
                paired.set(i, Some(self.object1));
                paired.set(i + half, Some(self.object2));
                filled.extend(self.fill_every(
                    &paired,
                    need1 - 1,
                    left1 - usize::from(!is_obj1),
                    left2 - usize::from(!witnessed),
                    i + 1,
                ));
            }
            if is_obj1 && !can_witness {
                return Vec::new();
            }
        }
        filled
    }

    pub(super) fn affects(&self) -> Vec<SpaceObject> {
        match self.qualifier {
            Qualifier::Every => vec![self.object1],
            _ => vec![self.object1, self.object2],
        }
    }

    pub(super) fn adds(&self) -> Vec<SpaceObject> {
        vec![self.object1, self.object2]
    }
}

impl Display for OppositeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} is directly opposite {} {}",
            self.qualifier,
            self.object1.name(),
            self.object2.article(),
            self.object2.name(),
        )
    }
}
