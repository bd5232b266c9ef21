use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

use skysearch_core::{Board, ObjectCounts, SpaceObject};

use super::FillError;
use crate::{Qualifier, combin};

/// Relates an object kind to other instances of its own kind by adjacency.
///
/// With the `Every` qualifier the instances must form runs of length at
/// least two (the asteroid rule); with `None` no two instances may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacentSelfRule {
    object: SpaceObject,
    qualifier: Qualifier,
}

impl AdjacentSelfRule {
    /// Creates a rule relating `object` to its own kind under `qualifier`.
    #[must_use]
    pub fn new(object: SpaceObject, qualifier: Qualifier) -> Self {
        Self { object, qualifier }
    }

    fn is_lone(&self, board: &Board, i: isize) -> bool {
        board.at(i) == Some(self.object)
            && board.at(i - 1) != Some(self.object)
            && board.at(i + 1) != Some(self.object)
    }

    pub(super) fn is_satisfied(&self, board: &Board) -> bool {
        let instances = (0..board.len() as isize).filter(|&i| board.at(i) == Some(self.object));
        let adjacent = instances.clone().filter(|&i| {
            board.at(i - 1) == Some(self.object) || board.at(i + 1) == Some(self.object)
        });
        match self.qualifier {
            Qualifier::None => adjacent.count() == 0,
            Qualifier::AtLeastOne => adjacent.count() > 0,
            Qualifier::Every => adjacent.count() == instances.count(),
        }
    }

    pub(super) fn fill_board(
        &self,
        board: &Board,
        counts: &ObjectCounts,
    ) -> Result<Vec<Board>, FillError> {
        let placed = board.num_objects()[self.object];
        let Some(num) = counts[self.object].checked_sub(placed) else {
            return Ok(Vec::new());
        };
        match self.qualifier {
            Qualifier::None => {
                if !self.is_satisfied(board) {
                    return Ok(Vec::new());
                }
                Ok(combin::fill_no_self_touch(self.object, num, board))
            }
            Qualifier::AtLeastOne => Err(FillError::UnsupportedQualifier {
                qualifier: self.qualifier,
            }),
            Qualifier::Every => Ok(self.fill_runs_everywhere(board, num)),
        }
    }

    /// Fills in all remaining instances so that every instance, already
    /// placed or new, sits in a run of length at least two.
    fn fill_runs_everywhere(&self, board: &Board, num: usize) -> Vec<Board> {
        let len = board.len() as isize;
        let lone = (0..len)
            .filter(|&i| self.is_lone(board, i))
            .map(|i| i as usize)
            .collect::<BTreeSet<_>>();
        let run_backwards = (0..len)
            .filter(|&i| board.at(i) == Some(self.object) && board.at(i - 1).is_none())
            .map(|i| i as usize)
            .collect::<BTreeSet<_>>();
        let mut prepared = Vec::new();
        self.prepare(board, num, &lone, &run_backwards, len - 1, &mut prepared);
        let mut filled = Vec::new();
        for (num, board) in &prepared {
            self.fill_runs(board.clone(), *num, 0, &mut filled);
        }
        filled
    }

    /// Repairs already-placed lone instances by extending them clockwise
    /// or growing their run counterclockwise, yielding the partially
    /// repaired boards with the instances still left to place.
    ///
    /// Scanning counterclockwise from `start` keeps the later clockwise
    /// pass from revisiting the same sectors, so no board is produced
    /// twice.
    fn prepare(
        &self,
        board: &Board,
        num: usize,
        lone: &BTreeSet<usize>,
        run_backwards: &BTreeSet<usize>,
        start: isize,
        out: &mut Vec<(usize, Board)>,
    ) {
        let obj = self.object;
        let len = board.len() as isize;
        if lone.is_empty() && run_backwards.is_empty() {
            out.push((num, board.clone()));
        }
        if start <= 0 {
            return;
        }
        for i in (0..=start).rev() {
            if board.at(i) != Some(obj) {
                continue;
            }
            if self.is_lone(board, i) && board.at(i + 1).is_none() && board.at(i + 2) != Some(obj) {
                if num > 0 {
                    let mut repaired = board.clone();
                    repaired.set(i + 1, Some(obj));
                    let mut lone = lone.clone();
                    lone.remove(&(i as usize));
                    self.prepare(&repaired, num - 1, &lone, run_backwards, i - 1, out);
                }
            }
            if board.at(i - 1).is_none() {
                let mut run_backwards = run_backwards.clone();
                run_backwards.remove(&(i as usize));
                if board.at(i + 1) == Some(obj) {
                    // Already part of a run; the sector behind it may stay
                    // free.
                    self.prepare(board, num, lone, &run_backwards, i - 1, out);
                }
                let mut grown = board.clone();
                let mut left = num;
                let mut j = i - 1;
                while left > 0 {
                    if j <= i - len {
                        break;
                    }
                    if board.at(j).is_none() {
                        grown.set(j, Some(obj));
                        left -= 1;
                        let mut lone = lone.clone();
                        lone.remove(&((j - 1).rem_euclid(len) as usize));
                        self.prepare(&grown.clone(), left, &lone, &run_backwards, j - 1, out);
                        j -= 1;
                    } else if board.at(j) == Some(obj) {
                        j -= 1;
                    } else {
                        break;
                    }
                }
            }
        }
    }

    /// Places the remaining instances as new runs or clockwise extensions
    /// of existing ones, keeping any lone instance repaired before
    /// yielding.
    fn fill_runs(&self, board: Board, num: usize, start: isize, out: &mut Vec<Board>) {
        let obj = self.object;
        if num == 0 {
            if self.is_satisfied(&board) {
                out.push(board);
            }
            return;
        }
        let len = board.len() as isize;
        // A lone instance must be repaired before anything else is placed.
        for i in (start - 1)..len {
            if self.is_lone(&board, i) {
                if board.at(i + 1).is_none() && board.at(i + 2) != Some(obj) {
                    let mut repaired = board.clone();
                    repaired.set(i + 1, Some(obj));
                    self.fill_runs(repaired, num - 1, start, out);
                }
                return;
            }
        }
        let run_starts = (0..len)
            .filter(|&i| board.at(i) == Some(obj) && board.at(i - 1) != Some(obj))
            .collect::<Vec<_>>();
        for i in 0..len {
            if board.at(i).is_some() {
                continue;
            }
            let in_last_run = match (run_starts.first(), run_starts.last()) {
                (Some(&first), Some(&last)) => i < first || i >= last,
                _ => true,
            };
            if in_last_run && board.at(i - 1) == Some(obj) && board.at(i + 1) != Some(obj) {
                let mut extended = board.clone();
                extended.set(i, Some(obj));
                self.fill_runs(extended, num - 1, start, out);
            } else if i >= start
                && num > 1
                && board.at(i - 1) != Some(obj)
                && board.at(i + 1) != Some(obj)
            {
                let mut started = board.clone();
                started.set(i, Some(obj));
                self.fill_runs(started, num - 1, i + 1, out);
            }
        }
    }

    pub(super) fn affects(&self) -> Vec<SpaceObject> {
        vec![self.object]
    }

    pub(super) fn adds(&self) -> Vec<SpaceObject> {
        vec![self.object]
    }
}

impl Display for AdjacentSelfRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} is adjacent to another {}",
            self.qualifier,
            self.object.name(),
            self.object.name(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    use SpaceObject::{Asteroid, Comet};

    fn asteroid_rule() -> AdjacentSelfRule {
        AdjacentSelfRule::new(Asteroid, Qualifier::Every)
    }

    fn counts(num: usize) -> ObjectCounts {
        ObjectCounts::from_pairs(&[(Asteroid, num)])
    }

    #[test]
    fn satisfied_every_requires_runs() {
        let rule = asteroid_rule();
        assert!(rule.is_satisfied(&"AA--AA".parse().unwrap()));
        assert!(rule.is_satisfied(&"A----A".parse().unwrap()));
        assert!(!rule.is_satisfied(&"AA-A--".parse().unwrap()));
        assert!(rule.is_satisfied(&"------".parse().unwrap()));
    }

    #[test]
    fn fill_extends_existing_run() {
        let rule = asteroid_rule();
        let board = "AA----".parse::<Board>().unwrap();
        let filled = rule
            .fill_board(&board, &counts(4))
            .unwrap()
            .into_iter()
            .collect::<BTreeSet<_>>();
        let expected = ["AAAA--", "AA-AA-", "AAA--A", "AA--AA"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect::<BTreeSet<Board>>();
        assert_eq!(filled, expected);
    }

    #[test]
    fn fill_enumerates_run_partitions() {
        let rule = asteroid_rule();
        let filled = rule.fill_board(&Board::new(6), &counts(4)).unwrap();
        for board in &filled {
            assert!(rule.is_satisfied(board));
            assert_eq!(board.num_objects()[Asteroid], 4);
        }
        let distinct = filled.iter().cloned().collect::<BTreeSet<_>>();
        assert_eq!(distinct.len(), filled.len());
        // One run of four (6 rotations) or two runs of two (3 rotations
        // of AA-AA-).
        assert_eq!(filled.len(), 9);
    }

    #[test]
    fn fill_keeps_unrelated_objects() {
        let rule = asteroid_rule();
        let board = "C--C--".parse::<Board>().unwrap();
        let filled = rule.fill_board(&board, &counts(2)).unwrap();
        let distinct = filled.iter().cloned().collect::<BTreeSet<_>>();
        assert_eq!(distinct.len(), filled.len());
        // A pair fits in sectors 1-2 or 4-5.
        assert_eq!(filled.len(), 2);
        for board in &filled {
            assert!(rule.is_satisfied(board));
            assert_eq!(board.num_objects()[Comet], 2);
        }
    }

    #[test]
    fn fill_none_spaces_instances() {
        let rule = AdjacentSelfRule::new(Asteroid, Qualifier::None);
        let filled = rule.fill_board(&Board::new(4), &counts(2)).unwrap();
        let distinct = filled.into_iter().collect::<BTreeSet<_>>();
        let expected = ["A-A-", "-A-A"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect::<BTreeSet<Board>>();
        assert_eq!(distinct, expected);
    }

    #[test]
    fn fill_prunes_overfull_board() {
        let rule = asteroid_rule();
        let board = "AA-AA-".parse::<Board>().unwrap();
        assert!(rule.fill_board(&board, &counts(2)).unwrap().is_empty());
    }
}
