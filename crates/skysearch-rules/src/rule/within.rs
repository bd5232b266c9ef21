use std::fmt::{self, Display};

use skysearch_core::{Board, ObjectCounts, SpaceObject};

use super::FillError;
use crate::{Qualifier, combin};

/// Relates two object kinds by circular distance.
///
/// Two sectors are within `distance` of each other if the shorter way
/// around the circle between them is at most `distance` sectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WithinRule {
    object1: SpaceObject,
    object2: SpaceObject,
    qualifier: Qualifier,
    distance: usize,
}

impl WithinRule {
    /// Creates a rule relating `object1` to `object2` by circular distance
    /// at most `distance` under `qualifier`.
    #[must_use]
    pub fn new(
        object1: SpaceObject,
        object2: SpaceObject,
        qualifier: Qualifier,
        distance: usize,
    ) -> Self {
        Self {
            object1,
            object2,
            qualifier,
            distance,
        }
    }

    /// Checks the `None` qualifier with a single countdown scan, primed
    /// `distance` sectors before the seam so wraparound pairs are seen.
    fn is_satisfied_none(&self, board: &Board) -> bool {
        let mut prev = None;
        let mut countdown = 0usize;
        for i in -(self.distance as isize)..board.len() as isize {
            let cell = board.at(i);
            if cell == Some(self.object1) || cell == Some(self.object2) {
                if countdown != 0 && cell != prev {
                    return false;
                }
                prev = cell;
                countdown = self.distance;
            } else {
                countdown = countdown.saturating_sub(1);
            }
        }
        true
    }

    fn has_witness(&self, board: &Board, i: isize) -> bool {
        let distance = self.distance as isize;
        (i - distance..=i + distance).any(|j| board.at(j) == Some(self.object2))
    }

    pub(super) fn is_satisfied(&self, board: &Board) -> bool {
        if self.qualifier == Qualifier::None {
            return self.is_satisfied_none(board);
        }
        let instances = (0..board.len() as isize).filter(|&i| board.at(i) == Some(self.object1));
        let witnessed = instances.clone().filter(|&i| self.has_witness(board, i));
        match self.qualifier {
            Qualifier::None => unreachable!(),
            Qualifier::AtLeastOne => witnessed.count() > 0,
            Qualifier::Every => witnessed.count() == instances.count(),
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
            Qualifier::None => {
                if !self.is_satisfied(board) {
                    return Ok(Vec::new());
                }
                Ok(combin::fill_no_within(
                    self.object1,
                    num1,
                    self.object2,
                    num2,
                    board,
                    self.distance,
                ))
            }
            Qualifier::AtLeastOne => Err(FillError::UnsupportedQualifier {
                qualifier: self.qualifier,
            }),
            Qualifier::Every => Ok(self.fill_every(board, counts[self.object1], num1, num2, 0)),
        }
    }

    /// Gives every first-kind instance, existing or new, a second-kind
    /// witness in range, reusing witnesses already in reach where
    /// possible.
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
        let len = board.len() as isize;
        let distance = self.distance as isize;
        let mut filled = Vec::new();
        for i in start..len {
            let cell = board.at(i);
            let is_obj1 = cell == Some(self.object1);
            if cell.is_some() && !is_obj1 {
                continue;
            }
            if !is_obj1 && left1 == 0 {
                continue;
            }
            let mut options = 0;
            if self.has_witness(board, i) {
                options += 1;
                let mut placed = board.clone();
                placed.set(i, Some(self.object1));
                filled.extend(self.fill_every(
                    &placed,
                    need1 - 1,
                    left1 - usize::from(!is_obj1),
                    left2,
                    i + 1,
                ));
            } else if left2 > 0 {
                // Place a fresh witness on either side, skipping spots an
                // earlier instance would already have used.
                for j in i - distance..i {
                    let mut before = (j - distance).max(0)..j;
                    if board.at(j).is_none() && !before.any(|k| board.at(k) == Some(self.object1)) {
                        options += 1;
                        let mut placed = board.clone();
                        placed.set(i, Some(self.object1));
                        placed.set(j, Some(self.object2));
                        filled.extend(self.fill_every(
                            &placed,
                            need1 - 1,
                            left1 - usize::from(!is_obj1),
                            left2 - 1,
                            i + 1,
                        ));
                    }
                }
                let max_sector = (i + distance + 1).min(len + i - distance);
                for j in i + 1..max_sector {
                    let mut after = j + 1..(j + distance + 1).min(len);
                    if board.at(j).is_none() && !after.any(|k| board.at(k) == Some(self.object1)) {
                        options += 1;
                        let mut placed = board.clone();
                        placed.set(i, Some(self.object1));
                        placed.set(j, Some(self.object2));
                        filled.extend(self.fill_every(
                            &placed,
                            need1 - 1,
                            left1 - usize::from(!is_obj1),
                            left2 - 1,
                            i + 1,
                        ));
                    }
                }
            }
            if is_obj1 && options == 0 {
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

impl Display for WithinRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} is within {} sectors of {} {}",
            self.qualifier,
            self.object1.name(),
            self.distance,
            self.object2.article(),
            self.object2.name(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    use SpaceObject::{Asteroid, BlackHole};

    fn counts(num1: usize, num2: usize) -> ObjectCounts {
        ObjectCounts::from_pairs(&[(Asteroid, num1), (BlackHole, num2)])
    }

    fn boards(strs: &[&str]) -> BTreeSet<Board> {
        strs.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn satisfied_none_sees_wraparound_pairs() {
        let rule = WithinRule::new(Asteroid, BlackHole, Qualifier::None, 2);
        assert!(rule.is_satisfied(&"A--B--".parse().unwrap()));
        assert!(!rule.is_satisfied(&"A-B---".parse().unwrap()));
        assert!(!rule.is_satisfied(&"A----B".parse().unwrap()));
    }

    #[test]
    fn satisfied_every_measures_shorter_arc() {
        let rule = WithinRule::new(Asteroid, BlackHole, Qualifier::Every, 1);
        assert!(rule.is_satisfied(&"AB--AB".parse().unwrap()));
        assert!(!rule.is_satisfied(&"AB--A-".parse().unwrap()));
        assert!(rule.is_satisfied(&"A----B".parse().unwrap()));
    }

    #[test]
    fn fill_none_forces_maximum_separation() {
        let rule = WithinRule::new(Asteroid, BlackHole, Qualifier::None, 2);
        let filled = rule
            .fill_board(&Board::new(6), &counts(1, 1))
            .unwrap()
            .into_iter()
            .collect::<BTreeSet<_>>();
        // Distance 3 is the only legal separation on a 6-sector board.
        let expected = boards(&[
            "A--B--", "B--A--", "-A--B-", "-B--A-", "--A--B", "--B--A",
        ]);
        assert_eq!(filled, expected);
    }

    #[test]
    fn fill_every_places_witness_on_either_side() {
        let rule = WithinRule::new(Asteroid, BlackHole, Qualifier::Every, 1);
        let filled = rule
            .fill_board(&Board::new(4), &counts(1, 1))
            .unwrap()
            .into_iter()
            .collect::<BTreeSet<_>>();
        let expected = boards(&[
            "AB--", "BA--", "-AB-", "-BA-", "--AB", "--BA", "A--B", "B--A",
        ]);
        assert_eq!(filled, expected);
    }

    #[test]
    fn fill_every_shares_witnesses() {
        let rule = WithinRule::new(Asteroid, BlackHole, Qualifier::Every, 1);
        let filled = rule
            .fill_board(&Board::new(6), &counts(2, 1))
            .unwrap()
            .into_iter()
            .collect::<BTreeSet<_>>();
        let expected = boards(&[
            "ABA---", "-ABA--", "--ABA-", "---ABA", "A---AB", "BA---A",
        ]);
        assert_eq!(filled, expected);
    }

    #[test]
    fn fill_every_prunes_unreachable_instance() {
        let rule = WithinRule::new(Asteroid, BlackHole, Qualifier::Every, 1);
        let board = "A-C---".parse::<Board>().unwrap();
        let counts = ObjectCounts::from_pairs(&[
            (Asteroid, 1),
            (SpaceObject::Comet, 3),
            (BlackHole, 1),
        ]);
        // Both neighbors of the asteroid must stay free for comets.
        let board = {
            let mut b = board;
            b.set(5, Some(SpaceObject::Comet));
            b.set(1, Some(SpaceObject::Comet));
            b
        };
        assert!(rule.fill_board(&board, &counts).unwrap().is_empty());
    }
}
