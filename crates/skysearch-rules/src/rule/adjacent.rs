use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

use skysearch_core::{Board, ObjectCounts, SpaceObject};

use super::FillError;
use crate::{Qualifier, combin};

/// Relates two object kinds by adjacency.
///
/// With the `None` qualifier the rule places both kinds so that they never
/// touch; with `Every` it places the first kind and attaches witnesses of
/// the second kind next to every instance that lacks one, using minimal
/// covers so shared witnesses are found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacentRule {
    object1: SpaceObject,
    object2: SpaceObject,
    qualifier: Qualifier,
}

impl AdjacentRule {
    /// Creates a rule relating `object1` to `object2` by adjacency under
    /// `qualifier`.
    #[must_use]
    pub fn new(object1: SpaceObject, object2: SpaceObject, qualifier: Qualifier) -> Self {
        Self {
            object1,
            object2,
            qualifier,
        }
    }

    fn has_witness(&self, board: &Board, i: isize) -> bool {
        board.at(i - 1) == Some(self.object2) || board.at(i + 1) == Some(self.object2)
    }

    pub(super) fn is_satisfied(&self, board: &Board) -> bool {
        let instances = (0..board.len() as isize).filter(|&i| board.at(i) == Some(self.object1));
        let adjacent = instances.clone().filter(|&i| self.has_witness(board, i));
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
                Ok(combin::fill_no_touch(
                    self.object1,
                    num1,
                    self.object2,
                    num2,
                    board,
                ))
            }
            Qualifier::AtLeastOne => Err(FillError::UnsupportedQualifier {
                qualifier: self.qualifier,
            }),
            Qualifier::Every => {
                let mut with_obj1 = Vec::new();
                self.add_obj1(board.clone(), num1, 0, &mut with_obj1);
                let mut filled = Vec::new();
                for board in &with_obj1 {
                    self.attach_witnesses(board, num2, &mut filled);
                }
                Ok(filled)
            }
        }
    }

    /// Places the remaining first-kind instances, only in sectors that
    /// still have at least one side where a witness exists or could be
    /// placed.
    fn add_obj1(&self, board: Board, num: usize, start: isize, out: &mut Vec<Board>) {
        if num == 0 {
            out.push(board);
            return;
        }
        let len = board.len() as isize;
        for i in start..len {
            let open_side = |j: isize| board.at(j).is_none() || board.at(j) == Some(self.object2);
            if board.at(i).is_none() && (open_side(i - 1) || open_side(i + 1)) {
                let mut filled = board.clone();
                filled.set(i, Some(self.object1));
                self.add_obj1(filled, num - 1, i + 1, out);
            }
        }
    }

    /// Attaches second-kind witnesses next to every first-kind instance
    /// that lacks one, trying each minimal cover of the free neighboring
    /// sectors.
    fn attach_witnesses(&self, board: &Board, num2: usize, out: &mut Vec<Board>) {
        let len = board.len() as isize;
        let lone = (0..len)
            .filter(|&i| board.at(i) == Some(self.object1) && !self.has_witness(board, i))
            .collect::<Vec<_>>();
        let spots = lone
            .iter()
            .map(|&i| {
                let mut open = BTreeSet::new();
                if board.at(i - 1).is_none() {
                    open.insert((i - 1).rem_euclid(len) as usize);
                }
                if board.at(i + 1).is_none() {
                    open.insert((i + 1).rem_euclid(len) as usize);
                }
                open
            })
            .collect::<Vec<_>>();
        for cover in combin::minimal_covers(&spots) {
            if cover.len() > num2 {
                continue;
            }
            let mut filled = board.clone();
            for &i in &cover {
                filled.set(i as isize, Some(self.object2));
            }
            out.push(filled);
        }
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

impl Display for AdjacentRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} is adjacent to {} {}",
            self.qualifier,
            self.object1.name(),
            self.object2.article(),
            self.object2.name(),
        )
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    use SpaceObject::{Asteroid, BlackHole, DwarfPlanet, Empty, GasCloud};

    fn boards(strs: &[&str]) -> BTreeSet<Board> {
        strs.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn satisfied_every_needs_witness_for_each_instance() {
        let rule = AdjacentRule::new(GasCloud, Empty, Qualifier::Every);
        assert!(rule.is_satisfied(&"GE--GE".parse().unwrap()));
        assert!(!rule.is_satisfied(&"GE--G-".parse().unwrap()));
        assert!(rule.is_satisfied(&"------".parse().unwrap()));
    }

    #[test]
    fn satisfied_none_rejects_any_contact() {
        let rule = AdjacentRule::new(GasCloud, DwarfPlanet, Qualifier::None);
        assert!(rule.is_satisfied(&"G--D--".parse().unwrap()));
        assert!(!rule.is_satisfied(&"GD----".parse().unwrap()));
        // Wraparound contact.
        assert!(!rule.is_satisfied(&"G----D".parse().unwrap()));
    }

    #[test]
    fn fill_every_attaches_witnesses() {
        let rule = AdjacentRule::new(Asteroid, BlackHole, Qualifier::Every);
        let board = "--C--D".parse::<Board>().unwrap();
        let counts = ObjectCounts::from_pairs(&[(Asteroid, 2), (BlackHole, 2)]);
        let filled = rule
            .fill_board(&board, &counts)
            .unwrap()
            .into_iter()
            .collect::<BTreeSet<_>>();
        let expected = boards(&["ABCABD", "ABCBAD", "BACABD", "BACBAD"]);
        assert_eq!(filled, expected);
    }

    #[test]
    fn fill_every_shares_witnesses() {
        let rule = AdjacentRule::new(Asteroid, BlackHole, Qualifier::Every);
        let board = Board::new(5);
        let counts = ObjectCounts::from_pairs(&[(Asteroid, 2), (BlackHole, 2)]);
        let filled = rule.fill_board(&board, &counts).unwrap();
        for board in &filled {
            assert!(rule.is_satisfied(board));
        }
        // Every output is a rotation of ABA--, A-ABB, or AAB-B.
        let distinct = filled.iter().cloned().collect::<BTreeSet<_>>();
        assert_eq!(distinct.len(), filled.len());
        assert_eq!(filled.len(), 15);
    }

    #[test]
    fn fill_every_prunes_unwitnessable_instance() {
        let rule = AdjacentRule::new(Asteroid, BlackHole, Qualifier::Every);
        let board = "B---B".parse::<Board>().unwrap();
        let counts = ObjectCounts::from_pairs(&[(Asteroid, 3), (BlackHole, 2)]);
        assert!(rule.fill_board(&board, &counts).unwrap().is_empty());
    }

    #[test]
    fn fill_none_keeps_kinds_apart() {
        let rule = AdjacentRule::new(GasCloud, DwarfPlanet, Qualifier::None);
        let board = Board::new(6);
        let counts = ObjectCounts::from_pairs(&[(GasCloud, 1), (DwarfPlanet, 1)]);
        let filled = rule.fill_board(&board, &counts).unwrap();
        for board in &filled {
            assert!(rule.is_satisfied(board));
        }
        // 6 positions for the gas cloud, 3 non-adjacent ones for the dwarf.
        assert_eq!(filled.len(), 18);
    }

    #[test]
    fn fill_at_least_one_is_unsupported() {
        let rule = AdjacentRule::new(GasCloud, Empty, Qualifier::AtLeastOne);
        let counts = ObjectCounts::from_pairs(&[(GasCloud, 1), (Empty, 1)]);
        assert_eq!(
            rule.fill_board(&Board::new(6), &counts),
            Err(FillError::UnsupportedQualifier {
                qualifier: Qualifier::AtLeastOne
            }),
        );
    }

    #[test]
    fn affects_depends_on_qualifier() {
        let every = AdjacentRule::new(GasCloud, Empty, Qualifier::Every);
        assert_eq!(every.affects(), vec![GasCloud]);
        assert_eq!(every.adds(), vec![GasCloud, Empty]);
        let none = AdjacentRule::new(GasCloud, DwarfPlanet, Qualifier::None);
        assert_eq!(none.affects(), vec![GasCloud, DwarfPlanet]);
    }
}
