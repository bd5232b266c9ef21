use std::fmt::{self, Display};

use skysearch_core::{Board, ObjectCounts, SpaceObject};

/// Excludes an object kind from sectors adjacent to specific other kinds.
///
/// `affects` includes the excluded kinds: when one of them is placed after
/// this rule's stage, the pipeline re-validates the rule on the finished
/// board.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborExclusionRule {
    object: SpaceObject,
    excluded: Vec<SpaceObject>,
}

impl NeighborExclusionRule {
    /// Creates a rule forbidding `object` from sitting next to any of the
    /// `excluded` kinds.
    #[must_use]
    pub fn new(object: SpaceObject, excluded: Vec<SpaceObject>) -> Self {
        Self { object, excluded }
    }

    fn is_excluded(&self, cell: Option<SpaceObject>) -> bool {
        matches!(cell, Some(obj) if self.excluded.contains(&obj))
    }

    pub(super) fn is_satisfied(&self, board: &Board) -> bool {
        (0..board.len() as isize)
            .filter(|&i| board.at(i) == Some(self.object))
            .all(|i| !self.is_excluded(board.at(i - 1)) && !self.is_excluded(board.at(i + 1)))
    }

    pub(super) fn fill_board(&self, board: &Board, counts: &ObjectCounts) -> Vec<Board> {
        if !self.is_satisfied(board) {
            return Vec::new();
        }
        let placed = board.num_objects()[self.object];
        let Some(num) = counts[self.object].checked_sub(placed) else {
            return Vec::new();
        };
        let mut filled = Vec::new();
        self.add_clear_of_excluded(board.clone(), num, 0, &mut filled);
        filled
    }

    fn add_clear_of_excluded(&self, board: Board, num: usize, start: isize, out: &mut Vec<Board>) {
        if num == 0 {
            out.push(board);
            return;
        }
        for i in start..board.len() as isize {
            if board.at(i).is_none()
                && !self.is_excluded(board.at(i - 1))
                && !self.is_excluded(board.at(i + 1))
            {
                let mut filled = board.clone();
                filled.set(i, Some(self.object));
                self.add_clear_of_excluded(filled, num - 1, i + 1, out);
            }
        }
    }

    pub(super) fn affects(&self) -> Vec<SpaceObject> {
        let mut affected = vec![self.object];
        affected.extend(self.excluded.iter().copied());
        affected
    }

    pub(super) fn adds(&self) -> Vec<SpaceObject> {
        vec![self.object]
    }
}

impl Display for NeighborExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "no {} is adjacent to", self.object.name())?;
        for (n, obj) in self.excluded.iter().enumerate() {
            let sep = if n == 0 { " " } else { " or " };
            write!(f, "{sep}{} {}", obj.article(), obj.name())?;
        }
        Ok(())
    }
}
