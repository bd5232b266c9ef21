use std::fmt::{self, Display};

use skysearch_core::{Board, ObjectCounts, SpaceObject};

use crate::Precision;

/// Requires all instances of an object kind to fit inside a contiguous
/// band of sectors.
///
/// The band is measured circularly: the smallest band is the board size
/// minus the longest gap between instances. Filling assumes the kind has
/// not been placed yet and positions the full target count, band endpoints
/// first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BandRule {
    object: SpaceObject,
    band_size: usize,
    precision: Precision,
}

impl BandRule {
    /// Creates a rule confining `object` to a band of `band_size` sectors,
    /// exact or as an upper bound depending on `precision`.
    #[must_use]
    pub fn new(object: SpaceObject, band_size: usize, precision: Precision) -> Self {
        Self {
            object,
            band_size,
            precision,
        }
    }

    /// The size of the smallest band containing every instance on `board`.
    fn smallest_band(&self, board: &Board) -> usize {
        let mut longest_gap = 0;
        let mut gap = 0;
        for cell in board.iter() {
            if cell == Some(self.object) {
                longest_gap = longest_gap.max(gap);
                gap = 0;
            } else {
                gap += 1;
            }
        }
        // The gap at the end continues circularly into the first one.
        for cell in board.iter() {
            if cell == Some(self.object) {
                longest_gap = longest_gap.max(gap);
                break;
            }
            gap += 1;
        }
        board.len() - longest_gap.min(board.len())
    }

    pub(super) fn is_satisfied(&self, board: &Board) -> bool {
        let smallest = self.smallest_band(board);
        match self.precision {
            Precision::Strict => smallest == self.band_size,
            Precision::Within => smallest <= self.band_size,
        }
    }

    pub(super) fn fill_board(&self, board: &Board, counts: &ObjectCounts) -> Vec<Board> {
        let num = counts[self.object];
        let mut filled = Vec::new();
        match self.precision {
            Precision::Strict => self.fill_exact(board, num, self.band_size, &mut filled),
            Precision::Within => {
                for size in num..=self.band_size {
                    self.fill_exact(board, num, size, &mut filled);
                }
            }
        }
        // A band spanning half the board (or more) can be generated from
        // both of its endpoints.
        filled.sort_unstable();
        filled.dedup();
        filled
    }

    /// Places the band endpoints at every possible start, then fills the
    /// interior.
    fn fill_exact(&self, board: &Board, num: usize, size: usize, out: &mut Vec<Board>) {
        // The endpoints alone take two instances.
        if num < 2 || size > board.len() {
            return;
        }
        for i in 0..board.len() as isize {
            let end = i + size as isize - 1;
            if board.at(i).is_none() && board.at(end).is_none() {
                let mut banded = board.clone();
                banded.set(i, Some(self.object));
                banded.set(end, Some(self.object));
                self.fill_interior(banded, num - 2, i, i, size, out);
            }
        }
    }

    fn fill_interior(
        &self,
        board: Board,
        num: usize,
        band_start: isize,
        start: isize,
        size: usize,
        out: &mut Vec<Board>,
    ) {
        if num == 0 {
            out.push(board);
            return;
        }
        for i in start..band_start + size as isize - num as isize {
            if board.at(i).is_none() {
                let mut filled = board.clone();
                filled.set(i, Some(self.object));
                self.fill_interior(filled, num - 1, band_start, i + 1, size, out);
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

impl Display for BandRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "the {}s are in a band of {} {}",
            self.object.name(),
            self.precision,
            self.band_size,
        )
    }
}
