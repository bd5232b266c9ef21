//! Multisets of space objects keyed by kind.

use std::ops::{Index, IndexMut};

use crate::{Board, SpaceObject};

/// A multiset of space objects, stored as a count per kind.
///
/// Counts describe both the target contents of a board type and the
/// objects a fill step still has to place.
///
/// # Examples
///
/// ```
/// use skysearch_core::{ObjectCounts, SpaceObject};
///
/// let mut counts = ObjectCounts::new();
/// counts[SpaceObject::Comet] = 2;
/// counts[SpaceObject::Empty] = 3;
///
/// assert_eq!(counts.total(), 5);
/// assert_eq!(counts[SpaceObject::Asteroid], 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ObjectCounts([usize; SpaceObject::COUNT]);

impl ObjectCounts {
    /// Creates an empty multiset.
    #[must_use]
    pub const fn new() -> Self {
        Self([0; SpaceObject::COUNT])
    }

    /// Creates a multiset from `(object, count)` pairs.
    ///
    /// Later pairs for the same object overwrite earlier ones.
    #[must_use]
    pub fn from_pairs(pairs: &[(SpaceObject, usize)]) -> Self {
        let mut counts = Self::new();
        for &(object, count) in pairs {
            counts[object] = count;
        }
        counts
    }

    /// Returns the total number of objects in the multiset.
    #[must_use]
    pub fn total(&self) -> usize {
        self.0.iter().sum()
    }

    /// Returns `true` if every count is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&n| n == 0)
    }

    /// Iterates over `(object, count)` pairs with a nonzero count.
    pub fn iter(&self) -> impl Iterator<Item = (SpaceObject, usize)> + '_ {
        SpaceObject::ALL
            .into_iter()
            .map(|object| (object, self[object]))
            .filter(|&(_, count)| count > 0)
    }

    /// Returns the counts remaining after removing every object already
    /// placed on `board`.
    ///
    /// Counts saturate at zero when the board holds more of a kind than
    /// the multiset does.
    #[must_use]
    pub fn subtract_placed(&self, board: &Board) -> Self {
        let placed = board.num_objects();
        let mut remaining = *self;
        for object in SpaceObject::ALL {
            remaining[object] = remaining[object].saturating_sub(placed[object]);
        }
        remaining
    }
}

impl Index<SpaceObject> for ObjectCounts {
    type Output = usize;

    fn index(&self, object: SpaceObject) -> &usize {
        &self.0[object.index()]
    }
}

impl IndexMut<SpaceObject> for ObjectCounts {
    fn index_mut(&mut self, object: SpaceObject) -> &mut usize {
        &mut self.0[object.index()]
    }
}

impl FromIterator<(SpaceObject, usize)> for ObjectCounts {
    fn from_iter<T: IntoIterator<Item = (SpaceObject, usize)>>(iter: T) -> Self {
        let mut counts = Self::new();
        for (object, count) in iter {
            counts[object] += count;
        }
        counts
    }
}
