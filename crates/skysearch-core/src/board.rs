//! Circular survey board.

use std::{
    fmt::{self, Display},
    str::FromStr,
};

use tinyvec::ArrayVec;

use crate::{ObjectCounts, SpaceObject};

/// The largest board size supported.
pub const MAX_SECTORS: usize = 32;

/// A circular board of sectors, each either empty (`None`) or holding a
/// space object.
///
/// The board is circular: sector indices are taken modulo the board
/// length, and negative indices count back from sector 0. The accessors
/// [`at`](Self::at) and [`set`](Self::set) take signed indices so
/// neighbor arithmetic never needs explicit wrapping.
///
/// Boards encode to strings with one character per sector: the object's
/// initial, or `-` for an unfilled sector.
///
/// # Examples
///
/// ```
/// use skysearch_core::{Board, SpaceObject};
///
/// let board: Board = "C--A".parse().unwrap();
/// assert_eq!(board.len(), 4);
/// assert_eq!(board.at(0), Some(SpaceObject::Comet));
/// assert_eq!(board.at(1), None);
///
/// // Indices wrap around the circle
/// assert_eq!(board.at(-1), Some(SpaceObject::Asteroid));
/// assert_eq!(board.at(4), Some(SpaceObject::Comet));
///
/// assert_eq!(board.to_string(), "C--A");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Board {
    sectors: ArrayVec<[Option<SpaceObject>; MAX_SECTORS]>,
}

impl Board {
    /// Creates a board of `num_sectors` unfilled sectors.
    ///
    /// # Panics
    ///
    /// Panics if `num_sectors` exceeds [`MAX_SECTORS`].
    #[must_use]
    pub fn new(num_sectors: usize) -> Self {
        assert!(num_sectors <= MAX_SECTORS);
        let mut sectors = ArrayVec::new();
        for _ in 0..num_sectors {
            sectors.push(None);
        }
        Self { sectors }
    }

    /// Creates a board from a slice of sector contents.
    ///
    /// # Panics
    ///
    /// Panics if the slice is longer than [`MAX_SECTORS`].
    #[must_use]
    pub fn from_objects(objects: &[Option<SpaceObject>]) -> Self {
        assert!(objects.len() <= MAX_SECTORS);
        let mut sectors = ArrayVec::new();
        sectors.extend_from_slice(objects);
        Self { sectors }
    }

    /// Returns the number of sectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    /// Returns `true` if the board has no sectors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// Returns the content of the sector at circular index `i`.
    ///
    /// # Panics
    ///
    /// Panics if the board has no sectors.
    #[must_use]
    pub fn at(&self, i: isize) -> Option<SpaceObject> {
        self.sectors[self.wrap(i)]
    }

    /// Sets the content of the sector at circular index `i`.
    ///
    /// # Panics
    ///
    /// Panics if the board has no sectors.
    pub fn set(&mut self, i: isize, object: Option<SpaceObject>) {
        let i = self.wrap(i);
        self.sectors[i] = object;
    }

    fn wrap(&self, i: isize) -> usize {
        let len = isize::try_from(self.sectors.len()).unwrap_or(isize::MAX);
        usize::try_from(i.rem_euclid(len)).unwrap_or(0)
    }

    /// Iterates over sector contents in circular order from sector 0.
    pub fn iter(&self) -> impl Iterator<Item = Option<SpaceObject>> + '_ {
        self.sectors.iter().copied()
    }

    /// Returns `true` if every sector holds an object.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.sectors.iter().all(Option::is_some)
    }

    /// Counts the objects currently placed on the board.
    ///
    /// Unfilled sectors are not counted.
    #[must_use]
    pub fn num_objects(&self) -> ObjectCounts {
        let mut counts = ObjectCounts::new();
        for object in self.sectors.iter().flatten() {
            counts[*object] += 1;
        }
        counts
    }
}

impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for sector in &self.sectors {
            match sector {
                Some(object) => write!(f, "{object}")?,
                None => write!(f, "-")?,
            }
        }
        Ok(())
    }
}

/// Error returned when parsing a board string fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseBoardError {
    /// The string contains a character that is neither an object initial
    /// nor `-`.
    #[display("invalid character {character:?} at sector {sector}")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// The zero-based sector index of the character.
        sector: usize,
    },
    /// The string encodes more sectors than [`MAX_SECTORS`].
    #[display("board has more than {MAX_SECTORS} sectors")]
    TooManySectors,
}

impl FromStr for Board {
    type Err = ParseBoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut sectors = ArrayVec::<[Option<SpaceObject>; MAX_SECTORS]>::new();
        for (sector, character) in s.chars().enumerate() {
            if sectors.len() == MAX_SECTORS {
                return Err(ParseBoardError::TooManySectors);
            }
            let object = if character == '-' {
                None
            } else {
                Some(
                    SpaceObject::from_initial(character)
                        .ok_or(ParseBoardError::InvalidCharacter { character, sector })?,
                )
            };
            sectors.push(object);
        }
        Ok(Self { sectors })
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_circular_indexing() {
        let board: Board = "C--A".parse().unwrap();

        assert_eq!(board.at(0), Some(SpaceObject::Comet));
        assert_eq!(board.at(3), Some(SpaceObject::Asteroid));
        assert_eq!(board.at(4), Some(SpaceObject::Comet));
        assert_eq!(board.at(-1), Some(SpaceObject::Asteroid));
        assert_eq!(board.at(-4), Some(SpaceObject::Comet));
        assert_eq!(board.at(7), Some(SpaceObject::Asteroid));
    }

    #[test]
    fn test_set_wraps() {
        let mut board = Board::new(4);
        board.set(-1, Some(SpaceObject::PlanetX));
        assert_eq!(board.at(3), Some(SpaceObject::PlanetX));

        board.set(5, Some(SpaceObject::GasCloud));
        assert_eq!(board.at(1), Some(SpaceObject::GasCloud));
    }

    #[test]
    fn test_parse_and_display() {
        let board: Board = "ECADXGB-".parse().unwrap();
        assert_eq!(board.len(), 8);
        assert_eq!(board.at(4), Some(SpaceObject::PlanetX));
        assert_eq!(board.at(7), None);
        assert_eq!(board.to_string(), "ECADXGB-");
    }

    #[test]
    fn test_parse_invalid_character() {
        let err = "C-z-".parse::<Board>().unwrap_err();
        assert_eq!(
            err,
            ParseBoardError::InvalidCharacter {
                character: 'z',
                sector: 2
            }
        );
    }

    #[test]
    fn test_parse_too_long() {
        let s = "-".repeat(MAX_SECTORS + 1);
        assert_eq!(s.parse::<Board>(), Err(ParseBoardError::TooManySectors));
    }

    #[test]
    fn test_num_objects() {
        let board: Board = "CC-A-E".parse().unwrap();
        let counts = board.num_objects();
        assert_eq!(counts[SpaceObject::Comet], 2);
        assert_eq!(counts[SpaceObject::Asteroid], 1);
        assert_eq!(counts[SpaceObject::Empty], 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_is_complete() {
        assert!("CAEX".parse::<Board>().unwrap().is_complete());
        assert!(!"CA-X".parse::<Board>().unwrap().is_complete());
    }

    fn board_strategy() -> impl Strategy<Value = Board> {
        proptest::collection::vec(
            proptest::option::of(proptest::sample::select(&SpaceObject::ALL[..])),
            1..=MAX_SECTORS,
        )
        .prop_map(|objects| Board::from_objects(&objects))
    }

    proptest! {
        #[test]
        fn test_display_parse_roundtrip(board in board_strategy()) {
            let parsed: Board = board.to_string().parse().unwrap();
            prop_assert_eq!(parsed, board);
        }
    }
}
