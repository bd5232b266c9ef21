//! Space object representation.

use std::fmt::{self, Display};

/// One kind of object that can occupy a board sector.
///
/// This enum is the closed set of sector contents. Each kind has a
/// one-character initial used by the board string encoding (see
/// [`Board`](crate::Board)).
///
/// # Examples
///
/// ```
/// use skysearch_core::SpaceObject;
///
/// assert_eq!(SpaceObject::Comet.initial(), 'C');
/// assert_eq!(SpaceObject::from_initial('X'), Some(SpaceObject::PlanetX));
/// assert_eq!(SpaceObject::from_initial('?'), None);
///
/// // Iterate over all kinds
/// for object in SpaceObject::ALL {
///     assert_eq!(SpaceObject::from_initial(object.initial()), Some(object));
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum SpaceObject {
    /// An empty sector.
    Empty = 0,
    /// A comet.
    Comet = 1,
    /// An asteroid.
    Asteroid = 2,
    /// A dwarf planet.
    DwarfPlanet = 3,
    /// Planet X.
    PlanetX = 4,
    /// A gas cloud.
    GasCloud = 5,
    /// A black hole.
    BlackHole = 6,
}

impl SpaceObject {
    /// The number of object kinds.
    pub const COUNT: usize = 7;

    /// Array containing all object kinds.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Empty,
        Self::Comet,
        Self::Asteroid,
        Self::DwarfPlanet,
        Self::PlanetX,
        Self::GasCloud,
        Self::BlackHole,
    ];

    /// Returns the one-character initial of this object, as used in board
    /// strings.
    #[must_use]
    pub const fn initial(self) -> char {
        match self {
            Self::Empty => 'E',
            Self::Comet => 'C',
            Self::Asteroid => 'A',
            Self::DwarfPlanet => 'D',
            Self::PlanetX => 'X',
            Self::GasCloud => 'G',
            Self::BlackHole => 'B',
        }
    }

    /// Parses a one-character initial into an object kind.
    ///
    /// Returns `None` for any character that is not a valid initial.
    #[must_use]
    pub const fn from_initial(c: char) -> Option<Self> {
        match c {
            'E' => Some(Self::Empty),
            'C' => Some(Self::Comet),
            'A' => Some(Self::Asteroid),
            'D' => Some(Self::DwarfPlanet),
            'X' => Some(Self::PlanetX),
            'G' => Some(Self::GasCloud),
            'B' => Some(Self::BlackHole),
            _ => None,
        }
    }

    /// Returns the display name of this object.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Empty => "empty sector",
            Self::Comet => "comet",
            Self::Asteroid => "asteroid",
            Self::DwarfPlanet => "dwarf planet",
            Self::PlanetX => "Planet X",
            Self::GasCloud => "gas cloud",
            Self::BlackHole => "black hole",
        }
    }

    /// Returns the indefinite article matching [`name`](Self::name), for
    /// building rule descriptions.
    #[must_use]
    pub const fn article(self) -> &'static str {
        match self {
            Self::Empty | Self::Asteroid => "an",
            _ => "a",
        }
    }

    /// Returns the dense index of this object kind (0-6).
    ///
    /// Used by [`ObjectCounts`](crate::ObjectCounts) for array-backed storage.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl Display for SpaceObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.initial(), f)
    }
}
