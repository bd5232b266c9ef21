//! The closed family of placement rules.

use std::{
    collections::BTreeSet,
    fmt::{self, Display},
};

use skysearch_core::{Board, ObjectCounts, SpaceObject};

pub use self::{
    adjacent::AdjacentRule, adjacent_self::AdjacentSelfRule, band::BandRule,
    neighbor_exclusion::NeighborExclusionRule, opposite::OppositeRule, sectors::SectorsRule,
    within::WithinRule,
};
use crate::{Precision, Qualifier};

mod adjacent;
mod adjacent_self;
mod band;
mod neighbor_exclusion;
mod opposite;
mod sectors;
mod within;

/// Error returned when a rule cannot drive an incremental fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum FillError {
    /// The qualifier is checkable via `is_satisfied` but too weak to fill
    /// a board incrementally.
    #[display("the \"{qualifier}\" qualifier cannot drive a fill")]
    UnsupportedQualifier {
        /// The rejected qualifier.
        qualifier: Qualifier,
    },
}

/// A placement rule restricting where space objects may sit on a board.
///
/// Rules are immutable values. Each variant implements the same contract:
///
/// - [`is_satisfied`](Self::is_satisfied) checks a (possibly partial) board,
///   treating unfilled sectors as unknown.
/// - [`fill_board`](Self::fill_board) extends a partial board in every way
///   that keeps the rule satisfiable no matter what other rules place later.
///   It never overwrites an assigned sector, and an empty result means the
///   branch is unsatisfiable, not that an error occurred.
/// - [`affects`](Self::affects) and [`adds`](Self::adds) describe which
///   object kinds the rule pins down and which it may place, driving stage
///   ordering and final-stage re-validation in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// An object confined to an explicit set of allowed sectors.
    Sectors(SectorsRule),
    /// An object related to instances of its own kind by adjacency.
    AdjacentSelf(AdjacentSelfRule),
    /// All instances of an object inside a contiguous band.
    Band(BandRule),
    /// An object excluded from sectors adjacent to specific other kinds.
    NeighborExclusion(NeighborExclusionRule),
    /// Two object kinds related by adjacency.
    Adjacent(AdjacentRule),
    /// Two object kinds related by diametrically opposite placement.
    Opposite(OppositeRule),
    /// Two object kinds related by circular distance.
    Within(WithinRule),
}

impl Rule {
    /// The comet rule: comets appear only in prime-numbered sectors
    /// (1-based) of a board with `board_size` sectors.
    #[must_use]
    pub fn comet(board_size: usize) -> Self {
        Self::Sectors(SectorsRule::comet(board_size))
    }

    /// Confines `object` to the given allowed sector set.
    #[must_use]
    pub fn sectors(object: SpaceObject, positions: BTreeSet<usize>, board_size: usize) -> Self {
        Self::Sectors(SectorsRule::new(object, positions, board_size))
    }

    /// Relates `object` to other instances of its own kind by adjacency.
    #[must_use]
    pub fn adjacent_self(object: SpaceObject, qualifier: Qualifier) -> Self {
        Self::AdjacentSelf(AdjacentSelfRule::new(object, qualifier))
    }

    /// Requires all instances of `object` to fit in a band of `band_size`
    /// sectors.
    #[must_use]
    pub fn band(object: SpaceObject, band_size: usize, precision: Precision) -> Self {
        Self::Band(BandRule::new(object, band_size, precision))
    }

    /// Excludes `object` from sectors adjacent to any of the `excluded`
    /// kinds.
    #[must_use]
    pub fn neighbor_exclusion(object: SpaceObject, excluded: Vec<SpaceObject>) -> Self {
        Self::NeighborExclusion(NeighborExclusionRule::new(object, excluded))
    }

    /// Relates `object1` to `object2` by adjacency.
    #[must_use]
    pub fn adjacent(object1: SpaceObject, object2: SpaceObject, qualifier: Qualifier) -> Self {
        Self::Adjacent(AdjacentRule::new(object1, object2, qualifier))
    }

    /// Relates `object1` to `object2` by opposite placement.
    #[must_use]
    pub fn opposite(object1: SpaceObject, object2: SpaceObject, qualifier: Qualifier) -> Self {
        Self::Opposite(OppositeRule::new(object1, object2, qualifier))
    }

    /// Relates `object1` to `object2` by circular distance at most
    /// `distance`.
    #[must_use]
    pub fn within(
        object1: SpaceObject,
        object2: SpaceObject,
        qualifier: Qualifier,
        distance: usize,
    ) -> Self {
        Self::Within(WithinRule::new(object1, object2, qualifier, distance))
    }

    /// Returns `true` if the rule holds on `board`.
    ///
    /// Unfilled sectors are treated as unknown where possible; the check
    /// is authoritative on complete boards.
    #[must_use]
    pub fn is_satisfied(&self, board: &Board) -> bool {
        match self {
            Self::Sectors(rule) => rule.is_satisfied(board),
            Self::AdjacentSelf(rule) => rule.is_satisfied(board),
            Self::Band(rule) => rule.is_satisfied(board),
            Self::NeighborExclusion(rule) => rule.is_satisfied(board),
            Self::Adjacent(rule) => rule.is_satisfied(board),
            Self::Opposite(rule) => rule.is_satisfied(board),
            Self::Within(rule) => rule.is_satisfied(board),
        }
    }

    /// Returns every safe minimal extension of `board` under this rule,
    /// given the full target object counts.
    ///
    /// # Errors
    ///
    /// Returns [`FillError::UnsupportedQualifier`] if the rule carries the
    /// `AtLeastOne` qualifier.
    pub fn fill_board(&self, board: &Board, counts: &ObjectCounts) -> Result<Vec<Board>, FillError> {
        match self {
            Self::Sectors(rule) => Ok(rule.fill_board(board, counts)),
            Self::AdjacentSelf(rule) => rule.fill_board(board, counts),
            Self::Band(rule) => Ok(rule.fill_board(board, counts)),
            Self::NeighborExclusion(rule) => Ok(rule.fill_board(board, counts)),
            Self::Adjacent(rule) => rule.fill_board(board, counts),
            Self::Opposite(rule) => rule.fill_board(board, counts),
            Self::Within(rule) => rule.fill_board(board, counts),
        }
    }

    /// Returns the object kinds whose placement this rule fully pins down
    /// or constrains; the pipeline re-validates a rule whenever a kind it
    /// affects is placed after the rule's own stage.
    #[must_use]
    pub fn affects(&self) -> Vec<SpaceObject> {
        match self {
            Self::Sectors(rule) => rule.affects(),
            Self::AdjacentSelf(rule) => rule.affects(),
            Self::Band(rule) => rule.affects(),
            Self::NeighborExclusion(rule) => rule.affects(),
            Self::Adjacent(rule) => rule.affects(),
            Self::Opposite(rule) => rule.affects(),
            Self::Within(rule) => rule.affects(),
        }
    }

    /// Returns the object kinds this rule may place while filling.
    #[must_use]
    pub fn adds(&self) -> Vec<SpaceObject> {
        match self {
            Self::Sectors(rule) => rule.adds(),
            Self::AdjacentSelf(rule) => rule.adds(),
            Self::Band(rule) => rule.adds(),
            Self::NeighborExclusion(rule) => rule.adds(),
            Self::Adjacent(rule) => rule.adds(),
            Self::Opposite(rule) => rule.adds(),
            Self::Within(rule) => rule.adds(),
        }
    }

    /// Returns `true` if the rule forbids sectors independently of any
    /// other placement.
    #[must_use]
    pub fn is_immediately_limiting(&self) -> bool {
        matches!(self, Self::Sectors(_))
    }

    /// Returns, per object kind, the sectors that kind can never occupy.
    ///
    /// Empty unless [`is_immediately_limiting`](Self::is_immediately_limiting)
    /// returns `true`.
    #[must_use]
    pub fn disallowed_sectors(&self) -> Vec<(SpaceObject, BTreeSet<usize>)> {
        match self {
            Self::Sectors(rule) => rule.disallowed_sectors(),
            _ => Vec::new(),
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sectors(rule) => Display::fmt(rule, f),
            Self::AdjacentSelf(rule) => Display::fmt(rule, f),
            Self::Band(rule) => Display::fmt(rule, f),
            Self::NeighborExclusion(rule) => Display::fmt(rule, f),
            Self::Adjacent(rule) => Display::fmt(rule, f),
            Self::Opposite(rule) => Display::fmt(rule, f),
            Self::Within(rule) => Display::fmt(rule, f),
        }
    }
}

/// Returns `true` if `board` satisfies every rule in `rules`.
#[must_use]
pub fn check_board(board: &Board, rules: &[Rule]) -> bool {
    rules.iter().all(|rule| rule.is_satisfied(board))
}
