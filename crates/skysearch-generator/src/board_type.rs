use skysearch_core::{Board, ObjectCounts, SpaceObject};
use skysearch_rules::{Precision, Qualifier, Rule, check_board};

/// The object multiset and rule set for one kind of board.
///
/// The board length is the total of the object counts; every sector of a
/// finished board holds exactly one object, with explicit [`SpaceObject::Empty`]
/// markers for empty space.
#[derive(Debug, Clone)]
pub struct BoardType {
    counts: ObjectCounts,
    rules: Vec<Rule>,
}

impl BoardType {
    /// Creates a board type from an object multiset and a rule set.
    #[must_use]
    pub fn new(counts: ObjectCounts, rules: Vec<Rule>) -> Self {
        Self { counts, rules }
    }

    /// The standard board type with `num_sectors` sectors, or `None` for a
    /// non-standard size. Standard sizes are 12, 18 and 24.
    #[must_use]
    pub fn standard(num_sectors: usize) -> Option<Self> {
        use SpaceObject::{
            Asteroid, BlackHole, Comet, DwarfPlanet, Empty, GasCloud, PlanetX,
        };
        let board_type = match num_sectors {
            12 => Self::new(
                ObjectCounts::from_pairs(&[
                    (PlanetX, 1),
                    (Empty, 2),
                    (GasCloud, 2),
                    (DwarfPlanet, 1),
                    (Asteroid, 4),
                    (Comet, 2),
                ]),
                vec![
                    Rule::comet(12),
                    Rule::adjacent_self(Asteroid, Qualifier::Every),
                    Rule::neighbor_exclusion(PlanetX, vec![DwarfPlanet]),
                    Rule::adjacent(GasCloud, Empty, Qualifier::Every),
                ],
            ),
            18 => Self::new(
                ObjectCounts::from_pairs(&[
                    (PlanetX, 1),
                    (Empty, 5),
                    (GasCloud, 2),
                    (DwarfPlanet, 4),
                    (Asteroid, 4),
                    (Comet, 2),
                ]),
                vec![
                    Rule::comet(18),
                    Rule::adjacent_self(Asteroid, Qualifier::Every),
                    Rule::band(DwarfPlanet, 6, Precision::Strict),
                    Rule::neighbor_exclusion(PlanetX, vec![DwarfPlanet]),
                    Rule::adjacent(GasCloud, Empty, Qualifier::Every),
                ],
            ),
            24 => Self::new(
                ObjectCounts::from_pairs(&[
                    (PlanetX, 1),
                    (Empty, 6),
                    (GasCloud, 3),
                    (DwarfPlanet, 4),
                    (Asteroid, 6),
                    (Comet, 3),
                    (BlackHole, 1),
                ]),
                vec![
                    Rule::comet(24),
                    Rule::adjacent_self(Asteroid, Qualifier::Every),
                    Rule::band(DwarfPlanet, 6, Precision::Strict),
                    Rule::neighbor_exclusion(PlanetX, vec![DwarfPlanet, BlackHole]),
                    Rule::neighbor_exclusion(BlackHole, vec![Empty]),
                    Rule::adjacent(GasCloud, Empty, Qualifier::Every),
                ],
            ),
            _ => return None,
        };
        Some(board_type)
    }

    /// The number of sectors on boards of this type.
    #[must_use]
    pub fn num_sectors(&self) -> usize {
        self.counts.total()
    }

    /// The full object multiset for boards of this type.
    #[must_use]
    pub fn counts(&self) -> &ObjectCounts {
        &self.counts
    }

    /// The rules boards of this type must satisfy.
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Returns `true` if `board` satisfies every rule of this type.
    #[must_use]
    pub fn check(&self, board: &Board) -> bool {
        check_board(board, &self.rules)
    }

    /// The objects still to place on `board`.
    pub(crate) fn remaining_counts(&self, board: &Board) -> ObjectCounts {
        self.counts.subtract_placed(board)
    }

    /// The rules whose affected kinds intersect `remaining`, and which
    /// therefore must re-validate a board once those kinds are placed.
    pub(crate) fn relevant_rules(&self, remaining: &ObjectCounts) -> Vec<&Rule> {
        self.rules
            .iter()
            .filter(|rule| rule.affects().iter().any(|&obj| remaining[obj] > 0))
            .collect()
    }

    /// The rules ordered for the staged pipeline: ascending by how many
    /// kinds they affect, then by how many they add, so the most focused
    /// rules prune first. The sort is stable, keeping the declared order
    /// among ties.
    pub(crate) fn ordered_rules(&self) -> Vec<&Rule> {
        let mut ordered = self.rules.iter().collect::<Vec<_>>();
        ordered.sort_by_key(|rule| (rule.affects().len(), rule.adds().len()));
        ordered
    }
}
