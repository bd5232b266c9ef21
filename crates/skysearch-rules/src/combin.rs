//! Shared combinatorial primitives for the fill algorithms.
//!
//! Everything here is stateless except [`PermutationCache`], which memoizes
//! multiset permutations per distinct count signature and is owned by the
//! caller.

use std::collections::{BTreeSet, HashMap};

use skysearch_core::{Board, SpaceObject};

/// Returns every distinct ordering of the multiset described by
/// `(symbol, count)` pairs.
///
/// `None` entries stand for sectors left unfilled, so the same enumerator
/// serves both "place everything" and "place a few, leave the rest open"
/// call sites.
///
/// # Examples
///
/// ```
/// use skysearch_core::SpaceObject;
/// use skysearch_rules::combin::multiset_permutations;
///
/// let perms = multiset_permutations(&[(Some(SpaceObject::Asteroid), 2), (None, 1)]);
/// assert_eq!(perms.len(), 3);
/// ```
#[must_use]
pub fn multiset_permutations(
    counts: &[(Option<SpaceObject>, usize)],
) -> Vec<Vec<Option<SpaceObject>>> {
    let mut counts: Vec<_> = counts.iter().copied().filter(|&(_, n)| n > 0).collect();
    let total = counts.iter().map(|&(_, n)| n).sum();
    let mut out = Vec::new();
    let mut prefix = Vec::with_capacity(total);
    permute(&mut counts, total, &mut prefix, &mut out);
    out
}

fn permute(
    counts: &mut [(Option<SpaceObject>, usize)],
    remaining: usize,
    prefix: &mut Vec<Option<SpaceObject>>,
    out: &mut Vec<Vec<Option<SpaceObject>>>,
) {
    if remaining == 0 {
        out.push(prefix.clone());
        return;
    }
    for idx in 0..counts.len() {
        if counts[idx].1 == 0 {
            continue;
        }
        counts[idx].1 -= 1;
        prefix.push(counts[idx].0);
        permute(counts, remaining - 1, prefix, out);
        prefix.pop();
        counts[idx].1 += 1;
    }
}

/// Memoizing wrapper around [`multiset_permutations`].
///
/// The same remaining-count signature recurs across many boards in the final
/// pipeline stage, so permutation lists are computed once per signature.
#[derive(Debug, Default)]
pub struct PermutationCache {
    memo: HashMap<[usize; SpaceObject::COUNT + 1], Vec<Vec<Option<SpaceObject>>>>,
}

impl PermutationCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the permutations of the given multiset, computing and caching
    /// them on first use.
    pub fn permutations(
        &mut self,
        counts: &[(Option<SpaceObject>, usize)],
    ) -> &[Vec<Option<SpaceObject>>] {
        let mut key = [0_usize; SpaceObject::COUNT + 1];
        for &(symbol, count) in counts {
            match symbol {
                Some(object) => key[object.index()] += count,
                None => key[SpaceObject::COUNT] += count,
            }
        }
        self.memo
            .entry(key)
            .or_insert_with(|| multiset_permutations(counts))
    }
}

/// Places `num1` instances of `obj1` and `num2` instances of `obj2` into the
/// open sectors of `board` such that no `obj1` ends up adjacent to an `obj2`.
///
/// Placement scans forward from a cursor so no arrangement is produced twice.
#[must_use]
pub fn fill_no_touch(
    obj1: SpaceObject,
    num1: usize,
    obj2: SpaceObject,
    num2: usize,
    board: &Board,
) -> Vec<Board> {
    let mut with_obj1 = Vec::new();
    add_avoiding(obj1, obj2, num1, board.clone(), 0, &mut with_obj1);
    let mut out = Vec::new();
    for b in &with_obj1 {
        add_avoiding(obj2, obj1, num2, b.clone(), 0, &mut out);
    }
    out
}

fn add_avoiding(
    obj: SpaceObject,
    avoid: SpaceObject,
    num: usize,
    board: Board,
    start: usize,
    out: &mut Vec<Board>,
) {
    if num == 0 {
        out.push(board);
        return;
    }
    for i in start..board.len() {
        let i = i as isize;
        if board.at(i).is_none() && board.at(i - 1) != Some(avoid) && board.at(i + 1) != Some(avoid)
        {
            let mut copy = board.clone();
            copy.set(i, Some(obj));
            add_avoiding(obj, avoid, num - 1, copy, (i + 1) as usize, out);
        }
    }
}

/// Places `num` instances of `obj` into the open sectors of `board` such
/// that no two instances are adjacent, and none merges with an existing
/// same-kind run.
#[must_use]
pub fn fill_no_self_touch(obj: SpaceObject, num: usize, board: &Board) -> Vec<Board> {
    let mut out = Vec::new();
    add_self_spaced(obj, num, board.clone(), 0, &mut out);
    out
}

fn add_self_spaced(obj: SpaceObject, num: usize, board: Board, start: usize, out: &mut Vec<Board>) {
    if num == 0 {
        out.push(board);
        return;
    }
    for i in start..board.len() {
        let i = i as isize;
        if board.at(i).is_none() && board.at(i - 1) != Some(obj) && board.at(i + 1) != Some(obj) {
            let mut copy = board.clone();
            copy.set(i, Some(obj));
            // The next sector is adjacent, skip it
            add_self_spaced(obj, num - 1, copy, (i + 2) as usize, out);
        }
    }
}

/// Places `num1` instances of `obj1` and `num2` instances of `obj2` into the
/// open sectors of `board` such that no `obj1` ends up within `distance`
/// sectors of an `obj2` (circularly, in either direction).
///
/// A countdown tracks distance from the last restricted object during a
/// linear sweep; the wraparound gap between the first and last restricted
/// objects is checked separately.
#[must_use]
pub fn fill_no_within(
    obj1: SpaceObject,
    num1: usize,
    obj2: SpaceObject,
    num2: usize,
    board: &Board,
    distance: usize,
) -> Vec<Board> {
    let free = board.iter().filter(Option::is_none).count();
    let Some(num_open) = free.checked_sub(num1 + num2) else {
        return Vec::new();
    };

    let mut counts = vec![(Some(obj1), num1), (Some(obj2), num2), (None, num_open)];
    let mut cells = Vec::with_capacity(board.len());
    let mut sequences = Vec::new();
    within_scan(
        &mut counts,
        (obj1, obj2),
        board,
        distance,
        0,
        None,
        0,
        &mut cells,
        &mut sequences,
    );

    let is_restricted =
        |cell: Option<SpaceObject>| cell == Some(obj1) || cell == Some(obj2);
    sequences
        .into_iter()
        .filter(|cells| {
            // Reject sequences whose first and last restricted objects are of
            // different kinds and too close across the wraparound boundary.
            let Some(first) = cells.iter().position(|&c| is_restricted(c)) else {
                return true;
            };
            let Some(last) = cells
                .iter()
                .rposition(|&c| is_restricted(c) && c != cells[first])
            else {
                return true;
            };
            first + (cells.len() - last) > distance
        })
        .map(|cells| Board::from_objects(&cells))
        .collect()
}

#[expect(clippy::too_many_arguments, reason = "internal recursion state")]
fn within_scan(
    counts: &mut [(Option<SpaceObject>, usize)],
    restricted: (SpaceObject, SpaceObject),
    board: &Board,
    distance: usize,
    i: usize,
    prev: Option<SpaceObject>,
    countdown: usize,
    cells: &mut Vec<Option<SpaceObject>>,
    out: &mut Vec<Vec<Option<SpaceObject>>>,
) {
    if i == board.len() {
        out.push(cells.clone());
        return;
    }

    if let Some(existing) = board.at(i as isize) {
        let (prev, countdown) = if existing == restricted.0 || existing == restricted.1 {
            if prev != Some(existing) && countdown != 0 {
                // Already violates the rule
                return;
            }
            (Some(existing), distance)
        } else {
            (prev, countdown.saturating_sub(1))
        };
        cells.push(Some(existing));
        within_scan(counts, restricted, board, distance, i + 1, prev, countdown, cells, out);
        cells.pop();
        return;
    }

    for idx in 0..counts.len() {
        let (choice, left) = counts[idx];
        if left == 0 {
            continue;
        }
        let choice_restricted = choice == Some(restricted.0) || choice == Some(restricted.1);
        if !choice_restricted || countdown == 0 || choice == prev {
            counts[idx].1 -= 1;
            let (next_prev, next_countdown) = if choice_restricted {
                (choice, distance)
            } else {
                (prev, countdown.saturating_sub(1))
            };
            cells.push(choice);
            within_scan(
                counts,
                restricted,
                board,
                distance,
                i + 1,
                next_prev,
                next_countdown,
                cells,
                out,
            );
            cells.pop();
            counts[idx].1 += 1;
        }
    }
}

/// Enumerates the integer partitions of `total` with every part at least
/// `min_part`, in non-decreasing part order.
///
/// # Panics
///
/// Panics if `min_part` is zero.
#[must_use]
pub fn partitions(total: usize, min_part: usize) -> Vec<Vec<usize>> {
    assert!(min_part > 0);
    if total < min_part {
        return Vec::new();
    }
    let mut out = vec![vec![total]];
    for first in min_part..=total / 2 {
        for rest in partitions(total - first, first) {
            let mut partition = Vec::with_capacity(rest.len() + 1);
            partition.push(first);
            partition.extend(rest);
            out.push(partition);
        }
    }
    out
}

/// Enumerates the ordered compositions of `total` with every part at least
/// `min_part`.
///
/// # Panics
///
/// Panics if `min_part` is zero.
#[must_use]
pub fn ordered_partitions(total: usize, min_part: usize) -> Vec<Vec<usize>> {
    assert!(min_part > 0);
    if total < min_part {
        return Vec::new();
    }
    let mut out = vec![vec![total]];
    for first in min_part..=total {
        for rest in ordered_partitions(total - first, min_part) {
            let mut partition = Vec::with_capacity(rest.len() + 1);
            partition.push(first);
            partition.extend(rest);
            out.push(partition);
        }
    }
    out
}

/// Picks one element from each choice set and keeps only the minimal
/// selections.
///
/// A selection is minimal when removing any element of it leaves some choice
/// set uncovered. An empty `choices` slice yields a single empty selection.
#[must_use]
pub fn minimal_covers(choices: &[BTreeSet<usize>]) -> Vec<BTreeSet<usize>> {
    fn product(
        choices: &[BTreeSet<usize>],
        picked: &mut Vec<usize>,
        out: &mut Vec<BTreeSet<usize>>,
    ) {
        if let Some((first, rest)) = choices.split_first() {
            for &value in first {
                picked.push(value);
                product(rest, picked, out);
                picked.pop();
            }
        } else {
            out.push(picked.iter().copied().collect());
        }
    }

    let mut candidates = Vec::new();
    product(choices, &mut Vec::new(), &mut candidates);

    let mut covers = BTreeSet::new();
    for set in candidates {
        let minimal = set.iter().all(|&value| {
            // Removing `value` must leave some choice set uncovered
            choices
                .iter()
                .any(|choice| choice.iter().all(|&x| x == value || !set.contains(&x)))
        });
        if minimal {
            covers.insert(set);
        }
    }
    covers.into_iter().collect()
}

/// Enumerates all `k`-element subsets of `items`, preserving item order.
#[must_use]
pub fn combinations(items: &[usize], k: usize) -> Vec<Vec<usize>> {
    fn choose(items: &[usize], k: usize, picked: &mut Vec<usize>, out: &mut Vec<Vec<usize>>) {
        if k == 0 {
            out.push(picked.clone());
            return;
        }
        if items.len() < k {
            return;
        }
        for i in 0..=items.len() - k {
            picked.push(items[i]);
            choose(&items[i + 1..], k - 1, picked, out);
            picked.pop();
        }
    }

    let mut out = Vec::new();
    choose(items, k, &mut Vec::new(), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boards(strs: &[&str]) -> Vec<Board> {
        strs.iter().map(|s| s.parse().unwrap()).collect()
    }

    fn sorted(mut boards: Vec<Board>) -> Vec<Board> {
        boards.sort();
        boards
    }

    #[test]
    fn test_multiset_permutations() {
        let perms = multiset_permutations(&[(Some(SpaceObject::Asteroid), 2), (None, 2)]);
        // 4! / (2! * 2!)
        assert_eq!(perms.len(), 6);

        assert_eq!(multiset_permutations(&[]), vec![Vec::new()]);
    }

    #[test]
    fn test_permutation_cache_reuses_entries() {
        let mut cache = PermutationCache::new();
        let counts = [(Some(SpaceObject::Comet), 1), (None, 2)];
        let first = cache.permutations(&counts).to_vec();
        let second = cache.permutations(&counts).to_vec();
        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
    }

    #[test]
    fn test_fill_no_touch_keeps_objects_apart() {
        let board: Board = "----".parse().unwrap();
        let filled = fill_no_touch(SpaceObject::GasCloud, 1, SpaceObject::Empty, 1, &board);
        // Only opposite placements keep G and E non-adjacent on a 4-sector circle
        assert_eq!(
            sorted(filled),
            sorted(boards(&["G-E-", "E-G-", "-G-E", "-E-G"]))
        );
    }

    #[test]
    fn test_fill_no_self_touch() {
        let board: Board = "----".parse().unwrap();
        let filled = fill_no_self_touch(SpaceObject::Asteroid, 2, &board);
        assert_eq!(sorted(filled), sorted(boards(&["A-A-", "-A-A"])));
    }

    #[test]
    fn test_fill_no_within_respects_circular_distance() {
        let board: Board = "------".parse().unwrap();
        let filled = fill_no_within(
            SpaceObject::Asteroid,
            1,
            SpaceObject::BlackHole,
            1,
            &board,
            2,
        );
        // Distance 3 (opposite) is the only legal separation on a 6-sector circle
        assert_eq!(filled.len(), 6);
        for b in &filled {
            let a = (0..6).position(|i| b.at(i as isize) == Some(SpaceObject::Asteroid));
            let h = (0..6).position(|i| b.at(i as isize) == Some(SpaceObject::BlackHole));
            let (a, h) = (a.unwrap() as isize, h.unwrap() as isize);
            let dist = (a - h).rem_euclid(6).min((h - a).rem_euclid(6));
            assert_eq!(dist, 3);
        }
    }

    #[test]
    fn test_fill_no_within_too_many_objects() {
        let board: Board = "C--".parse().unwrap();
        let filled = fill_no_within(
            SpaceObject::Asteroid,
            2,
            SpaceObject::BlackHole,
            1,
            &board,
            1,
        );
        assert!(filled.is_empty());
    }

    #[test]
    fn test_partitions() {
        assert_eq!(partitions(4, 2), vec![vec![4], vec![2, 2]]);
        assert_eq!(
            partitions(6, 2),
            vec![vec![6], vec![2, 4], vec![2, 2, 2], vec![3, 3]]
        );
        assert!(partitions(1, 2).is_empty());
    }

    #[test]
    fn test_ordered_partitions() {
        assert_eq!(ordered_partitions(4, 2), vec![vec![4], vec![2, 2]]);
        assert_eq!(
            ordered_partitions(5, 2),
            vec![vec![5], vec![2, 3], vec![3, 2]]
        );
    }

    #[test]
    fn test_minimal_covers() {
        let choices = [
            BTreeSet::from([1, 2]),
            BTreeSet::from([2, 3]),
        ];
        let covers = minimal_covers(&choices);
        assert_eq!(covers, vec![BTreeSet::from([1, 3]), BTreeSet::from([2])]);
    }

    #[test]
    fn test_minimal_covers_empty_input() {
        assert_eq!(minimal_covers(&[]), vec![BTreeSet::new()]);
        // An uncoverable (empty) choice set yields no covers at all
        assert!(minimal_covers(&[BTreeSet::new()]).is_empty());
    }

    #[test]
    fn test_combinations() {
        assert_eq!(
            combinations(&[1, 4, 6], 2),
            vec![vec![1, 4], vec![1, 6], vec![4, 6]]
        );
        assert_eq!(combinations(&[1, 2], 0), vec![Vec::<usize>::new()]);
        assert!(combinations(&[1], 2).is_empty());
    }
}
