//! Largest Remainder (LR) apportionment of an integer total over weighted keys.
//!
//! Contract:
//! - Exact share of key `k` is `total * w_k / W` with `W = sum(w)`.
//! - Floors are `total * w_k / W` (integer div); remainders are `total * w_k % W`.
//!   All remainders share the denominator `W`, so comparing numerators is exact.
//! - Shortfall `total - sum(floors)` goes one unit at a time by the static
//!   ranking (remainder ↓, input position ↑), cycling if ever needed.
//! - `total == 0` or `W == 0` → every key maps to 0. With `total > 0` and
//!   `W == 0` the result is flagged `degenerate` (nowhere to put the total).
//!
//! Determinism:
//! - No RNG or policy here; ties resolve by input order only.

extern crate alloc;

use alloc::collections::{BTreeMap, BTreeSet};
use alloc::vec::Vec;

/// Apportionment result: one part per input key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Apportionment<K: Ord> {
    pub parts: BTreeMap<K, u64>,
    /// `total > 0` but every weight was zero; all parts are 0.
    pub degenerate: bool,
}

impl<K: Ord> Apportionment<K> {
    /// Sum of all parts (equals the requested total unless `degenerate`).
    pub fn sum(&self) -> u64 {
        self.parts.values().sum()
    }

    pub fn get(&self, key: &K) -> u64 {
        self.parts.get(key).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    /// The same key appears twice in the bucket list (position of the repeat).
    DuplicateKey { position: usize },
}

impl core::fmt::Display for AllocError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AllocError::DuplicateKey { position } => {
                write!(f, "duplicate bucket key at position {position}")
            }
        }
    }
}

impl std::error::Error for AllocError {}

/// Apportion `total` over `(key, weight)` buckets by largest remainder.
pub fn apportion<K: Ord + Clone>(
    total: u64,
    buckets: &[(K, u64)],
) -> Result<Apportionment<K>, AllocError> {
    let mut seen: BTreeSet<&K> = BTreeSet::new();
    for (position, (key, _)) in buckets.iter().enumerate() {
        if !seen.insert(key) {
            return Err(AllocError::DuplicateKey { position });
        }
    }

    let weight_sum: u128 = buckets.iter().map(|(_, w)| u128::from(*w)).sum();
    let mut parts: BTreeMap<K, u64> = buckets.iter().map(|(k, _)| (k.clone(), 0)).collect();

    // Trivial cases
    if total == 0 || weight_sum == 0 {
        return Ok(Apportionment { parts, degenerate: total > 0 });
    }

    let (floors, ranking) = floors_and_ranking(total, buckets, weight_sum);

    let sum_floors: u128 = floors.iter().map(|&f| u128::from(f)).sum();
    let mut alloc = floors;
    let needed = u128::from(total) - sum_floors;
    distribute_leftovers(needed, &mut alloc, &ranking);

    for ((key, _), part) in buckets.iter().zip(alloc) {
        parts.insert(key.clone(), part);
    }

    debug_assert_eq!(parts.values().map(|&p| u128::from(p)).sum::<u128>(), u128::from(total));
    Ok(Apportionment { parts, degenerate: false })
}

/// Floors per input position and the LR ranking over positive-weight positions.
fn floors_and_ranking<K>(total: u64, buckets: &[(K, u64)], weight_sum: u128) -> (Vec<u64>, Vec<usize>) {
    let mut floors = Vec::with_capacity(buckets.len());
    let mut remainders: Vec<(usize, u128)> = Vec::with_capacity(buckets.len());

    for (ix, (_, w)) in buckets.iter().enumerate() {
        if *w == 0 {
            floors.push(0);
            continue;
        }
        let share = u128::from(total) * u128::from(*w);
        // share / weight_sum <= total, so the floor fits u64.
        floors.push((share / weight_sum) as u64);
        remainders.push((ix, share % weight_sum));
    }

    // remainder desc, input position asc (sort_by is stable; the explicit key keeps intent visible)
    remainders.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    (floors, remainders.into_iter().map(|(ix, _)| ix).collect())
}

/// Hand out `extra` units following `ranking`, wrapping around if `extra`
/// exceeds the number of ranked positions.
fn distribute_leftovers(extra: u128, alloc: &mut [u64], ranking: &[usize]) {
    if extra == 0 || ranking.is_empty() {
        return;
    }
    let mut given = 0u128;
    for &ix in ranking.iter().cycle() {
        if given == extra {
            break;
        }
        alloc[ix] += 1;
        given += 1;
    }
}

/// Even split of `total` over `count` workers numbered `1..=count`: every
/// worker gets `total / count`, the first `total % count` get one more.
/// Empty when `count == 0`.
pub fn split_even(total: u64, count: u32) -> BTreeMap<u32, u64> {
    let buckets: Vec<(u32, u64)> = (1..=count).map(|w| (w, 1)).collect();
    match apportion(total, &buckets) {
        Ok(a) => a.parts,
        // Worker numbers are unique by construction.
        Err(_) => BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proportional_with_exact_conservation() {
        let buckets = [("a", 5u64), ("b", 7), ("c", 6)];
        let a = apportion(119, &buckets).unwrap();
        // exact shares: 33.05, 46.27, 39.66 → floors 33, 46, 39 (=118), +1 to c (.66)
        assert_eq!(a.get(&"a"), 33);
        assert_eq!(a.get(&"b"), 46);
        assert_eq!(a.get(&"c"), 40);
        assert_eq!(a.sum(), 119);
        assert!(!a.degenerate);
    }

    #[test]
    fn zero_weight_keys_get_nothing() {
        let buckets = [(1u32, 0u64), (2, 3), (3, 0), (4, 1)];
        let a = apportion(10, &buckets).unwrap();
        assert_eq!(a.get(&1), 0);
        assert_eq!(a.get(&3), 0);
        assert_eq!(a.get(&2) + a.get(&4), 10);
    }

    #[test]
    fn zero_total_is_all_zeros() {
        let a = apportion(0, &[("x", 3u64), ("y", 4)]).unwrap();
        assert_eq!(a.sum(), 0);
        assert_eq!(a.parts.len(), 2);
        assert!(!a.degenerate);
    }

    #[test]
    fn zero_capacity_is_degenerate() {
        let a = apportion(25, &[("x", 0u64), ("y", 0)]).unwrap();
        assert!(a.degenerate);
        assert_eq!(a.sum(), 0);
        assert!(apportion::<&str>(25, &[]).unwrap().degenerate);
    }

    #[test]
    fn ties_follow_input_order() {
        // 2 over three equal weights: first two positions win the tie.
        let a = apportion(2, &[("z", 1u64), ("m", 1), ("a", 1)]).unwrap();
        assert_eq!(a.get(&"z"), 1);
        assert_eq!(a.get(&"m"), 1);
        assert_eq!(a.get(&"a"), 0);
    }

    #[test]
    fn duplicate_keys_rejected() {
        let err = apportion(5, &[("a", 1u64), ("b", 1), ("a", 2)]).unwrap_err();
        assert_eq!(err, AllocError::DuplicateKey { position: 2 });
    }

    #[test]
    fn twenty_two_over_five_workers() {
        let parts = split_even(22, 5);
        let fives = parts.values().filter(|&&v| v == 5).count();
        let fours = parts.values().filter(|&&v| v == 4).count();
        assert_eq!((fives, fours), (2, 3));
        assert_eq!(parts.get(&1), Some(&5));
        assert_eq!(parts.get(&2), Some(&5));
        assert_eq!(parts.get(&5), Some(&4));
    }

    #[test]
    fn split_even_matches_base_and_remainder() {
        for total in 0..40u64 {
            for count in 1..9u32 {
                let parts = split_even(total, count);
                let base = total / u64::from(count);
                let rem = (total % u64::from(count)) as u32;
                for (&w, &v) in &parts {
                    assert_eq!(v, if w <= rem { base + 1 } else { base });
                }
            }
        }
        assert!(split_even(10, 0).is_empty());
    }

    #[test]
    fn leftovers_cycle_when_exceeding_ranking() {
        let mut alloc = vec![0u64, 0, 0];
        distribute_leftovers(5, &mut alloc, &[2, 0]);
        assert_eq!(alloc, vec![2, 0, 3]);
    }
}
