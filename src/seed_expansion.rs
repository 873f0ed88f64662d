/*
 * File: /src/seed_expansion.rs
 * Created Date: Thursday, March 5th 2026
 * Author: Zihan
 * -----
 * Last Modified: Saturday, 7th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-07		Zihan	Binarize both sides of a seed comparison
 * 2026-03-05		Zihan	Seed-and-expand search with consistency relaxation
 */

//! Seed expansion (QUBIC).
//!
//! User pairs are scored by how many items they rate identically, the best
//! pairs are grown into biclusters, first keeping every column fully
//! consistent and then relaxing to a `consistency` share.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use log::{debug, info};

use crate::algorithm::SearchAlgorithm;
use crate::bicluster::Bicluster;
use crate::biclustering::{Biclustering, BoundedBiclustering};
use crate::error::{ensure, Result};
use crate::matrix::RatingMatrix;

#[derive(Debug, Clone)]
pub struct SeedExpansion {
    consistency: f64,
    max_results: usize,
    overlap: f64,
    binarize_threshold: Option<f32>,
}

/// Candidate user pair. The heap pops the highest score, then the smallest pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Seed {
    score: usize,
    u1: i64,
    u2: i64,
}

impl Ord for Seed {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| other.u1.cmp(&self.u1))
            .then_with(|| other.u2.cmp(&self.u2))
    }
}

impl PartialOrd for Seed {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Matrix snapshot with binarization applied
struct Levels {
    users: Vec<i64>,
    items: Vec<i64>,
    cells: HashMap<i64, HashMap<i64, f32>>,
}

impl Levels {
    fn load(matrix: &dyn RatingMatrix, binarize: Option<f32>) -> Result<Self> {
        let users: Vec<i64> = matrix.user_ids().collect();
        let items: Vec<i64> = matrix.item_ids().collect();
        let mut cells = HashMap::with_capacity(users.len());
        for &user in &users {
            let row: HashMap<i64, f32> = matrix
                .ratings_of(user)?
                .iter()
                .map(|p| {
                    let value = match binarize {
                        Some(t) if p.value >= t => 1.0,
                        Some(_) => 0.0,
                        None => p.value,
                    };
                    (p.item, value)
                })
                .collect();
            cells.insert(user, row);
        }
        Ok(Self { users, items, cells })
    }

    fn value(&self, user: i64, item: i64) -> Option<f32> {
        self.cells.get(&user).and_then(|row| row.get(&item)).copied()
    }

    /// Items on which both users agree on a non-zero value
    fn agreement(&self, u1: i64, u2: i64) -> Vec<(i64, f32)> {
        let (Some(r1), Some(r2)) = (self.cells.get(&u1), self.cells.get(&u2)) else {
            return Vec::new();
        };
        let mut agreed: Vec<(i64, f32)> = r1
            .iter()
            .filter(|&(item, v)| *v != 0.0 && r2.get(item) == Some(v))
            .map(|(&item, &v)| (item, v))
            .collect();
        agreed.sort_by_key(|&(item, _)| item);
        agreed
    }
}

/// Accepted biclusters and, per user, the ones containing it
#[derive(Default)]
struct Accepted {
    biclusters: Vec<Bicluster>,
    by_user: HashMap<i64, Vec<usize>>,
}

impl Accepted {
    fn push(&mut self, bicluster: Bicluster) {
        let idx = self.biclusters.len();
        for user in bicluster.rows() {
            self.by_user.entry(user).or_default().push(idx);
        }
        self.biclusters.push(bicluster);
    }

    fn len(&self) -> usize {
        self.biclusters.len()
    }

    /// A seed whose users are both already covered only counts if they sit in
    /// two row-disjoint biclusters no larger than the seed score.
    fn admits(&self, seed: &Seed) -> bool {
        let (Some(in1), Some(in2)) = (self.by_user.get(&seed.u1), self.by_user.get(&seed.u2)) else {
            return true;
        };
        in1.iter().any(|&i| {
            let b1 = &self.biclusters[i];
            in2.iter().any(|&j| {
                let b2 = &self.biclusters[j];
                seed.score >= b1.row_count()
                    && seed.score >= b2.row_count()
                    && b1.row_set().is_disjoint(b2.row_set())
            })
        })
    }

    fn overlaps(&self, candidate: &Bicluster, limit: f64) -> bool {
        self.biclusters.iter().any(|b| candidate.overlap(b) > limit)
    }
}

impl SeedExpansion {
    pub fn new(consistency: f64, max_results: usize, overlap: f64) -> Result<Self> {
        ensure(consistency > 0.0 && consistency <= 1.0, || {
            format!("consistency must be in (0, 1], got {}", consistency)
        })?;
        ensure(max_results > 0, || {
            format!("max_results must be > 0, got {}", max_results)
        })?;
        ensure((0.0..=1.0).contains(&overlap), || {
            format!("overlap must be in [0, 1], got {}", overlap)
        })?;
        Ok(Self {
            consistency,
            max_results,
            overlap,
            binarize_threshold: None,
        })
    }

    /// Compare ratings as `1.0` when `>= threshold`, `0.0` otherwise
    pub fn with_binarize_threshold(mut self, threshold: f32) -> Self {
        self.binarize_threshold = Some(threshold);
        self
    }

    fn score_seeds(&self, levels: &Levels) -> BinaryHeap<Seed> {
        let n = levels.users.len();
        let mut seeds = BinaryHeap::with_capacity(n * n.saturating_sub(1) / 2);
        for (i, &u1) in levels.users.iter().enumerate() {
            for &u2 in &levels.users[i + 1..] {
                let score = levels.agreement(u1, u2).len();
                seeds.push(Seed { score, u1, u2 });
            }
        }
        seeds
    }

    /// Grow one seed into a candidate bicluster; `None` when the pair agrees on nothing.
    fn expand(&self, seed: &Seed, levels: &Levels) -> Option<Bicluster> {
        let agreed = levels.agreement(seed.u1, seed.u2);
        if agreed.is_empty() {
            return None;
        }
        let mut dominant: HashMap<i64, f32> = agreed.iter().copied().collect();
        let mut b = Bicluster::from_ids([seed.u1, seed.u2], agreed.iter().map(|&(item, _)| item));

        // strict: every column stays identical to the first seed user
        for &user in &levels.users {
            if user == seed.u1 || user == seed.u2 {
                continue;
            }
            let mut trial = b.clone();
            trial.add_row(user);
            for item in b.cols() {
                let reference = levels.value(seed.u1, item);
                if reference.is_none() || levels.value(user, item) != reference {
                    trial.remove_col(item);
                }
            }
            if trial.size_key() >= b.size_key() {
                b = trial;
            }
        }

        if self.consistency < 1.0 {
            for &item in &levels.items {
                if b.contains_col(item) {
                    continue;
                }
                if let Some(value) = self.majority(&b, item, levels) {
                    b.add_col(item);
                    dominant.insert(item, value);
                }
                self.admit_users(&mut b, &dominant, levels);
            }
        }
        Some(b)
    }

    /// Dominant value of `item` among the rows of `b`, if it is consistent enough.
    /// On equal counts the value reached first wins.
    fn majority(&self, b: &Bicluster, item: i64, levels: &Levels) -> Option<f32> {
        let mut counts: HashMap<u32, usize> = HashMap::new();
        let mut best: Option<(usize, f32)> = None;
        for user in b.rows() {
            if let Some(value) = levels.value(user, item) {
                let count = counts.entry(value.to_bits()).or_insert(0);
                *count += 1;
                if best.map_or(true, |(max, _)| *count > max) {
                    best = Some((*count, value));
                }
            }
        }
        let (max, value) = best?;
        (max as f64 / b.row_count() as f64 >= self.consistency).then_some(value)
    }

    fn admit_users(&self, b: &mut Bicluster, dominant: &HashMap<i64, f32>, levels: &Levels) {
        for &user in &levels.users {
            if b.contains_row(user) {
                continue;
            }
            let common = b
                .cols()
                .filter(|&item| match levels.value(user, item) {
                    Some(v) => v != 0.0 && dominant.get(&item) == Some(&v),
                    None => false,
                })
                .count();
            if common as f64 / b.col_count() as f64 >= self.consistency {
                debug!("Admitting user {} ({} consistent items)", user, common);
                b.add_row(user);
            }
        }
    }

    /// Accepted biclusters in acceptance order. Each one overlaps every
    /// earlier one by at most `overlap` (measured on the later bicluster).
    fn search(&self, matrix: &dyn RatingMatrix) -> Result<Vec<Bicluster>> {
        let levels = Levels::load(matrix, self.binarize_threshold)?;
        info!(
            "Starting seed expansion on {} users (consistency {}, max {}, overlap {})",
            levels.users.len(),
            self.consistency,
            self.max_results,
            self.overlap
        );

        let mut seeds = self.score_seeds(&levels);
        debug!("Scored {} seeds", seeds.len());

        let mut accepted = Accepted::default();
        while accepted.len() < self.max_results {
            let Some(seed) = seeds.pop() else {
                break;
            };
            if !accepted.admits(&seed) {
                continue;
            }
            let Some(candidate) = self.expand(&seed, &levels) else {
                continue;
            };
            if accepted.overlaps(&candidate, self.overlap) {
                debug!("Rejected {} by overlap", candidate);
                continue;
            }
            debug!("Accepted {} from seed ({}, {})", candidate, seed.u1, seed.u2);
            accepted.push(candidate);
        }

        info!("Seed expansion finished with {} biclusters", accepted.len());
        Ok(accepted.biclusters)
    }

    /// Run the search and keep the result ranked by `min(|rows|, |cols|)`.
    pub fn run_bounded(&mut self, matrix: &dyn RatingMatrix) -> Result<BoundedBiclustering> {
        let mut result = BoundedBiclustering::by_size(self.max_results);
        for bicluster in self.search(matrix)? {
            result.add(bicluster);
        }
        Ok(result)
    }
}

impl SearchAlgorithm for SeedExpansion {
    fn name(&self) -> &str {
        "SeedExpansion"
    }

    fn run(&mut self, matrix: &dyn RatingMatrix) -> Result<Biclustering> {
        Ok(self.run_bounded(matrix)?.into_biclustering())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BiclusterError;
    use crate::matrix::SparseRatingMatrix;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn two_blocks() -> SparseRatingMatrix {
        let mut triples = Vec::new();
        for user in 1..=3 {
            for item in 1..=3 {
                triples.push((user, item, 5.0));
            }
        }
        for user in 4..=6 {
            for item in 4..=6 {
                triples.push((user, item, 3.0));
            }
        }
        SparseRatingMatrix::from_triples(triples)
    }

    #[test]
    fn test_validation() {
        assert!(matches!(SeedExpansion::new(0.0, 5, 0.5), Err(BiclusterError::Configuration(_))));
        assert!(SeedExpansion::new(1.5, 5, 0.5).is_err());
        assert!(SeedExpansion::new(1.0, 0, 0.5).is_err());
        assert!(SeedExpansion::new(1.0, 5, -0.1).is_err());
        assert!(SeedExpansion::new(1.0, 5, 1.1).is_err());
        assert!(SeedExpansion::new(1.0, 5, 1.0).is_ok());
    }

    #[test]
    fn test_seed_order() {
        let mut heap = BinaryHeap::new();
        heap.push(Seed { score: 2, u1: 1, u2: 3 });
        heap.push(Seed { score: 2, u1: 1, u2: 2 });
        heap.push(Seed { score: 5, u1: 4, u2: 9 });
        assert_eq!(heap.pop().map(|s| (s.u1, s.u2)), Some((4, 9)));
        assert_eq!(heap.pop().map(|s| (s.u1, s.u2)), Some((1, 2)));
        assert_eq!(heap.pop().map(|s| (s.u1, s.u2)), Some((1, 3)));
    }

    #[test]
    fn test_finds_planted_blocks() {
        let mut qubic = SeedExpansion::new(1.0, 2, 0.0).unwrap();
        let result = qubic.run(&two_blocks()).unwrap();
        assert_eq!(
            result.as_slice(),
            &[
                Bicluster::from_ids([1, 2, 3], [1, 2, 3]),
                Bicluster::from_ids([4, 5, 6], [4, 5, 6]),
            ]
        );
    }

    #[test]
    fn test_relaxed_expansion_tolerates_noise() {
        let mut triples = Vec::new();
        for user in 1..=3 {
            for item in 1..=4 {
                triples.push((user, item, 1.0));
            }
        }
        triples.push((3, 4, 2.0));
        let matrix = SparseRatingMatrix::from_triples(triples);

        let strict = SeedExpansion::new(1.0, 1, 1.0).unwrap().run(&matrix).unwrap();
        assert_eq!(strict.as_slice(), &[Bicluster::from_ids([1, 2, 3], [1, 2, 3])]);

        let relaxed = SeedExpansion::new(0.6, 1, 1.0).unwrap().run(&matrix).unwrap();
        assert_eq!(relaxed.as_slice(), &[Bicluster::from_ids([1, 2, 3], [1, 2, 3, 4])]);
    }

    #[test]
    fn test_binarized_comparison() {
        let matrix = SparseRatingMatrix::from_triples(vec![(1, 1, 4.0), (1, 2, 5.0), (2, 1, 5.0), (2, 2, 4.0)]);
        let raw = SeedExpansion::new(1.0, 3, 1.0).unwrap().run(&matrix).unwrap();
        assert!(raw.is_empty());

        let mut binary = SeedExpansion::new(1.0, 3, 1.0).unwrap().with_binarize_threshold(4.0);
        let result = binary.run(&matrix).unwrap();
        assert_eq!(result.as_slice(), &[Bicluster::from_ids([1, 2], [1, 2])]);
    }

    #[test]
    fn test_zero_overlap_gives_cell_disjoint_results() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut triples = Vec::new();
        for user in 0..12 {
            for item in 0..10 {
                if rng.random_bool(0.8) {
                    triples.push((user, item, rng.random_range(1..=3) as f32));
                }
            }
        }
        let matrix = SparseRatingMatrix::from_triples(triples);
        let mut qubic = SeedExpansion::new(0.8, 6, 0.0).unwrap();
        let result = qubic.run_bounded(&matrix).unwrap();
        assert!(result.len() <= 6);
        let found: Vec<Bicluster> = result.into_sorted_vec();
        for (i, a) in found.iter().enumerate() {
            assert!(!a.is_degenerate());
            for b in &found[i + 1..] {
                assert_eq!(a.common_cells(b), 0, "{} and {} share cells", a, b);
            }
        }
    }

    #[test]
    fn test_later_biclusters_respect_overlap_limit() {
        for (seed, consistency, limit) in [(3, 1.0, 0.3), (4, 0.8, 0.5), (5, 1.0, 0.3), (6, 0.8, 0.5)] {
            let mut rng = StdRng::seed_from_u64(seed);
            let mut triples = Vec::new();
            for user in 0..10 {
                for item in 0..8 {
                    if rng.random_bool(0.8) {
                        triples.push((user, item, rng.random_range(1..=2) as f32));
                    }
                }
            }
            let matrix = SparseRatingMatrix::from_triples(triples);
            let qubic = SeedExpansion::new(consistency, 8, limit).unwrap();
            let accepted = qubic.search(&matrix).unwrap();
            assert!(accepted.len() <= 8);
            for (j, later) in accepted.iter().enumerate() {
                for earlier in &accepted[..j] {
                    assert!(
                        later.overlap(earlier) <= limit,
                        "{} covers {} of {}",
                        later,
                        later.overlap(earlier),
                        earlier
                    );
                }
            }
        }
    }
}
