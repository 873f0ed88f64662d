/*
 * File: /src/baseline.rs
 * Created Date: Sunday, March 8th 2026
 * Author: Zihan
 * -----
 * Last Modified: Sunday, 8th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-08		Zihan	Random-subset and interval-motif reference generators
 */

//! Cheap generators used as reference points when comparing the searches.

use std::collections::HashMap;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::{IndexedRandom, SliceRandom};
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::algorithm::{SearchAlgorithm, DEFAULT_SEED};
use crate::bicluster::Bicluster;
use crate::biclustering::Biclustering;
use crate::error::{ensure, Result};
use crate::matrix::RatingMatrix;

/// `count` biclusters made of uniformly random user and item prefixes.
#[derive(Debug, Clone)]
pub struct RandomSubsets {
    count: usize,
    seed: u64,
    rng: StdRng,
}

impl RandomSubsets {
    pub fn new(count: usize) -> Result<Self> {
        ensure(count > 0, || format!("count must be > 0, got {}", count))?;
        Ok(Self {
            count,
            seed: DEFAULT_SEED,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }
}

impl SearchAlgorithm for RandomSubsets {
    fn name(&self) -> &str {
        "RandomSubsets"
    }

    fn run(&mut self, matrix: &dyn RatingMatrix) -> Result<Biclustering> {
        self.rng = StdRng::seed_from_u64(self.seed);
        let mut users: Vec<i64> = matrix.user_ids().collect();
        let mut items: Vec<i64> = matrix.item_ids().collect();
        let mut result = Biclustering::new();
        if users.is_empty() || items.is_empty() {
            return Ok(result);
        }

        for _ in 0..self.count {
            let n_rows = self.rng.random_range(1..=users.len());
            let n_cols = self.rng.random_range(1..=items.len());
            users.shuffle(&mut self.rng);
            items.shuffle(&mut self.rng);
            result.add(Bicluster::from_ids(
                users[..n_rows].iter().copied(),
                items[..n_cols].iter().copied(),
            ));
        }
        info!("Generated {} random biclusters", result.len());
        Ok(result)
    }
}

/// Range of rating values, each bound inclusive or exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub lower: f64,
    pub include_lower: bool,
    pub upper: f64,
    pub include_upper: bool,
}

impl Interval {
    pub fn new(lower: f64, include_lower: bool, upper: f64, include_upper: bool) -> Self {
        Self {
            lower,
            include_lower,
            upper,
            include_upper,
        }
    }

    /// `[lower, upper]`
    pub fn closed(lower: f64, upper: f64) -> Self {
        Self::new(lower, true, upper, true)
    }

    pub fn contains(&self, x: f64) -> bool {
        let above = if self.include_lower { x >= self.lower } else { x > self.lower };
        let below = if self.include_upper { x <= self.upper } else { x < self.upper };
        above && below
    }
}

/// Conserved-state motif sampling (xMotif).
///
/// Around a random anchor user, an item is kept when a random sample of users
/// all rate it inside the same interval as the anchor does. The bicluster then
/// takes every user consistent with the kept items.
#[derive(Debug, Clone)]
pub struct IntervalMotif {
    seeds: usize,
    draws_per_seed: usize,
    sample_size: usize,
    intervals: Vec<Interval>,
    seed: u64,
    rng: StdRng,
}

impl IntervalMotif {
    pub fn new(seeds: usize, draws_per_seed: usize, sample_size: usize, intervals: Vec<Interval>) -> Result<Self> {
        ensure(seeds > 0, || format!("seeds must be > 0, got {}", seeds))?;
        ensure(draws_per_seed > 0, || {
            format!("draws_per_seed must be > 0, got {}", draws_per_seed)
        })?;
        ensure(sample_size > 0, || format!("sample_size must be > 0, got {}", sample_size))?;
        ensure(!intervals.is_empty(), || "intervals must not be empty".to_string())?;
        Ok(Self {
            seeds,
            draws_per_seed,
            sample_size,
            intervals,
            seed: DEFAULT_SEED,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    fn in_interval(matrix: &dyn RatingMatrix, user: i64, item: i64, interval: &Interval) -> Result<bool> {
        Ok(matrix
            .rating(user, item)?
            .is_some_and(|r| interval.contains(r as f64)))
    }

    /// One draw around `anchor`; `None` when no item survives the sample.
    fn draw(&mut self, matrix: &dyn RatingMatrix, anchor: i64, users: &mut [i64]) -> Result<Option<Bicluster>> {
        users.shuffle(&mut self.rng);
        let sample = &users[..self.sample_size.min(users.len())];

        let mut states: HashMap<i64, Interval> = HashMap::new();
        for pref in matrix.ratings_of(anchor)? {
            let candidates: Vec<&Interval> = self
                .intervals
                .iter()
                .filter(|s| s.contains(pref.value as f64))
                .collect();
            let Some(&&state) = candidates.choose(&mut self.rng) else {
                continue;
            };
            let mut valid = true;
            for &user in sample {
                if !Self::in_interval(matrix, user, pref.item, &state)? {
                    valid = false;
                    break;
                }
            }
            if valid {
                states.insert(pref.item, state);
            }
        }
        if states.is_empty() {
            return Ok(None);
        }

        let mut b = Bicluster::new();
        for &item in states.keys() {
            b.add_col(item);
        }
        for user in matrix.user_ids() {
            let mut valid = true;
            for (&item, state) in &states {
                if !Self::in_interval(matrix, user, item, state)? {
                    valid = false;
                    break;
                }
            }
            if valid {
                b.add_row(user);
            }
        }
        Ok(Some(b))
    }
}

impl SearchAlgorithm for IntervalMotif {
    fn name(&self) -> &str {
        "IntervalMotif"
    }

    fn run(&mut self, matrix: &dyn RatingMatrix) -> Result<Biclustering> {
        self.rng = StdRng::seed_from_u64(self.seed);
        let ids: Vec<i64> = matrix.user_ids().collect();
        let mut users = ids.clone();
        let mut result = Biclustering::new();
        info!(
            "Starting motif sampling: {} seeds x {} draws, sample size {}",
            self.seeds, self.draws_per_seed, self.sample_size
        );

        for _ in 0..self.seeds {
            let Some(&anchor) = ids.choose(&mut self.rng) else {
                break;
            };
            for _ in 0..self.draws_per_seed {
                match self.draw(matrix, anchor, &mut users)? {
                    Some(b) => {
                        debug!("Motif around user {}: {}", anchor, b);
                        result.add(b);
                    }
                    None => debug!("Draw around user {} kept no item", anchor),
                }
            }
        }
        info!("Motif sampling produced {} biclusters", result.len());
        Ok(result)
    }
}
