/*
 * File: /src/evolutionary.rs
 * Created Date: Friday, March 6th 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 9th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-09		Zihan	Uniform row/column choice in mutation, cached fitness
 * 2026-03-06		Zihan	Randomized local search with suppression (BicaiNet)
 */

use log::{debug, info};
use ndarray::{Array2, Axis};
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

use crate::algorithm::{SearchAlgorithm, DEFAULT_SEED};
use crate::bicluster::Bicluster;
use crate::biclustering::Biclustering;
use crate::error::{ensure, Result};
use crate::matrix::RatingMatrix;

/// Common-cell count above which two individuals compete during suppression
pub const DEFAULT_SUPPRESSION_THRESHOLD: usize = 10;

/// Mean squared residue of `b`.
///
/// Row, column and grand means run over every cell of the block with
/// unobserved cells counted as 0. Squared deviations are summed over the
/// observed cells only and divided by the full cell count.
pub fn residue(b: &Bicluster, matrix: &dyn RatingMatrix) -> Result<f64> {
    let rows: Vec<i64> = b.rows().collect();
    let cols: Vec<i64> = b.cols().collect();
    let (n, m) = (rows.len(), cols.len());
    if n == 0 || m == 0 {
        return Ok(0.0);
    }

    let mut values = Array2::<f64>::zeros((n, m));
    let mut observed = Array2::<bool>::from_elem((n, m), false);
    for (i, &user) in rows.iter().enumerate() {
        for (j, &item) in cols.iter().enumerate() {
            if let Some(r) = matrix.rating(user, item)? {
                values[[i, j]] = r as f64;
                observed[[i, j]] = true;
            }
        }
    }

    let row_means = values.sum_axis(Axis(1)) / m as f64;
    let col_means = values.sum_axis(Axis(0)) / n as f64;
    let grand_mean = values.sum() / (n * m) as f64;

    let mut s = 0.0;
    for ((i, j), &v) in values.indexed_iter() {
        if observed[[i, j]] {
            let x = v - row_means[i] - col_means[j] + grand_mean;
            s += x * x;
        }
    }
    Ok(s / (n * m) as f64)
}

#[derive(Debug, Clone)]
struct Individual {
    bicluster: Bicluster,
    fitness: f64,
}

/// Immune-network style local search (BicaiNet).
///
/// A population of small biclusters is mutated one cell line at a time and
/// periodically thinned out so that overlapping individuals do not pile up.
/// Lower fitness is better.
#[derive(Debug, Clone)]
pub struct EvolutionarySearch {
    row_weight: f64,
    col_weight: f64,
    lambda: f64,
    max_iterations: usize,
    suppression_period: usize,
    initial_seed_count: usize,
    suppression_threshold: usize,
    seed: u64,
    rng: StdRng,
}

impl EvolutionarySearch {
    pub fn new(
        row_weight: f64,
        col_weight: f64,
        lambda: f64,
        max_iterations: usize,
        suppression_period: usize,
        initial_seed_count: usize,
    ) -> Result<Self> {
        ensure(lambda > 0.0, || format!("lambda must be > 0, got {}", lambda))?;
        ensure(suppression_period > 0, || {
            format!("suppression_period must be > 0, got {}", suppression_period)
        })?;
        ensure(initial_seed_count > 0, || {
            format!("initial_seed_count must be > 0, got {}", initial_seed_count)
        })?;
        Ok(Self {
            row_weight,
            col_weight,
            lambda,
            max_iterations,
            suppression_period,
            initial_seed_count,
            suppression_threshold: DEFAULT_SUPPRESSION_THRESHOLD,
            seed: DEFAULT_SEED,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn with_suppression_threshold(mut self, cells: usize) -> Self {
        self.suppression_threshold = cells;
        self
    }

    /// `residue/lambda + col_weight*lambda/|cols| + row_weight*lambda/|rows|`
    pub fn fitness(&self, b: &Bicluster, matrix: &dyn RatingMatrix) -> Result<f64> {
        let r = residue(b, matrix)?;
        Ok(r / self.lambda
            + self.col_weight * self.lambda / b.col_count() as f64
            + self.row_weight * self.lambda / b.row_count() as f64)
    }

    /// Add a singleton bicluster for each observed cell with probability
    /// `target / total`.
    fn seed_population(
        &mut self,
        matrix: &dyn RatingMatrix,
        population: &mut Vec<Individual>,
        target: usize,
        total: usize,
    ) -> Result<()> {
        if target == 0 || total == 0 {
            return Ok(());
        }
        let p = target as f64 / total as f64;
        for user in matrix.user_ids() {
            for pref in matrix.ratings_of(user)? {
                if self.rng.random::<f64>() <= p {
                    let bicluster = Bicluster::from_ids([user], [pref.item]);
                    let fitness = self.fitness(&bicluster, matrix)?;
                    population.push(Individual { bicluster, fitness });
                }
            }
        }
        Ok(())
    }

    /// Insert or remove one row or column. `false` when nothing could change.
    fn mutate(&mut self, b: &mut Bicluster, users: &[i64], items: &[i64]) -> bool {
        let insert = self.rng.random_bool(0.5);
        let on_rows = self.rng.random_bool(0.5);
        let picked = match (insert, on_rows) {
            (true, true) => {
                let absent: Vec<i64> = users.iter().copied().filter(|&u| !b.contains_row(u)).collect();
                absent.choose(&mut self.rng).copied()
            }
            (true, false) => {
                let absent: Vec<i64> = items.iter().copied().filter(|&i| !b.contains_col(i)).collect();
                absent.choose(&mut self.rng).copied()
            }
            (false, true) => {
                let present: Vec<i64> = b.rows().collect();
                present.choose(&mut self.rng).copied()
            }
            (false, false) => {
                let present: Vec<i64> = b.cols().collect();
                present.choose(&mut self.rng).copied()
            }
        };
        let Some(id) = picked else {
            return false;
        };
        match (insert, on_rows) {
            (true, true) => b.add_row(id),
            (true, false) => b.add_col(id),
            (false, true) => b.remove_row(id),
            (false, false) => b.remove_col(id),
        }
        true
    }

    /// Drop the worse member of every pair sharing more than the threshold
    /// of cells; the earlier one survives a tie. Returns how many were dropped.
    fn suppress(&self, population: &mut Vec<Individual>) -> usize {
        let n = population.len();
        let mut doomed = vec![false; n];
        for i in 0..n {
            for j in (i + 1)..n {
                let (a, b) = (&population[i], &population[j]);
                if a.bicluster.common_cells(&b.bicluster) > self.suppression_threshold {
                    if a.fitness <= b.fitness {
                        doomed[j] = true;
                    } else {
                        doomed[i] = true;
                    }
                }
            }
        }
        let removed = doomed.iter().filter(|&&d| d).count();
        if removed > 0 {
            *population = population
                .drain(..)
                .zip(doomed)
                .filter(|(_, d)| !d)
                .map(|(individual, _)| individual)
                .collect();
        }
        removed
    }
}

impl SearchAlgorithm for EvolutionarySearch {
    fn name(&self) -> &str {
        "EvolutionarySearch"
    }

    fn run(&mut self, matrix: &dyn RatingMatrix) -> Result<Biclustering> {
        self.rng = StdRng::seed_from_u64(self.seed);
        let users: Vec<i64> = matrix.user_ids().collect();
        let items: Vec<i64> = matrix.item_ids().collect();
        let total = matrix.rating_count()?;
        info!(
            "Starting evolutionary search on {}x{} matrix ({} ratings, {} iterations)",
            users.len(),
            items.len(),
            total,
            self.max_iterations
        );

        let mut population = Vec::new();
        let target = self.initial_seed_count;
        self.seed_population(matrix, &mut population, target, total)?;
        debug!("Initial population of {}", population.len());

        for k in 0..self.max_iterations {
            let mut replaced = 0;
            for idx in 0..population.len() {
                let mut mutant = population[idx].bicluster.clone();
                if !self.mutate(&mut mutant, &users, &items) || mutant.is_degenerate() {
                    continue;
                }
                let fitness = self.fitness(&mutant, matrix)?;
                if fitness <= population[idx].fitness {
                    population[idx] = Individual {
                        bicluster: mutant,
                        fitness,
                    };
                    replaced += 1;
                }
            }
            if k % self.suppression_period == 0 {
                let removed = self.suppress(&mut population);
                self.seed_population(matrix, &mut population, removed, total)?;
                debug!("Iteration {}: {} replaced, {} suppressed", k, replaced, removed);
            }
        }

        info!("Evolutionary search finished with {} biclusters", population.len());
        Ok(population.into_iter().map(|ind| ind.bicluster).collect())
    }
}
