/*
 * File: /src/grid.rs
 * Created Date: Saturday, March 7th 2026
 * Author: Zihan
 * -----
 * Last Modified: Tuesday, 10th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-10		Zihan	Expose the fitted GridModel
 * 2026-03-07		Zihan	Alternating row/column reassignment co-clustering
 */

//! Grid co-clustering (COCLUST).
//!
//! Rows are split into `k` groups and columns into `l` groups. Each rating is
//! modelled as `row_avg + col_avg - row_group_avg - col_group_avg + block_avg`
//! and rows then columns are moved to the group with the smallest squared
//! error until nothing moves. The result is the full `k x l` grid of tiles.

use log::{debug, info};
use ndarray::{Array1, Array2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::algorithm::{SearchAlgorithm, DEFAULT_SEED};
use crate::bicluster::Bicluster;
use crate::biclustering::Biclustering;
use crate::error::{ensure, Result};
use crate::matrix::RatingMatrix;

/// Observed cells indexed both ways, with per-row and per-column averages
struct Observations {
    users: Vec<i64>,
    items: Vec<i64>,
    by_user: Vec<Vec<(usize, f64)>>,
    by_item: Vec<Vec<(usize, f64)>>,
    user_means: Vec<f64>,
    item_means: Vec<f64>,
}

fn mean(cells: &[(usize, f64)]) -> f64 {
    if cells.is_empty() {
        f64::NAN
    } else {
        cells.iter().map(|&(_, v)| v).sum::<f64>() / cells.len() as f64
    }
}

impl Observations {
    fn load(matrix: &dyn RatingMatrix) -> Result<Self> {
        let users: Vec<i64> = matrix.user_ids().collect();
        let items: Vec<i64> = matrix.item_ids().collect();
        let mut by_user = Vec::with_capacity(users.len());
        let mut by_item = vec![Vec::new(); items.len()];
        for (i, &user) in users.iter().enumerate() {
            let mut row = Vec::new();
            for pref in matrix.ratings_of(user)? {
                if let Ok(j) = items.binary_search(&pref.item) {
                    row.push((j, pref.value as f64));
                    by_item[j].push((i, pref.value as f64));
                }
            }
            by_user.push(row);
        }
        let user_means = by_user.iter().map(|cells| mean(cells)).collect();
        let item_means = by_item.iter().map(|cells| mean(cells)).collect();
        Ok(Self {
            users,
            items,
            by_user,
            by_item,
            user_means,
            item_means,
        })
    }
}

/// Row-group, column-group and block averages; NaN for an empty group
#[derive(Debug, Clone)]
struct GroupMeans {
    rows: Array1<f64>,
    cols: Array1<f64>,
    blocks: Array2<f64>,
}

fn group_means(obs: &Observations, rho: &[usize], gamma: &[usize], k: usize, l: usize) -> GroupMeans {
    let mut row_sum = Array1::<f64>::zeros(k);
    let mut row_cnt = Array1::<f64>::zeros(k);
    let mut col_sum = Array1::<f64>::zeros(l);
    let mut col_cnt = Array1::<f64>::zeros(l);
    let mut block_sum = Array2::<f64>::zeros((k, l));
    let mut block_cnt = Array2::<f64>::zeros((k, l));
    for (i, cells) in obs.by_user.iter().enumerate() {
        let g = rho[i];
        for &(j, v) in cells {
            let h = gamma[j];
            row_sum[g] += v;
            row_cnt[g] += 1.0;
            col_sum[h] += v;
            col_cnt[h] += 1.0;
            block_sum[[g, h]] += v;
            block_cnt[[g, h]] += 1.0;
        }
    }
    // 0/0 leaves NaN in empty groups
    GroupMeans {
        rows: row_sum / row_cnt,
        cols: col_sum / col_cnt,
        blocks: block_sum / block_cnt,
    }
}

/// Group with the smallest cost. Ties go to the highest index, NaN costs
/// never win, and a line without ratings keeps `current`.
fn best_group(current: usize, n_groups: usize, has_ratings: bool, cost: impl Fn(usize) -> f64) -> usize {
    if !has_ratings {
        return current;
    }
    let mut best = current;
    let mut min = f64::MAX;
    for g in 0..n_groups {
        let candidate = cost(g);
        if candidate <= min {
            min = candidate;
            best = g;
        }
    }
    best
}

fn reassign_rows(obs: &Observations, means: &GroupMeans, rho: &mut [usize], gamma: &[usize]) -> usize {
    let k = means.rows.len();
    let mut changed = 0;
    for (i, cells) in obs.by_user.iter().enumerate() {
        let best = best_group(rho[i], k, !cells.is_empty(), |g| {
            cells
                .iter()
                .map(|&(j, r)| {
                    let h = gamma[j];
                    let x = r - means.blocks[[g, h]] - obs.user_means[i] + means.rows[g]
                        - obs.item_means[j]
                        + means.cols[h];
                    x * x
                })
                .sum()
        });
        if best != rho[i] {
            rho[i] = best;
            changed += 1;
        }
    }
    changed
}

fn reassign_cols(obs: &Observations, means: &GroupMeans, rho: &[usize], gamma: &mut [usize]) -> usize {
    let l = means.cols.len();
    let mut changed = 0;
    for (j, cells) in obs.by_item.iter().enumerate() {
        let best = best_group(gamma[j], l, !cells.is_empty(), |h| {
            cells
                .iter()
                .map(|&(i, r)| {
                    let g = rho[i];
                    let x = r - means.blocks[[g, h]] - obs.user_means[i] + means.rows[g]
                        - obs.item_means[j]
                        + means.cols[h];
                    x * x
                })
                .sum()
        });
        if best != gamma[j] {
            gamma[j] = best;
            changed += 1;
        }
    }
    changed
}

/// Fitted row/column groups of a [`GridCoClustering`] run.
#[derive(Debug, Clone)]
pub struct GridModel {
    user_ids: Vec<i64>,
    item_ids: Vec<i64>,
    row_assignment: Vec<usize>,
    col_assignment: Vec<usize>,
    means: GroupMeans,
    iterations: usize,
}

impl GridModel {
    pub fn row_group(&self, user: i64) -> Option<usize> {
        self.user_ids
            .binary_search(&user)
            .ok()
            .map(|i| self.row_assignment[i])
    }

    pub fn col_group(&self, item: i64) -> Option<usize> {
        self.item_ids
            .binary_search(&item)
            .ok()
            .map(|j| self.col_assignment[j])
    }

    /// Group index of every user, in ascending user id order
    pub fn row_assignment(&self) -> &[usize] {
        &self.row_assignment
    }

    pub fn col_assignment(&self) -> &[usize] {
        &self.col_assignment
    }

    pub fn row_group_means(&self) -> &Array1<f64> {
        &self.means.rows
    }

    pub fn col_group_means(&self) -> &Array1<f64> {
        &self.means.cols
    }

    /// `k x l` block averages over observed cells
    pub fn block_means(&self) -> &Array2<f64> {
        &self.means.blocks
    }

    /// Rounds of reassignment actually run
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The `k x l` tiles, g-major. Tiles of an empty group stay in place.
    pub fn biclustering(&self) -> Biclustering {
        let k = self.means.rows.len();
        let l = self.means.cols.len();
        let mut tiles = vec![Bicluster::new(); k * l];
        for (&user, &g) in self.user_ids.iter().zip(&self.row_assignment) {
            for h in 0..l {
                tiles[g * l + h].add_row(user);
            }
        }
        for (&item, &h) in self.item_ids.iter().zip(&self.col_assignment) {
            for g in 0..k {
                tiles[g * l + h].add_col(item);
            }
        }
        Biclustering::from(tiles)
    }
}

#[derive(Debug, Clone)]
pub struct GridCoClustering {
    row_groups: usize,
    col_groups: usize,
    max_iterations: usize,
    seed: u64,
    rng: StdRng,
}

impl GridCoClustering {
    pub fn new(row_groups: usize, col_groups: usize, max_iterations: usize) -> Result<Self> {
        ensure(row_groups > 0, || format!("row_groups must be > 0, got {}", row_groups))?;
        ensure(col_groups > 0, || format!("col_groups must be > 0, got {}", col_groups))?;
        Ok(Self {
            row_groups,
            col_groups,
            max_iterations,
            seed: DEFAULT_SEED,
            rng: StdRng::seed_from_u64(DEFAULT_SEED),
        })
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Run the reassignment loop and return the fitted groups.
    pub fn fit(&mut self, matrix: &dyn RatingMatrix) -> Result<GridModel> {
        self.rng = StdRng::seed_from_u64(self.seed);
        let (k, l) = (self.row_groups, self.col_groups);
        let obs = Observations::load(matrix)?;
        info!(
            "Starting grid co-clustering of {}x{} matrix into {}x{} groups",
            obs.users.len(),
            obs.items.len(),
            k,
            l
        );

        let mut rho: Vec<usize> = (0..obs.users.len()).map(|_| self.rng.random_range(0..k)).collect();
        let mut gamma: Vec<usize> = (0..obs.items.len()).map(|_| self.rng.random_range(0..l)).collect();

        let mut iterations = 0;
        loop {
            let means = group_means(&obs, &rho, &gamma, k, l);
            let moved_rows = reassign_rows(&obs, &means, &mut rho, &gamma);
            let moved_cols = reassign_cols(&obs, &means, &rho, &mut gamma);
            iterations += 1;
            debug!(
                "Round {}: {} rows and {} columns changed group",
                iterations, moved_rows, moved_cols
            );
            if moved_rows + moved_cols == 0 || iterations >= self.max_iterations {
                break;
            }
        }

        let means = group_means(&obs, &rho, &gamma, k, l);
        info!("Grid co-clustering finished after {} rounds", iterations);
        Ok(GridModel {
            user_ids: obs.users,
            item_ids: obs.items,
            row_assignment: rho,
            col_assignment: gamma,
            means,
            iterations,
        })
    }
}

impl SearchAlgorithm for GridCoClustering {
    fn name(&self) -> &str {
        "GridCoClustering"
    }

    fn run(&mut self, matrix: &dyn RatingMatrix) -> Result<Biclustering> {
        Ok(self.fit(matrix)?.biclustering())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BiclusterError;
    use crate::matrix::SparseRatingMatrix;
    use ndarray::array;

    fn random_matrix(seed: u64) -> SparseRatingMatrix {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut triples = Vec::new();
        for user in 0..20 {
            for item in 0..15 {
                if rng.random_bool(0.6) {
                    triples.push((user, item, rng.random_range(1..=5) as f32));
                }
            }
        }
        SparseRatingMatrix::from_triples(triples)
    }

    #[test]
    fn test_validation() {
        assert!(matches!(GridCoClustering::new(0, 2, 10), Err(BiclusterError::Configuration(_))));
        assert!(GridCoClustering::new(2, 0, 10).is_err());
        assert!(GridCoClustering::new(1, 1, 0).is_ok());
    }

    #[test]
    fn test_tiles_partition_the_matrix() {
        let matrix = random_matrix(1);
        let (k, l) = (3, 2);
        let mut coclust = GridCoClustering::new(k, l, 20).unwrap().with_seed(5);
        let result = coclust.run(&matrix).unwrap();
        assert_eq!(result.len(), k * l);

        let tiles = result.as_slice();
        for user in matrix.user_ids() {
            let hits = tiles.iter().filter(|b| b.contains_row(user)).count();
            assert_eq!(hits, l);
        }
        for item in matrix.item_ids() {
            let hits = tiles.iter().filter(|b| b.contains_col(item)).count();
            assert_eq!(hits, k);
        }
        let cells: usize = tiles.iter().map(|b| b.cell_count()).sum();
        assert_eq!(cells, matrix.user_count() * matrix.item_count());

        // g-major: tiles of one row group share their rows
        for g in 0..k {
            for h in 1..l {
                assert_eq!(tiles[g * l].row_set(), tiles[g * l + h].row_set());
            }
        }
    }

    #[test]
    fn test_same_seed_same_model() {
        let matrix = random_matrix(2);
        let fit = |seed| GridCoClustering::new(2, 3, 15).unwrap().with_seed(seed).fit(&matrix).unwrap();
        let a = fit(9);
        let b = fit(9);
        assert_eq!(a.row_assignment(), b.row_assignment());
        assert_eq!(a.col_assignment(), b.col_assignment());
        assert_eq!(a.biclustering(), b.biclustering());
        assert!(a.iterations() >= 1 && a.iterations() <= 15);

        assert_eq!(a.row_group_means().len(), 2);
        assert_eq!(a.col_group_means().len(), 3);
        assert_eq!(a.block_means().dim(), (2, 3));
        let same = |x: f64, y: f64| (x.is_nan() && y.is_nan()) || x == y;
        assert!(a.block_means().iter().zip(b.block_means().iter()).all(|(&x, &y)| same(x, y)));
        for &m in a.block_means().iter().chain(a.row_group_means().iter()) {
            assert!(m.is_nan() || (1.0..=5.0).contains(&m), "mean {} outside the rating scale", m);
        }
    }

    #[test]
    fn test_block_means_of_constant_blocks() {
        // rows {0, 1} rate 5 on items {0, 1}, rows {2, 3} rate 1 on items {2, 3}
        let mut triples = Vec::new();
        for user in 0..4 {
            for item in 0..4 {
                let high = user < 2 && item < 2;
                let low = user >= 2 && item >= 2;
                if high || low {
                    triples.push((user, item, if high { 5.0 } else { 1.0 }));
                }
            }
        }
        let matrix = SparseRatingMatrix::from_triples(triples);
        let model = GridCoClustering::new(1, 1, 5).unwrap().fit(&matrix).unwrap();
        assert_eq!(model.block_means()[[0, 0]], 3.0);
        assert_eq!(model.row_group_means()[0], 3.0);
        assert_eq!(model.col_group_means()[0], 3.0);
    }

    #[test]
    fn test_rerun_on_same_instance() {
        let matrix = random_matrix(6);
        let mut coclust = GridCoClustering::new(3, 3, 10).unwrap().with_seed(4);
        let first = coclust.fit(&matrix).unwrap();
        let second = coclust.fit(&matrix).unwrap();
        assert_eq!(first.row_assignment(), second.row_assignment());
        assert_eq!(first.col_assignment(), second.col_assignment());
    }

    #[test]
    fn test_at_least_one_round() {
        let matrix = random_matrix(4);
        let model = GridCoClustering::new(2, 2, 0).unwrap().fit(&matrix).unwrap();
        assert_eq!(model.iterations(), 1);
    }

    #[test]
    fn test_best_group_rules() {
        // ties go to the highest index
        assert_eq!(best_group(0, 3, true, |_| 1.0), 2);
        // NaN never wins
        assert_eq!(best_group(0, 3, true, |g| if g == 2 { f64::NAN } else { 1.0 }), 1);
        assert_eq!(best_group(1, 3, true, |_| f64::NAN), 1);
        // no ratings: stay put
        assert_eq!(best_group(1, 3, false, |_| 0.0), 1);
    }

    #[test]
    fn test_unrated_user_keeps_group_and_empty_groups_are_nan() {
        let data = array![[5.0, 1.0], [5.0, 1.0], [f32::NAN, f32::NAN]];
        let matrix = SparseRatingMatrix::from_dense(&data);
        let obs = Observations::load(&matrix).unwrap();
        assert!(obs.user_means[2].is_nan());

        let mut rho = vec![0, 0, 1];
        let gamma = vec![0, 1];
        let means = group_means(&obs, &rho, &gamma, 2, 2);
        assert!(means.rows[1].is_nan());
        assert_eq!(means.blocks[[0, 0]], 5.0);
        assert_eq!(means.blocks[[0, 1]], 1.0);

        reassign_rows(&obs, &means, &mut rho, &gamma);
        assert_eq!(rho, vec![0, 0, 1]);
    }
}
