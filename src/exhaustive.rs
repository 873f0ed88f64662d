/*
 * File: /src/exhaustive.rs
 * Created Date: Wednesday, March 4th 2026
 * Author: Zihan
 * -----
 * Last Modified: Friday, 6th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-06		Zihan	Replace recursion with an explicit work stack
 * 2026-03-04		Zihan	Divide-and-conquer search for all-true biclusters
 */

//! Exhaustive divide-and-conquer search (Bimax).
//!
//! A cell is *true* when it is observed and its rating is above the threshold.
//! The search enumerates every inclusion-maximal all-true bicluster with at
//! least `min_rows` x `min_cols` cells, each exactly once.

use fixedbitset::FixedBitSet;
use log::{debug, info};

use crate::algorithm::SearchAlgorithm;
use crate::bicluster::IndexedBicluster;
use crate::biclustering::Biclustering;
use crate::error::{ensure, Result};
use crate::matrix::RatingMatrix;

/// Ratings above this count as "true" unless configured otherwise
pub const DEFAULT_THRESHOLD: f32 = 2.5;

#[derive(Debug, Clone)]
pub struct ExhaustiveDivideConquer {
    min_rows: usize,
    min_cols: usize,
    threshold: f32,
}

/// A pending candidate and the column sets it must still intersect
struct Task {
    candidate: IndexedBicluster,
    mandatory: Vec<FixedBitSet>,
}

impl ExhaustiveDivideConquer {
    pub fn new(min_rows: usize, min_cols: usize) -> Result<Self> {
        ensure(min_rows > 0, || format!("min_rows must be > 0, got {}", min_rows))?;
        ensure(min_cols > 0, || format!("min_cols must be > 0, got {}", min_cols))?;
        Ok(Self {
            min_rows,
            min_cols,
            threshold: DEFAULT_THRESHOLD,
        })
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// One bitset per user marking the items it rates above the threshold.
    fn truth_table(
        &self,
        matrix: &dyn RatingMatrix,
        user_ids: &[i64],
        item_ids: &[i64],
    ) -> Result<Vec<FixedBitSet>> {
        let mut table = Vec::with_capacity(user_ids.len());
        for &user in user_ids {
            let mut bits = FixedBitSet::with_capacity(item_ids.len());
            for pref in matrix.ratings_of(user)? {
                if pref.value > self.threshold {
                    if let Ok(j) = item_ids.binary_search(&pref.item) {
                        bits.insert(j);
                    }
                }
            }
            table.push(bits);
        }
        Ok(table)
    }

    fn too_small(&self, candidate: &IndexedBicluster) -> bool {
        candidate.is_degenerate()
            || candidate.row_count() < self.min_rows
            || candidate.col_count() < self.min_cols
    }
}

impl SearchAlgorithm for ExhaustiveDivideConquer {
    fn name(&self) -> &str {
        "ExhaustiveDivideConquer"
    }

    fn run(&mut self, matrix: &dyn RatingMatrix) -> Result<Biclustering> {
        let user_ids: Vec<i64> = matrix.user_ids().collect();
        let item_ids: Vec<i64> = matrix.item_ids().collect();
        info!(
            "Starting exhaustive search on {}x{} matrix (min {}x{}, threshold {})",
            user_ids.len(),
            item_ids.len(),
            self.min_rows,
            self.min_cols,
            self.threshold
        );

        let truth = self.truth_table(matrix, &user_ids, &item_ids)?;
        let mut result = Biclustering::new();
        let mut stack = vec![Task {
            candidate: IndexedBicluster::full(user_ids.len(), item_ids.len()),
            mandatory: Vec::new(),
        }];
        let mut visited = 0usize;

        while let Some(Task { candidate, mandatory }) = stack.pop() {
            visited += 1;
            if self.too_small(&candidate) {
                continue;
            }
            let cols = candidate.col_bits();
            if mandatory.iter().any(|set| set.intersection(cols).next().is_none()) {
                continue;
            }

            // first row with a false cell among the candidate columns
            let template = candidate
                .rows()
                .find(|&r| cols.difference(&truth[r]).next().is_some());

            let Some(template) = template else {
                let found = candidate.to_bicluster(&user_ids, &item_ids);
                debug!("Registered bicluster {}", found);
                result.add(found);
                continue;
            };

            let mut u_cols = cols.clone();
            u_cols.intersect_with(&truth[template]);
            let mut v_cols = cols.clone();
            v_cols.difference_with(&truth[template]);

            let mut u_branch = IndexedBicluster::with_capacity(user_ids.len(), item_ids.len());
            let mut v_branch = IndexedBicluster::with_capacity(user_ids.len(), item_ids.len());
            for r in candidate.rows() {
                if truth[r].intersection(&u_cols).next().is_some() {
                    u_branch.add_row(r);
                }
                if truth[r].intersection(&v_cols).next().is_some() {
                    v_branch.add_row(r);
                }
            }
            u_branch.set_cols(u_cols);
            v_branch.set_cols(cols.clone());

            let mut v_mandatory = mandatory.clone();
            v_mandatory.push(v_cols);

            // LIFO: the U-branch is explored first
            stack.push(Task {
                candidate: v_branch,
                mandatory: v_mandatory,
            });
            stack.push(Task {
                candidate: u_branch,
                mandatory,
            });
        }

        info!(
            "Exhaustive search finished: {} biclusters, {} candidates visited",
            result.len(),
            visited
        );
        Ok(result)
    }
}
