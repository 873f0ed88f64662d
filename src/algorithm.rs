/*
 * File: /src/algorithm.rs
 * Created Date: Monday, March 2nd 2026
 * Author: Zihan
 * -----
 * Last Modified: Monday, 2nd March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-02		Zihan	Common interface of the search strategies
 */

use crate::biclustering::Biclustering;
use crate::error::Result;
use crate::matrix::RatingMatrix;

/// Seed of the randomized algorithms when none is given
pub const DEFAULT_SEED: u64 = 42;

/// 双聚类搜索算法trait
///
/// Implementations keep their parameters (and their random generator, when
/// they use one) in `self`; `run` never mutates the matrix. Randomized
/// algorithms reseed their generator at the start of every `run`, so running
/// one instance twice on the same matrix gives the same result.
pub trait SearchAlgorithm {
    fn name(&self) -> &str;

    fn run(&mut self, matrix: &dyn RatingMatrix) -> Result<Biclustering>;
}

impl<A: SearchAlgorithm + ?Sized> SearchAlgorithm for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn run(&mut self, matrix: &dyn RatingMatrix) -> Result<Biclustering> {
        (**self).run(matrix)
    }
}
