/*
 * File: /src/lib.rs
 * Created Date: Monday, January 22nd 2024
 * Author: Zihan
 * -----
 * Last Modified: Wednesday, 11th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-11		Zihan	Biclustering search engine over sparse rating matrices
 */

//! Bicluster discovery in sparse user x item rating matrices.
//!
//! Every search strategy implements [`SearchAlgorithm`]: build it with
//! validated parameters (directly or from an [`AlgorithmConfig`]), call
//! `run` on a [`RatingMatrix`], iterate the returned [`Biclustering`].
//!
//! ```
//! use fast_bicluster::{ExhaustiveDivideConquer, SearchAlgorithm, SparseRatingMatrix};
//!
//! let matrix = SparseRatingMatrix::from_triples(vec![
//!     (1, 1, 5.0), (1, 2, 5.0),
//!     (2, 1, 5.0), (2, 2, 5.0),
//!     (3, 1, 5.0), (3, 2, 1.0),
//! ]);
//! let mut bimax = ExhaustiveDivideConquer::new(2, 2).unwrap();
//! let found = bimax.run(&matrix).unwrap();
//! assert_eq!(found.len(), 1);
//! ```

pub mod algorithm;
pub mod baseline;
pub mod batch;
pub mod bicluster;
pub mod biclustering;
pub mod config;
pub mod error;
pub mod evolutionary;
pub mod exhaustive;
pub mod grid;
pub mod matrix;
pub mod preprocessing;
pub mod seed_expansion;

pub use algorithm::SearchAlgorithm;
pub use baseline::{Interval, IntervalMotif, RandomSubsets};
pub use batch::{run_batch, run_configs, BatchOutcome};
pub use bicluster::{Bicluster, IndexedBicluster};
pub use biclustering::{Biclustering, BoundedBiclustering};
pub use config::AlgorithmConfig;
pub use error::{BiclusterError, Result};
pub use evolutionary::EvolutionarySearch;
pub use exhaustive::ExhaustiveDivideConquer;
pub use grid::{GridCoClustering, GridModel};
pub use matrix::{Preference, RatingMatrix, SparseRatingMatrix};
pub use seed_expansion::SeedExpansion;

use log::LevelFilter;

/// Install a `simple_logger` at `level` for applications using the crate.
pub fn init_logger(level: LevelFilter) -> std::result::Result<(), log::SetLoggerError> {
    simple_logger::SimpleLogger::new().with_level(level).init()
}
