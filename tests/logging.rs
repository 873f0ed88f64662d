//! The application logger can be installed once per process, so this lives
//! in its own test binary.

use fast_bicluster::{init_logger, RandomSubsets, SearchAlgorithm, SparseRatingMatrix};
use log::LevelFilter;

#[test]
fn test_init_logger_then_run() {
    assert!(init_logger(LevelFilter::Debug).is_ok());
    // a second logger is refused
    assert!(init_logger(LevelFilter::Info).is_err());

    let matrix = SparseRatingMatrix::from_triples(vec![(1, 1, 3.0), (2, 2, 4.0)]);
    let result = RandomSubsets::new(2).unwrap().run(&matrix).unwrap();
    assert_eq!(result.len(), 2);
}
