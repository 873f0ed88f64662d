/*
 * File: /src/batch.rs
 * Created Date: Wednesday, March 11th 2026
 * Author: Zihan
 * -----
 * Last Modified: Wednesday, 11th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-11		Zihan	Run independent searches concurrently on one matrix
 */

use std::time::{Duration, Instant};

use log::info;
use rayon::prelude::*;

use crate::algorithm::SearchAlgorithm;
use crate::biclustering::Biclustering;
use crate::config::AlgorithmConfig;
use crate::error::Result;
use crate::matrix::RatingMatrix;

/// Result of one algorithm within a batch
#[derive(Debug)]
pub struct BatchOutcome {
    pub name: String,
    pub result: Result<Biclustering>,
    pub elapsed: Duration,
}

/// Run every algorithm on `matrix`, in parallel. Outcomes keep the input order.
///
/// A failing algorithm does not stop the others; its error is reported in
/// its own outcome.
pub fn run_batch(
    algorithms: &mut [Box<dyn SearchAlgorithm + Send>],
    matrix: &(dyn RatingMatrix + Sync),
) -> Vec<BatchOutcome> {
    let start = Instant::now();
    info!("Starting batch of {} algorithms", algorithms.len());

    let outcomes: Vec<BatchOutcome> = algorithms
        .par_iter_mut()
        .map(|algorithm| {
            let started = Instant::now();
            let result = algorithm.run(matrix);
            let elapsed = started.elapsed();
            info!(
                "{} finished in {:?} ({})",
                algorithm.name(),
                elapsed,
                match &result {
                    Ok(found) => format!("{} biclusters", found.len()),
                    Err(e) => format!("failed: {}", e),
                }
            );
            BatchOutcome {
                name: algorithm.name().to_string(),
                result,
                elapsed,
            }
        })
        .collect();

    info!("Batch completed in {:?}", start.elapsed());
    outcomes
}

/// Build every configuration, then run them with [`run_batch`].
/// Fails before running anything if one configuration is invalid.
pub fn run_configs(configs: &[AlgorithmConfig], matrix: &(dyn RatingMatrix + Sync)) -> Result<Vec<BatchOutcome>> {
    let mut algorithms = configs
        .iter()
        .map(AlgorithmConfig::build)
        .collect::<Result<Vec<_>>>()?;
    Ok(run_batch(&mut algorithms, matrix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::RandomSubsets;
    use crate::exhaustive::ExhaustiveDivideConquer;
    use crate::matrix::SparseRatingMatrix;

    fn matrix() -> SparseRatingMatrix {
        let triples = (0..6).flat_map(|u| (0..5).map(move |i| (u, i, if (u + i) % 2 == 0 { 5.0 } else { 1.0 })));
        SparseRatingMatrix::from_triples(triples)
    }

    #[test]
    fn test_batch_matches_sequential_runs() {
        let m = matrix();
        let mut algorithms: Vec<Box<dyn SearchAlgorithm + Send>> = vec![
            Box::new(ExhaustiveDivideConquer::new(2, 2).unwrap()),
            Box::new(RandomSubsets::new(5).unwrap().with_seed(1)),
        ];
        let outcomes = run_batch(&mut algorithms, &m);
        assert_eq!(outcomes.len(), 2);
        assert_eq!(outcomes[0].name, "ExhaustiveDivideConquer");
        assert_eq!(outcomes[1].name, "RandomSubsets");

        let sequential = ExhaustiveDivideConquer::new(2, 2).unwrap().run(&m).unwrap();
        assert_eq!(outcomes[0].result.as_ref().unwrap(), &sequential);
        let sequential = RandomSubsets::new(5).unwrap().with_seed(1).run(&m).unwrap();
        assert_eq!(outcomes[1].result.as_ref().unwrap(), &sequential);
    }

    #[test]
    fn test_run_configs_rejects_invalid() {
        let configs = AlgorithmConfig::list_from_json_str(
            r#"[{"algorithm": "RandomSubsets"}, {"algorithm": "ExhaustiveDivideConquer", "min_rows": 0}]"#,
        )
        .unwrap();
        assert!(run_configs(&configs, &matrix()).is_err());
    }
}
