/*
 * File: /src/config.rs
 * Created Date: Friday, January 26th 2024
 * Author: Zihan
 * -----
 * Last Modified: Wednesday, 11th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-11		Zihan	Declarative algorithm parameters loaded with serde
 */

use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::algorithm::SearchAlgorithm;
use crate::baseline::{Interval, IntervalMotif, RandomSubsets};
use crate::error::Result;
use crate::evolutionary::{EvolutionarySearch, DEFAULT_SUPPRESSION_THRESHOLD};
use crate::exhaustive::{ExhaustiveDivideConquer, DEFAULT_THRESHOLD};
use crate::grid::GridCoClustering;
use crate::seed_expansion::SeedExpansion;

/// Bimax 参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExhaustiveParams {
    /// 最小行数
    pub min_rows: usize,
    /// 最小列数
    pub min_cols: usize,
    /// Ratings strictly above this are "true" cells
    pub threshold: f32,
}

impl Default for ExhaustiveParams {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_cols: 2,
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

/// QUBIC 参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedExpansionParams {
    /// Share of consistent cells required when relaxing, in (0, 1]
    pub consistency: f64,
    /// Number of biclusters to accept before stopping
    pub max_results: usize,
    /// Largest overlap allowed with an accepted bicluster, in [0, 1]
    pub overlap: f64,
    /// Compare binarized ratings (`>= threshold` becomes 1)
    pub binarize_threshold: Option<f32>,
}

impl Default for SeedExpansionParams {
    fn default() -> Self {
        Self {
            consistency: 0.95,
            max_results: 20,
            overlap: 0.5,
            binarize_threshold: None,
        }
    }
}

/// BicaiNet 参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionaryParams {
    pub row_weight: f64,
    pub col_weight: f64,
    pub lambda: f64,
    pub max_iterations: usize,
    /// Suppression runs every `suppression_period` iterations
    pub suppression_period: usize,
    /// Expected size of the initial population
    pub initial_seed_count: usize,
    /// Common cells above which two individuals compete
    pub suppression_threshold: usize,
    pub seed: Option<u64>,
}

impl Default for EvolutionaryParams {
    fn default() -> Self {
        Self {
            row_weight: 1.0,
            col_weight: 1.0,
            lambda: 1.0,
            max_iterations: 100,
            suppression_period: 10,
            initial_seed_count: 100,
            suppression_threshold: DEFAULT_SUPPRESSION_THRESHOLD,
            seed: None,
        }
    }
}

/// COCLUST 参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridParams {
    /// 行簇数量
    pub row_groups: usize,
    /// 列簇数量
    pub col_groups: usize,
    pub max_iterations: usize,
    pub seed: Option<u64>,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            row_groups: 3,
            col_groups: 3,
            max_iterations: 50,
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomSubsetsParams {
    pub count: usize,
    pub seed: Option<u64>,
}

impl Default for RandomSubsetsParams {
    fn default() -> Self {
        Self { count: 10, seed: None }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntervalMotifParams {
    pub seeds: usize,
    pub draws_per_seed: usize,
    /// Users that must agree with the anchor for an item to be kept
    pub sample_size: usize,
    pub intervals: Vec<Interval>,
    pub seed: Option<u64>,
}

impl Default for IntervalMotifParams {
    fn default() -> Self {
        Self {
            seeds: 10,
            draws_per_seed: 5,
            sample_size: 3,
            intervals: vec![
                Interval::new(0.0, true, 2.5, false),
                Interval::closed(2.5, 5.0),
            ],
            seed: None,
        }
    }
}

/// One search algorithm and its parameters.
///
/// # Example
/// ```
/// use fast_bicluster::config::AlgorithmConfig;
/// let config = AlgorithmConfig::from_json_str(
///     r#"{ "algorithm": "GridCoClustering", "row_groups": 4, "seed": 7 }"#,
/// ).unwrap();
/// let algorithm = config.build().unwrap();
/// assert_eq!(algorithm.name(), "GridCoClustering");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm")]
pub enum AlgorithmConfig {
    ExhaustiveDivideConquer(ExhaustiveParams),
    SeedExpansion(SeedExpansionParams),
    EvolutionarySearch(EvolutionaryParams),
    GridCoClustering(GridParams),
    RandomSubsets(RandomSubsetsParams),
    IntervalMotif(IntervalMotifParams),
}

impl AlgorithmConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Parse a JSON array of configurations.
    pub fn list_from_json_str(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }

    /// Validate the parameters and construct the algorithm.
    pub fn build(&self) -> Result<Box<dyn SearchAlgorithm + Send>> {
        let algorithm: Box<dyn SearchAlgorithm + Send> = match self {
            AlgorithmConfig::ExhaustiveDivideConquer(p) => Box::new(
                ExhaustiveDivideConquer::new(p.min_rows, p.min_cols)?.with_threshold(p.threshold),
            ),
            AlgorithmConfig::SeedExpansion(p) => {
                let algorithm = SeedExpansion::new(p.consistency, p.max_results, p.overlap)?;
                match p.binarize_threshold {
                    Some(t) => Box::new(algorithm.with_binarize_threshold(t)),
                    None => Box::new(algorithm),
                }
            }
            AlgorithmConfig::EvolutionarySearch(p) => {
                let algorithm = EvolutionarySearch::new(
                    p.row_weight,
                    p.col_weight,
                    p.lambda,
                    p.max_iterations,
                    p.suppression_period,
                    p.initial_seed_count,
                )?
                .with_suppression_threshold(p.suppression_threshold);
                match p.seed {
                    Some(seed) => Box::new(algorithm.with_seed(seed)),
                    None => Box::new(algorithm),
                }
            }
            AlgorithmConfig::GridCoClustering(p) => {
                let algorithm = GridCoClustering::new(p.row_groups, p.col_groups, p.max_iterations)?;
                match p.seed {
                    Some(seed) => Box::new(algorithm.with_seed(seed)),
                    None => Box::new(algorithm),
                }
            }
            AlgorithmConfig::RandomSubsets(p) => {
                let algorithm = RandomSubsets::new(p.count)?;
                match p.seed {
                    Some(seed) => Box::new(algorithm.with_seed(seed)),
                    None => Box::new(algorithm),
                }
            }
            AlgorithmConfig::IntervalMotif(p) => {
                let algorithm =
                    IntervalMotif::new(p.seeds, p.draws_per_seed, p.sample_size, p.intervals.clone())?;
                match p.seed {
                    Some(seed) => Box::new(algorithm.with_seed(seed)),
                    None => Box::new(algorithm),
                }
            }
        };
        Ok(algorithm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BiclusterError;

    #[test]
    fn test_defaults_fill_missing_fields() {
        let config = AlgorithmConfig::from_json_str(r#"{"algorithm": "SeedExpansion", "max_results": 3}"#).unwrap();
        match config {
            AlgorithmConfig::SeedExpansion(p) => {
                assert_eq!(p.max_results, 3);
                assert_eq!(p.consistency, SeedExpansionParams::default().consistency);
                assert!(p.binarize_threshold.is_none());
            }
            other => panic!("unexpected config {:?}", other),
        }
    }

    #[test]
    fn test_build_every_default() {
        let configs = vec![
            AlgorithmConfig::ExhaustiveDivideConquer(ExhaustiveParams::default()),
            AlgorithmConfig::SeedExpansion(SeedExpansionParams::default()),
            AlgorithmConfig::EvolutionarySearch(EvolutionaryParams::default()),
            AlgorithmConfig::GridCoClustering(GridParams::default()),
            AlgorithmConfig::RandomSubsets(RandomSubsetsParams::default()),
            AlgorithmConfig::IntervalMotif(IntervalMotifParams::default()),
        ];
        let names: Vec<String> = configs
            .iter()
            .map(|c| c.build().unwrap().name().to_string())
            .collect();
        assert_eq!(
            names,
            vec![
                "ExhaustiveDivideConquer",
                "SeedExpansion",
                "EvolutionarySearch",
                "GridCoClustering",
                "RandomSubsets",
                "IntervalMotif"
            ]
        );
    }

    #[test]
    fn test_invalid_parameters_fail_at_build() {
        let config = AlgorithmConfig::from_json_str(r#"{"algorithm": "GridCoClustering", "row_groups": 0}"#).unwrap();
        assert!(matches!(config.build(), Err(BiclusterError::Configuration(_))));
    }

    #[test]
    fn test_unknown_algorithm_is_parse_error() {
        let err = AlgorithmConfig::from_json_str(r#"{"algorithm": "KMeans"}"#).unwrap_err();
        assert!(matches!(err, BiclusterError::Parse(_)));
    }

    #[test]
    fn test_list_and_reader() {
        let json = r#"[
            {"algorithm": "RandomSubsets", "count": 4, "seed": 1},
            {"algorithm": "IntervalMotif", "intervals": [
                {"lower": 0.0, "include_lower": true, "upper": 5.0, "include_upper": true}
            ]}
        ]"#;
        let list = AlgorithmConfig::list_from_json_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(
            list[0],
            AlgorithmConfig::RandomSubsets(RandomSubsetsParams { count: 4, seed: Some(1) })
        );

        let single = AlgorithmConfig::from_json_reader(r#"{"algorithm": "ExhaustiveDivideConquer"}"#.as_bytes()).unwrap();
        assert_eq!(single, AlgorithmConfig::ExhaustiveDivideConquer(ExhaustiveParams::default()));
    }
}
