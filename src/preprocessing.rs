/*
 * File: /src/preprocessing.rs
 * Created Date: Tuesday, March 3rd 2026
 * Author: Zihan
 * -----
 * Last Modified: Tuesday, 3rd March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-03		Zihan	Rating transforms applied before biclustering
 */

//! Rating transforms that produce a fresh [`SparseRatingMatrix`].
//!
//! Binary search strategies (Bimax) expect 0/1 cells and the value-matching
//! ones (QUBIC) work best on a few discrete levels, so callers usually run one
//! of these first.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::matrix::{Preference, RatingMatrix, SparseRatingMatrix};

fn map_ratings(
    matrix: &dyn RatingMatrix,
    mut f: impl FnMut(&[Preference]) -> Vec<Preference>,
) -> Result<SparseRatingMatrix> {
    let mut users = BTreeMap::new();
    for user in matrix.user_ids() {
        let prefs = matrix.ratings_of(user)?;
        users.insert(user, f(prefs));
    }
    let items: BTreeSet<i64> = matrix.item_ids().collect();
    Ok(SparseRatingMatrix::from_user_map(users, items))
}

/// Subtract each user's mean rating from all of that user's ratings.
pub fn normalize(matrix: &dyn RatingMatrix) -> Result<SparseRatingMatrix> {
    map_ratings(matrix, |prefs| {
        if prefs.is_empty() {
            return Vec::new();
        }
        let mean = prefs.iter().map(|p| p.value).sum::<f32>() / prefs.len() as f32;
        prefs
            .iter()
            .map(|p| Preference::new(p.item, p.value - mean))
            .collect()
    })
}

/// 1.0 for ratings strictly above `threshold`, 0.0 otherwise
pub fn binarize(matrix: &dyn RatingMatrix, threshold: f32) -> Result<SparseRatingMatrix> {
    map_ratings(matrix, |prefs| {
        prefs
            .iter()
            .map(|p| Preference::new(p.item, if p.value > threshold { 1.0 } else { 0.0 }))
            .collect()
    })
}

/// Round every rating to the nearest integer and add `shift`.
pub fn discretize(matrix: &dyn RatingMatrix, shift: i32) -> Result<SparseRatingMatrix> {
    map_ratings(matrix, |prefs| {
        prefs
            .iter()
            .map(|p| Preference::new(p.item, p.value.round() + shift as f32))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SparseRatingMatrix {
        SparseRatingMatrix::from_triples(vec![
            (1, 1, 4.0),
            (1, 2, 2.0),
            (2, 1, 3.4),
            (2, 3, 1.6),
        ])
    }

    #[test]
    fn test_normalize_centers_each_user() {
        let m = normalize(&sample()).unwrap();
        assert_eq!(m.rating(1, 1).unwrap(), Some(1.0));
        assert_eq!(m.rating(1, 2).unwrap(), Some(-1.0));
        let sum: f32 = m.ratings_of(2).unwrap().iter().map(|p| p.value).sum();
        assert!(sum.abs() < 1e-5);
    }

    #[test]
    fn test_binarize() {
        let m = binarize(&sample(), 3.0).unwrap();
        assert_eq!(m.rating(1, 1).unwrap(), Some(1.0));
        assert_eq!(m.rating(1, 2).unwrap(), Some(0.0));
        assert_eq!(m.rating(2, 1).unwrap(), Some(1.0));
        assert_eq!(m.rating(2, 3).unwrap(), Some(0.0));
        assert_eq!(m.item_count(), 3);
    }

    #[test]
    fn test_discretize_with_shift() {
        let m = discretize(&sample(), -1).unwrap();
        assert_eq!(m.rating(2, 1).unwrap(), Some(2.0));
        assert_eq!(m.rating(2, 3).unwrap(), Some(1.0));
    }
}
