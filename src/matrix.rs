/*
 * File: /matrix.rs
 * Created Date: Thursday November 23rd 2023
 * Author: Zihan
 * -----
 * Last Modified: Monday, 2nd March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-02		Zihan	Sparse user x item rating matrix behind a read-only trait
 */

use std::collections::{BTreeMap, BTreeSet};

use log::debug;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{BiclusterError, Result};

/// One observed rating of a user, keyed by item id
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    pub item: i64,
    pub value: f32,
}

impl Preference {
    pub fn new(item: i64, value: f32) -> Self {
        Self { item, value }
    }
}

/// Read-only view of a sparse ratings matrix.
///
/// Id sequences are ascending and can be requested again at any time. The
/// search algorithms never write through this trait, so one matrix can be
/// shared by several algorithm instances at once.
pub trait RatingMatrix {
    fn user_ids(&self) -> Box<dyn Iterator<Item = i64> + '_>;

    fn item_ids(&self) -> Box<dyn Iterator<Item = i64> + '_>;

    /// Ratings of `user` ordered by item id
    fn ratings_of(&self, user: i64) -> Result<&[Preference]>;

    /// Rating of `user` for `item`, `None` when unobserved
    fn rating(&self, user: i64, item: i64) -> Result<Option<f32>>;

    fn user_count(&self) -> usize;

    fn item_count(&self) -> usize;

    /// Total number of observed cells
    fn rating_count(&self) -> Result<usize> {
        let mut total = 0;
        for user in self.user_ids() {
            total += self.ratings_of(user)?.len();
        }
        Ok(total)
    }
}

/// In-memory [`RatingMatrix`]: per-user rating lists sorted by item id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SparseRatingMatrix {
    users: BTreeMap<i64, Vec<Preference>>,
    items: Vec<i64>,
}

impl SparseRatingMatrix {
    /// Build from `(user, item, rating)` triples. A repeated cell keeps its last value.
    ///
    /// # Example
    /// ```
    /// use fast_bicluster::matrix::{RatingMatrix, SparseRatingMatrix};
    /// let m = SparseRatingMatrix::from_triples(vec![(1, 10, 4.0), (2, 10, 3.0), (1, 11, 5.0)]);
    /// assert_eq!(m.user_count(), 2);
    /// assert_eq!(m.item_count(), 2);
    /// assert_eq!(m.rating(1, 11).unwrap(), Some(5.0));
    /// assert_eq!(m.rating(2, 11).unwrap(), None);
    /// ```
    pub fn from_triples(triples: impl IntoIterator<Item = (i64, i64, f32)>) -> Self {
        let mut cells: BTreeMap<i64, BTreeMap<i64, f32>> = BTreeMap::new();
        for (user, item, value) in triples {
            cells.entry(user).or_default().insert(item, value);
        }
        let users = cells
            .into_iter()
            .map(|(user, row)| {
                let prefs = row
                    .into_iter()
                    .map(|(item, value)| Preference::new(item, value))
                    .collect();
                (user, prefs)
            })
            .collect();
        Self::from_user_map(users, BTreeSet::new())
    }

    /// Build from a dense array, row `i` becoming user `i` and column `j` item `j`.
    /// NaN cells are unobserved. Every row and column is part of the id universe,
    /// even when it holds no rating.
    pub fn from_dense(data: &Array2<f32>) -> Self {
        let mut users = BTreeMap::new();
        for (i, row) in data.outer_iter().enumerate() {
            let prefs: Vec<Preference> = row
                .iter()
                .enumerate()
                .filter(|(_, value)| !value.is_nan())
                .map(|(j, &value)| Preference::new(j as i64, value))
                .collect();
            users.insert(i as i64, prefs);
        }
        let items = (0..data.ncols() as i64).collect();
        Self::from_user_map(users, items)
    }

    /// Build from complete per-user lists. `extra_items` adds item ids that nobody rated.
    pub fn from_user_map(
        mut users: BTreeMap<i64, Vec<Preference>>,
        extra_items: BTreeSet<i64>,
    ) -> Self {
        let mut items = extra_items;
        for prefs in users.values_mut() {
            prefs.sort_by_key(|p| p.item);
            prefs.dedup_by_key(|p| p.item);
            items.extend(prefs.iter().map(|p| p.item));
        }
        let matrix = Self {
            users,
            items: items.into_iter().collect(),
        };
        debug!(
            "Built rating matrix with {} users, {} items",
            matrix.users.len(),
            matrix.items.len()
        );
        matrix
    }
}

impl RatingMatrix for SparseRatingMatrix {
    fn user_ids(&self) -> Box<dyn Iterator<Item = i64> + '_> {
        Box::new(self.users.keys().copied())
    }

    fn item_ids(&self) -> Box<dyn Iterator<Item = i64> + '_> {
        Box::new(self.items.iter().copied())
    }

    fn ratings_of(&self, user: i64) -> Result<&[Preference]> {
        self.users
            .get(&user)
            .map(|prefs| prefs.as_slice())
            .ok_or_else(|| BiclusterError::DataAccess(format!("no such user: {}", user)))
    }

    fn rating(&self, user: i64, item: i64) -> Result<Option<f32>> {
        let prefs = self.ratings_of(user)?;
        Ok(prefs
            .binary_search_by_key(&item, |p| p.item)
            .ok()
            .map(|idx| prefs[idx].value))
    }

    fn user_count(&self) -> usize {
        self.users.len()
    }

    fn item_count(&self) -> usize {
        self.items.len()
    }

    fn rating_count(&self) -> Result<usize> {
        Ok(self.users.values().map(Vec::len).sum())
    }
}
