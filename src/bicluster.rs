/*
 * File: /src/bicluster.rs
 * Created Date: Monday, March 2nd 2026
 * Author: Zihan
 * -----
 * Last Modified: Wednesday, 4th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-02		Zihan	Row/column set pair replacing the index-vector Submatrix
 * 2026-03-04		Zihan	Bitset-backed IndexedBicluster for the exhaustive search
 */

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use fixedbitset::FixedBitSet;
use serde::{Deserialize, Serialize};

/// A (user set, item set) pair of a ratings matrix.
///
/// Sets are ordered, so iterating a bicluster is deterministic.
///
/// # Example
/// ```
/// use fast_bicluster::bicluster::Bicluster;
/// let a = Bicluster::from_ids([1, 2, 3], [10, 11]);
/// let b = Bicluster::from_ids([2, 3, 4], [11, 12]);
/// assert_eq!(a.common_cells(&b), 2);
/// assert!((a.overlap(&b) - 2.0 / 6.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bicluster {
    rows: BTreeSet<i64>,
    cols: BTreeSet<i64>,
}

impl Bicluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_ids(rows: impl IntoIterator<Item = i64>, cols: impl IntoIterator<Item = i64>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            cols: cols.into_iter().collect(),
        }
    }

    pub fn add_row(&mut self, row: i64) {
        self.rows.insert(row);
    }

    pub fn remove_row(&mut self, row: i64) {
        self.rows.remove(&row);
    }

    pub fn add_col(&mut self, col: i64) {
        self.cols.insert(col);
    }

    pub fn remove_col(&mut self, col: i64) {
        self.cols.remove(&col);
    }

    pub fn contains_row(&self, row: i64) -> bool {
        self.rows.contains(&row)
    }

    pub fn contains_col(&self, col: i64) -> bool {
        self.cols.contains(&col)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.cols.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = i64> + '_ {
        self.rows.iter().copied()
    }

    pub fn cols(&self) -> impl Iterator<Item = i64> + '_ {
        self.cols.iter().copied()
    }

    pub fn row_set(&self) -> &BTreeSet<i64> {
        &self.rows
    }

    pub fn col_set(&self) -> &BTreeSet<i64> {
        &self.cols
    }

    /// Number of cells, `|rows| * |cols|`
    pub fn cell_count(&self) -> usize {
        self.rows.len() * self.cols.len()
    }

    /// Empty on either side; never a valid search result
    pub fn is_degenerate(&self) -> bool {
        self.rows.is_empty() || self.cols.is_empty()
    }

    /// Add every row and column of `other` to `self`.
    pub fn merge(&mut self, other: Bicluster) {
        self.rows.extend(other.rows);
        self.cols.extend(other.cols);
    }

    /// `|rows ∩ rows'| * |cols ∩ cols'|`
    pub fn common_cells(&self, other: &Bicluster) -> usize {
        let common_rows = self.rows.intersection(&other.rows).count();
        if common_rows == 0 {
            return 0;
        }
        common_rows * self.cols.intersection(&other.cols).count()
    }

    /// Share of this bicluster's cells also covered by `other`.
    /// Not symmetric: the denominator is `self`'s cell count.
    pub fn overlap(&self, other: &Bicluster) -> f64 {
        self.common_cells(other) as f64 / self.cell_count() as f64
    }

    /// Rows include `other`'s rows and columns are included in `other`'s columns
    pub fn include_lower(&self, other: &Bicluster) -> bool {
        self.rows.is_superset(&other.rows) && other.cols.is_superset(&self.cols)
    }

    /// Rows are included in `other`'s rows and columns include `other`'s columns
    pub fn include_greater(&self, other: &Bicluster) -> bool {
        other.rows.is_superset(&self.rows) && self.cols.is_superset(&other.cols)
    }

    /// `min(|rows|, |cols|)`, the key of [`Bicluster::cmp_size`]
    pub fn size_key(&self) -> usize {
        self.rows.len().min(self.cols.len())
    }

    /// Order by the smaller side of the bicluster
    pub fn cmp_size(&self, other: &Bicluster) -> Ordering {
        self.size_key().cmp(&other.size_key())
    }
}

impl fmt::Display for Bicluster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}x{:?}", self.rows, self.cols)
    }
}

/// Bicluster over dense `0..n` row and `0..m` column indices.
///
/// Membership and toggling are O(1) bit operations; used by the exhaustive
/// search where the candidate sets are rebuilt at every split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedBicluster {
    rows: FixedBitSet,
    cols: FixedBitSet,
}

impl IndexedBicluster {
    /// Empty bicluster able to hold `n_rows` x `n_cols` indices
    pub fn with_capacity(n_rows: usize, n_cols: usize) -> Self {
        Self {
            rows: FixedBitSet::with_capacity(n_rows),
            cols: FixedBitSet::with_capacity(n_cols),
        }
    }

    /// Every row and every column
    pub fn full(n_rows: usize, n_cols: usize) -> Self {
        let mut b = Self::with_capacity(n_rows, n_cols);
        b.rows.insert_range(..);
        b.cols.insert_range(..);
        b
    }

    pub fn add_row(&mut self, row: usize) {
        self.rows.insert(row);
    }

    pub fn remove_row(&mut self, row: usize) {
        self.rows.set(row, false);
    }

    pub fn add_col(&mut self, col: usize) {
        self.cols.insert(col);
    }

    pub fn remove_col(&mut self, col: usize) {
        self.cols.set(col, false);
    }

    pub fn contains_row(&self, row: usize) -> bool {
        self.rows.contains(row)
    }

    pub fn contains_col(&self, col: usize) -> bool {
        self.cols.contains(col)
    }

    pub fn row_count(&self) -> usize {
        self.rows.count_ones(..)
    }

    pub fn col_count(&self) -> usize {
        self.cols.count_ones(..)
    }

    pub fn rows(&self) -> impl Iterator<Item = usize> + '_ {
        self.rows.ones()
    }

    pub fn cols(&self) -> impl Iterator<Item = usize> + '_ {
        self.cols.ones()
    }

    pub fn col_bits(&self) -> &FixedBitSet {
        &self.cols
    }

    pub fn is_degenerate(&self) -> bool {
        self.rows.ones().next().is_none() || self.cols.ones().next().is_none()
    }

    /// Replace the column set
    pub fn set_cols(&mut self, cols: FixedBitSet) {
        self.cols = cols;
    }

    pub fn merge(&mut self, other: &IndexedBicluster) {
        self.rows.union_with(&other.rows);
        self.cols.union_with(&other.cols);
    }

    pub fn common_cells(&self, other: &IndexedBicluster) -> usize {
        self.rows.intersection(&other.rows).count() * self.cols.intersection(&other.cols).count()
    }

    pub fn overlap(&self, other: &IndexedBicluster) -> f64 {
        self.common_cells(other) as f64 / (self.row_count() * self.col_count()) as f64
    }

    /// Translate indices back to ids through the index -> id tables.
    pub fn to_bicluster(&self, row_ids: &[i64], col_ids: &[i64]) -> Bicluster {
        Bicluster::from_ids(
            self.rows.ones().map(|i| row_ids[i]),
            self.cols.ones().map(|j| col_ids[j]),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_membership_and_counts() {
        let mut b = Bicluster::new();
        assert!(b.is_degenerate());
        b.add_row(3);
        b.add_row(1);
        b.add_row(3);
        b.add_col(7);
        assert!(!b.is_degenerate());
        assert_eq!(b.row_count(), 2);
        assert_eq!(b.col_count(), 1);
        assert!(b.contains_row(1));
        assert!(!b.contains_col(1));
        assert_eq!(b.rows().collect::<Vec<_>>(), vec![1, 3]);

        b.remove_row(1);
        b.remove_col(7);
        assert_eq!(b.row_count(), 1);
        assert!(b.is_degenerate());
    }

    #[test]
    fn test_self_overlap_is_one() {
        let b = Bicluster::from_ids([1, 2, 5], [4, 9]);
        assert_eq!(b.overlap(&b), 1.0);
        assert_eq!(b.common_cells(&b), b.cell_count());
    }

    #[test]
    fn test_common_cells_symmetric_overlap_not() {
        let a = Bicluster::from_ids([1, 2, 3, 4], [1, 2]);
        let b = Bicluster::from_ids([3, 4], [2, 3, 4]);
        assert_eq!(a.common_cells(&b), 2);
        assert_eq!(b.common_cells(&a), 2);
        assert!((a.overlap(&b) - 0.25).abs() < 1e-12);
        assert!((b.overlap(&a) - 2.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_rows_have_no_common_cells() {
        let a = Bicluster::from_ids([1], [1, 2]);
        let b = Bicluster::from_ids([2], [1, 2]);
        assert_eq!(a.common_cells(&b), 0);
        assert_eq!(a.overlap(&b), 0.0);
    }

    #[test]
    fn test_merge_is_union() {
        let mut a = Bicluster::from_ids([1, 2], [5]);
        let b = Bicluster::from_ids([2, 3], [6, 7]);
        a.merge(b);
        assert_eq!(a, Bicluster::from_ids([1, 2, 3], [5, 6, 7]));
    }

    #[test]
    fn test_copy_is_independent() {
        let a = Bicluster::from_ids([1], [1]);
        let mut b = a.clone();
        b.add_row(2);
        assert_eq!(a.row_count(), 1);
        assert_eq!(b.row_count(), 2);
    }

    #[test]
    fn test_inclusion() {
        let wide = Bicluster::from_ids([1], [1, 2, 3]);
        let tall = Bicluster::from_ids([1, 2], [1, 2]);
        assert!(tall.include_lower(&wide));
        assert!(!wide.include_lower(&tall));
        assert!(wide.include_greater(&tall));
        assert!(!tall.include_greater(&wide));
        assert!(tall.include_lower(&tall) && tall.include_greater(&tall));
    }

    #[test]
    fn test_size_ordering() {
        let small = Bicluster::from_ids([1], [1, 2, 3, 4]);
        let big = Bicluster::from_ids([1, 2], [1, 2]);
        assert_eq!(small.cmp_size(&big), Ordering::Less);
        assert_eq!(big.cmp_size(&small), Ordering::Greater);
        assert_eq!(big.cmp_size(&big.clone()), Ordering::Equal);
    }

    #[test]
    fn test_display() {
        let b = Bicluster::from_ids([2, 1], [3]);
        assert_eq!(format!("{}", b), "{1, 2}x{3}");
    }

    #[test]
    fn test_indexed_bicluster() {
        let mut b = IndexedBicluster::with_capacity(4, 5);
        assert!(b.is_degenerate());
        b.add_row(0);
        b.add_row(3);
        b.add_col(4);
        b.add_col(1);
        assert_eq!(b.row_count(), 2);
        assert_eq!(b.col_count(), 2);
        assert!(b.contains_col(4));
        b.remove_col(4);
        assert!(!b.contains_col(4));
        assert_eq!(b.cols().collect::<Vec<_>>(), vec![1]);

        let full = IndexedBicluster::full(4, 5);
        assert_eq!(full.row_count(), 4);
        assert_eq!(full.col_count(), 5);
        assert_eq!(b.common_cells(&full), 2);
        assert_eq!(b.overlap(&full), 1.0);
    }

    #[test]
    fn test_indexed_to_bicluster() {
        let mut b = IndexedBicluster::with_capacity(3, 3);
        b.add_row(1);
        b.add_row(2);
        b.add_col(0);
        let ids = b.to_bicluster(&[10, 20, 30], &[100, 200, 300]);
        assert_eq!(ids, Bicluster::from_ids([20, 30], [100]));
    }
}
