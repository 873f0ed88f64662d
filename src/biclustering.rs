/*
 * File: /src/biclustering.rs
 * Created Date: Monday, March 2nd 2026
 * Author: Zihan
 * -----
 * Last Modified: Thursday, 5th March 2026
 * Modified By: Zihan Wu <wzh4464@gmail.com>
 * -----
 * HISTORY:
 * Date      		By   	Comments
 * ----------		------	---------------------------------------------------------
 * 2026-03-02		Zihan	Result collections of the search algorithms
 * 2026-03-05		Zihan	Capacity-bounded variant on a BinaryHeap
 */

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;

use crate::bicluster::Bicluster;

/// Unordered collection of biclusters produced by one search run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Biclustering {
    biclusters: Vec<Bicluster>,
}

impl Biclustering {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, bicluster: Bicluster) {
        self.biclusters.push(bicluster);
    }

    /// Remove the first bicluster equal to `bicluster`; `false` if none was found.
    pub fn remove(&mut self, bicluster: &Bicluster) -> bool {
        match self.biclusters.iter().position(|b| b == bicluster) {
            Some(idx) => {
                self.biclusters.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.biclusters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.biclusters.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bicluster> {
        self.biclusters.iter()
    }

    pub fn as_slice(&self) -> &[Bicluster] {
        &self.biclusters
    }
}

impl From<Vec<Bicluster>> for Biclustering {
    fn from(biclusters: Vec<Bicluster>) -> Self {
        Self { biclusters }
    }
}

impl FromIterator<Bicluster> for Biclustering {
    fn from_iter<I: IntoIterator<Item = Bicluster>>(iter: I) -> Self {
        Self {
            biclusters: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Biclustering {
    type Item = Bicluster;
    type IntoIter = std::vec::IntoIter<Bicluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.biclusters.into_iter()
    }
}

impl<'a> IntoIterator for &'a Biclustering {
    type Item = &'a Bicluster;
    type IntoIter = std::slice::Iter<'a, Bicluster>;

    fn into_iter(self) -> Self::IntoIter {
        self.biclusters.iter()
    }
}

impl fmt::Display for Biclustering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, b) in self.biclusters.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", b)?;
        }
        write!(f, "]")
    }
}

/// Heap entry. "Greater" means "worse", so the heap top is the next eviction.
#[derive(Debug, Clone)]
struct Ranked {
    rank: f64,
    seq: u64,
    bicluster: Bicluster,
}

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}
impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        // lower rank is worse; among equal ranks the newest is worse
        other
            .rank
            .total_cmp(&self.rank)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// 有界结果集：超出容量时淘汰排名最差的双聚类
///
/// Keeps at most `capacity` biclusters: after every [`add`](Self::add) the
/// retained ones are the best-ranked seen so far. Rank is a caller-supplied
/// key, higher is better; on equal rank the most recently added loses.
pub struct BoundedBiclustering {
    capacity: usize,
    rank: Box<dyn Fn(&Bicluster) -> f64 + Send + Sync>,
    heap: BinaryHeap<Ranked>,
    next_seq: u64,
}

impl BoundedBiclustering {
    pub fn new(capacity: usize, rank: impl Fn(&Bicluster) -> f64 + Send + Sync + 'static) -> Self {
        Self {
            capacity,
            rank: Box::new(rank),
            heap: BinaryHeap::with_capacity(capacity + 1),
            next_seq: 0,
        }
    }

    /// Ranked by `min(|rows|, |cols|)`
    pub fn by_size(capacity: usize) -> Self {
        Self::new(capacity, |b| b.size_key() as f64)
    }

    /// Insert `bicluster`, then evict the worst element if over capacity.
    /// Returns the evicted bicluster, which may be `bicluster` itself.
    pub fn add(&mut self, bicluster: Bicluster) -> Option<Bicluster> {
        let rank = (self.rank)(&bicluster);
        self.heap.push(Ranked {
            rank,
            seq: self.next_seq,
            bicluster,
        });
        self.next_seq += 1;
        if self.heap.len() > self.capacity {
            self.heap.pop().map(|entry| entry.bicluster)
        } else {
            None
        }
    }

    /// Remove the first stored bicluster equal to `bicluster`.
    pub fn remove(&mut self, bicluster: &Bicluster) -> bool {
        let mut entries = std::mem::take(&mut self.heap).into_vec();
        let found = entries.iter().position(|e| &e.bicluster == bicluster);
        if let Some(idx) = found {
            entries.swap_remove(idx);
        }
        self.heap = BinaryHeap::from(entries);
        found.is_some()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.capacity
    }

    /// Stored biclusters in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &Bicluster> + '_ {
        self.heap.iter().map(|entry| &entry.bicluster)
    }

    /// Best-ranked first, insertion order among equal ranks
    pub fn into_sorted_vec(self) -> Vec<Bicluster> {
        // ascending by "worseness"
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|entry| entry.bicluster)
            .collect()
    }

    pub fn into_biclustering(self) -> Biclustering {
        Biclustering::from(self.into_sorted_vec())
    }
}

impl fmt::Debug for BoundedBiclustering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedBiclustering")
            .field("capacity", &self.capacity)
            .field("len", &self.heap.len())
            .finish()
    }
}

impl From<BoundedBiclustering> for Biclustering {
    fn from(bounded: BoundedBiclustering) -> Self {
        bounded.into_biclustering()
    }
}
