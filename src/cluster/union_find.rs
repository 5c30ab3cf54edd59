//! Lock-free union-find over vertex ids

use std::sync::atomic::{AtomicU32, Ordering};

/// Concurrent disjoint-set forest. `find` applies path halving with relaxed
/// compare-and-swap (a lost race just leaves one extra hop); `union` links
/// roots by rank and publishes the parent write with release ordering so
/// other threads observe a fully linked tree.
pub struct ConcurrentUnionFind {
    parent: Vec<AtomicU32>,
    rank: Vec<AtomicU32>,
}

impl ConcurrentUnionFind {
    /// Create a forest of `size` singleton sets
    pub fn new(size: usize) -> Self {
        Self {
            parent: (0..size).map(|i| AtomicU32::new(i as u32)).collect(),
            rank: (0..size).map(|_| AtomicU32::new(0)).collect(),
        }
    }

    /// Root of the set containing `x`
    pub fn find(&self, mut x: u32) -> u32 {
        loop {
            let parent = self.parent[x as usize].load(Ordering::Acquire);
            if parent == x {
                return x;
            }
            let grandparent = self.parent[parent as usize].load(Ordering::Acquire);
            if grandparent == parent {
                return parent;
            }
            // Path halving: point x at its grandparent.
            let _ = self.parent[x as usize].compare_exchange_weak(
                parent,
                grandparent,
                Ordering::Relaxed,
                Ordering::Relaxed,
            );
            x = grandparent;
        }
    }

    /// Merge the sets containing `a` and `b`
    pub fn union(&self, a: u32, b: u32) {
        loop {
            let root_a = self.find(a);
            let root_b = self.find(b);
            if root_a == root_b {
                return;
            }

            let rank_a = self.rank[root_a as usize].load(Ordering::Relaxed);
            let rank_b = self.rank[root_b as usize].load(Ordering::Relaxed);
            let ranks_tied = rank_a == rank_b;
            // The root with the smaller (rank, id) pair becomes the child.
            let (child, winner) = if (rank_a, root_a) < (rank_b, root_b) {
                (root_a, root_b)
            } else {
                (root_b, root_a)
            };

            if self.parent[child as usize]
                .compare_exchange(child, winner, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                if ranks_tied {
                    self.rank[winner as usize].fetch_add(1, Ordering::Relaxed);
                }
                return;
            }
            // The child stopped being a root under us; retry with fresh roots.
        }
    }

    /// Whether `a` and `b` are currently in the same set
    pub fn same_set(&self, a: u32, b: u32) -> bool {
        // Roots can move while we look; re-check until a stable answer.
        loop {
            let root_a = self.find(a);
            let root_b = self.find(b);
            if root_a == root_b {
                return true;
            }
            if self.parent[root_a as usize].load(Ordering::Acquire) == root_a {
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn singletons_are_their_own_roots() {
        let sets = ConcurrentUnionFind::new(4);
        for v in 0..4 {
            assert_eq!(sets.find(v), v);
        }
        assert!(!sets.same_set(0, 1));
    }

    #[test]
    fn union_merges_and_find_agrees() {
        let sets = ConcurrentUnionFind::new(6);
        sets.union(0, 1);
        sets.union(2, 3);
        assert!(sets.same_set(0, 1));
        assert!(sets.same_set(2, 3));
        assert!(!sets.same_set(1, 2));

        sets.union(1, 2);
        assert!(sets.same_set(0, 3));
        assert!(!sets.same_set(0, 4));
    }

    #[test]
    fn concurrent_chain_unions_converge() {
        let n = 10_000u32;
        let sets = ConcurrentUnionFind::new(n as usize);
        (0..n - 1).into_par_iter().for_each(|v| {
            sets.union(v, v + 1);
        });

        let root = sets.find(0);
        for v in 0..n {
            assert_eq!(sets.find(v), root);
        }
    }

    #[test]
    fn concurrent_disjoint_pairs_stay_disjoint() {
        let n = 1_000u32;
        let sets = ConcurrentUnionFind::new(2 * n as usize);
        (0..n).into_par_iter().for_each(|v| {
            sets.union(2 * v, 2 * v + 1);
        });

        for v in 0..n {
            assert!(sets.same_set(2 * v, 2 * v + 1));
            if v > 0 {
                assert!(!sets.same_set(2 * v, 2 * v - 1));
            }
        }
    }
}
