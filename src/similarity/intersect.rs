//! Sorted-list intersection with positional output

use std::cmp::Ordering;

/// Merge-style intersection of two ascending slices. Invokes `f(common, i, j)`
/// for every shared element, where `i` and `j` are the positions of the match
/// within `a` and `b`. Returns the number of matches.
///
/// The triangle kernel uses the positions to address per-edge counters
/// directly instead of re-searching the adjacency lists.
pub fn intersect_with_index<F>(a: &[u32], b: &[u32], mut f: F) -> u32
where
    F: FnMut(u32, usize, usize),
{
    let mut i = 0;
    let mut j = 0;
    let mut matches = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                f(a[i], i, j);
                matches += 1;
                i += 1;
                j += 1;
            }
        }
    }
    matches
}
