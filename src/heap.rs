//! A d-ary min-heap.
//!
//! A heap is a tree-like structure where every subtree's root has a better score
//! than all the other nodes in the subtree.
//!
//! This is implemented with an array that's traversed in a non-linear way.
//! These are the indices we assign to each node on a binary heap.
//!
//! ```text
//!                           0
//!              1                         2
//!       3            4            5             6
//!   7      8      9     10    11     12     13     14
//! 15 16  17 18  19 20  21 22 23 24  25
//! ```
//!
//! The last level will often be incomplete.
//!
//! With `A` children per node you can go up and down from any index with,
//!   - Up:         `(i-1)//A`
//!   - Down-left:  `(A*i) + 1`
//!   - Down-right: `A(i+1)`
//!
//! Wider heaps are shallower, so pushes are cheaper, and the children of a node
//! share cache-lines, which keeps pops from getting much more expensive.

use std::cmp::min;
use std::fmt::Debug;

/// The default arity for search frontiers.
pub const DEFAULT_ARITY: usize = 4usize;

#[inline(always)]
#[must_use]
fn up<const A: usize>(i: usize) -> usize {
    debug_assert!(i != 0, "The root has no parent");
    (i - 1) / A
}
#[inline(always)]
#[must_use]
fn down_left<const A: usize>(i: usize) -> usize {
    (A * i) + 1
}
#[inline(always)]
#[must_use]
fn down_right<const A: usize>(i: usize) -> usize {
    A * (i + 1)
}

/// Finds the best element, preferring the leftmost one on ties.
#[inline(always)]
#[must_use]
fn arg_min<T: Ord>(a: &[T]) -> usize {
    debug_assert!(!a.is_empty());
    let mut best = 0usize;
    for (i, e) in a.iter().enumerate().skip(1) {
        if *e < a[best] {
            best = i;
        }
    }
    best
}

#[derive(Clone)]
pub struct DaryHeap<T, const A: usize = DEFAULT_ARITY>
where
    T: Ord + Debug,
{
    heap: Vec<T>,
}

impl<T, const A: usize> DaryHeap<T, A>
where
    T: Ord + Debug,
{
    #[must_use]
    pub fn new() -> Self {
        debug_assert!(A >= 2, "Heaps need at least 2 children per node");
        Self { heap: vec![] }
    }
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        debug_assert!(A >= 2, "Heaps need at least 2 children per node");
        Self {
            heap: Vec::with_capacity(capacity),
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.heap.len()
    }
    #[inline(always)]
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn push(&mut self, t: T) {
        self.heap.push(t);
        self.sift_up(self.heap.len() - 1);
        self.verify_heap();
    }

    #[must_use]
    pub fn pop(&mut self) -> Option<T> {
        match self.heap.len() {
            0 | 1 => self.heap.pop(),
            _ => {
                // The last element takes the place of the root and sinks.
                let top = self.heap.swap_remove(0);
                self.sift_down(0);
                self.verify_heap();
                Some(top)
            }
        }
    }

    /// Raises a node.
    /// Returns its new index.
    fn sift_up(&mut self, index: usize) -> usize {
        debug_assert!(index < self.heap.len());

        let mut pos = index;
        while pos != 0 {
            let parent = up::<A>(pos);
            if self.heap[parent] <= self.heap[pos] {
                break;
            }
            self.heap.swap(parent, pos);
            pos = parent;
        }
        pos
    }

    /// Lowers a node.
    /// Returns its new index.
    fn sift_down(&mut self, mut index: usize) -> usize {
        let len = self.heap.len();
        debug_assert!(index < len);

        loop {
            let first = down_left::<A>(index);
            if first >= len {
                break;
            }
            debug_assert_eq!(first + A, down_right::<A>(index) + 1);
            let child = first + arg_min(&self.heap[first..min(first + A, len)]);

            if self.heap[index] <= self.heap[child] {
                break;
            }
            self.heap.swap(index, child);
            index = child;
        }
        index
    }

    #[inline(always)]
    #[cfg(not(feature = "verify"))]
    pub(crate) fn verify_heap(&self) {
        // All good... (hopefully)
    }
    #[inline(always)]
    #[cfg(feature = "verify")]
    pub(crate) fn verify_heap(&self) {
        // Every node goes after its parent node, if any.
        for i in 1..self.heap.len() {
            let p = up::<A>(i);
            assert!(
                self.heap[p] <= self.heap[i],
                "Node[{p}]={:?} !<= child [{i}]={:?}. Out of heap of len={}",
                self.heap[p],
                self.heap[i],
                self.heap.len(),
            );
        }
    }
}

impl<T, const A: usize> Default for DaryHeap<T, A>
where
    T: Ord + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const A: usize> Debug for DaryHeap<T, A>
where
    T: Ord + Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "DaryHeap<{A}>{{({} nodes)}}", self.len())
    }
}
