//! Open lists.
//!
//! Frontiers order pending states by a strategy-specific key. Keys always end
//! with an insertion counter so that equal-priority entries are popped in a
//! declared, reproducible order.
//!
//! Frontiers never remove or re-rank entries. Pushing a state again leaves the
//! old entry behind, and it's up to the search to discard it when popped.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::marker::PhantomData;

use crate::cost::Cost;
use crate::heap::DaryHeap;
use crate::space::State;

/// Insertion order. Counts pushes on a single Frontier.
pub type Insertion = u64;

pub trait Frontier<St, C>: Debug
where
    St: State,
    C: Cost,
{
    /// The priority key. Lower keys are popped first, except on LIFO stacks.
    type Key: Copy + Debug + Ord;

    fn new() -> Self;

    /// Adds a state reached with cost `g` and estimated to be `h` away from a
    /// goal.
    fn push(&mut self, s: St, g: C, h: C);
    #[must_use]
    fn pop_min(&mut self) -> Option<(Self::Key, St)>;
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bytes taken by each entry.
    fn entry_size() -> usize {
        std::mem::size_of::<(Self::Key, St)>()
    }
}

/// First-In-First-Out queue for Breadth-First Search.
#[derive(Debug)]
pub struct FifoFrontier<St, C>
where
    St: State,
    C: Cost,
{
    queue: VecDeque<(Insertion, St)>,
    pushes: Insertion,
    _phantom_cost: PhantomData<C>,
}

impl<St, C> Frontier<St, C> for FifoFrontier<St, C>
where
    St: State,
    C: Cost,
{
    type Key = Insertion;

    fn new() -> Self {
        Self {
            queue: VecDeque::new(),
            pushes: 0,
            _phantom_cost: PhantomData,
        }
    }

    #[inline(always)]
    fn push(&mut self, s: St, _g: C, _h: C) {
        self.queue.push_back((self.pushes, s));
        self.pushes += 1;
    }
    #[inline(always)]
    fn pop_min(&mut self) -> Option<(Insertion, St)> {
        self.queue.pop_front()
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Last-In-First-Out stack for Depth-First Search.
///
/// Pops the latest insertion, so the key it returns is the maximum one.
#[derive(Debug)]
pub struct LifoFrontier<St, C>
where
    St: State,
    C: Cost,
{
    stack: Vec<(Insertion, St)>,
    pushes: Insertion,
    _phantom_cost: PhantomData<C>,
}

impl<St, C> Frontier<St, C> for LifoFrontier<St, C>
where
    St: State,
    C: Cost,
{
    type Key = Insertion;

    fn new() -> Self {
        Self {
            stack: Vec::new(),
            pushes: 0,
            _phantom_cost: PhantomData,
        }
    }

    #[inline(always)]
    fn push(&mut self, s: St, _g: C, _h: C) {
        self.stack.push((self.pushes, s));
        self.pushes += 1;
    }
    #[inline(always)]
    fn pop_min(&mut self) -> Option<(Insertion, St)> {
        self.stack.pop()
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.stack.len()
    }
}

/// Ranks for heap-based frontiers.
pub trait Rank<C>: Copy + Debug + Ord
where
    C: Cost,
{
    fn new(g: C, h: C, insertion: Insertion) -> Self;
}

/// A heap node.
///
/// Heap nodes carry just ranking information and the state. Ordering is
/// forwarded to the rank, which is unique thanks to its insertion counter.
#[derive(Debug)]
pub struct HeapNode<R, St>
where
    St: State,
{
    /// The rank of this node that defines how good it is.
    pub rank: R,
    /// The state this node stands for. Ignored when ranking.
    pub state: St,
}

/// PartialEq is forwarded to self.rank's PartialEq
impl<R: Ord, St: State> PartialEq for HeapNode<R, St> {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        self.rank.eq(&other.rank)
    }
}
impl<R: Ord, St: State> Eq for HeapNode<R, St> {}

/// PartialOrd is forwarded to Ord::cmp
impl<R: Ord, St: State> PartialOrd for HeapNode<R, St> {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
/// Ord is forwarded to self.rank's Ord
impl<R: Ord, St: State> Ord for HeapNode<R, St> {
    #[inline(always)]
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank.cmp(&other.rank)
    }
}

/// A min-heap of ranked states.
#[derive(Debug)]
pub struct HeapFrontier<R, St, C>
where
    R: Rank<C>,
    St: State,
    C: Cost,
{
    open: DaryHeap<HeapNode<R, St>>,
    pushes: Insertion,
    _phantom_cost: PhantomData<C>,
}

impl<R, St, C> Frontier<St, C> for HeapFrontier<R, St, C>
where
    R: Rank<C>,
    St: State,
    C: Cost,
{
    type Key = R;

    fn new() -> Self {
        Self {
            open: DaryHeap::with_capacity(256),
            pushes: 0,
            _phantom_cost: PhantomData,
        }
    }

    #[inline(always)]
    fn push(&mut self, s: St, g: C, h: C) {
        self.open.push(HeapNode {
            rank: R::new(g, h, self.pushes),
            state: s,
        });
        self.pushes += 1;
    }
    #[inline(always)]
    fn pop_min(&mut self) -> Option<(R, St)> {
        self.open.pop().map(|n| (n.rank, n.state))
    }
    #[inline(always)]
    fn len(&self) -> usize {
        self.open.len()
    }
    fn entry_size() -> usize {
        std::mem::size_of::<HeapNode<R, St>>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
    struct Id(u8);
    impl State for Id {}

    /// Ranks on `g` alone, like Uniform-Cost Search.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
    struct GRank(u32, Insertion);
    impl Rank<u32> for GRank {
        fn new(g: u32, _h: u32, insertion: Insertion) -> Self {
            Self(g, insertion)
        }
    }

    fn drain<F: Frontier<Id, u32>>(mut f: F) -> Vec<u8> {
        let mut v = vec![];
        while let Some((_k, s)) = f.pop_min() {
            v.push(s.0);
        }
        v
    }

    fn fill<F: Frontier<Id, u32>>() -> F {
        let mut f = F::new();
        f.push(Id(0), 3, 0);
        f.push(Id(1), 1, 0);
        f.push(Id(2), 3, 0);
        f.push(Id(3), 2, 0);
        f
    }

    #[test]
    fn fifo_keeps_insertion_order() {
        let f = fill::<FifoFrontier<Id, u32>>();
        assert_eq!(f.len(), 4);
        assert_eq!(drain(f), vec![0, 1, 2, 3]);
    }

    #[test]
    fn lifo_reverses_insertion_order() {
        let f = fill::<LifoFrontier<Id, u32>>();
        assert_eq!(drain(f), vec![3, 2, 1, 0]);
    }

    #[test]
    fn heap_breaks_ties_by_insertion() {
        let f = fill::<HeapFrontier<GRank, Id, u32>>();
        assert_eq!(drain(f), vec![1, 3, 0, 2]);
    }

    #[test]
    fn heap_keeps_stale_entries() {
        let mut f = HeapFrontier::<GRank, Id, u32>::new();
        f.push(Id(7), 5, 0);
        f.push(Id(7), 2, 0);
        assert_eq!(f.len(), 2);
        assert_eq!(f.pop_min(), Some((GRank(2, 1), Id(7))));
        assert_eq!(f.pop_min(), Some((GRank(5, 0), Id(7))));
        assert!(f.is_empty());
    }
}
