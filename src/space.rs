use std::fmt::Debug;
use std::hash::Hash;

use smallvec::SmallVec;

use crate::cost::Cost;

pub trait Action: Copy + Clone + Debug + PartialEq + Eq {}
pub trait State: Copy + Clone + Debug + PartialEq + Eq + Hash {}

/// Successors fit inline for 4-connected spaces.
pub const INLINE_NEIGHBOURS: usize = 4;
pub type Neighbours<St, A> = SmallVec<[(St, A); INLINE_NEIGHBOURS]>;

/// A sequence of states from a start to an end.
///
/// An empty sequence means there's no path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<St, C>
where
    St: State,
    C: Cost,
{
    states: Vec<St>,
    cost: C,
}

impl<St, C> Path<St, C>
where
    St: State,
    C: Cost,
{
    #[inline(always)]
    pub fn new_from_start(start: St) -> Self {
        Self {
            states: vec![start],
            cost: C::zero(),
        }
    }

    #[inline(always)]
    pub fn empty() -> Self {
        Self {
            states: vec![],
            cost: C::zero(),
        }
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
    /// Number of states, including both ends.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn start(&self) -> Option<&St> {
        self.states.first()
    }
    pub fn end(&self) -> Option<&St> {
        self.states.last()
    }
    pub fn states(&self) -> &[St] {
        &self.states
    }
    pub fn contains(&self, s: &St) -> bool {
        self.states.contains(s)
    }

    /// The accumulated cost, or `None` when there's no path.
    pub fn cost(&self) -> Option<C> {
        (!self.is_empty()).then_some(self.cost)
    }

    /// Extends the Path with a new end reached at cost `c`.
    #[inline(always)]
    pub fn append(&mut self, s: St, c: C) {
        debug_assert!(!self.is_empty());
        self.states.push(s);
        self.cost = self.cost.saturating_add(&c);
    }

    /// Reverses the Path.
    ///
    /// Useful when naturally reconstructing paths in reverse. The cost is kept
    /// as is, which is only right when the costs were accounted in the final
    /// direction.
    pub fn reverse(&mut self) {
        self.states.reverse();
    }
}

impl<St, C> std::fmt::Display for Path<St, C>
where
    St: State,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        const MAX_STATES_DISPLAYED: usize = 20;

        match (self.start(), self.end()) {
            (Some(start), Some(end)) => {
                write!(
                    f,
                    "Path({}, {:?}:{:?}:{:?})",
                    self.cost,
                    start,
                    self.states
                        .iter()
                        .skip(1)
                        .take(MAX_STATES_DISPLAYED)
                        .collect::<Vec<_>>(),
                    end
                )
            }
            (None, None) => write!(f, "Path()"),
            _ => unreachable!("Path::start and Path::end should both be Some or None"),
        }
    }
}

pub trait Space<St, A, C>: std::fmt::Debug
where
    St: State,
    A: Action,
    C: Cost,
{
    fn apply(&self, s: &St, a: &A) -> Option<St>;

    /// The cost of applying `a` on `s`.
    fn cost(&self, _s: &St, _a: &A) -> C {
        C::one()
    }
    /// Expands a State.
    ///
    /// The order is stable, searches rely on it to break ties.
    fn neighbours(&self, s: &St) -> Neighbours<St, A>;
    /// Verify is a State is valid.
    fn valid(&self, s: &St) -> bool;

    /// Checks that consecutive states are reachable from each other and that
    /// the Path accounts their costs.
    fn valid_path(&self, p: &Path<St, C>) -> bool {
        let Some(start) = p.start() else {
            // Empty paths are fine
            return *p == Path::<St, C>::empty();
        };
        if !self.valid(start) {
            return false;
        }

        let mut cost = C::zero();
        for pair in p.states().windows(2) {
            let (from, to) = (pair[0], pair[1]);
            match self.neighbours(&from).iter().find(|(n, _a)| *n == to) {
                Some((_n, a)) => cost = cost.saturating_add(&self.cost(&from, a)),
                None => return false,
            }
        }
        p.cost() == Some(cost)
    }

    fn size(&self) -> Option<usize> {
        None
    }
}
