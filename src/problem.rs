use crate::cost::Cost;
use crate::space::Action;
use crate::space::Space;
use crate::space::State;

/// A search problem: find a Path from a start to a goal through a Space.
pub trait Problem<Sp, St, A, C>: std::fmt::Debug
where
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    fn space(&self) -> &Sp;
    fn start(&self) -> St;
    fn goal(&self) -> St;

    #[inline(always)]
    fn is_goal(&self, s: &St) -> bool {
        *s == self.goal()
    }
}

/// An estimate of the remaining cost between two states.
///
/// Must never overestimate (admissible) for A* to stay optimal.
pub trait Heuristic<St, C>: std::fmt::Debug
where
    St: State,
    C: Cost,
{
    fn h(_s: &St, _goal: &St) -> C {
        C::zero()
    }
}

/// The blind heuristic. Turns A* into Uniform-Cost Search.
#[derive(Debug)]
pub struct ZeroHeuristic;

impl<St, C> Heuristic<St, C> for ZeroHeuristic
where
    St: State,
    C: Cost,
{
}
