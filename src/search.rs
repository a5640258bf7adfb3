use derive_more::Display;
use rustc_hash::FxHashMap;

use crate::cost::Cost;
use crate::space::Action;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// Where a State stands within a search.
#[derive(Copy, Clone, Debug, Display, PartialEq, Eq)]
pub enum Status {
    /// Never generated.
    #[display("unseen")]
    Unseen,
    /// Generated, and possibly waiting on the Frontier.
    #[display("open")]
    Open,
    /// Expanded already.
    #[display("closed")]
    Closed,
}

/// The mutable part of a State during a single search.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SearchRecord<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    /// Best known cost from the start.
    pub g: C,
    /// How we got here through the best known path.
    pub parent: Option<(St, A)>,
    pub status: Status,
}

impl<St, A, C> SearchRecord<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    pub fn unseen() -> Self {
        Self {
            g: C::infinity(),
            parent: None,
            status: Status::Unseen,
        }
    }

    #[inline(always)]
    pub fn is_closed(&self) -> bool {
        self.status == Status::Closed
    }
}

/// Per-search records, keyed by State.
///
/// Spaces stay immutable, so many searches can run on the same Space as long as
/// each one owns its table.
pub struct SearchTable<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    records: FxHashMap<St, SearchRecord<St, A, C>>,
}

impl<St, A, C> SearchTable<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: FxHashMap::default(),
        }
    }

    /// Gets the record of a State, creating an unseen one on first access.
    pub fn get(&mut self, s: &St) -> &SearchRecord<St, A, C> {
        self.records.entry(*s).or_insert_with(SearchRecord::unseen)
    }

    /// Best known cost to `s`. +∞ when unseen.
    #[inline(always)]
    pub fn g(&self, s: &St) -> C {
        match self.records.get(s) {
            Some(r) => r.g,
            None => C::infinity(),
        }
    }

    #[inline(always)]
    pub fn parent(&self, s: &St) -> Option<(St, A)> {
        self.records.get(s).and_then(|r| r.parent)
    }

    #[inline(always)]
    pub fn status(&self, s: &St) -> Status {
        match self.records.get(s) {
            Some(r) => r.status,
            None => Status::Unseen,
        }
    }

    #[inline(always)]
    pub fn is_seen(&self, s: &St) -> bool {
        self.status(s) != Status::Unseen
    }

    /// Checks if a State is already Closed (was expanded and explored)
    #[inline(always)]
    pub fn is_closed(&self, s: &St) -> bool {
        self.status(s) == Status::Closed
    }

    /// Records a (better) way of reaching `s`.
    ///
    /// Closed states are final.
    #[inline(always)]
    pub fn update(&mut self, s: &St, g: C, parent: Option<(St, A)>) {
        let r = self.records.entry(*s).or_insert_with(SearchRecord::unseen);
        debug_assert!(!r.is_closed(), "Tried reaching closed state {s:?}");
        r.g = g;
        r.parent = parent;
        r.status = Status::Open;
    }

    /// Marks a State as Closed (expanded)
    #[inline(always)]
    pub fn mark_closed(&mut self, s: &St) {
        match self.records.get_mut(s) {
            Some(r) => {
                r.status = Status::Closed;
            }
            None => {
                unreachable!("Tried closing a state without a record");
            }
        }
    }

    #[inline(always)]
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }
    #[inline(always)]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Bytes taken by each record in the table.
    pub fn entry_size() -> usize {
        std::mem::size_of::<(St, SearchRecord<St, A, C>)>()
    }

    /// Follows parents from `end` back to a root and returns the path from it.
    ///
    /// States that were never reached have no path.
    #[must_use]
    pub fn path<Sp: Space<St, A, C>>(&self, space: &Sp, end: St) -> Path<St, C> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("PathReconstruction");

        if !self.is_seen(&end) {
            return Path::empty();
        }

        let mut path = Path::<St, C>::new_from_start(end);
        let mut s = end;
        while let Some((parent, a)) = self.parent(&s) {
            debug_assert!(s != parent);
            debug_assert!(
                path.len() <= self.len(),
                "Parent links from {end:?} loop around"
            );
            let c: C = space.cost(&parent, &a);
            path.append(parent, c);
            s = parent;
        }

        path.reverse();
        path
    }
}

impl<St, A, C> Default for SearchTable<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    #[inline(always)]
    fn default() -> Self {
        Self::new()
    }
}

impl<St, A, C> std::fmt::Debug for SearchTable<St, A, C>
where
    St: State,
    A: Action,
    C: Cost,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SearchTable{{({} records)}}", self.len())
    }
}
