//! The search loop shared by every algorithm.

use std::cmp::max;
use std::marker::PhantomData;

use crate::algorithms::Discipline;
use crate::cost::Cost;
use crate::frontier::Frontier;
use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::search::SearchTable;
use crate::space::Action;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

/// Counters gathered while searching.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States popped and goal-tested.
    pub expanded: usize,
    /// States pushed to the Frontier.
    pub generated: usize,
    /// Stale Frontier entries popped and thrown away.
    pub discarded: usize,
    /// Largest Frontier size seen.
    pub peak_open: usize,
    /// Records in the Search Table.
    pub records: usize,
    /// Bytes per Frontier entry.
    pub open_entry_bytes: usize,
    /// Bytes per Search Table record.
    pub record_bytes: usize,
}

impl SearchStats {
    pub fn peak_open_bytes(&self) -> usize {
        self.peak_open * self.open_entry_bytes
    }
    pub fn table_bytes(&self) -> usize {
        self.records * self.record_bytes
    }
    /// A lower bound on the memory used by the search at its peak.
    pub fn peak_bytes(&self) -> usize {
        self.peak_open_bytes() + self.table_bytes()
    }

    pub fn write_memory_stats<W: std::io::Write>(&self, mut out: W) -> std::io::Result<()> {
        use size::Size;
        use thousands::Separable;

        writeln!(out, "Search Stats:")?;
        writeln!(
            out,
            "  - Expanded nodes:  {}",
            self.expanded.separate_with_commas()
        )?;
        writeln!(
            out,
            "  - Generated nodes: {}",
            self.generated.separate_with_commas()
        )?;
        writeln!(
            out,
            "  - Discarded nodes: {}",
            self.discarded.separate_with_commas()
        )?;
        writeln!(
            out,
            "  - |Open|*:  {} ({})",
            self.peak_open.separate_with_commas(),
            Size::from_bytes(self.peak_open_bytes())
        )?;
        writeln!(
            out,
            "  - |Table|:  {} ({})",
            self.records.separate_with_commas(),
            Size::from_bytes(self.table_bytes())
        )?;
        Ok(())
    }
}

/// What a search returns.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult<St, C>
where
    St: State,
    C: Cost,
{
    /// From start to goal. Empty when there's no path.
    pub path: Path<St, C>,
    pub nodes_expanded: usize,
    /// Cost of `path`, or `None` when there's no path.
    pub total_cost: Option<C>,
    pub stats: SearchStats,
}

impl<St, C> SearchResult<St, C>
where
    St: State,
    C: Cost,
{
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Best-first search with a pluggable Frontier, Heuristic and Discipline.
///
/// The Search Table and Frontier are owned by the search, while the Problem is
/// only borrowed, so many searches can share it.
#[derive(Debug)]
pub struct BestFirstSearch<'p, H, F, P, Sp, St, A, C>
where
    H: Heuristic<St, C>,
    F: Frontier<St, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    problem: &'p P,
    discipline: Discipline,

    /// Best known costs and parents of every generated State.
    table: SearchTable<St, A, C>,
    /// States waiting to be expanded. May hold stale duplicates.
    open: F,

    stats: SearchStats,

    _phantom_heuristic: PhantomData<H>,
    _phantom_space: PhantomData<Sp>,
}

impl<'p, H, F, P, Sp, St, A, C> BestFirstSearch<'p, H, F, P, Sp, St, A, C>
where
    H: Heuristic<St, C>,
    F: Frontier<St, C>,
    P: Problem<Sp, St, A, C>,
    Sp: Space<St, A, C>,
    St: State,
    A: Action,
    C: Cost,
{
    /// Initialises the Search
    ///
    /// A start that's not a valid State leaves the Frontier empty.
    #[must_use]
    pub fn new(problem: &'p P, discipline: Discipline) -> Self {
        let mut search = Self {
            problem,
            discipline,
            table: SearchTable::new(),
            open: F::new(),
            stats: SearchStats {
                open_entry_bytes: F::entry_size(),
                record_bytes: SearchTable::<St, A, C>::entry_size(),
                ..Default::default()
            },
            _phantom_heuristic: PhantomData,
            _phantom_space: PhantomData,
        };

        let start = problem.start();
        if problem.space().valid(&start) {
            search.push(&start, None, C::zero());
        } else {
            log::debug!("Start {start:?} is not a valid state");
        }

        search
    }

    /// Runs the search until the goal is popped or the Frontier runs out.
    #[must_use]
    pub fn find_path(&mut self) -> Path<St, C> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("FindPath");

        let problem: &'p P = self.problem;
        let space = problem.space();

        while let Some((_key, state)) = self.open.pop_min() {
            #[cfg(feature = "coz_profile")]
            coz::scope!("NodeExpansion");

            if self.discipline == Discipline::Graph {
                if self.table.is_closed(&state) {
                    // Stale entry. The state was expanded through a better
                    // path already.
                    self.stats.discarded += 1;
                    continue;
                }
                self.table.mark_closed(&state);
            }

            self.stats.expanded += 1;
            let g: C = self.table.g(&state);
            log::trace!("Expanding {state:?} (g={g})");

            if problem.is_goal(&state) {
                self.stats.records = self.table.len();
                return self.table.path(space, state);
            }

            let parent = self.table.parent(&state).map(|(p, _a)| p);
            for (s, a) in space.neighbours(&state) {
                #[cfg(feature = "coz_profile")]
                coz::scope!("ReachNode");

                let c: C = space.cost(&state, &a);
                let new_g = g.saturating_add(&c);

                match self.discipline {
                    Discipline::Graph => {
                        if self.table.is_closed(&s) {
                            continue;
                        }
                        // Unseen states have g=∞, so this also takes new ones.
                        if new_g < self.table.g(&s) {
                            self.push(&s, Some((state, a)), new_g);
                        }
                    }
                    Discipline::Tree => {
                        if parent == Some(s) {
                            continue;
                        }
                        // First discovery wins.
                        if self.table.is_seen(&s) {
                            continue;
                        }
                        self.push(&s, Some((state, a)), new_g);
                    }
                }
            }
        }

        self.stats.records = self.table.len();
        Path::empty()
    }

    /// Runs the search to completion.
    #[must_use]
    pub fn run(mut self) -> SearchResult<St, C> {
        log::debug!(
            "Searching {:?} -> {:?} ({} discipline)",
            self.problem.start(),
            self.problem.goal(),
            self.discipline
        );
        let path = self.find_path();
        log::debug!(
            "Search finished. Found={} Expanded={} Cost={:?}",
            !path.is_empty(),
            self.stats.expanded,
            path.cost()
        );

        SearchResult {
            total_cost: path.cost(),
            nodes_expanded: self.stats.expanded,
            path,
            stats: self.stats,
        }
    }

    /// The path to a generated State following its current parents.
    #[must_use]
    pub fn path_to(&self, s: St) -> Path<St, C> {
        self.table.path(self.problem.space(), s)
    }

    pub fn table(&self) -> &SearchTable<St, A, C> {
        &self.table
    }
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
    pub fn discipline(&self) -> Discipline {
        self.discipline
    }

    #[inline(always)]
    fn push(&mut self, s: &St, parent: Option<(St, A)>, g: C) {
        let h: C = H::h(s, &self.problem.goal());
        self.table.update(s, g, parent);
        self.open.push(*s, g, h);

        self.stats.generated += 1;
        self.stats.peak_open = max(self.stats.peak_open, self.open.len());
    }
}
