use std::path::Path as FsPath;
use std::path::PathBuf;

use derive_more::Display;
use nonmax::NonMaxU32;
use smallvec::SmallVec;
use thiserror::Error;

use crate::cost::Cost;
use crate::problem::Heuristic;
use crate::problem::Problem;
use crate::space::Action;
use crate::space::Neighbours;
use crate::space::Path;
use crate::space::Space;
use crate::space::State;

const MAX_ELEMENTS_DISPLAYED: usize = 40;

// Simple colours
pub(crate) const WHITE: [u8; 3] = [u8::MAX, u8::MAX, u8::MAX];
pub(crate) const BLACK: [u8; 3] = [u8::MIN, u8::MIN, u8::MIN];
pub(crate) const RED: [u8; 3] = [u8::MAX, u8::MIN, u8::MIN];
pub(crate) const GREEN: [u8; 3] = [u8::MIN, u8::MAX, u8::MIN];
pub(crate) const BLUE: [u8; 3] = [u8::MIN, u8::MIN, u8::MAX];

pub(crate) type CoordIntrinsic = u32;
pub type Coord = NonMaxU32;

/// Cost of moves and paths.
pub type Grid2DCost = u64;
/// Cost of stepping into a cell.
pub type EntryCost = u32;

/// Entry cost of cells that don't say otherwise.
pub const DEFAULT_ENTRY_COST: EntryCost = 1;
/// The most expensive move, over every [`CostModel`].
pub const MAX_MOVE_COST: EntryCost = 4;
/// The cheapest move, over every [`CostModel`].
pub const MIN_MOVE_COST: Grid2DCost = 1;
/// Largest entry cost a cell may have. A step then costs at most
/// `EntryCost::MAX`.
pub const MAX_ENTRY_COST: EntryCost = EntryCost::MAX - MAX_MOVE_COST;
/// Largest number of cells on a grid.
///
/// Paths visit each cell at most once, so with bounded steps their cost stays
/// below [`Grid2DCost::MAX`], the +∞ cost.
pub const MAX_CELLS: usize = EntryCost::MAX as usize;

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
#[display("({row},{col})")]
pub struct Grid2DState {
    row: Coord,
    col: Coord,
}

impl Grid2DState {
    /// Builds a State, unless the coordinates are too large to be represented.
    ///
    /// ```
    /// use gridsearch::problems::grid_2d::Grid2DState;
    ///
    /// let s = Grid2DState::new(2, 5).unwrap();
    /// assert_eq!((s.row(), s.col()), (2, 5));
    /// assert!(Grid2DState::new(usize::MAX, 0).is_none());
    /// ```
    pub fn new(row: usize, col: usize) -> Option<Grid2DState> {
        let row = CoordIntrinsic::try_from(row).ok()?;
        let col = CoordIntrinsic::try_from(col).ok()?;
        Some(Grid2DState {
            row: Coord::new(row)?,
            col: Coord::new(col)?,
        })
    }

    #[inline(always)]
    pub fn row(&self) -> usize {
        self.row.get() as usize
    }
    #[inline(always)]
    pub fn col(&self) -> usize {
        self.col.get() as usize
    }

    /// Number of orthogonal steps between two cells.
    #[inline(always)]
    pub fn manhattan_distance(&self, other: &Grid2DState) -> CoordIntrinsic {
        self.row.get().abs_diff(other.row.get()) + self.col.get().abs_diff(other.col.get())
    }
}
impl State for Grid2DState {}

#[derive(Copy, Clone, Debug, Display, PartialEq, Eq, Hash)]
pub enum Grid2DAction {
    #[display("↑")]
    Up = 0, // row--
    #[display("↓")]
    Down = 1, // row++
    #[display("←")]
    Left = 2, // col--
    #[display("→")]
    Right = 3, // col++
}
impl Action for Grid2DAction {}

impl Grid2DAction {
    /// The expansion order.
    pub const ALL: [Grid2DAction; 4] = [
        Grid2DAction::Up,
        Grid2DAction::Down,
        Grid2DAction::Left,
        Grid2DAction::Right,
    ];

    #[inline(always)]
    fn delta(&self) -> (CoordIntrinsic, CoordIntrinsic) {
        let prev = CoordIntrinsic::MAX;
        let same = 0 as CoordIntrinsic;
        let next = 1 as CoordIntrinsic;

        #[rustfmt::skip]
        let d = match self {
            Grid2DAction::Up    => (prev, same),
            Grid2DAction::Down  => (next, same),
            Grid2DAction::Left  => (same, prev),
            Grid2DAction::Right => (same, next),
        };
        d
    }
}

/// How much moving in each direction costs, on top of the entry cost of the
/// destination cell.
#[derive(Copy, Clone, Debug, Default, Display, PartialEq, Eq, Hash)]
pub enum CostModel {
    /// Every move costs 1.
    #[default]
    #[display("uniform")]
    Uniform,
    /// Right=1, Left=2, Down=3, Up=4.
    #[display("directional")]
    Directional,
}

impl CostModel {
    pub const ALL: [CostModel; 2] = [CostModel::Uniform, CostModel::Directional];

    #[inline(always)]
    pub fn move_cost(&self, a: &Grid2DAction) -> EntryCost {
        match self {
            CostModel::Uniform => 1,
            CostModel::Directional => match a {
                Grid2DAction::Right => 1,
                Grid2DAction::Left => 2,
                Grid2DAction::Down => 3,
                Grid2DAction::Up => 4,
            },
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Grid2DCell {
    /// A walkable cell and what it costs to step into it.
    Free(EntryCost),
    Wall,
}

impl Grid2DCell {
    #[inline(always)]
    pub fn walkable(&self) -> bool {
        matches!(self, Grid2DCell::Free(_))
    }

    /// The cost of stepping into this cell. +∞ for walls.
    #[inline(always)]
    pub fn entry_cost(&self) -> Grid2DCost {
        match self {
            Grid2DCell::Free(c) => Grid2DCost::from(*c),
            Grid2DCell::Wall => Grid2DCost::infinity(),
        }
    }
}

impl Default for Grid2DCell {
    fn default() -> Self {
        Grid2DCell::Free(DEFAULT_ENTRY_COST)
    }
}

impl std::fmt::Display for Grid2DCell {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Grid2DCell::Wall => write!(f, "#"),
            Grid2DCell::Free(DEFAULT_ENTRY_COST) => write!(f, "."),
            Grid2DCell::Free(c) if *c < 10 => write!(f, "{c}"),
            Grid2DCell::Free(_) => write!(f, "+"),
        }
    }
}

#[derive(Debug, Error)]
pub enum Grid2DCellParseError {
    #[error("Invalid character '{0}' found.")]
    InvalidCharacter(char),
}

impl std::convert::TryFrom<char> for Grid2DCell {
    type Error = Grid2DCellParseError;

    fn try_from(ch: char) -> Result<Self, Self::Error> {
        match ch {
            ' ' | '.' => Ok(Grid2DCell::Free(DEFAULT_ENTRY_COST)),
            '#' | '█' => Ok(Grid2DCell::Wall),
            '0'..='9' => Ok(Grid2DCell::Free(
                ch.to_digit(10).unwrap_or(DEFAULT_ENTRY_COST),
            )),
            ch => Err(Grid2DCellParseError::InvalidCharacter(ch)),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("({row},{col}) is out of bounds for a {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    #[error("Grids need at least one row and one column, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("Obstacle ratio {0} is not within [0, 1]")]
    InvalidObstacleRatio(f64),
    #[error("Entry cost {0} is above the maximum of {MAX_ENTRY_COST}")]
    InvalidEntryCost(EntryCost),
    #[error("A {rows}x{cols} grid has more than {MAX_CELLS} cells")]
    TooLarge { rows: usize, cols: usize },
}

/// A rectangular 4-connected grid.
///
/// Grids never change while being searched, searches keep their own records.
#[derive(Clone, PartialEq, Eq)]
pub struct Grid2D {
    rows: usize,
    cols: usize,
    /// Row-major cells.
    cells: Vec<Grid2DCell>,
}

impl Grid2D {
    /// A grid without walls where every cell costs [`DEFAULT_ENTRY_COST`].
    pub fn new_open(rows: usize, cols: usize) -> Result<Self, GridError> {
        Self::check_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![Grid2DCell::default(); rows * cols],
        })
    }

    /// Builds a grid out of rows of cells.
    pub fn from_rows(map: Vec<Vec<Grid2DCell>>) -> Result<Self, GridParseError> {
        let rows = map.len();
        let cols = map.first().map_or(0, |r| r.len());
        if rows == 0 || cols == 0 {
            return Err(GridParseError::EmptyInput);
        }
        Self::check_dimensions(rows, cols)
            .map_err(|_| GridParseError::TooLarge { rows, cols })?;

        let mut cells = Vec::with_capacity(rows * cols);
        for (row, line) in map.into_iter().enumerate() {
            if line.len() != cols {
                return Err(GridParseError::NotRectangular {
                    row,
                    expected: cols,
                    found: line.len(),
                });
            }
            for (col, cell) in line.iter().enumerate() {
                Self::check_cell(cell).map_err(|_| GridParseError::InvalidCost {
                    cost: cell.entry_cost().to_string(),
                    row,
                    col,
                })?;
            }
            cells.extend(line);
        }

        Ok(Self { rows, cols, cells })
    }

    fn check_dimensions(rows: usize, cols: usize) -> Result<(), GridError> {
        if rows == 0 || cols == 0 {
            return Err(GridError::EmptyGrid { rows, cols });
        }
        // Coordinates must fit in a Coord.
        if rows >= CoordIntrinsic::MAX as usize || cols >= CoordIntrinsic::MAX as usize {
            return Err(GridError::OutOfBounds {
                row: rows,
                col: cols,
                rows: CoordIntrinsic::MAX as usize,
                cols: CoordIntrinsic::MAX as usize,
            });
        }
        if rows.checked_mul(cols).is_none_or(|n| n > MAX_CELLS) {
            return Err(GridError::TooLarge { rows, cols });
        }
        Ok(())
    }

    fn check_cell(cell: &Grid2DCell) -> Result<(), GridError> {
        match cell {
            Grid2DCell::Free(c) if *c > MAX_ENTRY_COST => Err(GridError::InvalidEntryCost(*c)),
            _ => Ok(()),
        }
    }

    /// `(rows, cols)`
    #[inline(always)]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    #[inline(always)]
    pub fn contains(&self, s: &Grid2DState) -> bool {
        s.row() < self.rows && s.col() < self.cols
    }

    #[inline(always)]
    fn index(&self, s: &Grid2DState) -> usize {
        debug_assert!(self.contains(s));
        s.row() * self.cols + s.col()
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> GridError {
        GridError::OutOfBounds {
            row,
            col,
            rows: self.rows,
            cols: self.cols,
        }
    }

    /// The State at `(row, col)`.
    pub fn state(&self, row: usize, col: usize) -> Result<Grid2DState, GridError> {
        if row >= self.rows || col >= self.cols {
            return Err(self.out_of_bounds(row, col));
        }
        Grid2DState::new(row, col).ok_or_else(|| self.out_of_bounds(row, col))
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Result<Grid2DCell, GridError> {
        let s = self.state(row, col)?;
        Ok(self.cells[self.index(&s)])
    }

    /// Gets a cell by State. States off the grid read as walls.
    #[inline(always)]
    pub fn at(&self, s: &Grid2DState) -> Grid2DCell {
        if !self.contains(s) {
            return Grid2DCell::Wall;
        }
        self.cells[self.index(s)]
    }

    #[inline(always)]
    pub fn is_walkable(&self, s: &Grid2DState) -> bool {
        self.at(s).walkable()
    }

    #[inline(always)]
    pub fn entry_cost(&self, s: &Grid2DState) -> Grid2DCost {
        self.at(s).entry_cost()
    }

    pub fn set(&mut self, s: &Grid2DState, cell: Grid2DCell) -> Result<(), GridError> {
        if !self.contains(s) {
            return Err(self.out_of_bounds(s.row(), s.col()));
        }
        Self::check_cell(&cell)?;
        let i = self.index(s);
        self.cells[i] = cell;
        Ok(())
    }

    /// Moves from `s`, unless that leaves the grid.
    #[inline(always)]
    pub fn step(&self, s: &Grid2DState, a: &Grid2DAction) -> Option<Grid2DState> {
        let (dr, dc) = a.delta();
        let row = s.row.get().wrapping_add(dr);
        let col = s.col.get().wrapping_add(dc);
        if (row as usize) < self.rows && (col as usize) < self.cols {
            Some(Grid2DState {
                row: Coord::new(row)?,
                col: Coord::new(col)?,
            })
        } else {
            None
        }
    }

    /// Gets the walkable neighbours of a given cell, in the order Up, Down,
    /// Left, Right.
    #[inline(always)]
    pub fn neighbours(&self, s: &Grid2DState) -> Neighbours<Grid2DState, Grid2DAction> {
        #[cfg(feature = "coz_profile")]
        coz::scope!("StateExpansion");

        let mut v = SmallVec::new();
        for a in Grid2DAction::ALL {
            if let Some(n) = self.step(s, &a) {
                if self.is_walkable(&n) {
                    v.push((n, a));
                }
            }
        }
        v
    }

    /// Walkable cells, row by row.
    pub fn walkable_states(&self) -> impl Iterator<Item = Grid2DState> + '_ {
        (0..self.rows)
            .flat_map(move |row| (0..self.cols).map(move |col| (row, col)))
            .filter_map(|(row, col)| Grid2DState::new(row, col))
            .filter(|s| self.is_walkable(s))
    }
}

impl std::fmt::Display for Grid2D {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for line in self.cells.chunks(self.cols).take(MAX_ELEMENTS_DISPLAYED) {
            for cell in line.iter().take(MAX_ELEMENTS_DISPLAYED) {
                write!(f, "{cell}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Grid2D {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Grid2D{:?}", self.dimensions())
    }
}

/// A Grid seen through a cost model.
///
/// Moving into a cell costs its entry cost plus the move cost of the direction
/// taken.
#[derive(Copy, Clone, Debug)]
pub struct Grid2DSpace<'g> {
    grid: &'g Grid2D,
    cost_model: CostModel,
}

impl<'g> Grid2DSpace<'g> {
    pub fn new(grid: &'g Grid2D, cost_model: CostModel) -> Self {
        Self { grid, cost_model }
    }
    pub fn grid(&self) -> &'g Grid2D {
        self.grid
    }
    pub fn cost_model(&self) -> CostModel {
        self.cost_model
    }
}

impl Space<Grid2DState, Grid2DAction, Grid2DCost> for Grid2DSpace<'_> {
    #[inline(always)]
    fn apply(&self, s: &Grid2DState, a: &Grid2DAction) -> Option<Grid2DState> {
        self.grid.step(s, a)
    }

    #[inline(always)]
    fn cost(&self, s: &Grid2DState, a: &Grid2DAction) -> Grid2DCost {
        match self.grid.step(s, a) {
            Some(n) => self
                .grid
                .entry_cost(&n)
                .saturating_add(Grid2DCost::from(self.cost_model.move_cost(a))),
            None => Grid2DCost::infinity(),
        }
    }

    #[inline(always)]
    fn neighbours(&self, s: &Grid2DState) -> Neighbours<Grid2DState, Grid2DAction> {
        self.grid.neighbours(s)
    }

    #[inline(always)]
    fn valid(&self, s: &Grid2DState) -> bool {
        self.grid.is_walkable(s)
    }

    fn size(&self) -> Option<usize> {
        let (rows, cols) = self.grid.dimensions();
        Some(rows * cols)
    }
}

/// A single search over a Grid: a Space, a start and a goal.
#[derive(Copy, Clone, Debug)]
pub struct Grid2DInstance<'g> {
    space: Grid2DSpace<'g>,
    start: Grid2DState,
    goal: Grid2DState,
}

impl<'g> Grid2DInstance<'g> {
    pub fn new(space: Grid2DSpace<'g>, start: Grid2DState, goal: Grid2DState) -> Self {
        Self { space, start, goal }
    }
}

impl<'g> Problem<Grid2DSpace<'g>, Grid2DState, Grid2DAction, Grid2DCost> for Grid2DInstance<'g> {
    #[inline(always)]
    fn space(&self) -> &Grid2DSpace<'g> {
        &self.space
    }
    #[inline(always)]
    fn start(&self) -> Grid2DState {
        self.start
    }
    #[inline(always)]
    fn goal(&self) -> Grid2DState {
        self.goal
    }
}

#[derive(Debug, Error)]
pub enum GridParseError {
    #[error("Empty input")]
    EmptyInput,
    #[error("Invalid cell {e} found at ({row},{col})")]
    InvalidCell {
        e: Grid2DCellParseError,
        row: usize,
        col: usize,
    },
    #[error("Row {row} has {found} cells, expected {expected}")]
    NotRectangular {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("A {rows}x{cols} grid is too large")]
    TooLarge { rows: usize, cols: usize },
    #[error("Invalid cell code '{code}' at ({row},{col}). Expected 0, 1, 2 or 3")]
    InvalidCode {
        code: String,
        row: usize,
        col: usize,
    },
    #[error("Invalid entry cost '{cost}' at ({row},{col})")]
    InvalidCost {
        cost: String,
        row: usize,
        col: usize,
    },
    #[error("Cost table is {costs:?} but the grid is {codes:?}")]
    ShapeMismatch {
        codes: (usize, usize),
        costs: (usize, usize),
    },
    #[error("No start cell")]
    MissingStart,
    #[error("No goal cell")]
    MissingGoal,
    #[error("Another start found at ({row},{col})")]
    DuplicateStart { row: usize, col: usize },
    #[error("Another goal found at ({row},{col})")]
    DuplicateGoal { row: usize, col: usize },
    #[error("I/O error when loading '{p}': {e}")]
    IOError { p: PathBuf, e: std::io::Error },
    #[error("Image error when loading '{p}': {e}")]
    ImageError { p: PathBuf, e: image::ImageError },
}

/// Collects start and goal markers while parsing.
#[derive(Default)]
struct Endpoints {
    start: Option<Grid2DState>,
    goal: Option<Grid2DState>,
}

impl Endpoints {
    fn start(&mut self, row: usize, col: usize) -> Result<(), GridParseError> {
        if self.start.is_some() {
            return Err(GridParseError::DuplicateStart { row, col });
        }
        self.start = Grid2DState::new(row, col);
        Ok(())
    }
    fn goal(&mut self, row: usize, col: usize) -> Result<(), GridParseError> {
        if self.goal.is_some() {
            return Err(GridParseError::DuplicateGoal { row, col });
        }
        self.goal = Grid2DState::new(row, col);
        Ok(())
    }
    fn build(self, grid: Grid2D) -> Result<Grid2DProblem, GridParseError> {
        let start = self.start.ok_or(GridParseError::MissingStart)?;
        let goal = self.goal.ok_or(GridParseError::MissingGoal)?;
        Ok(Grid2DProblem { grid, start, goal })
    }
}

/// A grid with a designated start and goal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid2DProblem {
    grid: Grid2D,
    start: Grid2DState,
    goal: Grid2DState,
}

impl Grid2DProblem {
    pub fn new(grid: Grid2D, start: Grid2DState, goal: Grid2DState) -> Result<Self, GridError> {
        for s in [start, goal] {
            if !grid.contains(&s) {
                return Err(grid.out_of_bounds(s.row(), s.col()));
            }
        }
        Ok(Self { grid, start, goal })
    }

    pub fn grid(&self) -> &Grid2D {
        &self.grid
    }
    pub fn start(&self) -> Grid2DState {
        self.start
    }
    pub fn goal(&self) -> Grid2DState {
        self.goal
    }

    /// The search from start to goal under the given cost model.
    pub fn instance(&self, cost_model: CostModel) -> Grid2DInstance<'_> {
        self.instance_between(self.start, self.goal, cost_model)
    }

    /// A search between any two cells of this grid.
    pub fn instance_between(
        &self,
        start: Grid2DState,
        goal: Grid2DState,
        cost_model: CostModel,
    ) -> Grid2DInstance<'_> {
        Grid2DInstance::new(Grid2DSpace::new(&self.grid, cost_model), start, goal)
    }

    /// Parses a pair of numeric tables.
    ///
    /// Codes are `0` (obstacle), `1` (free), `2` (start) and `3` (goal). The
    /// optional cost table holds an entry cost for every cell and must have
    /// the same shape. Values can be split by commas and/or whitespace.
    ///
    /// ```
    /// use gridsearch::problems::grid_2d::Grid2DProblem;
    ///
    /// let p = Grid2DProblem::from_tables("2,1\n0,3\n", Some("1 5\n1 2\n")).unwrap();
    /// assert_eq!(p.grid().dimensions(), (2, 2));
    /// assert_eq!(p.grid().entry_cost(&p.goal()), 2);
    /// ```
    pub fn from_tables(codes: &str, costs: Option<&str>) -> Result<Self, GridParseError> {
        let codes = split_table(codes);
        if codes.is_empty() || codes[0].is_empty() {
            return Err(GridParseError::EmptyInput);
        }

        let costs = match costs {
            Some(costs) => {
                let costs = split_table(costs);
                let shape = |t: &Vec<Vec<&str>>| (t.len(), t.first().map_or(0, |r| r.len()));
                let same_shape = codes.len() == costs.len()
                    && codes.iter().zip(costs.iter()).all(|(a, b)| a.len() == b.len());
                if !same_shape {
                    return Err(GridParseError::ShapeMismatch {
                        codes: shape(&codes),
                        costs: shape(&costs),
                    });
                }
                Some(costs)
            }
            None => None,
        };

        let mut endpoints = Endpoints::default();
        let mut map = Vec::with_capacity(codes.len());
        for (row, line) in codes.iter().enumerate() {
            let mut cells = Vec::with_capacity(line.len());
            for (col, code) in line.iter().enumerate() {
                let cost = match &costs {
                    Some(costs) => {
                        let token = costs[row][col];
                        token
                            .parse::<EntryCost>()
                            .ok()
                            .filter(|c| *c <= MAX_ENTRY_COST)
                            .ok_or_else(|| GridParseError::InvalidCost {
                                cost: token.to_string(),
                                row,
                                col,
                            })?
                    }
                    None => DEFAULT_ENTRY_COST,
                };

                let cell = match *code {
                    "0" => Grid2DCell::Wall,
                    "1" => Grid2DCell::Free(cost),
                    "2" => {
                        endpoints.start(row, col)?;
                        Grid2DCell::Free(cost)
                    }
                    "3" => {
                        endpoints.goal(row, col)?;
                        Grid2DCell::Free(cost)
                    }
                    code => {
                        return Err(GridParseError::InvalidCode {
                            code: code.to_string(),
                            row,
                            col,
                        });
                    }
                };
                cells.push(cell);
            }
            map.push(cells);
        }

        endpoints.build(Grid2D::from_rows(map)?)
    }

    pub fn from_table_files(codes: &FsPath, costs: Option<&FsPath>) -> Result<Self, GridParseError> {
        let read = |p: &FsPath| {
            std::fs::read_to_string(p).map_err(|e| GridParseError::IOError {
                p: p.to_path_buf(),
                e,
            })
        };

        let codes = read(codes)?;
        let costs = costs.map(read).transpose()?;
        Self::from_tables(&codes, costs.as_deref())
    }

    /// A random grid going from the top-left corner to the bottom-right one.
    ///
    /// Each cell is a wall with probability `obstacle_ratio`, otherwise it
    /// gets an entry cost in `1..=max_entry_cost`. The start and goal cells
    /// are always walkable.
    pub fn random<R: rand::Rng>(
        rows: usize,
        cols: usize,
        obstacle_ratio: f64,
        max_entry_cost: EntryCost,
        r: &mut R,
    ) -> Result<Self, GridError> {
        if !(0.0..=1.0).contains(&obstacle_ratio) {
            return Err(GridError::InvalidObstacleRatio(obstacle_ratio));
        }
        if max_entry_cost > MAX_ENTRY_COST {
            return Err(GridError::InvalidEntryCost(max_entry_cost));
        }
        let mut grid = Grid2D::new_open(rows, cols)?;
        for cell in grid.cells.iter_mut() {
            *cell = if r.random::<f64>() < obstacle_ratio {
                Grid2DCell::Wall
            } else if max_entry_cost <= DEFAULT_ENTRY_COST {
                Grid2DCell::Free(max_entry_cost)
            } else {
                Grid2DCell::Free(r.random_range(DEFAULT_ENTRY_COST..=max_entry_cost))
            };
        }

        let start = grid.state(0, 0)?;
        let goal = grid.state(rows - 1, cols - 1)?;
        for s in [start, goal] {
            if !grid.is_walkable(&s) {
                grid.set(&s, Grid2DCell::default())?;
            }
        }

        Self::new(grid, start, goal)
    }

    /// Picks a new start and goal among the walkable cells.
    ///
    /// Returns `None` when there are no walkable cells.
    pub fn randomize<R: rand::Rng>(&self, r: &mut R) -> Option<Grid2DProblem> {
        let walkable: Vec<Grid2DState> = self.grid.walkable_states().collect();
        if walkable.is_empty() {
            return None;
        }
        let start = walkable[r.random_range(0..walkable.len())];
        let goal = walkable[r.random_range(0..walkable.len())];
        Some(Grid2DProblem {
            grid: self.grid.clone(),
            start,
            goal,
        })
    }

    /// Draws the grid with the cells of a path marked with `*`.
    pub fn display_path(&self, path: &Path<Grid2DState, Grid2DCost>) -> String {
        use std::fmt::Write;

        let (rows, cols) = self.grid.dimensions();
        let mut out = String::with_capacity((cols + 1) * rows);
        for row in 0..rows.min(MAX_ELEMENTS_DISPLAYED) {
            for col in 0..cols.min(MAX_ELEMENTS_DISPLAYED) {
                let Some(s) = Grid2DState::new(row, col) else {
                    continue;
                };
                let _ = match (s == self.start, s == self.goal, path.contains(&s)) {
                    (true, true, _) => write!(out, "!"),
                    (true, false, _) => write!(out, "S"),
                    (false, true, _) => write!(out, "G"),
                    (false, false, true) => write!(out, "*"),
                    (false, false, false) => write!(out, "{}", self.grid.at(&s)),
                };
            }
            out.push('\n');
        }
        out
    }
}

fn split_table(s: &str) -> Vec<Vec<&str>> {
    s.lines()
        .map(|line| {
            line.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|row| !row.is_empty())
        .collect()
}

impl std::convert::TryFrom<&str> for Grid2DProblem {
    type Error = GridParseError;

    /// Parses an ASCII map.
    ///
    /// `.` and spaces are free cells, `#` are walls, digits are free cells
    /// with that entry cost, and `S` and `G` mark the start and the goal.
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let lines: Vec<&str> = s.lines().filter(|l| !l.is_empty()).collect();
        if lines.is_empty() {
            return Err(GridParseError::EmptyInput);
        }

        let mut endpoints = Endpoints::default();
        let mut map = Vec::with_capacity(lines.len());
        for (row, line) in lines.iter().enumerate() {
            let mut cells = Vec::with_capacity(line.len());
            for (col, ch) in line.chars().enumerate() {
                let cell = match ch {
                    'S' => {
                        endpoints.start(row, col)?;
                        Grid2DCell::default()
                    }
                    'G' => {
                        endpoints.goal(row, col)?;
                        Grid2DCell::default()
                    }
                    ch => Grid2DCell::try_from(ch)
                        .map_err(|e| GridParseError::InvalidCell { e, row, col })?,
                };
                cells.push(cell);
            }
            map.push(cells);
        }

        endpoints.build(Grid2D::from_rows(map)?)
    }
}

impl std::convert::TryFrom<&FsPath> for Grid2DProblem {
    type Error = GridParseError;

    /// Loads a maze image.
    ///
    /// Black pixels are walls, blue marks the start and green the goal.
    /// Anything else is a free cell.
    fn try_from(p: &FsPath) -> Result<Self, Self::Error> {
        use image::ImageReader;
        use image::Rgb;

        let img = ImageReader::open(p)
            .map_err(|e| GridParseError::IOError {
                p: p.to_path_buf(),
                e,
            })?
            .decode()
            .map_err(|e| GridParseError::ImageError {
                p: p.to_path_buf(),
                e,
            })?
            .into_rgb8();

        let mut endpoints = Endpoints::default();
        let mut map = Vec::with_capacity(img.height() as usize);
        for (row, line) in img.rows().enumerate() {
            let mut cells = Vec::with_capacity(img.width() as usize);
            for (col, px) in line.enumerate() {
                let px: &Rgb<u8> = px;
                let cell = match px.0 {
                    BLACK => Grid2DCell::Wall,
                    BLUE => {
                        endpoints.start(row, col)?;
                        Grid2DCell::default()
                    }
                    GREEN => {
                        endpoints.goal(row, col)?;
                        Grid2DCell::default()
                    }
                    _ => Grid2DCell::default(),
                };
                cells.push(cell);
            }
            map.push(cells);
        }

        endpoints.build(Grid2D::from_rows(map)?)
    }
}

impl std::fmt::Display for Grid2DProblem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let (rows, cols) = self.grid.dimensions();
        writeln!(
            f,
            "Grid2DProblem({rows}x{cols}) (s:{}, g:{}):",
            self.start, self.goal
        )?;
        write!(f, "{}", self.display_path(&Path::empty()))
    }
}

/// Manhattan distance scaled by the cheapest move.
///
/// Every step costs at least [`MIN_MOVE_COST`], so this never overestimates
/// under any [`CostModel`].
#[derive(Debug)]
pub struct Grid2DHeuristicManhattan;

impl Heuristic<Grid2DState, Grid2DCost> for Grid2DHeuristicManhattan {
    #[inline(always)]
    fn h(s: &Grid2DState, goal: &Grid2DState) -> Grid2DCost {
        Grid2DCost::from(s.manhattan_distance(goal)) * MIN_MOVE_COST
    }
}
