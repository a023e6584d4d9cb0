//! Dense row-major storage shared by the map and the frame.
//!
//! * [`Grid`] owns the cells and is the only place that turns `(x, y)` into
//!   a flat index, so bounds validation lives here and nowhere else.
//! * [`GridSlot`] wraps a grid in the create / recreate / teardown lifecycle.
//!   Creating twice without asking for a recreate first is an error, never a
//!   silent reallocation.

use thiserror::Error;
use tracing::{debug, warn};

/// Everything that can go wrong when touching a grid.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Read or write before `create`.
    #[error("{0} has not been initialized")]
    NotInitialized(&'static str),

    /// `create` while a grid is live and no recreate was requested.
    #[error("{0} is already initialized; request a recreate first")]
    AlreadyInitialized(&'static str),

    /// Either coordinate is below zero.
    #[error("negative coordinate ({x}, {y})")]
    NegativeCoordinate { x: i64, y: i64 },

    /// Non-negative coordinate past the right or bottom edge.
    #[error("coordinate ({x}, {y}) outside {width}x{height} grid")]
    OutOfBounds {
        x: i64,
        y: i64,
        width: usize,
        height: usize,
    },

    /// One of the requested dimensions is zero.
    #[error("{what} dimensions must be non-zero, got {width}x{height}")]
    ZeroSize {
        what: &'static str,
        width: usize,
        height: usize,
    },

    /// The allocator refused (or the cell count overflowed `usize`).
    #[error("could not allocate {cells} cells")]
    Allocation { cells: usize },
}

/// Observable lifecycle of a [`GridSlot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Uninitialized,
    Initialized,
    /// The old grid is unreachable; the next `create` frees it and
    /// reallocates.
    RecreatePending,
}

/*───────────────────────────────────────────────────────────────────────*/
/*                                 Grid                                  */
/*───────────────────────────────────────────────────────────────────────*/

/// Rectangular, row-major, exclusively owned cell storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone + Default> Grid<T> {
    /// Allocate a `width × height` grid filled with `T::default()`.
    ///
    /// Allocation failure is reported as [`GridError::Allocation`] instead of
    /// aborting the process.
    pub fn try_new(what: &'static str, width: usize, height: usize) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::ZeroSize {
                what,
                width,
                height,
            });
        }
        let len = width
            .checked_mul(height)
            .ok_or(GridError::Allocation { cells: usize::MAX })?;

        let mut cells = Vec::new();
        cells
            .try_reserve_exact(len)
            .map_err(|_| GridError::Allocation { cells: len })?;
        cells.resize(len, T::default());

        Ok(Self {
            width,
            height,
            cells,
        })
    }
}

impl<T> Grid<T> {
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    #[inline]
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// `true` if `(x, y)` lies inside `[0, width) × [0, height)`.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// Flat index for `(x, y)`: `y * width + x`.
    pub fn index(&self, x: i64, y: i64) -> Result<usize, GridError> {
        if x < 0 || y < 0 {
            return Err(GridError::NegativeCoordinate { x, y });
        }
        if !self.contains(x, y) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width + x as usize)
    }

    pub fn get(&self, x: i64, y: i64) -> Result<&T, GridError> {
        let i = self.index(x, y)?;
        Ok(&self.cells[i])
    }

    pub fn get_mut(&mut self, x: i64, y: i64) -> Result<&mut T, GridError> {
        let i = self.index(x, y)?;
        Ok(&mut self.cells[i])
    }

    pub fn set(&mut self, x: i64, y: i64, value: T) -> Result<(), GridError> {
        let i = self.index(x, y)?;
        self.cells[i] = value;
        Ok(())
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> std::slice::Chunks<'_, T> {
        self.cells.chunks(self.width)
    }
}

/*───────────────────────────────────────────────────────────────────────*/
/*                              Lifecycle                                */
/*───────────────────────────────────────────────────────────────────────*/

#[derive(Debug)]
enum SlotState<T> {
    Uninitialized,
    Initialized(Grid<T>),
    RecreatePending(Grid<T>),
}

/// A grid plus the state machine that guards its allocation.
#[derive(Debug)]
pub struct GridSlot<T> {
    what: &'static str,
    state: SlotState<T>,
    generation: u64,
}

impl<T: Clone + Default> GridSlot<T> {
    /// Empty slot; `what` names the owner in diagnostics ("map", "frame").
    pub const fn new(what: &'static str) -> Self {
        Self {
            what,
            state: SlotState::Uninitialized,
            generation: 0,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.state {
            SlotState::Uninitialized => Lifecycle::Uninitialized,
            SlotState::Initialized(_) => Lifecycle::Initialized,
            SlotState::RecreatePending(_) => Lifecycle::RecreatePending,
        }
    }

    /// Number of successful allocations so far. A recreate always bumps it.
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Allocate the grid.
    ///
    /// * `Uninitialized` → allocate.
    /// * `RecreatePending` → drop the old grid, then allocate.
    /// * `Initialized` → [`GridError::AlreadyInitialized`].
    pub fn create(&mut self, width: usize, height: usize) -> Result<Lifecycle, GridError> {
        match self.state {
            SlotState::Initialized(_) => {
                warn!(what = self.what, "create refused: already initialized");
                return Err(GridError::AlreadyInitialized(self.what));
            }
            SlotState::RecreatePending(_) => {
                // old storage goes before the new allocation
                self.state = SlotState::Uninitialized;
                debug!(what = self.what, "released grid for recreate");
            }
            SlotState::Uninitialized => {}
        }

        let grid = Grid::try_new(self.what, width, height)?;
        self.state = SlotState::Initialized(grid);
        self.generation += 1;
        debug!(
            what = self.what,
            width,
            height,
            generation = self.generation,
            "grid allocated"
        );
        Ok(Lifecycle::Initialized)
    }

    /// Mark a live grid for recreation by the next `create`.
    pub fn request_recreate(&mut self) -> Result<Lifecycle, GridError> {
        self.state = match std::mem::replace(&mut self.state, SlotState::Uninitialized) {
            SlotState::Initialized(g) | SlotState::RecreatePending(g) => {
                SlotState::RecreatePending(g)
            }
            SlotState::Uninitialized => return Err(GridError::NotInitialized(self.what)),
        };
        Ok(Lifecycle::RecreatePending)
    }

    /// Release storage immediately and go back to `Uninitialized`.
    pub fn teardown(&mut self) -> Lifecycle {
        if !matches!(self.state, SlotState::Uninitialized) {
            debug!(what = self.what, "grid torn down");
        }
        self.state = SlotState::Uninitialized;
        Lifecycle::Uninitialized
    }

    /// The live grid. A pending recreate counts as uninitialized.
    pub fn grid(&self) -> Result<&Grid<T>, GridError> {
        match &self.state {
            SlotState::Initialized(g) => Ok(g),
            _ => Err(GridError::NotInitialized(self.what)),
        }
    }

    pub fn grid_mut(&mut self) -> Result<&mut Grid<T>, GridError> {
        match &mut self.state {
            SlotState::Initialized(g) => Ok(g),
            _ => Err(GridError::NotInitialized(self.what)),
        }
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
