//! Arena layout: the grid of walls and open cells the player walks through.
//!
//! The grid is centred on the world origin. Column `c` of a `width`-wide maze
//! maps to `x = (c - width/2 + 0.5) * cell_size`, row `r` to
//! `z = (r - depth/2 + 0.5) * cell_size`, so every open cell's centre is a
//! valid standing point.

use crate::constants::PLAYER_START_CELL;
use crate::error::{GameError, GameResult};
use bevy::prelude::*;

const WALL: char = '#';
const OPEN: char = '.';

/// A (row, column) position in the maze grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridCell {
    pub row: usize,
    pub col: usize,
}

impl GridCell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// Parsed arena, shared read-only by movement, spawning and drawing.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct MazeLayout {
    width: usize,
    depth: usize,
    /// Row-major; `true` marks an open cell.
    open: Vec<bool>,
    /// Open cells in row-major order, precomputed for spawn sampling.
    open_cells: Vec<GridCell>,
    cell_size: f32,
    eye_height: f32,
    spawn_height: f32,
}

impl MazeLayout {
    /// Parse rows of `#` (wall) and `.` (open).
    ///
    /// All rows must have the same width. An empty row list yields an arena
    /// with no open cells.
    pub fn parse<S: AsRef<str>>(
        rows: &[S],
        cell_size: f32,
        eye_height: f32,
        spawn_height: f32,
    ) -> GameResult<Self> {
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count());
        let mut open = Vec::with_capacity(width * rows.len());

        for (row_idx, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let row_width = row.chars().count();
            if row_width != width {
                return Err(GameError::MalformedMaze {
                    row: row_idx,
                    reason: format!("width {} differs from first row width {}", row_width, width),
                });
            }
            for ch in row.chars() {
                match ch {
                    WALL => open.push(false),
                    OPEN => open.push(true),
                    other => {
                        return Err(GameError::MalformedMaze {
                            row: row_idx,
                            reason: format!("unexpected character '{}'", other),
                        })
                    }
                }
            }
        }

        let open_cells = open
            .iter()
            .enumerate()
            .filter(|&(_, &is_open)| is_open)
            .map(|(i, _)| GridCell::new(i / width, i % width))
            .collect();

        Ok(Self {
            width,
            depth: rows.len(),
            open,
            open_cells,
            cell_size,
            eye_height,
            spawn_height,
        })
    }

    /// An arena with no cells at all; nothing can spawn in it.
    pub fn empty(cell_size: f32, eye_height: f32, spawn_height: f32) -> Self {
        Self {
            width: 0,
            depth: 0,
            open: Vec::new(),
            open_cells: Vec::new(),
            cell_size,
            eye_height,
            spawn_height,
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Every open cell, in row-major order.
    #[inline]
    pub fn open_cells(&self) -> &[GridCell] {
        &self.open_cells
    }

    pub fn is_open(&self, cell: GridCell) -> bool {
        cell.row < self.depth && cell.col < self.width && self.open[cell.row * self.width + cell.col]
    }

    /// World-space centre of `cell` at the given height.
    pub fn cell_center(&self, cell: GridCell, height: f32) -> Vec3 {
        let x = (cell.col as f32 - self.width as f32 / 2.0 + 0.5) * self.cell_size;
        let z = (cell.row as f32 - self.depth as f32 / 2.0 + 0.5) * self.cell_size;
        Vec3::new(x, height, z)
    }

    /// Where an enemy spawned in `cell` stands.
    #[inline]
    pub fn spawn_point(&self, cell: GridCell) -> Vec3 {
        self.cell_center(cell, self.spawn_height)
    }

    /// Grid cell containing the world position, ignoring height.
    pub fn world_to_cell(&self, pos: Vec3) -> Option<GridCell> {
        let col = (pos.x / self.cell_size + self.width as f32 / 2.0).floor();
        let row = (pos.z / self.cell_size + self.depth as f32 / 2.0).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let cell = GridCell::new(row as usize, col as usize);
        (cell.row < self.depth && cell.col < self.width).then_some(cell)
    }

    /// `true` when the position lies inside an open cell.
    pub fn is_open_at(&self, pos: Vec3) -> bool {
        self.world_to_cell(pos).is_some_and(|cell| self.is_open(cell))
    }

    /// Viewpoint position at the start of every run.
    ///
    /// Uses [`PLAYER_START_CELL`] when it is open, otherwise the first open
    /// cell, otherwise the origin.
    pub fn player_start(&self) -> Vec3 {
        let (row, col) = PLAYER_START_CELL;
        let preferred = GridCell::new(row, col);
        let cell = if self.is_open(preferred) {
            Some(preferred)
        } else {
            self.open_cells.first().copied()
        };
        match cell {
            Some(cell) => self.cell_center(cell, self.eye_height),
            None => Vec3::new(0.0, self.eye_height, 0.0),
        }
    }

    /// World-space centres of every wall cell, for debug drawing.
    pub fn wall_centers(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.open
            .iter()
            .enumerate()
            .filter(|&(_, &is_open)| !is_open)
            .map(move |(i, _)| {
                self.cell_center(GridCell::new(i / self.width, i % self.width), self.cell_size / 2.0)
            })
    }
}
