// Copyright 2020 Zachary Stewart
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Per-side occupancy grid, used for constant-time shot lookups.

use std::ops::{Index, IndexMut};

use crate::{
    board::{BoardDimensions, Coordinate},
    ships::ShipId,
};

/// A single cell in a side's grid.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct GridCell {
    /// The ID of the ship that occupies this cell, if any.
    pub ship: Option<ShipId>,

    /// Whether this cell has been shot.
    pub hit: bool,
}

/// Cells of one side's board.
#[derive(Debug, Clone)]
pub(crate) struct Grid {
    /// Dimensions of this board.
    pub(crate) dim: BoardDimensions,
    /// Cells that make up this board, row-major.
    cells: Box<[GridCell]>,
}

impl Grid {
    pub(crate) fn new(dim: BoardDimensions) -> Self {
        let cells = vec![GridCell::default(); dim.total_size()].into_boxed_slice();
        Self { dim, cells }
    }

    /// Get a reference to the cell at the given [`Coordinate`].
    pub(crate) fn get(&self, coord: &Coordinate) -> Option<&GridCell> {
        self.dim.try_linearize(coord).and_then(|i| self.cells.get(i))
    }

    /// Get a mutable reference to the cell at the given [`Coordinate`].
    pub(crate) fn get_mut(&mut self, coord: &Coordinate) -> Option<&mut GridCell> {
        self.dim
            .try_linearize(coord)
            .and_then(move |i| self.cells.get_mut(i))
    }

    /// Coordinates that have not been shot yet, in row-major order.
    pub(crate) fn untried(&self) -> impl '_ + Iterator<Item = Coordinate> {
        let dim = self.dim;
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| !cell.hit)
            .map(move |(i, _)| dim.un_linearize(i))
    }
}

impl Index<&Coordinate> for Grid {
    type Output = GridCell;

    fn index(&self, coord: &Coordinate) -> &Self::Output {
        self.get(coord).expect("coordinate out of bounds")
    }
}

impl IndexMut<&Coordinate> for Grid {
    fn index_mut(&mut self, coord: &Coordinate) -> &mut Self::Output {
        self.get_mut(coord).expect("coordinate out of bounds")
    }
}
