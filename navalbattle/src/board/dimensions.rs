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
//! Rectangular board dimensions.
use serde::Serialize;

use crate::board::Coordinate;

/// Width and height of a board. Every coordinate referenced by a battle satisfies
/// `x < width` and `y < height`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct BoardDimensions {
    /// Width of the board. This cooresponds to the `x` [`Coordinate`].
    width: usize,
    /// Height of the board. This cooresponds to the `y` [`Coordinate`].
    height: usize,
}

impl BoardDimensions {
    /// Create new [`BoardDimensions`] with the specified width and height.
    /// Panics if `width * height` exceeds `usize::max_value()` or if `width` or `height` is 0.
    pub fn new(width: usize, height: usize) -> Self {
        match Self::try_new(width, height) {
            Some(dim) => dim,
            None if width == 0 || height == 0 => {
                panic!("BoardDimensions must be nonzero, got {}x{}", width, height)
            }
            None => panic!(
                "BoardDimensions too large: {} * {} > {}",
                width,
                height,
                usize::max_value()
            ),
        }
    }

    /// Create new [`BoardDimensions`] with the specified width and height.
    /// Returns `None` if `width * height` exceeds `usize::max_value()` or if `width` or
    /// `height` is 0.
    pub fn try_new(width: usize, height: usize) -> Option<Self> {
        if width == 0 || height == 0 {
            None
        } else {
            width.checked_mul(height).map(|_| Self { width, height })
        }
    }

    /// Get the width of these [`BoardDimensions`].
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the height of these [`BoardDimensions`].
    pub fn height(&self) -> usize {
        self.height
    }

    /// Total number of cells.
    pub fn total_size(&self) -> usize {
        self.width * self.height
    }

    /// Check if the given [`Coordinate`] is in bounds.
    #[inline]
    pub fn contains(&self, coord: &Coordinate) -> bool {
        coord.x < self.width && coord.y < self.height
    }

    /// Bounds check on signed input, for callers converting from a space where negative
    /// values can occur.
    pub fn is_valid_position(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64
    }

    /// Convert a coordinate to a linear index.
    /// Returns `None` if the coordinate is out of bounds.
    pub fn try_linearize(&self, coord: &Coordinate) -> Option<usize> {
        if self.contains(coord) {
            Some(coord.y * self.width + coord.x)
        } else {
            None
        }
    }

    /// Convert a linear index back into a [`Coordinate`]. Panics if `idx >= total_size`.
    pub fn un_linearize(&self, idx: usize) -> Coordinate {
        assert!(idx < self.total_size(), "index {} out of bounds for {:?}", idx, self);
        Coordinate::new(idx % self.width, idx / self.width)
    }

    /// Get an iterator over rows of this grid. Each row is an iterator over the
    /// coordinates of that row.
    pub fn iter_coordinates(&self) -> impl Iterator<Item = impl Iterator<Item = Coordinate>> {
        let width = self.width;
        (0..self.height).map(move |y| (0..width).map(move |x| Coordinate { x, y }))
    }

    /// Iterate the in-bounds orthogonal neighbors of `coord`, in up, down, left, right
    /// order. Empty if `coord` itself is out of bounds.
    pub fn neighbors(&self, coord: Coordinate) -> Neighbors {
        Neighbors {
            dim: *self,
            coord,
            step: if self.contains(&coord) {
                NeighborStep::Up
            } else {
                NeighborStep::End
            },
        }
    }
}

impl Default for BoardDimensions {
    /// The standard 10x10 board.
    fn default() -> Self {
        Self {
            width: 10,
            height: 10,
        }
    }
}

/// Iterator over the orthogonal neighbors of a cell.
#[derive(Debug, Clone)]
pub struct Neighbors {
    dim: BoardDimensions,
    coord: Coordinate,
    step: NeighborStep,
}

#[derive(Debug, Copy, Clone)]
enum NeighborStep {
    Up,
    Down,
    Left,
    Right,
    End,
}

impl Iterator for Neighbors {
    type Item = Coordinate;

    fn next(&mut self) -> Option<Coordinate> {
        let Coordinate { x, y } = self.coord;
        loop {
            match self.step {
                NeighborStep::Up => {
                    self.step = NeighborStep::Down;
                    if let Some(y) = y.checked_sub(1) {
                        return Some(Coordinate::new(x, y));
                    }
                }
                NeighborStep::Down => {
                    self.step = NeighborStep::Left;
                    if y + 1 < self.dim.height {
                        return Some(Coordinate::new(x, y + 1));
                    }
                }
                NeighborStep::Left => {
                    self.step = NeighborStep::Right;
                    if let Some(x) = x.checked_sub(1) {
                        return Some(Coordinate::new(x, y));
                    }
                }
                NeighborStep::Right => {
                    self.step = NeighborStep::End;
                    if x + 1 < self.dim.width {
                        return Some(Coordinate::new(x + 1, y));
                    }
                }
                NeighborStep::End => return None,
            }
        }
    }
}
