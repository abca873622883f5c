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
//! Conversion between board cells and the continuous world plane used by renderers.
//!
//! The board is centered on the world origin: cell `(0, 0)` sits at the most negative
//! corner and neighboring cells are `cell_spacing` apart along each axis.

use crate::{
    board::{BoardDimensions, Coordinate},
    config::ConfigError,
};

/// Distance between adjacent cell centers when no spacing is given.
pub const DEFAULT_CELL_SPACING: f64 = 1.0;

/// Maps between grid coordinates and world positions for one board.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GridMapping {
    dim: BoardDimensions,
    cell_spacing: f64,
}

impl GridMapping {
    /// Create a mapping for `dim` with the given spacing. Fails if the spacing is not a
    /// positive finite number.
    pub fn new(dim: BoardDimensions, cell_spacing: f64) -> Result<Self, ConfigError> {
        if cell_spacing.is_finite() && cell_spacing > 0.0 {
            Ok(Self { dim, cell_spacing })
        } else {
            Err(ConfigError::InvalidCellSpacing(cell_spacing))
        }
    }

    /// Create a mapping using [`DEFAULT_CELL_SPACING`].
    pub fn with_default_spacing(dim: BoardDimensions) -> Self {
        Self {
            dim,
            cell_spacing: DEFAULT_CELL_SPACING,
        }
    }

    pub fn dimensions(&self) -> &BoardDimensions {
        &self.dim
    }

    pub fn cell_spacing(&self) -> f64 {
        self.cell_spacing
    }

    /// World position of the center of `coord`.
    pub fn grid_to_world(&self, coord: Coordinate) -> (f64, f64) {
        let (cx, cy) = self.center_offsets();
        (
            (coord.x as f64 - cx) * self.cell_spacing,
            (coord.y as f64 - cy) * self.cell_spacing,
        )
    }

    /// Cell whose center is nearest to the world position, or `None` if that cell is off
    /// the board.
    pub fn world_to_grid(&self, world_x: f64, world_y: f64) -> Option<Coordinate> {
        let (cx, cy) = self.center_offsets();
        let gx = (world_x / self.cell_spacing + cx).round();
        let gy = (world_y / self.cell_spacing + cy).round();
        if !gx.is_finite() || !gy.is_finite() {
            return None;
        }
        let (gx, gy) = (gx as i64, gy as i64);
        if self.is_valid_grid_position(gx, gy) {
            Some(Coordinate::new(gx as usize, gy as usize))
        } else {
            None
        }
    }

    /// Pure bounds check for signed grid positions.
    pub fn is_valid_grid_position(&self, x: i64, y: i64) -> bool {
        self.dim.is_valid_position(x, y)
    }

    fn center_offsets(&self) -> (f64, f64) {
        (
            (self.dim.width() as f64 - 1.0) / 2.0,
            (self.dim.height() as f64 - 1.0) / 2.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;

    #[test]
    fn board_is_centered() {
        let mapping = GridMapping::with_default_spacing(BoardDimensions::new(3, 5));
        assert_eq!(mapping.grid_to_world(Coordinate::new(1, 2)), (0.0, 0.0));
        assert_eq!(mapping.grid_to_world(Coordinate::new(0, 0)), (-1.0, -2.0));
    }

    #[test]
    fn nearby_points_snap_to_cell() {
        let mapping = GridMapping::new(BoardDimensions::new(10, 10), 2.0).unwrap();
        let (wx, wy) = mapping.grid_to_world(Coordinate::new(4, 7));
        assert_eq!(
            mapping.world_to_grid(wx + 0.6, wy - 0.9),
            Some(Coordinate::new(4, 7))
        );
    }

    #[test]
    fn off_board_points_map_to_none() {
        let mapping = GridMapping::with_default_spacing(BoardDimensions::new(4, 4));
        assert_eq!(mapping.world_to_grid(-10.0, 0.0), None);
        assert_eq!(mapping.world_to_grid(0.0, 10.0), None);
        assert_eq!(mapping.world_to_grid(f64::NAN, 0.0), None);
    }

    #[test]
    fn bad_spacing_rejected() {
        let dim = BoardDimensions::default();
        assert!(GridMapping::new(dim, 0.0).is_err());
        assert!(GridMapping::new(dim, -1.0).is_err());
        assert!(GridMapping::new(dim, f64::INFINITY).is_err());
    }

    proptest! {
        #[test]
        fn round_trip(
            width in 1usize..40,
            height in 1usize..40,
            spacing in 0.01f64..25.0,
            fx in 0.0f64..1.0,
            fy in 0.0f64..1.0,
        ) {
            let dim = BoardDimensions::new(width, height);
            let mapping = GridMapping::new(dim, spacing).unwrap();
            let coord = Coordinate::new(
                ((width as f64 * fx) as usize).min(width - 1),
                ((height as f64 * fy) as usize).min(height - 1),
            );
            let (wx, wy) = mapping.grid_to_world(coord);
            prop_assert_eq!(mapping.world_to_grid(wx, wy), Some(coord));
        }
    }
}
