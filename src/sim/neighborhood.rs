//! Reads the 3x3 neighborhood around a coordinate from the read buffer.
//!
//! The transition rule always checks its two diagonals in a fixed order, so
//! left untreated it would favor one horizontal direction over many steps.
//! To cancel that, the x component of every offset is multiplied by the frame
//! parity's mirror factor before wrapping: even frames sample left-priority,
//! odd frames right-priority, and the bias cancels in expectation while each
//! single step stays branch-free.

use itertools::iproduct;

use crate::sim::cell::Cell;
use crate::sim::grid::Grid;
use crate::util::clock::FrameParity;
use crate::util::vectors::{OffsetVector, XyVector};

/// The nine decoded cells around one coordinate, mirroring already applied.
/// Indexed row-major from the bottom-left of the (possibly mirrored) patch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighborhood {
    cells: [Cell; 9],
}

impl Neighborhood {
    /// Builds a neighborhood directly from nine cells.
    /// Rows run bottom to top, cells within a row run first-side to
    /// second-side; the center sits at index 4.
    pub fn new(cells: [Cell; 9]) -> Self {
        Self { cells }
    }

    /// Samples the neighborhood of `center` from `grid`, wrapping at the
    /// edges and mirroring the x offsets per the frame parity.
    pub fn sample(grid: &Grid<Cell>, center: XyVector, parity: FrameParity) -> Self {
        let mirror = parity.mirror_factor();
        let mut cells = [Cell::default(); 9];
        for (j, i) in iproduct!(0..3usize, 0..3usize) {
            let offset = OffsetVector {
                x: (i as isize - 1) * mirror,
                y: j as isize - 1,
            };
            let (x, y) = center.offset(offset);
            cells[j * 3 + i] = *grid.get_wrapped(x, y);
        }
        Self { cells }
    }
}

/* ======================================
 * Directional accessors
 * Named from the perspective of the center cell; "first" is the current
 * priority side above, and the opposite side below.
 * ====================================== */
impl Neighborhood {
    /// The cell being updated
    pub fn center(&self) -> Cell {
        self.cells[4]
    }
    /// Directly above
    pub fn up(&self) -> Cell {
        self.cells[7]
    }
    /// The upper diagonal on the priority side
    pub fn first_diagonal_up(&self) -> Cell {
        self.cells[6]
    }
    /// Beside the center, under the first upper diagonal
    pub fn first_side_up(&self) -> Cell {
        self.cells[3]
    }
    /// The upper diagonal on the opposite side
    pub fn second_diagonal_up(&self) -> Cell {
        self.cells[8]
    }
    /// Beside the center, under the second upper diagonal
    pub fn second_side_up(&self) -> Cell {
        self.cells[5]
    }
    /// Directly below
    pub fn down(&self) -> Cell {
        self.cells[1]
    }
    /// The lower diagonal checked first when sliding
    pub fn first_diagonal_down(&self) -> Cell {
        self.cells[2]
    }
    /// Beside the center, over the first lower diagonal
    pub fn first_side_down(&self) -> Cell {
        self.cells[5]
    }
    /// The lower diagonal checked second when sliding
    pub fn second_diagonal_down(&self) -> Cell {
        self.cells[0]
    }
    /// Beside the center, over the second lower diagonal
    pub fn second_side_down(&self) -> Cell {
        self.cells[3]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::cell::{Luminance, TimeToLive};
    use strum::IntoEnumIterator;

    /// A grid where every cell is uniquely identifiable by its luminance
    fn tagged_grid(width: usize, height: usize) -> Grid<Cell> {
        let mut grid = Grid::new_fill(width, height, Cell::air());
        for x in 0..width {
            for y in 0..height {
                let tag = (x * height + y) as f32 / (width * height) as f32;
                grid.set(
                    XyVector::new(x, y),
                    Cell::sand(Luminance(tag), TimeToLive(1.0)),
                );
            }
        }
        grid
    }

    #[test]
    fn test_unmirrored_orientation() {
        let grid = tagged_grid(3, 3);
        let n = Neighborhood::sample(&grid, XyVector::new(1, 1), FrameParity::Even);

        assert_eq!(n.center(), *grid.get(XyVector::new(1, 1)));
        assert_eq!(n.up(), *grid.get(XyVector::new(1, 2)));
        assert_eq!(n.down(), *grid.get(XyVector::new(1, 0)));
        // Left-priority: the "first" column is the left one
        assert_eq!(n.first_diagonal_up(), *grid.get(XyVector::new(0, 2)));
        assert_eq!(n.first_side_up(), *grid.get(XyVector::new(0, 1)));
        assert_eq!(n.second_diagonal_up(), *grid.get(XyVector::new(2, 2)));
        assert_eq!(n.second_side_up(), *grid.get(XyVector::new(2, 1)));
        // Below, "first" is the opposite (right) side
        assert_eq!(n.first_diagonal_down(), *grid.get(XyVector::new(2, 0)));
        assert_eq!(n.first_side_down(), *grid.get(XyVector::new(2, 1)));
        assert_eq!(n.second_diagonal_down(), *grid.get(XyVector::new(0, 0)));
        assert_eq!(n.second_side_down(), *grid.get(XyVector::new(0, 1)));
    }

    #[test]
    fn test_mirrored_swaps_sides() {
        let grid = tagged_grid(3, 3);
        let even = Neighborhood::sample(&grid, XyVector::new(1, 1), FrameParity::Even);
        let odd = Neighborhood::sample(&grid, XyVector::new(1, 1), FrameParity::Odd);

        // The vertical column is parity independent
        assert_eq!(odd.up(), even.up());
        assert_eq!(odd.down(), even.down());
        assert_eq!(odd.center(), even.center());
        // The horizontal sides trade places
        assert_eq!(odd.first_side_up(), even.second_side_up());
        assert_eq!(odd.first_diagonal_up(), even.second_diagonal_up());
        assert_eq!(odd.first_diagonal_down(), even.second_diagonal_down());
    }

    /// Sampling at an edge of the torus must match sampling the equivalent
    /// interior coordinate of the same grid tiled out, for both parities.
    #[test]
    fn test_wrap_matches_infinite_tiling() {
        let small = tagged_grid(3, 3);

        // 9x9 grid made of 3x3 tiles of the small grid
        let mut tiled = Grid::new_fill(9, 9, Cell::air());
        for x in 0..9 {
            for y in 0..9 {
                tiled.set(XyVector::new(x, y), *small.get(XyVector::new(x % 3, y % 3)));
            }
        }

        for parity in FrameParity::iter() {
            for (x, y) in [(0usize, 0usize), (2, 0), (0, 2), (2, 2), (1, 0), (0, 1)] {
                let at_edge = Neighborhood::sample(&small, XyVector::new(x, y), parity);
                let interior =
                    Neighborhood::sample(&tiled, XyVector::new(x + 3, y + 3), parity);
                assert_eq!(at_edge, interior, "at ({}, {}) parity {:?}", x, y, parity);
            }
        }
    }
}
