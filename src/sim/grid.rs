//! A simple 2d grid type backed by the ndarray crate.
//! ndarray gives us the parallel Zip used by the step driver, so the wrapper
//! only adds the toroidal addressing the simulation needs: every coordinate
//! is taken modulo the grid dimensions, there is no out-of-bounds.
#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use crate::util::functions::modulo;
use crate::util::vectors::XyVector;

/// A fixed-size 2d grid addressed by wrapping coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T>(ndarray::Array2<T>);

/* =================
 * Initialization
 * ================= */
impl<T> Grid<T> {
    /// Create a new grid filled with one value
    pub fn new_fill(width: usize, height: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self(ndarray::Array2::from_elem((width, height), value))
    }
    /// Create a new grid with the given width and height, and fill it with the given data
    pub fn new_from_vec(width: usize, height: usize, data: Vec<T>) -> Self {
        Self(ndarray::Array2::from_shape_vec((width, height), data).unwrap())
    }
}

/* ======================================
 * Simple Getters
 * Access basic attributes of the struct
 * ====================================== */
impl<T> Grid<T> {
    /// Get the width of the grid
    pub fn get_width(&self) -> usize {
        self.0.shape()[0]
    }
    /// Get the height of the grid
    pub fn get_height(&self) -> usize {
        self.0.shape()[1]
    }
    /// Get the total size of the grid
    pub fn total_size(&self) -> usize {
        self.0.len()
    }
    /// Get the data as a slice, ordered the same way `new_from_vec` takes it
    pub fn get_data_slice(&self) -> &[T] {
        self.0.as_slice().unwrap()
    }
    /// Get the data as an ndarray
    pub fn get_data(&self) -> &ndarray::Array2<T> {
        &self.0
    }
    /// Get the data as a mutable ndarray, for the step driver's parallel pass
    pub fn get_data_mut(&mut self) -> &mut ndarray::Array2<T> {
        &mut self.0
    }
}

/* ======================================
 * Position Based Getters
 * Access data at a position
 * ====================================== */
impl<T> Grid<T> {
    /// Gets the value at the given in-bounds coordinate
    pub fn get(&self, idx: XyVector) -> &T {
        &self.0[[idx.x, idx.y]]
    }
    /// Gets the value at the given in-bounds coordinate, mutably
    pub fn get_mut(&mut self, idx: XyVector) -> &mut T {
        &mut self.0[[idx.x, idx.y]]
    }
    /// Sets the value at the given in-bounds coordinate, overwriting the old value
    pub fn set(&mut self, idx: XyVector, value: T) {
        self.0[[idx.x, idx.y]] = value;
    }
    /// Gets the value at any signed coordinate, wrapping toroidally first.
    /// This never fails; the grid tiles infinitely in both axes.
    pub fn get_wrapped(&self, x: isize, y: isize) -> &T {
        let idx = self.wrap(x, y);
        self.get(idx)
    }
    /// Sets the value at any signed coordinate, wrapping toroidally first
    pub fn set_wrapped(&mut self, x: isize, y: isize, value: T) {
        let idx = self.wrap(x, y);
        self.set(idx, value);
    }
    /// Folds a signed coordinate pair onto the torus
    fn wrap(&self, x: isize, y: isize) -> XyVector {
        XyVector {
            x: modulo(x, self.get_width()),
            y: modulo(y, self.get_height()),
        }
    }
}

/// Iteration
impl<T> Grid<T> {
    /// Get an iterator over the grid
    pub fn iter(&self) -> std::slice::Iter<T> {
        self.0.as_slice().unwrap().iter()
    }

    /// Get a mutable iterator over the grid
    pub fn iter_mut(&mut self) -> std::slice::IterMut<T> {
        self.0.as_slice_mut().unwrap().iter_mut()
    }
}

impl<'a, T> IntoIterator for &'a Grid<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Grid<T> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
