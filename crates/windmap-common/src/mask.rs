//! Per-cell region membership over a grid.

/// Boolean `height x width` membership mask, row-major (lat-major).
///
/// Built once from the boundary geometry and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionMask {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl RegionMask {
    /// Build a mask by evaluating `inside(row, col)` for every cell.
    pub fn from_fn<F>(width: usize, height: usize, inside: F) -> Self
    where
        F: Fn(usize, usize) -> bool,
    {
        let mut cells = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                cells.push(inside(row, col));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Membership of the cell at `(row, col)`; out-of-range cells are outside.
    pub fn is_inside(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.cells[row * self.width + col]
    }

    /// Number of cells inside the region.
    pub fn inside_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// True when no cell is inside the region.
    pub fn is_empty(&self) -> bool {
        !self.cells.iter().any(|&c| c)
    }

    /// Row-major cell slice.
    pub fn as_slice(&self) -> &[bool] {
        &self.cells
    }
}
