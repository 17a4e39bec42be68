//! Per-step field preprocessing: magnitude derivation and region masking.
//!
//! # Missing values
//!
//! A [`MaskedField`] carries an explicit validity bitmap. A cell is valid
//! when it lies inside the [`RegionMask`] and both of its components are
//! finite in the source data. Invalid cells hold [`MISSING`] in all three
//! raw buffers, but the bitmap is authoritative: the accessors return
//! `None` for invalid cells and renderers must never trace through them.

use crate::{RegionMask, WindDataset, WindmapError, WindmapResult};

/// Placeholder stored in the raw buffers for invalid cells.
pub const MISSING: f32 = f32::NAN;

/// u, v and magnitude for one time step with out-of-region cells masked.
#[derive(Debug, Clone)]
pub struct MaskedField {
    width: usize,
    height: usize,
    u: Vec<f32>,
    v: Vec<f32>,
    magnitude: Vec<f32>,
    valid: Vec<bool>,
}

impl MaskedField {
    /// Mask one step of components.
    ///
    /// `u` and `v` must be `mask.height() x mask.width()`, row-major.
    pub fn from_components(u: &[f32], v: &[f32], mask: &RegionMask) -> WindmapResult<Self> {
        let width = mask.width();
        let height = mask.height();
        let len = width * height;

        if u.len() != len || v.len() != len {
            return Err(WindmapError::GridMismatch(format!(
                "component slices ({}, {}) do not match mask {}x{}",
                u.len(),
                v.len(),
                height,
                width
            )));
        }

        let mut field = Self {
            width,
            height,
            u: vec![MISSING; len],
            v: vec![MISSING; len],
            magnitude: vec![MISSING; len],
            valid: vec![false; len],
        };

        for (idx, &inside) in mask.as_slice().iter().enumerate() {
            let (cu, cv) = (u[idx], v[idx]);
            if inside && cu.is_finite() && cv.is_finite() {
                field.u[idx] = cu;
                field.v[idx] = cv;
                field.magnitude[idx] = (cu * cu + cv * cv).sqrt();
                field.valid[idx] = true;
            }
        }

        Ok(field)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.height && col < self.width {
            let idx = row * self.width + col;
            self.valid[idx].then_some(idx)
        } else {
            None
        }
    }

    /// Whether `(row, col)` holds data.
    pub fn is_valid(&self, row: usize, col: usize) -> bool {
        self.index(row, col).is_some()
    }

    pub fn u(&self, row: usize, col: usize) -> Option<f32> {
        self.index(row, col).map(|i| self.u[i])
    }

    pub fn v(&self, row: usize, col: usize) -> Option<f32> {
        self.index(row, col).map(|i| self.v[i])
    }

    pub fn magnitude(&self, row: usize, col: usize) -> Option<f32> {
        self.index(row, col).map(|i| self.magnitude[i])
    }

    /// Raw buffers; invalid cells hold [`MISSING`].
    pub fn raw_u(&self) -> &[f32] {
        &self.u
    }

    pub fn raw_v(&self) -> &[f32] {
        &self.v
    }

    pub fn raw_magnitude(&self) -> &[f32] {
        &self.magnitude
    }

    /// Validity bitmap, row-major.
    pub fn validity(&self) -> &[bool] {
        &self.valid
    }

    /// Number of cells carrying data.
    pub fn valid_count(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }

    /// True when every cell is missing.
    pub fn is_all_missing(&self) -> bool {
        !self.valid.iter().any(|&v| v)
    }
}

/// Slice the dataset at `time_index`, derive magnitude and apply the mask.
///
/// Pure in `(time_index, dataset, mask)`, so steps can be computed in any
/// order or in parallel.
pub fn preprocess(
    time_index: usize,
    dataset: &WindDataset,
    mask: &RegionMask,
) -> WindmapResult<MaskedField> {
    if mask.width() != dataset.grid.width() || mask.height() != dataset.grid.height() {
        return Err(WindmapError::GridMismatch(format!(
            "mask is {}x{} but grid is {}x{}",
            mask.height(),
            mask.width(),
            dataset.grid.height(),
            dataset.grid.width()
        )));
    }

    let (u, v) = dataset.step(time_index).ok_or_else(|| {
        WindmapError::GridMismatch(format!(
            "time index {} out of range for {} steps",
            time_index,
            dataset.grid.time_len()
        ))
    })?;

    MaskedField::from_components(u, v, mask)
}
