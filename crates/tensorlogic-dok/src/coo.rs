//! Coordinate-list (COO) sparse arrays.
//!
//! A [`CooArray`] stores parallel coordinate and value arrays: column `k` of
//! `coords` (shape `ndim x nnz`) is the coordinate of `data[k]`. Unlisted cells hold
//! the fill value, which is zero unless the array was built with [`CooArray::full`]
//! or [`CooArray::with_fill_value`].
//!
//! # Example
//!
//! ```rust
//! use ndarray::arr2;
//! use tensorlogic_dok::{CooArray, DType, Scalar};
//!
//! let coo = CooArray::from_parts(
//!     vec![3, 3],
//!     arr2(&[[0, 1, 2], [0, 1, 2]]),
//!     vec![Scalar::F64(1.0); 3],
//!     None,
//! )
//! .unwrap();
//! assert_eq!(coo.nnz(), 3);
//! assert_eq!(coo.dtype(), DType::F64);
//! ```

use ndarray::{Array2, Axis};
use std::collections::HashSet;

use crate::coords::{check_coords, shape_size, Coords};
use crate::dense::DenseArray;
use crate::dtype::{DType, Scalar};
use crate::error::{DokError, DokResult};

/// Coordinate (COO) sparse array.
#[derive(Debug, Clone, PartialEq)]
pub struct CooArray {
    shape: Vec<usize>,
    /// `ndim x nnz`; column `k` is the coordinate of `data[k]`
    coords: Array2<usize>,
    data: Vec<Scalar>,
    dtype: DType,
    fill_value: Scalar,
    /// Whether the coordinates are in lexicographic order
    sorted: bool,
}

impl CooArray {
    /// Create an empty COO array.
    pub fn new(shape: Vec<usize>, dtype: DType) -> Self {
        let ndim = shape.len();
        CooArray {
            shape,
            coords: Array2::zeros((ndim, 0)),
            data: Vec::new(),
            dtype,
            fill_value: dtype.zero(),
            sorted: true,
        }
    }

    /// Build from parallel coordinate/value arrays.
    ///
    /// The dtype is `dtype` if given, otherwise the join of the value dtypes
    /// (`float64` when there are no values). Coordinates must be in bounds and unique.
    pub fn from_parts(
        shape: Vec<usize>,
        coords: Array2<usize>,
        data: Vec<Scalar>,
        dtype: Option<DType>,
    ) -> DokResult<Self> {
        if coords.nrows() != shape.len() {
            return Err(DokError::invalid_input(format!(
                "coords has {} rows but the array has {} axes",
                coords.nrows(),
                shape.len()
            )));
        }
        if coords.ncols() != data.len() {
            return Err(DokError::invalid_input(format!(
                "coords has {} columns but there are {} values",
                coords.ncols(),
                data.len()
            )));
        }

        let mut seen = HashSet::with_capacity(data.len());
        for column in coords.axis_iter(Axis(1)) {
            let c: Coords = column.to_vec();
            check_coords(&c, &shape)?;
            if !seen.insert(c) {
                return Err(DokError::invalid_input(format!(
                    "duplicate coordinate {:?}",
                    column.to_vec()
                )));
            }
        }

        let dtype = dtype
            .or_else(|| DType::join_all(data.iter().map(Scalar::dtype)))
            .unwrap_or_default();
        let data = data.into_iter().map(|v| v.cast(dtype)).collect();
        Ok(CooArray {
            shape,
            coords,
            data,
            dtype,
            fill_value: dtype.zero(),
            sorted: false,
        })
    }

    /// Create from a dense array, keeping every nonzero cell.
    pub fn from_dense(dense: &DenseArray) -> Self {
        let mut columns = Vec::new();
        let mut data = Vec::new();
        for (coords, value) in dense.indexed_iter() {
            if !value.is_zero() {
                columns.push(coords);
                data.push(value);
            }
        }
        CooArray::from_sorted_entries(dense.shape().to_vec(), dense.dtype(), columns, data)
    }

    /// An array with no stored entries whose every cell reads as `fill_value`.
    pub fn full(shape: Vec<usize>, fill_value: Scalar) -> Self {
        let mut coo = CooArray::new(shape, fill_value.dtype());
        coo.fill_value = fill_value;
        coo
    }

    /// Replace the fill value (cast to this array's dtype).
    pub fn with_fill_value(mut self, fill_value: Scalar) -> Self {
        self.fill_value = fill_value.cast(self.dtype);
        self
    }

    /// Entries already known to be unique and in bounds.
    pub(crate) fn from_sorted_entries(
        shape: Vec<usize>,
        dtype: DType,
        columns: Vec<Coords>,
        data: Vec<Scalar>,
    ) -> Self {
        let ndim = shape.len();
        let nnz = columns.len();
        let coords = Array2::from_shape_fn((ndim, nnz), |(axis, k)| columns[k][axis]);
        CooArray {
            shape,
            coords,
            data,
            dtype,
            fill_value: dtype.zero(),
            sorted: true,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn dtype(&self) -> DType {
        self.dtype
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Total number of elements.
    pub fn size(&self) -> usize {
        shape_size(&self.shape)
    }

    pub fn fill_value(&self) -> Scalar {
        self.fill_value
    }

    /// Coordinate matrix, `ndim x nnz`.
    pub fn coords(&self) -> &Array2<usize> {
        &self.coords
    }

    pub fn data(&self) -> &[Scalar] {
        &self.data
    }

    pub fn is_sorted(&self) -> bool {
        self.sorted
    }

    /// `(coordinate, value)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (Coords, Scalar)> + '_ {
        self.coords
            .axis_iter(Axis(1))
            .zip(self.data.iter())
            .map(|(column, &value)| (column.to_vec(), value))
    }

    /// Sort entries lexicographically by coordinate.
    pub fn sort_indices(&mut self) {
        if self.sorted {
            return;
        }
        let mut entries: Vec<(Coords, Scalar)> = self.iter().collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        let (columns, data): (Vec<Coords>, Vec<Scalar>) = entries.into_iter().unzip();
        let mut sorted =
            CooArray::from_sorted_entries(self.shape.clone(), self.dtype, columns, data);
        sorted.fill_value = self.fill_value;
        *self = sorted;
    }

    /// Convert to a dense array: the fill value everywhere, then every entry.
    pub fn todense(&self) -> DenseArray {
        let mut dense = DenseArray::full(&self.shape, self.fill_value, self.dtype);
        dense.scatter(self.iter());
        dense
    }
}
