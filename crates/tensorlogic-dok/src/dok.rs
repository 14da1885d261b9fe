//! Dictionary-of-keys (DOK) sparse arrays.
//!
//! A [`Dok`] maps canonical coordinates to values and stores nothing else. The
//! store never holds the dtype's zero: writing zero deletes the coordinate.
//!
//! # Example
//!
//! ```rust
//! use tensorlogic_dok::{Dok, DokData, Slice};
//!
//! let mut s = Dok::from_data(vec![2, 3], DokData::new().insert((0, 1), 3.0), None).unwrap();
//! assert_eq!(s.nnz(), 1);
//!
//! // broadcast a scalar over a row slice, then delete one cell by writing zero
//! s.set((1, Slice::full()), 2.0).unwrap();
//! s.set((1, 0), 0.0).unwrap();
//! assert_eq!(s.nnz(), 3);
//!
//! let row = s.get((1, Slice::full())).unwrap().into_dok().unwrap();
//! assert_eq!(row.shape(), &[3]);
//! ```

use ndarray::{Dimension, IntoDimension};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::broadcast::{broadcast_values, check_broadcast, Value};
use crate::coords::{check_coords, shape_size, Coords};
use crate::dense::DenseArray;
use crate::dtype::{DType, Element, Scalar};
use crate::error::{DokError, DokResult};
use crate::index::{resolve, Index, IndexTerm, Region, ResolvedIndex};

/// A coordinate key in a construction mapping: a bare integer or a tuple.
///
/// Keys shorter than the array's rank address every cell sharing that prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordKey(pub Vec<IndexTerm>);

macro_rules! impl_coord_key {
    ($($t:ty),*) => {
        $(
            impl From<$t> for CoordKey {
                fn from(i: $t) -> Self {
                    CoordKey(vec![IndexTerm::from(i)])
                }
            }

            impl<const N: usize> From<[$t; N]> for CoordKey {
                fn from(c: [$t; N]) -> Self {
                    CoordKey(c.into_iter().map(IndexTerm::from).collect())
                }
            }

            impl From<Vec<$t>> for CoordKey {
                fn from(c: Vec<$t>) -> Self {
                    CoordKey(c.into_iter().map(IndexTerm::from).collect())
                }
            }

            impl From<($t, $t)> for CoordKey {
                fn from((a, b): ($t, $t)) -> Self {
                    CoordKey::from([a, b])
                }
            }

            impl From<($t, $t, $t)> for CoordKey {
                fn from((a, b, c): ($t, $t, $t)) -> Self {
                    CoordKey::from([a, b, c])
                }
            }

            impl From<($t, $t, $t, $t)> for CoordKey {
                fn from((a, b, c, d): ($t, $t, $t, $t)) -> Self {
                    CoordKey::from([a, b, c, d])
                }
            }
        )*
    };
}

impl_coord_key!(i32, i64, isize, usize);

/// The value side of a construction mapping.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryValue {
    /// One value for the addressed cell(s).
    Scalar(Scalar),
    /// A run of values over the trailing axis under a coordinate prefix.
    Seq(Vec<Scalar>),
}

impl EntryValue {
    fn dtypes(&self) -> Vec<DType> {
        match self {
            EntryValue::Scalar(s) => vec![s.dtype()],
            EntryValue::Seq(values) => values.iter().map(Scalar::dtype).collect(),
        }
    }

    fn into_value(self, dtype: DType) -> Value {
        match self {
            EntryValue::Scalar(s) => Value::Scalar(s),
            EntryValue::Seq(values) => Value::Array(DenseArray::from_vec(values, dtype)),
        }
    }
}

impl From<Scalar> for EntryValue {
    fn from(s: Scalar) -> Self {
        EntryValue::Scalar(s)
    }
}

impl<T: Element> From<T> for EntryValue {
    fn from(v: T) -> Self {
        EntryValue::Scalar(v.into_scalar())
    }
}

impl<T: Element> From<Vec<T>> for EntryValue {
    fn from(values: Vec<T>) -> Self {
        EntryValue::Seq(values.into_iter().map(Element::into_scalar).collect())
    }
}

impl From<Vec<Scalar>> for EntryValue {
    fn from(values: Vec<Scalar>) -> Self {
        EntryValue::Seq(values)
    }
}

/// An ordered coordinate→value mapping used to pre-populate a [`Dok`].
///
/// Entries are applied in insertion order, so later entries overwrite earlier ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DokData {
    entries: Vec<(CoordKey, EntryValue)>,
}

impl DokData {
    pub fn new() -> Self {
        DokData::default()
    }

    /// Add an entry (builder style).
    pub fn insert(mut self, key: impl Into<CoordKey>, value: impl Into<EntryValue>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Join of the dtypes of every supplied value.
    pub fn dtype(&self) -> Option<DType> {
        DType::join_all(self.entries.iter().flat_map(|(_, v)| v.dtypes()))
    }
}

impl<K: Into<CoordKey>, V: Into<EntryValue>> FromIterator<(K, V)> for DokData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        DokData {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Result of reading through an index: one value or a new array.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Scalar(Scalar),
    Array(Dok),
}

impl Selection {
    pub fn into_scalar(self) -> Option<Scalar> {
        match self {
            Selection::Scalar(s) => Some(s),
            Selection::Array(_) => None,
        }
    }

    pub fn into_dok(self) -> Option<Dok> {
        match self {
            Selection::Array(d) => Some(d),
            Selection::Scalar(_) => None,
        }
    }

    /// Dense view of the selection; a scalar becomes a 0-d array.
    pub fn to_dense(&self) -> DenseArray {
        match self {
            Selection::Scalar(s) => DenseArray::scalar(*s),
            Selection::Array(d) => d.todense(),
        }
    }
}

/// Dictionary-of-keys sparse array.
#[derive(Debug, Clone, PartialEq)]
pub struct Dok {
    shape: Vec<usize>,
    dtype: DType,
    data: HashMap<Coords, Scalar>,
}

impl Dok {
    /// Empty `float64` array.
    ///
    /// `shape` may be a single integer, a tuple, an array or a `Vec`.
    pub fn new<Sh: IntoDimension>(shape: Sh) -> Self {
        Dok::zeros(shape, DType::default())
    }

    /// Empty array of the given dtype.
    pub fn zeros<Sh: IntoDimension>(shape: Sh, dtype: DType) -> Self {
        Dok {
            shape: shape.into_dimension().slice().to_vec(),
            dtype,
            data: HashMap::new(),
        }
    }

    /// Build from a coordinate→value mapping.
    ///
    /// The dtype is the join of every supplied value and `dtype` (if given). Each
    /// entry is applied like an assignment through its key, so a key shorter than
    /// the rank fills (or, with a sequence value, spreads over) the trailing axes.
    pub fn from_data<Sh: IntoDimension>(
        shape: Sh,
        data: DokData,
        dtype: Option<DType>,
    ) -> DokResult<Self> {
        let shape = shape.into_dimension().slice().to_vec();
        let dtype = DType::join_all(dtype.into_iter().chain(data.dtype())).unwrap_or_default();
        debug!(
            shape = ?shape,
            dtype = %dtype,
            entries = data.len(),
            "building DOK array from coordinate map"
        );

        let mut dok = Dok::zeros(shape, dtype);
        for (key, value) in data.entries {
            let index = Index(key.0);
            let value = value.into_value(dtype);
            dok.set(index, value)?;
        }
        Ok(dok)
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

    /// Number of stored (nonzero) entries.
    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        shape_size(&self.shape)
    }

    /// Fraction of cells that are stored.
    pub fn density(&self) -> f64 {
        let total = self.size();
        if total == 0 {
            return 0.0;
        }
        self.nnz() as f64 / total as f64
    }

    /// Stored `(coordinate, value)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&Coords, &Scalar)> {
        self.data.iter()
    }

    /// Stored entries in lexicographic coordinate order.
    pub fn sorted_entries(&self) -> Vec<(Coords, Scalar)> {
        let mut entries: Vec<(Coords, Scalar)> =
            self.data.iter().map(|(c, &v)| (c.clone(), v)).collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Value at a canonical coordinate; the dtype's zero when absent.
    pub fn value_at(&self, coords: &[usize]) -> Scalar {
        self.data
            .get(coords)
            .copied()
            .unwrap_or_else(|| self.dtype.zero())
    }

    /// Write `value` (cast to the dtype) at a canonical coordinate. Zero deletes.
    pub fn set_at(&mut self, coords: &[usize], value: Scalar) -> DokResult<()> {
        check_coords(coords, &self.shape)?;
        self.store(coords.to_vec(), value.cast(self.dtype));
        Ok(())
    }

    /// Remove the entry at `coords`, returning it if present.
    pub fn delete(&mut self, coords: &[usize]) -> Option<Scalar> {
        self.data.remove(coords)
    }

    /// Insert or delete an in-bounds coordinate; `value` is already cast.
    #[inline]
    fn store(&mut self, coords: Coords, value: Scalar) {
        trace!(coords = ?coords, value = %value, "store");
        if value.is_zero() {
            self.data.remove(&coords);
        } else {
            self.data.insert(coords, value);
        }
    }

    /// Bulk insert of already validated, cast, nonzero entries.
    pub(crate) fn insert_unchecked(&mut self, coords: Coords, value: Scalar) {
        self.data.insert(coords, value);
    }

    /// Read through an index expression.
    ///
    /// An all-integer index returns [`Selection::Scalar`]; anything else returns a
    /// new, independently owned array re-indexed from zero on its kept axes.
    pub fn get(&self, index: impl Into<Index>) -> DokResult<Selection> {
        let index = index.into();
        match resolve(&index, &self.shape)? {
            ResolvedIndex::Point(coords) => Ok(Selection::Scalar(self.value_at(&coords))),
            ResolvedIndex::Region(region) => Ok(Selection::Array(self.get_region(&region))),
            ResolvedIndex::Paired(coords) => Ok(Selection::Array(self.get_paired(&coords))),
        }
    }

    fn get_region(&self, region: &Region) -> Dok {
        let shape = region.shape();
        let mut out = Dok::zeros(shape.clone(), self.dtype);
        let region_size = region.size();
        debug!(
            shape = ?shape,
            region_size,
            nnz = self.nnz(),
            "slicing DOK array"
        );

        // walk whichever side is smaller
        if region_size <= self.nnz() {
            for (out_coords, src) in region.cells() {
                if let Some(&v) = self.data.get(&src) {
                    out.insert_unchecked(out_coords, v);
                }
            }
        } else {
            let locator = region.locator();
            for (coords, &v) in &self.data {
                for out_coords in locator.locate(coords) {
                    out.insert_unchecked(out_coords, v);
                }
            }
        }
        out
    }

    fn get_paired(&self, coords: &[Coords]) -> Dok {
        let mut out = Dok::zeros(vec![coords.len()], self.dtype);
        for (k, c) in coords.iter().enumerate() {
            if let Some(&v) = self.data.get(c) {
                out.insert_unchecked(vec![k], v);
            }
        }
        out
    }

    /// Assign through an index expression.
    ///
    /// `value` is a scalar or a dense array broadcastable to the selection's shape.
    /// Zeros delete. The index and value are fully validated before the first
    /// write, so an error leaves the array unchanged.
    pub fn set(&mut self, index: impl Into<Index>, value: impl Into<Value>) -> DokResult<()> {
        let index = index.into();
        let value = value.into();
        match resolve(&index, &self.shape)? {
            ResolvedIndex::Point(coords) => {
                let v = match &value {
                    Value::Scalar(s) => *s,
                    Value::Array(a) => {
                        check_broadcast(a.shape(), &[])?;
                        a.get(&[]).ok_or_else(|| DokError::value_shape(a.shape(), &[]))?
                    }
                };
                self.store(coords, v.cast(self.dtype));
            }
            ResolvedIndex::Region(region) => {
                let values = broadcast_values(&value, &region.shape(), self.dtype)?;
                debug!(
                    region = ?region.shape(),
                    value = ?value.shape(),
                    "assigning to DOK region"
                );
                let cells: Vec<Coords> = region.cells().map(|(_, src)| src).collect();
                for (src, v) in cells.into_iter().zip(values) {
                    self.store(src, v);
                }
            }
            ResolvedIndex::Paired(coords) => {
                let values = broadcast_values(&value, &[coords.len()], self.dtype)?;
                debug!(
                    points = coords.len(),
                    value = ?value.shape(),
                    "assigning to paired DOK coordinates"
                );
                for (src, v) in coords.into_iter().zip(values) {
                    self.store(src, v);
                }
            }
        }
        Ok(())
    }
}
