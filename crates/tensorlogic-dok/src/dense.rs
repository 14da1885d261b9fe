//! Dense n-dimensional arrays tagged with their dtype.
//!
//! [`DenseArray`] wraps an `ndarray::ArrayD<T>` for each supported element type so
//! a dense value keeps its exact dtype through conversion to and from DOK.

use ndarray::{Array, Array1, ArrayD, Dimension, IxDyn};

use crate::coords::Coords;
use crate::dtype::{DType, Element, Scalar};
use crate::error::{DokError, DokResult};

/// A dense array of any supported dtype.
#[derive(Debug, Clone, PartialEq)]
pub enum DenseArray {
    Bool(ArrayD<bool>),
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    U32(ArrayD<u32>),
    U64(ArrayD<u64>),
    I8(ArrayD<i8>),
    I16(ArrayD<i16>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
}

macro_rules! dispatch {
    ($value:expr, $a:ident => $body:expr) => {
        match $value {
            DenseArray::Bool($a) => $body,
            DenseArray::U8($a) => $body,
            DenseArray::U16($a) => $body,
            DenseArray::U32($a) => $body,
            DenseArray::U64($a) => $body,
            DenseArray::I8($a) => $body,
            DenseArray::I16($a) => $body,
            DenseArray::I32($a) => $body,
            DenseArray::I64($a) => $body,
            DenseArray::F32($a) => $body,
            DenseArray::F64($a) => $body,
        }
    };
}

macro_rules! build {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype {
            DType::Bool => {
                type $t = bool;
                DenseArray::Bool($body)
            }
            DType::U8 => {
                type $t = u8;
                DenseArray::U8($body)
            }
            DType::U16 => {
                type $t = u16;
                DenseArray::U16($body)
            }
            DType::U32 => {
                type $t = u32;
                DenseArray::U32($body)
            }
            DType::U64 => {
                type $t = u64;
                DenseArray::U64($body)
            }
            DType::I8 => {
                type $t = i8;
                DenseArray::I8($body)
            }
            DType::I16 => {
                type $t = i16;
                DenseArray::I16($body)
            }
            DType::I32 => {
                type $t = i32;
                DenseArray::I32($body)
            }
            DType::I64 => {
                type $t = i64;
                DenseArray::I64($body)
            }
            DType::F32 => {
                type $t = f32;
                DenseArray::F32($body)
            }
            DType::F64 => {
                type $t = f64;
                DenseArray::F64($body)
            }
        }
    };
}

impl DenseArray {
    /// Zero-filled array.
    pub fn zeros(shape: &[usize], dtype: DType) -> Self {
        build!(dtype, T => ArrayD::from_elem(IxDyn(shape), T::from_scalar(dtype.zero())))
    }

    /// Array filled with `value` (cast to `dtype`).
    pub fn full(shape: &[usize], value: Scalar, dtype: DType) -> Self {
        build!(dtype, T => ArrayD::from_elem(IxDyn(shape), T::from_scalar(value)))
    }

    /// 0-d array holding one value, keeping its dtype.
    pub fn scalar(value: Scalar) -> Self {
        DenseArray::full(&[], value, value.dtype())
    }

    /// Build from row-major scalars, casting each to `dtype`.
    pub fn from_scalars(shape: &[usize], values: Vec<Scalar>, dtype: DType) -> DokResult<Self> {
        let expected: usize = shape.iter().product();
        if values.len() != expected {
            return Err(DokError::invalid_input(format!(
                "data length {} doesn't match shape {:?} (total: {})",
                values.len(),
                shape,
                expected
            )));
        }
        Ok(build!(dtype, T => {
            let data: Vec<T> = values.into_iter().map(T::from_scalar).collect();
            ArrayD::from_shape_vec(IxDyn(shape), data)
                .map_err(|e| DokError::invalid_input(e.to_string()))?
        }))
    }

    /// 1-d array from `values`, casting each to `dtype`.
    pub fn from_vec(values: Vec<Scalar>, dtype: DType) -> Self {
        build!(dtype, T => {
            let data: Vec<T> = values.into_iter().map(T::from_scalar).collect();
            Array1::from_vec(data).into_dyn()
        })
    }

    /// Build from a flat row-major vector of a concrete element type.
    pub fn from_shape_vec<T: Element>(shape: &[usize], data: Vec<T>) -> DokResult<Self> {
        let values = data.into_iter().map(Element::into_scalar).collect();
        DenseArray::from_scalars(shape, values, T::DTYPE)
    }

    pub fn dtype(&self) -> DType {
        match self {
            DenseArray::Bool(_) => DType::Bool,
            DenseArray::U8(_) => DType::U8,
            DenseArray::U16(_) => DType::U16,
            DenseArray::U32(_) => DType::U32,
            DenseArray::U64(_) => DType::U64,
            DenseArray::I8(_) => DType::I8,
            DenseArray::I16(_) => DType::I16,
            DenseArray::I32(_) => DType::I32,
            DenseArray::I64(_) => DType::I64,
            DenseArray::F32(_) => DType::F32,
            DenseArray::F64(_) => DType::F64,
        }
    }

    pub fn shape(&self) -> &[usize] {
        dispatch!(self, a => a.shape())
    }

    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    /// Total number of cells.
    pub fn size(&self) -> usize {
        dispatch!(self, a => a.len())
    }

    /// Value at `coords`, `None` if out of bounds.
    pub fn get(&self, coords: &[usize]) -> Option<Scalar> {
        dispatch!(self, a => a.get(IxDyn(coords)).map(|v| v.into_scalar()))
    }

    /// Write `value` (cast to this array's dtype) at `coords`.
    pub fn set(&mut self, coords: &[usize], value: Scalar) -> DokResult<()> {
        let shape = self.shape().to_vec();
        dispatch!(self, a => {
            let slot = a.get_mut(IxDyn(coords)).ok_or_else(|| {
                DokError::invalid_input(format!(
                    "coordinate {:?} is outside shape {:?}",
                    coords, shape
                ))
            })?;
            *slot = Element::from_scalar(value);
        });
        Ok(())
    }

    /// Write every `(coordinate, value)` pair that lies inside this array.
    pub(crate) fn scatter<I, C>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (C, Scalar)>,
        C: AsRef<[usize]>,
    {
        dispatch!(self, a => {
            for (coords, value) in entries {
                if let Some(slot) = a.get_mut(IxDyn(coords.as_ref())) {
                    *slot = Element::from_scalar(value);
                }
            }
        })
    }

    /// Values in row-major (logical) order.
    pub fn iter(&self) -> Box<dyn Iterator<Item = Scalar> + '_> {
        dispatch!(self, a => Box::new(a.iter().map(|v| v.into_scalar())))
    }

    /// `(coordinate, value)` pairs in row-major order.
    pub fn indexed_iter(&self) -> Box<dyn Iterator<Item = (Coords, Scalar)> + '_> {
        dispatch!(self, a => Box::new(
            a.indexed_iter()
                .map(|(ix, v)| (ix.slice().to_vec(), v.into_scalar()))
        ))
    }

    /// Copy as a concrete element type, casting as needed.
    pub fn to_array<T: Element>(&self) -> ArrayD<T> {
        dispatch!(self, a => a.mapv(|v| T::from_scalar(v.into_scalar())))
    }

    /// Copy as `f64`, for comparisons.
    pub fn to_f64(&self) -> ArrayD<f64> {
        self.to_array::<f64>()
    }
}

macro_rules! impl_from_array {
    ($t:ty, $variant:ident) => {
        impl<D: Dimension> From<Array<$t, D>> for DenseArray {
            fn from(array: Array<$t, D>) -> Self {
                DenseArray::$variant(array.into_dyn())
            }
        }
    };
}

impl_from_array!(bool, Bool);
impl_from_array!(u8, U8);
impl_from_array!(u16, U16);
impl_from_array!(u32, U32);
impl_from_array!(u64, U64);
impl_from_array!(i8, I8);
impl_from_array!(i16, I16);
impl_from_array!(i32, I32);
impl_from_array!(i64, I64);
impl_from_array!(f32, F32);
impl_from_array!(f64, F64);

impl From<Scalar> for DenseArray {
    fn from(value: Scalar) -> Self {
        DenseArray::scalar(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_zeros_keeps_dtype() {
        let z = DenseArray::zeros(&[2, 3], DType::U8);
        assert_eq!(z.dtype(), DType::U8);
        assert_eq!(z.shape(), &[2, 3]);
        assert!(z.iter().all(|v| v.is_zero()));
    }

    #[test]
    fn test_from_ndarray() {
        let d = DenseArray::from(arr2(&[[1.0f32, 0.0], [0.0, 2.5]]));
        assert_eq!(d.dtype(), DType::F32);
        assert_eq!(d.get(&[1, 1]), Some(Scalar::F32(2.5)));
        assert_eq!(d.get(&[2, 0]), None);
    }

    #[test]
    fn test_from_scalars_casts() {
        let d = DenseArray::from_scalars(
            &[3],
            vec![Scalar::F64(1.9), Scalar::U8(2), Scalar::Bool(true)],
            DType::I32,
        )
        .unwrap();
        assert_eq!(d, DenseArray::from(arr1(&[1i32, 2, 1])));
    }

    #[test]
    fn test_from_scalars_length_mismatch() {
        let err = DenseArray::from_scalars(&[2, 2], vec![Scalar::F64(1.0)], DType::F64);
        assert!(err.is_err());
    }

    #[test]
    fn test_set_and_indexed_iter() {
        let mut d = DenseArray::zeros(&[2, 2], DType::I64);
        d.set(&[0, 1], Scalar::F64(7.0)).unwrap();
        assert!(d.set(&[2, 1], Scalar::I64(1)).is_err());
        let nonzero: Vec<_> = d.indexed_iter().filter(|(_, v)| !v.is_zero()).collect();
        assert_eq!(nonzero, vec![(vec![0, 1], Scalar::I64(7))]);
    }

    #[test]
    fn test_scatter_casts_and_skips_outside() {
        let mut d = DenseArray::zeros(&[2, 3], DType::U8);
        d.scatter(vec![
            (vec![0, 2], Scalar::F64(4.0)),
            (vec![1, 0], Scalar::I64(9)),
            (vec![2, 0], Scalar::U8(1)),
            (vec![0], Scalar::U8(1)),
        ]);
        assert_eq!(d.get(&[0, 2]), Some(Scalar::U8(4)));
        assert_eq!(d.get(&[1, 0]), Some(Scalar::U8(9)));
        assert_eq!(d.iter().filter(|v| !v.is_zero()).count(), 2);
    }

    #[test]
    fn test_scalar_array() {
        let s = DenseArray::scalar(Scalar::U16(4));
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.get(&[]), Some(Scalar::U16(4)));
    }
}
