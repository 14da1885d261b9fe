//! Assignment values and the shape-alignment rule shared by every setter path.
//!
//! A value broadcasts to a target shape when it has at most as many axes as the
//! target and, aligning trailing axes, every value axis either equals the target
//! axis or is 1. This is `broadcast_to` semantics: leading value axes of length 1
//! are *not* dropped, so a `(1, 2)` value does not fit a `(2,)` target.

use crate::coords::RowMajorIter;
use crate::dense::DenseArray;
use crate::dtype::{DType, Element, Scalar};
use crate::error::{DokError, DokResult};

/// A value to assign: a single scalar or a dense array.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    Array(DenseArray),
}

impl Value {
    pub fn shape(&self) -> &[usize] {
        match self {
            Value::Scalar(_) => &[],
            Value::Array(a) => a.shape(),
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

impl From<DenseArray> for Value {
    fn from(a: DenseArray) -> Self {
        Value::Array(a)
    }
}

impl<T: Element> From<T> for Value {
    fn from(v: T) -> Self {
        Value::Scalar(v.into_scalar())
    }
}

impl<T: Element> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        let values = v.into_iter().map(Element::into_scalar).collect();
        Value::Array(DenseArray::from_vec(values, T::DTYPE))
    }
}

/// Check that `value_shape` broadcasts to `target_shape`.
pub fn check_broadcast(value_shape: &[usize], target_shape: &[usize]) -> DokResult<()> {
    if value_shape.len() > target_shape.len() {
        return Err(DokError::value_shape(value_shape, target_shape));
    }
    let offset = target_shape.len() - value_shape.len();
    for (&v, &t) in value_shape.iter().zip(&target_shape[offset..]) {
        if v != t && v != 1 {
            return Err(DokError::value_shape(value_shape, target_shape));
        }
    }
    Ok(())
}

/// Broadcast `value` to `target_shape`, cast to `dtype`, in row-major target order.
///
/// Fails before producing anything if the shapes do not align.
pub fn broadcast_values(
    value: &Value,
    target_shape: &[usize],
    dtype: DType,
) -> DokResult<Vec<Scalar>> {
    let array = match value {
        Value::Scalar(s) => {
            let size = target_shape.iter().product();
            return Ok(vec![s.cast(dtype); size]);
        }
        Value::Array(a) => a,
    };
    let value_shape = array.shape();
    check_broadcast(value_shape, target_shape)?;

    let offset = target_shape.len() - value_shape.len();
    let mut source = vec![0usize; value_shape.len()];
    RowMajorIter::new(target_shape)
        .map(|target| {
            for (axis, slot) in source.iter_mut().enumerate() {
                *slot = if value_shape[axis] == 1 {
                    0
                } else {
                    target[axis + offset]
                };
            }
            array
                .get(&source)
                .map(|v| v.cast(dtype))
                .ok_or_else(|| DokError::value_shape(value_shape, target_shape))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_check_broadcast() {
        assert!(check_broadcast(&[], &[2, 3]).is_ok());
        assert!(check_broadcast(&[3], &[2, 3]).is_ok());
        assert!(check_broadcast(&[1, 3], &[2, 3]).is_ok());
        assert!(check_broadcast(&[2, 1], &[2, 3]).is_ok());
        assert!(check_broadcast(&[1], &[]).is_err());
        assert!(check_broadcast(&[1, 2], &[2]).is_err());
        assert!(check_broadcast(&[3], &[2]).is_err());
        assert!(check_broadcast(&[2], &[]).is_err());
    }

    #[test]
    fn test_broadcast_scalar() {
        let values = broadcast_values(&Value::from(2.5f64), &[2], DType::F32).unwrap();
        assert_eq!(values, vec![Scalar::F32(2.5), Scalar::F32(2.5)]);
    }

    #[test]
    fn test_broadcast_row() {
        let row = Value::from(DenseArray::from(arr1(&[1i64, 2, 3])));
        let values = broadcast_values(&row, &[2, 3], DType::I64).unwrap();
        let raw: Vec<f64> = values.iter().map(Scalar::as_f64).collect();
        assert_eq!(raw, vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_broadcast_column() {
        let col = Value::from(DenseArray::from(arr2(&[[1i64], [2]])));
        let values = broadcast_values(&col, &[2, 3], DType::I64).unwrap();
        let raw: Vec<f64> = values.iter().map(Scalar::as_f64).collect();
        assert_eq!(raw, vec![1.0, 1.0, 1.0, 2.0, 2.0, 2.0]);
    }

    #[test]
    fn test_broadcast_mismatch_is_value_shape_error() {
        let v = Value::from(vec![1.0f64, 2.0, 3.0]);
        let err = broadcast_values(&v, &[2], DType::F64).unwrap_err();
        assert!(matches!(err, DokError::ValueShape(_)));
        assert!(!err.is_index_error());
    }

    #[test]
    fn test_zero_d_array_is_scalar_like() {
        let v = Value::from(DenseArray::scalar(Scalar::F64(3.0)));
        let values = broadcast_values(&v, &[], DType::F64).unwrap();
        assert_eq!(values, vec![Scalar::F64(3.0)]);
    }
}
