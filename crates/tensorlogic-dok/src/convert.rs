//! Conversions between DOK, COO and dense arrays, and name-based format dispatch.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::coo::CooArray;
use crate::dense::DenseArray;
use crate::dok::Dok;
use crate::dtype::DType;
use crate::error::{DokError, DokResult};

/// Anything that can be turned into a DOK array.
///
/// Implementors expose a shape, a dtype and a dense conversion; `to_dok` has a
/// default that goes through the dense form.
pub trait ArrayLike {
    fn shape(&self) -> &[usize];

    fn dtype(&self) -> DType;

    fn to_dense(&self) -> DenseArray;

    fn to_dok(&self) -> Dok {
        Dok::from_dense(&self.to_dense())
    }
}

impl ArrayLike for DenseArray {
    fn shape(&self) -> &[usize] {
        DenseArray::shape(self)
    }

    fn dtype(&self) -> DType {
        DenseArray::dtype(self)
    }

    fn to_dense(&self) -> DenseArray {
        self.clone()
    }

    fn to_dok(&self) -> Dok {
        Dok::from_dense(self)
    }
}

impl ArrayLike for CooArray {
    fn shape(&self) -> &[usize] {
        CooArray::shape(self)
    }

    fn dtype(&self) -> DType {
        CooArray::dtype(self)
    }

    fn to_dense(&self) -> DenseArray {
        self.todense()
    }

    fn to_dok(&self) -> Dok {
        Dok::from_coo(self)
    }
}

impl ArrayLike for Dok {
    fn shape(&self) -> &[usize] {
        Dok::shape(self)
    }

    fn dtype(&self) -> DType {
        Dok::dtype(self)
    }

    fn to_dense(&self) -> DenseArray {
        self.todense()
    }

    fn to_dok(&self) -> Dok {
        self.clone()
    }
}

/// Storage format names accepted by [`Dok::asformat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Dok,
    Coo,
    Dense,
}

impl Format {
    pub fn name(&self) -> &'static str {
        match self {
            Format::Dok => "dok",
            Format::Coo => "coo",
            Format::Dense => "dense",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = DokError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dok" => Ok(Format::Dok),
            "coo" => Ok(Format::Coo),
            "dense" => Ok(Format::Dense),
            _ => Err(DokError::UnknownFormat(s.to_string())),
        }
    }
}

/// An array in one of the supported formats.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyArray {
    Dok(Dok),
    Coo(CooArray),
    Dense(DenseArray),
}

impl AnyArray {
    pub fn format(&self) -> Format {
        match self {
            AnyArray::Dok(_) => Format::Dok,
            AnyArray::Coo(_) => Format::Coo,
            AnyArray::Dense(_) => Format::Dense,
        }
    }

    pub fn to_dense(&self) -> DenseArray {
        match self {
            AnyArray::Dok(d) => d.todense(),
            AnyArray::Coo(c) => c.todense(),
            AnyArray::Dense(a) => a.clone(),
        }
    }
}

impl Dok {
    /// Every nonzero cell of `dense` becomes an entry; the dtype is kept.
    pub fn from_dense(dense: &DenseArray) -> Self {
        let mut dok = Dok::zeros(dense.shape().to_vec(), dense.dtype());
        for (coords, value) in dense.indexed_iter() {
            if !value.is_zero() {
                dok.insert_unchecked(coords, value);
            }
        }
        debug!(
            shape = ?dok.shape(),
            dtype = %dok.dtype(),
            nnz = dok.nnz(),
            "converted dense array to DOK"
        );
        dok
    }

    /// Consume a COO array entry by entry.
    ///
    /// A nonzero fill value is materialized: every unlisted cell receives it, so
    /// the result equals the COO array elementwise.
    pub fn from_coo(coo: &CooArray) -> Self {
        let fill = coo.fill_value();
        if !fill.is_zero() {
            debug!(
                fill = %fill,
                size = coo.size(),
                "materializing COO fill value"
            );
            return Dok::from_dense(&coo.todense());
        }

        let mut dok = Dok::zeros(coo.shape().to_vec(), coo.dtype());
        for (coords, value) in coo.iter() {
            // zeros may have been stored explicitly
            if !value.is_zero() {
                dok.insert_unchecked(coords, value);
            }
        }
        debug!(
            shape = ?dok.shape(),
            dtype = %dok.dtype(),
            nnz = dok.nnz(),
            "converted COO array to DOK"
        );
        dok
    }

    /// Build from any [`ArrayLike`], keeping its shape and dtype.
    pub fn from_array_like<A: ArrayLike + ?Sized>(array: &A) -> Self {
        array.to_dok()
    }

    /// Empty array with the shape and dtype of `array`.
    pub fn zeros_like<A: ArrayLike + ?Sized>(array: &A) -> Self {
        Dok::zeros(array.shape().to_vec(), array.dtype())
    }

    /// Zero-filled dense array with every entry written in.
    pub fn todense(&self) -> DenseArray {
        let mut dense = DenseArray::zeros(self.shape(), self.dtype());
        dense.scatter(self.iter().map(|(coords, &value)| (coords, value)));
        dense
    }

    /// COO array with entries in lexicographic coordinate order and zero fill.
    pub fn to_coo(&self) -> CooArray {
        let (columns, data) = self.sorted_entries().into_iter().unzip();
        CooArray::from_sorted_entries(self.shape().to_vec(), self.dtype(), columns, data)
    }

    /// Convert to the format named `format` (`"dok"`, `"coo"` or `"dense"`).
    pub fn asformat(&self, format: &str) -> DokResult<AnyArray> {
        Ok(self.asformat_to(format.parse()?))
    }

    pub fn asformat_to(&self, format: Format) -> AnyArray {
        match format {
            Format::Dok => AnyArray::Dok(self.clone()),
            Format::Coo => AnyArray::Coo(self.to_coo()),
            Format::Dense => AnyArray::Dense(self.todense()),
        }
    }
}

impl From<&DenseArray> for Dok {
    fn from(dense: &DenseArray) -> Self {
        Dok::from_dense(dense)
    }
}

impl From<&CooArray> for Dok {
    fn from(coo: &CooArray) -> Self {
        Dok::from_coo(coo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Scalar;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_dense_round_trip_keeps_dtype() {
        let dense = DenseArray::from(arr2(&[[0u16, 3], [7, 0]]));
        let dok = Dok::from_dense(&dense);
        assert_eq!(dok.dtype(), DType::U16);
        assert_eq!(dok.nnz(), 2);
        assert_eq!(dok.todense(), dense);
    }

    #[test]
    fn test_negative_zero_is_not_stored() {
        let dense = DenseArray::from(arr1(&[-0.0f64, 1.0]));
        assert_eq!(Dok::from_dense(&dense).nnz(), 1);
    }

    #[test]
    fn test_to_coo_is_sorted() {
        let dense = DenseArray::from(arr2(&[[0.0, 2.0], [3.0, 0.0]]));
        let coo = Dok::from_dense(&dense).to_coo();
        assert!(coo.is_sorted());
        assert_eq!(coo.coords(), &arr2(&[[0, 1], [1, 0]]));
        assert_eq!(coo.data(), &[Scalar::F64(2.0), Scalar::F64(3.0)]);
        assert_eq!(coo.fill_value(), Scalar::F64(0.0));
    }

    #[test]
    fn test_from_coo_drops_explicit_zeros() {
        let coo = CooArray::from_parts(
            vec![3],
            arr2(&[[0, 2]]),
            vec![Scalar::I32(0), Scalar::I32(5)],
            None,
        )
        .unwrap();
        let dok = Dok::from_coo(&coo);
        assert_eq!(dok.nnz(), 1);
        assert_eq!(dok.value_at(&[2]), Scalar::I32(5));
    }

    #[test]
    fn test_from_coo_materializes_fill_value() {
        let coo = CooArray::from_parts(vec![3], arr2(&[[1]]), vec![Scalar::F64(4.0)], None)
            .unwrap()
            .with_fill_value(Scalar::F64(0.5));
        let dok = Dok::from_coo(&coo);
        assert_eq!(dok.nnz(), 3);
        assert_eq!(dok.todense(), coo.todense());
    }

    #[test]
    fn test_empty_dok_to_coo_keeps_dtype() {
        let dok = Dok::zeros(5, DType::U8);
        let coo = dok.to_coo();
        assert_eq!(coo.dtype(), DType::U8);
        assert_eq!(coo.nnz(), 0);
    }

    #[test]
    fn test_zeros_like() {
        let dense = DenseArray::zeros(&[2, 4], DType::I8);
        let z = Dok::zeros_like(&dense);
        assert_eq!(z.shape(), &[2, 4]);
        assert_eq!(z.dtype(), DType::I8);
        assert_eq!(z.nnz(), 0);
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("DOK".parse::<Format>().unwrap(), Format::Dok);
        assert_eq!(" coo ".parse::<Format>().unwrap(), Format::Coo);
        assert!(matches!(
            "csr".parse::<Format>(),
            Err(DokError::UnknownFormat(_))
        ));
        assert_eq!(Format::Dense.to_string(), "dense");
    }

    #[test]
    fn test_asformat() {
        let dok = Dok::from_dense(&DenseArray::from(arr1(&[0.0, 1.0])));
        assert_eq!(dok.asformat("dok").unwrap(), AnyArray::Dok(dok.clone()));
        let coo = dok.asformat("coo").unwrap();
        assert_eq!(coo.format(), Format::Coo);
        assert_eq!(coo.to_dense(), dok.todense());
        assert!(dok.asformat("garbage").is_err());
    }

    #[test]
    fn test_array_like_dispatch() {
        let dense = DenseArray::from(arr1(&[1i64, 0, 2]));
        let coo = CooArray::from_dense(&dense);
        let a = Dok::from_array_like(&dense);
        let b = Dok::from_array_like(&coo);
        let c = Dok::from_array_like(&a);
        assert_eq!(a, b);
        assert_eq!(b, c);
    }
}
