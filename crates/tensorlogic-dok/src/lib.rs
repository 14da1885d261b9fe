//! Dictionary-of-keys (DOK) sparse n-dimensional arrays.
//!
//! A DOK array stores only its non-zero cells in a hash map keyed by coordinate,
//! which makes random reads and writes cheap. This crate provides the store, a
//! numpy-style index resolver, scalar/slice/fancy reads and broadcasting writes,
//! and conversions to and from dense (`ndarray`) and coordinate (COO) arrays.
//!
//! ## Core Features
//!
//! ### Storage
//! - **Sparsity invariant**: the dtype's zero is never stored; writing it deletes
//! - **Typed values**: a closed numpy-like dtype lattice with value-based promotion
//! - **Construction**: from a shape, a coordinate map (with prefix fan-out), a dense
//!   array, or a COO array (non-zero fill values are materialized)
//!
//! ### Indexing
//! - **Integers**: negative positions count from the end of the axis
//! - **Slices**: Python `start:stop:step` semantics, including negative steps
//! - **Fancy lists**: one list mixed with slices (outer indexing), or one list per
//!   axis zipped into points
//! - **Broadcasting writes**: scalars and dense arrays with `broadcast_to` rules
//!
//! ### Reliability
//! - **Validate, then write**: a failed assignment leaves the array unchanged
//! - **Error taxonomy**: index, type, length, value-shape and unsupported errors are
//!   distinct [`DokError`] variants
//!
//! ## Module Organization
//!
//! - `dok`: the DOK store, getter and setter
//! - `index`: index terms and the resolver
//! - `broadcast`: assignment values and shape alignment
//! - `coords`: coordinate normalization and row-major traversal
//! - `dtype`: dtypes, scalars and promotion
//! - `dense`: dtype-tagged dense arrays over `ndarray`
//! - `coo`: coordinate-list sparse arrays
//! - `convert`: format conversion and the `ArrayLike` seam
//! - `error`: error types
//!
//! ## Example
//!
//! ```rust
//! use tensorlogic_dok::{DType, Dok, DokData, Scalar, Slice};
//!
//! let data = DokData::new().insert((0, 1), 3i64).insert(1, vec![6i64, 5, 4]);
//! let mut s = Dok::from_data((2, 3), data, None).unwrap();
//! assert_eq!(s.dtype(), DType::I64);
//!
//! s.set((0, Slice::full()), 0i64).unwrap();
//! assert_eq!(s.get((1, 2)).unwrap().into_scalar(), Some(Scalar::I64(4)));
//! assert_eq!(s.nnz(), 3);
//! ```

pub mod broadcast;
pub mod convert;
pub mod coo;
pub mod coords;
pub mod dense;
pub mod dok;
pub mod dtype;
pub mod error;
pub mod index;

pub use broadcast::{broadcast_values, check_broadcast, Value};
pub use convert::{AnyArray, ArrayLike, Format};
pub use coo::CooArray;
pub use coords::{Coords, RowMajorIter};
pub use dense::DenseArray;
pub use dok::{CoordKey, Dok, DokData, EntryValue, Selection};
pub use dtype::{DType, Element, Scalar};
pub use error::{DokError, DokResult, ValueShapeError};
pub use index::{resolve, AxisSelection, Index, IndexTerm, Region, ResolvedIndex, Slice};
