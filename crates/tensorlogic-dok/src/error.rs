//! Error types for DOK sparse arrays.
//!
//! Every failure is raised while an index or value is being resolved, before the
//! store is touched, so a failed assignment never leaves a partially written array.

use std::fmt;
use thiserror::Error;

/// Main error type for DOK operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DokError {
    /// A coordinate component falls outside its axis after normalization
    #[error("Index out of bounds: index {index} is out of bounds for axis {axis} with size {size}")]
    IndexOutOfBounds {
        index: i128,
        axis: usize,
        size: usize,
    },

    /// More index terms than the array has axes
    #[error("Too many indices: array is {ndim}-dimensional, but {given} were indexed")]
    TooManyIndices { ndim: usize, given: usize },

    /// A term that is not an integer, slice or list of integers
    #[error("Invalid index type: {0}")]
    IndexType(String),

    /// Paired fancy index lists of different lengths
    #[error("Index length mismatch: all fancy indices must have the same length, got {lengths:?}")]
    IndexLength { lengths: Vec<usize> },

    /// A fancy index combination that DOK arrays do not implement
    #[error("Unsupported indexing: {0}")]
    Unsupported(String),

    /// Assigned value cannot be broadcast to the selected region
    #[error("Value shape mismatch: {0}")]
    ValueShape(ValueShapeError),

    /// Unrecognized format name in conversion dispatch
    #[error("Unknown format: {0}")]
    UnknownFormat(String),

    /// Malformed constructor arguments (shape/data disagreement, bad dtype name, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Detailed value-shape error
#[derive(Debug, Clone, PartialEq)]
pub struct ValueShapeError {
    /// Shape of the value being assigned
    pub value_shape: Vec<usize>,
    /// Shape of the selected region
    pub target_shape: Vec<usize>,
    /// Additional context
    pub context: Option<String>,
}

impl fmt::Display for ValueShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not broadcast value of shape {:?} into region of shape {:?}",
            self.value_shape, self.target_shape
        )?;
        if let Some(ctx) = &self.context {
            write!(f, " ({})", ctx)?;
        }
        Ok(())
    }
}

impl ValueShapeError {
    pub fn new(value_shape: Vec<usize>, target_shape: Vec<usize>) -> Self {
        Self {
            value_shape,
            target_shape,
            context: None,
        }
    }

    /// Add context to the error
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Result type using DokError
pub type DokResult<T> = Result<T, DokError>;

impl DokError {
    /// Create an out-of-bounds error for one axis
    pub fn out_of_bounds(index: i128, axis: usize, size: usize) -> Self {
        DokError::IndexOutOfBounds { index, axis, size }
    }

    /// Create an indexing-type error
    pub fn index_type(msg: impl Into<String>) -> Self {
        DokError::IndexType(msg.into())
    }

    /// Create an unsupported-indexing error
    pub fn unsupported(msg: impl Into<String>) -> Self {
        DokError::Unsupported(msg.into())
    }

    /// Create a value-shape error
    pub fn value_shape(value_shape: &[usize], target_shape: &[usize]) -> Self {
        DokError::ValueShape(ValueShapeError::new(
            value_shape.to_vec(),
            target_shape.to_vec(),
        ))
    }

    /// Create an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        DokError::InvalidInput(msg.into())
    }

    /// True for malformed index requests (bounds, type and length errors).
    pub fn is_index_error(&self) -> bool {
        matches!(
            self,
            DokError::IndexOutOfBounds { .. }
                | DokError::TooManyIndices { .. }
                | DokError::IndexType(_)
                | DokError::IndexLength { .. }
        )
    }

    /// True when the request is well formed but not implemented.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, DokError::Unsupported(_))
    }
}
