//! Coordinate normalization and validation.

use crate::error::{DokError, DokResult};

/// A canonical coordinate: one in-bounds position per axis.
pub type Coords = Vec<usize>;

/// Normalize a (possibly negative) index into an axis of length `size`.
///
/// Valid inputs satisfy `-size <= index < size`; negative values count from the end.
#[inline]
pub fn normalize_axis_index(index: i128, axis: usize, size: usize) -> DokResult<usize> {
    let normalized = if index < 0 {
        index.checked_add(size as i128)
    } else {
        Some(index)
    };
    match normalized.and_then(|i| usize::try_from(i).ok()) {
        Some(i) if i < size => Ok(i),
        _ => Err(DokError::out_of_bounds(index, axis, size)),
    }
}

/// Check that an already non-negative coordinate lies inside `shape`.
pub fn check_coords(coords: &[usize], shape: &[usize]) -> DokResult<()> {
    if coords.len() != shape.len() {
        return Err(DokError::invalid_input(format!(
            "coordinate {:?} has {} components but the array has {} axes",
            coords,
            coords.len(),
            shape.len()
        )));
    }
    for (axis, (&c, &size)) in coords.iter().zip(shape.iter()).enumerate() {
        if c >= size {
            return Err(DokError::out_of_bounds(c as i128, axis, size));
        }
    }
    Ok(())
}

/// Number of cells of an array with this shape (1 for 0-d).
#[inline]
pub fn shape_size(shape: &[usize]) -> usize {
    shape.iter().product()
}

/// Row-major iterator over every coordinate of `shape`.
///
/// Yields a single empty coordinate for a 0-d shape and nothing if any axis is empty.
#[derive(Debug, Clone)]
pub struct RowMajorIter {
    shape: Vec<usize>,
    next: Option<Coords>,
}

impl RowMajorIter {
    pub fn new(shape: &[usize]) -> Self {
        let next = if shape.contains(&0) {
            None
        } else {
            Some(vec![0; shape.len()])
        };
        RowMajorIter {
            shape: shape.to_vec(),
            next,
        }
    }
}

impl Iterator for RowMajorIter {
    type Item = Coords;

    fn next(&mut self) -> Option<Coords> {
        let current = self.next.take()?;
        let mut successor = current.clone();
        let mut axis = self.shape.len();
        while axis > 0 {
            axis -= 1;
            successor[axis] += 1;
            if successor[axis] < self.shape[axis] {
                self.next = Some(successor);
                return Some(current);
            }
            successor[axis] = 0;
        }
        // odometer wrapped: `current` was the last coordinate
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_negative() {
        assert_eq!(normalize_axis_index(-1, 0, 5).unwrap(), 4);
        assert_eq!(normalize_axis_index(-5, 0, 5).unwrap(), 0);
        assert_eq!(normalize_axis_index(4, 0, 5).unwrap(), 4);
    }

    #[test]
    fn test_normalize_out_of_bounds() {
        assert_eq!(
            normalize_axis_index(5, 2, 5),
            Err(DokError::out_of_bounds(5, 2, 5))
        );
        assert!(normalize_axis_index(-6, 0, 5).is_err());
        assert!(normalize_axis_index(0, 0, 0).is_err());
    }

    #[test]
    fn test_normalize_wide_index() {
        let huge = -(1i128 << 100);
        assert_eq!(
            normalize_axis_index(huge, 0, 5),
            Err(DokError::out_of_bounds(huge, 0, 5))
        );
        assert_eq!(
            normalize_axis_index(i128::MIN, 1, 2),
            Err(DokError::out_of_bounds(i128::MIN, 1, 2))
        );
    }

    #[test]
    fn test_check_coords() {
        assert!(check_coords(&[2, 3], &[3, 4]).is_ok());
        assert!(check_coords(&[3, 0], &[3, 4]).unwrap_err().is_index_error());
    }

    #[test]
    fn test_row_major_iter() {
        let all: Vec<Coords> = RowMajorIter::new(&[2, 2]).collect();
        assert_eq!(all, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
        assert_eq!(RowMajorIter::new(&[]).count(), 1);
        assert_eq!(RowMajorIter::new(&[3, 0]).count(), 0);
        assert_eq!(RowMajorIter::new(&[2, 3, 4]).count(), 24);
    }
}
