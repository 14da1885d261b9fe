//! Index expressions and their resolution against an array shape.
//!
//! An [`Index`] is a sequence of [`IndexTerm`]s, nominally one per axis. Resolution
//! classifies it into one of three plans:
//!
//! - [`ResolvedIndex::Point`]: every axis fixed by an integer, reads/writes one cell.
//! - [`ResolvedIndex::Region`]: each axis independently fixed, sliced or (for at most
//!   one axis) picked from a list of positions. This is outer/orthogonal indexing.
//! - [`ResolvedIndex::Paired`]: one equal-length list per axis, zipped into point
//!   coordinates (vectorized selection, not a cross product).
//!
//! Fancy combinations that would need a partial vectorized expansion against the
//! sparse store (several lists that do not cover every axis, or a lone list on a
//! multi-axis array) resolve to [`DokError::Unsupported`].
//!
//! ```rust
//! use tensorlogic_dok::{resolve, Index, ResolvedIndex, Slice};
//!
//! let plan = resolve(&Index::from((1, Slice::full())), &[5, 5]).unwrap();
//! assert_eq!(plan.shape(), vec![5]);
//!
//! let paired = resolve(&Index::from((vec![0, 4, 5], vec![3, 2, 4])), &[10, 10]).unwrap();
//! assert!(matches!(paired, ResolvedIndex::Paired(ref c) if c.len() == 3));
//! ```

use std::collections::HashMap;
use std::ops::{Range, RangeFrom, RangeFull, RangeTo};

use crate::coords::{normalize_axis_index, Coords, RowMajorIter};
use crate::dtype::Scalar;
use crate::error::{DokError, DokResult};

/// A `start:stop:step` slice with Python-style defaulting and clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Slice {
    pub start: Option<isize>,
    pub stop: Option<isize>,
    pub step: Option<isize>,
}

impl Slice {
    pub fn new(
        start: impl Into<Option<isize>>,
        stop: impl Into<Option<isize>>,
        step: impl Into<Option<isize>>,
    ) -> Self {
        Slice {
            start: start.into(),
            stop: stop.into(),
            step: step.into(),
        }
    }

    /// `:`, selecting a whole axis.
    pub fn full() -> Self {
        Slice::default()
    }

    /// Resolve against an axis of length `len` into `(start, step, count)`.
    ///
    /// The selected positions are `start + k * step` for `k in 0..count`.
    pub fn indices(&self, len: usize) -> DokResult<(isize, isize, usize)> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(DokError::index_type("slice step cannot be zero"));
        }
        let len = isize::try_from(len)
            .map_err(|_| DokError::invalid_input("axis length exceeds isize::MAX"))?;
        let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };

        let clamp = |bound: isize| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };
        let start = self
            .start
            .map(clamp)
            .unwrap_or(if step < 0 { upper } else { lower });
        let stop = self
            .stop
            .map(clamp)
            .unwrap_or(if step < 0 { lower } else { upper });

        // both bounds lie in [-1, len], so the span never overflows
        let span = if step > 0 { stop - start } else { start - stop };
        let count = if span > 0 {
            (span.unsigned_abs() - 1) / step.unsigned_abs() + 1
        } else {
            0
        };
        Ok((start, step, count))
    }
}

/// One component of an index expression.
#[derive(Debug, Clone, PartialEq)]
pub enum IndexTerm {
    /// A single position; the axis is dropped from the result.
    Int(isize),
    /// A range of positions; the axis is kept.
    Slice(Slice),
    /// A list of positions (a "fancy" term).
    List(Vec<IndexTerm>),
    /// A dynamically-typed position. Only integer kinds are valid.
    Scalar(Scalar),
}

/// Slice bounds clamp to the axis, so saturating a wide bound selects the same cells.
fn saturating_bound(bound: i128) -> isize {
    isize::try_from(bound).unwrap_or(if bound < 0 { isize::MIN } else { isize::MAX })
}

macro_rules! impl_int_term {
    ($($t:ty),*) => {
        $(
            impl From<$t> for IndexTerm {
                fn from(i: $t) -> Self {
                    // positions past isize keep their value so bounds errors report it
                    match isize::try_from(i) {
                        Ok(i) => IndexTerm::Int(i),
                        Err(_) => match u64::try_from(i) {
                            Ok(u) => IndexTerm::Scalar(Scalar::U64(u)),
                            Err(_) => IndexTerm::Scalar(Scalar::I64(i as i64)),
                        },
                    }
                }
            }

            impl From<Vec<$t>> for IndexTerm {
                fn from(list: Vec<$t>) -> Self {
                    IndexTerm::List(list.into_iter().map(IndexTerm::from).collect())
                }
            }

            impl<const N: usize> From<[$t; N]> for IndexTerm {
                fn from(list: [$t; N]) -> Self {
                    IndexTerm::List(list.into_iter().map(IndexTerm::from).collect())
                }
            }

            impl From<Range<$t>> for IndexTerm {
                fn from(r: Range<$t>) -> Self {
                    IndexTerm::Slice(Slice::new(
                        saturating_bound(r.start as i128),
                        saturating_bound(r.end as i128),
                        None,
                    ))
                }
            }

            impl From<RangeFrom<$t>> for IndexTerm {
                fn from(r: RangeFrom<$t>) -> Self {
                    IndexTerm::Slice(Slice::new(
                        saturating_bound(r.start as i128),
                        None,
                        None,
                    ))
                }
            }

            impl From<RangeTo<$t>> for IndexTerm {
                fn from(r: RangeTo<$t>) -> Self {
                    IndexTerm::Slice(Slice::new(
                        None,
                        saturating_bound(r.end as i128),
                        None,
                    ))
                }
            }
        )*
    };
}

impl_int_term!(i32, i64, isize, usize);

impl From<RangeFull> for IndexTerm {
    fn from(_: RangeFull) -> Self {
        IndexTerm::Slice(Slice::full())
    }
}

impl From<Slice> for IndexTerm {
    fn from(s: Slice) -> Self {
        IndexTerm::Slice(s)
    }
}

impl From<Scalar> for IndexTerm {
    fn from(s: Scalar) -> Self {
        IndexTerm::Scalar(s)
    }
}

impl From<Vec<IndexTerm>> for IndexTerm {
    fn from(list: Vec<IndexTerm>) -> Self {
        IndexTerm::List(list)
    }
}

/// A full index expression: terms for the leading axes, the rest select everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Index(pub Vec<IndexTerm>);

impl Index {
    pub fn new(terms: Vec<IndexTerm>) -> Self {
        Index(terms)
    }

    pub fn terms(&self) -> &[IndexTerm] {
        &self.0
    }
}

impl From<IndexTerm> for Index {
    fn from(term: IndexTerm) -> Self {
        Index(vec![term])
    }
}

impl From<Vec<IndexTerm>> for Index {
    fn from(terms: Vec<IndexTerm>) -> Self {
        Index(terms)
    }
}

impl From<&[usize]> for Index {
    fn from(coords: &[usize]) -> Self {
        Index(coords.iter().map(|&c| IndexTerm::from(c)).collect())
    }
}

macro_rules! impl_single_term_index {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Index {
                fn from(term: $t) -> Self {
                    Index(vec![IndexTerm::from(term)])
                }
            }
        )*
    };
}

impl_single_term_index!(
    i32,
    i64,
    isize,
    usize,
    Vec<i32>,
    Vec<i64>,
    Vec<isize>,
    Vec<usize>,
    Range<i32>,
    Range<isize>,
    Range<usize>,
    RangeFrom<i32>,
    RangeFrom<isize>,
    RangeFrom<usize>,
    RangeTo<i32>,
    RangeTo<isize>,
    RangeTo<usize>,
    RangeFull,
    Slice,
    Scalar
);

macro_rules! impl_tuple_index {
    ($($name:ident),+) => {
        impl<$($name: Into<IndexTerm>),+> From<($($name,)+)> for Index {
            #[allow(non_snake_case)]
            fn from(($($name,)+): ($($name,)+)) -> Self {
                Index(vec![$($name.into()),+])
            }
        }
    };
}

impl_tuple_index!(A);
impl_tuple_index!(A, B);
impl_tuple_index!(A, B, C);
impl_tuple_index!(A, B, C, D);
impl_tuple_index!(A, B, C, D, E);

/// How one axis participates in a rectangular region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AxisSelection {
    /// Fixed by an integer; the axis is dropped from the result.
    Fixed(usize),
    /// `start + k * step` for `k in 0..len`.
    Range { start: isize, step: isize, len: usize },
    /// Explicit positions, possibly repeated, in output order.
    Positions(Vec<usize>),
}

impl AxisSelection {
    /// Length of the corresponding output axis, `None` for collapsed axes.
    pub fn extent(&self) -> Option<usize> {
        match self {
            AxisSelection::Fixed(_) => None,
            AxisSelection::Range { len, .. } => Some(*len),
            AxisSelection::Positions(p) => Some(p.len()),
        }
    }

    /// Source coordinate of output position `k` (ignored for fixed axes).
    #[inline]
    pub fn source(&self, k: usize) -> usize {
        match self {
            AxisSelection::Fixed(c) => *c,
            // in-bounds by construction of the range
            AxisSelection::Range { start, step, .. } => (*start + k as isize * *step) as usize,
            AxisSelection::Positions(p) => p[k],
        }
    }
}

/// A rectangular selection: one [`AxisSelection`] per axis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub axes: Vec<AxisSelection>,
}

impl Region {
    /// Shape of the selected region (collapsed axes removed).
    pub fn shape(&self) -> Vec<usize> {
        self.axes.iter().filter_map(AxisSelection::extent).collect()
    }

    pub fn size(&self) -> usize {
        self.shape().iter().product()
    }

    /// Store coordinate of the cell at `out` (a coordinate in the region's shape).
    pub fn source_coords(&self, out: &[usize]) -> Coords {
        let mut out_axis = 0;
        self.axes
            .iter()
            .map(|sel| match sel {
                AxisSelection::Fixed(c) => *c,
                _ => {
                    let c = sel.source(out[out_axis]);
                    out_axis += 1;
                    c
                }
            })
            .collect()
    }

    /// Every (region coordinate, store coordinate) pair in row-major region order.
    pub fn cells(&self) -> impl Iterator<Item = (Coords, Coords)> + '_ {
        RowMajorIter::new(&self.shape()).map(move |out| {
            let src = self.source_coords(&out);
            (out, src)
        })
    }

    /// Inverse mapping used to re-express store coordinates in region space.
    pub fn locator(&self) -> RegionLocator<'_> {
        let inverse = self
            .axes
            .iter()
            .map(|sel| match sel {
                AxisSelection::Positions(p) => {
                    let mut map: HashMap<usize, Vec<usize>> = HashMap::new();
                    for (k, &c) in p.iter().enumerate() {
                        map.entry(c).or_default().push(k);
                    }
                    Some(map)
                }
                _ => None,
            })
            .collect();
        RegionLocator {
            region: self,
            inverse,
        }
    }
}

/// Maps store coordinates to the region positions they appear at.
#[derive(Debug)]
pub struct RegionLocator<'a> {
    region: &'a Region,
    inverse: Vec<Option<HashMap<usize, Vec<usize>>>>,
}

impl RegionLocator<'_> {
    /// All region coordinates showing the cell at `coords`; empty if it is outside.
    ///
    /// More than one result only happens when a position list repeats a value.
    pub fn locate(&self, coords: &[usize]) -> Vec<Coords> {
        let mut per_axis: Vec<Vec<usize>> = Vec::new();
        for ((sel, inverse), &c) in self
            .region
            .axes
            .iter()
            .zip(self.inverse.iter())
            .zip(coords.iter())
        {
            match sel {
                AxisSelection::Fixed(f) => {
                    if *f != c {
                        return Vec::new();
                    }
                }
                AxisSelection::Range { start, step, len } => {
                    let offset = c as isize - *start;
                    if offset % *step != 0 {
                        return Vec::new();
                    }
                    let k = offset / *step;
                    if k < 0 || k as usize >= *len {
                        return Vec::new();
                    }
                    per_axis.push(vec![k as usize]);
                }
                AxisSelection::Positions(_) => {
                    match inverse.as_ref().and_then(|m| m.get(&c)) {
                        Some(ks) => per_axis.push(ks.clone()),
                        None => return Vec::new(),
                    }
                }
            }
        }
        let counts: Vec<usize> = per_axis.iter().map(Vec::len).collect();
        RowMajorIter::new(&counts)
            .map(|pick| {
                pick.iter()
                    .zip(per_axis.iter())
                    .map(|(&j, ks)| ks[j])
                    .collect()
            })
            .collect()
    }
}

/// The plan an index expression resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedIndex {
    /// One cell.
    Point(Coords),
    /// A rectangular (outer-indexed) region.
    Region(Region),
    /// Zipped per-axis lists: the k-th coordinate takes the k-th element of every list.
    Paired(Vec<Coords>),
}

impl ResolvedIndex {
    /// Shape of the selection (`[]` for a point).
    pub fn shape(&self) -> Vec<usize> {
        match self {
            ResolvedIndex::Point(_) => Vec::new(),
            ResolvedIndex::Region(region) => region.shape(),
            ResolvedIndex::Paired(coords) => vec![coords.len()],
        }
    }
}

/// A term after type validation.
#[derive(Debug, Clone)]
enum Term {
    Int(i128),
    Slice(Slice),
    List(Vec<i128>),
}

fn integer_term(term: &IndexTerm) -> DokResult<i128> {
    match term {
        IndexTerm::Int(i) => Ok(*i as i128),
        IndexTerm::Scalar(s) => s.as_integer().ok_or_else(|| {
            DokError::index_type(format!(
                "only integers, slices and integer lists are valid indices, got {} ({})",
                s,
                s.dtype()
            ))
        }),
        IndexTerm::Slice(_) => Err(DokError::index_type(
            "slices are not valid inside a list of indices",
        )),
        IndexTerm::List(_) => Err(DokError::index_type(
            "nested lists (multi-dimensional fancy indices) are not supported",
        )),
    }
}

fn validate_term(term: &IndexTerm) -> DokResult<Term> {
    match term {
        IndexTerm::Slice(s) => {
            if s.step == Some(0) {
                return Err(DokError::index_type("slice step cannot be zero"));
            }
            Ok(Term::Slice(*s))
        }
        IndexTerm::List(items) => items
            .iter()
            .map(integer_term)
            .collect::<DokResult<Vec<_>>>()
            .map(Term::List),
        other => integer_term(other).map(Term::Int),
    }
}

/// Resolve `index` against `shape`.
///
/// Checks run in a fixed order so every failure is reported before any mutation:
/// too many terms, term types, list length agreement, fancy coverage, then bounds.
pub fn resolve(index: &Index, shape: &[usize]) -> DokResult<ResolvedIndex> {
    let ndim = shape.len();
    let raw = index.terms();
    if raw.len() > ndim {
        return Err(DokError::TooManyIndices {
            ndim,
            given: raw.len(),
        });
    }

    let terms = raw
        .iter()
        .map(validate_term)
        .collect::<DokResult<Vec<Term>>>()?;

    let lists: Vec<(usize, &Vec<i128>)> = terms
        .iter()
        .enumerate()
        .filter_map(|(axis, t)| match t {
            Term::List(l) => Some((axis, l)),
            _ => None,
        })
        .collect();

    if lists.len() >= 2 {
        let lengths: Vec<usize> = lists.iter().map(|(_, l)| l.len()).collect();
        if lengths.iter().any(|&n| n != lengths[0]) {
            return Err(DokError::IndexLength { lengths });
        }
    }

    let covers_all_axes = lists.len() == ndim;
    if !lists.is_empty() && covers_all_axes {
        return resolve_paired(&lists, shape);
    }
    if lists.len() >= 2 {
        return Err(DokError::unsupported(format!(
            "{} fancy indices over a {}-dimensional array must cover every axis",
            lists.len(),
            ndim
        )));
    }
    if lists.len() == 1 && raw.len() == 1 {
        return Err(DokError::unsupported(format!(
            "a lone list index on a {}-dimensional array is not supported; \
             index the remaining axes explicitly",
            ndim
        )));
    }

    let ints: Option<Vec<i128>> = terms
        .iter()
        .map(|t| match t {
            Term::Int(i) => Some(*i),
            _ => None,
        })
        .collect();
    if let Some(ints) = ints.filter(|i| i.len() == ndim) {
        let coords = ints
            .iter()
            .zip(shape.iter())
            .enumerate()
            .map(|(axis, (&i, &size))| normalize_axis_index(i, axis, size))
            .collect::<DokResult<Coords>>()?;
        return Ok(ResolvedIndex::Point(coords));
    }

    let mut axes = Vec::with_capacity(ndim);
    for (axis, &size) in shape.iter().enumerate() {
        let selection = match terms.get(axis) {
            Some(Term::Int(i)) => AxisSelection::Fixed(normalize_axis_index(*i, axis, size)?),
            Some(Term::Slice(s)) => {
                let (start, step, len) = s.indices(size)?;
                AxisSelection::Range { start, step, len }
            }
            Some(Term::List(l)) => AxisSelection::Positions(
                l.iter()
                    .map(|&i| normalize_axis_index(i, axis, size))
                    .collect::<DokResult<Vec<_>>>()?,
            ),
            None => AxisSelection::Range {
                start: 0,
                step: 1,
                len: size,
            },
        };
        axes.push(selection);
    }
    Ok(ResolvedIndex::Region(Region { axes }))
}

fn resolve_paired(lists: &[(usize, &Vec<i128>)], shape: &[usize]) -> DokResult<ResolvedIndex> {
    let n = lists.first().map_or(0, |(_, l)| l.len());
    let mut coords = vec![Vec::with_capacity(shape.len()); n];
    for (axis, list) in lists {
        for (k, &i) in list.iter().enumerate() {
            coords[k].push(normalize_axis_index(i, *axis, shape[*axis])?);
        }
    }
    Ok(ResolvedIndex::Paired(coords))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn positions(s: Slice, len: usize) -> Vec<isize> {
        let (start, step, count) = s.indices(len).unwrap();
        (0..count as isize).map(|k| start + k * step).collect()
    }

    #[test]
    fn test_slice_defaults() {
        assert_eq!(positions(Slice::full(), 4), vec![0, 1, 2, 3]);
        assert_eq!(positions(Slice::new(1, None, None), 4), vec![1, 2, 3]);
        assert_eq!(positions(Slice::new(None, -1, None), 4), vec![0, 1, 2]);
    }

    #[test]
    fn test_slice_steps() {
        assert_eq!(positions(Slice::new(0, 4, 2), 5), vec![0, 2]);
        assert_eq!(positions(Slice::new(0, 10, 3), 10), vec![0, 3, 6, 9]);
        assert_eq!(positions(Slice::new(0, 4, 4), 5), vec![0]);
    }

    #[test]
    fn test_slice_negative_step() {
        assert_eq!(positions(Slice::new(2, 0, -1), 3), vec![2, 1]);
        assert_eq!(positions(Slice::new(None, None, -1), 3), vec![2, 1, 0]);
        assert_eq!(positions(Slice::new(0, 2, -1), 3), Vec::<isize>::new());
    }

    #[test]
    fn test_slice_clamping() {
        assert_eq!(positions(Slice::new(-10, 10, None), 3), vec![0, 1, 2]);
        assert_eq!(positions(Slice::new(5, 10, None), 3), Vec::<isize>::new());
    }

    #[test]
    fn test_slice_extreme_steps() {
        let forward = Slice::new(0, 10, isize::MAX).indices(10).unwrap();
        assert_eq!(forward, (0, isize::MAX, 1));
        let backward = Slice::new(None, None, isize::MIN).indices(10).unwrap();
        assert_eq!(backward, (9, isize::MIN, 1));
        assert_eq!(Slice::new(None, None, isize::MAX - 1).indices(0).unwrap().2, 0);
        assert_eq!(positions(Slice::new(None, None, isize::MIN), 4), vec![3]);

        let dok = crate::dok::Dok::new(10);
        let forward = dok.get(Slice::new(0, 10, isize::MAX)).unwrap().into_dok().unwrap();
        assert_eq!(forward.shape(), &[1]);
        let backward = dok.get(Slice::new(None, None, isize::MIN)).unwrap().into_dok().unwrap();
        assert_eq!(backward.shape(), &[1]);
    }

    #[test]
    fn test_slice_zero_step() {
        let err = Slice::new(None, None, 0).indices(3).unwrap_err();
        assert!(matches!(err, DokError::IndexType(_)));
    }

    #[test]
    fn test_resolve_point() {
        let plan = resolve(&Index::from((1, -1)), &[3, 4]).unwrap();
        assert_eq!(plan, ResolvedIndex::Point(vec![1, 3]));
        assert_eq!(plan.shape(), Vec::<usize>::new());
    }

    #[test]
    fn test_resolve_region_shapes() {
        let shape = [5, 5];
        assert_eq!(
            resolve(&Index::from((Slice::full(), 1)), &shape)
                .unwrap()
                .shape(),
            vec![5]
        );
        assert_eq!(
            resolve(&Index::from((1..2, 1)), &shape).unwrap().shape(),
            vec![1]
        );
        assert_eq!(
            resolve(&Index::from(..3), &shape).unwrap().shape(),
            vec![3, 5]
        );
    }

    #[test]
    fn test_resolve_paired() {
        let plan = resolve(&Index::from((vec![0, 4, 5], vec![3, 2, 4])), &[10, 10]).unwrap();
        assert_eq!(
            plan,
            ResolvedIndex::Paired(vec![vec![0, 3], vec![4, 2], vec![5, 4]])
        );
    }

    #[test]
    fn test_resolve_single_list_rank_one() {
        let plan = resolve(&Index::from(vec![1, 3]), &[4]).unwrap();
        assert_eq!(plan, ResolvedIndex::Paired(vec![vec![1], vec![3]]));
    }

    #[test]
    fn test_resolve_single_list_with_other_terms_is_outer() {
        let plan = resolve(&Index::from((vec![2, 0, 2], Slice::full())), &[3, 4]).unwrap();
        assert_eq!(plan.shape(), vec![3, 4]);
        let plan = resolve(&Index::from((1, vec![0, 3])), &[3, 4]).unwrap();
        assert_eq!(plan.shape(), vec![2]);
    }

    #[test]
    fn test_resolve_unsupported() {
        let err = resolve(&Index::from(vec![0, 4, 5]), &[10, 10]).unwrap_err();
        assert!(err.is_unsupported());
        let err = resolve(&Index::from((vec![1, 2, 3], vec![0, 2, 2])), &[5, 5, 5]).unwrap_err();
        assert!(err.is_unsupported());
        let err = resolve(&Index::from((vec![1, 2], vec![0, 2], 1)), &[5, 5, 5]).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_resolve_length_mismatch() {
        let err = resolve(&Index::from((vec![0, 4, 5], vec![0, 2])), &[10, 10]).unwrap_err();
        assert_eq!(
            err,
            DokError::IndexLength {
                lengths: vec![3, 2]
            }
        );
        let err = resolve(
            &Index::from((vec![1, 2, 3], vec![0], vec![2, 3, 4])),
            &[5, 5, 5],
        )
        .unwrap_err();
        assert!(err.is_index_error());
    }

    #[test]
    fn test_resolve_too_many() {
        let err = resolve(&Index::from((0, 0, 0)), &[2, 2]).unwrap_err();
        assert_eq!(err, DokError::TooManyIndices { ndim: 2, given: 3 });
    }

    #[test]
    fn test_resolve_type_errors() {
        let float_list = IndexTerm::List(vec![IndexTerm::Int(0), Scalar::F64(1.5).into()]);
        let err = resolve(&Index::from((float_list, vec![1, 2])), &[2, 3]).unwrap_err();
        assert!(matches!(err, DokError::IndexType(_)));

        let nested = IndexTerm::List(vec![IndexTerm::from(vec![0]), IndexTerm::from(vec![1])]);
        let err = resolve(&Index::from((nested, vec![1, 2])), &[2, 3]).unwrap_err();
        assert!(matches!(err, DokError::IndexType(_)));

        let err = resolve(&Index::from(Scalar::F32(1.0)), &[2]).unwrap_err();
        assert!(matches!(err, DokError::IndexType(_)));
    }

    #[test]
    fn test_resolve_integer_scalar_terms() {
        let plan = resolve(&Index::from((Scalar::U8(1), Scalar::I64(-1))), &[2, 3]).unwrap();
        assert_eq!(plan, ResolvedIndex::Point(vec![1, 2]));
    }

    #[test]
    fn test_resolve_bounds() {
        let err = resolve(&Index::from((2, 0)), &[2, 3]).unwrap_err();
        assert_eq!(err, DokError::out_of_bounds(2, 0, 2));
        let err = resolve(&Index::from((vec![0, 1], vec![1, 3])), &[2, 3]).unwrap_err();
        assert_eq!(err, DokError::out_of_bounds(3, 1, 3));
    }

    #[test]
    fn test_resolve_bounds_reports_wide_indices() {
        let err = resolve(&Index::from(usize::MAX), &[3]).unwrap_err();
        assert_eq!(err, DokError::out_of_bounds(usize::MAX as i128, 0, 3));
        let err = resolve(&Index::from(Scalar::U64(u64::MAX)), &[3]).unwrap_err();
        assert_eq!(err, DokError::out_of_bounds(u64::MAX as i128, 0, 3));
        let err = resolve(&Index::from((0, vec![1, usize::MAX])), &[2, 3]).unwrap_err();
        assert_eq!(err, DokError::out_of_bounds(usize::MAX as i128, 1, 3));
        assert_eq!(
            IndexTerm::from(usize::MAX),
            IndexTerm::Scalar(Scalar::U64(usize::MAX as u64))
        );
        assert_eq!(IndexTerm::from(7usize), IndexTerm::Int(7));
        // slice bounds clamp to the axis, so saturated ends select the same cells
        let tail = resolve(&Index::from(1usize..usize::MAX), &[3]).unwrap();
        assert_eq!(tail.shape(), vec![2]);
        assert_eq!(saturating_bound(i128::MIN), isize::MIN);
    }

    #[test]
    fn test_region_locator_repeats() {
        let plan = resolve(&Index::from((vec![2, 0, 2], 1)), &[3, 4]).unwrap();
        let ResolvedIndex::Region(region) = plan else {
            panic!("expected region");
        };
        let locator = region.locator();
        assert_eq!(locator.locate(&[2, 1]), vec![vec![0], vec![2]]);
        assert_eq!(locator.locate(&[0, 1]), vec![vec![1]]);
        assert!(locator.locate(&[1, 1]).is_empty());
        assert!(locator.locate(&[2, 0]).is_empty());
    }

    #[test]
    fn test_region_cells_negative_step() {
        let plan = resolve(&Index::from((0, Slice::new(2, 0, -1))), &[2, 3]).unwrap();
        let ResolvedIndex::Region(region) = plan else {
            panic!("expected region");
        };
        let cells: Vec<_> = region.cells().collect();
        assert_eq!(cells, vec![(vec![0], vec![0, 2]), (vec![1], vec![0, 1])]);
        assert_eq!(region.locator().locate(&[0, 1]), vec![vec![1]]);
    }
}
