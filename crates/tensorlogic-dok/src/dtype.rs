//! Scalar kinds and the dtype promotion lattice.
//!
//! A DOK array stores every value with one shared [`DType`]. The dtype of a
//! freshly built array is the join of the dtypes of everything it was built
//! from, using the same promotion table array ecosystems use for mixed
//! arithmetic: the join of `uint8` and `uint16` is `uint16`, the join of
//! `uint8` and `float32` is `float32`, and so on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DokError;

/// Scalar kind shared by all entries of an array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DType {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "uint8")]
    U8,
    #[serde(rename = "uint16")]
    U16,
    #[serde(rename = "uint32")]
    U32,
    #[serde(rename = "uint64")]
    U64,
    #[serde(rename = "int8")]
    I8,
    #[serde(rename = "int16")]
    I16,
    #[serde(rename = "int32")]
    I32,
    #[serde(rename = "int64")]
    I64,
    #[serde(rename = "float32")]
    F32,
    /// Default dtype when nothing else is known
    #[default]
    #[serde(rename = "float64")]
    F64,
}

impl DType {
    /// All supported kinds, bottom of the lattice first.
    pub const ALL: [DType; 11] = [
        DType::Bool,
        DType::U8,
        DType::U16,
        DType::U32,
        DType::U64,
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::F32,
        DType::F64,
    ];

    /// Returns the size in bytes of one element.
    pub fn size_bytes(&self) -> usize {
        match self {
            DType::Bool | DType::U8 | DType::I8 => 1,
            DType::U16 | DType::I16 => 2,
            DType::U32 | DType::I32 | DType::F32 => 4,
            DType::U64 | DType::I64 | DType::F64 => 8,
        }
    }

    fn bits(&self) -> usize {
        self.size_bytes() * 8
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, DType::Bool)
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(self, DType::U8 | DType::U16 | DType::U32 | DType::U64)
    }

    pub fn is_signed(&self) -> bool {
        matches!(self, DType::I8 | DType::I16 | DType::I32 | DType::I64)
    }

    pub fn is_integer(&self) -> bool {
        self.is_unsigned() || self.is_signed()
    }

    pub fn is_float(&self) -> bool {
        matches!(self, DType::F32 | DType::F64)
    }

    /// The additive zero of this dtype.
    pub fn zero(&self) -> Scalar {
        Scalar::Bool(false).cast(*self)
    }

    /// Canonical (numpy-style) name, e.g. `"uint16"`.
    pub fn name(&self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::U8 => "uint8",
            DType::U16 => "uint16",
            DType::U32 => "uint32",
            DType::U64 => "uint64",
            DType::I8 => "int8",
            DType::I16 => "int16",
            DType::I32 => "int32",
            DType::I64 => "int64",
            DType::F32 => "float32",
            DType::F64 => "float64",
        }
    }

    fn signed_with_bits(bits: usize) -> Option<DType> {
        match bits {
            8 => Some(DType::I8),
            16 => Some(DType::I16),
            32 => Some(DType::I32),
            64 => Some(DType::I64),
            _ => None,
        }
    }

    /// Join of two dtypes: the smallest dtype both can be represented in.
    pub fn promote(self, other: DType) -> DType {
        if self == other {
            return self;
        }
        match (self, other) {
            (a, b) if a.is_bool() => b,
            (a, b) if b.is_bool() => a,
            (a, b) if a.is_float() && b.is_float() => DType::F64,
            (a, b) if a.is_float() || b.is_float() => {
                let (float, int) = if a.is_float() { (a, b) } else { (b, a) };
                if float == DType::F32 && int.bits() <= 16 {
                    DType::F32
                } else {
                    DType::F64
                }
            }
            (a, b) if a.is_unsigned() == b.is_unsigned() => {
                if a.bits() >= b.bits() {
                    a
                } else {
                    b
                }
            }
            (a, b) => {
                let (unsigned, signed) = if a.is_unsigned() { (a, b) } else { (b, a) };
                if unsigned.bits() < signed.bits() {
                    signed
                } else {
                    // u64 has no signed container
                    DType::signed_with_bits(unsigned.bits() * 2).unwrap_or(DType::F64)
                }
            }
        }
    }

    /// Join of every dtype yielded by `dtypes`; `None` if it is empty.
    ///
    /// Pairwise promotion is not associative once floats meet mixed-sign
    /// integers (`(u16 | i8) | f32` is `f64`, `u16 | (i8 | f32)` is `f32`), so
    /// integer kinds are joined first and floats last. The result does not
    /// depend on the order of `dtypes`.
    pub fn join_all<I>(dtypes: I) -> Option<DType>
    where
        I: IntoIterator<Item = DType>,
    {
        let (floats, ints): (Vec<DType>, Vec<DType>) =
            dtypes.into_iter().partition(DType::is_float);
        let int_join = ints.into_iter().reduce(DType::promote);
        let float_join = floats.into_iter().reduce(DType::promote);
        match (int_join, float_join) {
            (Some(i), Some(f)) => Some(i.promote(f)),
            (i, f) => i.or(f),
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DType {
    type Err = DokError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dtype = match s.trim().to_ascii_lowercase().as_str() {
            "bool" => DType::Bool,
            "uint8" | "u8" => DType::U8,
            "uint16" | "u16" => DType::U16,
            "uint32" | "u32" => DType::U32,
            "uint64" | "u64" => DType::U64,
            "int8" | "i8" => DType::I8,
            "int16" | "i16" => DType::I16,
            "int32" | "i32" => DType::I32,
            "int64" | "i64" | "int" => DType::I64,
            "float32" | "f32" => DType::F32,
            "float64" | "f64" | "float" => DType::F64,
            other => {
                return Err(DokError::invalid_input(format!(
                    "unknown dtype '{}'",
                    other
                )))
            }
        };
        Ok(dtype)
    }
}

/// A single dynamically-typed value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
}

macro_rules! cast_numeric {
    ($s:expr, $t:ty) => {
        match $s {
            Scalar::Bool(v) => v as u8 as $t,
            Scalar::U8(v) => v as $t,
            Scalar::U16(v) => v as $t,
            Scalar::U32(v) => v as $t,
            Scalar::U64(v) => v as $t,
            Scalar::I8(v) => v as $t,
            Scalar::I16(v) => v as $t,
            Scalar::I32(v) => v as $t,
            Scalar::I64(v) => v as $t,
            Scalar::F32(v) => v as $t,
            Scalar::F64(v) => v as $t,
        }
    };
}

impl Scalar {
    pub fn dtype(&self) -> DType {
        match self {
            Scalar::Bool(_) => DType::Bool,
            Scalar::U8(_) => DType::U8,
            Scalar::U16(_) => DType::U16,
            Scalar::U32(_) => DType::U32,
            Scalar::U64(_) => DType::U64,
            Scalar::I8(_) => DType::I8,
            Scalar::I16(_) => DType::I16,
            Scalar::I32(_) => DType::I32,
            Scalar::I64(_) => DType::I64,
            Scalar::F32(_) => DType::F32,
            Scalar::F64(_) => DType::F64,
        }
    }

    /// True for the additive zero of the scalar's own dtype. `-0.0` is zero, `NaN` is not.
    pub fn is_zero(&self) -> bool {
        match *self {
            Scalar::Bool(v) => !v,
            Scalar::U8(v) => v == 0,
            Scalar::U16(v) => v == 0,
            Scalar::U32(v) => v == 0,
            Scalar::U64(v) => v == 0,
            Scalar::I8(v) => v == 0,
            Scalar::I16(v) => v == 0,
            Scalar::I32(v) => v == 0,
            Scalar::I64(v) => v == 0,
            Scalar::F32(v) => v == 0.0,
            Scalar::F64(v) => v == 0.0,
        }
    }

    /// Convert to `dtype` with `as` semantics (floats truncate toward zero, bool is `!= 0`).
    pub fn cast(self, dtype: DType) -> Scalar {
        if self.dtype() == dtype {
            return self;
        }
        match dtype {
            DType::Bool => Scalar::Bool(!self.is_zero()),
            DType::U8 => Scalar::U8(cast_numeric!(self, u8)),
            DType::U16 => Scalar::U16(cast_numeric!(self, u16)),
            DType::U32 => Scalar::U32(cast_numeric!(self, u32)),
            DType::U64 => Scalar::U64(cast_numeric!(self, u64)),
            DType::I8 => Scalar::I8(cast_numeric!(self, i8)),
            DType::I16 => Scalar::I16(cast_numeric!(self, i16)),
            DType::I32 => Scalar::I32(cast_numeric!(self, i32)),
            DType::I64 => Scalar::I64(cast_numeric!(self, i64)),
            DType::F32 => Scalar::F32(cast_numeric!(self, f32)),
            DType::F64 => Scalar::F64(cast_numeric!(self, f64)),
        }
    }

    /// Lossy view as `f64`, mostly for comparisons.
    pub fn as_f64(&self) -> f64 {
        cast_numeric!(*self, f64)
    }

    /// The integer value for integer kinds; `None` for bool and floats.
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            Scalar::U8(v) => Some(v.into()),
            Scalar::U16(v) => Some(v.into()),
            Scalar::U32(v) => Some(v.into()),
            Scalar::U64(v) => Some(v.into()),
            Scalar::I8(v) => Some(v.into()),
            Scalar::I16(v) => Some(v.into()),
            Scalar::I32(v) => Some(v.into()),
            Scalar::I64(v) => Some(v.into()),
            Scalar::Bool(_) | Scalar::F32(_) | Scalar::F64(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Bool(v) => write!(f, "{}", v),
            Scalar::U8(v) => write!(f, "{}", v),
            Scalar::U16(v) => write!(f, "{}", v),
            Scalar::U32(v) => write!(f, "{}", v),
            Scalar::U64(v) => write!(f, "{}", v),
            Scalar::I8(v) => write!(f, "{}", v),
            Scalar::I16(v) => write!(f, "{}", v),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::F32(v) => write!(f, "{}", v),
            Scalar::F64(v) => write!(f, "{}", v),
        }
    }
}

/// Rust primitive types that can be stored in an array.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    const DTYPE: DType;

    fn into_scalar(self) -> Scalar;

    /// Cast `scalar` to this type.
    fn from_scalar(scalar: Scalar) -> Self;
}

macro_rules! impl_element {
    ($t:ty, $variant:ident, |$s:ident| $from:expr) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;

            #[inline]
            fn into_scalar(self) -> Scalar {
                Scalar::$variant(self)
            }

            #[inline]
            fn from_scalar($s: Scalar) -> Self {
                $from
            }
        }

        impl From<$t> for Scalar {
            fn from(value: $t) -> Self {
                Scalar::$variant(value)
            }
        }
    };
    ($t:ty, $variant:ident) => {
        impl_element!($t, $variant, |scalar| cast_numeric!(scalar, $t));
    };
}

impl_element!(bool, Bool, |scalar| !scalar.is_zero());
impl_element!(u8, U8);
impl_element!(u16, U16);
impl_element!(u32, U32);
impl_element!(u64, U64);
impl_element!(i8, I8);
impl_element!(i16, I16);
impl_element!(i32, I32);
impl_element!(i64, I64);
impl_element!(f32, F32);
impl_element!(f64, F64);
