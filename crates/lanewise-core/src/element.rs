//! Element kinds and the numeric traits both engines are written against.
//!
//! [`Numeric`] is the open trait the scalar engine needs: any `Copy` numeric type
//! can implement it and use the generic adapter. [`Element`] is the sealed subset
//! with accelerated kernels, one impl per [`ElementKind`].

use std::any::TypeId;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The closed set of element kinds with accelerated kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// 8-bit unsigned integer.
    U8,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit unsigned integer.
    U32,
    /// 64-bit unsigned integer.
    U64,
    /// 8-bit signed integer.
    I8,
    /// 16-bit signed integer.
    I16,
    /// 32-bit signed integer.
    I32,
    /// 64-bit signed integer.
    I64,
    /// 32-bit IEEE 754 float.
    F32,
    /// 64-bit IEEE 754 float.
    F64,
}

macro_rules! element_kind_table {
    ($($kind:ident => $ty:ident),*) => {
        impl ElementKind {
            /// Every kind, in declaration order.
            pub const ALL: [ElementKind; 10] = [$(ElementKind::$kind),*];

            /// Canonical lowercase name (`"u8"`, `"f64"`, ...).
            #[must_use]
            pub const fn name(self) -> &'static str {
                match self {
                    $(ElementKind::$kind => stringify!($ty),)*
                }
            }

            /// Width of one element in bytes.
            #[must_use]
            pub const fn size(self) -> usize {
                match self {
                    $(ElementKind::$kind => std::mem::size_of::<$ty>(),)*
                }
            }

            /// Resolves the runtime kind of `T`, or `None` when `T` is outside
            /// the accelerated set.
            #[must_use]
            pub fn of<T: 'static>() -> Option<Self> {
                let id = TypeId::of::<T>();
                $(
                    if id == TypeId::of::<$ty>() {
                        return Some(ElementKind::$kind);
                    }
                )*
                None
            }
        }
    };
}

with_kinds!(element_kind_table);

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ElementKind {
    type Err = Error;

    /// Accepts the short names (`u8`, `f32`) and the long ones (`uint8`, `float32`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_lowercase().as_str() {
            "u8" | "uint8" => ElementKind::U8,
            "u16" | "uint16" => ElementKind::U16,
            "u32" | "uint32" => ElementKind::U32,
            "u64" | "uint64" => ElementKind::U64,
            "i8" | "int8" => ElementKind::I8,
            "i16" | "int16" => ElementKind::I16,
            "i32" | "int32" => ElementKind::I32,
            "i64" | "int64" => ElementKind::I64,
            "f32" | "float32" => ElementKind::F32,
            "f64" | "float64" => ElementKind::F64,
            _ => return Err(Error::UnknownKind(s.to_string())),
        };
        Ok(kind)
    }
}

/// Arithmetic the scalar engine is generic over.
///
/// Integer implementations wrap on overflow, including `MIN / -1`. Integer
/// division by zero panics; the dispatch layer rejects zero divisors before any
/// output is written, so callers going through it never reach that panic
/// mid-buffer.
pub trait Numeric: Copy + PartialOrd + fmt::Debug + Send + Sync + 'static {
    /// Additive identity.
    const ZERO: Self;
    /// `true` for integer types, whose division traps on a zero divisor.
    const INTEGRAL: bool;

    /// `self + rhs` in the type's native arithmetic.
    fn lane_add(self, rhs: Self) -> Self;
    /// `self - rhs` in the type's native arithmetic.
    fn lane_sub(self, rhs: Self) -> Self;
    /// `self * rhs` in the type's native arithmetic.
    fn lane_mul(self, rhs: Self) -> Self;
    /// `self / rhs`: truncating for integers, IEEE 754 for floats.
    fn lane_div(self, rhs: Self) -> Self;
    /// Returns `true` if the value equals zero.
    fn is_zero(self) -> bool;
}

macro_rules! impl_numeric_integer {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                const ZERO: Self = 0;
                const INTEGRAL: bool = true;

                #[inline(always)]
                fn lane_add(self, rhs: Self) -> Self {
                    self.wrapping_add(rhs)
                }

                #[inline(always)]
                fn lane_sub(self, rhs: Self) -> Self {
                    self.wrapping_sub(rhs)
                }

                #[inline(always)]
                fn lane_mul(self, rhs: Self) -> Self {
                    self.wrapping_mul(rhs)
                }

                #[inline(always)]
                fn lane_div(self, rhs: Self) -> Self {
                    self.wrapping_div(rhs)
                }

                #[inline(always)]
                fn is_zero(self) -> bool {
                    self == 0
                }
            }
        )*
    };
}

macro_rules! impl_numeric_float {
    ($($ty:ty),*) => {
        $(
            impl Numeric for $ty {
                const ZERO: Self = 0.0;
                const INTEGRAL: bool = false;

                #[inline(always)]
                fn lane_add(self, rhs: Self) -> Self {
                    self + rhs
                }

                #[inline(always)]
                fn lane_sub(self, rhs: Self) -> Self {
                    self - rhs
                }

                #[inline(always)]
                fn lane_mul(self, rhs: Self) -> Self {
                    self * rhs
                }

                #[inline(always)]
                fn lane_div(self, rhs: Self) -> Self {
                    self / rhs
                }

                #[inline(always)]
                fn is_zero(self) -> bool {
                    self == 0.0
                }
            }
        )*
    };
}

impl_numeric_integer!(u8, u16, u32, u64, usize, i8, i16, i32, i64, isize);
impl_numeric_float!(f32, f64);

pub(crate) mod sealed {
    use crate::capability::Capabilities;
    use crate::kernels::KernelSet;

    pub trait Sealed: Sized {
        /// Kernel table for this type under `caps`, or `None` for the scalar path.
        fn kernels(caps: Capabilities) -> Option<KernelSet<Self>>;
    }
}

/// An element kind with accelerated kernels. Implemented for exactly the ten
/// [`ElementKind`] types.
pub trait Element: Numeric + sealed::Sealed {
    /// The runtime tag for this type.
    const KIND: ElementKind;
}
