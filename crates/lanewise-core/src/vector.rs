//! Tagged buffers and values for the dynamically-typed API.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_lossless,
    clippy::unnecessary_cast,
    clippy::should_implement_trait
)]

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::element::ElementKind;
use crate::error::{Error, Result};

/// Period of the canonical sequence built by [`Vector::sequence`].
pub const SEQUENCE_PERIOD: usize = 100;

macro_rules! tagged_types {
    ($($kind:ident => $ty:ident),*) => {
        /// One element of any kind.
        #[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind", content = "value", rename_all = "lowercase")]
        pub enum Value {
            $(
                #[allow(missing_docs)]
                $kind($ty),
            )*
        }

        /// An owned buffer of any kind.
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
        #[serde(tag = "kind", content = "values", rename_all = "lowercase")]
        pub enum Vector {
            $(
                #[allow(missing_docs)]
                $kind(Vec<$ty>),
            )*
        }

        /// A borrowed read-only buffer of any kind.
        #[derive(Debug, Clone, Copy, PartialEq)]
        pub enum VectorRef<'a> {
            $(
                #[allow(missing_docs)]
                $kind(&'a [$ty]),
            )*
        }

        /// A borrowed writable buffer of any kind.
        #[derive(Debug, PartialEq)]
        pub enum VectorMut<'a> {
            $(
                #[allow(missing_docs)]
                $kind(&'a mut [$ty]),
            )*
        }

        impl Value {
            /// Element kind of the value.
            #[must_use]
            pub const fn kind(&self) -> ElementKind {
                match self {
                    $(Value::$kind(_) => ElementKind::$kind,)*
                }
            }

            /// The value widened to `f64`, for reporting.
            #[must_use]
            pub fn as_f64(&self) -> f64 {
                match *self {
                    $(Value::$kind(v) => v as f64,)*
                }
            }
        }

        impl fmt::Display for Value {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Value::$kind(v) => fmt::Display::fmt(v, f),)*
                }
            }
        }

        impl Vector {
            /// `len` zeros of `kind`.
            #[must_use]
            pub fn zeros(kind: ElementKind, len: usize) -> Self {
                match kind {
                    $(ElementKind::$kind => Vector::$kind(vec![<$ty as crate::Numeric>::ZERO; len]),)*
                }
            }

            /// The canonical test and benchmark input: `v[i] = (i % 100) + 1`.
            ///
            /// Values stay within `1..=100`, so they fit every kind and never
            /// contain a zero divisor.
            #[must_use]
            pub fn sequence(kind: ElementKind, len: usize) -> Self {
                match kind {
                    $(
                        ElementKind::$kind => Vector::$kind(
                            (0..len).map(|i| ((i % SEQUENCE_PERIOD) + 1) as $ty).collect(),
                        ),
                    )*
                }
            }

            /// Parses one token per element.
            ///
            /// # Errors
            ///
            /// [`Error::InvalidValue`] naming the first token that does not parse.
            pub fn parse<S: AsRef<str>>(kind: ElementKind, tokens: &[S]) -> Result<Self> {
                match kind {
                    $(
                        ElementKind::$kind => tokens
                            .iter()
                            .map(|token| {
                                let token: &str = token.as_ref();
                                token.trim().parse::<$ty>().map_err(|_| Error::InvalidValue {
                                    kind,
                                    value: token.to_string(),
                                })
                            })
                            .collect::<Result<Vec<_>>>()
                            .map(Vector::$kind),
                    )*
                }
            }

            /// Element kind of the buffer.
            #[must_use]
            pub const fn kind(&self) -> ElementKind {
                match self {
                    $(Vector::$kind(_) => ElementKind::$kind,)*
                }
            }

            /// Number of elements.
            #[must_use]
            pub fn len(&self) -> usize {
                self.as_ref().len()
            }

            /// Returns `true` if the buffer holds no elements.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Borrows the buffer read-only.
            #[must_use]
            pub fn as_ref(&self) -> VectorRef<'_> {
                match self {
                    $(Vector::$kind(values) => VectorRef::$kind(values),)*
                }
            }

            /// Borrows the buffer writably.
            #[must_use]
            pub fn as_mut(&mut self) -> VectorMut<'_> {
                match self {
                    $(Vector::$kind(values) => VectorMut::$kind(values),)*
                }
            }

            /// Element `index` as a tagged value.
            #[must_use]
            pub fn get(&self, index: usize) -> Option<Value> {
                match self {
                    $(Vector::$kind(values) => values.get(index).copied().map(Value::$kind),)*
                }
            }
        }

        impl VectorRef<'_> {
            /// Element kind of the buffer.
            #[must_use]
            pub const fn kind(&self) -> ElementKind {
                match self {
                    $(VectorRef::$kind(_) => ElementKind::$kind,)*
                }
            }

            /// Number of elements.
            #[must_use]
            pub const fn len(&self) -> usize {
                match self {
                    $(VectorRef::$kind(values) => values.len(),)*
                }
            }

            /// Returns `true` if the buffer holds no elements.
            #[must_use]
            pub const fn is_empty(&self) -> bool {
                self.len() == 0
            }

            /// Copies the elements into an owned buffer.
            #[must_use]
            pub fn to_vector(&self) -> Vector {
                match self {
                    $(VectorRef::$kind(values) => Vector::$kind(values.to_vec()),)*
                }
            }
        }

        impl VectorMut<'_> {
            /// Element kind of the buffer.
            #[must_use]
            pub const fn kind(&self) -> ElementKind {
                match self {
                    $(VectorMut::$kind(_) => ElementKind::$kind,)*
                }
            }

            /// Number of elements.
            #[must_use]
            pub fn len(&self) -> usize {
                match self {
                    $(VectorMut::$kind(values) => values.len(),)*
                }
            }

            /// Returns `true` if the buffer holds no elements.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.len() == 0
            }
        }

        impl fmt::Display for Vector {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Vector::$kind(values) => write_values(f, values),)*
                }
            }
        }

        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    Value::$kind(value)
                }
            }

            impl From<Vec<$ty>> for Vector {
                fn from(values: Vec<$ty>) -> Self {
                    Vector::$kind(values)
                }
            }

            impl<'a> From<&'a [$ty]> for VectorRef<'a> {
                fn from(values: &'a [$ty]) -> Self {
                    VectorRef::$kind(values)
                }
            }

            impl<'a> From<&'a mut [$ty]> for VectorMut<'a> {
                fn from(values: &'a mut [$ty]) -> Self {
                    VectorMut::$kind(values)
                }
            }
        )*
    };
}

with_kinds!(tagged_types);

fn write_values<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    f.write_str("[")?;
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{v}")?;
    }
    f.write_str("]")
}
