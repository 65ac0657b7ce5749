//! Accelerated kernel tables.
//!
//! # Module Structure
//!
//! - `lanes`: block-structured loops shared by every ISA, vectorized by
//!   inlining into a `#[target_feature]` wrapper
//! - `x86_avx2`: AVX2 kernels (x86_64 only); `f32`/`f64` use explicit intrinsics
//! - `neon`: NEON kernels (aarch64 only); `f32` uses explicit intrinsics
//!
//! # Calling contract
//!
//! Every kernel takes raw addresses and an element count:
//!
//! - reductions: `(input, result, len)`, writing one element to `result`
//! - arithmetic: `(lhs, rhs, out, len)`, writing `len` elements to `out`
//!
//! A kernel touches only `[addr, addr + len * size_of::<T>())` of each buffer.
//! Callers guarantee `len >= 1`, valid non-null pointers, that the CPU supports
//! the kernel's extension, and for integer division that no divisor is zero.
//! `out` may equal `lhs` or `rhs`: each block is fully loaded before it is stored.

// =============================================================================
// Unsafe Invariants Reference
// =============================================================================
// SAFETY: Shared invariants for unsafe blocks in this module tree.
// - Condition 1: Pointer offsets stay below `len`; loop bounds are derived from `len`.
// - Condition 2: Target-featured functions are reached only through a `KernelSet`
//   returned by `Sealed::kernels`, which requires the matching capability flag,
//   itself a subset of the processor's detected features.
// - Condition 3: Loads and stores are unaligned (`loadu`/`vld1q`/`copy_nonoverlapping`).

use crate::capability::Capabilities;
use crate::element::{sealed, Element, ElementKind};
use crate::op::{BinaryOp, ReduceOp};

mod lanes;

#[cfg(target_arch = "x86_64")]
mod x86_avx2;

#[cfg(target_arch = "aarch64")]
mod neon;

/// Reduction kernel: `(input, result, len)`.
pub type ReduceKernel<T> = unsafe fn(*const T, *mut T, usize);

/// Paired arithmetic kernel: `(lhs, rhs, out, len)`.
pub type BinaryKernel<T> = unsafe fn(*const T, *const T, *mut T, usize);

/// The seven kernels of one element type on one extension.
pub struct KernelSet<T> {
    pub(crate) sum: ReduceKernel<T>,
    pub(crate) min: ReduceKernel<T>,
    pub(crate) max: ReduceKernel<T>,
    pub(crate) add: BinaryKernel<T>,
    pub(crate) sub: BinaryKernel<T>,
    pub(crate) mul: BinaryKernel<T>,
    pub(crate) div: BinaryKernel<T>,
}

impl<T> Clone for KernelSet<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for KernelSet<T> {}

impl<T> KernelSet<T> {
    pub(crate) fn reduce(&self, op: ReduceOp) -> ReduceKernel<T> {
        match op {
            ReduceOp::Sum => self.sum,
            ReduceOp::Min => self.min,
            ReduceOp::Max => self.max,
        }
    }

    pub(crate) fn binary(&self, op: BinaryOp) -> BinaryKernel<T> {
        match op {
            BinaryOp::Add => self.add,
            BinaryOp::Sub => self.sub,
            BinaryOp::Mul => self.mul,
            BinaryOp::Div => self.div,
        }
    }
}

macro_rules! impl_element {
    ($($kind:ident => $ty:ident),*) => {
        paste::paste! {
            $(
                impl sealed::Sealed for $ty {
                    #[inline(always)]
                    fn kernels(caps: Capabilities) -> Option<KernelSet<Self>> {
                        #[cfg(target_arch = "x86_64")]
                        if caps.avx2 {
                            return Some(x86_avx2::[<KERNELS_ $ty:upper>]);
                        }

                        #[cfg(target_arch = "aarch64")]
                        if caps.neon {
                            return Some(neon::[<KERNELS_ $ty:upper>]);
                        }

                        let _ = caps;
                        None
                    }
                }

                impl Element for $ty {
                    const KIND: ElementKind = ElementKind::$kind;
                }
            )*
        }
    };
}

with_kinds!(impl_element);
