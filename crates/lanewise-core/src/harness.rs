//! Scalar versus accelerated comparison harness.
//!
//! Runs one operation on the canonical sequence ([`Vector::sequence`]) under a
//! scalar-only override and under the detected capabilities, and reports
//! latency percentiles for both paths.
//!
//! The harness installs [`CapabilityOverride`]s, so it must not run while other
//! threads are dispatching.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::capability::{self, Capabilities, CapabilityOverride, SimdLevel};
use crate::element::ElementKind;
use crate::error::{Error, Result};
use crate::generic;
use crate::op::Op;
use crate::vector::Vector;

/// Statistics for latency measurements including percentiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct LatencyStats {
    /// Minimum latency observed
    pub min: Duration,
    /// Maximum latency observed
    pub max: Duration,
    /// Mean (average) latency
    pub mean: Duration,
    /// 50th percentile (median)
    pub p50: Duration,
    /// 95th percentile
    pub p95: Duration,
    /// 99th percentile
    pub p99: Duration,
}

/// Computes latency percentiles from a list of duration samples.
///
/// Returns all-zero statistics for an empty list.
///
/// ```rust
/// use std::time::Duration;
/// use lanewise_core::harness::compute_latency_percentiles;
///
/// let samples: Vec<Duration> = (1..=100)
///     .map(|i| Duration::from_micros(i * 10))
///     .collect();
///
/// let stats = compute_latency_percentiles(&samples);
/// assert!(stats.p99 > stats.p50);
/// ```
#[must_use]
pub fn compute_latency_percentiles(samples: &[Duration]) -> LatencyStats {
    if samples.is_empty() {
        return LatencyStats::default();
    }

    let mut sorted = samples.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let sum: Duration = sorted.iter().sum();

    // The mean cannot exceed the largest sample, which fits in u64 nanoseconds.
    #[allow(clippy::cast_possible_truncation)]
    let mean = Duration::from_nanos((sum.as_nanos() / n as u128) as u64);

    LatencyStats {
        min: sorted[0],
        max: sorted[n - 1],
        mean,
        p50: percentile(&sorted, 50),
        p95: percentile(&sorted, 95),
        p99: percentile(&sorted, 99),
    }
}

/// Nearest-rank percentile of a sorted, non-empty list.
fn percentile(sorted: &[Duration], p: usize) -> Duration {
    let n = sorted.len();
    // p is in [0, 100], so the rounded index is in [0, n - 1].
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let idx = ((p as f64 / 100.0) * (n - 1) as f64).round() as usize;
    sorted[idx.min(n - 1)]
}

/// One operation measured on both paths.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    /// Element kind.
    pub kind: ElementKind,
    /// Operation.
    pub op: Op,
    /// Elements per call.
    pub size: usize,
    /// Timed calls per path.
    pub iterations: usize,
    /// Path used for the accelerated run.
    pub level: SimdLevel,
    /// Scalar engine latencies.
    pub scalar: LatencyStats,
    /// Dispatched latencies under the detected capabilities.
    pub accelerated: LatencyStats,
    /// `scalar.p50 / accelerated.p50`.
    pub speedup: f64,
}

impl Comparison {
    /// Scalar throughput in elements per second, from the median latency.
    #[must_use]
    pub fn scalar_rate(&self) -> f64 {
        rate(self.size, self.scalar.p50)
    }

    /// Accelerated throughput in elements per second, from the median latency.
    #[must_use]
    pub fn accelerated_rate(&self) -> f64 {
        rate(self.size, self.accelerated.p50)
    }
}

#[allow(clippy::cast_precision_loss)]
fn rate(size: usize, latency: Duration) -> f64 {
    let secs = latency.as_secs_f64();
    if secs == 0.0 {
        return 0.0;
    }
    size as f64 / secs
}

fn speedup(scalar: Duration, accelerated: Duration) -> f64 {
    match (scalar.is_zero(), accelerated.is_zero()) {
        (true, true) => 1.0,
        (false, true) => f64::INFINITY,
        _ => scalar.as_secs_f64() / accelerated.as_secs_f64(),
    }
}

/// Times `iterations` calls of `op` over `size` elements of `kind` on both paths.
///
/// # Errors
///
/// [`Error::EmptyInput`] for a reduction with `size == 0`.
pub fn compare(kind: ElementKind, op: Op, size: usize, iterations: usize) -> Result<Comparison> {
    if size == 0 && op.as_reduce().is_some() {
        return Err(Error::EmptyInput { op });
    }

    let input = Vector::sequence(kind, size);
    let mut out = Vector::zeros(kind, size);
    let accelerated_caps = capability::detected();

    let scalar = measure(Capabilities::scalar_only(), op, &input, &mut out, iterations)?;
    let accelerated = measure(accelerated_caps, op, &input, &mut out, iterations)?;

    let comparison = Comparison {
        kind,
        op,
        size,
        iterations,
        level: accelerated_caps.level(),
        speedup: speedup(scalar.p50, accelerated.p50),
        scalar,
        accelerated,
    };
    tracing::debug!(
        kind = %kind,
        op = %op,
        size,
        speedup = comparison.speedup,
        "comparison finished"
    );
    Ok(comparison)
}

/// Runs [`compare`] for every kind, operation and size.
///
/// # Errors
///
/// The first error from [`compare`] (an empty size for a reduction).
pub fn compare_all(sizes: &[usize], iterations: usize) -> Result<Vec<Comparison>> {
    tracing::info!(
        sizes = ?sizes,
        iterations,
        level = %capability::detected().level(),
        "comparing scalar and accelerated paths"
    );
    let mut results = Vec::with_capacity(ElementKind::ALL.len() * Op::ALL.len() * sizes.len());
    for kind in ElementKind::ALL {
        for op in Op::ALL {
            for &size in sizes {
                results.push(compare(kind, op, size, iterations)?);
            }
        }
    }
    Ok(results)
}

fn measure(
    caps: Capabilities,
    op: Op,
    input: &Vector,
    out: &mut Vector,
    iterations: usize,
) -> Result<LatencyStats> {
    let _guard = CapabilityOverride::new(caps);
    let mut samples = Vec::with_capacity(iterations);

    for _ in 0..iterations {
        let start = Instant::now();
        if op.as_reduce().is_some() {
            std::hint::black_box(generic::reduce(op, input.as_ref())?);
        } else {
            generic::apply_into(op, out.as_mut(), input.as_ref(), input.as_ref())?;
            std::hint::black_box(&*out);
        }
        samples.push(start.elapsed());
    }

    Ok(compute_latency_percentiles(&samples))
}
