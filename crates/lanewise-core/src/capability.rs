//! Processor capability detection.
//!
//! Flags are computed once per process and cached. Dispatch reads them through
//! [`current`], which costs one `OnceLock` read and one relaxed atomic load.
//!
//! # Overrides
//!
//! [`CapabilityOverride`] temporarily replaces the effective flags so both
//! execution paths can be compared inside one process. The override is a
//! process-wide global: any dispatch call running concurrently on another
//! thread observes it too. Tests that override must be serialized against every
//! other test that dispatches.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::config::DispatchConfig;
use crate::error::{Error, Result};

/// An instruction-set extension with accelerated kernels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Isa {
    /// x86_64 AVX2 (256-bit integer and float vectors).
    Avx2,
    /// aarch64 Advanced SIMD (128-bit vectors).
    Neon,
}

impl Isa {
    /// Every known extension.
    pub const ALL: [Isa; 2] = [Isa::Avx2, Isa::Neon];

    /// Lowercase name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Isa::Avx2 => "avx2",
            Isa::Neon => "neon",
        }
    }

    const fn bit(self) -> u8 {
        match self {
            Isa::Avx2 => 0b01,
            Isa::Neon => 0b10,
        }
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Isa {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Isa::ALL
            .into_iter()
            .find(|isa| isa.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::UnknownIsa(s.to_string()))
    }
}

/// Best execution path a set of capabilities allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SimdLevel {
    /// AVX2 kernels (x86_64 only).
    Avx2,
    /// NEON kernels (aarch64 only).
    Neon,
    /// Scalar engine.
    Scalar,
}

impl fmt::Display for SimdLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SimdLevel::Avx2 => "avx2",
            SimdLevel::Neon => "neon",
            SimdLevel::Scalar => "scalar",
        })
    }
}

/// One flag per supported instruction-set extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Capabilities {
    /// AVX2 kernels may run.
    pub avx2: bool,
    /// NEON kernels may run.
    pub neon: bool,
}

impl Capabilities {
    /// No accelerated extension: everything routes to the scalar engine.
    #[must_use]
    pub const fn scalar_only() -> Self {
        Self {
            avx2: false,
            neon: false,
        }
    }

    /// Queries the running processor. Absent features are simply `false`.
    #[must_use]
    pub fn detect() -> Self {
        #[allow(unused_mut)]
        let mut caps = Self::scalar_only();

        #[cfg(target_arch = "x86_64")]
        {
            caps.avx2 = is_x86_feature_detected!("avx2");
        }

        #[cfg(target_arch = "aarch64")]
        {
            caps.neon = std::arch::is_aarch64_feature_detected!("neon");
        }

        caps
    }

    /// Returns `true` if `isa` is enabled.
    #[must_use]
    pub const fn contains(self, isa: Isa) -> bool {
        self.to_bits() & isa.bit() != 0
    }

    /// Copy with `isa` enabled.
    #[must_use]
    pub const fn with(self, isa: Isa) -> Self {
        Self::from_bits(self.to_bits() | isa.bit())
    }

    /// Copy with `isa` disabled.
    #[must_use]
    pub const fn without(self, isa: Isa) -> Self {
        Self::from_bits(self.to_bits() & !isa.bit())
    }

    /// Flags enabled in both.
    #[must_use]
    pub const fn intersect(self, other: Self) -> Self {
        Self::from_bits(self.to_bits() & other.to_bits())
    }

    /// Applies a dispatch configuration on top of detected flags.
    #[must_use]
    pub fn masked(self, config: &DispatchConfig) -> Self {
        Isa::ALL
            .into_iter()
            .filter(|isa| !config.allows(*isa))
            .fold(self, Self::without)
    }

    /// Enabled extensions.
    pub fn isas(self) -> impl Iterator<Item = Isa> {
        Isa::ALL.into_iter().filter(move |isa| self.contains(*isa))
    }

    /// The path dispatch takes under these flags.
    #[must_use]
    pub const fn level(self) -> SimdLevel {
        if self.avx2 && cfg!(target_arch = "x86_64") {
            SimdLevel::Avx2
        } else if self.neon && cfg!(target_arch = "aarch64") {
            SimdLevel::Neon
        } else {
            SimdLevel::Scalar
        }
    }

    const fn to_bits(self) -> u8 {
        (if self.avx2 { Isa::Avx2.bit() } else { 0 }) | (if self.neon { Isa::Neon.bit() } else { 0 })
    }

    const fn from_bits(bits: u8) -> Self {
        Self {
            avx2: bits & Isa::Avx2.bit() != 0,
            neon: bits & Isa::Neon.bit() != 0,
        }
    }
}

impl fmt::Display for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut any = false;
        for isa in self.isas() {
            if any {
                f.write_str("+")?;
            }
            f.write_str(isa.name())?;
            any = true;
        }
        if !any {
            f.write_str("scalar")?;
        }
        Ok(())
    }
}

// =============================================================================
// Process-wide state
// =============================================================================

static HARDWARE: OnceLock<Capabilities> = OnceLock::new();
static DETECTED: OnceLock<Capabilities> = OnceLock::new();

const NO_OVERRIDE: u8 = u8::MAX;
static OVERRIDE: AtomicU8 = AtomicU8::new(NO_OVERRIDE);

/// Raw processor capabilities, ignoring configuration.
#[must_use]
pub fn hardware() -> Capabilities {
    *HARDWARE.get_or_init(Capabilities::detect)
}

/// Value stored in `DETECTED`, logged once when it is installed.
fn installed(caps: Capabilities) -> Capabilities {
    tracing::debug!(
        hardware = %hardware(),
        effective = %caps,
        level = %caps.level(),
        "detected SIMD capabilities"
    );
    caps
}

/// Capabilities dispatch uses when no override is active.
///
/// Initialized on first use from the processor, masked by
/// `LANEWISE_DISPATCH__*` environment settings, unless [`configure`] ran first.
#[must_use]
pub fn detected() -> Capabilities {
    *DETECTED.get_or_init(|| {
        let config = DispatchConfig::from_env().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "ignoring invalid dispatch environment configuration");
            DispatchConfig::default()
        });
        installed(hardware().masked(&config))
    })
}

/// Installs the process dispatch configuration.
///
/// Must run before the first dispatch call. Calling it again with a
/// configuration that yields the same flags is a no-op.
///
/// # Errors
///
/// [`Error::AlreadyInitialized`] if detection already ran and produced
/// different flags.
pub fn configure(config: &DispatchConfig) -> Result<Capabilities> {
    let caps = hardware().masked(config);
    let active = *DETECTED.get_or_init(|| installed(caps));
    if active == caps {
        Ok(caps)
    } else {
        Err(Error::AlreadyInitialized)
    }
}

/// Capabilities the next dispatch call will use.
#[inline]
#[must_use]
pub fn current() -> Capabilities {
    match OVERRIDE.load(Ordering::Relaxed) {
        NO_OVERRIDE => detected(),
        bits => Capabilities::from_bits(bits),
    }
}

/// Returns the dispatch level currently in effect.
#[inline]
#[must_use]
pub fn simd_level() -> SimdLevel {
    current().level()
}

/// Scoped replacement of the effective capabilities.
///
/// Requested flags are intersected with [`hardware`], so an override can turn
/// paths off but never routes to instructions the processor lacks. The previous
/// state is restored on drop, including during unwinding. Guards must be
/// dropped in reverse creation order.
///
/// Not safe to combine with dispatch calls on other threads: they observe the
/// override for its whole lifetime.
///
/// ```
/// use lanewise_core::{sum_u32, CapabilityOverride};
///
/// let data = [1_u32, 2, 3];
/// let scalar = {
///     let _guard = CapabilityOverride::scalar_only();
///     sum_u32(&data)
/// };
/// assert_eq!(scalar, sum_u32(&data));
/// ```
#[derive(Debug)]
#[must_use = "the override is reverted as soon as the guard is dropped"]
pub struct CapabilityOverride {
    previous: u8,
    effective: Capabilities,
}

impl CapabilityOverride {
    /// Activates `requested` (masked by the hardware) until the guard drops.
    pub fn new(requested: Capabilities) -> Self {
        let effective = requested.intersect(hardware());
        if effective != requested {
            tracing::warn!(
                requested = %requested,
                effective = %effective,
                "capability override requests features this processor lacks"
            );
        }
        let previous = OVERRIDE.swap(effective.to_bits(), Ordering::SeqCst);
        Self {
            previous,
            effective,
        }
    }

    /// Forces the scalar engine until the guard drops.
    pub fn scalar_only() -> Self {
        Self::new(Capabilities::scalar_only())
    }

    /// Enables everything the processor supports, ignoring configuration.
    pub fn hardware() -> Self {
        Self::new(hardware())
    }

    /// Flags in effect while this guard lives.
    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.effective
    }
}

impl Drop for CapabilityOverride {
    fn drop(&mut self) {
        OVERRIDE.store(self.previous, Ordering::SeqCst);
    }
}

/// Runs `f` with `caps` in effect, then restores the previous state.
pub fn with_capabilities<R>(caps: Capabilities, f: impl FnOnce() -> R) -> R {
    let _guard = CapabilityOverride::new(caps);
    f()
}
