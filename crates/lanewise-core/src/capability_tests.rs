//! Tests for capability detection and scoped overrides.

use std::io;
use std::sync::{Arc, Mutex};

use serial_test::{parallel, serial};
use tracing_subscriber::fmt::MakeWriter;

use super::capability::{self, Capabilities, CapabilityOverride, Isa, SimdLevel};
use super::config::DispatchConfig;

// ============================================================================
// Capabilities value type
// ============================================================================

#[test]
fn test_scalar_only_has_no_flags() {
    let caps = Capabilities::scalar_only();
    assert!(!caps.avx2);
    assert!(!caps.neon);
    assert_eq!(caps.isas().count(), 0);
    assert_eq!(caps.level(), SimdLevel::Scalar);
    assert_eq!(caps, Capabilities::default());
}

#[test]
fn test_with_and_without_toggle_single_flag() {
    let caps = Capabilities::scalar_only().with(Isa::Avx2);
    assert!(caps.contains(Isa::Avx2));
    assert!(!caps.contains(Isa::Neon));

    let both = caps.with(Isa::Neon);
    assert_eq!(both.isas().collect::<Vec<_>>(), vec![Isa::Avx2, Isa::Neon]);

    let neon_only = both.without(Isa::Avx2);
    assert!(!neon_only.avx2);
    assert!(neon_only.neon);
}

#[test]
fn test_intersect_keeps_common_flags() {
    let avx2 = Capabilities::scalar_only().with(Isa::Avx2);
    let both = avx2.with(Isa::Neon);
    assert_eq!(both.intersect(avx2), avx2);
    assert_eq!(avx2.intersect(Capabilities::scalar_only()), Capabilities::scalar_only());
}

#[test]
fn test_masked_by_force_scalar() {
    let both = Capabilities::scalar_only().with(Isa::Avx2).with(Isa::Neon);
    let config = DispatchConfig {
        force_scalar: true,
        disabled: Vec::new(),
    };
    assert_eq!(both.masked(&config), Capabilities::scalar_only());
}

#[test]
fn test_masked_by_disabled_list() {
    let both = Capabilities::scalar_only().with(Isa::Avx2).with(Isa::Neon);
    let config = DispatchConfig {
        force_scalar: false,
        disabled: vec![Isa::Avx2],
    };
    let masked = both.masked(&config);
    assert!(!masked.avx2);
    assert!(masked.neon);
}

#[test]
fn test_default_config_masks_nothing() {
    let both = Capabilities::scalar_only().with(Isa::Avx2).with(Isa::Neon);
    assert_eq!(both.masked(&DispatchConfig::default()), both);
}

#[test]
fn test_level_matches_target_architecture() {
    let avx2 = Capabilities::scalar_only().with(Isa::Avx2);
    let neon = Capabilities::scalar_only().with(Isa::Neon);

    if cfg!(target_arch = "x86_64") {
        assert_eq!(avx2.level(), SimdLevel::Avx2);
        assert_eq!(neon.level(), SimdLevel::Scalar);
    } else if cfg!(target_arch = "aarch64") {
        assert_eq!(avx2.level(), SimdLevel::Scalar);
        assert_eq!(neon.level(), SimdLevel::Neon);
    } else {
        assert_eq!(avx2.level(), SimdLevel::Scalar);
        assert_eq!(neon.level(), SimdLevel::Scalar);
    }
}

#[test]
fn test_display() {
    assert_eq!(Capabilities::scalar_only().to_string(), "scalar");
    assert_eq!(Capabilities::scalar_only().with(Isa::Avx2).to_string(), "avx2");
    assert_eq!(
        Capabilities::scalar_only()
            .with(Isa::Neon)
            .with(Isa::Avx2)
            .to_string(),
        "avx2+neon"
    );
    assert_eq!(SimdLevel::Neon.to_string(), "neon");
}

#[test]
fn test_isa_from_str() {
    assert_eq!("avx2".parse::<Isa>().ok(), Some(Isa::Avx2));
    assert_eq!(" NEON ".parse::<Isa>().ok(), Some(Isa::Neon));
    assert!("sse2".parse::<Isa>().is_err());
}

// ============================================================================
// Detection
// ============================================================================

#[test]
fn test_hardware_is_cached_and_matches_detect() {
    assert_eq!(capability::hardware(), capability::hardware());
    assert_eq!(capability::hardware(), Capabilities::detect());
}

#[test]
fn test_detect_only_reports_native_extensions() {
    let caps = Capabilities::detect();
    if !cfg!(target_arch = "x86_64") {
        assert!(!caps.avx2);
    }
    if !cfg!(target_arch = "aarch64") {
        assert!(!caps.neon);
    }
}

#[test]
#[parallel(dispatch)]
fn test_detected_is_subset_of_hardware() {
    let detected = capability::detected();
    assert_eq!(detected.intersect(capability::hardware()), detected);
}

#[test]
#[serial(dispatch)]
fn test_configure_with_installed_flags_is_idempotent() {
    let installed = capability::detected();
    let config = DispatchConfig {
        force_scalar: false,
        disabled: Isa::ALL
            .into_iter()
            .filter(|isa| !installed.contains(*isa))
            .collect(),
    };
    assert_eq!(capability::configure(&config).ok(), Some(installed));
}

#[test]
#[serial(dispatch)]
fn test_configure_after_detection_with_other_flags_fails() {
    let installed = capability::detected();
    if installed == Capabilities::scalar_only() {
        // Any configuration resolves to scalar-only here, so nothing can conflict.
        return;
    }
    let config = DispatchConfig {
        force_scalar: true,
        disabled: Vec::new(),
    };
    assert!(matches!(
        capability::configure(&config),
        Err(crate::Error::AlreadyInitialized)
    ));
    assert_eq!(capability::detected(), installed);
}

/// Log sink for one test's scoped subscriber.
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = Self;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
#[serial(dispatch)]
fn test_configure_after_detection_logs_nothing() {
    let _ = capability::detected();
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let _ = capability::configure(&DispatchConfig::default());
        let _ = capability::configure(&DispatchConfig {
            force_scalar: true,
            disabled: Vec::new(),
        });
        // Neither extension exists on both architectures, so this always warns.
        let _guard = CapabilityOverride::new(Capabilities::scalar_only().with(Isa::Avx2).with(Isa::Neon));
    });

    let output = logs.contents();
    assert!(output.contains("capability override requests features"), "{output}");
    assert!(!output.contains("detected SIMD capabilities"), "{output}");
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
#[serial(dispatch)]
fn test_override_scalar_only_then_restore() {
    let before = capability::current();
    {
        let guard = CapabilityOverride::scalar_only();
        assert_eq!(guard.capabilities(), Capabilities::scalar_only());
        assert_eq!(capability::current(), Capabilities::scalar_only());
        assert_eq!(capability::simd_level(), SimdLevel::Scalar);
    }
    assert_eq!(capability::current(), before);
}

#[test]
#[serial(dispatch)]
fn test_override_never_exceeds_hardware() {
    let everything = Capabilities::scalar_only().with(Isa::Avx2).with(Isa::Neon);
    let guard = CapabilityOverride::new(everything);
    assert_eq!(guard.capabilities(), capability::hardware());
    assert_eq!(capability::current(), capability::hardware());
}

#[test]
#[serial(dispatch)]
fn test_override_hardware_ignores_configuration() {
    let guard = CapabilityOverride::hardware();
    assert_eq!(guard.capabilities(), capability::hardware());
}

#[test]
#[serial(dispatch)]
fn test_nested_overrides_restore_in_reverse_order() {
    let before = capability::current();
    let outer = CapabilityOverride::scalar_only();
    {
        let _inner = CapabilityOverride::hardware();
        assert_eq!(capability::current(), capability::hardware());
    }
    assert_eq!(capability::current(), Capabilities::scalar_only());
    drop(outer);
    assert_eq!(capability::current(), before);
}

#[test]
#[serial(dispatch)]
fn test_override_restored_after_panic() {
    let before = capability::current();
    let result = std::panic::catch_unwind(|| {
        let _guard = CapabilityOverride::scalar_only();
        panic!("inside override");
    });
    assert!(result.is_err());
    assert_eq!(capability::current(), before);
}

#[test]
#[serial(dispatch)]
fn test_with_capabilities_returns_closure_value() {
    let before = capability::current();
    let level = capability::with_capabilities(Capabilities::scalar_only(), capability::simd_level);
    assert_eq!(level, SimdLevel::Scalar);
    assert_eq!(capability::current(), before);
}
