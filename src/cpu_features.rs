//! CPU feature dispatch (§4.7): detects SSE2/AVX2 on x86_64 and NEON on
//! aarch64, cached process-wide behind a `OnceLock`, the idiomatic-Rust
//! equivalent of the teacher-style "benign race, deterministic result"
//! cache the spec describes — `OnceLock` makes the race impossible rather
//! than merely harmless.
//!
//! `checksums::adler32::adler32` is this dispatch's one consumer: it checks
//! `sse2` and picks between the hand-rolled vector kernel in
//! `checksums::adler32::sse2` and the scalar core. `avx2`/`neon` are probed
//! and cached the same way but have no kernel behind them yet — CRC-32 gets
//! its acceleration for free from `crc32fast`'s own runtime dispatch
//! instead, so this module's only current obligation is Adler-32's.

use std::sync::OnceLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpuFeatures {
    #[cfg(target_arch = "x86_64")]
    pub sse2: bool,
    #[cfg(target_arch = "x86_64")]
    pub avx2: bool,
    #[cfg(target_arch = "aarch64")]
    pub neon: bool,
}

impl CpuFeatures {
    #[cfg(target_arch = "x86_64")]
    fn probe() -> Self {
        Self {
            sse2: std::is_x86_feature_detected!("sse2"),
            avx2: std::is_x86_feature_detected!("avx2"),
        }
    }

    #[cfg(target_arch = "aarch64")]
    fn probe() -> Self {
        Self {
            neon: std::arch::is_aarch64_feature_detected!("neon"),
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    fn probe() -> Self {
        Self::default()
    }
}

static FEATURES: OnceLock<CpuFeatures> = OnceLock::new();

/// Returns the process-wide CPU feature bitmask, probing lazily on first
/// call. Every call thereafter returns the cached value.
pub fn detected_features() -> CpuFeatures {
    *FEATURES.get_or_init(CpuFeatures::probe)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detection_is_stable_across_calls() {
        assert_eq!(detected_features(), detected_features());
    }
}
