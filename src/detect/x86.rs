#![allow(unsafe_code)]

#[cfg(feature = "runtime-detect")]
use spin::once::Once;

// Contains the feature words.
// The layout of the array is as follows:
// 0. cpuid[eax=1].ecx
// 1. cpuid[eax=7,ecx=0].ebx
//
// A leaf above the maximum reported by cpuid[eax=0].eax reads as `0`.
#[cfg(feature = "runtime-detect")]
static CPU_FEATURE_INFO: Once<[u32; 2]> = Once::new();

#[cfg(feature = "runtime-detect")]
fn init_cpuid_features() -> [u32; 2] {
    #[cfg(target_arch = "x86")]
    use core::arch::x86 as arch;

    #[cfg(target_arch = "x86_64")]
    use core::arch::x86_64 as arch;

    #[allow(unused_unsafe)]
    let max_leaf = unsafe { arch::__cpuid(0) }.eax;

    #[allow(unused_unsafe)]
    let eax1_ecx = if max_leaf >= 1 {
        unsafe { arch::__cpuid(1) }.ecx
    } else {
        0
    };

    #[allow(unused_unsafe)]
    let eax7_ecx0_ebx = if max_leaf >= 7 {
        unsafe { arch::__cpuid_count(7, 0) }.ebx
    } else {
        0
    };

    [eax1_ecx, eax7_ecx0_ebx]
}

#[cfg(feature = "runtime-detect")]
pub fn get_cpuid_features() -> &'static [u32; 2] {
    CPU_FEATURE_INFO.call_once(init_cpuid_features)
}

macro_rules! x86_feature_to_bit {
    ("rdrand") => {
        (0, 30)
    };
    ("rdseed") => {
        (1, 18)
    };
}

/// `true` if the feature is enabled at compile time.
macro_rules! is_x86_feature_enabled {
    ($feature:tt) => {
        const {
            let _ = $crate::detect::x86::x86_feature_to_bit!($feature);
            ::core::cfg!(target_feature = $feature)
        }
    };
}

#[cfg(feature = "runtime-detect")]
macro_rules! is_x86_feature_detected {
    ($feature:tt) => {
        $crate::detect::x86::is_x86_feature_enabled!($feature)
            || ({
                let (idx, bit) = $crate::detect::x86::x86_feature_to_bit!($feature);
                ($crate::detect::x86::get_cpuid_features())[idx] & (1 << bit) != 0
            })
    };
}

#[cfg(not(feature = "runtime-detect"))]
macro_rules! is_x86_feature_detected {
    ($feature:tt) => {
        $crate::detect::x86::is_x86_feature_enabled!($feature)
    };
}

#[allow(unused_imports)]
pub(crate) use {is_x86_feature_detected, is_x86_feature_enabled, x86_feature_to_bit};
