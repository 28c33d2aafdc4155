//! Generators backed by the operating system and by CPU instructions.
//!
//! None of these generators can be seeded or restored. Byte sources with a fixed
//! granularity are wrapped in a [`Reservoir`](crate::reservoir::Reservoir) so no supplied bit is discarded;
//! [`SystemRandom`] instead reads fresh bytes for every draw.

use alloc::vec::Vec;

use ibig::UBig;
use randomness_primitives::rand::ByteSource;

use crate::error::Result;
use crate::generator::{Generator, check_width};
use crate::reservoir::FLOAT_BITS;

#[cfg(all(feature = "os-rand", any(unix, windows)))]
pub mod os;

#[cfg(all(feature = "os-rand", target_os = "linux"))]
pub mod linux;

#[cfg(all(feature = "hardware-rand", any(target_arch = "x86", target_arch = "x86_64")))]
pub mod x86;

/// Reservoir over [`getrandom`](https://docs.rs/getrandom).
#[cfg(all(feature = "os-rand", any(unix, windows)))]
pub type URandom = crate::reservoir::Reservoir<os::OsRandom>;

/// Reservoir over the Linux blocking pool.
#[cfg(all(feature = "os-rand", target_os = "linux"))]
pub type DevRandom = crate::reservoir::Reservoir<linux::LinuxRandom>;

/// Reservoir over `rdrand` or `rdseed`, as chosen by the [`X86Mode`](x86::X86Mode) of its source.
#[cfg(all(feature = "hardware-rand", any(target_arch = "x86", target_arch = "x86_64")))]
pub type HardwareRandom = crate::reservoir::Reservoir<x86::X86Rand>;

/// Unbuffered generator: every draw of `k` bits reads `ceil(k / 8)` fresh bytes and keeps
/// the top `k` bits of their big-endian value.
pub struct SystemRandom<S> {
    source: S,
    buf: Vec<u8>,
    gauss_next: Option<f64>,
}

impl<S: ByteSource> SystemRandom<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buf: Vec::new(),
            gauss_next: None,
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    fn read(&mut self, len: usize) -> Result<&[u8]> {
        self.buf.clear();
        self.buf.resize(len, 0);
        self.source.fill_bytes(&mut self.buf)?;
        Ok(&self.buf)
    }
}

impl<S: ByteSource + Send> Generator for SystemRandom<S> {
    fn getbits(&mut self, k: usize) -> Result<UBig> {
        check_width(k)?;
        let len = k.div_ceil(8);
        let value = UBig::from_be_bytes(self.read(len)?);
        Ok(value >> (len * 8 - k))
    }

    fn uniform_float(&mut self) -> Result<f64> {
        let mut word = [0u8; 8];
        word[1..].copy_from_slice(self.read(7)?);
        let bits = u64::from_be_bytes(word) >> 3;
        Ok(bits as f64 / (1u64 << FLOAT_BITS) as f64)
    }

    fn gauss_next(&mut self) -> &mut Option<f64> {
        &mut self.gauss_next
    }
}

impl<S: core::fmt::Debug> core::fmt::Debug for SystemRandom<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SystemRandom")
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}
