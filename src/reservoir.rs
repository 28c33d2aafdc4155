//! Arbitrary-width random bits over a byte-granularity [`ByteSource`].
//!
//! The reservoir keeps the bits it has been given but not yet handed out. Fresh bytes are
//! packed little-endian above the bits already held, and each draw takes the lowest bits,
//! so every bit the source supplies is used exactly once.

use alloc::vec::Vec;

use ibig::UBig;
use randomness_primitives::rand::ByteSource;

use crate::error::Result;
use crate::generator::{Generator, check_width};

/// Mantissa width used for [`Generator::uniform_float`].
pub const FLOAT_BITS: u32 = f64::MANTISSA_DIGITS;

/// Buffers the bytes of `S` into a bit supply.
///
/// The accumulator holds exactly `available` meaningful low bits; all higher bits are zero.
pub struct Reservoir<S> {
    source: S,
    entropy: UBig,
    available: usize,
    buf: Vec<u8>,
    gauss_next: Option<f64>,
}

impl<S: ByteSource> Reservoir<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            entropy: UBig::from(0u8),
            available: 0,
            buf: Vec::new(),
            gauss_next: None,
        }
    }

    /// Number of buffered bits not yet handed out.
    pub fn available_bits(&self) -> usize {
        self.available
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn into_source(self) -> S {
        self.source
    }

    /// Requests bytes until at least `k` bits are buffered.
    ///
    /// Errors from the source are returned as-is.
    fn refill(&mut self, k: usize) -> Result<()> {
        let mut missing = k.saturating_sub(self.available).div_ceil(8);

        while missing > 0 {
            self.buf.clear();
            self.buf.resize(missing, 0);
            let n = self.source.read_bytes(&mut self.buf)?.min(missing);
            if n == 0 {
                return Err(crate::error::Error::new_with_message(
                    crate::error::ErrorKind::UnexpectedEof,
                    "byte source returned no bytes",
                ));
            }

            let fresh = UBig::from_le_bytes(&self.buf[..n]) << self.available;
            self.entropy = &self.entropy | &fresh;
            self.available += n * 8;
            missing -= n;
        }

        Ok(())
    }

    /// Takes the low `k` bits, refilling first if needed.
    pub fn take(&mut self, k: usize) -> Result<UBig> {
        check_width(k)?;
        self.refill(k)?;

        let mask = (UBig::from(1u8) << k) - UBig::from(1u8);
        let result = &self.entropy & &mask;
        self.entropy = &self.entropy >> k;
        self.available -= k;

        Ok(result)
    }
}

impl<S: ByteSource + Send> Generator for Reservoir<S> {
    fn getbits(&mut self, k: usize) -> Result<UBig> {
        self.take(k)
    }

    fn uniform_float(&mut self) -> Result<f64> {
        let bits = self.getbits_u64(FLOAT_BITS)?;
        Ok(bits as f64 / (1u64 << FLOAT_BITS) as f64)
    }

    fn gauss_next(&mut self) -> &mut Option<f64> {
        &mut self.gauss_next
    }
}

impl<S: core::fmt::Debug> core::fmt::Debug for Reservoir<S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Reservoir")
            .field("source", &self.source)
            .field("available", &self.available)
            .finish_non_exhaustive()
    }
}
