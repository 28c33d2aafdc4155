#![allow(unsafe_code)]

#[cfg(target_arch = "x86")]
use core::arch::x86 as arch;

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64 as arch;

use randomness_primitives::rand::ByteSource;

use crate::detect::x86::is_x86_feature_detected;
use crate::error::{Error, ErrorKind, Result};

const RDRAND_RETRIES: u32 = 10;
const RDSEED_RETRIES: u32 = 1024;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum X86Mode {
    /// `rdrand`: output of a hardware DRBG reseeded from the entropy source.
    Rdrand,
    /// `rdseed`: conditioned output of the entropy source itself.
    Rdseed,
}

/// Random words from the `rdrand` or `rdseed` instruction.
#[derive(Copy, Clone, Debug)]
pub struct X86Rand(X86Mode);

#[target_feature(enable = "rdrand")]
unsafe fn rdrand_step() -> Option<u32> {
    let mut val = 0;
    let ok = arch::_rdrand32_step(&mut val);
    (ok == 1).then_some(val)
}

#[target_feature(enable = "rdseed")]
unsafe fn rdseed_step() -> Option<u32> {
    let mut val = 0;
    let ok = arch::_rdseed32_step(&mut val);
    (ok == 1).then_some(val)
}

impl X86Rand {
    pub fn is_available(mode: X86Mode) -> bool {
        match mode {
            X86Mode::Rdrand => is_x86_feature_detected!("rdrand"),
            X86Mode::Rdseed => is_x86_feature_detected!("rdseed"),
        }
    }

    /// Fails with [`ErrorKind::SourceUnavailable`] if the processor lacks the instruction.
    pub fn new(mode: X86Mode) -> Result<Self> {
        if Self::is_available(mode) {
            Ok(Self(mode))
        } else {
            Err(Error::new_with_message(
                ErrorKind::SourceUnavailable,
                "processor does not support the requested instruction",
            ))
        }
    }

    pub fn mode(&self) -> X86Mode {
        self.0
    }

    fn step(&self) -> Option<u32> {
        match self.0 {
            // SAFETY: `Self::new` checked the instruction is supported
            X86Mode::Rdrand => unsafe { rdrand_step() },
            // SAFETY: as above
            X86Mode::Rdseed => unsafe { rdseed_step() },
        }
    }

    /// Retries a failing instruction a bounded number of times.
    fn poll(&self) -> Option<u32> {
        let retries = match self.0 {
            X86Mode::Rdrand => RDRAND_RETRIES,
            X86Mode::Rdseed => RDSEED_RETRIES,
        };
        for _ in 0..retries {
            if let Some(val) = self.step() {
                return Some(val);
            }
            core::hint::spin_loop();
        }
        None
    }
}

impl ByteSource for X86Rand {
    /// Returns a short read if the instruction stops producing words part way, and fails
    /// with [`ErrorKind::WouldBlock`] if it produces none.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        for chunk in bytes.chunks_mut(4) {
            let Some(word) = self.poll() else {
                break;
            };
            let len = chunk.len();
            chunk.copy_from_slice(&bytemuck::bytes_of(&word)[..len]);
            filled += len;
        }

        if filled == 0 && !bytes.is_empty() {
            return Err(Error::new_with_message(
                ErrorKind::WouldBlock,
                "hardware random number generator kept failing",
            ));
        }
        Ok(filled)
    }
}
