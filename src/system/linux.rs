#![allow(unsafe_code)]

use randomness_primitives::rand::ByteSource;

use crate::error::{Error, Result};

/// The Linux blocking entropy pool, read with `getrandom(2)` and `GRND_RANDOM`.
///
/// Reads may be short; interrupted reads are retried.
#[derive(Copy, Clone, Debug, Default)]
pub struct LinuxRandom;

fn errno() -> i32 {
    // SAFETY: `__errno_location` returns a valid pointer to the calling thread's errno
    unsafe { *libc::__errno_location() }
}

impl LinuxRandom {
    /// Returns `true` if the kernel accepts `getrandom(2)` with `GRND_RANDOM`.
    pub fn is_available() -> bool {
        // SAFETY: a zero-length request never writes through the pointer
        let res = unsafe { libc::getrandom(core::ptr::null_mut(), 0, libc::GRND_RANDOM) };
        res == 0
    }
}

impl ByteSource for LinuxRandom {
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<usize> {
        loop {
            // SAFETY: the kernel writes at most `bytes.len()` bytes into `bytes`
            let res = unsafe {
                libc::getrandom(bytes.as_mut_ptr().cast(), bytes.len(), libc::GRND_RANDOM)
            };
            if res >= 0 {
                break Ok(res as usize);
            }
            match errno() {
                libc::EINTR => continue,
                e => break Err(Error::from_raw_os_error(e)),
            }
        }
    }
}
