use randomness_primitives::rand::ByteSource;

use crate::error::{Error, ErrorKind, Result};

/// The operating system's nonblocking entropy source, through `getrandom`.
#[derive(Copy, Clone, Debug, Default)]
pub struct OsRandom;

fn map_error(e: getrandom::Error) -> Error {
    if let Some(errno) = e.raw_os_error() {
        return Error::from_raw_os_error(errno);
    }
    match e {
        getrandom::Error::UNSUPPORTED => Error::new_with_message(
            ErrorKind::SourceUnavailable,
            "getrandom is not supported on this target",
        ),
        getrandom::Error::UNEXPECTED | getrandom::Error::ERRNO_NOT_POSITIVE => {
            Error::new_with_message(ErrorKind::__Internal, "getrandom reported an internal error")
        }
        e => {
            #[cfg(feature = "std")]
            {
                Error::new(ErrorKind::__Uncategorized, e)
            }
            #[cfg(not(feature = "std"))]
            {
                let _ = e;
                Error::new_with_message(ErrorKind::__Uncategorized, "getrandom reported other error")
            }
        }
    }
}

impl ByteSource for OsRandom {
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<usize> {
        getrandom::fill(bytes).map_err(map_error)?;
        Ok(bytes.len())
    }
}
