use crate::error::{Error, ErrorKind, Result};

/// A source of raw entropy bytes.
///
/// A source may return fewer bytes than requested (a short read); callers that need the
/// whole buffer filled use [`ByteSource::fill_bytes`].
pub trait ByteSource {
    /// Writes up to `bytes.len()` random bytes to the front of `bytes`, returning how many were written.
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<usize>;

    /// Fills all of `bytes`, issuing as many reads as the source needs.
    ///
    /// Fails with [`ErrorKind::UnexpectedEof`] if the source stops producing bytes.
    fn fill_bytes(&mut self, mut bytes: &mut [u8]) -> Result<()> {
        while !bytes.is_empty() {
            match self.read_bytes(bytes)? {
                0 => {
                    return Err(Error::new_with_message(
                        ErrorKind::UnexpectedEof,
                        "byte source returned no bytes",
                    ));
                }
                n => bytes = &mut core::mem::take(&mut bytes)[n..],
            }
        }
        Ok(())
    }
}

impl<S: ByteSource + ?Sized> ByteSource for &mut S {
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<usize> {
        <S as ByteSource>::read_bytes(self, bytes)
    }
}

#[cfg(feature = "alloc")]
impl<S: ByteSource + ?Sized> ByteSource for alloc::boxed::Box<S> {
    fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<usize> {
        <S as ByteSource>::read_bytes(self, bytes)
    }
}

#[cfg(test)]
mod test {
    use super::ByteSource;
    use crate::error::{ErrorKind, Result};

    struct Trickle(u8);

    impl ByteSource for Trickle {
        fn read_bytes(&mut self, bytes: &mut [u8]) -> Result<usize> {
            if self.0 == 0 {
                return Ok(0);
            }
            self.0 -= 1;
            bytes[0] = self.0;
            Ok(1)
        }
    }

    #[test]
    pub fn test_fill_across_short_reads() {
        let mut src = Trickle(4);
        let mut buf = [0xff; 3];
        src.fill_bytes(&mut buf).unwrap();
        assert_eq!(buf, [3, 2, 1]);
    }

    #[test]
    pub fn test_fill_exhausted() {
        let mut src = Trickle(1);
        let mut buf = [0; 2];
        let err = src.fill_bytes(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
    }
}
