//! Seed material for deterministic generators.

use alloc::vec::Vec;

use crate::error::Result;

/// An arbitrary-width non-negative integer used to seed a deterministic generator.
///
/// The integer is held as its 32-bit limbs, least significant first, with no leading
/// zero limbs except that zero itself is the single limb `0`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Seed {
    words: Vec<u32>,
}

impl Seed {
    /// Interprets `bytes` as a little-endian unsigned integer.
    pub fn from_le_bytes(bytes: &[u8]) -> Self {
        let mut words: Vec<u32> = bytes
            .chunks(4)
            .map(|chunk| {
                let mut word = [0u8; 4];
                word[..chunk.len()].copy_from_slice(chunk);
                u32::from_le_bytes(word)
            })
            .collect();

        while words.len() > 1 && words.last() == Some(&0) {
            words.pop();
        }
        if words.is_empty() {
            words.push(0);
        }

        Self { words }
    }

    /// Draws a 256-bit seed from the operating system.
    ///
    /// Fails with [`SourceUnavailable`][crate::error::ErrorKind::SourceUnavailable] when this build has no operating system source.
    pub fn from_entropy() -> Result<Self> {
        let mut bytes = [0u8; 32];
        fill_from_os(&mut bytes)?;
        Ok(Self::from_le_bytes(&bytes))
    }

    /// The 32-bit limbs of the seed, least significant first.
    pub fn words(&self) -> &[u32] {
        &self.words
    }
}

cfg_match::cfg_match! {
    all(feature = "os-rand", any(unix, windows)) => {
        fn fill_from_os(bytes: &mut [u8]) -> Result<()> {
            use randomness_primitives::rand::ByteSource;

            crate::system::os::OsRandom.fill_bytes(bytes)
        }
    }
    _ => {
        fn fill_from_os(_: &mut [u8]) -> Result<()> {
            use crate::error::{Error, ErrorKind};

            Err(Error::new_with_message(
                ErrorKind::SourceUnavailable,
                "no operating system entropy source to seed from",
            ))
        }
    }
}

impl From<u64> for Seed {
    fn from(value: u64) -> Self {
        Self::from_le_bytes(&value.to_le_bytes())
    }
}

impl From<u32> for Seed {
    fn from(value: u32) -> Self {
        Self { words: alloc::vec![value] }
    }
}

impl From<&[u8]> for Seed {
    fn from(value: &[u8]) -> Self {
        Self::from_le_bytes(value)
    }
}

impl<const N: usize> From<&[u8; N]> for Seed {
    fn from(value: &[u8; N]) -> Self {
        Self::from_le_bytes(value)
    }
}

#[cfg(test)]
mod test {
    use super::Seed;

    #[test]
    pub fn test_zero_is_single_word() {
        assert_eq!(Seed::from(0u64).words(), &[0]);
        assert_eq!(Seed::from_le_bytes(&[]).words(), &[0]);
        assert_eq!(Seed::from_le_bytes(&[0, 0, 0, 0, 0, 0]).words(), &[0]);
    }

    #[test]
    pub fn test_limbs_little_endian() {
        let seed = Seed::from((1u64 << 32) | 5);
        assert_eq!(seed.words(), &[5, 1]);
        assert_eq!(Seed::from(12345u64).words(), &[12345]);
    }

    #[test]
    pub fn test_partial_word() {
        let seed = Seed::from(b"randomness");
        assert_eq!(
            seed.words(),
            &[
                u32::from_le_bytes(*b"rand"),
                u32::from_le_bytes(*b"omne"),
                u32::from_le_bytes([b's', b's', 0, 0]),
            ]
        );
    }
}
