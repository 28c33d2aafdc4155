//! MT19937 Mersenne Twister.
//!
//! Seeding follows the reference `init_by_array` over the 32-bit limbs of a [`Seed`],
//! which makes this generator a reproducible seed-to-bitstream expansion for other
//! deterministic generators as well as a provider on its own.

use alloc::vec::Vec;

use ibig::UBig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::generator::{Generator, State, check_width, check_width_u64, foreign_state};
use crate::seed::Seed;

const N: usize = 624;
const M: usize = 397;
const MATRIX_A: u32 = 0x9908_b0df;
const UPPER_MASK: u32 = 0x8000_0000;
const LOWER_MASK: u32 = 0x7fff_ffff;

/// Exported [`MersenneTwister`] state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MtState {
    pub version: u32,
    /// The 624 words of the twister.
    pub key: Vec<u32>,
    /// Position of the next word to temper, `0..=624`.
    pub index: u32,
    #[serde(with = "crate::generator::spare_bits")]
    pub gauss_next: Option<f64>,
}

#[derive(Clone)]
pub struct MersenneTwister {
    mt: [u32; N],
    index: usize,
    gauss_next: Option<f64>,
}

impl MersenneTwister {
    pub const VERSION: u32 = 3;

    /// Seeds from `seed`, or from the operating system if `seed` is `None`.
    pub fn new(seed: Option<&Seed>) -> Result<Self> {
        match seed {
            Some(seed) => Ok(Self::from_seed(seed)),
            None => Ok(Self::from_seed(&Seed::from_entropy()?)),
        }
    }

    pub fn from_seed(seed: &Seed) -> Self {
        let mut this = Self::from_u32(19_650_218);
        this.mix_key(seed.words());
        this
    }

    fn from_u32(s: u32) -> Self {
        let mut mt = <[u32; N] as bytemuck::Zeroable>::zeroed();
        mt[0] = s;
        for i in 1..N {
            let prev = mt[i - 1];
            mt[i] = 1_812_433_253u32
                .wrapping_mul(prev ^ (prev >> 30))
                .wrapping_add(i as u32);
        }
        Self {
            mt,
            index: N,
            gauss_next: None,
        }
    }

    fn mix_key(&mut self, key: &[u32]) {
        let mt = &mut self.mt;
        let mut i = 1;
        let mut j = 0;

        for _ in 0..N.max(key.len()) {
            let prev = mt[i - 1];
            mt[i] = (mt[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_664_525))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                mt[0] = mt[N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }

        for _ in 0..N - 1 {
            let prev = mt[i - 1];
            mt[i] = (mt[i] ^ (prev ^ (prev >> 30)).wrapping_mul(1_566_083_941))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                mt[0] = mt[N - 1];
                i = 1;
            }
        }

        mt[0] = UPPER_MASK;
        self.index = N;
    }

    fn twist(&mut self) {
        let mt = &mut self.mt;
        for kk in 0..N {
            let y = (mt[kk] & UPPER_MASK) | (mt[(kk + 1) % N] & LOWER_MASK);
            let mag = if y & 1 != 0 { MATRIX_A } else { 0 };
            mt[kk] = mt[(kk + M) % N] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }

    /// Returns the next tempered 32-bit word.
    pub fn next_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }
        let mut y = self.mt[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }
}

impl Generator for MersenneTwister {
    /// Widths up to 32 keep the top bits of one word. Wider draws fill words from the
    /// least significant end, the last word keeping its top bits.
    fn getbits(&mut self, k: usize) -> Result<UBig> {
        check_width(k)?;
        if k <= 32 {
            return Ok(UBig::from(self.next_u32() >> (32 - k)));
        }

        let mut bytes = Vec::with_capacity(k.div_ceil(32) * 4);
        let mut remaining = k;
        while remaining > 0 {
            let mut word = self.next_u32();
            if remaining < 32 {
                word >>= 32 - remaining;
            }
            bytes.extend_from_slice(&word.to_le_bytes());
            remaining = remaining.saturating_sub(32);
        }

        Ok(UBig::from_le_bytes(&bytes))
    }

    fn getbits_u64(&mut self, k: u32) -> Result<u64> {
        check_width_u64(k)?;
        if k <= 32 {
            return Ok(u64::from(self.next_u32() >> (32 - k)));
        }
        let lo = u64::from(self.next_u32());
        let hi = u64::from(self.next_u32() >> (64 - k));
        Ok(lo | (hi << 32))
    }

    fn uniform_float(&mut self) -> Result<f64> {
        let a = self.next_u32() >> 5;
        let b = self.next_u32() >> 6;
        Ok((f64::from(a) * 67_108_864.0 + f64::from(b)) * (1.0 / 9_007_199_254_740_992.0))
    }

    fn gauss_next(&mut self) -> &mut Option<f64> {
        &mut self.gauss_next
    }

    fn export_state(&self) -> Result<State> {
        Ok(State::MersenneTwister(MtState {
            version: Self::VERSION,
            key: self.mt.to_vec(),
            index: self.index as u32,
            gauss_next: self.gauss_next,
        }))
    }

    fn import_state(&mut self, state: &State) -> Result<()> {
        let State::MersenneTwister(state) = state else {
            return Err(foreign_state());
        };
        if state.version != Self::VERSION {
            return Err(Error::state_version(
                "MersenneTwister",
                state.version,
                Self::VERSION,
            ));
        }
        let Ok(mt) = <[u32; N]>::try_from(state.key.as_slice()) else {
            return Err(Error::new_with_message(
                ErrorKind::InvalidData,
                "Mersenne Twister state must hold 624 words",
            ));
        };
        if state.index as usize > N {
            return Err(Error::new_with_message(
                ErrorKind::InvalidData,
                "Mersenne Twister state index out of range",
            ));
        }

        self.mt = mt;
        self.index = state.index as usize;
        self.gauss_next = state.gauss_next;
        Ok(())
    }
}

impl core::fmt::Debug for MersenneTwister {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MersenneTwister")
            .field("index", &self.index)
            .finish_non_exhaustive()
    }
}
