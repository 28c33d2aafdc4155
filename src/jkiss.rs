//! The JKISS combined generator.
//!
//! Combines a linear congruential generator, a 32-bit xorshift, and a multiply-with-carry
//! generator, summing their outputs mod 2^32. The whole state is four 32-bit words.

use ibig::UBig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::generator::{Generator, State, check_width, check_width_u64, foreign_state};
use crate::mt::MersenneTwister;
use crate::seed::Seed;
use crate::util::low_mask;

const LCG_MUL: u32 = 314_527_869;
const LCG_ADD: u32 = 1_234_567;
const MWC_MUL: u64 = 4_294_584_393;
const CARRY_MOD: u32 = 698_769_068;

/// Exported [`JKiss`] state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct JKissState {
    pub version: u32,
    pub x: u32,
    /// Xorshift word, never zero.
    pub y: u32,
    pub z: u32,
    pub c: u32,
    #[serde(with = "crate::generator::spare_bits")]
    pub gauss_next: Option<f64>,
}

#[derive(Clone, Debug)]
pub struct JKiss {
    x: u32,
    y: u32,
    z: u32,
    c: u32,
    gauss_next: Option<f64>,
}

impl JKiss {
    pub const VERSION: u32 = 1;

    /// Seeds from `seed`, or from the operating system if `seed` is `None`.
    pub fn new(seed: Option<&Seed>) -> Result<Self> {
        match seed {
            Some(seed) => Ok(Self::from_seed(seed)),
            None => Ok(Self::from_seed(&Seed::from_entropy()?)),
        }
    }

    /// Expands `seed` through a Mersenne Twister stream into the four state words.
    pub fn from_seed(seed: &Seed) -> Self {
        let mut mt = MersenneTwister::from_seed(seed);

        let x = mt.next_u32();
        let y = loop {
            let y = mt.next_u32();
            if y != 0 {
                break y;
            }
        };
        let z = mt.next_u32();
        let c = mt.next_u32() % CARRY_MOD + 1;

        Self {
            x,
            y,
            z,
            c,
            gauss_next: None,
        }
    }

    /// Constructs a generator directly from its state words.
    ///
    /// Fails with [`ErrorKind::InvalidData`] if `y` is zero, which would stall the xorshift.
    pub fn from_words(x: u32, y: u32, z: u32, c: u32) -> Result<Self> {
        if y == 0 {
            return Err(zero_xorshift());
        }
        Ok(Self {
            x,
            y,
            z,
            c,
            gauss_next: None,
        })
    }

    pub fn next_u32(&mut self) -> u32 {
        self.x = self.x.wrapping_mul(LCG_MUL).wrapping_add(LCG_ADD);

        self.y ^= self.y << 5;
        self.y ^= self.y >> 7;
        self.y ^= self.y << 22;

        let t = MWC_MUL * u64::from(self.z) + u64::from(self.c);
        self.c = (t >> 32) as u32;
        self.z = t as u32;

        self.x.wrapping_add(self.y).wrapping_add(self.z)
    }
}

fn zero_xorshift() -> Error {
    Error::new_with_message(
        ErrorKind::InvalidData,
        "JKiss xorshift word must be nonzero",
    )
}

impl Generator for JKiss {
    /// Whole 32-bit blocks are shifted in below the bits already drawn, then the
    /// remainder is taken from the low bits of one more word.
    fn getbits(&mut self, k: usize) -> Result<UBig> {
        check_width(k)?;
        if k <= 64 {
            return self.getbits_u64(k as u32).map(UBig::from);
        }

        let mut k = k;
        let mut result = UBig::from(0u8);
        while k > 32 {
            k -= 32;
            result = (result << 32) | UBig::from(self.next_u32());
        }
        let tail = u64::from(self.next_u32()) & low_mask(k as u32);
        Ok((result << k) | UBig::from(tail))
    }

    fn getbits_u64(&mut self, k: u32) -> Result<u64> {
        check_width_u64(k)?;
        if k <= 32 {
            return Ok(u64::from(self.next_u32()) & low_mask(k));
        }
        let hi = u64::from(self.next_u32());
        let lo = u64::from(self.next_u32()) & low_mask(k - 32);
        Ok((hi << (k - 32)) | lo)
    }

    fn uniform_float(&mut self) -> Result<f64> {
        Ok(f64::from(self.next_u32()) / 4_294_967_296.0)
    }

    fn gauss_next(&mut self) -> &mut Option<f64> {
        &mut self.gauss_next
    }

    fn export_state(&self) -> Result<State> {
        Ok(State::JKiss(JKissState {
            version: Self::VERSION,
            x: self.x,
            y: self.y,
            z: self.z,
            c: self.c,
            gauss_next: self.gauss_next,
        }))
    }

    fn import_state(&mut self, state: &State) -> Result<()> {
        let State::JKiss(state) = state else {
            return Err(foreign_state());
        };
        if state.version != Self::VERSION {
            return Err(Error::state_version("JKiss", state.version, Self::VERSION));
        }
        if state.y == 0 {
            return Err(zero_xorshift());
        }

        self.x = state.x;
        self.y = state.y;
        self.z = state.z;
        self.c = state.c;
        self.gauss_next = state.gauss_next;
        Ok(())
    }
}
