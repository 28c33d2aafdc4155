use alloc::boxed::Box;

use ibig::UBig;
use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind, Result};
use crate::jkiss::JKissState;
use crate::mt::MtState;
use crate::sample;

/// An exported generator state.
///
/// Only generators flagged [`CLONEABLE`][crate::Flags::CLONEABLE] produce or accept one.
/// Each variant carries its own format version, checked on import.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "generator")]
pub enum State {
    JKiss(JKissState),
    MersenneTwister(MtState),
}

/// A source of random bits.
///
/// Implementors provide [`Generator::getbits`] and [`Generator::uniform_float`]; bounded
/// sampling is derived from `getbits` by rejection and may be overridden by generators
/// with a cheaper native path, provided the distribution is unchanged.
///
/// A generator is a plain mutable value. Sharing one between threads requires external
/// synchronization.
pub trait Generator: Send {
    /// Returns a uniformly distributed integer in `[0, 2^k)`.
    ///
    /// Fails with [`ErrorKind::InvalidInput`] if `k` is zero.
    fn getbits(&mut self, k: usize) -> Result<UBig>;

    /// Same as [`Generator::getbits`], for `k <= 64`.
    fn getbits_u64(&mut self, k: u32) -> Result<u64> {
        check_width_u64(k)?;
        let bits = self.getbits(k as usize)?;
        u64::try_from(bits).map_err(|_| {
            Error::new_with_message(ErrorKind::__Internal, "getbits returned more bits than requested")
        })
    }

    /// Returns a uniformly distributed integer in `[0, n)`.
    ///
    /// Fails with [`ErrorKind::InvalidInput`] if `n` is zero.
    fn below(&mut self, n: &UBig) -> Result<UBig> {
        sample::below(self, n)
    }

    /// Same as [`Generator::below`], for bounds that fit in a `u64`.
    fn below_u64(&mut self, n: u64) -> Result<u64> {
        sample::below_u64(self, n)
    }

    /// Returns a uniformly distributed float in `[0, 1)`.
    fn uniform_float(&mut self) -> Result<f64>;

    /// The spare normal deviate cached by [`GeneratorExt::gauss`][crate::GeneratorExt::gauss].
    fn gauss_next(&mut self) -> &mut Option<f64>;

    /// Exports the generator state.
    ///
    /// Fails with [`ErrorKind::Unsupported`] unless the generator is restorable.
    fn export_state(&self) -> Result<State> {
        Err(Error::new_with_message(
            ErrorKind::Unsupported,
            "generator state cannot be exported",
        ))
    }

    /// Restores a state previously returned by [`Generator::export_state`].
    ///
    /// Fails with [`ErrorKind::Unsupported`] unless the generator is restorable, and with
    /// [`ErrorKind::StateVersion`] if the record has a version the generator does not understand.
    fn import_state(&mut self, state: &State) -> Result<()> {
        let _ = state;
        Err(Error::new_with_message(
            ErrorKind::Unsupported,
            "generator state cannot be imported",
        ))
    }
}

impl<G: Generator + ?Sized> Generator for Box<G> {
    fn getbits(&mut self, k: usize) -> Result<UBig> {
        <G as Generator>::getbits(self, k)
    }
    fn getbits_u64(&mut self, k: u32) -> Result<u64> {
        <G as Generator>::getbits_u64(self, k)
    }
    fn below(&mut self, n: &UBig) -> Result<UBig> {
        <G as Generator>::below(self, n)
    }
    fn below_u64(&mut self, n: u64) -> Result<u64> {
        <G as Generator>::below_u64(self, n)
    }
    fn uniform_float(&mut self) -> Result<f64> {
        <G as Generator>::uniform_float(self)
    }
    fn gauss_next(&mut self) -> &mut Option<f64> {
        <G as Generator>::gauss_next(self)
    }
    fn export_state(&self) -> Result<State> {
        <G as Generator>::export_state(self)
    }
    fn import_state(&mut self, state: &State) -> Result<()> {
        <G as Generator>::import_state(self, state)
    }
}

pub(crate) fn check_width(k: usize) -> Result<()> {
    if k == 0 {
        Err(Error::new_with_message(
            ErrorKind::InvalidInput,
            "number of bits must be positive",
        ))
    } else {
        Ok(())
    }
}

pub(crate) fn check_width_u64(k: u32) -> Result<()> {
    check_width(k as usize)?;
    if k > 64 {
        Err(Error::new_with_message(
            ErrorKind::InvalidInput,
            "getbits_u64 supports at most 64 bits",
        ))
    } else {
        Ok(())
    }
}

pub(crate) fn foreign_state() -> Error {
    Error::new_with_message(
        ErrorKind::InvalidInput,
        "state record belongs to a different generator",
    )
}

/// Serializes a cached spare deviate as its IEEE-754 bit pattern, so a restored generator
/// reproduces it exactly in any format.
pub(crate) mod spare_bits {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(spare: &Option<f64>, ser: S) -> Result<S::Ok, S::Error> {
        spare.map(f64::to_bits).serialize(ser)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<f64>, D::Error> {
        Ok(Option::<u64>::deserialize(de)?.map(f64::from_bits))
    }
}

#[cfg(test)]
mod test {
    use super::State;
    use crate::generator::Generator;
    use crate::jkiss::JKiss;
    use crate::mt::MersenneTwister;
    use crate::seed::Seed;

    fn json_round_trip(state: &State) -> State {
        let text = serde_json::to_string(state).unwrap();
        serde_json::from_str(&text).unwrap()
    }

    #[test]
    pub fn test_spare_survives_json_bit_exact() {
        // shortest decimal form of this value parses back one ULP low
        let spare = f64::from_bits(4609675908517675891);

        let mut jkiss = JKiss::from_seed(&Seed::from(5u64));
        *jkiss.gauss_next() = Some(spare);
        let State::JKiss(back) = json_round_trip(&jkiss.export_state().unwrap()) else {
            panic!("wrong state variant");
        };
        assert_eq!(back.gauss_next.map(f64::to_bits), Some(spare.to_bits()));

        let mut mt = MersenneTwister::from_seed(&Seed::from(5u64));
        *mt.gauss_next() = Some(spare);
        let State::MersenneTwister(back) = json_round_trip(&mt.export_state().unwrap()) else {
            panic!("wrong state variant");
        };
        assert_eq!(back.gauss_next.map(f64::to_bits), Some(spare.to_bits()));
    }

    #[test]
    pub fn test_empty_spare_round_trip() {
        let mt = MersenneTwister::from_seed(&Seed::from(6u64));
        let State::MersenneTwister(back) = json_round_trip(&mt.export_state().unwrap()) else {
            panic!("wrong state variant");
        };
        assert_eq!(back.gauss_next, None);
    }
}
