//! Unbiased bounded sampling by rejection.
//!
//! A bound `n` is served by drawing `bit_length(n - 1)` bits and redrawing while the
//! value is `>= n`. Each draw is accepted with probability at least one half, and a
//! power-of-two bound is never rejected.

use ibig::UBig;

use crate::error::{Error, ErrorKind, Result};
use crate::generator::Generator;
use crate::util::bit_length_u64;

fn empty_bound() -> Error {
    Error::new_with_message(ErrorKind::InvalidInput, "upper bound must be positive")
}

/// Minimal number of bits spanning `[0, n)`, or `None` when `n <= 1`.
pub fn span_bits(n: &UBig) -> Option<usize> {
    if *n <= UBig::from(1u8) {
        None
    } else {
        Some((n - UBig::from(1u8)).bit_len())
    }
}

/// Draws a uniform integer in `[0, n)` from `rng.getbits`.
pub fn below<G: Generator + ?Sized>(rng: &mut G, n: &UBig) -> Result<UBig> {
    if *n == UBig::from(0u8) {
        return Err(empty_bound());
    }
    let Some(k) = span_bits(n) else {
        return Ok(UBig::from(0u8));
    };

    loop {
        let v = rng.getbits(k)?;
        if &v < n {
            break Ok(v);
        }
    }
}

/// Draws a uniform integer in `[0, n)` from `rng.getbits_u64`.
pub fn below_u64<G: Generator + ?Sized>(rng: &mut G, n: u64) -> Result<u64> {
    match n {
        0 => Err(empty_bound()),
        1 => Ok(0),
        n => {
            let k = bit_length_u64(n - 1);
            loop {
                let v = rng.getbits_u64(k)?;
                if v < n {
                    break Ok(v);
                }
            }
        }
    }
}

/// Conveniences layered on [`Generator::below_u64`] and [`Generator::uniform_float`].
pub trait GeneratorExt: Generator {
    /// Returns a uniform integer in `[start, stop)`.
    fn randrange(&mut self, start: i64, stop: i64) -> Result<i64> {
        if start >= stop {
            return Err(Error::new_with_message(
                ErrorKind::InvalidInput,
                "empty range for randrange",
            ));
        }
        let offset = self.below_u64(stop.abs_diff(start))?;
        Ok(start.wrapping_add_unsigned(offset))
    }

    /// Returns a uniform integer in `[a, b]`.
    fn randint(&mut self, a: i64, b: i64) -> Result<i64> {
        if a > b {
            return Err(Error::new_with_message(
                ErrorKind::InvalidInput,
                "empty range for randint",
            ));
        }
        let offset = match b.abs_diff(a).checked_add(1) {
            Some(width) => self.below_u64(width)?,
            None => self.getbits_u64(64)?,
        };
        Ok(a.wrapping_add_unsigned(offset))
    }

    /// Picks a uniformly chosen element of `items`.
    fn choice<'a, T>(&mut self, items: &'a [T]) -> Result<&'a T> {
        if items.is_empty() {
            return Err(Error::new_with_message(
                ErrorKind::InvalidInput,
                "cannot choose from an empty slice",
            ));
        }
        let i = self.below_u64(items.len() as u64)?;
        Ok(&items[i as usize])
    }

    /// Shuffles `items` in place (Fisher-Yates, from the back).
    fn shuffle<T>(&mut self, items: &mut [T]) -> Result<()> {
        for i in (1..items.len()).rev() {
            let j = self.below_u64(i as u64 + 1)?;
            items.swap(i, j as usize);
        }
        Ok(())
    }

    /// Returns a normal deviate with mean `mu` and standard deviation `sigma`.
    ///
    /// Deviates are produced in pairs; the second is cached in [`Generator::gauss_next`]
    /// and returned by the next call.
    #[cfg(feature = "std")]
    #[cfg_attr(feature = "nightly-docs", doc(cfg(feature = "std")))]
    fn gauss(&mut self, mu: f64, sigma: f64) -> Result<f64> {
        let z = match self.gauss_next().take() {
            Some(z) => z,
            None => {
                let x2pi = self.uniform_float()? * core::f64::consts::TAU;
                let g2rad = (-2.0 * (1.0 - self.uniform_float()?).ln()).sqrt();
                *self.gauss_next() = Some(x2pi.sin() * g2rad);
                x2pi.cos() * g2rad
            }
        };
        Ok(mu + z * sigma)
    }
}

impl<G: Generator + ?Sized> GeneratorExt for G {}

#[cfg(test)]
mod test {
    use ibig::UBig;

    use super::{GeneratorExt, below, below_u64, span_bits};
    use crate::error::{ErrorKind, Result};
    use crate::generator::Generator;

    /// Replays fixed draws and records every requested width.
    struct Replay {
        values: alloc::vec::Vec<u64>,
        widths: alloc::vec::Vec<usize>,
        gauss_next: Option<f64>,
    }

    impl Replay {
        fn new(values: &[u64]) -> Self {
            Self {
                values: values.iter().rev().copied().collect(),
                widths: alloc::vec::Vec::new(),
                gauss_next: None,
            }
        }
    }

    impl Generator for Replay {
        fn getbits(&mut self, k: usize) -> Result<UBig> {
            self.widths.push(k);
            let v = self.values.pop().expect("replay exhausted");
            assert!(k >= 64 || v < 1 << k, "scripted value wider than request");
            Ok(UBig::from(v))
        }

        fn uniform_float(&mut self) -> Result<f64> {
            Ok(0.5)
        }

        fn gauss_next(&mut self) -> &mut Option<f64> {
            &mut self.gauss_next
        }
    }

    #[test]
    pub fn test_span_bits() {
        assert_eq!(span_bits(&UBig::from(1u8)), None);
        assert_eq!(span_bits(&UBig::from(2u8)), Some(1));
        assert_eq!(span_bits(&UBig::from(10u8)), Some(4));
        assert_eq!(span_bits(&UBig::from(16u8)), Some(4));
        assert_eq!(span_bits(&UBig::from(17u8)), Some(5));
    }

    #[test]
    pub fn test_one_consumes_nothing() {
        let mut rng = Replay::new(&[]);
        assert_eq!(below_u64(&mut rng, 1).unwrap(), 0);
        assert_eq!(below(&mut rng, &UBig::from(1u8)).unwrap(), UBig::from(0u8));
        assert!(rng.widths.is_empty());
    }

    #[test]
    pub fn test_zero_rejected() {
        let mut rng = Replay::new(&[]);
        assert_eq!(below_u64(&mut rng, 0).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(
            below(&mut rng, &UBig::from(0u8)).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[test]
    pub fn test_rejects_out_of_range() {
        let mut rng = Replay::new(&[12, 10, 15, 9]);
        assert_eq!(below_u64(&mut rng, 10).unwrap(), 9);
        assert_eq!(rng.widths, [4, 4, 4, 4]);
    }

    #[test]
    pub fn test_power_of_two_single_draw() {
        let mut rng = Replay::new(&[7]);
        assert_eq!(below_u64(&mut rng, 8).unwrap(), 7);
        assert_eq!(rng.widths, [3]);
    }

    #[test]
    pub fn test_wide_bound() {
        let n = UBig::from(1u8) << 100;
        let mut rng = Replay::new(&[3]);
        assert_eq!(below(&mut rng, &n).unwrap(), UBig::from(3u8));
        assert_eq!(rng.widths, [100]);
    }

    #[test]
    pub fn test_randrange_offsets() {
        let mut rng = Replay::new(&[2, 14]);
        assert_eq!(rng.randrange(-15, 0).unwrap(), -13);
        assert_eq!(rng.randint(-15, -1).unwrap(), -1);
        assert_eq!(rng.randrange(5, 5).unwrap_err().kind(), ErrorKind::InvalidInput);
        assert_eq!(rng.randint(1, 0).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    pub fn test_randint_full_range() {
        let mut rng = Replay::new(&[0]);
        assert_eq!(rng.randint(i64::MIN, i64::MAX).unwrap(), i64::MIN);
        assert_eq!(rng.widths, [64]);
    }

    #[test]
    pub fn test_shuffle_order() {
        // j = 0 for every i rotates the first element to the back
        let mut rng = Replay::new(&[0, 0, 0]);
        let mut items = [1, 2, 3, 4];
        rng.shuffle(&mut items).unwrap();
        assert_eq!(items, [2, 3, 4, 1]);
    }

    #[test]
    pub fn test_choice() {
        let mut rng = Replay::new(&[2]);
        assert_eq!(*rng.choice(&['a', 'b', 'c']).unwrap(), 'c');
        assert_eq!(
            rng.choice::<u8>(&[]).unwrap_err().kind(),
            ErrorKind::InvalidInput
        );
    }

    #[cfg(feature = "std")]
    #[test]
    pub fn test_gauss_uses_spare() {
        let mut rng = Replay::new(&[]);
        let first = rng.gauss(0.0, 1.0).unwrap();
        assert!(rng.gauss_next.is_some());
        let second = rng.gauss(0.0, 1.0).unwrap();
        assert!(rng.gauss_next.is_none());
        // uniform 0.5 puts the angle at pi
        let r = (2.0 * core::f64::consts::LN_2).sqrt();
        assert!((first + r).abs() < 1e-12);
        assert!(second.abs() < 1e-12);
    }
}
