#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![cfg_attr(feature = "nightly-docs", feature(doc_cfg))]
#![deny(unsafe_code)]
//! Uniform access to random bit generators.
//!
//! Every generator, whether it buffers bytes from the operating system or evolves a
//! deterministic state, implements [`Generator`]: callers ask for `k` bits, a bounded
//! integer, or a float without caring where the bits come from. The process-wide
//! [`Registry`] lists the generators available on this system in precedence order.
//!
//! ```
//! use randomness::{Flags, Registry, Seed};
//!
//! let registry = Registry::global();
//! let provider = registry.select_flags(Flags::SEEDABLE | Flags::CLONEABLE).unwrap();
//! let mut rng = provider.construct(Some(&Seed::from(12345u64))).unwrap();
//! assert!(rng.below_u64(6).unwrap() < 6);
//! ```
//!
//! # Features
//! * `std` (default): Enables `std` conversions, [`GeneratorExt::gauss`], and uses [`std::sync::OnceLock`] for the global registry
//! * `alloc`: Enables error payloads that require the `alloc` crate
//! * `os-rand` (default): Registers the generators backed by the operating system, and seeds deterministic generators from it when no seed is given
//! * `hardware-rand` (default): Registers the generators backed by the x86 `rdrand` and `rdseed` instructions
//! * `runtime-detect` (default): Probes `cpuid` for `rdrand` and `rdseed` at runtime. Without it, only the compile-time target features are consulted
//! * `log`: Reports registry population through the `log` facade
//!
//! [`Generator`]: generator::Generator
//! [`GeneratorExt::gauss`]: sample::GeneratorExt::gauss
//! [`Registry`]: registry::Registry

extern crate alloc;

pub use randomness_primitives::{error, flags};

pub mod generator;
pub mod jkiss;
pub mod mt;
pub mod registry;
pub mod reservoir;
pub mod sample;
pub mod seed;
pub mod system;

mod detect;
mod util;

pub use flags::Flags;
pub use generator::{Generator, State};
pub use randomness_primitives::rand::ByteSource;
pub use registry::{Provider, Registry, RegistryBuilder};
pub use sample::GeneratorExt;
pub use seed::Seed;

pub use ibig::UBig;
