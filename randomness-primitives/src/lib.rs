#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![cfg_attr(feature = "nightly-docs", feature(doc_cfg))]
//! Shared vocabulary for the `randomness` generators: the error type, capability flags,
//! and the byte-source capability consumed by buffering generators.

#[cfg(feature = "alloc")]
extern crate alloc;

pub mod error;
pub mod flags;
pub mod rand;
