#[cfg(any(feature = "std", test))]
mod once_impl {
    pub type OnceLock<T> = std::sync::OnceLock<T>;

    pub const fn new_once<T>() -> OnceLock<T> {
        std::sync::OnceLock::new()
    }

    pub fn get_or_init<T>(cell: &OnceLock<T>, f: impl FnOnce() -> T) -> &T {
        cell.get_or_init(f)
    }
}

#[cfg(not(any(feature = "std", test)))]
mod once_impl {
    pub type OnceLock<T> = spin::Once<T>;

    pub const fn new_once<T>() -> OnceLock<T> {
        spin::Once::new()
    }

    pub fn get_or_init<T>(cell: &OnceLock<T>, f: impl FnOnce() -> T) -> &T {
        cell.call_once(f)
    }
}

pub use once_impl::*;

/// Number of bits needed to write `n`; zero for zero.
pub const fn bit_length_u64(n: u64) -> u32 {
    u64::BITS - n.leading_zeros()
}

/// Mask with the low `k` bits set, for `k <= 64`.
pub const fn low_mask(k: u32) -> u64 {
    if k >= 64 { u64::MAX } else { (1 << k) - 1 }
}
