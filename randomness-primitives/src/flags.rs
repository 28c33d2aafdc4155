//! Capability flags describing what a generator guarantees.
//!
//! Flags are descriptive metadata only. They are consulted when selecting a provider and
//! never change how a generator produces bits.

use core::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign};

use bytemuck::{Pod, Zeroable};

/// A set of capability flags.
///
/// Every flag occupies its own bit. Synonyms (such as [`Flags::FAST`] and [`Flags::QUICK`])
/// name the same bit.
///
/// ```
/// use randomness_primitives::flags::Flags;
///
/// let flags = Flags::FULLY_DETERMINISTIC | Flags::SEEDABLE;
/// assert!(flags.contains(Flags::PRNG));
/// assert!(!flags.contains(Flags::SEEDABLE | Flags::FAST));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Pod, Zeroable)]
#[repr(transparent)]
pub struct Flags(u32);

macro_rules! def_flags {
    ($($(#[$meta:meta])* $name:ident $(| $alias:ident)* = $bit:literal;)*) => {
        impl Flags {
            $(
                $(#[$meta])*
                pub const $name: Self = Self(1 << $bit);
                $(
                    #[doc = concat!("Synonym for [`Flags::", stringify!($name), "`].")]
                    pub const $alias: Self = Self::$name;
                )*
            )*

            const NAMED: &'static [(&'static str, Flags)] = &[$((stringify!($name), Self::$name)),*];

            /// Every recognized flag.
            pub const ALL: Self = Self(0 $(| (1 << $bit))*);
        }
    };
}

def_flags! {
    /// Output is a pure function of the seed.
    FULLY_DETERMINISTIC | PSEUDORANDOM | PSEUDO_RANDOM | PRNG = 0;
    /// Output is drawn from a physical or operating system entropy source.
    NONDETERMINISTIC | NON_DETERMINISTIC | TRULY_RANDOM | TRNG = 1;
    NEVER_BLOCKING | NONBLOCKING | NON_BLOCKING = 2;
    /// The state can be exported and restored.
    CLONEABLE | FORKABLE | RESTORABLE | SNAPSHOTTABLE | STATEFUL = 3;
    /// A caller-supplied seed is honored.
    SEEDABLE = 4;
    FAST | QUICK = 5;
    CRYPTOGRAPHICALLY_SECURE = 6;
    CRYPTOGRAPHICALLY_STRONG = 7;
    PROTECTED_MEMORY = 8;
    THREADSAFE = 9;
}

impl Flags {
    /// The empty set.
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Constructs a set from raw bits, or `None` if any bit names no flag.
    pub const fn from_bits(bits: u32) -> Option<Self> {
        if bits & !Self::ALL.0 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Constructs a set from raw bits, discarding bits that name no flag.
    pub const fn from_bits_truncate(bits: u32) -> Self {
        Self(bits & Self::ALL.0)
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Returns `true` if every flag in `other` is also in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if any flag in `other` is also in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` unless the set claims to be both deterministic and nondeterministic.
    pub const fn is_consistent(self) -> bool {
        !self.contains(Self::FULLY_DETERMINISTIC.union(Self::NONDETERMINISTIC))
    }

    /// Iterates over the canonical names of the flags in this set.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .iter()
            .filter(move |(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
    }
}

impl BitOr for Flags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        self.union(rhs)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

impl BitAnd for Flags {
    type Output = Self;
    fn bitand(self, rhs: Self) -> Self {
        self.intersection(rhs)
    }
}

impl BitAndAssign for Flags {
    fn bitand_assign(&mut self, rhs: Self) {
        *self = self.intersection(rhs);
    }
}

impl core::fmt::Debug for Flags {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_empty() {
            return f.write_str("Flags(empty)");
        }
        f.write_str("Flags(")?;
        let mut sep = "";
        for name in self.names() {
            f.write_str(sep)?;
            f.write_str(name)?;
            sep = " | ";
        }
        f.write_str(")")
    }
}
