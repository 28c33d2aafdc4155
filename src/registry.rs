//! The provider registry.
//!
//! A [`Provider`] describes one generator: its name, its precedence, the capability flags
//! it guarantees, and how to construct it. A [`Registry`] is an immutable list of providers
//! in precedence order. [`Registry::global`] lists the built-in providers that are
//! available on this system, probed once on first use.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::error::{Error, ErrorKind, Result};
use crate::flags::Flags;
use crate::generator::Generator;
use crate::seed::Seed;
use crate::util::{OnceLock, get_or_init, new_once};

/// Constructs a generator, honoring the seed if the generator is seedable.
pub type Constructor = fn(Option<&Seed>) -> Result<Box<dyn Generator>>;

/// Reports whether a provider can be used on this system.
pub type Probe = fn() -> bool;

/// Describes a generator known to a [`Registry`].
#[derive(Copy, Clone)]
pub struct Provider {
    precedence: i32,
    name: &'static str,
    constructor: Constructor,
    flags: Flags,
}

impl Provider {
    pub const fn new(
        name: &'static str,
        precedence: i32,
        flags: Flags,
        constructor: Constructor,
    ) -> Self {
        Self {
            precedence,
            name,
            constructor,
            flags,
        }
    }

    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Higher precedence sorts first.
    pub const fn precedence(&self) -> i32 {
        self.precedence
    }

    pub const fn flags(&self) -> Flags {
        self.flags
    }

    /// Constructs a new generator.
    ///
    /// Seedable generators produce a sequence determined by `seed`; without one they are
    /// seeded from the operating system. Other generators ignore `seed`.
    pub fn construct(&self, seed: Option<&Seed>) -> Result<Box<dyn Generator>> {
        #[cfg(feature = "log")]
        log::trace!(
            "constructing {} generator (seeded: {})",
            self.name,
            seed.is_some()
        );
        (self.constructor)(seed)
    }

    fn order(&self, other: &Self) -> core::cmp::Ordering {
        other
            .precedence
            .cmp(&self.precedence)
            .then_with(|| other.name.cmp(self.name))
    }
}

impl core::fmt::Debug for Provider {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Provider")
            .field("precedence", &self.precedence)
            .field("name", &self.name)
            .field("flags", &self.flags)
            .finish_non_exhaustive()
    }
}

/// Collects providers for a [`Registry`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    providers: Vec<Provider>,
}

impl RegistryBuilder {
    pub const fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Adds `provider` unless one with the same name is already present.
    ///
    /// Fails with [`ErrorKind::InvalidInput`] if the provider claims to be both fully
    /// deterministic and nondeterministic.
    pub fn register(&mut self, provider: Provider) -> Result<&mut Self> {
        if !provider.flags.is_consistent() {
            return Err(Error::new_with_message(
                ErrorKind::InvalidInput,
                "provider cannot be both deterministic and nondeterministic",
            ));
        }
        if !self.providers.iter().any(|p| p.name == provider.name) {
            #[cfg(feature = "log")]
            log::debug!(
                "registered provider {} (precedence {})",
                provider.name,
                provider.precedence
            );
            self.providers.push(provider);
        }
        Ok(self)
    }

    /// Runs `probe` and registers `provider` if it returns `true`.
    pub fn register_if(&mut self, probe: Probe, provider: Provider) -> Result<&mut Self> {
        if probe() {
            self.register(provider)
        } else {
            #[cfg(feature = "log")]
            log::debug!("provider {} unavailable", provider.name);
            Ok(self)
        }
    }

    pub fn build(self) -> Registry {
        let mut providers = self.providers;
        providers.sort_by(Provider::order);
        Registry { providers }
    }
}

/// An immutable list of providers, highest precedence first.
///
/// Providers of equal precedence are ordered by descending name.
#[derive(Debug)]
pub struct Registry {
    providers: Vec<Provider>,
}

static GLOBAL: OnceLock<Registry> = new_once();

impl Registry {
    /// The built-in providers available on this system.
    pub fn global() -> &'static Registry {
        get_or_init(&GLOBAL, builtin::registry)
    }

    pub fn list(&self) -> &[Provider] {
        &self.providers
    }

    /// Returns the first provider, in precedence order, that satisfies `predicate`.
    ///
    /// Fails with [`ErrorKind::ProviderNotFound`] if none does.
    pub fn select<F: FnMut(&Provider) -> bool>(&self, mut predicate: F) -> Result<&Provider> {
        self.providers
            .iter()
            .find(|p| predicate(p))
            .ok_or_else(|| {
                Error::new_with_message(
                    ErrorKind::ProviderNotFound,
                    "no provider matches the request",
                )
            })
    }

    pub fn select_name(&self, name: &str) -> Result<&Provider> {
        self.select(|p| p.name == name)
    }

    /// Returns the highest precedence provider with every flag in `flags`.
    pub fn select_flags(&self, flags: Flags) -> Result<&Provider> {
        self.select(|p| p.flags.contains(flags))
    }

    /// Returns the highest precedence provider.
    pub fn best(&self) -> Result<&Provider> {
        self.select(|_| true)
    }

    pub fn construct(&self, provider: &Provider, seed: Option<&Seed>) -> Result<Box<dyn Generator>> {
        provider.construct(seed)
    }
}

mod builtin {
    use alloc::boxed::Box;

    use super::{Probe, Provider, Registry, RegistryBuilder};
    use crate::error::Result;
    use crate::flags::Flags;
    use crate::generator::Generator;
    use crate::jkiss::JKiss;
    use crate::mt::MersenneTwister;
    use crate::seed::Seed;

    const DETERMINISTIC: Flags = Flags::FULLY_DETERMINISTIC
        .union(Flags::NEVER_BLOCKING)
        .union(Flags::CLONEABLE)
        .union(Flags::SEEDABLE)
        .union(Flags::FAST);

    fn always() -> bool {
        true
    }

    fn add(builder: &mut RegistryBuilder, probe: Probe, provider: Provider) {
        if let Err(_e) = builder.register_if(probe, provider) {
            #[cfg(feature = "log")]
            log::warn!("built-in provider rejected: {_e}");
        }
    }

    fn construct_jkiss(seed: Option<&Seed>) -> Result<Box<dyn Generator>> {
        Ok(Box::new(JKiss::new(seed)?))
    }

    fn construct_mersenne_twister(seed: Option<&Seed>) -> Result<Box<dyn Generator>> {
        Ok(Box::new(MersenneTwister::new(seed)?))
    }

    #[cfg(all(feature = "os-rand", any(unix, windows)))]
    mod os {
        use alloc::boxed::Box;

        use crate::error::Result;
        use crate::generator::Generator;
        use crate::seed::Seed;
        use crate::system::os::OsRandom;
        use crate::system::{SystemRandom, URandom};

        pub fn construct_urandom(_: Option<&Seed>) -> Result<Box<dyn Generator>> {
            Ok(Box::new(URandom::new(OsRandom)))
        }

        pub fn construct_system(_: Option<&Seed>) -> Result<Box<dyn Generator>> {
            Ok(Box::new(SystemRandom::new(OsRandom)))
        }

        #[cfg(target_os = "linux")]
        pub fn construct_random(_: Option<&Seed>) -> Result<Box<dyn Generator>> {
            use crate::system::DevRandom;
            use crate::system::linux::LinuxRandom;

            Ok(Box::new(DevRandom::new(LinuxRandom)))
        }
    }

    #[cfg(all(feature = "hardware-rand", any(target_arch = "x86", target_arch = "x86_64")))]
    mod x86 {
        use alloc::boxed::Box;

        use crate::error::Result;
        use crate::generator::Generator;
        use crate::seed::Seed;
        use crate::system::HardwareRandom;
        use crate::system::x86::{X86Mode, X86Rand};

        pub fn has_rdseed() -> bool {
            X86Rand::is_available(X86Mode::Rdseed)
        }

        pub fn has_rdrand() -> bool {
            X86Rand::is_available(X86Mode::Rdrand)
        }

        pub fn construct_rdseed(_: Option<&Seed>) -> Result<Box<dyn Generator>> {
            Ok(Box::new(HardwareRandom::new(X86Rand::new(X86Mode::Rdseed)?)))
        }

        pub fn construct_rdrand(_: Option<&Seed>) -> Result<Box<dyn Generator>> {
            Ok(Box::new(HardwareRandom::new(X86Rand::new(X86Mode::Rdrand)?)))
        }
    }

    pub fn registry() -> Registry {
        let mut builder = RegistryBuilder::new();

        #[cfg(all(feature = "os-rand", target_os = "linux"))]
        add(
            &mut builder,
            crate::system::linux::LinuxRandom::is_available,
            Provider::new(
                "random",
                99,
                Flags::NONDETERMINISTIC
                    .union(Flags::CRYPTOGRAPHICALLY_SECURE)
                    .union(Flags::CRYPTOGRAPHICALLY_STRONG),
                os::construct_random,
            ),
        );

        #[cfg(all(feature = "hardware-rand", any(target_arch = "x86", target_arch = "x86_64")))]
        add(
            &mut builder,
            x86::has_rdseed,
            Provider::new(
                "rdseed",
                69,
                Flags::NONDETERMINISTIC
                    .union(Flags::NEVER_BLOCKING)
                    .union(Flags::CRYPTOGRAPHICALLY_SECURE)
                    .union(Flags::CRYPTOGRAPHICALLY_STRONG),
                x86::construct_rdseed,
            ),
        );

        #[cfg(all(feature = "os-rand", any(unix, windows)))]
        add(
            &mut builder,
            always,
            Provider::new(
                "urandom",
                49,
                Flags::CRYPTOGRAPHICALLY_SECURE,
                os::construct_urandom,
            ),
        );

        #[cfg(all(feature = "hardware-rand", any(target_arch = "x86", target_arch = "x86_64")))]
        add(
            &mut builder,
            x86::has_rdrand,
            Provider::new(
                "rdrand",
                19,
                Flags::NEVER_BLOCKING
                    .union(Flags::FAST)
                    .union(Flags::CRYPTOGRAPHICALLY_SECURE),
                x86::construct_rdrand,
            ),
        );

        #[cfg(all(feature = "os-rand", any(unix, windows)))]
        add(
            &mut builder,
            always,
            Provider::new("system", 9, Flags::empty(), os::construct_system),
        );

        add(
            &mut builder,
            always,
            Provider::new("jkiss", -1, DETERMINISTIC, construct_jkiss),
        );

        add(
            &mut builder,
            always,
            Provider::new(
                "mersenne_twister",
                -11,
                DETERMINISTIC,
                construct_mersenne_twister,
            ),
        );

        builder.build()
    }
}

#[cfg(test)]
mod test {
    use alloc::boxed::Box;
    use alloc::vec::Vec;

    use super::{Provider, Registry, RegistryBuilder};
    use crate::error::{ErrorKind, Result};
    use crate::flags::Flags;
    use crate::generator::Generator;
    use crate::seed::Seed;

    fn construct_jkiss(seed: Option<&Seed>) -> Result<Box<dyn Generator>> {
        Ok(Box::new(crate::jkiss::JKiss::new(seed)?))
    }

    fn provider(name: &'static str, precedence: i32, flags: Flags) -> Provider {
        Provider::new(name, precedence, flags, construct_jkiss)
    }

    fn names(registry: &Registry) -> Vec<&'static str> {
        registry.list().iter().map(Provider::name).collect()
    }

    #[test]
    pub fn test_precedence_then_descending_name() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(provider("low", -5, Flags::empty()))
            .unwrap()
            .register(provider("alpha", 10, Flags::empty()))
            .unwrap()
            .register(provider("beta", 10, Flags::empty()))
            .unwrap()
            .register(provider("high", 50, Flags::empty()))
            .unwrap();
        let registry = builder.build();
        assert_eq!(names(&registry), ["high", "beta", "alpha", "low"]);
        assert_eq!(registry.best().unwrap().name(), "high");
    }

    #[test]
    pub fn test_register_is_idempotent() {
        let mut builder = RegistryBuilder::new();
        builder.register(provider("a", 1, Flags::FAST)).unwrap();
        builder.register(provider("a", 7, Flags::empty())).unwrap();
        let registry = builder.build();
        assert_eq!(registry.list().len(), 1);
        assert_eq!(registry.list()[0].precedence(), 1);
    }

    #[test]
    pub fn test_inconsistent_flags_rejected() {
        let mut builder = RegistryBuilder::new();
        let err = builder
            .register(provider(
                "both",
                0,
                Flags::FULLY_DETERMINISTIC | Flags::NONDETERMINISTIC,
            ))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(builder.build().list().is_empty());
    }

    #[test]
    pub fn test_register_if_probe() {
        let mut builder = RegistryBuilder::new();
        builder
            .register_if(|| false, provider("absent", 0, Flags::empty()))
            .unwrap()
            .register_if(|| true, provider("present", 0, Flags::empty()))
            .unwrap();
        assert_eq!(names(&builder.build()), ["present"]);
    }

    #[test]
    pub fn test_select() {
        let mut builder = RegistryBuilder::new();
        builder
            .register(provider("fast", 20, Flags::FAST))
            .unwrap()
            .register(provider("secure", 10, Flags::CRYPTOGRAPHICALLY_SECURE | Flags::FAST))
            .unwrap();
        let registry = builder.build();

        assert_eq!(registry.select_flags(Flags::FAST).unwrap().name(), "fast");
        assert_eq!(
            registry
                .select_flags(Flags::CRYPTOGRAPHICALLY_SECURE)
                .unwrap()
                .name(),
            "secure"
        );
        assert_eq!(registry.select_name("secure").unwrap().precedence(), 10);
        assert_eq!(
            registry.select_name("missing").unwrap_err().kind(),
            ErrorKind::ProviderNotFound
        );
        assert_eq!(
            registry.select_flags(Flags::SEEDABLE).unwrap_err().kind(),
            ErrorKind::ProviderNotFound
        );
        assert_eq!(
            RegistryBuilder::new().build().best().unwrap_err().kind(),
            ErrorKind::ProviderNotFound
        );
    }

    #[test]
    pub fn test_global_builtins() {
        let registry = Registry::global();
        assert!(core::ptr::eq(registry, Registry::global()));

        let jkiss = registry.select_name("jkiss").unwrap();
        assert_eq!(jkiss.precedence(), -1);
        assert!(jkiss.flags().contains(
            Flags::FULLY_DETERMINISTIC | Flags::CLONEABLE | Flags::SEEDABLE | Flags::FAST
        ));
        let mt = registry.select_name("mersenne_twister").unwrap();
        assert_eq!(mt.precedence(), -11);

        for pair in registry.list().windows(2) {
            assert!(pair[0].precedence() >= pair[1].precedence());
        }
        for p in registry.list() {
            assert!(p.flags().is_consistent());
        }

        assert_eq!(
            registry.select_flags(Flags::SEEDABLE).unwrap().name(),
            "jkiss"
        );
    }

    #[test]
    pub fn test_builtins_go_through_builder() {
        let built = super::builtin::registry();
        let names: Vec<&str> = built.list().iter().map(Provider::name).collect();
        let global: Vec<&str> = Registry::global().list().iter().map(Provider::name).collect();
        assert_eq!(names, global);
        for (i, name) in names.iter().enumerate() {
            assert!(!names[i + 1..].contains(name), "duplicate provider {name}");
        }

        let mut builder = RegistryBuilder::new();
        for p in built.list() {
            builder.register(p.clone()).unwrap();
        }
        assert_eq!(builder.build().list().len(), names.len());
    }

    #[test]
    pub fn test_seeded_construction_is_deterministic() {
        let registry = Registry::global();
        let seed = Seed::from(12345u64);
        for name in ["jkiss", "mersenne_twister"] {
            let provider = registry.select_name(name).unwrap();
            let mut a = registry.construct(provider, Some(&seed)).unwrap();
            let mut b = provider.construct(Some(&seed)).unwrap();
            for _ in 0..100 {
                assert_eq!(a.getbits_u64(64).unwrap(), b.getbits_u64(64).unwrap());
            }
        }
    }

    #[cfg(all(feature = "os-rand", any(unix, windows)))]
    #[test]
    pub fn test_system_providers() {
        let registry = Registry::global();
        for name in ["urandom", "system"] {
            let provider = registry.select_name(name).unwrap();
            let mut rng = provider.construct(Some(&Seed::from(1u64))).unwrap();
            assert!(rng.below_u64(10).unwrap() < 10);
            assert_eq!(rng.export_state().unwrap_err().kind(), ErrorKind::Unsupported);
        }
        assert!(
            registry
                .select_flags(Flags::CRYPTOGRAPHICALLY_SECURE)
                .unwrap()
                .precedence()
                >= 49
        );
    }
}
