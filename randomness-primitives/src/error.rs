#[cfg(feature = "error-track_caller")]
use core::panic::Location;

/// The Kind of Error
///
#[derive(Copy, Clone, Debug, Hash, PartialEq, Eq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// An Error that does not fall into any other category.
    /// This Error is not used by randomness itself.
    Other,
    /// The operation is not supported by the generator it was requested on,
    /// such as exporting the state of a generator that is not [`CLONEABLE`][crate::flags::Flags::CLONEABLE].
    Unsupported,
    Interrupted,
    PermissionDenied,
    /// A width or bound was zero, a range was empty, or a seed or provider was rejected.
    InvalidInput,
    /// A state record was structurally malformed for the generator it was passed to.
    InvalidData,
    OutOfMemory,
    /// No registered provider satisfied a selection predicate.
    ProviderNotFound,
    /// A state record carried a format version the generator does not understand.
    StateVersion,
    /// The entropy source backing a generator is not present on this system.
    SourceUnavailable,
    /// A byte source returned no bytes at all.
    UnexpectedEof,
    WouldBlock,

    #[doc(hidden)]
    __Internal,
    #[doc(hidden)]
    __Uncategorized,
}

mod sys;

impl core::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ErrorKind::Other => f.write_str("Other Error"),
            ErrorKind::Unsupported => f.write_str("Unsupported Operation"),
            ErrorKind::Interrupted => f.write_str("Interrupted"),
            ErrorKind::PermissionDenied => f.write_str("Permission Denied"),
            ErrorKind::InvalidInput => f.write_str("Invalid Input"),
            ErrorKind::InvalidData => f.write_str("Invalid Data"),
            ErrorKind::OutOfMemory => f.write_str("Out of Memory"),
            ErrorKind::ProviderNotFound => f.write_str("Provider not Found"),
            ErrorKind::StateVersion => f.write_str("Unrecognized State Version"),
            ErrorKind::SourceUnavailable => f.write_str("Entropy Source Unavailable"),
            ErrorKind::UnexpectedEof => f.write_str("Unexpected End of Entropy"),
            ErrorKind::WouldBlock => f.write_str("Operation would Block"),
            ErrorKind::__Internal => f.write_str("Internal Error (Please Report a bug)"),
            ErrorKind::__Uncategorized => f.write_str("(uncategorized error)"),
        }
    }
}

#[derive(Debug)]
enum ErrorInner {
    None,
    #[cfg(feature = "alloc")]
    Custom(alloc::boxed::Box<dyn core::error::Error + Send + Sync + 'static>),
    Message(&'static str),
    OsError(i32),
    Version {
        generator: &'static str,
        found: u32,
        expected: u32,
    },
}

/// The type of errors returned from this library.
///
/// ## Traits
/// The type implements [`core::error::Error`]. This allows converting it to many other error types (including [`std::io::Error`]).
///
#[cfg_attr(
    feature = "std",
    doc = "When the `std` feature is available, [`From<std::io::Error>`] is implemented, as well as the reciprocal impl. These conversions are lossy when round-tripped."
)]
#[derive(Debug)]
pub struct Error {
    kind: ErrorKind,
    inner: ErrorInner,
    #[cfg(feature = "error-track_caller")]
    #[allow(dead_code)] // Only used by `Debug`
    error_location: &'static Location<'static>,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.kind.fmt(f)?;

        match &self.inner {
            ErrorInner::None => Ok(()),
            #[cfg(feature = "alloc")]
            ErrorInner::Custom(inner) => {
                f.write_str(": ")?;
                inner.fmt(f)
            }
            ErrorInner::Message(msg) => {
                f.write_str(": ")?;
                f.write_str(msg)
            }
            ErrorInner::OsError(i) => f.write_fmt(format_args!(" (os error {i})")),
            ErrorInner::Version {
                generator,
                found,
                expected,
            } => f.write_fmt(format_args!(
                ": state with version {found} passed to {generator} of version {expected}"
            )),
        }
    }
}

impl core::error::Error for Error {}

impl Error {
    #[cfg_attr(feature = "error-track_caller", track_caller)]
    fn from_kind_and_payload(kind: ErrorKind, inner: ErrorInner) -> Self {
        Self {
            kind,
            inner,
            #[cfg(feature = "error-track_caller")]
            error_location: Location::caller(),
        }
    }

    /// Constructs a new error with the specified `kind` and the specified `payload`.
    ///
    /// Note that this function allocates (even if the payload is a string).
    /// If you do not need a payload, convert from [`ErrorKind`] instead.
    /// If your payload is a string literal, use [`Error::new_with_message`] instead.
    #[cfg(feature = "alloc")]
    #[cfg_attr(feature = "nightly-docs", doc(cfg(feature = "alloc")))]
    #[cfg_attr(feature = "error-track_caller", track_caller)]
    pub fn new<E: Into<alloc::boxed::Box<dyn core::error::Error + Send + Sync + 'static>>>(
        kind: ErrorKind,
        payload: E,
    ) -> Self {
        Self::from_kind_and_payload(kind, ErrorInner::Custom(payload.into()))
    }

    /// Constructs a new error with the specified `kind` and the specified `msg`.
    #[cfg_attr(feature = "error-track_caller", track_caller)]
    pub fn new_with_message(kind: ErrorKind, msg: &'static str) -> Self {
        Self::from_kind_and_payload(kind, ErrorInner::Message(msg))
    }

    /// Constructs a new error from a raw os error.
    #[cfg_attr(feature = "error-track_caller", track_caller)]
    pub fn from_raw_os_error(errno: i32) -> Self {
        let kind = sys::kind_from_raw_os_error(errno);

        Self::from_kind_and_payload(kind, ErrorInner::OsError(errno))
    }

    /// Constructs an [`ErrorKind::StateVersion`] error for a state record of version `found`
    /// passed to `generator`, which understands only `expected`.
    #[cfg_attr(feature = "error-track_caller", track_caller)]
    pub fn state_version(generator: &'static str, found: u32, expected: u32) -> Self {
        Self::from_kind_and_payload(
            ErrorKind::StateVersion,
            ErrorInner::Version {
                generator,
                found,
                expected,
            },
        )
    }

    /// Returns the error kind.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the raw OS Error.
    ///
    /// If the function was constructed with [`Error::from_raw_os_error`], returns the input value.
    pub fn raw_os_error(&self) -> Option<i32> {
        match self.inner {
            ErrorInner::OsError(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the `(found, expected)` versions of an [`ErrorKind::StateVersion`] error.
    pub fn state_versions(&self) -> Option<(u32, u32)> {
        match self.inner {
            ErrorInner::Version {
                found, expected, ..
            } => Some((found, expected)),
            _ => None,
        }
    }

    /// This returns the inner error, if any.
    ///
    /// If this [`Error`] was constructed using [`Error::new`] it returns the inner error.
    /// If this [`Error`] was constructed using [`Error::new_with_message`] it returns a Box that contains the message (but cannot be [`Error::downcast`])
    ///
    /// Otherwise, returns [`None`].
    #[cfg(feature = "alloc")]
    #[cfg_attr(feature = "nightly-docs", doc(cfg(feature = "alloc")))]
    pub fn into_inner(
        self,
    ) -> Option<alloc::boxed::Box<dyn core::error::Error + Send + Sync + 'static>> {
        match self.inner {
            ErrorInner::Custom(b) => Some(b),
            ErrorInner::Message(n) => Some(alloc::boxed::Box::from(n)),
            _ => None,
        }
    }

    /// Attempts to downcast to `E`.
    ///
    /// Returns [`Ok`] if the inner error is of type `E`, and [`Err`] otherwise.
    ///
    /// ## Notes
    /// This function is available always, but can never succeed unless the `alloc` feature is enabled.
    pub fn downcast<E: core::error::Error + Send + Sync + 'static>(
        self,
    ) -> core::result::Result<E, Self> {
        match self.inner {
            #[cfg(feature = "alloc")]
            ErrorInner::Custom(n) => match n.downcast() {
                Ok(b) => Ok(*b),
                Err(e) => Err(Self {
                    kind: self.kind,
                    inner: ErrorInner::Custom(e),
                    #[cfg(feature = "error-track_caller")]
                    error_location: self.error_location,
                }),
            },
            _ => Err(self),
        }
    }
}

impl From<ErrorKind> for Error {
    #[cfg_attr(feature = "error-track_caller", track_caller)]
    fn from(value: ErrorKind) -> Self {
        Error::from_kind_and_payload(value, ErrorInner::None)
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(feature = "std")]
#[cfg_attr(feature = "nightly-docs", doc(cfg(feature = "std")))]
impl From<std::io::ErrorKind> for ErrorKind {
    fn from(value: std::io::ErrorKind) -> Self {
        match value {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            std::io::ErrorKind::InvalidInput => ErrorKind::InvalidInput,
            std::io::ErrorKind::InvalidData => ErrorKind::InvalidData,
            std::io::ErrorKind::NotFound => ErrorKind::SourceUnavailable,
            std::io::ErrorKind::Interrupted => ErrorKind::Interrupted,
            std::io::ErrorKind::Unsupported => ErrorKind::Unsupported,
            std::io::ErrorKind::UnexpectedEof => ErrorKind::UnexpectedEof,
            std::io::ErrorKind::WouldBlock => ErrorKind::WouldBlock,
            std::io::ErrorKind::OutOfMemory => ErrorKind::OutOfMemory,
            std::io::ErrorKind::Other => ErrorKind::Other,
            _ => ErrorKind::__Uncategorized,
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "nightly-docs", doc(cfg(feature = "std")))]
impl From<std::io::Error> for Error {
    #[cfg_attr(feature = "error-track_caller", track_caller)]
    fn from(value: std::io::Error) -> Self {
        let kind: ErrorKind = value.kind().into();

        if let Some(err) = value.raw_os_error() {
            Self::from_kind_and_payload(kind, ErrorInner::OsError(err))
        } else if let Some(e) = value.into_inner() {
            Self::new(kind, e)
        } else {
            Self::from_kind_and_payload(kind, ErrorInner::None)
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "nightly-docs", doc(cfg(feature = "std")))]
impl From<ErrorKind> for std::io::ErrorKind {
    fn from(value: ErrorKind) -> Self {
        match value {
            ErrorKind::Unsupported => Self::Unsupported,
            ErrorKind::Interrupted => Self::Interrupted,
            ErrorKind::PermissionDenied => Self::PermissionDenied,
            ErrorKind::InvalidInput => Self::InvalidInput,
            ErrorKind::InvalidData | ErrorKind::StateVersion => Self::InvalidData,
            ErrorKind::OutOfMemory => Self::OutOfMemory,
            ErrorKind::ProviderNotFound | ErrorKind::SourceUnavailable => Self::NotFound,
            ErrorKind::UnexpectedEof => Self::UnexpectedEof,
            ErrorKind::WouldBlock => Self::WouldBlock,
            ErrorKind::Other | ErrorKind::__Internal | ErrorKind::__Uncategorized => Self::Other,
        }
    }
}

#[cfg(feature = "std")]
#[cfg_attr(feature = "nightly-docs", doc(cfg(feature = "std")))]
impl From<Error> for std::io::Error {
    fn from(value: Error) -> Self {
        let kind: std::io::ErrorKind = value.kind.into();

        if let Some(os_err) = value.raw_os_error() {
            Self::from_raw_os_error(os_err)
        } else {
            Self::new(kind, value)
        }
    }
}
