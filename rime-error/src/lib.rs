#![deny(missing_docs)]

//! This crate defines error & result types for Rime.
//! It also contains a variety of useful macros for error handling.

#[cfg(feature = "avro")]
mod avro;

use std::backtrace::Backtrace;
// Same type under another name: thiserror would otherwise emit a nightly-only `provide()` impl.
use std::backtrace::Backtrace as Trace;
use std::borrow::Cow;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;
use std::{env, fmt, io};

/// A string that can be used as an error message.
#[derive(Debug)]
pub struct ErrString(Cow<'static, str>);

#[allow(clippy::fallible_impl_from)]
impl<T> From<T> for ErrString
where
    T: Into<Cow<'static, str>>,
{
    #[allow(clippy::panic)]
    fn from(msg: T) -> Self {
        if env::var("RIME_PANIC_ON_ERR").as_deref().unwrap_or("") == "1" {
            panic!("{}\nBacktrace:\n{}", msg.into(), Backtrace::capture());
        } else {
            Self(msg.into())
        }
    }
}

impl AsRef<str> for ErrString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ErrString {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for ErrString {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

/// The top-level error type for Rime.
#[derive(thiserror::Error)]
#[non_exhaustive]
pub enum RimeError {
    /// An index is out of bounds.
    #[error("index {0} out of bounds from {1} to {2}\nBacktrace:\n{3}")]
    OutOfBounds(usize, usize, usize, Trace),
    /// An invalid argument was provided.
    #[error("{0}\nBacktrace:\n{1}")]
    InvalidArgument(ErrString, Trace),
    /// A logical type has no representation in the requested physical format.
    #[error("unsupported type: {0}\nBacktrace:\n{1}")]
    UnsupportedType(ErrString, Trace),
    /// An assertion failed.
    #[error("{0}\nBacktrace:\n{1}")]
    AssertionFailed(ErrString, Trace),
    /// A wrapper for other errors, carrying additional context.
    #[error("{0}: {1}")]
    Context(ErrString, #[source] Box<RimeError>),
    /// A wrapper for errors from the Avro library.
    #[cfg(feature = "avro")]
    #[error(transparent)]
    Avro(Box<apache_avro::Error>),
    /// A wrapper for IO errors.
    #[error(transparent)]
    IOError(#[from] io::Error),
    /// A wrapper for errors from the serde_json library.
    #[cfg(feature = "serde")]
    #[error(transparent)]
    JsonError(#[from] serde_json::Error),
}

impl RimeError {
    /// Adds additional context to an error.
    pub fn with_context<T: Into<ErrString>>(self, msg: T) -> Self {
        RimeError::Context(msg.into(), Box::new(self))
    }

    /// Returns the innermost error, skipping any [`RimeError::Context`] wrappers.
    pub fn root_cause(&self) -> &RimeError {
        match self {
            RimeError::Context(_, inner) => inner.root_cause(),
            other => other,
        }
    }
}

impl Debug for RimeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// A type alias for Results that return RimeErrors as their error type.
pub type RimeResult<T> = Result<T, RimeError>;

/// A convenient macro for creating a RimeError.
#[macro_export]
macro_rules! rime_err {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::RimeError::OutOfBounds($idx, $start, $stop, Backtrace::capture())
        )
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {{
        use std::backtrace::Backtrace;
        $crate::__private::must_use(
            $crate::RimeError::$variant(format!($fmt, $($arg),*).into(), Backtrace::capture())
        )
    }};
    ($variant:ident: $err:expr $(,)?) => {
        $crate::__private::must_use(
            $crate::RimeError::$variant($err)
        )
    };
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::rime_err!(InvalidArgument: $fmt, $($arg),*)
    };
}

/// A convenient macro for returning a RimeError.
#[macro_export]
macro_rules! rime_bail {
    ($($tt:tt)+) => {
        return Err($crate::rime_err!($($tt)+))
    };
}

/// A convenient macro for panicking with a RimeError in the presence of a programmer error
/// (e.g., an invariant has been violated).
#[macro_export]
macro_rules! rime_panic {
    (OutOfBounds: $idx:expr, $start:expr, $stop:expr) => {{
        $crate::rime_panic!($crate::rime_err!(OutOfBounds: $idx, $start, $stop))
    }};
    ($variant:ident: $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::rime_panic!($crate::rime_err!($variant: $fmt, $($arg),*))
    };
    ($fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::rime_panic!($crate::rime_err!($fmt, $($arg),*))
    };
    ($err:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {{
        let err: $crate::RimeError = $err;
        panic!("{}", err.with_context(format!($fmt, $($arg),*)))
    }};
    ($err:expr) => {{
        let err: $crate::RimeError = $err;
        panic!("{}", err)
    }};
}

/// A trait for unwrapping a RimeResult.
pub trait RimeUnwrap {
    /// The type of the value being unwrapped.
    type Output;

    /// Returns the value of the result if it is Ok, otherwise panics with the error.
    /// Should be called only in contexts where the error condition represents a bug (programmer error).
    fn rime_unwrap(self) -> Self::Output;
}

impl<T, E> RimeUnwrap for Result<T, E>
where
    E: Into<RimeError>,
{
    type Output = T;

    #[inline(always)]
    fn rime_unwrap(self) -> Self::Output {
        self.map_err(|err| err.into())
            .unwrap_or_else(|err| rime_panic!(err))
    }
}

/// A trait for expect-ing a RimeResult or an Option.
pub trait RimeExpect {
    /// The type of the value being expected.
    type Output;

    /// Returns the value of the result if it is Ok, otherwise panics with the error.
    /// Should be called only in contexts where the error condition represents a bug (programmer error).
    fn rime_expect(self, msg: &str) -> Self::Output;
}

impl<T, E> RimeExpect for Result<T, E>
where
    E: Into<RimeError>,
{
    type Output = T;

    #[inline(always)]
    fn rime_expect(self, msg: &str) -> Self::Output {
        self.map_err(|err| err.into())
            .unwrap_or_else(|e| rime_panic!(e.with_context(msg.to_string())))
    }
}

impl<T> RimeExpect for Option<T> {
    type Output = T;

    #[inline(always)]
    fn rime_expect(self, msg: &str) -> Self::Output {
        self.unwrap_or_else(|| {
            let err = RimeError::AssertionFailed(msg.to_string().into(), Backtrace::capture());
            rime_panic!(err)
        })
    }
}

#[doc(hidden)]
pub mod __private {
    #[doc(hidden)]
    #[inline]
    #[must_use]
    pub const fn must_use(error: crate::RimeError) -> crate::RimeError {
        error
    }
}
