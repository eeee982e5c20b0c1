
//! Error type definitions.

use std::borrow::Cow;
use std::convert::TryFrom;
use std::error;
use std::fmt;
use std::io::ErrorKind;

pub use std::io::Error as IoError;
pub use std::io::Result as IoResult;

/// A result that may contain an error.
pub type Result<T> = std::result::Result<T, Error>;

/// A result that, if ok, contains nothing, and otherwise contains an error.
pub type UnitResult = Result<()>;


/// An error that may happen while reading or writing a gwd file.
#[derive(Debug)]
pub enum Error {

    /// The input does not start with a gwd header:
    /// fewer than twelve bytes were available, or the magic bytes mismatch.
    /// Callers may treat this as "not this format" instead of a failure.
    NotGwd,

    /// The input ended in the middle of the compressed contents.
    UnexpectedEnd,

    /// The contents of the file are not supported by
    /// this specific implementation of the gwd format.
    NotSupported(Cow<'static, str>),

    /// The contents of the image are contradicting or insufficient.
    Invalid(Cow<'static, str>),

    /// The underlying byte stream could not be read or written successfully.
    Io(IoError),
}

impl Error {

    /// Create an error of the variant `Invalid`.
    pub fn invalid(message: impl Into<Cow<'static, str>>) -> Self {
        Error::Invalid(message.into())
    }

    /// Create an error of the variant `NotSupported`.
    pub fn unsupported(message: impl Into<Cow<'static, str>>) -> Self {
        Error::NotSupported(message.into())
    }
}

/// Enable using the `?` operator on `io::Result`.
/// A stream that ends while the decoder still needs bytes
/// is a property of the data, not of the file system.
impl From<IoError> for Error {
    fn from(error: IoError) -> Self {
        if error.kind() == ErrorKind::UnexpectedEof { Error::UnexpectedEnd }
        else { Error::Io(error) }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NotGwd => write!(formatter, "not a gwd file"),
            Error::UnexpectedEnd => write!(formatter, "unexpected end of input"),
            Error::NotSupported(message) => write!(formatter, "unsupported: {}", message),
            Error::Invalid(message) => write!(formatter, "invalid: {}", message),
            Error::Io(error) => write!(formatter, "io error: {}", error),
        }
    }
}

/// Panics on 16 bit machines, where an image may not fit into the address space.
pub(crate) fn u32_to_usize(value: u32) -> usize {
    usize::try_from(value).expect("(u32 as usize) overflowed")
}

/// Fails where the value does not fit into the pointer width.
pub(crate) fn u64_to_usize(value: u64, error_message: &'static str) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::invalid(error_message))
}
