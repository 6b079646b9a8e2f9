//! `postq` error types.
use std::{backtrace::Backtrace, fmt};

use crate::{connection::ParseError, scan::DecodeError};

/// A specialized [`Result`] type for `postq` operation.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// All possible error from `postq` library.
pub struct Error {
    backtrace: Backtrace,
    kind: ErrorKind,
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }

    pub(crate) fn connection(message: impl Into<String>) -> Self {
        ErrorKind::Connection(message.into()).into()
    }

    pub(crate) fn execution(message: impl Into<String>) -> Self {
        ErrorKind::Execution(message.into()).into()
    }
}

/// All possible error kind from `postq` library.
pub enum ErrorKind {
    /// Native connect or reset failure, carries the libpq message.
    Connection(String),
    /// Non-empty result error message after an exec or prepare.
    Execution(String),
    /// Failed to decode a row value.
    Decode(DecodeError),
    /// Operation on a released wrapper or an out of range cursor.
    Misuse(Misuse),
    /// Failed to parse connection url.
    Config(ParseError),
}

/// Caller side misuse of a wrapper.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Misuse {
    /// Operation on a closed [`Connection`][crate::Connection].
    ConnectionClosed,
    /// Operation on a cleared [`Rows`][crate::Rows].
    ResultCleared,
    /// Operation on a cleared [`Statement`][crate::Statement].
    StatementCleared,
    /// Row read before the first `next` or after exhaustion.
    NoCurrentRow,
}

macro_rules! from {
    (<$ty:ty>$pat:pat => $body:expr) => {
        impl From<$ty> for Error {
            fn from($pat: $ty) -> Self {
                let backtrace = std::backtrace::Backtrace::capture();
                Self { backtrace, kind: $body }
            }
        }
    };
}

from!(<ErrorKind>e => e);
from!(<DecodeError>e => ErrorKind::Decode(e));
from!(<Misuse>e => ErrorKind::Misuse(e));
from!(<ParseError>e => ErrorKind::Config(e));

impl std::error::Error for Error { }

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.kind, f)?;

        if let std::backtrace::BacktraceStatus::Captured = self.backtrace.status() {
            let mut backtrace = self.backtrace.to_string();
            write!(f, "\n\n")?;
            writeln!(f, "Stack backtrace:")?;
            backtrace.truncate(backtrace.trim_end().len());
            write!(f, "{}", backtrace)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl std::error::Error for ErrorKind { }

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection(e) => write!(f, "conn error: {e}"),
            Self::Execution(e) => write!(f, "result error: {e}"),
            Self::Decode(e) => e.fmt(f),
            Self::Misuse(e) => e.fmt(f),
            Self::Config(e) => e.fmt(f),
        }
    }
}

impl fmt::Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

impl std::error::Error for Misuse { }

impl fmt::Display for Misuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConnectionClosed => f.write_str("connection already closed"),
            Self::ResultCleared => f.write_str("result already cleared"),
            Self::StatementCleared => f.write_str("statement already cleared"),
            Self::NoCurrentRow => f.write_str("no current row"),
        }
    }
}

impl fmt::Debug for Misuse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}
