//! The surface consumed from the native client library.
//!
//! Every value travels as text: the traits below mirror exactly the libpq
//! calls the driver issues, nothing more. [`Rows`][crate::Rows],
//! [`Statement`][crate::Statement] and [`Connection`][crate::Connection]
//! are written against these traits so their cursor and lifecycle rules can
//! be tested without a server.
use crate::{Result, encode::Encoded, error::Error};

/// One native connection handle.
///
/// Errors are the raw native message; translation into
/// [`ErrorKind`][crate::ErrorKind] happens in the wrappers.
pub(crate) trait NativeConnection: Send {
    /// Plain text execute, multi-statement text allowed.
    fn exec(&self, sql: &str) -> Result<Box<dyn NativeResult>, String>;

    /// Parameterized execute, single statement only.
    fn exec_params(&self, sql: &str, params: &[Encoded]) -> Result<Box<dyn NativeResult>, String>;

    /// Register a named server-side prepared statement.
    fn prepare(&self, name: &str, sql: &str) -> Result<Box<dyn NativeResult>, String>;

    /// Execute a previously registered statement by name.
    fn exec_prepared(&self, name: &str, params: &[Encoded]) -> Result<Box<dyn NativeResult>, String>;

    /// Drop the server connection and re-establish it with the original
    /// parameters.
    fn reset(&self) -> Result<(), String>;

    /// The connection options in effect.
    fn options(&self) -> String;
}

/// One native result handle.
///
/// Cell coordinates are guaranteed in range by the caller: the row by the
/// [`Rows`][crate::Rows] cursor, the column by its count check.
pub(crate) trait NativeResult: Send {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    fn column_name(&self, col: usize) -> String;

    /// Cell text, verbatim. Empty for a null cell.
    fn value(&self, row: usize, col: usize) -> String;

    fn is_null(&self, row: usize, col: usize) -> bool;

    /// Empty message means success, even with zero rows.
    fn error_message(&self) -> String;
}

/// Translate a fresh native result into success or an execution error.
pub(crate) fn result_error(res: &dyn NativeResult) -> Result<()> {
    let message = res.error_message();
    if message.is_empty() {
        Ok(())
    } else {
        Err(Error::execution(message))
    }
}
