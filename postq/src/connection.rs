//! Postgres connection.
use std::cell::{Cell, RefCell};

use crate::{
    Result, Rows, Statement,
    encode::{Encode, Encoded},
    error::{Error, Misuse},
    native::{NativeConnection, NativeResult, result_error},
};

mod config;

pub use config::{Config, ParseError};

/// A blocking connection to a Postgres server.
///
/// Every call runs to completion on the caller's thread; there is no
/// internal locking and no timeout. The type is `Send` but not `Sync`:
/// move it between threads freely, but exactly one thread drives it at a
/// time.
///
/// The native handle is released by [`close`][Connection::close] or, if
/// never closed, when the value is dropped; either way exactly once.
pub struct Connection {
    native: RefCell<Option<Box<dyn NativeConnection>>>,
    stmt_seq: Cell<u64>,
}

impl Connection {
    /// Connect with a libpq `keyword=value` conninfo string, e.g.
    /// `"host=localhost dbname=testdb"`.
    ///
    /// The recognized keywords are owned by libpq, the string is passed
    /// through verbatim.
    pub fn connect(conninfo: &str) -> Result<Connection> {
        log::debug!("connecting");
        let native = crate::libpq::PgConn::connect(conninfo).map_err(Error::connection)?;
        Ok(Self::from_native(Box::new(native)))
    }

    /// Connect with a [`Config`].
    pub fn connect_config(config: &Config) -> Result<Connection> {
        Self::connect(&config.conninfo())
    }

    /// Connect with [`Config::from_env`].
    pub fn connect_env() -> Result<Connection> {
        Self::connect_config(&Config::from_env())
    }

    pub(crate) fn from_native(native: Box<dyn NativeConnection>) -> Connection {
        Self {
            native: RefCell::new(Some(native)),
            stmt_seq: Cell::new(0),
        }
    }

    /// Execute `sql`, discarding any returned rows.
    ///
    /// With no parameters the text is sent as-is and may contain multiple
    /// statements; with parameters it is a single parameterized statement.
    pub fn exec(&self, sql: &str, params: &[&dyn Encode]) -> Result<()> {
        let res = self.run(sql, params)?;
        result_error(&*res)
    }

    /// Execute `sql`, returning its rows.
    pub fn query(&self, sql: &str, params: &[&dyn Encode]) -> Result<Rows> {
        let res = self.run(sql, params)?;
        result_error(&*res)?;
        Ok(Rows::new(res))
    }

    /// Register a server-side prepared statement.
    ///
    /// The statement name comes from a per-connection counter; a name is
    /// consumed even when preparation fails, so names are never reused.
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>> {
        let name = self.next_statement_name();
        let res = self.native(|n| n.prepare(&name, sql))?.map_err(Error::execution)?;
        result_error(&*res)?;
        log::debug!("prepared statement {name}");
        Ok(Statement::new(self, name, res))
    }

    /// Drop the server connection and reconnect with the original
    /// parameters.
    ///
    /// On failure the connection is left open for a retry or
    /// [`close`][Connection::close].
    pub fn reset(&self) -> Result<()> {
        log::debug!("resetting connection");
        self.native(|n| n.reset())?.map_err(Error::connection)
    }

    /// The connection options in effect.
    pub fn options(&self) -> Result<String> {
        self.native(|n| n.options())
    }

    /// Release the native connection handle.
    ///
    /// Idempotent; dropping the value without calling it releases the
    /// handle as well. The server discards all prepared statements of the
    /// session. Any later operation is an error.
    pub fn close(&self) {
        self.native.borrow_mut().take();
    }

    fn run(&self, sql: &str, params: &[&dyn Encode]) -> Result<Box<dyn NativeResult>> {
        let out = if params.is_empty() {
            self.native(|n| n.exec(sql))?
        } else {
            let encoded: Vec<Encoded> = params.iter().map(|p| p.encode()).collect();
            self.native(|n| n.exec_params(sql, &encoded))?
        };
        out.map_err(Error::execution)
    }

    pub(crate) fn exec_prepared(
        &self,
        name: &str,
        params: &[Encoded],
    ) -> Result<Box<dyn NativeResult>> {
        self.native(|n| n.exec_prepared(name, params))?.map_err(Error::execution)
    }

    fn next_statement_name(&self) -> String {
        let seq = self.stmt_seq.get();
        self.stmt_seq.set(seq + 1);
        let mut name = String::with_capacity(8);
        name.push('s');
        name.push_str(itoa::Buffer::new().format(seq));
        name
    }

    fn native<R>(&self, f: impl FnOnce(&dyn NativeConnection) -> R) -> Result<R> {
        match self.native.borrow().as_deref() {
            Some(native) => Ok(f(native)),
            None => Err(Misuse::ConnectionClosed.into()),
        }
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("closed", &self.native.borrow().is_none())
            .field("statements", &self.stmt_seq.get())
            .finish()
    }
}
