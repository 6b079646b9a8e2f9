//! Server-side prepared statements.
use crate::{
    Connection, Result, Rows,
    encode::{Encode, Encoded},
    error::Misuse,
    native::{NativeResult, result_error},
};

/// A named statement registered on the server by
/// [`Connection::prepare`].
///
/// The name is minted from the owning connection's counter and is unique
/// for the connection's lifetime, even across failed preparations. The
/// wrapper owns only the native result of the prepare call itself; the
/// server-side registration lives until the connection closes.
pub struct Statement<'c> {
    conn: &'c Connection,
    name: String,
    prep: Option<Box<dyn NativeResult>>,
}

impl<'c> Statement<'c> {
    pub(crate) fn new(conn: &'c Connection, name: String, prep: Box<dyn NativeResult>) -> Self {
        Self { conn, name, prep: Some(prep) }
    }

    /// The unique statement name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Execute the statement, discarding any returned rows.
    pub fn exec(&self, params: &[&dyn Encode]) -> Result<()> {
        let res = self.run(params)?;
        result_error(&*res)
    }

    /// Execute the statement, returning its rows.
    pub fn query(&self, params: &[&dyn Encode]) -> Result<Rows> {
        let res = self.run(params)?;
        result_error(&*res)?;
        Ok(Rows::new(res))
    }

    fn run(&self, params: &[&dyn Encode]) -> Result<Box<dyn NativeResult>> {
        if self.prep.is_none() {
            return Err(Misuse::StatementCleared.into());
        }
        let encoded: Vec<Encoded> = params.iter().map(|p| p.encode()).collect();
        self.conn.exec_prepared(&self.name, &encoded)
    }

    /// Release the native result of the prepare call.
    ///
    /// Idempotent; dropping the statement releases it as well. This does
    /// not deregister the statement on the server.
    pub fn clear(&mut self) {
        if self.prep.take().is_some() {
            log::trace!("statement {} cleared", self.name);
        }
    }
}

impl std::fmt::Debug for Statement<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("name", &self.name)
            .field("cleared", &self.prep.is_none())
            .finish()
    }
}
