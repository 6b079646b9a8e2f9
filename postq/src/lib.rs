//! Blocking Postgres driver over the native libpq client library.
//!
//! Every value crosses the wire as text: parameters are encoded before an
//! execute, result cells are decoded row by row, and each native handle
//! (connection, prepared statement, result) is owned by exactly one wrapper
//! and released exactly once.
//!
//! # Examples
//!
//! Ad hoc queries:
//!
//! ```no_run
//! use postq::Connection;
//!
//! fn app() -> postq::Result<()> {
//!     let conn = Connection::connect("host=localhost dbname=testdb")?;
//!
//!     conn.exec("CREATE TABLE foo (id int, name text)", &[])?;
//!     conn.exec("INSERT INTO foo VALUES ($1, $2)", &[&420i32, &"Foo"])?;
//!
//!     let mut rows = conn.query("SELECT id, name FROM foo", &[])?;
//!     let (mut id, mut name) = (0i32, String::new());
//!     while rows.next() {
//!         rows.scan((&mut id, &mut name))?;
//!         println!("{id}: {name}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! Prepared statements:
//!
//! ```no_run
//! use postq::Connection;
//!
//! fn app() -> postq::Result<()> {
//!     let conn = Connection::connect_env()?;
//!
//!     let stmt = conn.prepare("INSERT INTO foo VALUES ($1, $2)")?;
//!     for i in 0..14i32 {
//!         stmt.exec(&[&i, &"bar"])?;
//!     }
//!     Ok(())
//! }
//! ```

mod common;
mod libpq;
mod native;

// Encoding
pub mod encode;
pub mod scan;
pub mod types;

// Component
pub mod rows;
pub mod statement;

// Connection
pub mod connection;

mod error;

pub use encode::Encode;
pub use scan::{Decode, DecodeError, Scan};
pub use types::time::parse_timestamp;

pub use rows::Rows;
pub use statement::Statement;

pub use connection::{Config, Connection};
pub use error::{Error, ErrorKind, Misuse, Result};
