//! Hand-declared bindings to the system libpq, plus owning wrappers for the
//! two native handle kinds.
//!
//! Only the synchronous text-format entry points are declared. Every result
//! travels in format 0 (text); `param_types`, `param_lengths` and
//! `param_formats` stay null so the server infers types and reads
//! nul-terminated text.
use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr;

use crate::encode::Encoded;
use crate::native::{NativeConnection, NativeResult};

#[link(name = "pq")]
unsafe extern "C" {
    fn PQconnectdb(conninfo: *const c_char) -> *mut c_void;
    fn PQstatus(conn: *const c_void) -> c_int;
    fn PQerrorMessage(conn: *const c_void) -> *const c_char;
    fn PQoptions(conn: *const c_void) -> *const c_char;
    fn PQreset(conn: *mut c_void);
    fn PQfinish(conn: *mut c_void);
    fn PQexec(conn: *mut c_void, query: *const c_char) -> *mut c_void;
    fn PQexecParams(
        conn: *mut c_void,
        command: *const c_char,
        n_params: c_int,
        param_types: *const u32,
        param_values: *const *const c_char,
        param_lengths: *const c_int,
        param_formats: *const c_int,
        result_format: c_int,
    ) -> *mut c_void;
    fn PQprepare(
        conn: *mut c_void,
        stmt_name: *const c_char,
        query: *const c_char,
        n_params: c_int,
        param_types: *const u32,
    ) -> *mut c_void;
    fn PQexecPrepared(
        conn: *mut c_void,
        stmt_name: *const c_char,
        n_params: c_int,
        param_values: *const *const c_char,
        param_lengths: *const c_int,
        param_formats: *const c_int,
        result_format: c_int,
    ) -> *mut c_void;
    fn PQntuples(res: *const c_void) -> c_int;
    fn PQnfields(res: *const c_void) -> c_int;
    fn PQfname(res: *const c_void, field_num: c_int) -> *const c_char;
    fn PQgetvalue(res: *const c_void, tup_num: c_int, field_num: c_int) -> *const c_char;
    fn PQgetisnull(res: *const c_void, tup_num: c_int, field_num: c_int) -> c_int;
    fn PQresultErrorMessage(res: *const c_void) -> *const c_char;
    fn PQclear(res: *mut c_void);
}

const CONNECTION_OK: c_int = 0;

/// Cell or column text, verbatim.
fn text(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    // SAFETY: libpq returns a nul-terminated string owned by the handle,
    // copied out before the handle can be released.
    unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned()
}

/// Error message text. libpq terminates its messages with a newline,
/// stripped here so they compose into error displays.
fn message(ptr: *const c_char) -> String {
    let mut s = text(ptr);
    s.truncate(s.trim_end().len());
    s
}

fn c_string(s: &str, what: &str) -> Result<CString, String> {
    CString::new(s).map_err(|_| format!("{what} contains a nul byte"))
}

fn c_params(params: &[Encoded]) -> Result<Vec<CString>, String> {
    params.iter().map(|p| c_string(p.as_str(), "parameter")).collect()
}

/// Owner of one `PGconn`. Freed exactly once by `Drop`.
pub(crate) struct PgConn {
    ptr: *mut c_void,
}

// libpq connections may move between threads as long as only one thread
// drives them at a time, which the wrapper types enforce by staying !Sync.
unsafe impl Send for PgConn {}

impl PgConn {
    /// Open a connection with a libpq `keyword=value` conninfo string.
    ///
    /// A partially opened handle on the failure path is released before
    /// returning.
    pub fn connect(conninfo: &str) -> Result<PgConn, String> {
        let conninfo = c_string(conninfo, "conninfo")?;
        let ptr = unsafe { PQconnectdb(conninfo.as_ptr()) };
        if ptr.is_null() {
            return Err("libpq out of memory".to_string());
        }
        let conn = PgConn { ptr };
        if unsafe { PQstatus(conn.ptr) } != CONNECTION_OK {
            // `conn` drops here, PQfinish runs on the dead handle
            return Err(conn.error_message());
        }
        Ok(conn)
    }

    fn error_message(&self) -> String {
        message(unsafe { PQerrorMessage(self.ptr) })
    }

    fn wrap(&self, res: *mut c_void) -> Result<Box<dyn NativeResult>, String> {
        if res.is_null() {
            // libpq returns a null result only when it cannot allocate one
            return Err(self.error_message());
        }
        Ok(Box::new(PgResult { ptr: res }))
    }
}

impl Drop for PgConn {
    fn drop(&mut self) {
        unsafe { PQfinish(self.ptr) };
        log::debug!("connection handle released");
    }
}

impl NativeConnection for PgConn {
    fn exec(&self, sql: &str) -> Result<Box<dyn NativeResult>, String> {
        let sql = c_string(sql, "statement")?;
        self.wrap(unsafe { PQexec(self.ptr, sql.as_ptr()) })
    }

    fn exec_params(&self, sql: &str, params: &[Encoded]) -> Result<Box<dyn NativeResult>, String> {
        let sql = c_string(sql, "statement")?;
        let cparams = c_params(params)?;
        let values: Vec<*const c_char> = cparams.iter().map(|p| p.as_ptr()).collect();
        self.wrap(unsafe {
            PQexecParams(
                self.ptr,
                sql.as_ptr(),
                values.len() as c_int,
                ptr::null(),
                values.as_ptr(),
                ptr::null(),
                ptr::null(),
                0,
            )
        })
    }

    fn prepare(&self, name: &str, sql: &str) -> Result<Box<dyn NativeResult>, String> {
        let name = c_string(name, "statement name")?;
        let sql = c_string(sql, "statement")?;
        self.wrap(unsafe { PQprepare(self.ptr, name.as_ptr(), sql.as_ptr(), 0, ptr::null()) })
    }

    fn exec_prepared(&self, name: &str, params: &[Encoded]) -> Result<Box<dyn NativeResult>, String> {
        let name = c_string(name, "statement name")?;
        let cparams = c_params(params)?;
        let values: Vec<*const c_char> = cparams.iter().map(|p| p.as_ptr()).collect();
        self.wrap(unsafe {
            PQexecPrepared(
                self.ptr,
                name.as_ptr(),
                values.len() as c_int,
                values.as_ptr(),
                ptr::null(),
                ptr::null(),
                0,
            )
        })
    }

    fn reset(&self) -> Result<(), String> {
        unsafe { PQreset(self.ptr) };
        if unsafe { PQstatus(self.ptr) } != CONNECTION_OK {
            return Err(self.error_message());
        }
        Ok(())
    }

    fn options(&self) -> String {
        text(unsafe { PQoptions(self.ptr) })
    }
}

/// Owner of one `PGresult`. Freed exactly once by `Drop`.
pub(crate) struct PgResult {
    ptr: *mut c_void,
}

// A PGresult is plain memory detached from its connection.
unsafe impl Send for PgResult {}

impl Drop for PgResult {
    fn drop(&mut self) {
        unsafe { PQclear(self.ptr) };
    }
}

impl NativeResult for PgResult {
    fn row_count(&self) -> usize {
        unsafe { PQntuples(self.ptr) }.max(0) as usize
    }

    fn column_count(&self) -> usize {
        unsafe { PQnfields(self.ptr) }.max(0) as usize
    }

    fn column_name(&self, col: usize) -> String {
        text(unsafe { PQfname(self.ptr, col as c_int) })
    }

    fn value(&self, row: usize, col: usize) -> String {
        text(unsafe { PQgetvalue(self.ptr, row as c_int, col as c_int) })
    }

    fn is_null(&self, row: usize, col: usize) -> bool {
        (unsafe { PQgetisnull(self.ptr, row as c_int, col as c_int) }) == 1
    }

    fn error_message(&self) -> String {
        message(unsafe { PQresultErrorMessage(self.ptr) })
    }
}
