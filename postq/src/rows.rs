//! Query result rows.
use std::cell::OnceCell;
use std::collections::HashMap;

use crate::{
    Result,
    error::Misuse,
    native::NativeResult,
    scan::{Cells, Scan},
};

/// Rows returned by a query, walked by a forward-only cursor.
///
/// The cursor starts before the first row: call [`next`][Rows::next] and
/// check its value before the first [`scan`][Rows::scan]. The native result
/// handle is released by [`clear`][Rows::clear] or, if never cleared, when
/// the value is dropped; either way exactly once.
pub struct Rows {
    res: Option<Box<dyn NativeResult>>,
    nrows: usize,
    ncols: usize,
    cursor: Cursor,
    columns: OnceCell<Vec<String>>,
}

#[derive(Clone, Copy)]
enum Cursor {
    Start,
    Row(usize),
    Done,
}

impl Rows {
    pub(crate) fn new(res: Box<dyn NativeResult>) -> Self {
        Self {
            nrows: res.row_count(),
            ncols: res.column_count(),
            res: Some(res),
            cursor: Cursor::Start,
            columns: OnceCell::new(),
        }
    }

    /// Number of rows in the result.
    pub fn row_count(&self) -> usize {
        self.nrows
    }

    /// Number of columns in the result.
    pub fn column_count(&self) -> usize {
        self.ncols
    }

    /// Advance the cursor, returning `true` while rows remain.
    ///
    /// Once exhausted it keeps returning `false`; the cursor never
    /// regresses.
    pub fn next(&mut self) -> bool {
        let next = match self.cursor {
            Cursor::Start if self.nrows > 0 => Cursor::Row(0),
            Cursor::Row(i) if i + 1 < self.nrows => Cursor::Row(i + 1),
            _ => Cursor::Done,
        };
        self.cursor = next;
        matches!(next, Cursor::Row(_))
    }

    /// Column names, in result order. Read from the native result on first
    /// call and cached.
    pub fn columns(&self) -> Result<&[String]> {
        if let Some(cols) = self.columns.get() {
            return Ok(cols);
        }
        let res = self.live()?;
        let cols = (0..self.ncols).map(|i| res.column_name(i)).collect();
        Ok(self.columns.get_or_init(|| cols))
    }

    /// Decode the current row into the given destinations, one `&mut`
    /// reference per column.
    ///
    /// ```no_run
    /// # fn demo(rows: &mut postq::Rows) -> postq::Result<()> {
    /// let (mut id, mut name) = (0i32, String::new());
    /// while rows.next() {
    ///     rows.scan((&mut id, &mut name))?;
    /// }
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// Destinations paired with a NULL cell keep their previous value. The
    /// cursor is not moved.
    pub fn scan<S: Scan>(&self, targets: S) -> Result<()> {
        let res = self.live()?;
        let row = self.current_row()?;
        targets.scan(Cells::new(res, row, self.ncols))?;
        Ok(())
    }

    /// The current row as verbatim cell text, `None` for NULL cells.
    ///
    /// The stringly counterpart of [`scan`][Rows::scan].
    pub fn row_text(&self) -> Result<Vec<Option<String>>> {
        let res = self.live()?;
        let row = self.current_row()?;
        Ok((0..self.ncols)
            .map(|col| (!res.is_null(row, col)).then(|| res.value(row, col)))
            .collect())
    }

    /// The current row keyed by column name.
    pub fn row_map(&self) -> Result<HashMap<String, Option<String>>> {
        let cells = self.row_text()?;
        let columns = self.columns()?;
        Ok(columns.iter().cloned().zip(cells).collect())
    }

    /// Release the native result handle.
    ///
    /// Idempotent; dropping the value without calling it releases the
    /// handle as well. Reading rows after `clear` is an error.
    pub fn clear(&mut self) {
        if self.res.take().is_some() {
            log::trace!("result handle cleared");
        }
    }

    fn live(&self) -> Result<&dyn NativeResult> {
        match self.res.as_deref() {
            Some(res) => Ok(res),
            None => Err(Misuse::ResultCleared.into()),
        }
    }

    fn current_row(&self) -> Result<usize> {
        match self.cursor {
            Cursor::Row(i) => Ok(i),
            Cursor::Start | Cursor::Done => Err(Misuse::NoCurrentRow.into()),
        }
    }
}

impl std::fmt::Debug for Rows {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rows")
            .field("rows", &self.nrows)
            .field("columns", &self.ncols)
            .field("cleared", &self.res.is_none())
            .finish()
    }
}
