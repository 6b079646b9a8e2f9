//! Row value decoding.
//!
//! The decode direction of the value codec. A scan writes each cell of the
//! current row into a `&mut` destination:
//!
//! - a SQL NULL cell leaves its destination untouched,
//! - the destination count must equal the column count, checked before any
//!   cell is read,
//! - the first failing cell stops the scan; earlier destinations keep their
//!   written values.
//!
//! The destination type set is closed: `bool`, `i32`, `i64`, `f32`, `f64`,
//! `String`, `Vec<u8>` and [`OffsetDateTime`][time::OffsetDateTime]. An
//! unsupported destination is a compile error, not a runtime one.
use std::fmt;

use crate::native::NativeResult;

/// Type that can be decoded from cell text.
pub trait Decode: Sized + sealed::Sealed {
    /// Type name used in decode error messages.
    const EXPECTED: &'static str;

    /// Decode self from cell text. The error is the cause message.
    fn decode(text: &str) -> Result<Self, String>;
}

/// One scan destination.
pub trait ScanColumn: sealed::Sealed {
    /// Write the cell into the destination. `None` is a NULL cell.
    fn scan_column(&mut self, cell: Option<&str>) -> Result<(), ColumnError>;
}

impl<T: Decode> ScanColumn for &mut T {
    fn scan_column(&mut self, cell: Option<&str>) -> Result<(), ColumnError> {
        let Some(text) = cell else {
            return Ok(());
        };
        match T::decode(text) {
            Ok(value) => {
                **self = value;
                Ok(())
            }
            Err(message) => Err(ColumnError { expected: T::EXPECTED, message }),
        }
    }
}

/// An ordered set of scan destinations, one per result column.
///
/// Implemented for tuples of `&mut` destinations up to arity 8.
pub trait Scan: sealed::Sealed {
    /// Decode the row behind `cells` into the destinations.
    fn scan(self, cells: Cells<'_>) -> Result<(), DecodeError>;
}

/// Cell accessor for the row at the cursor.
pub struct Cells<'a> {
    res: &'a dyn NativeResult,
    row: usize,
    len: usize,
}

impl<'a> Cells<'a> {
    pub(crate) fn new(res: &'a dyn NativeResult, row: usize, len: usize) -> Self {
        Self { res, row, len }
    }

    fn get(&self, col: usize) -> Option<String> {
        if self.res.is_null(self.row, col) {
            return None;
        }
        Some(self.res.value(self.row, col))
    }
}

macro_rules! scan_tuple {
    ($len:literal: $($t:ident $i:tt),*) => {
        impl<$($t: ScanColumn),*> sealed::Sealed for ($($t,)*) { }

        impl<$($t: ScanColumn),*> Scan for ($($t,)*) {
            fn scan(self, cells: Cells<'_>) -> Result<(), DecodeError> {
                if $len != cells.len {
                    return Err(DecodeError::ArgCount { have: $len, want: cells.len });
                }
                #[allow(non_snake_case)]
                let ($(mut $t,)*) = self;
                $(
                    $t.scan_column(cells.get($i).as_deref())
                        .map_err(|e| e.at($i))?;
                )*
                Ok(())
            }
        }
    };
}

scan_tuple!(1: T0 0);
scan_tuple!(2: T0 0, T1 1);
scan_tuple!(3: T0 0, T1 1, T2 2);
scan_tuple!(4: T0 0, T1 1, T2 2, T3 3);
scan_tuple!(5: T0 0, T1 1, T2 2, T3 3, T4 4);
scan_tuple!(6: T0 0, T1 1, T2 2, T3 3, T4 4, T5 5);
scan_tuple!(7: T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6);
scan_tuple!(8: T0 0, T1 1, T2 2, T3 3, T4 4, T5 5, T6 6, T7 7);

impl Decode for bool {
    const EXPECTED: &'static str = "bool";

    /// Deliberately permissive: exactly `"t"` is `true`, any other text is
    /// `false`. The mapping is many-to-one and never fails.
    fn decode(text: &str) -> Result<Self, String> {
        Ok(text == "t")
    }
}

impl Decode for String {
    const EXPECTED: &'static str = "String";

    fn decode(text: &str) -> Result<Self, String> {
        Ok(text.to_owned())
    }
}

macro_rules! decode_number {
    ($($ty:ty),*) => {$(
        impl Decode for $ty {
            const EXPECTED: &'static str = stringify!($ty);

            fn decode(text: &str) -> Result<Self, String> {
                text.parse().map_err(|e: <$ty as std::str::FromStr>::Err| e.to_string())
            }
        }
    )*};
}

decode_number!(i32, i64, f32, f64);

pub(crate) mod sealed {
    pub trait Sealed { }

    impl Sealed for bool { }
    impl Sealed for i32 { }
    impl Sealed for i64 { }
    impl Sealed for f32 { }
    impl Sealed for f64 { }
    impl Sealed for String { }
    impl Sealed for Vec<u8> { }
    impl Sealed for time::OffsetDateTime { }
    impl<T: super::Decode> Sealed for &mut T { }
}

/// A failed destination, before its position is known.
#[derive(Debug)]
pub struct ColumnError {
    expected: &'static str,
    message: String,
}

impl ColumnError {
    fn at(self, index: usize) -> DecodeError {
        DecodeError::Arg { index, expected: self.expected, message: self.message }
    }
}

/// An error when decoding row values.
pub enum DecodeError {
    /// Destination count differs from the result column count.
    ArgCount { have: usize, want: usize },
    /// One destination failed to decode.
    Arg {
        index: usize,
        expected: &'static str,
        message: String,
    },
}

impl std::error::Error for DecodeError { }

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ArgCount { have, want } => {
                write!(f, "incorrect argument count for scan: have {have} want {want}")
            }
            Self::Arg { index, expected, message } => {
                write!(f, "arg {index} as {expected}: {message}")
            }
        }
    }
}

impl fmt::Debug for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{self}\"")
    }
}

#[cfg(test)]
mod test {
    use super::{Decode, ScanColumn};

    #[test]
    fn bool_is_permissive() {
        assert!(bool::decode("t").unwrap());
        assert!(!bool::decode("f").unwrap());
        assert!(!bool::decode("true").unwrap());
        assert!(!bool::decode("").unwrap());
        assert!(!bool::decode("garbage").unwrap());
    }

    #[test]
    fn numbers() {
        assert_eq!(i32::decode("-2147483648").unwrap(), i32::MIN);
        assert_eq!(i64::decode("9223372036854775807").unwrap(), i64::MAX);
        assert_eq!(f64::decode("1.5").unwrap(), 1.5);
        assert_eq!(f32::decode("3.4028235e+38").unwrap(), f32::MAX);
    }

    #[test]
    fn malformed_number_carries_parser_message() {
        let err = i32::decode("12x").unwrap_err();
        assert_eq!(err, "invalid digit found in string");
    }

    #[test]
    fn string_verbatim() {
        assert_eq!(String::decode("Γεια σας κόσμο").unwrap(), "Γεια σας κόσμο");
    }

    #[test]
    fn null_leaves_destination_untouched() {
        let mut x = 42i32;
        (&mut x).scan_column(None).unwrap();
        assert_eq!(x, 42);
    }

    #[test]
    fn column_error_names_type() {
        let mut x = 0i64;
        let err = (&mut x).scan_column(Some("nope")).unwrap_err();
        let err = err.at(3);
        assert_eq!(err.to_string(), "arg 3 as i64: invalid digit found in string");
    }
}
