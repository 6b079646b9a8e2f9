//! The server timestamp grammar and the
//! [`OffsetDateTime`][time::OffsetDateTime] codec.
//!
//! Postgres renders `timestamptz` as `YYYY-MM-DD HH:MM:SS[.fraction][±HH[:MM]]`.
//! The fractional seconds are reported separately by [`parse_timestamp`]
//! because [`OffsetDateTime`] values handed to scans carry whole-second
//! precision only, and the encode direction never emits a fraction.
use time::{
    OffsetDateTime,
    format_description::{BorrowedFormatItem as I, Component as C, modifier},
};

use crate::{
    common::unit_error,
    encode::{Encode, Encoded},
    scan::Decode,
};

/// The canonical pattern, `YYYY-MM-DD HH:MM:SS±HH:MM`.
const DESCRIPTION: &[I<'_>] = &[
    I::Component(C::Year(modifier::Year::default())),
    I::Literal(b"-"),
    I::Component(C::Month(modifier::Month::default())),
    I::Literal(b"-"),
    I::Component(C::Day(modifier::Day::default())),
    I::Literal(b" "),
    I::Component(C::Hour(modifier::Hour::default())),
    I::Literal(b":"),
    I::Component(C::Minute(modifier::Minute::default())),
    I::Literal(b":"),
    I::Component(C::Second(modifier::Second::default())),
    I::Component(C::OffsetHour(OFFSET_HOUR)),
    I::Literal(b":"),
    I::Component(C::OffsetMinute(modifier::OffsetMinute::default())),
];

const OFFSET_HOUR: modifier::OffsetHour = {
    let mut hour = modifier::OffsetHour::default();
    hour.sign_is_mandatory = true;
    hour
};

unit_error! {
    /// The text did not match the server timestamp grammar.
    pub struct InvalidTimestamp("invalid timestamp");
}

/// Parse a server timestamp, returning the whole-second instant and the
/// fractional seconds in `[0, 1)` separately.
///
/// The timezone offset is required and may be a bare sign, `±HH`, or
/// `±HH:MM`; it is normalized to `±HH:MM` before the date-time parse. Any
/// structural mismatch fails as a whole, there are no partial results.
pub fn parse_timestamp(text: &str) -> Result<(OffsetDateTime, f64), InvalidTimestamp> {
    let (datetime, fraction, offset) = split(text).ok_or(InvalidTimestamp)?;
    let offset = canonical_offset(offset).ok_or(InvalidTimestamp)?;

    let canonical = format!("{datetime}{offset}");
    let parsed = OffsetDateTime::parse(&canonical, &DESCRIPTION).map_err(|_| InvalidTimestamp)?;

    let fraction = match fraction {
        // digits only, validated by `split`
        Some(digits) => format!("0.{digits}").parse().unwrap_or(0.0),
        None => 0.0,
    };

    Ok((parsed, fraction))
}

/// Split `<date-time>[.fraction]<offset>`, all groups validated
/// structurally.
fn split(text: &str) -> Option<(&str, Option<&str>, &str)> {
    let bytes = text.as_bytes();
    let mut i = 0;

    let mut digits = |i: &mut usize| {
        let start = *i;
        while bytes.get(*i).is_some_and(u8::is_ascii_digit) {
            *i += 1;
        }
        *i > start
    };

    // YYYY-MM-DD HH:MM:SS, any digit run per field
    for sep in [b'-', b'-', b' ', b':', b':'] {
        if !digits(&mut i) || bytes.get(i) != Some(&sep) {
            return None;
        }
        i += 1;
    }
    if !digits(&mut i) {
        return None;
    }
    let datetime = &text[..i];

    let fraction = if bytes.get(i) == Some(&b'.') {
        let start = i + 1;
        i = start;
        if !digits(&mut i) {
            return None;
        }
        Some(&text[start..i])
    } else {
        None
    };

    let offset = &text[i..];
    let mut tail = offset.bytes();
    match tail.next() {
        Some(b'+' | b'-') => {}
        Some(b) if b.is_ascii_digit() || b == b':' => {}
        _ => return None,
    }
    if !tail.all(|b| b.is_ascii_digit() || b == b':') {
        return None;
    }

    Some((datetime, fraction, offset))
}

/// Normalize a `[+-]?HH?(:MM)?` offset into `±HH:MM`.
fn canonical_offset(offset: &str) -> Option<String> {
    let (sign, rest) = match offset.as_bytes().first()? {
        b'+' => ('+', &offset[1..]),
        b'-' => ('-', &offset[1..]),
        _ => ('+', offset),
    };

    let mut parts = rest.split(':');
    let hour = pad2(parts.next().unwrap_or(""))?;
    let minute = pad2(parts.next().unwrap_or(""))?;

    Some(format!("{sign}{hour}:{minute}"))
}

/// Zero-pad a 0-2 digit group to width two.
fn pad2(group: &str) -> Option<String> {
    if group.len() > 2 || !group.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(format!("{group:0>2}"))
}

impl Decode for OffsetDateTime {
    const EXPECTED: &'static str = "OffsetDateTime";

    fn decode(text: &str) -> Result<Self, String> {
        match parse_timestamp(text) {
            Ok((instant, _)) => Ok(instant),
            Err(e) => Err(e.to_string()),
        }
    }
}

impl Encode for OffsetDateTime {
    /// Intentionally lossy: the fraction is never re-emitted.
    fn encode(&self) -> Encoded {
        Encoded::new(self.format(&DESCRIPTION).expect("format is statically known"))
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use super::parse_timestamp;
    use crate::encode::Encode;

    #[test]
    fn fraction_reported_separately() {
        let (instant, fraction) = parse_timestamp("2023-05-01 10:00:00.123+02:00").unwrap();
        assert_eq!(instant, datetime!(2023-05-01 10:00:00 +02:00));
        assert_eq!(fraction, 0.123);
    }

    #[test]
    fn short_offset() {
        let (instant, fraction) = parse_timestamp("2023-05-01 10:00:00+02").unwrap();
        assert_eq!(instant, datetime!(2023-05-01 10:00:00 +02:00));
        assert_eq!(fraction, 0.0);
    }

    #[test]
    fn negative_offset() {
        let (instant, _) = parse_timestamp("2011-11-05 23:08:01.719212-07").unwrap();
        assert_eq!(instant, datetime!(2011-11-05 23:08:01 -07:00));
    }

    #[test]
    fn offset_with_minutes() {
        let (instant, _) = parse_timestamp("1999-12-31 23:59:59+05:30").unwrap();
        assert_eq!(instant, datetime!(1999-12-31 23:59:59 +05:30));
    }

    #[test]
    fn bare_sign_offset() {
        let (instant, _) = parse_timestamp("2023-05-01 10:00:00+").unwrap();
        assert_eq!(instant, datetime!(2023-05-01 10:00:00 UTC));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("not-a-timestamp").is_err());
        assert!(parse_timestamp("").is_err());
        assert!(parse_timestamp("2023-05-01").is_err());
        // missing offset
        assert!(parse_timestamp("2023-05-01 10:00:00.123").is_err());
        // fraction needs at least one digit
        assert!(parse_timestamp("2023-05-01 10:00:00.+02").is_err());
        // out of range field
        assert!(parse_timestamp("2023-13-01 10:00:00+02").is_err());
    }

    #[test]
    fn encode_is_canonical_and_lossy() {
        let encoded = datetime!(2023-05-01 10:00:00.75 +02:00).encode();
        assert_eq!(encoded.as_str(), "2023-05-01 10:00:00+02:00");

        let encoded = datetime!(1969-07-20 20:17:40 -05:00).encode();
        assert_eq!(encoded.as_str(), "1969-07-20 20:17:40-05:00");
    }

    #[test]
    fn whole_second_round_trip() {
        let instant = datetime!(2023-05-01 10:00:00 +02:00);
        let (back, fraction) = parse_timestamp(instant.encode().as_str()).unwrap();
        assert_eq!(back, instant);
        assert_eq!(fraction, 0.0);
    }
}
