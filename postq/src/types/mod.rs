//! Codec integration for non-scalar types.
//!
//! - [`time`]: the timestamp grammar and [`OffsetDateTime`][::time::OffsetDateTime] codec
//! - bytea: the `\x` hex escape behind the `Vec<u8>` codec

pub(crate) mod bytea;
pub mod time;
