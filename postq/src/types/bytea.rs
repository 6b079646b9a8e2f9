//! The bytea `\x` hex escape.
//!
//! Postgres returns binary columns in the generic escape text form: `\x`
//! followed by two hex digits per byte. Lowercase is emitted, either case is
//! accepted.
use crate::{
    encode::{Encode, Encoded},
    scan::Decode,
};

pub(crate) fn encode(bytes: &[u8]) -> String {
    format!("\\x{}", hex::encode(bytes))
}

pub(crate) fn decode(text: &str) -> Result<Vec<u8>, String> {
    let Some(digits) = text.strip_prefix("\\x") else {
        return Err("invalid byte string format".to_string());
    };
    hex::decode(digits).map_err(|e| e.to_string())
}

impl Encode for [u8] {
    fn encode(&self) -> Encoded {
        Encoded::new(encode(self))
    }
}

impl Encode for Vec<u8> {
    fn encode(&self) -> Encoded {
        Encoded::new(encode(self))
    }
}

impl Decode for Vec<u8> {
    const EXPECTED: &'static str = "Vec<u8>";

    fn decode(text: &str) -> Result<Self, String> {
        decode(text)
    }
}

#[cfg(test)]
mod test {
    use crate::scan::Decode;

    #[test]
    fn encode_lowercase() {
        assert_eq!(super::encode(&[0xDE, 0xAD]), "\\xdead");
        assert_eq!(super::encode(&[]), "\\x");
    }

    #[test]
    fn decode_either_case() {
        assert_eq!(super::decode("\\xDEAD").unwrap(), [0xDE, 0xAD]);
        assert_eq!(super::decode("\\xdead").unwrap(), [0xDE, 0xAD]);
        assert_eq!(Vec::<u8>::decode("\\x").unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn missing_prefix_is_rejected() {
        assert_eq!(super::decode("dead").unwrap_err(), "invalid byte string format");
    }

    #[test]
    fn malformed_hex_is_rejected() {
        assert!(super::decode("\\xd").is_err());
        assert!(super::decode("\\xzz").is_err());
    }

    #[test]
    fn round_trip() {
        let data = [0x00u8, 0x01, 0x7F, 0x80, 0xFF];
        assert_eq!(super::decode(&super::encode(&data)).unwrap(), data);
    }
}
