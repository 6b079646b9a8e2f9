//! Parameter value encoding.
//!
//! Every bound parameter crosses the wire as text. [`Encode`] renders a
//! typed value into its protocol text form; the server casts it to the
//! target column type and reports mismatches as execution errors, nothing
//! is validated client-side.
use std::fmt;

/// Value that can be bound as a statement parameter.
pub trait Encode {
    /// Render self into protocol text.
    fn encode(&self) -> Encoded;
}

/// A parameter in its protocol text form.
pub struct Encoded(String);

impl Encoded {
    pub(crate) fn new(text: String) -> Self {
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Encoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self) -> Encoded {
        T::encode(self)
    }
}

impl Encode for bool {
    fn encode(&self) -> Encoded {
        Encoded::new(String::from(if *self { "t" } else { "f" }))
    }
}

impl Encode for str {
    fn encode(&self) -> Encoded {
        Encoded::new(self.to_owned())
    }
}

impl Encode for String {
    fn encode(&self) -> Encoded {
        Encoded::new(self.clone())
    }
}

macro_rules! encode_int {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self) -> Encoded {
                Encoded::new(itoa::Buffer::new().format(*self).to_owned())
            }
        }
    )*};
}

macro_rules! encode_float {
    ($($ty:ty),*) => {$(
        impl Encode for $ty {
            fn encode(&self) -> Encoded {
                Encoded::new(ryu::Buffer::new().format(*self).to_owned())
            }
        }
    )*};
}

encode_int!(i32, i64);
encode_float!(f32, f64);

#[cfg(test)]
mod test {
    use super::Encode;

    fn text(value: impl Encode) -> String {
        value.encode().as_str().to_owned()
    }

    #[test]
    fn bool_text() {
        assert_eq!(text(true), "t");
        assert_eq!(text(false), "f");
    }

    #[test]
    fn integer_text() {
        assert_eq!(text(i32::MIN), "-2147483648");
        assert_eq!(text(i64::MAX), "9223372036854775807");
        assert_eq!(text(0i32), "0");
    }

    #[test]
    fn float_text() {
        assert_eq!(text(1.5f64), "1.5");
        assert_eq!(text(-0.25f32), "-0.25");
    }

    #[test]
    fn string_verbatim() {
        assert_eq!(text("Γεια σας κόσμο"), "Γεια σας κόσμο");
        assert_eq!(text(String::from("it's")), "it's");
    }

    #[test]
    fn reference_passthrough() {
        assert_eq!(text(&&true), "t");
    }
}
