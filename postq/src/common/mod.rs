//! Supporting utility types.

/// Declare a unit struct error with a fixed message.
macro_rules! unit_error {
    ($(#[$meta:meta])* $vis:vis struct $name:ident($msg:literal);) => {
        $(#[$meta])*
        $vis struct $name;

        impl std::error::Error for $name { }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($msg)
            }
        }

        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "\"{self}\"")
            }
        }
    };
}

pub(crate) use unit_error;
