//! Helper macros for implementing repetitive traits and accessors on record
//! types.

/// Implements [`Record`](crate::record::Record) for a message struct, tying it
/// to its type code and fixed body length.
macro_rules! impl_record {
    ($ty:ident, $msg_type:ident, $wire_len:expr) => {
        impl crate::record::Record for $ty {
            const TYPE: crate::enums::MessageType = crate::enums::MessageType::$msg_type;
            const WIRE_LEN: usize = $wire_len;
        }
    };
}

/// Implements a `ticker()` accessor returning the raw 8-byte field as a
/// `&str`, trailing padding included.
macro_rules! impl_ticker_accessor {
    ($ty:ident) => {
        impl $ty {
            /// Returns `ticker` as a `&str`, trailing space padding included.
            ///
            /// # Errors
            /// This function returns an error if `ticker` contains invalid
            /// UTF-8.
            pub fn ticker(&self) -> crate::error::Result<&str> {
                std::str::from_utf8(&self.ticker).map_err(|e| {
                    crate::error::Error::utf8(
                        e,
                        concat!("converting ticker of ", stringify!($ty)),
                    )
                })
            }
        }
    };
}

/// Implements an `mpid()` accessor returning the raw 4-byte field as a `&str`.
macro_rules! impl_mpid_accessor {
    ($ty:ident) => {
        impl $ty {
            /// Returns `mpid` as a `&str`.
            ///
            /// # Errors
            /// This function returns an error if `mpid` contains invalid UTF-8.
            pub fn mpid(&self) -> crate::error::Result<&str> {
                std::str::from_utf8(&self.mpid).map_err(|e| {
                    crate::error::Error::utf8(e, concat!("converting mpid of ", stringify!($ty)))
                })
            }
        }
    };
}

pub(crate) use impl_mpid_accessor;
pub(crate) use impl_record;
pub(crate) use impl_ticker_accessor;
