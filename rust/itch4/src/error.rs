//! Types for errors that can occur while working with ITCH data.
use thiserror::Error;

/// An error that can occur while processing ITCH data.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// An I/O error while reading the wire format or writing another encoding.
    #[error("IO error: {source:?} while {context}")]
    Io {
        /// The original error.
        #[source]
        source: std::io::Error,
        /// The context in which the error occurred.
        context: String,
    },
    /// The input ended before a field's full byte count was available. There is
    /// no length prefix to resynchronize on, so decoding cannot continue past
    /// this point.
    #[error("truncated input while {context}")]
    Truncated {
        /// The context in which the error occurred.
        context: String,
    },
    /// An error with text encoding.
    #[error("encoding error: {0}")]
    Encode(String),
    /// A conversion error between types or encodings.
    #[error("couldn't convert {input} to {desired_type}")]
    Conversion {
        /// The input to the conversion.
        input: String,
        /// The desired type or encoding.
        desired_type: &'static str,
    },
    /// An error with conversion of bytes to UTF-8.
    #[error("UTF-8 error: {source:?} while {context}")]
    Utf8 {
        /// The original error.
        #[source]
        source: std::str::Utf8Error,
        /// The context in which the error occurred.
        context: String,
    },
}

/// An alias for a `Result` with [`itch4::Error`](crate::Error) as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        match value.into_kind() {
            csv::ErrorKind::Io(io) => Self::io(io, "writing CSV"),
            csv::ErrorKind::Utf8 { pos, err } => {
                Self::Encode(format!("UTF-8 error {err:?}{}", Self::opt_pos(&pos)))
            }
            csv::ErrorKind::UnequalLengths {
                pos,
                expected_len,
                len,
            } => Self::Encode(format!(
                "unequal CSV row lengths{}: expected {expected_len}, found {len}",
                Self::opt_pos(&pos)
            )),
            e => Self::Encode(format!("{e:?}")),
        }
    }
}

impl Error {
    /// Creates a new I/O [`itch4::Error`](crate::Error).
    pub fn io(error: std::io::Error, context: impl ToString) -> Self {
        Self::Io {
            source: error,
            context: context.to_string(),
        }
    }

    /// Creates a new truncated-input [`itch4::Error`](crate::Error).
    pub fn truncated(context: impl ToString) -> Self {
        Self::Truncated {
            context: context.to_string(),
        }
    }

    /// Creates a new encode [`itch4::Error`](crate::Error).
    pub fn encode(msg: impl ToString) -> Self {
        Self::Encode(msg.to_string())
    }

    /// Creates a new conversion [`itch4::Error`](crate::Error) where
    /// `desired_type` is `T`.
    pub fn conversion<T>(input: impl ToString) -> Self {
        Self::Conversion {
            input: input.to_string(),
            desired_type: std::any::type_name::<T>(),
        }
    }

    /// Creates a new UTF-8 [`itch4::Error`](crate::Error).
    pub fn utf8(error: std::str::Utf8Error, context: impl ToString) -> Self {
        Self::Utf8 {
            source: error,
            context: context.to_string(),
        }
    }

    fn opt_pos(pos: &Option<csv::Position>) -> String {
        if let Some(pos) = pos.as_ref() {
            format!(" at {pos:?}")
        } else {
            String::default()
        }
    }
}

pub(crate) fn silence_eof_error<T>(err: std::io::Error) -> std::io::Result<Option<T>> {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        Ok(None)
    } else {
        Err(err)
    }
}
