//! A crate for decoding NASDAQ TotalView-ITCH 4.x market data messages and
//! encoding each record as a comma-separated text row.
//!
//! The wire format is a stream of fixed-layout binary messages, each preceded
//! by a single type-code byte and containing explicit big-endian multi-byte
//! integers and fixed-width ASCII fields. There is no length prefix and no
//! checksum; the field schemas in [`record`] are the only description of the
//! layout.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(clippy::missing_errors_doc)]

pub mod decode;
pub mod encode;
pub mod enums;
pub mod error;
mod macros;
pub mod record;
pub mod record_enum;

pub use crate::{
    decode::{DynReader, RecordDecoder},
    encode::{CsvSerialize, Encoder as CsvEncoder},
    enums::{Compression, MessageType},
    error::{Error, Result},
    record::Record,
    record_enum::RecordEnum,
};

/// The length in bytes of the fixed-width, space-padded ticker field.
pub const TICKER_LEN: usize = 8;
/// The length in bytes of the fixed-width market participant ID field.
pub const MPID_LEN: usize = 4;
/// The length in bytes of the fixed-width trading-action reason field.
pub const REASON_LEN: usize = 4;
