//! Decoding ITCH messages from binary streams.
//!
//! [`RecordDecoder`] pulls records one at a time from a forward-only reader.
//! Each multi-byte integer is decoded explicitly as big-endian regardless of
//! the host byte order, and each fixed-width byte field is read raw with no
//! trimming or termination scanning. A read that cannot satisfy its required
//! byte count is a [`Error::Truncated`] failure, never a partial result;
//! without a length prefix there is no way to resynchronize, so decoding stops
//! at the failing record.

use std::{
    fs::File,
    io::{self, BufReader},
    path::Path,
};

use crate::{
    enums::{Compression, MessageType},
    error::silence_eof_error,
    record::{
        AddOrderMpidMsg, AddOrderMsg, BrokenTradeMsg, CrossTradeMsg, ImbalanceMsg,
        MarketParticipantPosMsg, OrderCancelMsg, OrderDeleteMsg, OrderExecutedMsg,
        OrderExecutedWithPriceMsg, OrderReplaceMsg, RegShoMsg, RetailPriceImprovementMsg,
        StockDirectoryMsg, SystemEventMsg, TimestampMsg, TradeMsg, TradingActionMsg,
    },
    record_enum::RecordEnum,
    Error, Result,
};

/// Magic number for the beginning of a Zstandard frame.
const ZSTD_MAGIC_NUMBER: u32 = 0xFD2F_B528;

pub(crate) fn starts_with_zstd_prefix(bytes: &[u8]) -> bool {
    if bytes.len() < 4 {
        return false;
    }
    let magic = u32::from_le_bytes(bytes[..4].try_into().unwrap());
    ZSTD_MAGIC_NUMBER == magic
}

/// Type for decoding a stream of ITCH messages into records.
pub struct RecordDecoder<R>
where
    R: io::Read,
{
    reader: R,
}

impl<R> RecordDecoder<R>
where
    R: io::Read,
{
    /// Creates a new [`RecordDecoder`] that will decode from `reader`.
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Returns a mutable reference to the inner reader.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.reader
    }

    /// Consumes the decoder and returns the inner reader.
    pub fn into_inner(self) -> R {
        self.reader
    }

    /// Tries to decode a single record of any schema. Returns `Ok(None)` if
    /// the input has been cleanly exhausted, i.e. it ended before a type-code
    /// byte.
    ///
    /// # Errors
    /// This function returns [`Error::Conversion`] if the type-code byte
    /// matches no known schema, [`Error::Truncated`] if the input ends inside
    /// a record body, and [`Error::Io`] for any other failure of the
    /// underlying reader.
    pub fn decode_record(&mut self) -> Result<Option<RecordEnum>> {
        let mut code = [0];
        if let Err(err) = self.reader.read_exact(&mut code) {
            return silence_eof_error(err).map_err(|e| Error::io(e, "decoding type code"));
        }
        let msg_type = MessageType::try_from(code[0])
            .map_err(|_| Error::conversion::<MessageType>(format!("type code {:#04X}", code[0])))?;
        Ok(Some(match msg_type {
            MessageType::Timestamp => self.decode_timestamp()?.into(),
            MessageType::SystemEvent => self.decode_system_event()?.into(),
            MessageType::StockDirectory => self.decode_stock_directory()?.into(),
            MessageType::TradingAction => self.decode_trading_action()?.into(),
            MessageType::RegSho => self.decode_reg_sho()?.into(),
            MessageType::MarketParticipantPosition => self.decode_market_participant_pos()?.into(),
            MessageType::BrokenTrade => self.decode_broken_trade()?.into(),
            MessageType::Imbalance => self.decode_imbalance()?.into(),
            MessageType::RetailPriceImprovement => self.decode_retail_price_improvement()?.into(),
            MessageType::AddOrder => self.decode_add_order()?.into(),
            MessageType::AddOrderMpid => self.decode_add_order_mpid()?.into(),
            MessageType::OrderExecuted => self.decode_order_executed()?.into(),
            MessageType::OrderExecutedWithPrice => self.decode_order_executed_with_price()?.into(),
            MessageType::OrderCancel => self.decode_order_cancel()?.into(),
            MessageType::OrderDelete => self.decode_order_delete()?.into(),
            MessageType::OrderReplace => self.decode_order_replace()?.into(),
            MessageType::Trade => self.decode_trade()?.into(),
            MessageType::CrossTrade => self.decode_cross_trade()?.into(),
        }))
    }

    /// Tries to decode all remaining records into a `Vec`, in input order.
    ///
    /// # Errors
    /// This function returns an error under the same conditions as
    /// [`decode_record()`](Self::decode_record).
    pub fn decode_records(&mut self) -> Result<Vec<RecordEnum>> {
        let mut res = Vec::new();
        while let Some(rec) = self.decode_record()? {
            res.push(rec);
        }
        Ok(res)
    }

    /// Decodes the body of a seconds timestamp (`T`) message. Assumes the
    /// type-code byte has already been consumed, as do all the per-schema
    /// decoders.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_timestamp(&mut self) -> Result<TimestampMsg> {
        Ok(TimestampMsg {
            seconds: self.read_u32_be("seconds")?,
        })
    }

    /// Decodes the body of a system event (`S`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_system_event(&mut self) -> Result<SystemEventMsg> {
        Ok(SystemEventMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            event_code: self.read_byte("event_code")?,
        })
    }

    /// Decodes the body of a stock directory (`R`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_stock_directory(&mut self) -> Result<StockDirectoryMsg> {
        Ok(StockDirectoryMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ticker: self.read_fixed("ticker")?,
            mkt_category: self.read_byte("mkt_category")?,
            fin_status: self.read_byte("fin_status")?,
            round_lot_size: self.read_u32_be("round_lot_size")?,
            round_lot_status: self.read_byte("round_lot_status")?,
        })
    }

    /// Decodes the body of a stock trading action (`H`) message, skipping the
    /// reserved byte between the trading state and the reason.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_trading_action(&mut self) -> Result<TradingActionMsg> {
        let nanoseconds = self.read_u32_be("nanoseconds")?;
        let ticker = self.read_fixed("ticker")?;
        let trading_state = self.read_byte("trading_state")?;
        self.skip_byte("reserved")?;
        Ok(TradingActionMsg {
            nanoseconds,
            ticker,
            trading_state,
            reason: self.read_fixed("reason")?,
        })
    }

    /// Decodes the body of a Reg SHO (`Y`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_reg_sho(&mut self) -> Result<RegShoMsg> {
        Ok(RegShoMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ticker: self.read_fixed("ticker")?,
            reg_sho_action: self.read_byte("reg_sho_action")?,
        })
    }

    /// Decodes the body of a market participant position (`L`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_market_participant_pos(&mut self) -> Result<MarketParticipantPosMsg> {
        Ok(MarketParticipantPosMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            mpid: self.read_fixed("mpid")?,
            ticker: self.read_fixed("ticker")?,
            mm_status: self.read_byte("mm_status")?,
            mm_mode: self.read_byte("mm_mode")?,
            mp_status: self.read_byte("mp_status")?,
        })
    }

    /// Decodes the body of a broken trade (`B`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_broken_trade(&mut self) -> Result<BrokenTradeMsg> {
        Ok(BrokenTradeMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            match_number: self.read_u64_be("match_number")?,
        })
    }

    /// Decodes the body of a net order imbalance indicator (`I`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_imbalance(&mut self) -> Result<ImbalanceMsg> {
        Ok(ImbalanceMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            paired_shares: self.read_u64_be("paired_shares")?,
            imbalance_shares: self.read_u64_be("imbalance_shares")?,
            direction: self.read_byte("direction")?,
            ticker: self.read_fixed("ticker")?,
            far_price: self.read_u32_be("far_price")?,
            near_price: self.read_u32_be("near_price")?,
            current_price: self.read_u32_be("current_price")?,
            cross_type: self.read_byte("cross_type")?,
            price_var: self.read_byte("price_var")?,
        })
    }

    /// Decodes the body of a retail price improvement indicator (`N`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_retail_price_improvement(&mut self) -> Result<RetailPriceImprovementMsg> {
        Ok(RetailPriceImprovementMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ticker: self.read_fixed("ticker")?,
            interest: self.read_byte("interest")?,
        })
    }

    /// Decodes the body of an add order (`A`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_add_order(&mut self) -> Result<AddOrderMsg> {
        Ok(AddOrderMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ref_num: self.read_u64_be("ref_num")?,
            buy_status: self.read_byte("buy_status")?,
            quantity: self.read_u32_be("quantity")?,
            ticker: self.read_fixed("ticker")?,
            price: self.read_u32_be("price")?,
        })
    }

    /// Decodes the body of an add order with MPID attribution (`F`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_add_order_mpid(&mut self) -> Result<AddOrderMpidMsg> {
        Ok(AddOrderMpidMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ref_num: self.read_u64_be("ref_num")?,
            buy_status: self.read_byte("buy_status")?,
            quantity: self.read_u32_be("quantity")?,
            ticker: self.read_fixed("ticker")?,
            price: self.read_u32_be("price")?,
            mpid: self.read_fixed("mpid")?,
        })
    }

    /// Decodes the body of an order executed (`E`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_order_executed(&mut self) -> Result<OrderExecutedMsg> {
        Ok(OrderExecutedMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ref_num: self.read_u64_be("ref_num")?,
            quantity: self.read_u32_be("quantity")?,
            match_number: self.read_u64_be("match_number")?,
        })
    }

    /// Decodes the body of an order executed with price (`C`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_order_executed_with_price(&mut self) -> Result<OrderExecutedWithPriceMsg> {
        Ok(OrderExecutedWithPriceMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ref_num: self.read_u64_be("ref_num")?,
            quantity: self.read_u32_be("quantity")?,
            match_number: self.read_u64_be("match_number")?,
            printable: self.read_byte("printable")?,
            price: self.read_u32_be("price")?,
        })
    }

    /// Decodes the body of an order cancel (`X`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_order_cancel(&mut self) -> Result<OrderCancelMsg> {
        Ok(OrderCancelMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ref_num: self.read_u64_be("ref_num")?,
            quantity: self.read_u32_be("quantity")?,
        })
    }

    /// Decodes the body of an order delete (`D`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_order_delete(&mut self) -> Result<OrderDeleteMsg> {
        Ok(OrderDeleteMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ref_num: self.read_u64_be("ref_num")?,
        })
    }

    /// Decodes the body of an order replace (`U`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_order_replace(&mut self) -> Result<OrderReplaceMsg> {
        Ok(OrderReplaceMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            old_ref_num: self.read_u64_be("old_ref_num")?,
            ref_num: self.read_u64_be("ref_num")?,
            quantity: self.read_u32_be("quantity")?,
            price: self.read_u32_be("price")?,
        })
    }

    /// Decodes the body of a non-cross trade (`P`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_trade(&mut self) -> Result<TradeMsg> {
        Ok(TradeMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            ref_num: self.read_u64_be("ref_num")?,
            buy_status: self.read_byte("buy_status")?,
            quantity: self.read_u32_be("quantity")?,
            ticker: self.read_fixed("ticker")?,
            price: self.read_u32_be("price")?,
            match_number: self.read_u64_be("match_number")?,
        })
    }

    /// Decodes the body of a cross trade (`Q`) message.
    ///
    /// # Errors
    /// This function returns an error if the reader fails or is exhausted
    /// mid-field.
    pub fn decode_cross_trade(&mut self) -> Result<CrossTradeMsg> {
        Ok(CrossTradeMsg {
            nanoseconds: self.read_u32_be("nanoseconds")?,
            cross_quantity: self.read_u64_be("cross_quantity")?,
            ticker: self.read_fixed("ticker")?,
            price: self.read_u32_be("price")?,
            match_number: self.read_u64_be("match_number")?,
            cross_type: self.read_byte("cross_type")?,
        })
    }

    // Reads exactly 4 bytes and accumulates them most significant first,
    // independent of the host byte order.
    fn read_u32_be(&mut self, field: &'static str) -> Result<u32> {
        Ok(u32::from_be_bytes(self.read_fixed(field)?))
    }

    fn read_u64_be(&mut self, field: &'static str) -> Result<u64> {
        Ok(u64::from_be_bytes(self.read_fixed(field)?))
    }

    // Reads exactly N raw bytes with no interpretation, trimming, or
    // termination scanning.
    fn read_fixed<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N]> {
        let mut bytes = [0; N];
        self.reader.read_exact(&mut bytes).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                Error::truncated(format!("decoding {field}"))
            } else {
                Error::io(e, format!("decoding {field}"))
            }
        })?;
        Ok(bytes)
    }

    fn read_byte(&mut self, field: &'static str) -> Result<u8> {
        Ok(self.read_fixed::<1>(field)?[0])
    }

    fn skip_byte(&mut self, field: &'static str) -> Result<()> {
        self.read_fixed::<1>(field).map(|_| ())
    }
}

impl RecordDecoder<BufReader<File>> {
    /// Creates a new [`RecordDecoder`] from the file at `path`.
    ///
    /// # Errors
    /// This function returns an error if the file doesn't exist or can't be
    /// opened.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            Error::io(
                e,
                format!(
                    "opening file to decode at path '{}'",
                    path.as_ref().display()
                ),
            )
        })?;
        Ok(Self::new(BufReader::new(file)))
    }
}

/// Type for runtime polymorphism over whether the input is uncompressed or
/// Zstandard-compressed. Implements [`std::io::Read`].
pub struct DynReader<'a, R>(DynReaderImpl<'a, R>)
where
    R: io::BufRead;

enum DynReaderImpl<'a, R>
where
    R: io::BufRead,
{
    Uncompressed(R),
    ZStd(zstd::stream::Decoder<'a, R>),
}

impl<'a, R> DynReader<'a, BufReader<R>>
where
    R: io::Read,
{
    /// Creates a new [`DynReader`] from a reader, with the specified
    /// `compression`.
    ///
    /// # Errors
    /// This function will return an error if it fails to create the zstd
    /// decoder.
    pub fn new(reader: R, compression: Compression) -> Result<Self> {
        Self::with_buffer(BufReader::new(reader), compression)
    }

    /// Creates a new [`DynReader`] from a reader, inferring the compression.
    /// If `reader` also implements [`io::BufRead`], it is better to use
    /// [`inferred_with_buffer()`](Self::inferred_with_buffer).
    ///
    /// # Errors
    /// This function will return an error if it is unable to read from
    /// `reader` or it fails to create the zstd decoder.
    pub fn new_inferred(reader: R) -> Result<Self> {
        Self::inferred_with_buffer(BufReader::new(reader))
    }
}

impl<'a, R> DynReader<'a, R>
where
    R: io::BufRead,
{
    /// Creates a new [`DynReader`] from a buffered reader with the specified
    /// `compression`.
    ///
    /// # Errors
    /// This function will return an error if it fails to create the zstd
    /// decoder.
    pub fn with_buffer(reader: R, compression: Compression) -> Result<Self> {
        match compression {
            Compression::None => Ok(Self(DynReaderImpl::Uncompressed(reader))),
            Compression::ZStd => Ok(Self(DynReaderImpl::ZStd(
                zstd::stream::Decoder::with_buffer(reader)
                    .map_err(|e| Error::io(e, "creating zstd decoder"))?,
            ))),
        }
    }

    /// Creates a new [`DynReader`] from a buffered reader, inferring the
    /// compression from the leading magic bytes.
    ///
    /// # Errors
    /// This function will return an error if it fails to read from `reader` or
    /// creating the zstd decoder fails.
    pub fn inferred_with_buffer(mut reader: R) -> Result<Self> {
        let first_bytes = reader
            .fill_buf()
            .map_err(|e| Error::io(e, "creating buffer to infer compression"))?;
        if starts_with_zstd_prefix(first_bytes) {
            Ok(Self(DynReaderImpl::ZStd(
                zstd::stream::Decoder::with_buffer(reader)
                    .map_err(|e| Error::io(e, "creating zstd decoder"))?,
            )))
        } else {
            Ok(Self(DynReaderImpl::Uncompressed(reader)))
        }
    }

    /// Returns a mutable reference to the inner reader.
    pub fn get_mut(&mut self) -> &mut R {
        match &mut self.0 {
            DynReaderImpl::Uncompressed(reader) => reader,
            DynReaderImpl::ZStd(reader) => reader.get_mut(),
        }
    }

    /// Returns a reference to the inner reader.
    pub fn get_ref(&self) -> &R {
        match &self.0 {
            DynReaderImpl::Uncompressed(reader) => reader,
            DynReaderImpl::ZStd(reader) => reader.get_ref(),
        }
    }
}

impl<'a> DynReader<'a, BufReader<File>> {
    /// Creates a new [`DynReader`] from the file at `path`, inferring the
    /// compression.
    ///
    /// # Errors
    /// This function will return an error if the file doesn't exist or it is
    /// unable to determine the compression of the file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            Error::io(
                e,
                format!(
                    "opening file to decode at path '{}'",
                    path.as_ref().display()
                ),
            )
        })?;
        DynReader::new_inferred(file)
    }
}

impl<'a, R> io::Read for DynReader<'a, R>
where
    R: io::BufRead,
{
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match &mut self.0 {
            DynReaderImpl::Uncompressed(r) => r.read(buf),
            DynReaderImpl::ZStd(r) => r.read(buf),
        }
    }
}
