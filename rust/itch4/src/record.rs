//! Market data record types for each TotalView-ITCH 4.x message schema.
//!
//! Every struct lists its fields in exact wire order. The original protocol
//! documentation groups several of these messages into families sharing common
//! leading fields (an order reference number preceded by a nanosecond offset);
//! those shared groups are spelled out explicitly in each struct rather than
//! factored into a common header so the wire layout stays visible.
//!
//! All multi-byte integers are transmitted big-endian. `nanoseconds` fields
//! hold the time elapsed since the most recent [`TimestampMsg`], not since
//! midnight; combining the two is left to the caller. Fixed-width byte fields
//! (`ticker`, `mpid`, `reason`) are stored raw: space-padded, never
//! null-terminated, never trimmed.

use crate::{
    enums::MessageType,
    macros::{impl_mpid_accessor, impl_record, impl_ticker_accessor},
    MPID_LEN, REASON_LEN, TICKER_LEN,
};

/// Trait for message types with a static [`MessageType`] and a fixed wire
/// width.
pub trait Record {
    /// The type code identifying this message schema.
    const TYPE: MessageType;
    /// The length in bytes of the message body on the wire, excluding the
    /// leading type-code byte.
    const WIRE_LEN: usize;
}

/// A seconds timestamp (`T`) message. Establishes the reference point for the
/// `nanoseconds` offsets of all subsequent messages until the next timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimestampMsg {
    /// The number of whole seconds since midnight.
    pub seconds: u32,
}

/// A system event (`S`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SystemEventMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The system event code.
    pub event_code: u8,
}

/// A stock directory (`R`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StockDirectoryMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The market category of the security.
    pub mkt_category: u8,
    /// The financial status indicator.
    pub fin_status: u8,
    /// The number of shares that make up a round lot.
    pub round_lot_size: u32,
    /// Whether the security only accepts round lot orders.
    pub round_lot_status: u8,
}

/// A stock trading action (`H`) message. The wire layout contains one reserved
/// byte between `trading_state` and `reason` that is skipped during decoding
/// and not stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TradingActionMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The current trading state of the security.
    pub trading_state: u8,
    /// The reason for the trading action.
    pub reason: [u8; REASON_LEN],
}

/// A Reg SHO short sale price test restriction (`Y`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegShoMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The Reg SHO action code.
    pub reg_sho_action: u8,
}

/// A market participant position (`L`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarketParticipantPosMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The market participant ID.
    pub mpid: [u8; MPID_LEN],
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The market maker status.
    pub mm_status: u8,
    /// The market maker mode.
    pub mm_mode: u8,
    /// The market participant state.
    pub mp_status: u8,
}

/// A broken trade (`B`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BrokenTradeMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The match number of the execution being broken.
    pub match_number: u64,
}

/// A net order imbalance indicator (`I`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ImbalanceMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The number of shares matched at the current reference price.
    pub paired_shares: u64,
    /// The number of shares not paired at the current reference price.
    pub imbalance_shares: u64,
    /// The direction of the imbalance.
    pub direction: u8,
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The far price, as an unscaled fixed-point integer.
    pub far_price: u32,
    /// The near price, as an unscaled fixed-point integer.
    pub near_price: u32,
    /// The current reference price, as an unscaled fixed-point integer.
    pub current_price: u32,
    /// The type of the cross.
    pub cross_type: u8,
    /// The price variation indicator.
    pub price_var: u8,
}

/// A retail price improvement indicator (`N`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RetailPriceImprovementMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The retail interest indicator.
    pub interest: u8,
}

/// An add order without MPID attribution (`A`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddOrderMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The order reference number assigned by the venue. Unique only within a
    /// single trading session.
    pub ref_num: u64,
    /// The side of the order.
    pub buy_status: u8,
    /// The number of shares.
    pub quantity: u32,
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The order price, as an unscaled fixed-point integer.
    pub price: u32,
}

/// An add order with MPID attribution (`F`) message. Identical to
/// [`AddOrderMsg`] with a trailing market participant ID.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct AddOrderMpidMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The order reference number assigned by the venue.
    pub ref_num: u64,
    /// The side of the order.
    pub buy_status: u8,
    /// The number of shares.
    pub quantity: u32,
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The order price, as an unscaled fixed-point integer.
    pub price: u32,
    /// The market participant ID attributed to the order.
    pub mpid: [u8; MPID_LEN],
}

/// An order executed (`E`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderExecutedMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The reference number of the executed order.
    pub ref_num: u64,
    /// The number of shares executed.
    pub quantity: u32,
    /// The match number correlating this execution to its trade.
    pub match_number: u64,
}

/// An order executed with price (`C`) message. An execution at a price
/// different from the order's display price.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderExecutedWithPriceMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The reference number of the executed order.
    pub ref_num: u64,
    /// The number of shares executed.
    pub quantity: u32,
    /// The match number correlating this execution to its trade.
    pub match_number: u64,
    /// Whether the execution should be reflected on displayed tapes.
    pub printable: u8,
    /// The execution price, as an unscaled fixed-point integer.
    pub price: u32,
}

/// An order cancel (`X`) message. Reduces an order by a partial quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderCancelMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The reference number of the canceled order.
    pub ref_num: u64,
    /// The number of shares canceled.
    pub quantity: u32,
}

/// An order delete (`D`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderDeleteMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The reference number of the deleted order.
    pub ref_num: u64,
}

/// An order replace (`U`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OrderReplaceMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The reference number of the order being replaced.
    pub old_ref_num: u64,
    /// The reference number assigned to the new order.
    pub ref_num: u64,
    /// The number of shares of the new order.
    pub quantity: u32,
    /// The price of the new order, as an unscaled fixed-point integer.
    pub price: u32,
}

/// A non-cross trade (`P`) message. Carries the fields of [`AddOrderMsg`]
/// followed by a match number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TradeMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The reference number of the matched non-displayed order.
    pub ref_num: u64,
    /// The side of the matched order.
    pub buy_status: u8,
    /// The number of shares traded.
    pub quantity: u32,
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The trade price, as an unscaled fixed-point integer.
    pub price: u32,
    /// The match number assigned to the trade.
    pub match_number: u64,
}

/// A cross trade (`Q`) message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CrossTradeMsg {
    /// The nanoseconds portion of the timestamp.
    pub nanoseconds: u32,
    /// The number of shares matched in the cross.
    pub cross_quantity: u64,
    /// The security symbol, right-padded with spaces.
    pub ticker: [u8; TICKER_LEN],
    /// The cross price, as an unscaled fixed-point integer.
    pub price: u32,
    /// The match number assigned to the cross.
    pub match_number: u64,
    /// The type of the cross.
    pub cross_type: u8,
}

impl_record!(TimestampMsg, Timestamp, 4);
impl_record!(SystemEventMsg, SystemEvent, 5);
impl_record!(StockDirectoryMsg, StockDirectory, 19);
// 17 stored bytes plus the reserved byte skipped on the wire
impl_record!(TradingActionMsg, TradingAction, 18);
impl_record!(RegShoMsg, RegSho, 13);
impl_record!(MarketParticipantPosMsg, MarketParticipantPosition, 19);
impl_record!(BrokenTradeMsg, BrokenTrade, 12);
impl_record!(ImbalanceMsg, Imbalance, 43);
impl_record!(RetailPriceImprovementMsg, RetailPriceImprovement, 13);
impl_record!(AddOrderMsg, AddOrder, 29);
impl_record!(AddOrderMpidMsg, AddOrderMpid, 33);
impl_record!(OrderExecutedMsg, OrderExecuted, 24);
impl_record!(OrderExecutedWithPriceMsg, OrderExecutedWithPrice, 29);
impl_record!(OrderCancelMsg, OrderCancel, 16);
impl_record!(OrderDeleteMsg, OrderDelete, 12);
impl_record!(OrderReplaceMsg, OrderReplace, 28);
impl_record!(TradeMsg, Trade, 37);
impl_record!(CrossTradeMsg, CrossTrade, 33);

impl_ticker_accessor!(StockDirectoryMsg);
impl_ticker_accessor!(TradingActionMsg);
impl_ticker_accessor!(RegShoMsg);
impl_ticker_accessor!(MarketParticipantPosMsg);
impl_ticker_accessor!(ImbalanceMsg);
impl_ticker_accessor!(RetailPriceImprovementMsg);
impl_ticker_accessor!(AddOrderMsg);
impl_ticker_accessor!(AddOrderMpidMsg);
impl_ticker_accessor!(TradeMsg);
impl_ticker_accessor!(CrossTradeMsg);

impl_mpid_accessor!(MarketParticipantPosMsg);
impl_mpid_accessor!(AddOrderMpidMsg);

impl TradingActionMsg {
    /// Returns `reason` as a `&str`.
    ///
    /// # Errors
    /// This function returns an error if `reason` contains invalid UTF-8.
    pub fn reason(&self) -> crate::Result<&str> {
        std::str::from_utf8(&self.reason)
            .map_err(|e| crate::Error::utf8(e, "converting reason of TradingActionMsg"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticker_accessor_preserves_padding() {
        let rec = AddOrderMsg {
            nanoseconds: 0,
            ref_num: 1,
            buy_status: b'B',
            quantity: 100,
            ticker: *b"IBM     ",
            price: 250_000,
        };
        assert_eq!(rec.ticker().unwrap(), "IBM     ");
    }

    #[test]
    fn test_invalid_utf8_ticker_errs() {
        let mut rec = RegShoMsg {
            nanoseconds: 0,
            ticker: *b"ABCD    ",
            reg_sho_action: b'0',
        };
        rec.ticker[0] = 0xFF;
        assert!(matches!(rec.ticker(), Err(crate::Error::Utf8 { .. })));
    }
}
